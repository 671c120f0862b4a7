//! Error types for automaton construction.

use thiserror::Error;

use super::builder::InsertMode;
use super::state::StateId;

/// Errors that can occur while building an automaton.
///
/// Duplicate words and empty words are not errors; they are ordinary
/// insertions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A state already has a transition on this label.
    #[error("state {state} already has a transition on {label}")]
    NonDeterministic {
        /// The state that would become non-deterministic.
        state: StateId,
        /// The conflicting label.
        label: String,
    },

    /// A state was asked to retarget a transition it does not have.
    #[error("state {state} has no transition on {label}")]
    MissingTransition {
        /// The state missing the transition.
        state: StateId,
        /// The requested label.
        label: String,
    },

    /// Adding the transition would make the graph cyclic.
    ///
    /// This is structural corruption: state equivalence is only defined on
    /// acyclic graphs, so construction stops here.
    #[error("transition {from} -> {to} would close a cycle")]
    Cycle {
        /// Source of the rejected transition.
        from: StateId,
        /// Target of the rejected transition.
        to: StateId,
    },

    /// A registered state is shared and immutable; it must be cloned instead.
    #[error("state {0} is registered and cannot be mutated")]
    RegisteredMutation(StateId),

    /// Words cannot be inserted once the automaton has a single final state.
    #[error("automaton is already finalized")]
    Finalized,

    /// Naive and minimizing insertion cannot be mixed in one automaton.
    #[error("automaton is built with {built} insertion, cannot insert with {requested}")]
    ModeMismatch {
        /// The mode the automaton was built with.
        built: InsertMode,
        /// The mode of the rejected insertion.
        requested: InsertMode,
    },
}

/// A specialized `Result` type for automaton construction.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors from building an automaton out of a word stream.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the input failed.
    #[error("failed to read words")]
    Io(#[from] std::io::Error),

    /// The automaton rejected an insertion.
    #[error(transparent)]
    Build(#[from] BuildError),
}
