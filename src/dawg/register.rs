//! Equivalence classes of finished states.
//!
//! States are registered bottom-up: by the time a state is looked up, every
//! state it points to is already canonical. Comparing children by identity is
//! then the same as comparing them structurally, so a state's class is fully
//! described by its acceptance flag and its sorted `(label, target)` list.

use hashbrown::HashMap;

use super::char_trait::DawgChar;
use super::state::{Arcs, State, StateId};

/// The hash key of an equivalence class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Signature<C: DawgChar> {
    is_final: bool,
    arcs: Arcs<C>,
}

impl<C: DawgChar> Signature<C> {
    fn of(state: &State<C>) -> Self {
        Signature {
            is_final: state.is_final(),
            arcs: state.transitions().iter().copied().collect(),
        }
    }
}

/// Table of canonical states, one per equivalence class.
///
/// A registered state is immutable (see [`State::is_registered`]). To change
/// one, remove it first, or clone it.
#[derive(Debug)]
pub struct Register<C: DawgChar> {
    classes: HashMap<Signature<C>, StateId>,
}

impl<C: DawgChar> Default for Register<C> {
    fn default() -> Self {
        Register {
            classes: HashMap::new(),
        }
    }
}

impl<C: DawgChar> Register<C> {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the canonical state equivalent to `state`, if one is registered.
    ///
    /// A state that is itself registered is its own canonical state.
    pub fn get(&self, state: &State<C>) -> Option<StateId> {
        if state.is_registered() {
            return Some(state.id());
        }
        self.classes.get(&Signature::of(state)).copied()
    }

    /// Registers `state` as the canonical entry of its class.
    pub fn put(&mut self, state: &mut State<C>) {
        debug_assert!(!state.is_registered(), "state {} registered twice", state.id());
        let previous = self.classes.insert(Signature::of(state), state.id());
        debug_assert!(
            previous.is_none(),
            "state {} duplicates registered state {:?}",
            state.id(),
            previous
        );
        state.set_registered(true);
    }

    /// Takes `state` out of the register so it may be mutated.
    ///
    /// Returns false if it was not registered.
    pub fn remove(&mut self, state: &mut State<C>) -> bool {
        if !state.is_registered() {
            return false;
        }
        let removed = self.classes.remove(&Signature::of(state));
        debug_assert_eq!(removed, Some(state.id()));
        state.set_registered(false);
        true
    }

    /// Empties the register and returns the states it held.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = StateId> + '_ {
        self.classes.drain().map(|(_, id)| id)
    }
}
