/// Incremental construction: naive and minimizing insertion, finalization.
pub mod builder;
/// Trait for types that can serve as transition labels.
pub mod char_trait;
/// Construction errors.
pub mod error;
/// Equivalence classes of finished states.
pub mod register;
/// States, their identities and transition labels.
pub mod state;
/// Word conversions and input line normalization.
pub mod word;

pub use builder::{build_dawg, build_dawg_from_reader, Builder, BuilderConfig, InsertMode};
pub use char_trait::DawgChar;
pub use error::{BuildError, LoadError};
pub use register::Register;
pub use state::{Label, State, StateId};
pub use word::{normalize_line, IntoWord};
