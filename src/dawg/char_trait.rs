use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait for types that can label transitions of the automaton.
///
/// This trait is automatically implemented for any type satisfying all the
/// required bounds (`char`, `u8`, `u16`, `u32`, etc.).
///
/// - `Copy`: transitions store labels by value
/// - `Ord`: outgoing transitions are kept sorted by label
/// - `Hash`: labels are part of a state's register signature
/// - `Debug`: error messages and debug printing of states
/// - `Display`: labels are written verbatim by the serializer
pub trait DawgChar: Copy + Eq + Ord + Hash + Debug + Display {}

impl<T: Copy + Eq + Ord + Hash + Debug + Display> DawgChar for T {}
