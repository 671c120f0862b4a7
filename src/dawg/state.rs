use std::fmt;

use smallvec::SmallVec;

use super::char_trait::DawgChar;
use super::error::BuildError;

/// Identity of a state. Assigned once at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// The start state of every automaton.
    pub const START: StateId = StateId(0);

    /// Position of the state in the builder's state table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        StateId(u32::try_from(index).expect("more than u32::MAX states"))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The label of a transition: an input symbol, or epsilon (no input consumed).
///
/// Epsilon transitions only appear after
/// [`make_single_final_state`](super::Builder::make_single_final_state).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label<C: DawgChar> {
    /// A transition consuming one symbol.
    Symbol(C),
    /// A transition consuming nothing.
    Epsilon,
}

impl<C: DawgChar> Label<C> {
    /// Returns the symbol, or `None` for epsilon.
    pub fn symbol(self) -> Option<C> {
        match self {
            Label::Symbol(c) => Some(c),
            Label::Epsilon => None,
        }
    }
}

/// A list of `(label, state)` arcs. Most states have one or two.
pub type Arcs<C> = SmallVec<[(Label<C>, StateId); 2]>;

/// A node in the automaton graph.
///
/// `outputs` are kept sorted by label, so two states with the same
/// transitions always list them in the same order. `inputs` records every
/// incoming arc as `(label, parent)` and is only used to detect states that
/// are shared by more than one path.
#[derive(Clone, Debug)]
pub struct State<C: DawgChar> {
    id: StateId,
    is_final: bool,
    outputs: Arcs<C>,
    inputs: Arcs<C>,
    registered: bool,
}

impl<C: DawgChar> State<C> {
    pub(crate) fn new(id: StateId) -> Self {
        State {
            id,
            is_final: false,
            outputs: SmallVec::new(),
            inputs: SmallVec::new(),
            registered: false,
        }
    }

    /// Creates an unregistered copy of `self` under a new identity.
    ///
    /// Acceptance and outgoing transitions are copied. Incoming arcs are not;
    /// the caller wires the copy into the graph.
    pub(crate) fn duplicate(&self, id: StateId) -> Self {
        State {
            id,
            is_final: self.is_final,
            outputs: self.outputs.clone(),
            inputs: SmallVec::new(),
            registered: false,
        }
    }

    /// The identity of this state.
    #[inline]
    pub fn id(&self) -> StateId {
        self.id
    }

    /// True if this state accepts.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// True if this state is a canonical entry of the register and therefore immutable.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Returns the target of the transition on `symbol`, if any.
    #[inline]
    pub fn get(&self, symbol: C) -> Option<StateId> {
        self.target(Label::Symbol(symbol))
    }

    /// Returns the target of the transition on `label`, if any.
    pub fn target(&self, label: Label<C>) -> Option<StateId> {
        self.outputs
            .binary_search_by(|(l, _)| l.cmp(&label))
            .ok()
            .map(|pos| self.outputs[pos].1)
    }

    /// Outgoing transitions, sorted by label.
    #[inline]
    pub fn transitions(&self) -> &[(Label<C>, StateId)] {
        &self.outputs
    }

    /// Incoming arcs as `(label, parent)`, in arrival order.
    #[inline]
    pub fn incoming(&self) -> &[(Label<C>, StateId)] {
        &self.inputs
    }

    /// Number of distinct incoming arcs. A state with more than one is a confluence state.
    #[inline]
    pub fn in_degree(&self) -> usize {
        self.inputs.len()
    }

    /// Marks this state as accepting.
    pub(crate) fn make_final(&mut self) -> Result<(), BuildError> {
        self.ensure_mutable()?;
        self.is_final = true;
        Ok(())
    }

    /// Clears the accepting flag. Only finalization does this, after the register is dropped.
    pub(crate) fn clear_final(&mut self) {
        self.is_final = false;
    }

    /// Records an outgoing transition in sorted position.
    pub(crate) fn add_output(&mut self, label: Label<C>, target: StateId) -> Result<(), BuildError> {
        self.ensure_mutable()?;
        match self.outputs.binary_search_by(|(l, _)| l.cmp(&label)) {
            Ok(_) => Err(BuildError::NonDeterministic {
                state: self.id,
                label: format!("{label:?}"),
            }),
            Err(pos) => {
                self.outputs.insert(pos, (label, target));
                Ok(())
            }
        }
    }

    /// Points the existing transition on `label` at `target` and returns the old target.
    pub(crate) fn replace_output(
        &mut self,
        label: Label<C>,
        target: StateId,
    ) -> Result<StateId, BuildError> {
        self.ensure_mutable()?;
        let pos = self
            .outputs
            .binary_search_by(|(l, _)| l.cmp(&label))
            .map_err(|_| BuildError::MissingTransition {
                state: self.id,
                label: format!("{label:?}"),
            })?;
        Ok(std::mem::replace(&mut self.outputs[pos].1, target))
    }

    /// Removes and returns all outgoing transitions.
    pub(crate) fn take_outputs(&mut self) -> Arcs<C> {
        std::mem::take(&mut self.outputs)
    }

    pub(crate) fn add_input(&mut self, label: Label<C>, parent: StateId) {
        debug_assert!(!self.inputs.contains(&(label, parent)));
        self.inputs.push((label, parent));
    }

    pub(crate) fn remove_input(&mut self, label: Label<C>, parent: StateId) {
        if let Some(pos) = self.inputs.iter().position(|&arc| arc == (label, parent)) {
            self.inputs.remove(pos);
        }
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    fn ensure_mutable(&self) -> Result<(), BuildError> {
        if self.registered {
            Err(BuildError::RegisteredMutation(self.id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(i: usize) -> StateId {
        StateId::from_index(i)
    }

    #[test]
    fn no_transitions() {
        let s = State::<char>::new(id(1));
        assert_eq!(s.transitions().len(), 0);
        assert_eq!(s.get('a'), None);
        assert!(!s.is_final());
    }

    #[test]
    fn transitions_stay_sorted() {
        let mut s = State::new(id(1));
        s.add_output(Label::Symbol('c'), id(2)).unwrap();
        s.add_output(Label::Epsilon, id(5)).unwrap();
        s.add_output(Label::Symbol('a'), id(3)).unwrap();
        s.add_output(Label::Symbol('b'), id(4)).unwrap();
        let labels: Vec<_> = s.transitions().iter().map(|&(l, _)| l).collect();
        assert_eq!(
            labels,
            [
                Label::Symbol('a'),
                Label::Symbol('b'),
                Label::Symbol('c'),
                Label::Epsilon
            ]
        );
        assert_eq!(s.get('b'), Some(id(4)));
        assert_eq!(s.target(Label::Epsilon), Some(id(5)));
    }

    #[test]
    fn second_transition_on_same_symbol_is_rejected() {
        let mut s = State::new(id(1));
        s.add_output(Label::Symbol('a'), id(2)).unwrap();
        let err = s.add_output(Label::Symbol('a'), id(3)).unwrap_err();
        assert!(matches!(err, BuildError::NonDeterministic { .. }));
        assert_eq!(s.get('a'), Some(id(2)));
    }

    #[test]
    fn replace_output_returns_old_target() {
        let mut s = State::new(id(1));
        s.add_output(Label::Symbol('a'), id(2)).unwrap();
        assert_eq!(s.replace_output(Label::Symbol('a'), id(7)), Ok(id(2)));
        assert_eq!(s.get('a'), Some(id(7)));
        assert!(s.replace_output(Label::Symbol('z'), id(7)).is_err());
    }

    #[test]
    fn registered_state_is_immutable() {
        let mut s = State::new(id(1));
        s.set_registered(true);
        assert_eq!(s.make_final(), Err(BuildError::RegisteredMutation(id(1))));
        assert_eq!(
            s.add_output(Label::Symbol('a'), id(2)),
            Err(BuildError::RegisteredMutation(id(1)))
        );
        assert!(!s.is_final());
    }

    #[test]
    fn duplicate_copies_outputs_but_not_inputs() {
        let mut s = State::new(id(1));
        s.make_final().unwrap();
        s.add_output(Label::Symbol('x'), id(2)).unwrap();
        s.add_input(Label::Symbol('q'), id(0));
        s.set_registered(true);
        let copy = s.duplicate(id(9));
        assert_eq!(copy.id(), id(9));
        assert!(copy.is_final());
        assert!(!copy.is_registered());
        assert_eq!(copy.transitions(), s.transitions());
        assert_eq!(copy.in_degree(), 0);
    }

    #[test]
    fn input_arcs_are_counted_per_parent_and_label() {
        let mut s = State::<char>::new(id(3));
        s.add_input(Label::Symbol('a'), id(1));
        s.add_input(Label::Symbol('b'), id(1));
        s.add_input(Label::Symbol('a'), id(2));
        assert_eq!(s.in_degree(), 3);
        s.remove_input(Label::Symbol('b'), id(1));
        assert_eq!(s.in_degree(), 2);
        assert_eq!(
            s.incoming(),
            &[(Label::Symbol('a'), id(1)), (Label::Symbol('a'), id(2))]
        );
    }

    #[test]
    fn epsilon_has_no_symbol() {
        assert_eq!(Label::Symbol('a').symbol(), Some('a'));
        assert_eq!(Label::<char>::Epsilon.symbol(), None);
    }
}
