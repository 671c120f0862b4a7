use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;

use hashbrown::HashSet;
use mark_last::MarkLastIterator;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::char_trait::DawgChar;
use super::error::{BuildError, LoadError, Result};
use super::register::Register;
use super::state::{Arcs, Label, State, StateId};
use super::word::{normalize_line, IntoWord, WordBuf};

/// Which insertion algorithm a [`Builder`] uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum InsertMode {
    /// Plain trie insertion: prefixes are shared, suffixes never are.
    Naive,
    /// Incremental minimization: the automaton is minimal after every word.
    #[default]
    Minimal,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Naive => f.write_str("naive"),
            InsertMode::Minimal => f.write_str("minimal"),
        }
    }
}

/// Construction options for a [`Builder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Algorithm used by [`Builder::insert`].
    pub mode: InsertMode,
    /// Check every new transition for cycles before adding it.
    pub verify_acyclic: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            mode: InsertMode::Minimal,
            verify_acyclic: true,
        }
    }
}

/// States visited while following a word from the start state.
type Path = SmallVec<[StateId; 32]>;

/// Incremental builder of a deterministic acyclic automaton.
///
/// Words may be added in any order. With [`InsertMode::Minimal`] the
/// automaton is kept minimal after every insertion using the algorithm for
/// unsorted data from [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1):
/// states shared by several paths are cloned before they are changed, and
/// freshly built states are merged into equivalent registered ones.
///
/// After [`make_single_final_state`](Builder::make_single_final_state) the
/// automaton is frozen and has exactly one accepting state.
///
/// # Examples
///
/// ```
/// use dawg_fsa::dawg::Builder;
///
/// let mut builder = Builder::new();
/// for word in ["BAT", "CAT", "RAT"] {
///     builder.insert(word).unwrap();
/// }
/// let start = builder.state(builder.start());
/// assert_eq!(start.get('B'), start.get('C'));
/// assert!(builder.accepts("CAT"));
/// assert!(!builder.accepts("AT"));
/// ```
pub struct Builder<C: DawgChar> {
    states: Vec<State<C>>,
    register: Register<C>,
    finish: Option<StateId>,
    config: BuilderConfig,
    built_with: Option<InsertMode>,
}

impl<C: DawgChar> Default for Builder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DawgChar> Builder<C> {
    /// Creates a builder for minimizing insertion.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Creates a builder with explicit options.
    pub fn with_config(config: BuilderConfig) -> Self {
        Builder {
            states: vec![State::new(StateId::START)],
            register: Register::new(),
            finish: None,
            config,
            built_with: None,
        }
    }

    /// The options this builder was created with.
    pub fn config(&self) -> BuilderConfig {
        self.config
    }

    /// The start state.
    #[inline]
    pub fn start(&self) -> StateId {
        StateId::START
    }

    /// The single accepting state, once finalized.
    #[inline]
    pub fn finish(&self) -> Option<StateId> {
        self.finish
    }

    /// True once [`make_single_final_state`](Builder::make_single_final_state) has run.
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finish.is_some()
    }

    /// Returns the state with identity `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this builder.
    #[inline]
    pub fn state(&self, id: StateId) -> &State<C> {
        &self.states[id.index()]
    }

    /// The register of canonical states. Empty after finalization.
    pub fn register(&self) -> &Register<C> {
        &self.register
    }

    fn state_mut(&mut self, id: StateId) -> &mut State<C> {
        &mut self.states[id.index()]
    }

    fn new_state(&mut self) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(State::new(id));
        id
    }

    /// Inserts a word with the configured [`InsertMode`].
    ///
    /// Returns `true` if the word was added, `false` if it was already accepted.
    ///
    /// # Errors
    ///
    /// Fails if the builder is finalized, or if it already holds words
    /// inserted with the other mode.
    pub fn insert(&mut self, word: impl IntoWord<C>) -> Result<bool> {
        match self.config.mode {
            InsertMode::Naive => self.add_word(word),
            InsertMode::Minimal => self.add_min_word(word),
        }
    }

    fn begin(&mut self, mode: InsertMode) -> Result<()> {
        if self.is_finalized() {
            return Err(BuildError::Finalized);
        }
        match self.built_with {
            Some(built) if built != mode => Err(BuildError::ModeMismatch {
                built,
                requested: mode,
            }),
            _ => {
                self.built_with = Some(mode);
                Ok(())
            }
        }
    }

    /// Follows `word` from the start state as far as transitions exist.
    ///
    /// The returned path starts with the start state and has one more entry
    /// than the number of matched symbols.
    pub fn prefix(&self, word: &[C]) -> SmallVec<[StateId; 32]> {
        let mut path = Path::new();
        path.push(StateId::START);
        let mut current = StateId::START;
        for &ch in word {
            match self.state(current).get(ch) {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }
        path
    }

    /// Inserts a word as a plain trie branch, without any suffix sharing.
    ///
    /// Returns `true` if the word was added, `false` if it was already accepted.
    pub fn add_word(&mut self, word: impl IntoWord<C>) -> Result<bool> {
        self.begin(InsertMode::Naive)?;
        let word = word.collect_word();
        let mut path = self.prefix(&word);
        let added = self.add_suffix(&word, &mut path)?;
        trace!(word = ?word.as_slice(), added, "naive insert");
        Ok(added)
    }

    /// Inserts a word and restores minimality.
    ///
    /// Returns `true` if the word was added, `false` if it was already accepted.
    pub fn add_min_word(&mut self, word: impl IntoWord<C>) -> Result<bool> {
        self.begin(InsertMode::Minimal)?;
        let word: WordBuf<C> = word.collect_word();
        let mut path = self.prefix(&word);
        let matched = path.len() - 1;
        if matched == word.len() && self.state(path[matched]).is_final() {
            trace!(word = ?word.as_slice(), "duplicate word");
            return Ok(false);
        }

        match self.find_confluence_index(&path) {
            Some(index) => self.clone_path(&word, &mut path, index)?,
            None => self.unregister(path[matched]),
        }
        self.add_suffix(&word, &mut path)?;
        self.replace_or_register(&word, &mut path)?;
        trace!(word = ?word.as_slice(), "minimal insert");
        Ok(true)
    }

    /// Appends states for the unmatched part of `word` to `path` and marks
    /// the last one final.
    ///
    /// If the whole word was matched, the state it ends in is marked final.
    /// Returns false if that state was already final.
    fn add_suffix(&mut self, word: &[C], path: &mut Path) -> Result<bool> {
        let matched = path.len() - 1;
        let mut current = path[matched];
        if matched == word.len() {
            let was_final = self.state(current).is_final();
            self.state_mut(current).make_final()?;
            return Ok(!was_final);
        }
        for (last, &ch) in word[matched..].iter().mark_last() {
            let next = self.new_state();
            self.add_transition(current, Label::Symbol(ch), next)?;
            if last {
                self.state_mut(next).make_final()?;
            }
            path.push(next);
            current = next;
        }
        Ok(true)
    }

    /// Index of the first state on `path`, after the start state, that is
    /// entered by more than one arc.
    ///
    /// Arcs are counted per `(label, parent)` pair, so one parent reaching a
    /// state under two different labels also makes it a confluence state.
    pub fn find_confluence_index(&self, path: &[StateId]) -> Option<usize> {
        path.iter()
            .skip(1)
            .position(|&id| self.state(id).in_degree() > 1)
            .map(|i| i + 1)
    }

    /// Replaces `path[index..]` with private copies so the word's path no
    /// longer runs through shared states.
    fn clone_path(&mut self, word: &[C], path: &mut Path, index: usize) -> Result<()> {
        debug!(
            confluence = %path[index],
            depth = index,
            cloned = path.len() - index,
            "cloning confluence path"
        );
        self.unregister(path[index - 1]);
        for i in index..path.len() {
            let clone = self.clone_state(path[i]);
            self.redirect(path[i - 1], Label::Symbol(word[i - 1]), clone)?;
            path[i] = clone;
        }
        Ok(())
    }

    /// Copies a state's acceptance flag and transitions into a new, unregistered state.
    fn clone_state(&mut self, original: StateId) -> StateId {
        let id = StateId::from_index(self.states.len());
        let copy = self.state(original).duplicate(id);
        let arcs: Arcs<C> = copy.transitions().iter().copied().collect();
        self.states.push(copy);
        for (label, child) in arcs {
            self.state_mut(child).add_input(label, id);
        }
        id
    }

    /// Walks `path` from the leaf upwards, merging each state into an
    /// equivalent registered one or registering it.
    ///
    /// Stops at the first state that is already registered: nothing above it
    /// changed.
    fn replace_or_register(&mut self, word: &[C], path: &mut Path) -> Result<()> {
        for i in (1..path.len()).rev() {
            let id = path[i];
            match self.register.get(self.state(id)) {
                Some(canonical) if canonical == id => break,
                Some(canonical) => {
                    debug_assert!(self.equivalent(id, canonical));
                    let parent = path[i - 1];
                    self.unregister(parent);
                    self.redirect(parent, Label::Symbol(word[i - 1]), canonical)?;
                    self.release(id);
                    trace!(state = %id, into = %canonical, "merged");
                    path[i] = canonical;
                }
                None => self.register.put(&mut self.states[id.index()]),
            }
        }
        Ok(())
    }

    fn unregister(&mut self, id: StateId) {
        self.register.remove(&mut self.states[id.index()]);
    }

    /// Detaches a state that was replaced by its canonical equivalent.
    fn release(&mut self, id: StateId) {
        let arcs = self.state_mut(id).take_outputs();
        for (label, child) in arcs {
            self.state_mut(child).remove_input(label, id);
        }
        debug_assert_eq!(self.state(id).in_degree(), 0);
    }

    fn add_transition(&mut self, from: StateId, label: Label<C>, to: StateId) -> Result<()> {
        self.check_acyclic(from, to)?;
        self.state_mut(from).add_output(label, to)?;
        self.state_mut(to).add_input(label, from);
        Ok(())
    }

    fn redirect(&mut self, from: StateId, label: Label<C>, to: StateId) -> Result<()> {
        self.check_acyclic(from, to)?;
        let old = self.state_mut(from).replace_output(label, to)?;
        self.state_mut(old).remove_input(label, from);
        self.state_mut(to).add_input(label, from);
        Ok(())
    }

    fn check_acyclic(&self, from: StateId, to: StateId) -> Result<()> {
        if self.config.verify_acyclic && self.reaches(to, from) {
            return Err(BuildError::Cycle { from, to });
        }
        Ok(())
    }

    /// True if `target` is reachable from `source` (or is `source`).
    fn reaches(&self, source: StateId, target: StateId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![source];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if visited.insert(id) {
                stack.extend(self.state(id).transitions().iter().map(|&(_, t)| t));
            }
        }
        false
    }

    /// Collapses all accepting states into one new finish state.
    ///
    /// Every previously accepting state gets an epsilon transition to the
    /// finish state and loses its own accepting flag. The register is
    /// dropped, since the graph is frozen from here on. Calling this again
    /// returns the existing finish state.
    pub fn make_single_final_state(&mut self) -> Result<StateId> {
        if let Some(finish) = self.finish {
            return Ok(finish);
        }
        let finals: Vec<StateId> = self
            .reachable()
            .into_iter()
            .filter(|&id| self.state(id).is_final())
            .collect();

        let registered: Vec<StateId> = self.register.drain().collect();
        for id in registered {
            self.state_mut(id).set_registered(false);
        }

        let finish = self.new_state();
        for &id in &finals {
            self.add_transition(id, Label::Epsilon, finish)?;
            self.state_mut(id).clear_final();
        }
        self.state_mut(finish).make_final()?;
        self.finish = Some(finish);
        debug!(finals = finals.len(), finish = %finish, "collapsed accepting states");
        Ok(finish)
    }

    /// States reachable from the start state, in breadth-first order.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([StateId::START]);
        seen.insert(StateId::START);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &(_, next) in self.state(id).transitions() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Number of states reachable from the start state.
    pub fn live_state_count(&self) -> usize {
        self.reachable().len()
    }

    /// Number of transitions between reachable states.
    pub fn transition_count(&self) -> usize {
        self.reachable()
            .into_iter()
            .map(|id| self.state(id).transitions().len())
            .sum()
    }

    /// True if the state accepts, directly or through epsilon transitions.
    pub fn is_accepting(&self, id: StateId) -> bool {
        let state = self.state(id);
        state.is_final()
            || state
                .transitions()
                .iter()
                .any(|&(label, next)| label == Label::Epsilon && self.is_accepting(next))
    }

    /// Returns `true` if the automaton accepts `word`.
    pub fn accepts(&self, word: impl IntoWord<C>) -> bool {
        word.collect_word()
            .iter()
            .try_fold(StateId::START, |id, &ch| self.state(id).get(ch))
            .is_some_and(|id| self.is_accepting(id))
    }

    /// All accepted words, in label order.
    pub fn words(&self) -> Vec<Vec<C>> {
        let mut words = Vec::new();
        let mut prefix = Vec::new();
        self.collect_words(StateId::START, &mut prefix, &mut words);
        words
    }

    fn collect_words(&self, id: StateId, prefix: &mut Vec<C>, words: &mut Vec<Vec<C>>) {
        if self.is_accepting(id) {
            words.push(prefix.clone());
        }
        for &(label, next) in self.state(id).transitions() {
            if let Label::Symbol(ch) = label {
                prefix.push(ch);
                self.collect_words(next, prefix, words);
                prefix.pop();
            }
        }
    }

    /// Structural equality: same acceptance and pairwise equal transitions
    /// with recursively equivalent targets.
    ///
    /// Terminates because the graph is acyclic.
    pub fn equivalent(&self, a: StateId, b: StateId) -> bool {
        if a == b {
            return true;
        }
        let (sa, sb) = (self.state(a), self.state(b));
        sa.is_final() == sb.is_final()
            && sa.transitions().len() == sb.transitions().len()
            && sa
                .transitions()
                .iter()
                .zip(sb.transitions())
                .all(|(&(la, ta), &(lb, tb))| la == lb && self.equivalent(ta, tb))
    }
}

impl<C: DawgChar> fmt::Debug for Builder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("mode", &self.config.mode)
            .field("live_states", &self.live_state_count())
            .field("registered", &self.register.len())
            .field("finish", &self.finish)
            .finish()
    }
}

/// Builds a finalized automaton from an iterator of words using minimizing insertion.
///
/// Words may come in any order; duplicates are ignored.
///
/// # Examples
///
/// ```
/// use dawg_fsa::dawg::builder::build_dawg;
///
/// let dawg = build_dawg(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(dawg.accepts("BANANA"));
/// assert!(!dawg.accepts("APRICOT"));
/// assert!(dawg.finish().is_some());
/// ```
pub fn build_dawg<C, W>(words: impl IntoIterator<Item = W>) -> Result<Builder<C>>
where
    C: DawgChar,
    W: IntoWord<C>,
{
    let mut builder = Builder::new();
    for word in words {
        builder.insert(word)?;
    }
    builder.make_single_final_state()?;
    Ok(builder)
}

/// Builds a finalized automaton from a line-oriented word stream.
///
/// Each line is one word with all whitespace removed; a blank line is the
/// empty word. Bytes that are not valid UTF-8 are replaced with
/// `U+FFFD`, so a stray Latin-1 line still becomes a word.
///
/// # Examples
///
/// ```
/// use dawg_fsa::dawg::builder::{build_dawg_from_reader, BuilderConfig};
///
/// let input = "b a t\ncat\n";
/// let dawg = build_dawg_from_reader(input.as_bytes(), BuilderConfig::default()).unwrap();
/// assert!(dawg.accepts("bat"));
/// assert!(dawg.accepts("cat"));
/// ```
pub fn build_dawg_from_reader<R: BufRead>(
    mut reader: R,
    config: BuilderConfig,
) -> std::result::Result<Builder<char>, LoadError> {
    let mut builder = Builder::with_config(config);
    let mut lines = 0usize;

    // read_until into one reused buffer instead of allocating per line.
    let mut buf = Vec::with_capacity(80);
    loop {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        let word = {
            let line = String::from_utf8_lossy(&buf);
            if matches!(line, Cow::Owned(_)) {
                warn!(line = lines + 1, "replaced invalid UTF-8 in input line");
            }
            normalize_line(&line)
        };
        builder.insert(word.as_str())?;
        lines += 1;
        buf.clear();
    }
    builder.make_single_final_state()?;
    debug!(lines, states = builder.live_state_count(), "built automaton");
    Ok(builder)
}
