// Property tests for the automaton builder: the automaton accepts exactly the
// inserted words, stays deterministic and acyclic, is minimal after every
// minimizing insertion, and its Carmel output lists every transition once.

use std::collections::{BTreeSet, HashSet};

use dawg_fsa::carmel::edges;
use dawg_fsa::dawg::{Builder, BuilderConfig, InsertMode, Label, StateId};
use proptest::prelude::*;

// ============================================================================
// HELPERS
// ============================================================================

fn builder(mode: InsertMode) -> Builder<char> {
    Builder::with_config(BuilderConfig {
        mode,
        ..BuilderConfig::default()
    })
}

fn build(mode: InsertMode, words: &[String]) -> Builder<char> {
    let mut b = builder(mode);
    for word in words {
        b.insert(word).unwrap();
    }
    b
}

fn language(b: &Builder<char>) -> BTreeSet<String> {
    b.words().into_iter().map(|w| w.into_iter().collect()).collect()
}

/// Number of states of the minimal automaton for `words`: one per distinct
/// set of suffixes that can follow a prefix of some word.
fn residual_classes(words: &BTreeSet<String>) -> usize {
    let mut prefixes: BTreeSet<String> = BTreeSet::from([String::new()]);
    for word in words {
        for (i, _) in word.char_indices() {
            prefixes.insert(word[..i].to_string());
        }
        prefixes.insert(word.clone());
    }
    let residuals: HashSet<BTreeSet<&str>> = prefixes
        .iter()
        .map(|u| {
            words
                .iter()
                .filter_map(|w| w.strip_prefix(u.as_str()))
                .collect()
        })
        .collect();
    residuals.len()
}

fn assert_acyclic(b: &Builder<char>) {
    // Depth-first search with an explicit on-stack set.
    fn visit(b: &Builder<char>, id: StateId, on_path: &mut Vec<StateId>, done: &mut HashSet<StateId>) {
        assert!(!on_path.contains(&id), "cycle through state {id}");
        if done.contains(&id) {
            return;
        }
        on_path.push(id);
        for &(_, next) in b.state(id).transitions() {
            visit(b, next, on_path, done);
        }
        on_path.pop();
        done.insert(id);
    }
    visit(b, b.start(), &mut Vec::new(), &mut HashSet::new());
}

fn assert_deterministic(b: &Builder<char>) {
    for id in b.reachable() {
        let labels: Vec<Label<char>> = b.state(id).transitions().iter().map(|&(l, _)| l).collect();
        assert!(labels.windows(2).all(|w| w[0] < w[1]), "state {id}: {labels:?}");
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Short words over a small alphabet, so that prefixes and suffixes collide often.
fn word_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{0,5}", 0..12)
}

fn mode() -> impl Strategy<Value = InsertMode> {
    prop_oneof![Just(InsertMode::Naive), Just(InsertMode::Minimal)]
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn accepts_exactly_the_inserted_words(words in word_list(), mode in mode(), probes in prop::collection::vec("[a-d]{0,6}", 0..20)) {
        let mut b = build(mode, &words);
        b.make_single_final_state().unwrap();
        let expected: BTreeSet<String> = words.iter().cloned().collect();
        prop_assert_eq!(language(&b), expected.clone());
        for word in &words {
            prop_assert!(b.accepts(word));
        }
        for probe in &probes {
            prop_assert_eq!(b.accepts(probe), expected.contains(probe));
        }
    }

    #[test]
    fn inserting_twice_is_inserting_once(words in word_list(), mode in mode()) {
        let once = build(mode, &words);
        let mut twice = build(mode, &words);
        for word in &words {
            prop_assert!(!twice.insert(word).unwrap());
        }
        prop_assert_eq!(once.live_state_count(), twice.live_state_count());
        prop_assert_eq!(language(&once), language(&twice));
    }

    #[test]
    fn stays_deterministic_and_acyclic(words in word_list(), mode in mode()) {
        let mut b = builder(mode);
        for word in &words {
            b.insert(word).unwrap();
            assert_deterministic(&b);
            assert_acyclic(&b);
        }
        b.make_single_final_state().unwrap();
        assert_deterministic(&b);
        assert_acyclic(&b);
    }

    #[test]
    fn minimal_after_every_insertion(words in word_list()) {
        let mut b = builder(InsertMode::Minimal);
        let mut inserted = BTreeSet::new();
        for word in &words {
            b.insert(word).unwrap();
            inserted.insert(word.clone());
            prop_assert_eq!(b.live_state_count(), residual_classes(&inserted));
        }
    }

    #[test]
    fn naive_never_smaller_than_minimal(words in word_list()) {
        let naive = build(InsertMode::Naive, &words);
        let minimal = build(InsertMode::Minimal, &words);
        prop_assert!(naive.live_state_count() >= minimal.live_state_count());
        prop_assert_eq!(language(&naive), language(&minimal));
    }

    #[test]
    fn every_transition_is_emitted_once(words in word_list(), mode in mode()) {
        let mut b = build(mode, &words);
        b.make_single_final_state().unwrap();
        let emitted = edges(&b);
        let unique: HashSet<_> = emitted.iter().map(|e| (e.from, e.to, e.label)).collect();
        prop_assert_eq!(unique.len(), emitted.len());

        let reachable: HashSet<_> = b
            .reachable()
            .into_iter()
            .flat_map(|id| b.state(id).transitions().iter().map(move |&(label, to)| (id, to, label)))
            .collect();
        prop_assert_eq!(unique, reachable);
    }

    #[test]
    fn insertion_order_does_not_change_the_result(words in word_list()) {
        let forward = build(InsertMode::Minimal, &words);
        let mut reversed_words = words.clone();
        reversed_words.reverse();
        let reversed = build(InsertMode::Minimal, &reversed_words);
        prop_assert_eq!(forward.live_state_count(), reversed.live_state_count());
        prop_assert_eq!(language(&forward), language(&reversed));
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn common_suffix_reached_by_different_prefixes_is_strictly_smaller() {
    let words: Vec<String> = ["bat", "cat", "rat"].map(String::from).to_vec();
    let naive = build(InsertMode::Naive, &words);
    let minimal = build(InsertMode::Minimal, &words);
    assert!(naive.live_state_count() > minimal.live_state_count());
}

#[test]
fn unsorted_input_with_confluence() {
    let words: Vec<String> = ["zy", "xy", "z", "xyy"].map(String::from).to_vec();
    let mut b = build(InsertMode::Minimal, &words);
    b.make_single_final_state().unwrap();
    assert!(b.accepts("xy"));
    assert!(b.accepts("zy"));
    assert!(b.accepts("z"));
    assert!(b.accepts("xyy"));
    assert!(!b.accepts("x"));
    assert!(!b.accepts("zyy"));
}
