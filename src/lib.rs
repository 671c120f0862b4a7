//! # dawg-fsa
//!
//! Incremental construction of a minimal
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (deterministic acyclic finite-state automaton) from an unsorted word list,
//! and output in the bracketed text format read by the Carmel finite-state
//! toolkit.
//!
//! Words can be inserted in any order. The minimizing builder follows the
//! algorithm for unsorted data in
//! [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1): states that
//! several paths share are cloned before a new word changes them, and new
//! suffixes are merged into equivalent states found in a register.
//!
//! ## Quick Start
//!
//! ```
//! use dawg_fsa::carmel::write_carmel;
//! use dawg_fsa::dawg::build_dawg;
//!
//! let dawg = build_dawg(["bat", "cat", "rat"]).unwrap();
//! assert!(dawg.accepts("cat"));
//! assert!(!dawg.accepts("at"));
//!
//! let mut out = Vec::new();
//! write_carmel(&dawg, &mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert_eq!(text.lines().next(), Some(dawg.finish().unwrap().to_string().as_str()));
//! ```
//!
//! ## Naive insertion
//!
//! A plain trie, without suffix sharing, is available for comparison:
//!
//! ```
//! use dawg_fsa::dawg::{Builder, BuilderConfig, InsertMode};
//!
//! let config = BuilderConfig { mode: InsertMode::Naive, ..BuilderConfig::default() };
//! let mut trie = Builder::with_config(config);
//! let mut dawg = Builder::new();
//! for word in ["bat", "cat", "rat"] {
//!     trie.insert(word).unwrap();
//!     dawg.insert(word).unwrap();
//! }
//! assert!(trie.live_state_count() > dawg.live_state_count());
//! ```

#![warn(missing_docs)]

/// Carmel-format serializer and a readable dump of the automaton.
pub mod carmel;
/// Command line interface.
pub mod cli;
/// Keyboard-adjacency typo model.
pub mod confusion;
/// Automaton data structure and builder.
pub mod dawg;
