//! Example: building an automaton from unsorted words and printing it.
//!
//! Shows the difference between naive trie insertion and minimizing
//! insertion, then writes the minimal automaton in Carmel format.
//!
//! Run with: cargo run --example wordlist

use std::io;

use dawg_fsa::carmel::{pretty, write_carmel};
use dawg_fsa::dawg::{Builder, BuilderConfig, InsertMode};

fn build(mode: InsertMode, words: &[&str]) -> Builder<char> {
    let mut builder = Builder::with_config(BuilderConfig {
        mode,
        ..BuilderConfig::default()
    });
    for word in words {
        builder.insert(*word).unwrap();
    }
    builder
}

fn main() {
    // Deliberately unsorted; the builder does not need sorted input.
    let words = ["CAKED", "BAKE", "LAKE", "BAKED", "CAKE", "FAKE", "BAKER"];

    let trie = build(InsertMode::Naive, &words);
    let mut dawg = build(InsertMode::Minimal, &words);
    println!("Naive trie:    {} states", trie.live_state_count());
    println!("Minimal DAWG:  {} states", dawg.live_state_count());

    println!("\nWord lookup:");
    for word in ["BAKE", "BAKER", "BAKES", "CAKED", "LAKED", "MAKE"] {
        println!("  {word}: {}", if dawg.accepts(word) { "yes" } else { "no" });
    }

    println!("\nTransitions:\n{}", pretty(&dawg));

    dawg.make_single_final_state().unwrap();
    println!("Carmel:");
    write_carmel(&dawg, &mut io::stdout().lock()).unwrap();
}
