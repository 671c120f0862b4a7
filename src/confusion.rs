//! Typo model for a Carmel transducer cascade.
//!
//! A three-state weighted transducer over the 26 capital letters: state 0
//! reads a letter and echoes it into state 1, state 1 either echoes a second
//! letter into state 2 or returns to 0 on epsilon, and state 2 replaces its
//! letter with one of the neighbouring keys, each neighbour equally likely.
//! The automaton builder does not use this model; both write the same
//! bracketed text convention.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::carmel::EPSILON;

/// Letters of the model, in output order.
pub const ALPHABET: &str = "AEIOBCDFGHJKLMNPQRSTUVWXYZ";

/// Keyboard rows, each shifted half a key right of the one above.
pub const KEYBOARD: [&str; 3] = ["QWERTYUIOP[", "ASDFGHJKL;", "ZXCVBNM,."];

/// Weight of the transitions that copy a letter unchanged.
pub const LITERAL_WEIGHT: f64 = 1.0;

/// Symbol standing for any character outside the alphabet.
pub const WILDCARD: char = '_';

/// Letters adjacent to `key` on the keyboard, sorted.
///
/// Left, right, the two keys below and the key above count as neighbours;
/// punctuation keys are dropped. Returns an empty list for keys that are not
/// on the keyboard.
pub fn neighbours(key: char) -> Vec<char> {
    let rows: Vec<Vec<char>> = KEYBOARD.iter().map(|row| row.chars().collect()).collect();
    let Some((i, j)) = rows
        .iter()
        .enumerate()
        .find_map(|(i, row)| row.iter().position(|&c| c == key).map(|j| (i, j)))
    else {
        return Vec::new();
    };

    let row = &rows[i];
    let mut keys = Vec::with_capacity(5);
    if j > 0 {
        keys.push(row[j - 1]);
    }
    keys.extend(row.get(j + 1));
    if let Some(below) = rows.get(i + 1) {
        keys.extend(below.get(j));
        if j > 0 {
            keys.extend(below.get(j - 1));
        }
    }
    if i > 0 {
        keys.extend(rows[i - 1].get(j));
    }

    keys.into_iter()
        .filter(|c| ALPHABET.contains(*c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Writes the typo model in Carmel transducer format.
pub fn write_model<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "0")?;

    for ch in ALPHABET.chars().chain([WILDCARD]) {
        writeln!(out, "(0 (1 \"{ch}\" \"{ch}\" {LITERAL_WEIGHT:.1}))")?;
    }

    for ch in ALPHABET.chars().chain([WILDCARD]) {
        writeln!(out, "(1 (2 \"{ch}\" \"{ch}\" {LITERAL_WEIGHT:.1}))")?;
    }
    writeln!(out, "(1 (0 {EPSILON} {EPSILON}))")?;

    for ch in ALPHABET.chars() {
        let typos = neighbours(ch);
        if typos.is_empty() {
            continue;
        }
        let weight = 1.0 / typos.len() as f64;
        for typo in typos {
            writeln!(out, "(2 (0 \"{ch}\" \"{typo}\" {weight:.4}))")?;
        }
    }
    writeln!(out, "(2 (0 \"{WILDCARD}\" \"V\"))")?;
    out.flush()
}
