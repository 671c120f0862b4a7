//! Output of a finished automaton.
//!
//! The Carmel format is one header line naming the final state, followed by
//! one line per transition:
//!
//! ```text
//! 4
//! (0 (1 "c"))
//! (3 (4 *e*))
//! ```

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io::{self, Write};

use hashbrown::HashSet;
use thiserror::Error;

use crate::dawg::{Builder, DawgChar, Label, StateId};

/// Marker written in place of a symbol on epsilon transitions.
pub const EPSILON: &str = "*e*";

/// Errors from writing an automaton.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Carmel output names a single final state, which only exists after finalization.
    #[error("automaton has not been finalized")]
    NotFinalized,

    /// Writing to the output failed.
    #[error("failed to write automaton")]
    Io(#[from] io::Error),
}

/// One transition of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge<C: DawgChar> {
    /// Source state.
    pub from: StateId,
    /// Target state.
    pub to: StateId,
    /// Transition label.
    pub label: Label<C>,
}

impl<C: DawgChar> Edge<C> {
    /// Formats the edge as one Carmel line, without the newline.
    pub fn to_carmel(&self) -> String {
        match self.label {
            Label::Symbol(ch) => format!("({} ({} {}))", self.from, self.to, quote(ch)),
            Label::Epsilon => format!("({} ({} {EPSILON}))", self.from, self.to),
        }
    }
}

/// Wraps a symbol in double quotes, escaping `"` and `\`.
fn quote<C: DawgChar>(symbol: C) -> String {
    let text = symbol.to_string();
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Every transition reachable from the start state, each exactly once.
///
/// Breadth-first from the start state. A state reached over several edges
/// is revisited, so emitted edges are remembered by `(from, to, label)`.
pub fn edges<C: DawgChar>(dawg: &Builder<C>) -> Vec<Edge<C>> {
    let mut printed = HashSet::new();
    let mut edges = Vec::new();
    let mut queue = VecDeque::from([dawg.start()]);
    while let Some(id) = queue.pop_front() {
        for &(label, to) in dawg.state(id).transitions() {
            let edge = Edge { from: id, to, label };
            if printed.insert(edge) {
                edges.push(edge);
                queue.push_back(to);
            }
        }
    }
    edges
}

/// Writes a finalized automaton in Carmel format.
///
/// # Errors
///
/// [`WriteError::NotFinalized`] if
/// [`make_single_final_state`](Builder::make_single_final_state) has not run.
pub fn write_carmel<C: DawgChar, W: Write>(dawg: &Builder<C>, out: &mut W) -> Result<(), WriteError> {
    let finish = dawg.finish().ok_or(WriteError::NotFinalized)?;
    writeln!(out, "{finish}")?;
    for edge in edges(dawg) {
        writeln!(out, "{}", edge.to_carmel())?;
    }
    out.flush()?;
    Ok(())
}

/// Renders the automaton as `from -label-> to` lines, breadth-first.
///
/// Accepting targets are shown in parentheses. Works before and after
/// finalization.
pub fn pretty<C: DawgChar>(dawg: &Builder<C>) -> String {
    let mut text = String::new();
    for edge in edges(dawg) {
        let label = edge
            .label
            .symbol()
            .map_or_else(|| EPSILON.to_string(), |ch| ch.to_string());
        // Writing to a String cannot fail.
        let _ = if dawg.state(edge.to).is_final() {
            writeln!(text, "{}  -{}-> ({})", edge.from, label, edge.to)
        } else {
            writeln!(text, "{}  -{}->  {}", edge.from, label, edge.to)
        };
    }
    text
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::build_dawg;

    fn carmel(dawg: &Builder<char>) -> String {
        let mut out = Vec::new();
        write_carmel(dawg, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn single_word() {
        let dawg = build_dawg(["ab"]).unwrap();
        assert_eq!(carmel(&dawg), "3\n(0 (1 \"a\"))\n(1 (2 \"b\"))\n(2 (3 *e*))\n");
    }

    #[test]
    fn empty_word_is_epsilon_from_start() {
        let dawg = build_dawg([""]).unwrap();
        assert_eq!(carmel(&dawg), "1\n(0 (1 *e*))\n");
    }

    #[test]
    fn no_words_has_only_the_header() {
        let dawg = build_dawg::<char, &str>([]).unwrap();
        assert_eq!(carmel(&dawg), "1\n");
    }

    #[test]
    fn shared_states_emit_each_edge_once() {
        let dawg = build_dawg(["bat", "cat", "rat"]).unwrap();
        let text = carmel(&dawg);
        let lines: Vec<_> = text.lines().skip(1).collect();
        // b, c, r into the shared state, then a, t, epsilon.
        assert_eq!(lines.len(), 6);
        let unique: HashSet<_> = lines.iter().collect();
        assert_eq!(unique.len(), lines.len());
        assert_eq!(lines.len(), dawg.transition_count());
    }

    #[test]
    fn symbols_are_escaped() {
        let dawg = build_dawg(["a\"\\"]).unwrap();
        let text = carmel(&dawg);
        assert!(text.contains(r#"(1 (2 "\""))"#), "{text}");
        assert!(text.contains(r#"(2 (3 "\\"))"#), "{text}");
    }

    #[test]
    fn unfinalized_automaton_is_rejected() {
        let mut dawg = Builder::new();
        dawg.insert("a").unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_carmel(&dawg, &mut out),
            Err(WriteError::NotFinalized)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn pretty_marks_accepting_targets() {
        let mut dawg = Builder::new();
        dawg.insert("ab").unwrap();
        assert_eq!(pretty(&dawg), "0  -a->  1\n1  -b-> (2)\n");
    }
}
