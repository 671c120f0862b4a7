//! CLI argument definitions

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::dawg::InsertMode;

/// Top-level command line.
#[derive(Parser)]
#[command(name = "dawg-fsa")]
#[command(about = "Build minimal word automata for the Carmel toolkit")]
#[command(version)]
pub struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build an automaton from a word list, one word per line
    Build {
        /// Word list (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Insertion algorithm
        #[arg(short, long, default_value = "minimal")]
        mode: InsertMode,

        /// Output format
        #[arg(short, long, default_value = "carmel")]
        format: OutputFormat,

        /// Skip the cycle check on new transitions
        #[arg(long)]
        no_verify: bool,
    },

    /// Write the keyboard typo model
    Typos {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// How `build` writes the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header line with the final state, then one bracketed line per transition
    Carmel,
    /// Readable `from -label-> to` listing
    Pretty,
}
