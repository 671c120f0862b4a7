//! dawg-fsa - build minimal word automata for the Carmel toolkit

use std::process;

use clap::Parser;

use dawg_fsa::cli::{commands, init_logging, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::execute(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
