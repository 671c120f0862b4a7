//! Command-line interface

/// Argument definitions.
pub mod args;
/// Subcommand implementations.
pub mod commands;

pub use args::{Cli, Commands, OutputFormat};

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `-v` flags win over `RUST_LOG`; without either only warnings are shown.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
