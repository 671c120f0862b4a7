//! Command implementations

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::args::{Commands, OutputFormat};
use crate::carmel::{pretty, write_carmel};
use crate::confusion::write_model;
use crate::dawg::{build_dawg_from_reader, BuilderConfig, InsertMode};

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            input,
            output,
            mode,
            format,
            no_verify,
        } => build(input, output, mode, format, no_verify),
        Commands::Typos { output } => typos(output.as_deref()),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn build(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    mode: InsertMode,
    format: OutputFormat,
    no_verify: bool,
) -> Result<()> {
    let config = BuilderConfig {
        mode,
        verify_acyclic: !no_verify,
    };
    let dawg = match &input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            build_dawg_from_reader(BufReader::new(file), config)
        }
        None => build_dawg_from_reader(io::stdin().lock(), config),
    }
    .context("building automaton")?;

    info!(
        %mode,
        states = dawg.live_state_count(),
        transitions = dawg.transition_count(),
        "automaton built"
    );

    let mut out = open_output(output.as_deref())?;
    match format {
        OutputFormat::Carmel => write_carmel(&dawg, &mut out)?,
        OutputFormat::Pretty => {
            out.write_all(pretty(&dawg).as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

fn typos(output: Option<&Path>) -> Result<()> {
    let mut out = open_output(output)?;
    write_model(&mut out).context("writing typo model")?;
    info!("typo model written");
    Ok(())
}
