//! Check that the moves of each species in species.xml match moves in moves.xml.
//!
//! Useful for finding capitalization errors and misspellings.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dexaudit::cli::{self, CommonArgs};
use dexaudit::moves::{Mismatch, MoveSet, find_mismatches};
use dexaudit::xml_tree::Document;

#[derive(Parser, Debug)]
#[command(name = "check-moves")]
#[command(about = "Report species moves that match no move declared in moves.xml")]
#[command(version)]
struct Args {
    /// Moves document (default: moves.xml)
    #[arg(long, value_name = "PATH")]
    moves: Option<PathBuf>,

    /// Species document (default: species.xml)
    #[arg(long, value_name = "PATH")]
    species: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

fn run(args: Args) -> Result<()> {
    let config = args.common.load_config();
    let moves_path = args.moves.unwrap_or(config.moves.moves);
    let species_path = args.species.unwrap_or(config.moves.species);

    let moves = MoveSet::load(&moves_path)
        .with_context(|| format!("loading move names from {}", moves_path.display()))?;
    let species = Document::load(&species_path)
        .with_context(|| format!("loading species from {}", species_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;

    if args.common.json {
        let all = find_mismatches(&species, &moves)
            .collect::<Result<Vec<Mismatch>, _>>()
            .context("resolving move owners")?;
        count = all.len();
        serde_json::to_writer_pretty(&mut out, &all)?;
        writeln!(out)?;
    } else {
        for mismatch in find_mismatches(&species, &moves) {
            let mismatch = mismatch.context("resolving move owner")?;
            writeln!(out, "{mismatch}")?;
            count += 1;
        }
    }
    out.flush()?;

    info!("{} unknown move reference(s)", count);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(&args.common.log_level);
    cli::finish("check-moves", run(args))
}
