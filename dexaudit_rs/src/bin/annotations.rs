//! Collect `@` annotations from the resource scripts and print them grouped.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dexaudit::annotations::{build_report, scan_directory, write_human, write_json};
use dexaudit::cli::{self, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "annotations")]
#[command(about = "Group @-annotations found in resource .js/.xml files")]
#[command(version)]
struct Args {
    /// Resource directory to scan (default: ../resources)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Annotation format: positioned, typed, or one declared in the config
    #[arg(long, value_name = "NAME")]
    format: Option<String>,

    /// Comma-separated file extensions to scan (default: js,xml)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    ext: Option<Vec<String>>,

    #[command(flatten)]
    common: CommonArgs,
}

fn run(args: Args) -> Result<()> {
    let config = args.common.load_config().annotations;
    let dir = args.dir.unwrap_or_else(|| config.resource_dir.clone());
    let extensions = args.ext.unwrap_or_else(|| config.extensions.clone());
    let format_name = args.format.unwrap_or_else(|| config.format.clone());

    let format = config.resolve_format(&format_name)?;
    let scan = scan_directory(&dir, &extensions, &format)
        .with_context(|| format!("scanning {}", dir.display()))?;
    let report = build_report(&format, scan.records);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.common.json {
        write_json(&report, &mut out)?;
    } else {
        write_human(&report, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(&args.common.log_level);
    cli::finish("annotations", run(args))
}
