use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::AuditConfig;

/// Flags every audit binary accepts.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Emit JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Config file (default: .dexaudit/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl CommonArgs {
    pub fn load_config(&self) -> AuditConfig {
        match &self.config {
            Some(path) => {
                if !path.exists() {
                    tracing::warn!("Config file {} not found, using defaults", path.display());
                }
                AuditConfig::load_from_path(path)
            }
            None => AuditConfig::load(Path::new(".")),
        }
    }
}

/// Logs go to stderr; stdout carries the report.
pub fn init_logging(log_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.parse().unwrap_or_default()),
        )
        .try_init();
}

/// Map a run result to the process exit code. A closed stdout (e.g. piping
/// into `head`) is not a failure.
pub fn finish(binary: &str, result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(binary, &e));
            ExitCode::FAILURE
        }
    }
}

/// `[<binary>] Error: <cause chain>`, as printed on stderr.
fn error_line(binary: &str, err: &anyhow::Error) -> String {
    format!("[{binary}] Error: {err:#}")
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
