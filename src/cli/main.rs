//! svm-validate: run the submission validators over a payload file

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Validate SVM submission payloads
#[derive(Parser, Debug)]
#[command(name = "svm-validate", version, about)]
struct Cli {
    /// Validator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schema directory, overriding `schema_dir` from the configuration
    #[arg(short, long)]
    schemas: Option<PathBuf>,

    /// Which part of the payload to validate
    #[arg(value_enum)]
    target: Target,

    /// Payload file, or '-' for stdin
    payload: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Settings,
    Dataset,
    Uploads,
    All,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let passed = commands::handle_validate(
        cli.config.as_deref(),
        cli.schemas,
        cli.target,
        &cli.payload,
    )?;

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
