//! Resolver CLI entry point

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tangle_core::{DEFAULT_REPORT_FILE, ResolverError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "resolver")]
#[command(
    about = "Detect and propose fixes for dependency conflicts in a mixed-language project",
    long_about = None
)]
struct Cli {
    /// Project root to analyze
    project_path: PathBuf,

    /// Where to write the JSON report
    #[arg(default_value = DEFAULT_REPORT_FILE)]
    output_file: PathBuf,

    /// Config file (defaults to tangle.toml or .tangle.yaml in the project root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "resolver={0},tangle_core={0},tangle_indexer={0}",
            log_level
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Resolver v{}", env!("CARGO_PKG_VERSION"));

    match commands::resolve(cli.project_path, cli.output_file, cli.config).await {
        Ok(passed) => Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE }),
        Err(e) if is_timeout(&e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {:#}", e);
            // Dropping the runtime would wait on the still-running blocking task
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn is_timeout(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<ResolverError>(), Some(ResolverError::Timeout { .. }))
}
