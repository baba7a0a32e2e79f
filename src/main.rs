use anyhow::{Context, Result};
use clap::Parser;
use nsrl_client::cli::Cli;
use nsrl_client::error::RunError;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const APP_TITLE: &str = "NSRL Client";
const APP_NAME: &str = "nsrlc";

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nsrl_client=info,nsrlc=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(Mutex::new(file)))
                .init();
        }
        None => builder.with_writer(BoxMakeWriter::new(std::io::stderr)).init(),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    println!();
    println!("{} ({}) {}", APP_TITLE, APP_NAME, env!("CARGO_PKG_VERSION"));
    println!();

    match cli.execute().await {
        Ok(summary) => {
            println!(
                "  {} hashes in {} batches: {} found, {} not found, {} rows written to {}",
                summary.records,
                summary.batches,
                summary.found,
                summary.not_found,
                summary.rows_written,
                cli.output.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ RunError::Config(_)) => {
            tracing::error!(error = %e, "invalid configuration");
            Ok(ExitCode::from(e.exit_code()))
        }
        Err(e) => {
            tracing::error!(error = %e, "processing terminated due to an error");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
