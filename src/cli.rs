use crate::config::{OutputPolicy, RunConfig, Settings};
use crate::error::{ConfigError, RunError};
use crate::pipeline::{self, RunSummary};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nsrlc", version, about = "Look up file hashes against an NSRL server")]
pub struct Cli {
    #[arg(short, long, help = "Input file path, one hash per line")]
    pub input: PathBuf,
    #[arg(short, long, help = "Output file path")]
    pub output: PathBuf,
    #[arg(
        short,
        long,
        value_enum,
        help = "Output format: i (identified), u (unidentified) or a (all) [default: a]"
    )]
    pub format: Option<OutputPolicy>,
    #[arg(short, long, help = "NSRL server host:port [default: 127.0.0.1:8000]")]
    pub server: Option<String>,
    #[arg(short, long, help = "Hashes per request [default: 1000]")]
    pub batch_size: Option<usize>,
    #[arg(long, help = "Per-request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,
    #[arg(short, long, help = "TOML file with default settings")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Write logs to this file instead of stderr")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            server: self.server.clone(),
            format: self.format,
            batch_size: self.batch_size,
            timeout_ms: self.timeout_ms,
        }
    }

    /// Layer flags over the config file (if any) and validate.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        RunConfig::resolve(
            self.input.clone(),
            self.output.clone(),
            self.settings().or(file),
        )
    }

    /// Resolve the configuration and run the pipeline to completion.
    pub async fn execute(&self) -> Result<RunSummary, RunError> {
        let config = self.run_config()?;
        tracing::debug!(?config, "configuration resolved");
        Ok(pipeline::run_files(&config).await?)
    }
}
