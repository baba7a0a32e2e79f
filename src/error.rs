//! Error types for each layer of the client.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems found while turning command-line flags and the optional config
/// file into a [`RunConfig`](crate::config::RunConfig). Nothing has been read
/// or sent when one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("input file does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("server address must not be empty")]
    EmptyServer,

    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a single bulk lookup. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection refused, timeout, DNS failure or a broken response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than 200.
    #[error("server returned status {0}")]
    BadStatus(u16),

    /// The 200 body was not a JSON array of `{hash, exists}` objects.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The echoed hashes differ from the submitted batch.
    #[error(
        "response does not match batch: {missing} missing, {unexpected} unexpected, \
         {repeated} repeated (e.g. {sample})"
    )]
    Mismatch {
        missing: usize,
        unexpected: usize,
        repeated: usize,
        sample: String,
    },
}

impl LookupError {
    /// Short name of the error kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::BadStatus(_) => "bad_status",
            Self::Decode(_) => "decode",
            Self::Mismatch { .. } => "mismatch",
        }
    }
}

/// Anything that stops the pipeline before it reaches completion.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    #[error("batch {batch} failed: {source}")]
    Lookup {
        batch: usize,
        #[source]
        source: LookupError,
    },

    /// Building the shared HTTP client failed before any batch was sent.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Why a whole `nsrlc` invocation failed, after clap accepted the flags.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl RunError {
    /// Process exit status: 2 for bad settings (nothing was processed), 1 for
    /// a run that started and failed.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Pipeline(_) => 1,
        }
    }
}
