use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::ConfigError;
use clap::ValueEnum;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "127.0.0.1:8000";

/// Which lookup results end up in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
pub enum OutputPolicy {
    /// Every result, with a FOUND / NOT FOUND status column.
    #[default]
    #[serde(rename = "a", alias = "all")]
    #[value(name = "a", alias = "all")]
    All,
    /// Only hashes the server knows.
    #[serde(rename = "i", alias = "identified")]
    #[value(name = "i", alias = "identified")]
    IdentifiedOnly,
    /// Only hashes the server does not know.
    #[serde(rename = "u", alias = "unidentified")]
    #[value(name = "u", alias = "unidentified")]
    UnidentifiedOnly,
}

/// Optional run settings. Used both for the TOML config file and for the
/// values given on the command line, which are layered on top of it.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub server: Option<String>,
    pub format: Option<OutputPolicy>,
    pub batch_size: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill every unset field from `lower`.
    pub fn or(self, lower: Settings) -> Settings {
        Settings {
            server: self.server.or(lower.server),
            format: self.format.or(lower.format),
            batch_size: self.batch_size.or(lower.batch_size),
            timeout_ms: self.timeout_ms.or(lower.timeout_ms),
        }
    }
}

/// Validated configuration for one run. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `host:port` of the lookup server, without scheme.
    pub server: String,
    pub policy: OutputPolicy,
    pub batch_size: NonZeroUsize,
    /// Per-request timeout; `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl RunConfig {
    /// Apply defaults to `settings` and validate the result.
    pub fn resolve(input: PathBuf, output: PathBuf, settings: Settings) -> Result<Self, ConfigError> {
        if !input.exists() {
            return Err(ConfigError::MissingInput(input));
        }

        let server = settings
            .server
            .as_deref()
            .unwrap_or(DEFAULT_SERVER)
            .trim()
            .trim_end_matches('/')
            .to_string();
        if server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }

        let batch_size = NonZeroUsize::new(settings.batch_size.unwrap_or(DEFAULT_BATCH_SIZE))
            .ok_or(ConfigError::ZeroBatchSize)?;

        Ok(Self {
            input,
            output,
            server,
            policy: settings.format.unwrap_or_default(),
            batch_size,
            timeout: settings.timeout_ms.map(Duration::from_millis),
        })
    }

    pub fn bulk_url(&self) -> String {
        format!("http://{}/bulk", self.server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn existing_input() -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "abc").unwrap();
        f
    }

    #[test]
    fn test_config_parses() {
        let settings = Settings::load(Path::new("config.toml")).unwrap();
        assert_eq!(settings.server.as_deref(), Some("127.0.0.1:8000"));
        assert_eq!(settings.format, Some(OutputPolicy::All));
        assert_eq!(settings.batch_size, Some(1000));
    }

    #[test]
    fn test_defaults() {
        let input = existing_input();
        let config =
            RunConfig::resolve(input.path().to_path_buf(), "out.csv".into(), Settings::default())
                .unwrap();
        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.policy, OutputPolicy::All);
        assert_eq!(config.batch_size.get(), 1000);
        assert!(config.timeout.is_none());
        assert_eq!(config.bulk_url(), "http://127.0.0.1:8000/bulk");
    }

    #[test]
    fn test_layering_prefers_upper() {
        let cli = Settings {
            server: Some("10.0.0.5:9000".to_string()),
            ..Default::default()
        };
        let file = Settings {
            server: Some("nsrl.local:8000".to_string()),
            format: Some(OutputPolicy::UnidentifiedOnly),
            batch_size: Some(250),
            timeout_ms: None,
        };
        let merged = cli.or(file);
        assert_eq!(merged.server.as_deref(), Some("10.0.0.5:9000"));
        assert_eq!(merged.format, Some(OutputPolicy::UnidentifiedOnly));
        assert_eq!(merged.batch_size, Some(250));
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let input = existing_input();
        let settings = Settings {
            batch_size: Some(0),
            ..Default::default()
        };
        let err = RunConfig::resolve(input.path().to_path_buf(), "out.csv".into(), settings)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroBatchSize));
    }

    #[test]
    fn test_rejects_missing_input() {
        let err = RunConfig::resolve(
            "/definitely/not/here.txt".into(),
            "out.csv".into(),
            Settings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput(_)));
    }

    #[test]
    fn test_rejects_empty_server() {
        let input = existing_input();
        let settings = Settings {
            server: Some("  ".to_string()),
            ..Default::default()
        };
        let err = RunConfig::resolve(input.path().to_path_buf(), "out.csv".into(), settings)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyServer));
    }

    #[test]
    fn test_file_format_aliases() {
        let settings: Settings = toml::from_str("format = \"identified\"\ntimeout_ms = 2500").unwrap();
        assert_eq!(settings.format, Some(OutputPolicy::IdentifiedOnly));
        assert_eq!(settings.timeout_ms, Some(2500));

        let settings: Settings = toml::from_str("format = \"u\"").unwrap();
        assert_eq!(settings.format, Some(OutputPolicy::UnidentifiedOnly));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "sever = \"typo:8000\"").unwrap();
        let err = Settings::load(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFile { .. }));
    }
}
