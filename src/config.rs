//! Pipeline configuration
//!
//! A run is fully described by a `PipelineConfig`, loaded from YAML and
//! optionally overridden from the command line. The config object is
//! passed into the pipeline by construction; nothing is stashed in the
//! process environment.

use crate::error::{Error, Result};
use crate::output::ParquetWriterConfig;
use crate::storage::Glob;
use crate::types::{ParquetCompression, SongplayIdStrategy, TimeZoneSetting};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default glob for song metadata files, relative to the input root
pub const DEFAULT_SONG_GLOB: &str = "song_data/*/*/*/*.json";

/// Default glob for activity log files, relative to the input root
pub const DEFAULT_LOG_GLOB: &str = "log_data/*/*/*.json";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input root URL (e.g. `s3a://udacity-dend/`)
    #[serde(default)]
    pub input: String,

    /// Output root URL (e.g. `s3://my-bucket/lake/`)
    #[serde(default)]
    pub output: String,

    /// Song dataset glob, relative to `input`
    #[serde(default = "default_song_glob")]
    pub song_glob: String,

    /// Log dataset glob, relative to `input`
    #[serde(default = "default_log_glob")]
    pub log_glob: String,

    /// Zone used to render event timestamps
    #[serde(default)]
    pub time_zone: TimeZoneSetting,

    /// How `songplay_id` values are generated
    #[serde(default)]
    pub songplay_id: SongplayIdStrategy,

    /// Object store credentials (never serialized back out)
    #[serde(default, skip_serializing)]
    pub credentials: Credentials,

    /// Parquet output settings
    #[serde(default)]
    pub parquet: ParquetSettings,
}

fn default_song_glob() -> String {
    DEFAULT_SONG_GLOB.to_string()
}

fn default_log_glob() -> String {
    DEFAULT_LOG_GLOB.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            song_glob: default_song_glob(),
            log_glob: default_log_glob(),
            time_zone: TimeZoneSetting::default(),
            songplay_id: SongplayIdStrategy::default(),
            credentials: Credentials::default(),
            parquet: ParquetSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a config for the given roots with default settings
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Load a config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Set the time zone
    #[must_use]
    pub fn with_time_zone(mut self, zone: TimeZoneSetting) -> Self {
        self.time_zone = zone;
        self
    }

    /// Set the songplay id strategy
    #[must_use]
    pub fn with_songplay_id(mut self, strategy: SongplayIdStrategy) -> Self {
        self.songplay_id = strategy;
        self
    }

    /// Check that the config describes a runnable pipeline
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(Error::missing_field("input"));
        }
        if self.output.trim().is_empty() {
            return Err(Error::missing_field("output"));
        }
        if self.input.trim_end_matches('/') == self.output.trim_end_matches('/') {
            return Err(Error::invalid_value(
                "output",
                "must differ from input, output tables are overwritten",
            ));
        }
        self.song_glob()?;
        self.log_glob()?;
        if self.parquet.row_group_size == 0 {
            return Err(Error::invalid_value(
                "parquet.row_group_size",
                "must be greater than zero",
            ));
        }
        if self.credentials.aws_access_key_id.is_some()
            != self.credentials.aws_secret_access_key.is_some()
        {
            return Err(Error::invalid_value(
                "credentials",
                "aws_access_key_id and aws_secret_access_key must be set together",
            ));
        }
        Ok(())
    }

    /// Compiled song dataset glob
    pub fn song_glob(&self) -> Result<Glob> {
        Glob::new(&self.song_glob)
    }

    /// Compiled log dataset glob
    pub fn log_glob(&self) -> Result<Glob> {
        Glob::new(&self.log_glob)
    }

    /// Parquet writer settings
    pub fn writer_config(&self) -> ParquetWriterConfig {
        ParquetWriterConfig::from(&self.parquet)
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Object store credentials
///
/// Any field left unset falls back to the standard environment variables
/// read by the object store builders (`AWS_ACCESS_KEY_ID`, ...).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, alias = "AWS_ACCESS_KEY_ID")]
    pub aws_access_key_id: Option<String>,

    #[serde(default, alias = "AWS_SECRET_ACCESS_KEY")]
    pub aws_secret_access_key: Option<String>,

    #[serde(default)]
    pub aws_session_token: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("aws_access_key_id", &mask(&self.aws_access_key_id))
            .field("aws_secret_access_key", &mask(&self.aws_secret_access_key))
            .field("aws_session_token", &mask(&self.aws_session_token))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Parquet Settings
// ============================================================================

/// Parquet output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetSettings {
    #[serde(default)]
    pub compression: ParquetCompression,

    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

impl Default for ParquetSettings {
    fn default() -> Self {
        Self {
            compression: ParquetCompression::default(),
            row_group_size: default_row_group_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_yaml_defaults() {
        let config = PipelineConfig::from_yaml(
            r"
input: s3a://udacity-dend/
output: s3a://dend-bucket/
",
        )
        .unwrap();

        assert_eq!(config.song_glob, DEFAULT_SONG_GLOB);
        assert_eq!(config.log_glob, DEFAULT_LOG_GLOB);
        assert_eq!(config.time_zone, TimeZoneSetting::Local);
        assert_eq!(config.songplay_id, SongplayIdStrategy::Monotonic);
        assert_eq!(config.parquet, ParquetSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_full() {
        let config = PipelineConfig::from_yaml(
            r"
input: /data/raw
output: /data/lake
song_glob: songs/*.json
log_glob: logs/**/*.json
time_zone: '+01:00'
songplay_id: content_hash
credentials:
  AWS_ACCESS_KEY_ID: AKID
  AWS_SECRET_ACCESS_KEY: secret
  region: us-west-2
parquet:
  compression: zstd
  row_group_size: 5000
",
        )
        .unwrap();

        assert_eq!(config.song_glob, "songs/*.json");
        assert_eq!(config.time_zone.to_string(), "+01:00");
        assert_eq!(config.songplay_id, SongplayIdStrategy::ContentHash);
        assert_eq!(config.credentials.aws_access_key_id.as_deref(), Some("AKID"));
        assert_eq!(config.parquet.compression, ParquetCompression::Zstd);
        assert_eq!(config.parquet.row_group_size, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_roots() {
        let err = PipelineConfig::new("", "/out").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "input"));

        let err = PipelineConfig::new("/in", " ").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "output"));
    }

    #[test]
    fn test_validate_rejects_same_roots() {
        let err = PipelineConfig::new("s3://b/x/", "s3://b/x")
            .validate()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = PipelineConfig::new("/in", "/out");
        config.log_glob = "log_data/[2018/*.json".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidGlob { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_half_credentials() {
        let mut config = PipelineConfig::new("/in", "/out");
        config.credentials.aws_access_key_id = Some("AKID".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_masks_secrets() {
        let credentials = Credentials {
            aws_access_key_id: Some("AKID".to_string()),
            aws_secret_access_key: Some("topsecret".to_string()),
            ..Credentials::default()
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("topsecret"));
        assert!(!rendered.contains("AKID"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
