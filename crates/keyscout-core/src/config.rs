//! # Configuration File Parser
//!
//! Reads and parses `keyscout.toml`, the optional configuration file that
//! tunes detection without CLI flags. Supports:
//!
//! - `[profile]` — categorical ratio and sampling sizes
//! - `[relationships]` — confidence threshold and worker count
//! - `[ingest]` — candidate delimiters and date parsing
//! - `[output]` — where relationship documents are written
//!
//! Example `keyscout.toml`:
//!
//! ```toml
//! [profile]
//! categorical_ratio = 0.1
//! pattern_sample_size = 100
//! sample_values = 5
//!
//! [relationships]
//! confidence_threshold = 0.8
//! workers = 4
//!
//! [ingest]
//! delimiters = [",", ";", "\t", "|"]
//! parse_dates = false
//!
//! [output]
//! dir = "outputs"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{KeyScoutError, Result};
use crate::ingest::IngestOptions;
use crate::relationship::engine::EngineOptions;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "keyscout.toml";

/// Top-level keyscout.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyScoutConfig {
    pub profile: ProfileConfig,
    pub relationships: RelationshipConfig,
    pub ingest: IngestConfig,
    pub output: OutputConfig,

    /// Directory containing keyscout.toml, so `output.dir` resolves against
    /// the file's location rather than the CWD.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Distinct/row ratio below which a string or int column is categorical.
    pub categorical_ratio: Option<f64>,
    /// How many leading non-null values feed pattern inference.
    pub pattern_sample_size: Option<usize>,
    /// How many example values each profile keeps.
    pub sample_values: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    /// Overlap ratio an edge must exceed.
    pub confidence_threshold: Option<f64>,
    /// Worker pool size (default: available cores).
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Single-character delimiters, tried in order.
    pub delimiters: Option<Vec<String>>,
    pub parse_dates: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

/// Read and parse a keyscout.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or validated.
pub fn read_config(dir: &Path) -> Result<Option<KeyScoutConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    read_config_file(&path).map(Some)
}

/// Read and validate a config file at an explicit path.
pub fn read_config_file(path: &Path) -> Result<KeyScoutConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KeyScoutError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config: KeyScoutConfig = toml::from_str(&content).map_err(|e| KeyScoutError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    let dir = path.parent().unwrap_or(Path::new("."));
    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));

    config.validate()?;

    Ok(config)
}

impl KeyScoutConfig {
    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(KeyScoutError::Config { message });

        if let Some(ratio) = self.profile.categorical_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return invalid(format!(
                    "profile.categorical_ratio must be in (0, 1], got {}",
                    ratio
                ));
            }
        }
        if self.profile.pattern_sample_size == Some(0) {
            return invalid("profile.pattern_sample_size must be at least 1".to_string());
        }
        if self.profile.sample_values == Some(0) {
            return invalid("profile.sample_values must be at least 1".to_string());
        }
        if let Some(threshold) = self.relationships.confidence_threshold {
            if !(0.0..1.0).contains(&threshold) {
                return invalid(format!(
                    "relationships.confidence_threshold must be in [0, 1), got {}",
                    threshold
                ));
            }
        }
        if self.relationships.workers == Some(0) {
            return invalid("relationships.workers must be at least 1".to_string());
        }
        if let Some(ref delimiters) = self.ingest.delimiters {
            if delimiters.is_empty() {
                return invalid("ingest.delimiters must not be empty".to_string());
            }
            for d in delimiters {
                if d.len() != 1 || !d.is_ascii() {
                    return invalid(format!(
                        "ingest.delimiters entry '{}' must be a single ASCII character",
                        d
                    ));
                }
            }
        }
        Ok(())
    }

    /// Engine options with file values layered over the defaults.
    pub fn engine_options(&self) -> EngineOptions {
        let mut options = EngineOptions::default();
        if let Some(ratio) = self.profile.categorical_ratio {
            options.profile.categorical_ratio = ratio;
        }
        if let Some(size) = self.profile.pattern_sample_size {
            options.profile.pattern_sample_size = size;
        }
        if let Some(n) = self.profile.sample_values {
            options.profile.sample_values = n;
        }
        if let Some(threshold) = self.relationships.confidence_threshold {
            options.foreign_keys.confidence_threshold = threshold;
        }
        options.workers = self.relationships.workers;
        options
    }

    /// Ingest options with file values layered over the defaults.
    ///
    /// Assumes [`validate`](Self::validate) has passed; malformed delimiter
    /// entries are logged and skipped.
    pub fn ingest_options(&self) -> IngestOptions {
        let mut options = IngestOptions::default();
        if let Some(ref delimiters) = self.ingest.delimiters {
            let parsed: Vec<u8> = delimiters
                .iter()
                .filter_map(|d| match d.as_bytes() {
                    [b] => Some(*b),
                    _ => {
                        tracing::warn!(
                            "Invalid ingest.delimiters entry: '{}'. Expected a single character. Ignoring.",
                            d
                        );
                        None
                    }
                })
                .collect();
            if !parsed.is_empty() {
                options.delimiters = parsed;
            }
        }
        if let Some(parse_dates) = self.ingest.parse_dates {
            options.parse_dates = parse_dates;
        }
        options
    }

    /// `output.dir`, resolved against the config file's directory.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.output.dir.as_ref()?;
        match self.config_dir {
            Some(ref base) if dir.is_relative() => Some(base.join(dir)),
            _ => Some(dir.clone()),
        }
    }
}
