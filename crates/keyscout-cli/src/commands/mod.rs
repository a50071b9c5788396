pub mod detect;
pub mod edit;
pub mod graph;
pub mod history;
pub mod profile;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use keyscout_core::config::{self, KeyScoutConfig};
use keyscout_core::ingest::{self, IngestOptions};
use keyscout_core::{EngineOptions, TableSet};

use crate::args::{InputArgs, TuningArgs};

/// Default directory for relationship documents.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Load `--config` if given, else `./keyscout.toml` if present.
pub fn load_config(path: Option<&Path>) -> Result<Option<KeyScoutConfig>> {
    match path {
        Some(path) => Ok(Some(config::read_config_file(path)?)),
        None => Ok(config::read_config(Path::new("."))?),
    }
}

/// Start a spinner on stderr for a long-running step.
pub fn spinner(prefix: &str, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} [{prefix}] {msg}")?);
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Ingest the input files. Fails when nothing could be loaded.
pub fn load_input(input: &InputArgs, config: Option<&KeyScoutConfig>) -> Result<TableSet> {
    let mut options = config
        .map(KeyScoutConfig::ingest_options)
        .unwrap_or_else(IngestOptions::default);
    if input.parse_dates {
        options.parse_dates = true;
    }

    let files = ingest::discover_files(&input.files)?;
    if files.is_empty() {
        bail!("No CSV files found in the given paths");
    }
    tracing::debug!("Resolved {} input files", files.len());

    let pb = spinner("load", "Reading files...")?;
    let tables = ingest::load_tables(&files, &options);
    pb.finish_with_message(format!(
        "Reading files... ✓ {} of {} loaded, {} columns",
        tables.len(),
        files.len(),
        tables.column_count()
    ));

    if tables.is_empty() {
        bail!("None of the {} input files could be loaded", files.len());
    }
    Ok(tables)
}

/// Engine options from the config file, with CLI flags taking precedence.
pub fn engine_options(config: Option<&KeyScoutConfig>, tuning: &TuningArgs) -> Result<EngineOptions> {
    let mut options = config
        .map(KeyScoutConfig::engine_options)
        .unwrap_or_default();

    if let Some(threshold) = tuning.threshold {
        if !(0.0..1.0).contains(&threshold) {
            bail!("--threshold must be in [0, 1), got {}", threshold);
        }
        options.foreign_keys.confidence_threshold = threshold;
    }
    if let Some(workers) = tuning.workers {
        if workers == 0 {
            bail!("--workers must be at least 1");
        }
        options.workers = Some(workers);
    }
    Ok(options)
}

/// Output directory from the flag (or env), else the config file.
pub fn output_dir(flag: Option<&Path>, config: Option<&KeyScoutConfig>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.and_then(KeyScoutConfig::output_dir))
}

/// Like [`output_dir`] but falls back to [`DEFAULT_OUTPUT_DIR`].
pub fn output_dir_or_default(flag: Option<&Path>, config: Option<&KeyScoutConfig>) -> PathBuf {
    output_dir(flag, config).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// Read a relationship list file for editing.
pub fn read_relationship_file(path: &Path) -> Result<Vec<keyscout_core::Relationship>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let relationships = keyscout_core::store::parse_relationships(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(relationships)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(threshold: Option<f64>, workers: Option<usize>) -> TuningArgs {
        TuningArgs { threshold, workers }
    }

    #[test]
    fn test_flags_override_config() {
        let config: KeyScoutConfig =
            toml_config("[relationships]\nconfidence_threshold = 0.7\nworkers = 2\n");
        let options = engine_options(Some(&config), &tuning(Some(0.9), None)).unwrap();
        assert_eq!(options.foreign_keys.confidence_threshold, 0.9);
        assert_eq!(options.workers, Some(2));
    }

    #[test]
    fn test_invalid_flags_rejected() {
        assert!(engine_options(None, &tuning(Some(1.0), None)).is_err());
        assert!(engine_options(None, &tuning(None, Some(0))).is_err());
    }

    #[test]
    fn test_output_dir_precedence() {
        let config = toml_config("[output]\ndir = \"from-config\"\n");
        assert_eq!(
            output_dir(Some(Path::new("flag")), Some(&config)),
            Some(PathBuf::from("flag"))
        );
        assert_eq!(
            output_dir(None, Some(&config)),
            Some(PathBuf::from("from-config"))
        );
        assert_eq!(output_dir(None, None), None);
        assert_eq!(output_dir_or_default(None, None), PathBuf::from("outputs"));
    }

    #[test]
    fn test_load_input_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        keyscout_testutil::write_ecommerce_csv(dir.path());
        let input = InputArgs {
            files: vec![dir.path().to_path_buf()],
            parse_dates: false,
        };
        let tables = load_input(&input, None).unwrap();
        assert_eq!(
            tables.names().collect::<Vec<_>>(),
            ["customers.csv", "orders.csv"]
        );
    }

    #[test]
    fn test_load_input_fails_when_nothing_loads() {
        let dir = tempfile::tempdir().unwrap();
        let input = InputArgs {
            files: vec![dir.path().to_path_buf()],
            parse_dates: false,
        };
        assert!(load_input(&input, None).is_err());
    }

    fn toml_config(content: &str) -> KeyScoutConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyscout.toml");
        std::fs::write(&path, content).unwrap();
        let mut config = config::read_config_file(&path).unwrap();
        config.config_dir = None;
        config
    }
}
