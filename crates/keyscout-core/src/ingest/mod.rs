//! # Ingestion
//!
//! Turns files on disk into a [`TableSet`](crate::table::TableSet). Only
//! delimited text is supported; each file becomes one table named after the
//! file.

pub mod csv;

use std::path::{Path, PathBuf};

pub use self::csv::{is_supported_file, load_csv, load_tables, IngestOptions, DEFAULT_DELIMITERS};

/// Expand directories into the supported files they directly contain.
///
/// Files are passed through untouched; directory entries are sorted by name
/// so the resulting table order is stable.
pub fn discover_files<P: AsRef<Path>>(paths: &[P]) -> crate::error::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            files.push(path.to_path_buf());
            continue;
        }

        let entries = std::fs::read_dir(path).map_err(|e| crate::error::KeyScoutError::Io {
            message: format!("Failed to list {}", path.display()),
            source: e,
        })?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_supported_file(p))
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_files_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "x\n1\n").unwrap();
        std::fs::write(dir.path().join("a.csv"), "x\n1\n").unwrap();
        std::fs::write(dir.path().join("readme.md"), "hi").unwrap();
        let explicit = PathBuf::from("elsewhere/c.csv");

        let files = discover_files(&[dir.path().to_path_buf(), explicit.clone()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.csv"), dir.path().join("b.csv"), explicit]
        );
    }
}
