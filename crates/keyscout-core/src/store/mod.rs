//! # Relationship Store
//!
//! Persists relationship lists as JSON documents in an output directory:
//!
//! - `initial_relationships.json`: what detection produced
//! - `edited_model.json`: the list after user review
//!
//! Readers prefer the edited document and fall back to the initial one.
//! Edited lists are stored as given; nothing re-checks them against data.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use self::types::{DocumentVersion, RelationshipDocument, VersionEntry};
use crate::error::{KeyScoutError, Result};
use crate::relationship::types::Relationship;

pub const INITIAL_FILE_NAME: &str = "initial_relationships.json";
pub const EDITED_FILE_NAME: &str = "edited_model.json";

/// Relationship documents rooted at one output directory.
#[derive(Debug, Clone)]
pub struct RelationshipStore {
    dir: PathBuf,
}

impl RelationshipStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, version: DocumentVersion) -> PathBuf {
        match version {
            DocumentVersion::Initial => self.dir.join(INITIAL_FILE_NAME),
            DocumentVersion::Edited => self.dir.join(EDITED_FILE_NAME),
        }
    }

    pub fn save_initial(&self, relationships: &[Relationship]) -> Result<PathBuf> {
        self.save(&RelationshipDocument::initial(relationships.to_vec()))
    }

    pub fn save_edited(&self, relationships: &[Relationship]) -> Result<PathBuf> {
        self.save(&RelationshipDocument::edited(relationships.to_vec()))
    }

    /// Relationships from the initial document, if one exists.
    pub fn load_initial(&self) -> Result<Option<Vec<Relationship>>> {
        Ok(self
            .read(DocumentVersion::Initial)?
            .map(|doc| doc.relationships))
    }

    /// Relationships from the edited document, else the initial one.
    pub fn load_edited(&self) -> Result<Option<Vec<Relationship>>> {
        match self.read(DocumentVersion::Edited)? {
            Some(doc) => Ok(Some(doc.relationships)),
            None => self.load_initial(),
        }
    }

    /// One entry per document on disk, initial first.
    pub fn history(&self) -> Result<Vec<VersionEntry>> {
        let mut entries = Vec::new();
        for version in [DocumentVersion::Initial, DocumentVersion::Edited] {
            if let Some(doc) = self.read(version)? {
                entries.push(VersionEntry::from(&doc));
            }
        }
        Ok(entries)
    }

    /// Write a document atomically: temp file in the same directory, then
    /// rename into place.
    fn save(&self, doc: &RelationshipDocument) -> Result<PathBuf> {
        use std::io::Write;

        let path = self.path_for(doc.version);
        let json = serde_json::to_string_pretty(doc).map_err(|e| KeyScoutError::Store {
            message: format!("Failed to serialize {} relationships: {}", doc.version, e),
        })?;

        fs::create_dir_all(&self.dir).map_err(|e| KeyScoutError::Io {
            message: format!("Failed to create output directory {}", self.dir.display()),
            source: e,
        })?;

        let tmp_path = self.dir.join(format!(".{}.tmp", doc.version));
        let mut file = fs::File::create(&tmp_path).map_err(|e| KeyScoutError::Io {
            message: format!("Failed to create temp file at {}", tmp_path.display()),
            source: e,
        })?;
        file.write_all(json.as_bytes()).map_err(|e| KeyScoutError::Io {
            message: format!("Failed to write temp file at {}", tmp_path.display()),
            source: e,
        })?;
        file.sync_all().map_err(|e| KeyScoutError::Io {
            message: "Failed to sync relationship document to disk".to_string(),
            source: e,
        })?;

        fs::rename(&tmp_path, &path).map_err(|e| KeyScoutError::Io {
            message: format!("Failed to rename {} → {}", tmp_path.display(), path.display()),
            source: e,
        })?;

        tracing::debug!(
            "Saved {} relationships ({} edges) to {}",
            doc.version,
            doc.edge_count(),
            path.display()
        );
        Ok(path)
    }

    fn read(&self, version: DocumentVersion) -> Result<Option<RelationshipDocument>> {
        let path = self.path_for(version);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| KeyScoutError::Io {
            message: format!("Failed to read {}", path.display()),
            source: e,
        })?;
        let doc = serde_json::from_str(&content).map_err(|e| KeyScoutError::Store {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        Ok(Some(doc))
    }
}

/// Parse a bare JSON array of relationships, as accepted for edits.
pub fn parse_relationships(json: &str) -> Result<Vec<Relationship>> {
    serde_json::from_str(json).map_err(|e| KeyScoutError::Store {
        message: format!("Invalid relationship list: {}", e),
    })
}
