use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::relationship::types::Relationship;

/// Which revision of the relationship list a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentVersion {
    /// Produced by detection.
    Initial,
    /// Supplied by a user after review.
    Edited,
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentVersion::Initial => write!(f, "initial"),
            DocumentVersion::Edited => write!(f, "edited"),
        }
    }
}

/// On-disk relationship document.
///
/// Initial documents are stamped with `created_at`, edited ones with
/// `updated_at`; both as RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDocument {
    pub relationships: Vec<Relationship>,
    pub version: DocumentVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RelationshipDocument {
    pub fn initial(relationships: Vec<Relationship>) -> Self {
        Self {
            relationships,
            version: DocumentVersion::Initial,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            updated_at: None,
        }
    }

    pub fn edited(relationships: Vec<Relationship>) -> Self {
        Self {
            relationships,
            version: DocumentVersion::Edited,
            created_at: None,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// The stamp matching this document's version.
    pub fn timestamp(&self) -> Option<&str> {
        match self.version {
            DocumentVersion::Initial => self.created_at.as_deref(),
            DocumentVersion::Edited => self.updated_at.as_deref(),
        }
    }

    /// Number of distinct `table:column` endpoints across all edges.
    pub fn node_count(&self) -> usize {
        self.relationships
            .iter()
            .flat_map(|r| [r.from_label(), r.to_label()])
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn edge_count(&self) -> usize {
        self.relationships.len()
    }
}

/// One line of the version history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionEntry {
    pub version: DocumentVersion,
    pub timestamp: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
}

impl From<&RelationshipDocument> for VersionEntry {
    fn from(doc: &RelationshipDocument) -> Self {
        Self {
            version: doc.version,
            timestamp: doc.timestamp().map(str::to_string),
            node_count: doc.node_count(),
            edge_count: doc.edge_count(),
        }
    }
}
