use std::fmt;

use serde::{Deserialize, Serialize};

/// An inferred foreign key: a non-unique column referencing a primary-key
/// column of another table.
///
/// Edited relationship lists use the same shape, so nothing here assumes
/// the edge was produced by detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    /// Share of the source column's distinct values found in the target.
    pub confidence: f64,
}

impl Relationship {
    /// `table:column` label of the referencing endpoint.
    pub fn from_label(&self) -> String {
        format!("{}:{}", self.from_table, self.from_column)
    }

    /// `table:column` label of the referenced endpoint.
    pub fn to_label(&self) -> String {
        format!("{}:{}", self.to_table, self.to_column)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} → {}.{} ({:.4})",
            self.from_table, self.from_column, self.to_table, self.to_column, self.confidence
        )
    }
}

/// Relationships in detection order.
pub type RelationshipSet = Vec<Relationship>;
