//! # Key Detection
//!
//! Classifies each profiled column as a primary key (unique and complete),
//! a candidate key (unique but with nulls) or neither. A table may end up
//! with several primary keys; they are not ranked, and foreign-key
//! detection treats each one as an independent target.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::profile::types::TableProfile;

/// Key columns of one table, in table column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub primary_keys: Vec<String>,
    pub candidate_keys: Vec<String>,
}

impl KeySet {
    pub fn from_profile(profile: &TableProfile) -> Self {
        let mut keys = KeySet::default();
        for (col_name, column) in &profile.columns {
            match (column.is_unique, column.is_complete) {
                (true, true) => keys.primary_keys.push(col_name.clone()),
                (true, false) => keys.candidate_keys.push(col_name.clone()),
                _ => {}
            }
        }
        keys
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|c| c == column)
    }
}

/// Detect key columns for every profiled table.
pub fn detect_keys(profiles: &IndexMap<String, TableProfile>) -> IndexMap<String, KeySet> {
    profiles
        .iter()
        .map(|(table_name, profile)| {
            let keys = KeySet::from_profile(profile);
            tracing::debug!(
                "Table '{}': primary keys {:?}, candidate keys {:?}",
                table_name,
                keys.primary_keys,
                keys.candidate_keys
            );
            (table_name.clone(), keys)
        })
        .collect()
}
