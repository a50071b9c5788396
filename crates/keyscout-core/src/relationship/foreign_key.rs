//! # Foreign Key Inference
//!
//! Compares every non-unique column against every primary-key column of
//! every *other* table and emits a directed edge when enough of the source
//! column's distinct values appear in the target:
//!
//! ```text
//! overlap = |distinct(source) ∩ distinct(target)| / |distinct(source)|
//! ```
//!
//! The ratio is normalized by the referencing side only, so it is not
//! symmetric. This is a single-hop heuristic: no transitive closure, no
//! cycle detection, and a source column may keep several competing targets.
//!
//! Distinct value sets are built once per column. Each source column is an
//! independent work unit producing its own edge list; the lists are merged
//! in input order, so the output order is stable regardless of scheduling.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::error::{KeyScoutError, Result};
use crate::keys::KeySet;
use crate::profile::entropy::round_to;
use crate::profile::types::{DataType, TableProfile};
use crate::relationship::types::Relationship;
use crate::table::types::{Column, TableSet};
use crate::table::value::ValueKey;

/// Tunables for foreign-key inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyOptions {
    /// Overlap ratios strictly above this value produce an edge.
    pub confidence_threshold: f64,
}

impl Default for ForeignKeyOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
        }
    }
}

/// One side of a comparison: a column and its profiled type.
#[derive(Debug, Clone, Copy)]
struct Endpoint<'a> {
    table: &'a str,
    column: &'a str,
    data_type: DataType,
}

type DistinctSets<'a> = HashMap<(&'a str, &'a str), HashSet<ValueKey<'a>>>;

/// Infer foreign-key edges across all tables.
///
/// `profiles` and `keysets` must cover every table (and every column) in
/// `tables`; a missing entry is a structural error and fails the whole pass.
/// Column pairs whose types cannot share values are skipped individually.
pub fn detect_foreign_keys(
    tables: &TableSet,
    profiles: &IndexMap<String, TableProfile>,
    keysets: &IndexMap<String, KeySet>,
    options: &ForeignKeyOptions,
) -> Result<Vec<Relationship>> {
    let mut sources: Vec<Endpoint<'_>> = Vec::new();
    let mut targets: Vec<(&str, Vec<Endpoint<'_>>)> = Vec::with_capacity(tables.len());
    let mut needed: Vec<(&str, &str, &Column)> = Vec::new();

    for table in tables.tables() {
        let missing = || KeyScoutError::MissingProfile {
            table: table.name.clone(),
        };
        let profile = profiles.get(&table.name).ok_or_else(missing)?;
        let keys = keysets.get(&table.name).ok_or_else(missing)?;

        let mut table_targets = Vec::new();
        for (col_name, column) in &table.columns {
            let col_profile = profile.columns.get(col_name).ok_or_else(missing)?;
            let endpoint = Endpoint {
                table: &table.name,
                column: col_name,
                data_type: col_profile.data_type,
            };

            if !col_profile.is_unique {
                sources.push(endpoint);
                needed.push((&table.name, col_name, column));
            } else if keys.is_primary_key(col_name) {
                table_targets.push(endpoint);
                needed.push((&table.name, col_name, column));
            }
        }
        targets.push((&table.name, table_targets));
    }

    let distinct: DistinctSets<'_> = needed
        .par_iter()
        .map(|&(table, column, values)| ((table, column), distinct_values(values)))
        .collect();

    let relationships: Vec<Relationship> = sources
        .par_iter()
        .map(|source| match_source(source, &targets, &distinct, options))
        .collect::<Vec<Vec<Relationship>>>()
        .into_iter()
        .flatten()
        .collect();

    tracing::debug!(
        "Compared {} source columns against {} primary keys: {} relationships",
        sources.len(),
        targets.iter().map(|(_, t)| t.len()).sum::<usize>(),
        relationships.len()
    );

    Ok(relationships)
}

fn distinct_values(column: &Column) -> HashSet<ValueKey<'_>> {
    column.values.iter().filter_map(|v| v.key()).collect()
}

/// All edges for one source column, in (target table, target column) order.
fn match_source(
    source: &Endpoint<'_>,
    targets: &[(&str, Vec<Endpoint<'_>>)],
    distinct: &DistinctSets<'_>,
    options: &ForeignKeyOptions,
) -> Vec<Relationship> {
    let mut found = Vec::new();

    let from_values = match distinct.get(&(source.table, source.column)) {
        Some(values) if !values.is_empty() => values,
        _ => return found,
    };

    for (to_table, primary_keys) in targets {
        if *to_table == source.table {
            continue;
        }

        for target in primary_keys {
            let to_values = match distinct.get(&(target.table, target.column)) {
                Some(values) if !values.is_empty() => values,
                _ => continue,
            };

            if !source.data_type.is_comparable_with(target.data_type) {
                tracing::debug!(
                    "Skipping {}.{} ({}) → {}.{} ({}): incomparable types",
                    source.table,
                    source.column,
                    source.data_type,
                    target.table,
                    target.column,
                    target.data_type
                );
                continue;
            }

            let ratio = overlap_ratio(from_values, to_values);
            if ratio > options.confidence_threshold {
                found.push(Relationship {
                    from_table: source.table.to_string(),
                    from_column: source.column.to_string(),
                    to_table: target.table.to_string(),
                    to_column: target.column.to_string(),
                    confidence: round_to(ratio, 4),
                });
            }
        }
    }

    found
}

/// Share of `from` that also appears in `to`. Zero for an empty `from`.
pub fn overlap_ratio<T: Eq + std::hash::Hash>(from: &HashSet<T>, to: &HashSet<T>) -> f64 {
    if from.is_empty() {
        return 0.0;
    }
    let common = from.iter().filter(|v| to.contains(*v)).count();
    common as f64 / from.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::detect_keys;
    use crate::profile::table::profile_tables;
    use crate::profile::types::ProfileOptions;
    use crate::table::types::Table;
    use crate::table::value::Value;

    fn ints(values: impl IntoIterator<Item = i64>) -> Vec<Value> {
        values.into_iter().map(Value::Int).collect()
    }

    fn detect(tables: Vec<Table>) -> Vec<Relationship> {
        let set = TableSet::from_tables(tables).unwrap();
        let profiles = profile_tables(&set, &ProfileOptions::default());
        let keys = detect_keys(&profiles);
        detect_foreign_keys(&set, &profiles, &keys, &ForeignKeyOptions::default()).unwrap()
    }

    /// A child table whose `ref_id` column holds 10 distinct values
    /// (each twice, so the column is not unique), `shared` of which exist
    /// in the parent's `id` column.
    fn threshold_fixture(shared: i64) -> Vec<Table> {
        let parent = Table::new("parent", vec![Column::new("id", ints(1..=100))]).unwrap();
        let refs: Vec<i64> = (0..10)
            .map(|i| if i < shared { i + 1 } else { 1000 + i })
            .collect();
        let doubled: Vec<i64> = refs.iter().chain(refs.iter()).copied().collect();
        let child = Table::new(
            "child",
            vec![
                Column::new("child_id", ints(1..=20)),
                Column::new("ref_id", ints(doubled)),
            ],
        )
        .unwrap();
        vec![child, parent]
    }

    #[test]
    fn test_overlap_ratio_is_directional() {
        let small: HashSet<i32> = [1, 2].into_iter().collect();
        let large: HashSet<i32> = [1, 2, 3, 4].into_iter().collect();
        assert_eq!(overlap_ratio(&small, &large), 1.0);
        assert_eq!(overlap_ratio(&large, &small), 0.5);
        assert_eq!(overlap_ratio(&HashSet::<i32>::new(), &large), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let rels = detect(threshold_fixture(8));
        assert!(rels.is_empty(), "0.8 overlap must not produce an edge: {:?}", rels);
    }

    #[test]
    fn test_above_threshold_emits_edge() {
        let rels = detect(threshold_fixture(9));
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].from_table, "child");
        assert_eq!(rels[0].from_column, "ref_id");
        assert_eq!(rels[0].to_table, "parent");
        assert_eq!(rels[0].to_column, "id");
        assert_eq!(rels[0].confidence, 0.9);
    }

    #[test]
    fn test_unique_columns_are_never_sources() {
        // child_id (1..=20) is fully contained in parent.id but is unique.
        let rels = detect(threshold_fixture(10));
        assert!(rels.iter().all(|r| r.from_column != "child_id"));
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].confidence, 1.0);
    }

    #[test]
    fn test_no_self_table_edges() {
        // ref_id ⊆ id within the same table.
        let table = Table::new(
            "items",
            vec![
                Column::new("id", ints(1..=10)),
                Column::new("ref_id", ints([1, 1, 2, 2, 3, 3, 4, 4, 5, 5])),
            ],
        )
        .unwrap();
        assert!(detect(vec![table]).is_empty());
    }

    #[test]
    fn test_competing_targets_all_retained() {
        let a = Table::new("a", vec![Column::new("id", ints(1..=5))]).unwrap();
        let b = Table::new("b", vec![Column::new("id", ints(1..=5))]).unwrap();
        let c = Table::new("c", vec![Column::new("ref", ints([1, 1, 2, 3]))]).unwrap();
        let rels = detect(vec![a, b, c]);
        let targets: Vec<&str> = rels.iter().map(|r| r.to_table.as_str()).collect();
        assert_eq!(targets, ["a", "b"]);
    }

    #[test]
    fn test_incomparable_types_skipped() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let parent = Table::new("parent", vec![Column::new("id", ints(1..=3))]).unwrap();
        let child = Table::new(
            "child",
            vec![Column::new("flag", vec![Value::Bool(true), Value::Bool(true)])],
        )
        .unwrap();
        let events = Table::new(
            "events",
            vec![Column::new("at", vec![Value::DateTime(dt), Value::DateTime(dt)])],
        )
        .unwrap();
        assert!(detect(vec![parent, child, events]).is_empty());
    }

    #[test]
    fn test_string_source_matches_int_key_by_value_identity() {
        let parent = Table::new("parent", vec![Column::new("id", ints(1..=3))]).unwrap();
        let child = Table::new(
            "child",
            vec![Column::new(
                "ref",
                vec![Value::Int(1), Value::Int(1), Value::from("n/a")],
            )],
        )
        .unwrap();
        // The string column is comparable, but "n/a" never matches: 1 of 2.
        assert!(detect(vec![parent, child]).is_empty());
    }

    #[test]
    fn test_all_null_source_skipped() {
        let parent = Table::new("parent", vec![Column::new("id", ints(1..=3))]).unwrap();
        let child = Table::new(
            "child",
            vec![Column::new("ref", vec![Value::Null, Value::Null])],
        )
        .unwrap();
        assert!(detect(vec![parent, child]).is_empty());
    }

    #[test]
    fn test_missing_profile_is_fatal() {
        let set = TableSet::from_tables(threshold_fixture(9)).unwrap();
        let mut profiles = profile_tables(&set, &ProfileOptions::default());
        let keys = detect_keys(&profiles);
        profiles.shift_remove("parent");
        let err = detect_foreign_keys(&set, &profiles, &keys, &ForeignKeyOptions::default())
            .unwrap_err();
        assert!(matches!(err, KeyScoutError::MissingProfile { ref table } if table == "parent"));
    }

    #[test]
    fn test_custom_threshold() {
        let set = TableSet::from_tables(threshold_fixture(8)).unwrap();
        let profiles = profile_tables(&set, &ProfileOptions::default());
        let keys = detect_keys(&profiles);
        let options = ForeignKeyOptions {
            confidence_threshold: 0.5,
        };
        let rels = detect_foreign_keys(&set, &profiles, &keys, &options).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].confidence, 0.8);
    }
}
