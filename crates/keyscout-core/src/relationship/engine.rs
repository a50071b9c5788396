use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{KeyScoutError, Result};
use crate::keys::{detect_keys, KeySet};
use crate::profile::table::profile_tables;
use crate::profile::types::{ProfileOptions, TableProfile};
use crate::relationship::foreign_key::{detect_foreign_keys, ForeignKeyOptions};
use crate::relationship::types::Relationship;
use crate::table::types::TableSet;

/// Knobs for a full pipeline run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOptions {
    pub profile: ProfileOptions,
    pub foreign_keys: ForeignKeyOptions,
    /// Size of the worker pool. `None` uses one thread per available core.
    pub workers: Option<usize>,
}

/// Everything one run produced, in table order.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub profiles: IndexMap<String, TableProfile>,
    pub keys: IndexMap<String, KeySet>,
    pub relationships: Vec<Relationship>,
}

/// Profiles and keys of a run that stopped before foreign-key inference.
#[derive(Debug, Clone, Serialize)]
pub struct Profiled {
    pub profiles: IndexMap<String, TableProfile>,
    pub keys: IndexMap<String, KeySet>,
}

/// Runs profiling, key detection and foreign-key inference over a table set.
///
/// All parallel work runs on a pool sized by [`EngineOptions::workers`], so a
/// run never grows past that bound regardless of how many columns it sees.
#[derive(Debug, Clone, Default)]
pub struct RelationshipEngine {
    options: EngineOptions,
}

impl RelationshipEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Infer relationships only.
    pub fn run(&self, tables: &TableSet) -> Result<Vec<Relationship>> {
        Ok(self.analyze(tables)?.relationships)
    }

    /// Profile every table and classify its keys, without foreign-key
    /// inference. Runs on the same bounded pool as [`analyze`](Self::analyze).
    pub fn profile(&self, tables: &TableSet) -> Result<Profiled> {
        tables.validate()?;

        let pool = self.worker_pool()?;
        let profiled = pool.install(|| {
            let profiles = profile_tables(tables, &self.options.profile);
            let keys = detect_keys(&profiles);
            Profiled { profiles, keys }
        });

        tracing::debug!(
            "Profiled {} tables ({} columns) on {} workers",
            tables.len(),
            tables.column_count(),
            pool.current_num_threads()
        );

        Ok(profiled)
    }

    /// Run the whole pipeline and keep the intermediate profiles and keys.
    pub fn analyze(&self, tables: &TableSet) -> Result<Analysis> {
        tables.validate()?;

        let pool = self.worker_pool()?;
        let analysis = pool.install(|| -> Result<Analysis> {
            let profiles = profile_tables(tables, &self.options.profile);
            let keys = detect_keys(&profiles);
            let relationships =
                detect_foreign_keys(tables, &profiles, &keys, &self.options.foreign_keys)?;
            Ok(Analysis {
                profiles,
                keys,
                relationships,
            })
        })?;

        tracing::info!(
            "Analyzed {} tables ({} columns): {} relationships",
            tables.len(),
            tables.column_count(),
            analysis.relationships.len()
        );

        Ok(analysis)
    }

    fn worker_pool(&self) -> Result<rayon::ThreadPool> {
        let workers = self.options.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });

        rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("keyscout-worker-{}", i))
            .build()
            .map_err(|e| KeyScoutError::ThreadPool {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::{Column, Table};
    use crate::table::value::Value;

    fn tables() -> TableSet {
        let customers = Table::new(
            "customers",
            vec![
                Column::new("id", (1..=10).map(Value::Int).collect()),
                Column::new(
                    "name",
                    (1..=10).map(|i| Value::from(format!("Customer {}", i))).collect(),
                ),
            ],
        )
        .unwrap();
        let orders = Table::new(
            "orders",
            vec![
                Column::new("order_id", (1..=20).map(Value::Int).collect()),
                Column::new(
                    "customer_id",
                    (0..20).map(|i| Value::Int(i % 10 + 1)).collect(),
                ),
            ],
        )
        .unwrap();
        TableSet::from_tables(vec![customers, orders]).unwrap()
    }

    #[test]
    fn test_analyze_produces_all_stages() {
        let analysis = RelationshipEngine::default().analyze(&tables()).unwrap();
        assert_eq!(analysis.profiles.len(), 2);
        assert_eq!(analysis.keys["customers"].primary_keys, ["id", "name"]);
        assert_eq!(analysis.relationships.len(), 1);
        let rel = &analysis.relationships[0];
        assert_eq!(rel.from_label(), "orders:customer_id");
        assert_eq!(rel.to_label(), "customers:id");
        assert_eq!(rel.confidence, 1.0);
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let set = tables();
        let single = RelationshipEngine::new(EngineOptions {
            workers: Some(1),
            ..Default::default()
        })
        .run(&set)
        .unwrap();
        let many = RelationshipEngine::new(EngineOptions {
            workers: Some(8),
            ..Default::default()
        })
        .run(&set)
        .unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn test_ragged_table_rejected() {
        let mut short = Table::new(
            "short",
            vec![Column::new("a", vec![Value::Int(1), Value::Int(2)])],
        )
        .unwrap();
        short.row_count = 3;
        let set = TableSet::from_tables(vec![short]).unwrap();

        let err = RelationshipEngine::default().run(&set).unwrap_err();
        assert!(matches!(err, KeyScoutError::RaggedTable { ref table, .. } if table == "short"));
    }

    #[test]
    fn test_profile_matches_analyze_and_honours_workers() {
        let set = tables();
        let engine = RelationshipEngine::new(EngineOptions {
            workers: Some(1),
            ..Default::default()
        });
        let profiled = engine.profile(&set).unwrap();
        let analysis = engine.analyze(&set).unwrap();
        assert_eq!(profiled.keys, analysis.keys);
        assert_eq!(
            serde_json::to_value(&profiled.profiles).unwrap(),
            serde_json::to_value(&analysis.profiles).unwrap()
        );

        let inside = RelationshipEngine::new(EngineOptions {
            workers: Some(2),
            ..Default::default()
        })
        .worker_pool()
        .unwrap()
        .install(rayon::current_num_threads);
        assert_eq!(inside, 2);
    }

    #[test]
    fn test_empty_set() {
        let analysis = RelationshipEngine::default()
            .analyze(&TableSet::new())
            .unwrap();
        assert!(analysis.profiles.is_empty());
        assert!(analysis.relationships.is_empty());
    }
}
