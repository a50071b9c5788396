//! # Relationship Inference
//!
//! Foreign-key detection over profiled tables and the [`RelationshipEngine`]
//! that chains profiling, key detection and inference on a bounded pool.

pub mod engine;
pub mod foreign_key;
pub mod types;

pub use engine::{Analysis, EngineOptions, Profiled, RelationshipEngine};
pub use foreign_key::{detect_foreign_keys, ForeignKeyOptions};
pub use types::{Relationship, RelationshipSet};
