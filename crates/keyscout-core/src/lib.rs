pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod keys;
pub mod profile;
pub mod relationship;
pub mod store;
pub mod table;

// Re-export key types for convenience
pub use error::{KeyScoutError, Result};
pub use keys::{detect_keys, KeySet};
pub use profile::{ColumnProfile, DataType, ProfileOptions, TableProfile};
pub use relationship::{
    Analysis, EngineOptions, ForeignKeyOptions, Profiled, Relationship, RelationshipEngine,
    RelationshipSet,
};
pub use table::{Column, Table, TableSet, Value};
