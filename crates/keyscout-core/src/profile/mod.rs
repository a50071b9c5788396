//! # Column Profiling
//!
//! Derives a statistical [`ColumnProfile`] for every column of every table:
//! storage type, uniqueness, completeness, categorical-ness, Shannon entropy
//! and the dominant character-class pattern. Profiles are pure functions of
//! the column values and the row count; key and foreign-key detection only
//! ever read them.

pub mod column;
pub mod entropy;
pub mod pattern;
pub mod table;
pub mod types;

pub use column::profile_column;
pub use table::{profile_table, profile_tables};
pub use types::{ColumnProfile, DataType, ProfileOptions, TableProfile};
