//! # Tables
//!
//! The in-memory input model: a [`TableSet`] of named, rectangular
//! [`Table`]s whose cells are typed [`Value`]s. Ingestion builds these; the
//! profiling and relationship stages only ever borrow them.

pub mod types;
pub mod value;

pub use types::{Column, Table, TableSet};
pub use value::{Value, ValueKey};
