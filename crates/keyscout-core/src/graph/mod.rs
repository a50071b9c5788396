//! # Relationship Graph
//!
//! Builds a `petgraph` view of a relationship list and renders it as
//! Mermaid or Graphviz DOT text.

pub mod dag;
pub mod visualize;

pub use dag::RelationshipGraph;
pub use visualize::{visualize, GraphFormat};
