use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::relationship::types::Relationship;

/// Relationships as a directed graph over `table:column` endpoints.
/// Edges point from the referencing column to the referenced key.
pub struct RelationshipGraph {
    pub graph: DiGraph<String, f64>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl RelationshipGraph {
    /// Build a graph with one node per endpoint, in first-seen order, and
    /// one edge per relationship weighted by its confidence.
    pub fn from_relationships(relationships: &[Relationship]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices: HashMap<String, NodeIndex> = HashMap::new();

        for rel in relationships {
            let from_idx = *node_indices
                .entry(rel.from_label())
                .or_insert_with_key(|label| graph.add_node(label.clone()));
            let to_idx = *node_indices
                .entry(rel.to_label())
                .or_insert_with_key(|label| graph.add_node(label.clone()));
            graph.add_edge(from_idx, to_idx, rel.confidence);
        }

        Self {
            graph,
            node_indices,
        }
    }

    /// Get the `table:column` label for a node index.
    pub fn label(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_indices.get(label).copied()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.graph.node_weights().map(|s| s.as_str()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
