use crate::graph::dag::RelationshipGraph;
use petgraph::visit::EdgeRef;

/// Output format for graph visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

/// Render the relationship graph. Edge labels carry the confidence to two
/// decimals.
pub fn visualize(graph: &RelationshipGraph, format: GraphFormat) -> String {
    match format {
        GraphFormat::Mermaid => generate_mermaid(graph),
        GraphFormat::Dot => generate_dot(graph),
    }
}

/// Mermaid node ids cannot contain `:` or `.`; labels keep the full text.
fn mermaid_id(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn generate_mermaid(graph: &RelationshipGraph) -> String {
    let mut output = String::from("graph LR\n");

    for node in graph.graph.node_indices() {
        let label = graph.label(node);
        output.push_str(&format!(
            "    {}[\"{}\"]\n",
            mermaid_id(label),
            label.replace('"', "#quot;")
        ));
    }

    output.push('\n');

    for edge in graph.graph.edge_references() {
        output.push_str(&format!(
            "    {} -->|{:.2}| {}\n",
            mermaid_id(graph.label(edge.source())),
            edge.weight(),
            mermaid_id(graph.label(edge.target()))
        ));
    }

    output
}

fn generate_dot(graph: &RelationshipGraph) -> String {
    let mut output = String::from("digraph relationships {\n");
    output.push_str("    rankdir=LR;\n");
    output.push_str("    node [shape=box, style=rounded];\n\n");

    for node in graph.graph.node_indices() {
        output.push_str(&format!("    \"{}\";\n", escape_dot(graph.label(node))));
    }

    output.push('\n');

    for edge in graph.graph.edge_references() {
        let confidence = *edge.weight();
        output.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{:.2}\", penwidth={:.2}];\n",
            escape_dot(graph.label(edge.source())),
            escape_dot(graph.label(edge.target())),
            confidence,
            confidence * 5.0
        ));
    }

    output.push_str("}\n");
    output
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
