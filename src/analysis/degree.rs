//! Per-node degree counts and their normalized forms.
//!
//! The normalized values only drive node sizing and coloring.

use super::graph::ProductionGraph;
use serde::{Deserialize, Serialize};

/// Degree metrics for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDegree {
    pub name: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub total_degree: usize,
    /// `total_degree / max(total_degree)`, in 0.0..=1.0.
    pub normalized_total: f64,
    /// `in_degree / max(in_degree)`, in 0.0..=1.0.
    pub normalized_in: f64,
}

/// Count incoming and outgoing edges for each node, indexed like
/// [`ProductionGraph::nodes`].
pub fn calculate_degrees(graph: &ProductionGraph) -> (Vec<usize>, Vec<usize>) {
    let mut in_degrees = vec![0; graph.node_count()];
    let mut out_degrees = vec![0; graph.node_count()];

    for edge in graph.edges() {
        out_degrees[edge.source] += 1;
        in_degrees[edge.target] += 1;
    }

    (in_degrees, out_degrees)
}

/// Degree metrics for every node, in graph node order.
pub fn degree_metrics(graph: &ProductionGraph) -> Vec<NodeDegree> {
    let (in_degrees, out_degrees) = calculate_degrees(graph);

    let max_total = normalizer(
        in_degrees
            .iter()
            .zip(&out_degrees)
            .map(|(i, o)| i + o)
            .max(),
    );
    let max_in = normalizer(in_degrees.iter().copied().max());

    graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let total = in_degrees[idx] + out_degrees[idx];
            NodeDegree {
                name: name.clone(),
                in_degree: in_degrees[idx],
                out_degree: out_degrees[idx],
                total_degree: total,
                normalized_total: total as f64 / max_total,
                normalized_in: in_degrees[idx] as f64 / max_in,
            }
        })
        .collect()
}

// A missing or zero maximum normalizes by 1.
fn normalizer(max: Option<usize>) -> f64 {
    match max {
        Some(m) if m > 0 => m as f64,
        _ => 1.0,
    }
}
