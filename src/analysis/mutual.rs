//! Bidirectional production relationships.

use super::graph::ProductionGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Two strands that each produce the other. `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MutualPair {
    pub first: String,
    pub second: String,
}

impl MutualPair {
    /// Build a pair with its members in identifier order.
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

/// Every unordered pair `{u, v}` with both `u -> v` and `v -> u`.
///
/// Self-loops never form a pair.
pub fn mutual_pairs(graph: &ProductionGraph) -> BTreeSet<MutualPair> {
    graph
        .edges()
        .iter()
        .filter(|e| !e.is_self_loop() && graph.has_edge(e.target, e.source))
        .map(|e| MutualPair::new(graph.node(e.source), graph.node(e.target)))
        .collect()
}

/// Ids of directed edges whose reverse edge also exists, in graph edge order.
/// Each mutual pair contributes both of its directions.
pub fn mutual_edges(graph: &ProductionGraph) -> Vec<usize> {
    graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_self_loop() && graph.has_edge(e.target, e.source))
        .map(|(id, _)| id)
        .collect()
}
