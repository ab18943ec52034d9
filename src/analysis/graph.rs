//! Directed weighted production graph.
//!
//! Nodes are strands, edges are production relationships `catalyst -> product`
//! weighted by how often they were observed. There is at most one edge per
//! ordered pair; when the input repeats a pair, the last weight wins.

use crate::model::ProductionEdge;
use std::collections::HashMap;

/// An edge between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEdge {
    pub source: usize,
    pub target: usize,
    pub weight: u64,
}

impl WeightedEdge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Graph built for a single analysis pass.
///
/// Nodes and edges keep first-appearance order so that everything derived
/// from the graph is deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct ProductionGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<WeightedEdge>,
    edge_index: HashMap<(usize, usize), usize>,
    /// Edge ids leaving each node, in insertion order.
    outgoing: Vec<Vec<usize>>,
}

impl ProductionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from raw production relationships.
    pub fn from_edges(edges: &[ProductionEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(&edge.catalyst, &edge.product, edge.count);
        }
        graph
    }

    /// Insert `catalyst -> product`. An existing edge keeps its position and
    /// takes the new weight.
    pub fn add_edge(&mut self, catalyst: &str, product: &str, weight: u64) {
        let source = self.intern(catalyst);
        let target = self.intern(product);

        if let Some(&id) = self.edge_index.get(&(source, target)) {
            self.edges[id].weight = weight;
            return;
        }

        let id = self.edges.len();
        self.edges.push(WeightedEdge {
            source,
            target,
            weight,
        });
        self.edge_index.insert((source, target), id);
        self.outgoing[source].push(id);
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.outgoing.push(Vec::new());
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Weight of `source -> target`, if that edge exists.
    pub fn weight(&self, source: usize, target: usize) -> Option<u64> {
        self.edge_index
            .get(&(source, target))
            .map(|&id| self.edges[id].weight)
    }

    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edge_index.contains_key(&(source, target))
    }

    /// Successor indices of `node` with the connecting edge weight.
    pub fn successors(&self, node: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.outgoing[node].iter().map(move |&id| {
            let edge = &self.edges[id];
            (edge.target, edge.weight)
        })
    }

    /// Heaviest edge weight, or 0 for a graph without edges.
    pub fn max_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pair_overwrites_instead_of_summing() {
        let graph = ProductionGraph::from_edges(&[
            ProductionEdge::new("A", "B", 3),
            ProductionEdge::new("A", "B", 7),
        ]);

        assert_eq!(graph.edge_count(), 1);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        assert_eq!(graph.weight(a, b), Some(7));
    }

    #[test]
    fn overwrite_keeps_first_insertion_position() {
        let graph = ProductionGraph::from_edges(&[
            ProductionEdge::new("A", "B", 1),
            ProductionEdge::new("B", "C", 2),
            ProductionEdge::new("A", "B", 5),
        ]);

        let weights: Vec<u64> = graph.edges().iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![5, 2]);
        assert_eq!(graph.nodes(), ["A", "B", "C"]);
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = ProductionGraph::from_edges(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.max_weight(), 0);
    }

    #[test]
    fn self_loops_are_kept_as_edges() {
        let graph = ProductionGraph::from_edges(&[ProductionEdge::new("A", "A", 4)]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edges()[0].is_self_loop());
        assert_eq!(graph.successors(0).collect::<Vec<_>>(), vec![(0, 4)]);
    }

    #[test]
    fn reverse_direction_is_a_distinct_edge() {
        let graph = ProductionGraph::from_edges(&[
            ProductionEdge::new("A", "B", 1),
            ProductionEdge::new("B", "A", 2),
        ]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight(1, 0), Some(2));
        assert!(!graph.has_edge(0, 0));
    }
}
