//! Bounded-length cycle enumeration.
//!
//! Short directed cycles in the production graph are feedback loops: a set of
//! strands that keep regenerating each other. The search is a depth-first walk
//! from every node, capped at `max_len` hops, so its cost stays polynomial in
//! the node count for small bounds no matter how dense the graph is.
//!
//! The same cycle is reached once from each of its members. Every hit is
//! rotated so that its smallest identifier comes first, and only the first
//! occurrence of each canonical rotation is kept.

use super::graph::ProductionGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shortest reportable cycle. A self-loop is not a cycle here.
pub const MIN_CYCLE_LEN: usize = 2;

/// A cycle and the summed weight of its edges, closing edge included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCycle {
    /// Members in traversal order; the edge back to `path[0]` is implied.
    pub path: Vec<String>,
    /// Sum of `u64` edge weights, held in `u128`.
    pub total_weight: u128,
}

impl RankedCycle {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Heaviest cycles plus the number found before truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CycleReport {
    pub cycles: Vec<RankedCycle>,
    pub total_found: usize,
    /// Longest cycle length searched for.
    pub max_len: usize,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }
}

/// All simple cycles with `2..=max_len` members, in canonical rotation and
/// discovery order, each paired with its total weight.
pub fn enumerate_cycles(graph: &ProductionGraph, max_len: usize) -> Vec<(Vec<usize>, u128)> {
    let mut found = Vec::new();
    if max_len < MIN_CYCLE_LEN || graph.edge_count() == 0 {
        return found;
    }

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut on_path = vec![false; graph.node_count()];
    let mut path = Vec::with_capacity(max_len);

    for start in 0..graph.node_count() {
        path.push(start);
        on_path[start] = true;
        dfs_find_cycles(
            graph,
            start,
            start,
            max_len,
            &mut path,
            &mut on_path,
            &mut seen,
            &mut found,
        );
        on_path[start] = false;
        path.pop();
    }

    found
}

#[allow(clippy::too_many_arguments)]
fn dfs_find_cycles(
    graph: &ProductionGraph,
    start: usize,
    node: usize,
    max_len: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    seen: &mut HashSet<Vec<usize>>,
    found: &mut Vec<(Vec<usize>, u128)>,
) {
    for (next, _) in graph.successors(node) {
        if next == start {
            if path.len() >= MIN_CYCLE_LEN {
                let cycle = canonical_rotation(graph, path);
                if seen.insert(cycle.clone()) {
                    let weight = cycle_weight(graph, &cycle);
                    found.push((cycle, weight));
                }
            }
            continue;
        }

        if on_path[next] || path.len() >= max_len {
            continue;
        }

        path.push(next);
        on_path[next] = true;
        dfs_find_cycles(graph, start, next, max_len, path, on_path, seen, found);
        on_path[next] = false;
        path.pop();
    }
}

/// Rotate `cycle` so it starts at its lexicographically smallest identifier.
/// Members of a simple cycle are distinct, so this is also the
/// lexicographically smallest rotation of the whole sequence.
fn canonical_rotation(graph: &ProductionGraph, cycle: &[usize]) -> Vec<usize> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| graph.node(**a).cmp(graph.node(**b)))
        .map(|(pos, _)| pos)
        .unwrap_or(0);

    cycle[pivot..].iter().chain(&cycle[..pivot]).copied().collect()
}

/// Sum of edge weights along `cycle`, including the wrap-around edge.
fn cycle_weight(graph: &ProductionGraph, cycle: &[usize]) -> u128 {
    (0..cycle.len())
        .map(|i| {
            let u = cycle[i];
            let v = cycle[(i + 1) % cycle.len()];
            u128::from(graph.weight(u, v).unwrap_or(0))
        })
        .sum()
}

/// Rank cycles of length `2..=max_len` by total weight, heaviest first, and
/// keep the top `limit`. Equal weights keep discovery order.
pub fn rank_cycles(graph: &ProductionGraph, max_len: usize, limit: usize) -> CycleReport {
    let mut found = enumerate_cycles(graph, max_len);
    let total_found = found.len();

    found.sort_by(|a, b| b.1.cmp(&a.1));
    found.truncate(limit);

    let cycles = found
        .into_iter()
        .map(|(cycle, total_weight)| RankedCycle {
            path: cycle.iter().map(|&idx| graph.node(idx).to_string()).collect(),
            total_weight,
        })
        .collect();

    CycleReport {
        cycles,
        total_found,
        max_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductionEdge;

    fn graph(edges: &[(&str, &str, u64)]) -> ProductionGraph {
        let edges: Vec<ProductionEdge> = edges
            .iter()
            .map(|&(c, p, n)| ProductionEdge::new(c, p, n))
            .collect();
        ProductionGraph::from_edges(&edges)
    }

    fn paths(report: &CycleReport) -> Vec<Vec<&str>> {
        report
            .cycles
            .iter()
            .map(|c| c.path.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn three_node_ring_is_one_cycle() {
        let g = graph(&[("A", "B", 1), ("B", "C", 2), ("C", "A", 3)]);
        let report = rank_cycles(&g, 4, 20);

        assert_eq!(report.total_found, 1);
        assert_eq!(paths(&report), vec![vec!["A", "B", "C"]]);
        assert_eq!(report.cycles[0].len(), 3);
        assert_eq!(report.cycles[0].total_weight, 6);
    }

    #[test]
    fn no_edges_means_no_cycles() {
        let report = rank_cycles(&ProductionGraph::new(), 4, 20);
        assert!(report.cycles.is_empty());
        assert_eq!(report.total_found, 0);
        assert!(report.is_empty());
    }

    #[test]
    fn acyclic_graph_reports_nothing() {
        let g = graph(&[("A", "B", 1), ("B", "C", 1), ("A", "C", 1)]);
        assert!(rank_cycles(&g, 4, 20).is_empty());
    }

    #[test]
    fn self_loops_are_not_cycles() {
        let g = graph(&[("A", "A", 5), ("A", "B", 1), ("B", "A", 1)]);
        let report = rank_cycles(&g, 4, 20);
        assert_eq!(paths(&report), vec![vec!["A", "B"]]);
        assert_eq!(report.cycles[0].total_weight, 2);
    }

    #[test]
    fn bound_excludes_longer_cycles() {
        let g = graph(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "D", 1),
            ("D", "E", 1),
            ("E", "A", 1),
        ]);
        assert!(rank_cycles(&g, 4, 20).is_empty());
        assert_eq!(rank_cycles(&g, 5, 20).total_found, 1);
        assert!(rank_cycles(&g, 1, 20).is_empty());
    }

    #[test]
    fn rotations_are_deduplicated_and_directions_are_not() {
        // Complete digraph on three nodes: three 2-cycles plus both 3-cycle
        // orientations.
        let g = graph(&[
            ("B", "A", 1),
            ("A", "B", 1),
            ("A", "C", 1),
            ("C", "A", 1),
            ("B", "C", 1),
            ("C", "B", 1),
        ]);
        let report = rank_cycles(&g, 3, 20);
        assert_eq!(report.total_found, 5);

        let mut all = paths(&report);
        all.sort();
        assert_eq!(
            all,
            vec![
                vec!["A", "B"],
                vec!["A", "B", "C"],
                vec!["A", "C"],
                vec!["A", "C", "B"],
                vec!["B", "C"],
            ]
        );
    }

    #[test]
    fn cycles_start_at_smallest_identifier() {
        let g = graph(&[("m", "z", 1), ("z", "b", 1), ("b", "m", 1)]);
        let report = rank_cycles(&g, 4, 20);
        assert_eq!(paths(&report), vec![vec!["b", "m", "z"]]);
    }

    #[test]
    fn ranks_by_weight_and_keeps_discovery_order_on_ties() {
        let g = graph(&[
            ("A", "B", 1),
            ("B", "A", 1),
            ("C", "D", 5),
            ("D", "C", 5),
            ("E", "F", 1),
            ("F", "E", 1),
        ]);
        let report = rank_cycles(&g, 4, 20);
        assert_eq!(
            paths(&report),
            vec![vec!["C", "D"], vec!["A", "B"], vec!["E", "F"]]
        );
        let weights: Vec<u128> = report.cycles.iter().map(|c| c.total_weight).collect();
        assert_eq!(weights, vec![10, 2, 2]);
    }

    #[test]
    fn truncates_to_limit_but_counts_everything() {
        let mut edges = Vec::new();
        let names: Vec<String> = (0..25).map(|i| format!("s{i:02}")).collect();
        for (i, name) in names.iter().enumerate() {
            let partner = format!("t{i:02}");
            edges.push(ProductionEdge::new(name.clone(), partner.clone(), i as u64 + 1));
            edges.push(ProductionEdge::new(partner, name.clone(), 1));
        }
        let g = ProductionGraph::from_edges(&edges);

        let report = rank_cycles(&g, 4, 20);
        assert_eq!(report.total_found, 25);
        assert_eq!(report.cycles.len(), 20);
        assert_eq!(report.cycles[0].total_weight, 26);
        assert_eq!(report.cycles[19].total_weight, 7);
    }

    #[test]
    fn weight_uses_overwritten_edge_value() {
        let g = graph(&[("A", "B", 3), ("B", "A", 1), ("A", "B", 7)]);
        let report = rank_cycles(&g, 4, 20);
        assert_eq!(report.cycles[0].total_weight, 8);
    }

    #[test]
    fn weights_near_u64_max_do_not_wrap() {
        let g = graph(&[("A", "B", u64::MAX), ("B", "A", 1), ("C", "D", 5), ("D", "C", 5)]);
        let report = rank_cycles(&g, 4, 20);
        assert_eq!(paths(&report), vec![vec!["A", "B"], vec!["C", "D"]]);
        assert_eq!(report.cycles[0].total_weight, u128::from(u64::MAX) + 1);
    }
}
