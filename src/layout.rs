//! Spatial layout for the production graph.
//!
//! Renderers treat layout as a black box: node count and edge list in,
//! one position per node out, inside the unit square.

use rand::{Rng, SeedableRng};

/// A position in the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Maps a node set and edge set to 2-D coordinates.
pub trait Layout {
    /// Place `node_count` nodes connected by `edges` (index pairs).
    /// Returns one point per node, each coordinate in `0.0..=1.0`.
    fn place(&self, node_count: usize, edges: &[(usize, usize)]) -> Vec<Point>;
}

/// Seeded force-directed layout.
///
/// Nodes repel each other with force `k² / d` and edges pull their endpoints
/// together with force `d² / k`, where `k = 2 / √n` is the preferred spacing.
/// Movement per step is capped by a temperature that cools linearly to zero.
#[derive(Debug, Clone, Copy)]
pub struct SpringLayout {
    pub iterations: usize,
    pub seed: u64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            iterations: 100,
            seed: 42,
        }
    }
}

impl SpringLayout {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }

    fn optimal_distance(node_count: usize) -> f64 {
        if node_count > 1 {
            2.0 / (node_count as f64).sqrt()
        } else {
            1.0
        }
    }
}

impl Layout for SpringLayout {
    fn place(&self, node_count: usize, edges: &[(usize, usize)]) -> Vec<Point> {
        match node_count {
            0 => return Vec::new(),
            1 => return vec![Point { x: 0.5, y: 0.5 }],
            _ => {}
        }

        let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
        let mut positions: Vec<(f64, f64)> = (0..node_count)
            .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
            .collect();

        let k = Self::optimal_distance(node_count);
        let mut temperature = 0.1;
        let cooling = temperature / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let mut forces: Vec<(f64, f64)> = vec![(0.0, 0.0); node_count];

            // Repulsion between all nodes
            for i in 0..node_count {
                for j in (i + 1)..node_count {
                    let dx = positions[i].0 - positions[j].0;
                    let dy = positions[i].1 - positions[j].1;
                    let dist = (dx * dx + dy * dy).sqrt().max(0.01);

                    let force = k * k / dist;
                    let fx = (dx / dist) * force;
                    let fy = (dy / dist) * force;

                    forces[i].0 += fx;
                    forces[i].1 += fy;
                    forces[j].0 -= fx;
                    forces[j].1 -= fy;
                }
            }

            // Attraction along edges
            for &(src, tgt) in edges {
                if src == tgt || src >= node_count || tgt >= node_count {
                    continue;
                }
                let dx = positions[tgt].0 - positions[src].0;
                let dy = positions[tgt].1 - positions[src].1;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);

                let force = dist * dist / k;
                let fx = (dx / dist) * force;
                let fy = (dy / dist) * force;

                forces[src].0 += fx;
                forces[src].1 += fy;
                forces[tgt].0 -= fx;
                forces[tgt].1 -= fy;
            }

            // Move each node at most `temperature` along its net force
            for (pos, force) in positions.iter_mut().zip(&forces) {
                let length = (force.0 * force.0 + force.1 * force.1).sqrt();
                if length > 0.0 {
                    let step = length.min(temperature);
                    pos.0 += force.0 / length * step;
                    pos.1 += force.1 / length * step;
                }
            }

            temperature -= cooling;
        }

        rescale(&positions)
    }
}

/// Stretch each axis independently to fill the unit square.
fn rescale(positions: &[(f64, f64)]) -> Vec<Point> {
    let (min_x, max_x) = bounds(positions.iter().map(|p| p.0));
    let (min_y, max_y) = bounds(positions.iter().map(|p| p.1));

    let fit = |v: f64, min: f64, max: f64| {
        if max - min > f64::EPSILON {
            (v - min) / (max - min)
        } else {
            0.5
        }
    };

    positions
        .iter()
        .map(|&(x, y)| Point {
            x: fit(x, min_x, max_x),
            y: fit(y, min_y, max_y),
        })
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
