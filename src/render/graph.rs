//! Production graph renderer.
//!
//! Strands are nodes, production relationships are arrows:
//! - Node size follows normalized total degree
//! - Node color follows normalized in-degree (how many strands produce it)
//! - Edge width follows production count
//! - Mutual pairs are drawn in red on top of the grey one-way edges

use super::{escape, palette, text, wrap_svg, Renderer};
use crate::analysis::{AnalysisBundle, GraphBundle};
use crate::layout::{Layout, SpringLayout};
use std::collections::HashMap;

pub struct GraphRenderer {
    pub width: u32,
    pub height: u32,
    /// How many of the highest-degree nodes get a text label.
    pub label_count: usize,
    pub layout: SpringLayout,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1400,
            label_count: 25,
            layout: SpringLayout::default(),
        }
    }
}

/// A node placed on the canvas.
struct PositionedNode<'a> {
    name: &'a str,
    x: f64,
    y: f64,
    radius: f64,
    fill: String,
}

impl GraphRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, label_count: usize) -> Self {
        self.label_count = label_count;
        self
    }

    pub fn with_layout(mut self, layout: SpringLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Scale factor relative to a 1000px canvas.
    fn scale(&self) -> f64 {
        self.width as f64 / 1000.0
    }

    /// Label text for a node: long identifiers are cut to 8 characters
    /// followed by `..`.
    pub fn node_label(name: &str) -> String {
        if name.chars().count() > 10 {
            format!("{}..", super::truncate(name, 8))
        } else {
            name.to_string()
        }
    }

    /// Indices of the `count` nodes with the highest total degree. Equal
    /// degrees keep node order.
    fn labeled_nodes(graph: &GraphBundle, count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..graph.nodes.len()).collect();
        order.sort_by(|&a, &b| {
            graph.nodes[b]
                .total_degree
                .cmp(&graph.nodes[a].total_degree)
        });
        order.truncate(count);
        order
    }

    fn position_nodes<'a>(&self, graph: &'a GraphBundle) -> Vec<PositionedNode<'a>> {
        let scale = self.scale();
        let index: HashMap<&str, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.as_str(), i))
            .collect();
        let edges: Vec<(usize, usize)> = graph
            .edges
            .iter()
            .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
            .collect();

        let points = self.layout.place(graph.nodes.len(), &edges);

        let padding = 60.0 * scale;
        let top = 110.0 * scale;
        let colorbar = 140.0 * scale;
        let w = self.width as f64 - padding - colorbar - padding;
        let h = self.height as f64 - top - padding;

        graph
            .nodes
            .iter()
            .zip(points)
            .map(|(node, p)| {
                // Area grows linearly with degree, like a scatter marker size.
                let area = 300.0 + 1500.0 * node.normalized_total;
                PositionedNode {
                    name: &node.name,
                    x: padding + p.x * w,
                    y: top + p.y * h,
                    radius: area.sqrt() / 2.0 * scale,
                    fill: palette::viridis(node.normalized_in),
                }
            })
            .collect()
    }

    fn edge_width(&self, weight: u64, max_weight: u64) -> f64 {
        (0.5 + 3.0 * (weight as f64 / max_weight.max(1) as f64)) * self.scale()
    }

    fn draw_edges(
        &self,
        positions: &[PositionedNode],
        graph: &GraphBundle,
        mutual: bool,
    ) -> Vec<String> {
        let pos_map: HashMap<&str, &PositionedNode> =
            positions.iter().map(|p| (p.name, p)).collect();
        let (color, opacity, marker) = if mutual {
            (palette::MUTUAL_EDGE, 0.7, "arrowMutual")
        } else {
            (palette::EDGE, 0.4, "arrow")
        };

        graph
            .edges
            .iter()
            .filter(|e| !mutual || e.mutual)
            .filter_map(|edge| {
                let src = pos_map.get(edge.source.as_str())?;
                let tgt = pos_map.get(edge.target.as_str())?;
                let width = self.edge_width(edge.weight, graph.max_weight);

                if edge.source == edge.target {
                    // Self-loop: a small teardrop above the node.
                    let r = src.radius;
                    return Some(format!(
                        r#"<path d="M {:.1} {:.1} C {:.1} {:.1} {:.1} {:.1} {:.1} {:.1}" fill="none" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" marker-end="url(#{})"/>"#,
                        src.x - r * 0.5, src.y - r * 0.85,
                        src.x - r * 2.0, src.y - r * 3.5,
                        src.x + r * 2.0, src.y - r * 3.5,
                        src.x + r * 0.5, src.y - r * 0.85,
                        color, width, opacity, marker
                    ));
                }

                let dx = tgt.x - src.x;
                let dy = tgt.y - src.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < f64::EPSILON {
                    return None;
                }

                // Bend each edge slightly to its right so that the two
                // directions of a mutual pair do not overlap.
                let angle = dy.atan2(dx);
                let start_x = src.x + angle.cos() * src.radius;
                let start_y = src.y + angle.sin() * src.radius;
                let end_x = tgt.x - angle.cos() * tgt.radius;
                let end_y = tgt.y - angle.sin() * tgt.radius;
                let bend = 0.1 * dist;
                let ctrl_x = (start_x + end_x) / 2.0 - angle.sin() * bend;
                let ctrl_y = (start_y + end_y) / 2.0 + angle.cos() * bend;

                Some(format!(
                    r#"<path d="M {:.1} {:.1} Q {:.1} {:.1} {:.1} {:.1}" fill="none" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" marker-end="url(#{})"/>"#,
                    start_x, start_y, ctrl_x, ctrl_y, end_x, end_y, color, width, opacity, marker
                ))
            })
            .collect()
    }

    fn draw_nodes(&self, positions: &[PositionedNode]) -> Vec<String> {
        let scale = self.scale();
        positions
            .iter()
            .map(|node| {
                format!(
                    r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" fill-opacity="0.85" stroke="#000000" stroke-width="{:.2}"><title>{}</title></circle>"##,
                    node.x,
                    node.y,
                    node.radius,
                    node.fill,
                    0.5 * scale,
                    escape(node.name)
                )
            })
            .collect()
    }

    fn draw_labels(&self, positions: &[PositionedNode], graph: &GraphBundle) -> Vec<String> {
        let scale = self.scale();
        Self::labeled_nodes(graph, self.label_count.min(positions.len()))
            .into_iter()
            .map(|idx| {
                let node = &positions[idx];
                format!(
                    r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" font-weight="bold" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
                    node.x,
                    node.y,
                    8.0 * scale,
                    palette::TEXT,
                    escape(&Self::node_label(node.name))
                )
            })
            .collect()
    }

    fn draw_colorbar(&self) -> String {
        let scale = self.scale();
        let x = self.width as f64 - 110.0 * scale;
        let top = 110.0 * scale + (self.height as f64 - 170.0 * scale) * 0.2;
        let height = (self.height as f64 - 170.0 * scale) * 0.6;
        let width = 20.0 * scale;

        let mut out = format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="url(#inDegreeScale)" stroke="{}" stroke-width="{:.2}"/>"#,
            x,
            top,
            width,
            height,
            palette::TEXT,
            0.5 * scale
        );
        out.push('\n');
        out.push_str(&text(x + width + 6.0 * scale, top + 4.0 * scale, 11.0 * scale, "start", "1.0"));
        out.push('\n');
        out.push_str(&text(x + width + 6.0 * scale, top + height + 4.0 * scale, 11.0 * scale, "start", "0.0"));
        out.push('\n');
        let label_x = x + width + 40.0 * scale;
        let label_y = top + height / 2.0;
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" text-anchor="middle" fill="{}" transform="rotate(90 {:.1} {:.1})">In-degree (normalized)</text>"#,
            label_x,
            label_y,
            12.0 * scale,
            palette::TEXT,
            label_x,
            label_y
        ));
        out
    }

    fn generate_defs(&self) -> String {
        let scale = self.scale();
        let mut defs = String::new();

        for (id, color) in [("arrow", palette::EDGE), ("arrowMutual", palette::MUTUAL_EDGE)] {
            defs.push_str(&format!(
                r#"    <marker id="{}" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="{:.1}" markerHeight="{:.1}" markerUnits="userSpaceOnUse" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker>
"#,
                id,
                10.0 * scale,
                10.0 * scale,
                color
            ));
        }

        // Vertical gradient, low values at the bottom.
        defs.push_str("    <linearGradient id=\"inDegreeScale\" x1=\"0\" y1=\"1\" x2=\"0\" y2=\"0\">\n");
        for step in 0..=4 {
            let t = step as f64 / 4.0;
            defs.push_str(&format!(
                "      <stop offset=\"{:.0}%\" stop-color=\"{}\"/>\n",
                t * 100.0,
                palette::viridis(t)
            ));
        }
        defs.push_str("    </linearGradient>");
        defs
    }
}

impl Renderer for GraphRenderer {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn render(&self, bundle: &AnalysisBundle) -> Option<String> {
        let graph = &bundle.graph;
        if graph.is_empty() {
            return None;
        }

        let scale = self.scale();
        let positions = self.position_nodes(graph);
        let edges = self.draw_edges(&positions, graph, false);
        let mutual = self.draw_edges(&positions, graph, true);
        let nodes = self.draw_nodes(&positions);
        let labels = self.draw_labels(&positions, graph);

        let title = [
            text(
                self.width as f64 / 2.0,
                40.0 * scale,
                18.0 * scale,
                "middle",
                &format!("Production Graph: {}", bundle.name),
            ),
            text(
                self.width as f64 / 2.0,
                66.0 * scale,
                16.0 * scale,
                "middle",
                &format!(
                    "{} nodes, {} edges, {} mutual edges (red)",
                    graph.nodes.len(),
                    graph.edges.len(),
                    graph.mutual_edge_count()
                ),
            ),
        ];

        let content = [
            title.join("\n"),
            edges.join("\n"),
            mutual.join("\n"),
            nodes.join("\n"),
            labels.join("\n"),
            self.draw_colorbar(),
        ]
        .join("\n");

        Some(wrap_svg(self.width, self.height, &self.generate_defs(), &content))
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}
