//! Cycle table renderer.

use super::{palette, text, truncate, wrap_svg, Renderer};
use crate::analysis::{AnalysisBundle, RankedCycle};

pub struct CycleRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for CycleRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl CycleRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn scale(&self) -> f64 {
        self.width as f64 / 1200.0
    }

    /// Configured height, grown when the table needs more room.
    fn canvas_height(&self, cycle_count: usize) -> u32 {
        // Header row plus one row per cycle, below the title block.
        let rows = cycle_count + 1;
        let needed = (110.0 + rows as f64 * 24.0 + 40.0) * self.scale();
        self.height.max(needed.ceil() as u32)
    }

    /// `A → B → C → A`, each identifier cut to 10 characters.
    pub fn cycle_text(cycle: &RankedCycle) -> String {
        let mut parts: Vec<String> = cycle.path.iter().map(|s| truncate(s, 10)).collect();
        if let Some(first) = parts.first().cloned() {
            parts.push(first);
        }
        parts.join(" → ")
    }

    fn draw_table(&self, cycles: &[RankedCycle]) -> String {
        let scale = self.scale();
        let left = 40.0 * scale;
        let width = self.width as f64 - 80.0 * scale;
        let row_height = 24.0 * scale;
        let top = 110.0 * scale;
        let columns = [
            ("Length", 0.0),
            ("Cycle", 0.1),
            ("Total Weight", 0.85),
        ];

        let mut out = Vec::new();
        let rows = cycles.len() + 1;

        for row in 0..=rows {
            let y = top + row as f64 * row_height;
            out.push(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.2}"/>"#,
                left,
                y,
                left + width,
                y,
                palette::TEXT,
                0.5 * scale
            ));
        }
        let bottom = top + rows as f64 * row_height;
        for x in columns.iter().map(|(_, at)| *at).chain(std::iter::once(1.0)) {
            let x = left + x * width;
            out.push(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.2}"/>"#,
                x,
                top,
                x,
                bottom,
                palette::TEXT,
                0.5 * scale
            ));
        }

        let cell = |row: usize, col: usize, content: &str| {
            let x = left + columns[col].1 * width + 6.0 * scale;
            let y = top + row as f64 * row_height + row_height * 0.68;
            text(x, y, 11.0 * scale, "start", content)
        };

        for (col, (header, _)) in columns.iter().enumerate() {
            out.push(cell(0, col, header));
        }
        for (i, cycle) in cycles.iter().enumerate() {
            out.push(cell(i + 1, 0, &cycle.len().to_string()));
            out.push(cell(i + 1, 1, &Self::cycle_text(cycle)));
            out.push(cell(i + 1, 2, &cycle.total_weight.to_string()));
        }

        out.join("\n")
    }
}

impl Renderer for CycleRenderer {
    fn name(&self) -> &'static str {
        "cycles"
    }

    fn render(&self, bundle: &AnalysisBundle) -> Option<String> {
        if bundle.graph.is_empty() {
            return None;
        }

        let scale = self.scale();
        let report = &bundle.cycles;
        let cx = self.width as f64 / 2.0;
        let height = self.canvas_height(report.cycles.len());

        let mut content = vec![
            text(
                cx,
                40.0 * scale,
                18.0 * scale,
                "middle",
                &format!("Cycles in Production Graph: {}", bundle.name),
            ),
            text(
                cx,
                66.0 * scale,
                16.0 * scale,
                "middle",
                &format!(
                    "{} cycles found (length 2-{})",
                    report.total_found, report.max_len
                ),
            ),
        ];

        if report.cycles.is_empty() {
            content.push(text(
                cx,
                height as f64 / 2.0,
                22.0 * scale,
                "middle",
                &format!("No cycles found (length 2-{})", report.max_len),
            ));
        } else {
            content.push(self.draw_table(&report.cycles));
        }

        Some(wrap_svg(self.width, height, "", &content.join("\n")))
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisParams};
    use crate::model::{ProductionEdge, SimulationConfig, SimulationResult};

    fn bundle(edges: Vec<ProductionEdge>) -> AnalysisBundle {
        let result = SimulationResult {
            config: SimulationConfig {
                name: "loops".to_string(),
                extra: Default::default(),
            },
            production_edges: edges,
            snapshots: vec![],
        };
        analyze(&result, &AnalysisParams::default())
    }

    #[test]
    fn cycle_text_closes_the_loop() {
        let cycle = RankedCycle {
            path: vec!["ACGTACGTACGT".to_string(), "TT".to_string()],
            total_weight: 3,
        };
        assert_eq!(
            CycleRenderer::cycle_text(&cycle),
            "ACGTACGTAC → TT → ACGTACGTAC"
        );
    }

    #[test]
    fn acyclic_graph_shows_placeholder() {
        let svg = CycleRenderer::default()
            .render(&bundle(vec![ProductionEdge::new("A", "B", 1)]))
            .unwrap();
        assert!(svg.contains("No cycles found (length 2-4)"));
        assert!(svg.contains("0 cycles found (length 2-4)"));
    }

    #[test]
    fn table_lists_ranked_cycles() {
        let svg = CycleRenderer::default()
            .render(&bundle(vec![
                ProductionEdge::new("A", "B", 1),
                ProductionEdge::new("B", "C", 2),
                ProductionEdge::new("C", "A", 3),
            ]))
            .unwrap();
        assert!(svg.contains("1 cycles found (length 2-4)"));
        assert!(svg.contains(">A → B → C → A</text>"));
        assert!(svg.contains(">6</text>"));
        assert!(svg.contains(">Total Weight</text>"));
    }

    #[test]
    fn long_tables_grow_the_canvas() {
        let renderer = CycleRenderer::default();
        assert_eq!(renderer.canvas_height(20), 800);
        assert_eq!(renderer.canvas_height(100), 2574);

        let edges: Vec<ProductionEdge> = (0..40)
            .flat_map(|i| {
                let a = format!("a{i:02}");
                let b = format!("b{i:02}");
                [
                    ProductionEdge::new(a.clone(), b.clone(), 1),
                    ProductionEdge::new(b, a, 1),
                ]
            })
            .collect();
        let result = SimulationResult {
            config: SimulationConfig {
                name: "many".to_string(),
                extra: Default::default(),
            },
            production_edges: edges,
            snapshots: vec![],
        };
        let params = AnalysisParams {
            cycle_report_limit: 40,
            ..AnalysisParams::default()
        };
        let svg = renderer.render(&analyze(&result, &params)).unwrap();
        assert!(svg.contains(r#"height="1134""#));
    }

    #[test]
    fn empty_graph_is_skipped() {
        assert!(CycleRenderer::default().render(&bundle(vec![])).is_none());
    }
}
