//! Pool composition renderer.
//!
//! Upper panel: stacked areas for the selected strands plus the residual
//! `other` bucket. Lower panel: pool size and unique strand count over time.

use super::{palette, text, truncate, wrap_svg, Renderer};
use crate::analysis::{AnalysisBundle, Composition};

pub struct CompositionRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for CompositionRenderer {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1000,
        }
    }
}

/// A plotting area with data-space to pixel-space mapping.
struct Axes {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Axes {
    fn px(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.left + (x - lo) / (hi - lo) * self.width
    }

    fn py(&self, y: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.top + self.height - (y - lo) / (hi - lo) * self.height
    }

    /// Frame, five ticks per axis, axis labels and a panel title.
    fn frame(&self, scale: f64, title: &str, x_label: &str, y_label: &str) -> String {
        let mut out = Vec::new();
        let bottom = self.top + self.height;

        for step in 0..=4 {
            let t = step as f64 / 4.0;
            let y_value = self.y_range.0 + t * (self.y_range.1 - self.y_range.0);
            let y = self.py(y_value);
            out.push(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.2}"/>"#,
                self.left,
                y,
                self.left + self.width,
                y,
                palette::GRID,
                scale
            ));
            out.push(text(self.left - 8.0 * scale, y + 4.0 * scale, 11.0 * scale, "end", &format!("{:.0}", y_value)));

            let x_value = self.x_range.0 + t * (self.x_range.1 - self.x_range.0);
            out.push(text(self.px(x_value), bottom + 18.0 * scale, 11.0 * scale, "middle", &format!("{:.0}", x_value)));
        }

        out.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
            self.left,
            self.top,
            self.width,
            self.height,
            palette::TEXT,
            scale
        ));
        out.push(text(self.left + self.width / 2.0, self.top - 12.0 * scale, 15.0 * scale, "middle", title));
        out.push(text(self.left + self.width / 2.0, bottom + 38.0 * scale, 12.0 * scale, "middle", x_label));

        let label_x = self.left - 52.0 * scale;
        let label_y = self.top + self.height / 2.0;
        out.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" text-anchor="middle" fill="{}" transform="rotate(-90 {:.1} {:.1})">{}</text>"#,
            label_x,
            label_y,
            12.0 * scale,
            palette::TEXT,
            label_x,
            label_y,
            super::escape(y_label)
        ));

        out.join("\n")
    }
}

/// Ops span of the chart; a single distinct op still gets a unit-wide axis.
fn x_range(ops: &[i64]) -> (f64, f64) {
    let lo = ops.iter().copied().min().unwrap_or(0) as f64;
    let hi = ops.iter().copied().max().unwrap_or(0) as f64;
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + 1.0)
    }
}

impl CompositionRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn scale(&self) -> f64 {
        self.width as f64 / 1400.0
    }

    /// Stacked layers, selected strands first and `other` last.
    fn layers(composition: &Composition) -> Vec<(String, Vec<i64>)> {
        composition
            .series
            .iter()
            .map(|s| {
                (
                    truncate(&s.strand, 12),
                    s.counts
                        .iter()
                        .map(|&c| i64::try_from(c).unwrap_or(i64::MAX))
                        .collect(),
                )
            })
            .chain(std::iter::once(("other".to_string(), composition.other.clone())))
            .collect()
    }

    fn draw_stack(&self, composition: &Composition, name: &str) -> String {
        let scale = self.scale();
        let layers = Self::layers(composition);
        let steps = composition.ops.len();

        // Cumulative tops of every layer.
        let mut base = vec![0i64; steps];
        let mut bands = Vec::with_capacity(layers.len());
        for (_, values) in &layers {
            let top: Vec<i64> = base
                .iter()
                .zip(values)
                .map(|(b, v)| b.saturating_add(*v))
                .collect();
            bands.push((base.clone(), top.clone()));
            base = top;
        }

        let y_min = bands
            .iter()
            .flat_map(|(_, top)| top.iter().copied())
            .min()
            .unwrap_or(0)
            .min(0);
        let y_max = bands
            .iter()
            .flat_map(|(_, top)| top.iter().copied())
            .max()
            .unwrap_or(0)
            .max(y_min + 1);

        let axes = Axes {
            left: 90.0 * scale,
            top: 60.0 * scale,
            width: self.width as f64 - 130.0 * scale,
            height: self.height as f64 * 0.5 - 90.0 * scale,
            x_range: x_range(&composition.ops),
            y_range: (y_min as f64, y_max as f64),
        };

        let colors = palette::tab20_spread(layers.len());
        let mut out = vec![axes.frame(
            scale,
            &format!("Pool Composition: {}", name),
            "Operations",
            "Count in pool",
        )];

        for ((lower, upper), color) in bands.iter().zip(&colors) {
            let mut points: Vec<String> = composition
                .ops
                .iter()
                .zip(upper)
                .map(|(&op, &y)| format!("{:.1},{:.1}", axes.px(op as f64), axes.py(y as f64)))
                .collect();
            points.extend(
                composition
                    .ops
                    .iter()
                    .zip(lower)
                    .rev()
                    .map(|(&op, &y)| format!("{:.1},{:.1}", axes.px(op as f64), axes.py(y as f64))),
            );
            out.push(format!(
                r#"<polygon points="{}" fill="{}" fill-opacity="0.8" stroke="none"/>"#,
                points.join(" "),
                color
            ));
        }

        // Legend, three columns in the upper-left corner.
        let row_height = 12.0 * scale;
        let col_width = 110.0 * scale;
        for (i, ((label, _), color)) in layers.iter().zip(&colors).enumerate() {
            let x = axes.left + 8.0 * scale + (i % 3) as f64 * col_width;
            let y = axes.top + 8.0 * scale + (i / 3) as f64 * row_height;
            out.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.8"/>"#,
                x,
                y,
                8.0 * scale,
                8.0 * scale,
                color
            ));
            out.push(text(x + 12.0 * scale, y + 7.5 * scale, 8.0 * scale, "start", label));
        }

        out.join("\n")
    }

    fn draw_lines(&self, composition: &Composition) -> String {
        let scale = self.scale();
        let y_max = composition
            .pool_size
            .iter()
            .chain(&composition.unique_count)
            .copied()
            .max()
            .unwrap_or(0)
            .max(1);

        let axes = Axes {
            left: 90.0 * scale,
            top: self.height as f64 * 0.5 + 60.0 * scale,
            width: self.width as f64 - 130.0 * scale,
            height: self.height as f64 * 0.5 - 120.0 * scale,
            x_range: x_range(&composition.ops),
            y_range: (0.0, y_max as f64),
        };

        let mut out = vec![axes.frame(scale, "Pool Size & Diversity", "Operations", "Count")];

        let series = [
            ("Pool size", palette::POOL_SIZE_LINE, &composition.pool_size),
            ("Unique strands", palette::UNIQUE_LINE, &composition.unique_count),
        ];
        for (i, (label, color, values)) in series.iter().enumerate() {
            let points: Vec<String> = composition
                .ops
                .iter()
                .zip(values.iter())
                .map(|(&op, &v)| format!("{:.1},{:.1}", axes.px(op as f64), axes.py(v as f64)))
                .collect();
            out.push(format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{:.2}" stroke-opacity="0.7"/>"#,
                points.join(" "),
                color,
                1.5 * scale
            ));

            let legend_y = axes.top + (14.0 + 16.0 * i as f64) * scale;
            let legend_x = axes.left + axes.width - 150.0 * scale;
            out.push(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.2}"/>"#,
                legend_x,
                legend_y,
                legend_x + 20.0 * scale,
                legend_y,
                color,
                2.0 * scale
            ));
            out.push(text(legend_x + 26.0 * scale, legend_y + 4.0 * scale, 11.0 * scale, "start", label));
        }

        out.join("\n")
    }
}

impl Renderer for CompositionRenderer {
    fn name(&self) -> &'static str {
        "composition"
    }

    fn render(&self, bundle: &AnalysisBundle) -> Option<String> {
        let composition = bundle.composition.composition()?;
        let content = format!(
            "{}\n{}",
            self.draw_stack(composition, &bundle.name),
            self.draw_lines(composition)
        );
        Some(wrap_svg(self.width, self.height, "", &content))
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisParams};
    use crate::model::{SimulationConfig, SimulationResult, Snapshot};

    fn bundle(snapshots: Vec<Snapshot>) -> AnalysisBundle {
        let result = SimulationResult {
            config: SimulationConfig {
                name: "pool".to_string(),
                extra: Default::default(),
            },
            production_edges: vec![],
            snapshots,
        };
        analyze(&result, &AnalysisParams::default())
    }

    fn snap(op: i64, pool: &[(&str, u64)], pool_size: u64, unique_count: u64) -> Snapshot {
        Snapshot {
            op,
            pool: pool.iter().map(|&(s, c)| (s.to_string(), c)).collect(),
            pool_size,
            unique_count,
        }
    }

    #[test]
    fn skipped_composition_renders_nothing() {
        let one = bundle(vec![snap(0, &[("X", 1)], 1, 1)]);
        assert!(CompositionRenderer::default().render(&one).is_none());
    }

    #[test]
    fn draws_one_band_per_series_plus_other() {
        let svg = CompositionRenderer::default()
            .render(&bundle(vec![
                snap(0, &[("X", 5)], 5, 1),
                snap(100, &[("X", 3), ("YYYYYYYYYYYYYYYY", 2)], 5, 2),
            ]))
            .unwrap();

        assert_eq!(svg.matches("<polygon").count(), 3);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Pool Composition: pool"));
        assert!(svg.contains(">YYYYYYYYYYYY</text>"));
        assert!(svg.contains(">other</text>"));
        assert!(svg.contains("Pool Size &amp; Diversity"));
    }

    #[test]
    fn equal_ops_still_produce_finite_coordinates() {
        let svg = CompositionRenderer::default()
            .render(&bundle(vec![
                snap(3, &[("X", 1)], 1, 1),
                snap(3, &[("X", 2)], 2, 1),
            ]))
            .unwrap();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }
}
