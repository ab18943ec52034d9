//! SVG renderers - each draws one artifact from an analysis bundle.

pub mod composition;
pub mod cycles;
pub mod graph;
pub mod palette;

pub use composition::CompositionRenderer;
pub use cycles::CycleRenderer;
pub use graph::GraphRenderer;

use crate::analysis::AnalysisBundle;

/// Trait for all artifact renderers.
pub trait Renderer {
    /// Artifact name, used as the output file suffix.
    fn name(&self) -> &'static str;

    /// Draw the artifact, or `None` when the bundle has nothing to show.
    fn render(&self, bundle: &AnalysisBundle) -> Option<String>;

    /// File extension for this renderer's output.
    fn extension(&self) -> &'static str;
}

/// Escape text for use inside SVG text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// First `max` characters of `text`.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// A left-aligned or centered text element.
pub(crate) fn text(x: f64, y: f64, size: f64, anchor: &str, content: &str) -> String {
    format!(
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" text-anchor="{}" fill="{}">{}</text>"#,
        x,
        y,
        size,
        anchor,
        palette::TEXT,
        escape(content)
    )
}

pub(crate) fn wrap_svg(width: u32, height: u32, defs: &str, content: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">
  <defs>
{}
  </defs>
  <rect width="100%" height="100%" fill="{}"/>
{}
</svg>
"#,
        width,
        height,
        width,
        height,
        defs,
        palette::BG,
        content
    )
}
