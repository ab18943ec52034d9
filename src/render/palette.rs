//! Color maps used by the renderers.

/// Canvas background.
pub const BG: &str = "#ffffff";

/// Ordinary production edges.
pub const EDGE: &str = "#cccccc";

/// Edges that belong to a mutual pair.
pub const MUTUAL_EDGE: &str = "#ff0000";

pub const POOL_SIZE_LINE: &str = "#0000ff";
pub const UNIQUE_LINE: &str = "#ff0000";

pub const TEXT: &str = "#222222";
pub const GRID: &str = "#e5e5e5";

/// Viridis anchor colors at evenly spaced positions in 0.0..=1.0.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Viridis color for `t`, clamped to 0.0..=1.0, linearly interpolated
/// between anchors.
pub fn viridis(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    let frac = scaled - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (VIRIDIS[lo], VIRIDIS[hi]);
    to_hex((mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2)))
}

/// Colors for `count` stacked series, spread evenly over the 20-color
/// qualitative map.
pub fn tab20_spread(count: usize) -> Vec<&'static str> {
    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            TAB20[((t * TAB20.len() as f64) as usize).min(TAB20.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), "#440154");
        assert_eq!(viridis(1.0), "#fde725");
        assert_eq!(viridis(7.0), "#fde725");
        assert_eq!(viridis(f64::NAN), "#440154");
    }

    #[test]
    fn tab20_spread_covers_both_ends() {
        let colors = tab20_spread(21);
        assert_eq!(colors.len(), 21);
        assert_eq!(colors[0], "#1f77b4");
        assert_eq!(colors[20], "#9edae5");
        assert_eq!(tab20_spread(1), vec!["#1f77b4"]);
    }
}
