extern crate alloc;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// One ranked dominant color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColor {
    /// Mean cluster color, r/g/b.
    pub rgb: [u8; 3],
    /// Lowercase `#rrggbb`.
    pub hex: String,
    /// CSS-style `rgb(r,g,b)`.
    pub rgb_string: String,
    /// Pixels aggregated into this cluster.
    pub pixel_count: usize,
}

/// Format ranked (color, count) pairs as-is. Ranking and truncation already
/// happened in the engine; no color is recomputed here.
pub(crate) fn build_theme_colors(ranked: Vec<([u8; 3], usize)>) -> Vec<ThemeColor> {
    ranked
        .into_iter()
        .map(|([r, g, b], pixel_count)| ThemeColor {
            rgb: [r, g, b],
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
            rgb_string: format!("rgb({r},{g},{b})"),
            pixel_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        let colors = build_theme_colors(vec![([0x0a, 0xff, 0x00], 3)]);
        assert_eq!(colors[0].hex, "#0aff00");
    }

    #[test]
    fn rgb_string_matches_channels() {
        let colors = build_theme_colors(vec![([100, 100, 100], 100)]);
        assert_eq!(colors[0].hex, "#646464");
        assert_eq!(colors[0].rgb_string, "rgb(100,100,100)");
        assert_eq!(colors[0].pixel_count, 100);
    }

    #[test]
    fn order_is_preserved() {
        let colors = build_theme_colors(vec![([1, 2, 3], 9), ([4, 5, 6], 4)]);
        assert_eq!(colors[0].rgb, [1, 2, 3]);
        assert_eq!(colors[1].rgb, [4, 5, 6]);
    }
}
