//! The shaping collaborator: text + script + direction + font → glyphs.

mod harfrust_shaper;

pub use harfrust_shaper::HarfrustShaper;

use unicode_script::Script;
use unicode_segmentation::UnicodeSegmentation;

use crate::font::{FontList, ScaledFontMetrics};

pub type GlyphId = u32;

/// Glyph id of the "missing glyph" (`.notdef`).
pub const NOTDEF: GlyphId = 0;

/// Per-font metrics needed by layout: height, baseline, cap height and
/// average character width.
pub trait FontMetricsProvider: Send + Sync {
    fn metrics(&self, font: &FontList) -> ScaledFontMetrics;
}

/// Shapes one run of text with an already chosen font.
///
/// Implementations are shared read-only between layouts and must be safe to
/// call concurrently.
pub trait Shaper: FontMetricsProvider {
    fn shape(&self, request: &ShapeRequest<'_>) -> ShapedGlyphs;
}

#[derive(Debug, Clone, Copy)]
pub struct ShapeRequest<'a> {
    pub text: &'a str,
    pub script: Script,
    pub is_rtl: bool,
    pub font: &'a FontList,
}

/// Offset of a glyph from its pen position, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphOffset {
    pub x: f32,
    /// Positive is down.
    pub y: f32,
}

/// Shaper output for one run. Glyphs are in visual (left-to-right) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedGlyphs {
    pub glyphs: Vec<GlyphId>,
    /// Byte offset, relative to the request text, of the cluster each glyph
    /// belongs to. Non-decreasing for LTR runs, non-increasing for RTL runs.
    pub clusters: Vec<usize>,
    pub offsets: Vec<GlyphOffset>,
    pub advances: Vec<f32>,
}

impl ShapedGlyphs {
    pub fn width(&self) -> f32 {
        self.advances.iter().sum()
    }

    /// One `.notdef` glyph per grapheme, each `advance` wide.
    ///
    /// Used when no real shaping is possible so layout still has extents.
    pub fn notdef_per_grapheme(text: &str, is_rtl: bool, advance: f32) -> Self {
        let mut clusters: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
        if is_rtl {
            clusters.reverse();
        }
        let count = clusters.len();
        Self {
            glyphs: vec![NOTDEF; count],
            clusters,
            offsets: vec![GlyphOffset::default(); count],
            advances: vec![advance; count],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notdef_fallback_orders_clusters_visually() {
        let ltr = ShapedGlyphs::notdef_per_grapheme("ab\u{301}c", false, 5.0);
        assert_eq!(ltr.clusters, vec![0, 1, 4]);
        assert_eq!(ltr.width(), 15.0);

        let rtl = ShapedGlyphs::notdef_per_grapheme("\u{5d0}\u{5d1}", true, 5.0);
        assert_eq!(rtl.clusters, vec![2, 0]);
        assert!(rtl.glyphs.iter().all(|&g| g == NOTDEF));
    }
}
