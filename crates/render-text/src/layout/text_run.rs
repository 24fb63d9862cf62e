use unicode_script::Script;

use crate::font::{FontList, ScaledFontMetrics};
use crate::geometry::RangeF;
use crate::range::TextRange;
use crate::shaping::{GlyphId, GlyphOffset, NOTDEF, ShapedGlyphs};
use crate::style::BaselineStyle;
use crate::unicode::{is_grapheme_boundary, next_grapheme_boundary};

/// The unit of shaping: a maximal layout-text range sharing bidi level,
/// script and shaping-relevant style, plus its glyphs once shaped.
///
/// Glyphs are stored in visual order. All x coordinates are run-local, with
/// 0 at the run's left edge.
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Byte range in layout text.
    pub range: TextRange,
    pub level: u8,
    pub is_rtl: bool,
    pub script: Script,
    /// The font requested for this run (weight, slant and size applied).
    pub font: FontList,
    pub baseline_style: BaselineStyle,
    /// Vertical glyph shift from the baseline style, positive is down.
    pub baseline_offset: f32,
    pub metrics: ScaledFontMetrics,
    /// A forced line break; never drawn and zero width.
    pub is_newline: bool,

    pub glyphs: Vec<GlyphId>,
    /// Layout-text offset of the cluster each glyph belongs to.
    pub glyph_to_char: Vec<usize>,
    pub offsets: Vec<GlyphOffset>,
    pub advances: Vec<f32>,
    /// Pen position of each glyph.
    pub pen_x: Vec<f32>,
    pub width: f32,
    /// Sum of the widths of the runs visually left of this one on a single
    /// line.
    pub preceding_run_widths: f32,
}

impl TextRun {
    pub fn new(range: TextRange, level: u8, script: Script, font: FontList) -> Self {
        Self {
            range,
            level,
            is_rtl: level % 2 == 1,
            script,
            font,
            baseline_style: BaselineStyle::Normal,
            baseline_offset: 0.0,
            metrics: ScaledFontMetrics::approximate(0.0),
            is_newline: false,
            glyphs: Vec::new(),
            glyph_to_char: Vec::new(),
            offsets: Vec::new(),
            advances: Vec::new(),
            pen_x: Vec::new(),
            width: 0.0,
            preceding_run_widths: 0.0,
        }
    }

    /// Install shaper output; clusters are rebased from run-relative to
    /// layout-text offsets.
    pub fn set_glyphs(&mut self, shaped: ShapedGlyphs) {
        let start = self.range.start();
        let mut pen = 0.0;
        self.pen_x = shaped
            .advances
            .iter()
            .map(|advance| {
                let x = pen;
                pen += advance;
                x
            })
            .collect();
        self.width = pen;
        self.glyph_to_char = shaped.clusters.iter().map(|c| c + start).collect();
        self.glyphs = shaped.glyphs;
        self.offsets = shaped.offsets;
        self.advances = shaped.advances;
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Pen x of glyph `index`, or the run width past the last glyph.
    pub fn glyph_x(&self, index: usize) -> f32 {
        self.pen_x.get(index).copied().unwrap_or(self.width)
    }

    /// Character and glyph ranges of the cluster containing layout offset
    /// `pos`.
    pub fn cluster_at(&self, pos: usize) -> (TextRange, TextRange) {
        let Some(&first_cluster) = self.glyph_to_char.iter().min() else {
            return (self.range, TextRange::collapsed(0));
        };
        let start = self
            .glyph_to_char
            .iter()
            .copied()
            .filter(|&c| c <= pos)
            .max()
            .unwrap_or(first_cluster);
        let end = self
            .glyph_to_char
            .iter()
            .copied()
            .filter(|&c| c > start)
            .min()
            .unwrap_or(self.range.end());
        let first = self
            .glyph_to_char
            .iter()
            .position(|&c| c == start)
            .unwrap_or(0);
        let last = self
            .glyph_to_char
            .iter()
            .rposition(|&c| c == start)
            .unwrap_or(first);
        (TextRange::new(start, end), TextRange::new(first, last + 1))
    }

    /// Index of the first glyph of the cluster containing `pos`.
    pub fn char_to_glyph(&self, pos: usize) -> usize {
        self.cluster_at(pos).1.start()
    }

    /// Smallest glyph range covering every cluster touched by `range`.
    ///
    /// Endpoints inside a cluster widen to the cluster edges.
    pub fn char_range_to_glyph_range(&self, range: TextRange) -> TextRange {
        if range.is_empty() {
            return TextRange::default();
        }
        let (_, first) = self.cluster_at(range.min());
        let (_, last) = self.cluster_at(range.max() - 1);
        if self.is_rtl {
            TextRange::new(last.start(), first.end())
        } else {
            TextRange::new(first.start(), last.end())
        }
    }

    /// Run-local x span of the grapheme containing `index`.
    ///
    /// A cluster holding several graphemes (a ligature) is split evenly
    /// between them, in logical order for LTR and reversed for RTL.
    pub fn grapheme_bounds(&self, text: &str, index: usize) -> RangeF {
        if self.glyphs.is_empty() {
            return RangeF::new(0.0, self.width);
        }
        let (chars, glyphs) = self.cluster_at(index);
        let begin_x = self.glyph_x(glyphs.start());
        let end_x = self.glyph_x(glyphs.end());

        if chars.len() > 1 {
            let mut total = 0usize;
            let mut before = 0usize;
            let mut boundary = chars.start();
            while boundary < chars.end() {
                if is_grapheme_boundary(text, boundary) || boundary == chars.start() {
                    total += 1;
                    if boundary <= index {
                        before = total - 1;
                    }
                }
                boundary = next_grapheme_boundary(text, boundary).unwrap_or(chars.end());
            }
            if total > 1 {
                if self.is_rtl {
                    before = total - before - 1;
                }
                let cluster_width = end_x - begin_x;
                return RangeF::new(
                    begin_x + before as f32 * cluster_width / total as f32,
                    begin_x + (before + 1) as f32 * cluster_width / total as f32,
                );
            }
        }
        RangeF::new(begin_x, end_x)
    }

    /// Run-local x span covering the graphemes of `range`.
    pub fn grapheme_span_for_char_range(&self, text: &str, range: TextRange) -> RangeF {
        if range.is_empty() {
            return RangeF::default();
        }
        let mut left = range.min();
        let mut right = prev_char_start(text, range.max());
        if self.is_rtl {
            core::mem::swap(&mut left, &mut right);
        }
        let left_span = self.grapheme_bounds(text, left);
        if left == right {
            return left_span;
        }
        RangeF::new(left_span.start, self.grapheme_bounds(text, right).end)
    }

    /// Width of the graphemes in `range`.
    pub fn width_for_char_range(&self, text: &str, range: TextRange) -> f32 {
        if range.min() <= self.range.start() && range.max() >= self.range.end() {
            return self.width;
        }
        self.grapheme_span_for_char_range(text, range).len()
    }

    /// Leading (`trailing == false`) or trailing edge, run-local, of the
    /// grapheme at `index`. The run end maps to the trailing edge of the
    /// last grapheme.
    pub fn glyph_x_boundary(&self, text: &str, index: usize, trailing: bool) -> f32 {
        let (index, trailing) = if index >= self.range.end() {
            (prev_char_start(text, self.range.end()), true)
        } else {
            (index, trailing)
        };
        let bounds = self.grapheme_bounds(text, index);
        if trailing != self.is_rtl {
            bounds.max()
        } else {
            bounds.min()
        }
    }

    pub fn has_missing_glyphs(&self) -> bool {
        self.glyphs.contains(&NOTDEF)
    }

    pub fn count_missing_glyphs(&self) -> usize {
        self.glyphs.iter().filter(|&&g| g == NOTDEF).count()
    }
}

/// Start of the character ending at `end`.
pub(crate) fn prev_char_start(text: &str, end: usize) -> usize {
    let mut pos = end.saturating_sub(1).min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
