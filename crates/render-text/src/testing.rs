//! Test support: a deterministic shaper, a recording renderer and an
//! accessor for layout internals.

use hashbrown::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

use crate::font::{FontList, ScaledFontMetrics};
use crate::geometry::{Point, Rect};
use crate::layout::{Line, RunList};
use crate::render::{PositionedGlyph, Renderer};
use crate::render_text::{LayoutValidity, RenderText};
use crate::shaping::{FontMetricsProvider, GlyphId, GlyphOffset, NOTDEF, ShapeRequest, ShapedGlyphs, Shaper};
use crate::style::{Color, Styles};
use crate::unicode::is_default_ignorable;

/// Shapes one glyph per grapheme with a fixed advance.
///
/// The glyph id is the grapheme's first character. Invisible format
/// characters are zero width. Metrics come from
/// `ScaledFontMetrics::approximate`.
#[derive(Debug, Clone, Default)]
pub struct MonospaceShaper {
    advance: f32,
    bold_advance: Option<f32>,
    overrides: HashMap<char, f32>,
    missing: HashSet<char>,
    ligature: Option<(char, char)>,
}

impl MonospaceShaper {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            ..Self::default()
        }
    }

    /// Give graphemes starting with `c` their own advance.
    pub fn with_advance(mut self, c: char, advance: f32) -> Self {
        self.overrides.insert(c, advance);
        self
    }

    /// Use `advance` for every grapheme of a bold run.
    pub fn with_bold_advance(mut self, advance: f32) -> Self {
        self.bold_advance = Some(advance);
        self
    }

    /// Shape `c` to `.notdef`.
    pub fn with_missing(mut self, c: char) -> Self {
        self.missing.insert(c);
        self
    }

    /// Fuse the pair `first second` into one glyph spanning both graphemes.
    pub fn with_ligature(mut self, first: char, second: char) -> Self {
        self.ligature = Some((first, second));
        self
    }

    fn advance_of(&self, c: char, bold: bool) -> f32 {
        if is_default_ignorable(c) {
            return 0.0;
        }
        let base = self.bold_advance.filter(|_| bold).unwrap_or(self.advance);
        self.overrides.get(&c).copied().unwrap_or(base)
    }

    fn glyph_of(&self, c: char) -> GlyphId {
        if self.missing.contains(&c) {
            NOTDEF
        } else {
            c as GlyphId
        }
    }
}

impl FontMetricsProvider for MonospaceShaper {
    fn metrics(&self, font: &FontList) -> ScaledFontMetrics {
        ScaledFontMetrics::approximate(font.size)
    }
}

impl Shaper for MonospaceShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> ShapedGlyphs {
        let graphemes: Vec<(usize, &str)> = request.text.grapheme_indices(true).collect();
        let bold = request.font.weight.is_bold();
        let mut shaped = ShapedGlyphs::default();
        let mut index = 0;
        while index < graphemes.len() {
            let (offset, grapheme) = graphemes[index];
            let first = grapheme.chars().next().unwrap_or(' ');
            let mut advance = self.advance_of(first, bold);
            let fused = match (self.ligature, graphemes.get(index + 1)) {
                (Some((a, b)), Some((_, next))) => grapheme == a.to_string() && *next == b.to_string(),
                _ => false,
            };
            if fused {
                advance += self.advance_of(self.ligature.map_or(' ', |(_, b)| b), bold);
                index += 1;
            }
            shaped.glyphs.push(self.glyph_of(first));
            shaped.clusters.push(offset);
            shaped.offsets.push(GlyphOffset::default());
            shaped.advances.push(advance);
            index += 1;
        }
        if request.is_rtl {
            shaped.glyphs.reverse();
            shaped.clusters.reverse();
            shaped.advances.reverse();
        }
        shaped
    }
}

/// One recorded `Renderer` call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clip(Rect),
    PopClip,
    Fill {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Glyphs {
        font: FontList,
        glyphs: Vec<PositionedGlyph>,
        blur: f32,
    },
}

impl DrawCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Clip(_) => "clip",
            DrawCommand::PopClip => "pop_clip",
            DrawCommand::Fill { .. } => "fill",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Glyphs { .. } => "glyphs",
        }
    }
}

/// A `Renderer` that keeps every call for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Fill { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<(Point, Point, Color)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line { from, to, color, .. } => Some((*from, *to, *color)),
                _ => None,
            })
            .collect()
    }

    /// Every drawn glyph, in call order.
    pub fn glyphs(&self) -> Vec<PositionedGlyph> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Glyphs { glyphs, .. } => Some(glyphs.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn glyph_colors(&self) -> Vec<Color> {
        self.glyphs().iter().map(|glyph| glyph.color).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn push_clip_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn draw_glyphs(&mut self, font: &FontList, glyphs: &[PositionedGlyph], blur: f32) {
        self.commands.push(DrawCommand::Glyphs {
            font: font.clone(),
            glyphs: glyphs.to_vec(),
            blur,
        });
    }
}

/// Read access to the layout state behind a `RenderText`, bringing it up to
/// date first.
pub struct TestApi<'a> {
    render_text: &'a mut RenderText,
}

impl<'a> TestApi<'a> {
    pub fn new(render_text: &'a mut RenderText) -> Self {
        Self { render_text }
    }

    pub fn run_list(&mut self) -> &RunList {
        self.render_text.backend().run_list()
    }

    /// Logical run indices from left to right.
    pub fn visual_run_order(&mut self) -> Vec<usize> {
        let runs = self.run_list();
        (0..runs.len()).map(|v| runs.visual_to_logical(v)).collect()
    }

    pub fn lines(&mut self) -> &[Line] {
        self.render_text.backend().lines()
    }

    /// Styles in logical-text space.
    pub fn styles(&self) -> &Styles {
        self.render_text.styles()
    }

    /// Styles remapped onto the layout text.
    pub fn layout_styles(&mut self) -> &Styles {
        self.render_text.layout_styles()
    }

    /// Validity without triggering layout.
    pub fn validity(&self) -> LayoutValidity {
        self.render_text.validity()
    }

    pub fn layout_text(&mut self) -> &str {
        self.render_text.ensure_layout();
        self.render_text.layout().text()
    }

    pub fn display_offset(&mut self) -> f32 {
        self.render_text.get_updated_display_offset()
    }
}

#[cfg(test)]
mod tests {
    use unicode_script::Script;

    use super::*;

    fn request<'a>(text: &'a str, is_rtl: bool, font: &'a FontList) -> ShapeRequest<'a> {
        ShapeRequest {
            text,
            script: Script::Latin,
            is_rtl,
            font,
        }
    }

    #[test]
    fn monospace_shaper_emits_a_glyph_per_grapheme() {
        let font = FontList::default();
        let shaper = MonospaceShaper::new(10.0).with_advance('w', 15.0).with_missing('x');
        let shaped = shaper.shape(&request("we\u{301}x", false, &font));
        assert_eq!(shaped.clusters, vec![0, 1, 4]);
        assert_eq!(shaped.advances, vec![15.0, 10.0, 10.0]);
        assert_eq!(shaped.glyphs[2], NOTDEF);

        let rtl = shaper.shape(&request("ab", true, &font));
        assert_eq!(rtl.clusters, vec![1, 0]);
    }

    #[test]
    fn ligatures_fuse_two_graphemes() {
        let font = FontList::default();
        let shaper = MonospaceShaper::new(10.0).with_ligature('f', 'i');
        let shaped = shaper.shape(&request("fix", false, &font));
        assert_eq!(shaped.clusters, vec![0, 2]);
        assert_eq!(shaped.advances, vec![20.0, 10.0]);
    }
}
