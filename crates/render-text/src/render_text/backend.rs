use std::sync::Arc;

use crate::font::{FontList, ScaledFontMetrics};
use crate::geometry::{Point, RangeF, Size};
use crate::layout::{
    ItemizeInput, Line, LineBreaker, LineSegment, RunList, TextRun, WordWrapBehavior, itemize,
    word_break_list,
};
use crate::range::TextRange;
use crate::render::{FadeEffect, PositionedGlyph, Renderer};
use crate::shaping::Shaper;
use crate::style::{Color, Shadow, Styles, with_alpha_factor};
use crate::unicode::next_grapheme_boundary;

use super::LayoutValidity;

/// Layout inputs, all in layout-text space.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub styles: &'a Styles,
    pub font: &'a FontList,
    pub paragraph_rtl: bool,
    pub multiline: bool,
    /// Line width limit in multiline mode; 0 means unlimited.
    pub max_width: f32,
    pub max_lines: usize,
    pub word_wrap: WordWrapBehavior,
    pub min_line_height: f32,
}

/// Where a line-local x coordinate falls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorHit {
    /// Left of the line's content, or the line is empty.
    BeforeLine,
    /// Right of the line's content.
    AfterLine,
    Grapheme {
        /// Layout-text range of the grapheme.
        range: TextRange,
        is_rtl: bool,
        /// The point is on the left half of the grapheme.
        left_half: bool,
    },
}

/// Everything the visual text pass needs besides the layout itself.
#[derive(Debug, Clone, Copy)]
pub struct VisualTextRequest<'a> {
    pub text: &'a str,
    pub styles: &'a Styles,
    /// View-space top-left corner of each line.
    pub line_origins: &'a [Point],
    /// Layout-text range drawn with the given color instead of the style.
    pub selection: Option<(TextRange, Color)>,
    pub shadows: &'a [Shadow],
    pub fades: &'a [FadeEffect],
}

/// The shaping and geometry half of `RenderText`.
///
/// The facade owns text, styles, selection and index conversions; a backend
/// owns runs and lines for one layout text and answers geometry queries in
/// line-local coordinates.
pub trait TextLayoutBackend: Send + Sync {
    /// Bring runs and lines up to date. `validity` states how stale they
    /// are; `Valid` is a no-op.
    fn ensure_layout(&mut self, request: &LayoutRequest<'_>, validity: LayoutValidity);
    fn run_list(&self) -> &RunList;
    fn lines(&self) -> &[Line];
    /// Width of the widest line and the sum of line heights.
    fn content_size(&self) -> Size;
    fn font_metrics(&self, font: &FontList) -> ScaledFontMetrics;
    fn find_cursor_position(&self, text: &str, line: usize, x: f32) -> CursorHit;
    /// Line and line-local bounds of the grapheme at layout `index`, with
    /// `start` on the leading edge.
    fn glyph_bounds(&self, text: &str, index: usize) -> Option<(usize, RangeF)>;
    /// Line-local spans covering layout `range`, merged where they touch.
    fn substring_bounds(&self, text: &str, range: TextRange) -> Vec<(usize, RangeF)>;
    fn draw_visual_text(&self, request: &VisualTextRequest<'_>, renderer: &mut dyn Renderer);
    fn fresh(&self) -> Box<dyn TextLayoutBackend>;
}

/// Backend built on a `Shaper`: itemize, shape, then break lines.
pub struct ShapedLayout {
    shaper: Arc<dyn Shaper>,
    runs: RunList,
    lines: Vec<Line>,
    size: Size,
}

impl ShapedLayout {
    pub fn new(shaper: Arc<dyn Shaper>) -> Self {
        Self {
            shaper,
            runs: RunList::default(),
            lines: vec![Line::default()],
            size: Size::default(),
        }
    }

    pub fn shaper(&self) -> &Arc<dyn Shaper> {
        &self.shaper
    }

    fn break_lines(&mut self, request: &LayoutRequest<'_>) {
        let metrics = self.shaper.metrics(request.font);
        let font_height = metrics.height();
        let min_height = font_height.max(request.min_line_height);
        let min_baseline = metrics.baseline() + ((min_height - font_height) / 2.0).floor();
        let max_width = if request.multiline { request.max_width } else { 0.0 };

        let mut breaker = LineBreaker::new(
            request.text,
            &self.runs,
            max_width,
            min_height,
            min_baseline,
            request.word_wrap,
        );
        let max_lines = if request.multiline {
            breaker.construct_multi_lines(&word_break_list(request.text));
            request.max_lines
        } else {
            breaker.construct_single_line();
            0
        };
        let (lines, size) = breaker.finalize(max_lines);
        tracing::debug!(
            lines = lines.len(),
            width = size.width,
            height = size.height,
            multiline = request.multiline,
            "broke layout text into lines"
        );
        self.lines = lines;
        self.size = size;
    }

    fn segment_run(&self, segment: &LineSegment) -> &TextRun {
        &self.runs.runs()[segment.run]
    }
}

impl core::fmt::Debug for ShapedLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShapedLayout")
            .field("runs", &self.runs.len())
            .field("lines", &self.lines.len())
            .field("size", &self.size)
            .finish()
    }
}

impl TextLayoutBackend for ShapedLayout {
    fn ensure_layout(&mut self, request: &LayoutRequest<'_>, validity: LayoutValidity) {
        match validity {
            LayoutValidity::Valid => return,
            LayoutValidity::NeedsItemize => {
                let mut runs = itemize(ItemizeInput {
                    text: request.text,
                    paragraph_rtl: request.paragraph_rtl,
                    font: request.font,
                    styles: request.styles,
                });
                runs.shape(request.text, request.font, self.shaper.as_ref());
                self.runs = runs;
            }
            LayoutValidity::NeedsLineBreak => {}
        }
        self.break_lines(request);
    }

    fn run_list(&self) -> &RunList {
        &self.runs
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn font_metrics(&self, font: &FontList) -> ScaledFontMetrics {
        self.shaper.metrics(font)
    }

    fn find_cursor_position(&self, text: &str, line: usize, x: f32) -> CursorHit {
        let Some(line) = self.lines.get(line) else {
            return CursorHit::AfterLine;
        };
        if line.segments.is_empty() || x < 0.0 {
            return CursorHit::BeforeLine;
        }
        for segment in &line.segments {
            if x >= segment.x_range.end {
                continue;
            }
            let run = self.segment_run(segment);
            let run_x = segment.run_x_range.start + (x - segment.x_range.start);
            let mut start = segment.char_range.start();
            while start < segment.char_range.end() {
                let end = next_grapheme_boundary(text, start)
                    .unwrap_or(segment.char_range.end())
                    .min(segment.char_range.end());
                let bounds = run.grapheme_bounds(text, start);
                if run_x >= bounds.min() && run_x < bounds.max() {
                    return CursorHit::Grapheme {
                        range: TextRange::new(start, end),
                        is_rtl: run.is_rtl,
                        left_half: run_x < (bounds.min() + bounds.max()) / 2.0,
                    };
                }
                start = end;
            }
        }
        CursorHit::AfterLine
    }

    fn glyph_bounds(&self, text: &str, index: usize) -> Option<(usize, RangeF)> {
        self.lines.iter().enumerate().find_map(|(line_index, line)| {
            let segment = line
                .segments
                .iter()
                .find(|s| s.char_range.start() <= index && index < s.char_range.end())?;
            let run = self.segment_run(segment);
            let bounds = run.grapheme_bounds(text, index);
            let span = RangeF::new(
                segment.run_to_line_x(bounds.start),
                segment.run_to_line_x(bounds.end),
            );
            Some((line_index, if run.is_rtl { span.reversed() } else { span }))
        })
    }

    fn substring_bounds(&self, text: &str, range: TextRange) -> Vec<(usize, RangeF)> {
        let range = range.normalized();
        let mut bounds: Vec<(usize, RangeF)> = Vec::new();
        if range.is_empty() {
            return bounds;
        }
        for (line_index, line) in self.lines.iter().enumerate() {
            for segment in &line.segments {
                let Some(overlap) = segment.char_range.intersect(&range).filter(|r| !r.is_empty())
                else {
                    continue;
                };
                let run = self.segment_run(segment);
                let span = run.grapheme_span_for_char_range(text, overlap);
                let x = RangeF::new(
                    segment.run_to_line_x(span.min()),
                    segment.run_to_line_x(span.max()),
                );
                match bounds.last_mut() {
                    Some((last_line, last)) if *last_line == line_index && (last.end - x.start).abs() < 0.5 => {
                        last.end = x.end;
                    }
                    _ => bounds.push((line_index, x)),
                }
            }
        }
        bounds
    }

    fn draw_visual_text(&self, request: &VisualTextRequest<'_>, renderer: &mut dyn Renderer) {
        let mut painted: Vec<(&TextRun, &LineSegment, f32, f32, Vec<PositionedGlyph>)> = Vec::new();
        for (line_index, line) in self.lines.iter().enumerate() {
            let Some(&origin) = request.line_origins.get(line_index) else {
                break;
            };
            for segment in &line.segments {
                let run = self.segment_run(segment);
                if run.is_newline {
                    continue;
                }
                let baseline_y = origin.y + line.baseline + run.baseline_offset;
                let glyphs = segment_glyphs(run, segment, request, origin.x, baseline_y);
                painted.push((run, segment, origin.x, baseline_y, glyphs));
            }
        }

        // Every shadow sits below every glyph.
        for shadow in request.shadows {
            for (run, _, _, _, glyphs) in &painted {
                let shadowed: Vec<PositionedGlyph> = glyphs
                    .iter()
                    .map(|glyph| PositionedGlyph {
                        position: glyph.position + shadow.offset,
                        color: with_alpha_factor(shadow.color, glyph.color.alpha as f32 / 255.0),
                        ..*glyph
                    })
                    .collect();
                renderer.draw_glyphs(&run.font, &shadowed, shadow.blur);
            }
        }
        for (run, segment, line_x, baseline_y, glyphs) in &painted {
            renderer.draw_glyphs(&run.font, glyphs, 0.0);
            draw_decorations(run, segment, request, *line_x, *baseline_y, renderer);
        }
    }

    fn fresh(&self) -> Box<dyn TextLayoutBackend> {
        Box::new(ShapedLayout::new(Arc::clone(&self.shaper)))
    }
}

fn segment_glyphs(
    run: &TextRun,
    segment: &LineSegment,
    request: &VisualTextRequest<'_>,
    line_x: f32,
    baseline_y: f32,
) -> Vec<PositionedGlyph> {
    let range = segment.char_range;
    (0..run.glyph_count())
        .filter(|&i| range.start() <= run.glyph_to_char[i] && run.glyph_to_char[i] < range.end())
        .map(|i| {
            let cluster = run.glyph_to_char[i];
            let color = match request.selection {
                Some((selection, color)) if selection.contains_index(cluster) => color,
                _ => *request.styles.colors.value_at(cluster),
            };
            let offset = run.offsets[i];
            let mut glyph = PositionedGlyph {
                id: run.glyphs[i],
                position: Point::new(
                    line_x + segment.run_to_line_x(run.pen_x[i]) + offset.x,
                    baseline_y + offset.y,
                ),
                color,
            };
            for fade in request.fades {
                fade.apply(&mut glyph, run.advances[i]);
            }
            glyph
        })
        .collect()
}

fn draw_decorations(
    run: &TextRun,
    segment: &LineSegment,
    request: &VisualTextRequest<'_>,
    line_x: f32,
    baseline_y: f32,
    renderer: &mut dyn Renderer,
) {
    let thickness = (run.font.size / 18.0).max(1.0);
    for (span, style) in request.styles.spans() {
        if !(style.underline || style.strike || style.diagonal_strike) {
            continue;
        }
        let Some(overlap) = span.intersect(&segment.char_range).filter(|r| !r.is_empty()) else {
            continue;
        };
        let x = run.grapheme_span_for_char_range(request.text, overlap);
        let left = line_x + segment.run_to_line_x(x.min());
        let right = line_x + segment.run_to_line_x(x.max());
        if style.underline {
            let y = baseline_y + (run.font.size / 9.0).round().max(1.0);
            renderer.draw_line(Point::new(left, y), Point::new(right, y), thickness, style.color);
        }
        if style.strike {
            let y = baseline_y - run.metrics.x_height / 2.0;
            renderer.draw_line(Point::new(left, y), Point::new(right, y), thickness, style.color);
        }
        if style.diagonal_strike {
            renderer.draw_line(
                Point::new(left, baseline_y + run.metrics.descent),
                Point::new(right, baseline_y - run.metrics.ascent),
                thickness,
                style.color,
            );
        }
    }
}
