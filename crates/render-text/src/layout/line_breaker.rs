use serde::{Deserialize, Serialize};
use unicode_linebreak::linebreaks;

use crate::break_list::BreakList;
use crate::geometry::{RangeF, Size};
use crate::layout::itemize::RunList;
use crate::layout::line::{Line, LineSegment};
use crate::range::TextRange;
use crate::unicode::next_grapheme_boundary;

/// What to do with a word wider than the available line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordWrapBehavior {
    /// Let the word overflow the line.
    IgnoreLongWords,
    /// Keep what fits and drop the rest of the word.
    TruncateLongWords,
    /// Continue the word on the following lines.
    #[default]
    WrapLongWords,
}

/// Word break list over `text`: each entry's value is the start offset of
/// the word it begins, so `value_at(i)` is the start of the word holding `i`.
///
/// Words end at UAX-14 break opportunities and therefore carry their
/// trailing whitespace and any mandatory break.
pub fn word_break_list(text: &str) -> BreakList<usize> {
    let mut words = BreakList::new(0);
    words.set_max(text.len());
    for (offset, _) in linebreaks(text) {
        if offset < text.len() {
            words.apply_value(offset, TextRange::new(offset, text.len()));
        }
    }
    words
}

/// Greedy word-at-a-time line breaker over shaped runs.
///
/// Words are split into per-run segments and appended to the current line
/// until one does not fit; trailing whitespace may hang past the edge.
#[derive(Debug)]
pub struct LineBreaker<'a> {
    text: &'a str,
    runs: &'a RunList,
    max_width: f32,
    min_height: f32,
    min_baseline: f32,
    behavior: WordWrapBehavior,

    lines: Vec<Line>,
    available_width: f32,
    max_ascent: f32,
    max_descent: f32,
    total_size: Size,
}

impl<'a> LineBreaker<'a> {
    /// `max_width <= 0` lays out without a width limit.
    pub fn new(
        text: &'a str,
        runs: &'a RunList,
        max_width: f32,
        min_height: f32,
        min_baseline: f32,
        behavior: WordWrapBehavior,
    ) -> Self {
        let max_width = if max_width > 0.0 { max_width } else { f32::INFINITY };
        Self {
            text,
            runs,
            max_width,
            min_height,
            min_baseline,
            behavior,
            lines: vec![Line::default()],
            available_width: max_width,
            max_ascent: 0.0,
            max_descent: 0.0,
            total_size: Size::default(),
        }
    }

    /// Put every run on one line.
    pub fn construct_single_line(&mut self) {
        let runs = self.runs;
        for (index, run) in runs.runs().iter().enumerate() {
            self.add_segment(LineSegment {
                run: index,
                char_range: run.range,
                x_range: RangeF::default(),
                run_x_range: RangeF::new(0.0, run.width),
                width: run.width,
            });
        }
    }

    /// Break the runs into lines at the opportunities in `words`.
    pub fn construct_multi_lines(&mut self, words: &BreakList<usize>) {
        for index in 0..words.breaks().len() {
            let word = words.get_range(index);
            if word.is_empty() {
                continue;
            }
            let segments = self.word_segments(word);
            let ends_with_newline = segments
                .last()
                .is_some_and(|s| self.runs.runs()[s.run].is_newline);
            let visible_width = self.visible_width(&segments);

            if visible_width > self.available_width && !self.line_is_empty() {
                self.advance_line();
            }
            self.add_word_to_line(segments);
            if ends_with_newline {
                self.advance_line();
            }
        }
    }

    /// Close the last line and return every line with the total size.
    ///
    /// With `max_lines > 0` later lines are dropped.
    pub fn finalize(mut self, max_lines: usize) -> (Vec<Line>, Size) {
        self.advance_line();
        self.lines.pop();
        if max_lines > 0 && self.lines.len() > max_lines {
            self.lines.truncate(max_lines);
            self.total_size = Size::new(
                self.lines
                    .iter()
                    .map(|line| line.size.width)
                    .fold(0.0, f32::max),
                self.lines.iter().map(|line| line.size.height).sum(),
            );
        }
        tracing::trace!(lines = self.lines.len(), "line breaking done");
        (self.lines, self.total_size)
    }

    fn line_is_empty(&self) -> bool {
        self.lines.last().is_none_or(|line| line.segments.is_empty())
    }

    /// Segments of `word`, one per run it touches, in logical order.
    fn word_segments(&self, word: TextRange) -> Vec<LineSegment> {
        self.runs
            .runs()
            .iter()
            .enumerate()
            .filter_map(|(index, run)| {
                let char_range = run.range.intersect(&word).filter(|r| !r.is_empty())?;
                let width = run.width_for_char_range(self.text, char_range);
                Some(LineSegment {
                    run: index,
                    char_range,
                    x_range: RangeF::default(),
                    run_x_range: RangeF::default(),
                    width,
                })
            })
            .collect()
    }

    /// Width of `segment` without its trailing whitespace.
    fn hanging_width(&self, segment: &LineSegment) -> f32 {
        let text = &self.text[segment.char_range.as_range()];
        let trimmed = text.trim_end().len();
        if trimmed == text.len() {
            return segment.width;
        }
        let run = &self.runs.runs()[segment.run];
        let start = segment.char_range.start();
        run.width_for_char_range(self.text, TextRange::new(start, start + trimmed))
    }

    fn visible_width(&self, segments: &[LineSegment]) -> f32 {
        let mut width: f32 = segments.iter().map(|s| s.width).sum();
        if let Some(last) = segments
            .iter()
            .rev()
            .find(|s| !self.runs.runs()[s.run].is_newline)
        {
            width -= last.width - self.hanging_width(last);
        }
        width
    }

    fn add_word_to_line(&mut self, segments: Vec<LineSegment>) {
        let runs = self.runs;
        for segment in segments {
            let run = &runs.runs()[segment.run];
            if run.is_newline
                || self.behavior == WordWrapBehavior::IgnoreLongWords
                || self.hanging_width(&segment) <= self.available_width
            {
                self.add_segment(segment);
                continue;
            }

            let truncate = self.behavior == WordWrapBehavior::TruncateLongWords;
            let mut remaining = segment.char_range;
            while !remaining.is_empty() {
                let cutoff = self.cutoff_pos(segment.run, remaining);
                if cutoff > remaining.start() {
                    let piece = TextRange::new(remaining.start(), cutoff);
                    self.add_segment(LineSegment {
                        run: segment.run,
                        char_range: piece,
                        x_range: RangeF::default(),
                        run_x_range: RangeF::default(),
                        width: run.width_for_char_range(self.text, piece),
                    });
                    remaining.set_start(cutoff);
                }
                if truncate {
                    // The rest of the word is dropped.
                    return;
                }
                if !remaining.is_empty() {
                    self.advance_line();
                }
            }
        }
    }

    /// End of the longest grapheme-aligned prefix of `range` that fits. An
    /// empty line always takes at least one grapheme.
    fn cutoff_pos(&self, run_index: usize, range: TextRange) -> usize {
        let run = &self.runs.runs()[run_index];
        let mut end = range.start();
        let mut width = 0.0;
        while end < range.end() {
            let next = next_grapheme_boundary(self.text, end)
                .unwrap_or(range.end())
                .min(range.end());
            let grapheme_width = run.width_for_char_range(self.text, TextRange::new(end, next));
            if width + grapheme_width > self.available_width {
                if end == range.start() && self.line_is_empty() {
                    return next;
                }
                break;
            }
            width += grapheme_width;
            end = next;
        }
        end
    }

    fn add_segment(&mut self, mut segment: LineSegment) {
        let runs = self.runs;
        let run = &runs.runs()[segment.run];
        if !run.is_newline {
            self.max_ascent = self.max_ascent.max(run.metrics.ascent - run.baseline_offset);
            self.max_descent = self.max_descent.max(run.metrics.descent + run.baseline_offset);
        }
        self.available_width -= segment.width;

        let Some(line) = self.lines.last_mut() else {
            return;
        };
        line.size.width += segment.width;
        if let Some(last) = line.segments.last_mut() {
            if last.run == segment.run && last.char_range.end() == segment.char_range.start() {
                last.char_range.set_end(segment.char_range.end());
                last.width += segment.width;
                last.run_x_range = run.grapheme_span_for_char_range(self.text, last.char_range);
                return;
            }
        }
        // RTL runs split over lines hand out their right part first.
        segment.run_x_range = run.grapheme_span_for_char_range(self.text, segment.char_range);
        line.segments.push(segment);
    }

    fn advance_line(&mut self) {
        let runs = self.runs;
        if let Some(line) = self.lines.last_mut() {
            line.segments.sort_by(|a, b| {
                let (va, vb) = (runs.logical_to_visual(a.run), runs.logical_to_visual(b.run));
                va.cmp(&vb).then_with(|| {
                    let ordered = a.char_range.start().cmp(&b.char_range.start());
                    if runs.runs()[a.run].is_rtl {
                        ordered.reverse()
                    } else {
                        ordered
                    }
                })
            });
            let mut x = 0.0;
            for segment in &mut line.segments {
                segment.x_range = RangeF::new(x, x + segment.width);
                x += segment.width;
            }
            line.size.height = self.min_height.max(self.max_ascent + self.max_descent).ceil();
            line.baseline = self.min_baseline.max(self.max_ascent.round());
            line.preceding_heights = self.total_size.height.ceil();
            self.total_size.height += line.size.height;
            self.total_size.width = self.total_size.width.max(line.size.width);
        }
        self.max_ascent = 0.0;
        self.max_descent = 0.0;
        self.available_width = self.max_width;
        self.lines.push(Line::default());
    }
}
