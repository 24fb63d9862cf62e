use crate::geometry::{RangeF, Size};
use crate::range::TextRange;

/// The part of one run that lands on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    /// Logical index of the run in the run list.
    pub run: usize,
    /// Layout-text range, always inside the run's range.
    pub char_range: TextRange,
    /// Horizontal extent on the line, 0 at the line's left edge.
    pub x_range: RangeF,
    /// Horizontal extent inside the run, 0 at the run's left edge.
    pub run_x_range: RangeF,
    pub width: f32,
}

impl LineSegment {
    /// Line x of run-local x `run_x`.
    pub fn run_to_line_x(&self, run_x: f32) -> f32 {
        self.x_range.start + (run_x - self.run_x_range.start)
    }
}

/// One visual line: segments sorted left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub segments: Vec<LineSegment>,
    pub size: Size,
    /// Distance from the line top to its baseline.
    pub baseline: f32,
    /// Sum of the heights of every line above this one.
    pub preceding_heights: f32,
}

impl Line {
    /// Layout-text range covered by the line's segments.
    pub fn char_range(&self) -> Option<TextRange> {
        let start = self.segments.iter().map(|s| s.char_range.start()).min()?;
        let end = self.segments.iter().map(|s| s.char_range.end()).max()?;
        Some(TextRange::new(start, end))
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.segments
            .iter()
            .any(|s| s.char_range.start() <= index && index < s.char_range.end())
    }
}
