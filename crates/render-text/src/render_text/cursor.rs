//! Index validity, selection and bidi-aware caret movement.

use crate::geometry::{Point, RangeF, Rect};
use crate::layout::{CursorAffinity, SelectionModel};
use crate::range::TextRange;
use crate::unicode::{WordIterator, is_grapheme_boundary, is_newline};

use super::{BreakType, CursorHit, RenderText, SelectionBehavior, VisualCursorDirection};

impl RenderText {
    pub fn selection_model(&self) -> &SelectionModel {
        &self.selection_model
    }

    pub fn selection(&self) -> TextRange {
        self.selection_model.selection()
    }

    pub fn cursor_position(&self) -> usize {
        self.selection_model.caret_pos()
    }

    /// Collapse the selection to `position` if it is a valid cursor index.
    pub fn set_cursor_position(&mut self, position: usize) -> bool {
        let position = position.min(self.text.len());
        if !self.is_valid_cursor_index(position) {
            return false;
        }
        let affinity = if position == 0 {
            CursorAffinity::Forward
        } else {
            CursorAffinity::Backward
        };
        self.set_selection_model(SelectionModel::new(position, affinity));
        true
    }

    pub fn selected_text(&self) -> &str {
        self.text
            .get(self.selection().as_range())
            .unwrap_or_default()
    }

    pub fn select_all(&mut self, reversed: bool) {
        let len = self.text.len();
        let all = if reversed {
            TextRange::new(len, 0)
        } else {
            TextRange::new(0, len)
        };
        self.select_range(all);
    }

    pub fn clear_selection(&mut self) {
        let caret = SelectionModel::new(
            self.cursor_position(),
            self.selection_model.caret_affinity(),
        );
        self.set_selection_model(caret);
    }

    fn set_selection_model(&mut self, model: SelectionModel) {
        self.selection_model = model;
        self.cached_bounds_valid = false;
    }

    // Index spaces.

    /// `true` for 0, the text length, and character boundaries not hidden
    /// by truncation or elision. Grapheme interiors are valid.
    pub fn is_valid_logical_index(&mut self, index: usize) -> bool {
        if index == 0 || index == self.text.len() {
            return true;
        }
        if index > self.text.len() || !self.text.is_char_boundary(index) {
            return false;
        }
        self.ensure_layout();
        !self.layout.is_hidden(index)
    }

    /// A valid logical index that also falls on a grapheme boundary of the
    /// layout text.
    pub fn is_valid_cursor_index(&mut self, index: usize) -> bool {
        if index == 0 || index == self.text.len() {
            return true;
        }
        if !self.is_valid_logical_index(index) {
            return false;
        }
        let layout_index = self.layout.to_layout(index);
        is_grapheme_boundary(self.layout.text(), layout_index)
    }

    /// The nearest valid cursor index after (`Forward`) or before
    /// (`Backward`) `index`, clamped to the text.
    pub fn index_of_adjacent_grapheme(&mut self, index: usize, direction: CursorAffinity) -> usize {
        let len = self.text.len();
        if index > len {
            return len;
        }
        let mut index = index;
        match direction {
            CursorAffinity::Forward => {
                while index < len {
                    index += 1;
                    if self.is_valid_cursor_index(index) {
                        return index;
                    }
                }
                len
            }
            CursorAffinity::Backward => {
                while index > 0 {
                    index -= 1;
                    if self.is_valid_cursor_index(index) {
                        return index;
                    }
                }
                0
            }
        }
    }

    pub fn text_index_to_layout_index(&mut self, index: usize) -> usize {
        self.ensure_layout();
        self.layout.to_layout(index.min(self.text.len()))
    }

    /// Layout indices at or past the layout end map to the text length.
    pub fn layout_index_to_text_index(&mut self, index: usize) -> usize {
        self.ensure_layout();
        if index >= self.layout.text().len() {
            return self.text.len();
        }
        self.layout.to_text(index)
    }

    // Caret models.

    fn run_containing_caret(&mut self, caret: &SelectionModel) -> Option<usize> {
        let position = self.text_index_to_layout_index(caret.caret_pos());
        self.backend
            .run_list()
            .run_containing_caret(position, caret.caret_affinity())
    }

    /// The caret at the visual `direction` edge of the whole text.
    pub fn edge_selection_model(&mut self, direction: VisualCursorDirection) -> SelectionModel {
        if direction == self.get_visual_direction_of_logical_end() {
            SelectionModel::new(self.text.len(), CursorAffinity::Forward)
        } else {
            SelectionModel::new(0, CursorAffinity::Backward)
        }
    }

    fn first_selection_model_inside_run(&mut self, run: usize) -> SelectionModel {
        let start = self.backend.run_list().runs()[run].range.start();
        let position = self.layout_index_to_text_index(start);
        let position = self.index_of_adjacent_grapheme(position, CursorAffinity::Forward);
        SelectionModel::new(position, CursorAffinity::Backward)
    }

    fn last_selection_model_inside_run(&mut self, run: usize) -> SelectionModel {
        let end = self.backend.run_list().runs()[run].range.end();
        let position = self.layout_index_to_text_index(end);
        let position = self.index_of_adjacent_grapheme(position, CursorAffinity::Backward);
        SelectionModel::new(position, CursorAffinity::Forward)
    }

    /// One grapheme to the visual `direction`, hopping to the visually
    /// adjacent run at run edges.
    pub fn adjacent_char_selection_model(
        &mut self,
        selection: &SelectionModel,
        direction: VisualCursorDirection,
    ) -> SelectionModel {
        self.ensure_layout();
        let run_count = self.backend.run_list().len();
        if run_count == 0 {
            return self.edge_selection_model(direction);
        }
        let target = match self.run_containing_caret(selection) {
            None => {
                // Past the logical edge of every run.
                let edge = self.edge_selection_model(direction);
                if edge.caret_pos() == selection.caret_pos() {
                    return edge;
                }
                let visual = match direction {
                    VisualCursorDirection::Right => 0,
                    VisualCursorDirection::Left => run_count - 1,
                };
                self.backend.run_list().visual_to_logical(visual)
            }
            Some(run_index) => {
                let (is_rtl, range) = {
                    let run = &self.backend.run_list().runs()[run_index];
                    (run.is_rtl, run.range)
                };
                let caret = selection.caret_pos();
                let forward_motion = is_rtl == (direction == VisualCursorDirection::Left);
                if forward_motion {
                    if caret < self.layout_index_to_text_index(range.end()) {
                        let caret = self.index_of_adjacent_grapheme(caret, CursorAffinity::Forward);
                        return SelectionModel::new(caret, CursorAffinity::Backward);
                    }
                } else if caret > self.layout_index_to_text_index(range.start()) {
                    let caret = self.index_of_adjacent_grapheme(caret, CursorAffinity::Backward);
                    return SelectionModel::new(caret, CursorAffinity::Forward);
                }

                let run_list = self.backend.run_list();
                let visual = run_list.logical_to_visual(run_index);
                let next = match direction {
                    VisualCursorDirection::Left => visual.checked_sub(1),
                    VisualCursorDirection::Right => Some(visual + 1).filter(|&v| v < run_count),
                };
                match next {
                    Some(visual) => run_list.visual_to_logical(visual),
                    None => return self.edge_selection_model(direction),
                }
            }
        };
        let is_rtl = self.backend.run_list().runs()[target].is_rtl;
        if is_rtl == (direction == VisualCursorDirection::Left) {
            self.first_selection_model_inside_run(target)
        } else {
            self.last_selection_model_inside_run(target)
        }
    }

    /// Step by graphemes until the caret lands on a word edge in the
    /// direction of travel of the run it is in.
    pub fn adjacent_word_selection_model(
        &mut self,
        selection: &SelectionModel,
        direction: VisualCursorDirection,
    ) -> SelectionModel {
        if self.obscured {
            return self.edge_selection_model(direction);
        }
        let words = WordIterator::new(&self.text);
        let mut current = *selection;
        loop {
            let next = self.adjacent_char_selection_model(&current, direction);
            if next == current {
                break;
            }
            current = next;
            let Some(run) = self.run_containing_caret(&current) else {
                break;
            };
            let is_rtl = self.backend.run_list().runs()[run].is_rtl;
            let forward_motion = is_rtl == (direction == VisualCursorDirection::Left);
            let caret = current.caret_pos();
            let at_edge = if forward_motion {
                words.is_end_of_word(caret)
            } else {
                words.is_start_of_word(caret)
            };
            if at_edge {
                break;
            }
        }
        current
    }

    /// The caret at the visual `direction` end of line `line`, before any
    /// trailing newline.
    pub fn line_selection_model(&mut self, line: usize, direction: VisualCursorDirection) -> SelectionModel {
        self.ensure_layout();
        let Some(range) = self
            .backend
            .lines()
            .get(line)
            .and_then(|line| line.char_range())
        else {
            let end = self.get_visual_direction_of_logical_end();
            return self.edge_selection_model(end);
        };
        let layout_text = self.layout.text();
        let mut max = range.max();
        let trailing = layout_text[range.min()..max].chars().next_back();
        if let Some(last) = trailing.filter(|&c| is_newline(c)) {
            max -= last.len_utf8();
            if last == '\n' && layout_text[range.min()..max].ends_with('\r') {
                max -= 1;
            }
        }
        let min = range.min();
        if direction == self.get_visual_direction_of_logical_end() {
            let affinity = if max == min {
                CursorAffinity::Forward
            } else {
                CursorAffinity::Backward
            };
            let position = self.layout_index_to_text_index(max);
            SelectionModel::new(position, affinity)
        } else {
            let position = self.layout_index_to_text_index(min);
            SelectionModel::new(position, CursorAffinity::Forward)
        }
    }

    /// Index of the line the caret is drawn on.
    pub fn get_line_containing_caret(&mut self, caret: &SelectionModel) -> usize {
        let position = self.text_index_to_layout_index(caret.caret_pos());
        let affinity = caret.caret_affinity();
        let lines = self.backend.lines();
        let runs = self.backend.run_list().runs();
        for (line_index, line) in lines.iter().enumerate() {
            for segment in &line.segments {
                let range = segment.char_range;
                let contains = match affinity {
                    CursorAffinity::Forward => range.start() <= position && position < range.end(),
                    CursorAffinity::Backward => range.start() < position && position <= range.end(),
                };
                if !contains {
                    continue;
                }
                // After a newline the caret starts the next line.
                if affinity == CursorAffinity::Backward
                    && position == range.end()
                    && runs[segment.run].is_newline
                    && line_index + 1 < lines.len()
                {
                    return line_index + 1;
                }
                return line_index;
            }
        }
        if position == 0 { 0 } else { lines.len().saturating_sub(1) }
    }

    pub(crate) fn get_line_containing_y(&self, y: f32) -> usize {
        let lines = self.backend.lines();
        if y < 0.0 {
            return 0;
        }
        lines
            .iter()
            .position(|line| y < line.preceding_heights + line.size.height)
            .unwrap_or(lines.len().saturating_sub(1))
    }

    pub fn get_adjacent_selection_model(
        &mut self,
        current: &SelectionModel,
        break_type: BreakType,
        direction: VisualCursorDirection,
    ) -> SelectionModel {
        self.ensure_layout();
        if self.text.is_empty() {
            return self.edge_selection_model(direction);
        }
        match break_type {
            BreakType::Line => {
                let line = self.get_line_containing_caret(current);
                self.line_selection_model(line, direction)
            }
            BreakType::Character => self.adjacent_char_selection_model(current, direction),
            BreakType::Word => self.adjacent_word_selection_model(current, direction),
        }
    }

    fn selection_model_for_selection_start(&self) -> SelectionModel {
        let selection = self.selection();
        if selection.is_empty() {
            return self.selection_model;
        }
        let affinity = if selection.is_reversed() {
            CursorAffinity::Backward
        } else {
            CursorAffinity::Forward
        };
        SelectionModel::new(selection.start(), affinity)
    }

    // Movement.

    /// Move the caret visually by `break_type` in `direction`, updating the
    /// selection according to `behavior`.
    pub fn move_cursor(
        &mut self,
        break_type: BreakType,
        direction: VisualCursorDirection,
        behavior: SelectionBehavior,
    ) {
        let current_selection = self.selection();
        let mut cursor = SelectionModel::new(
            self.cursor_position(),
            self.selection_model.caret_affinity(),
        );

        if break_type != BreakType::Line
            && !current_selection.is_empty()
            && behavior == SelectionBehavior::None
        {
            // Cancelling a selection collapses it to the edge nearer the
            // requested direction.
            let selection_start = self.selection_model_for_selection_start();
            let start_x = self.get_cursor_bounds(&selection_start, true).x;
            let end_x = self.get_cursor_bounds(&cursor, true).x;
            let use_start = match direction {
                VisualCursorDirection::Right => start_x > end_x,
                VisualCursorDirection::Left => start_x < end_x,
            };
            if use_start {
                cursor = selection_start;
            }
            if break_type == BreakType::Word {
                cursor = self.get_adjacent_selection_model(&cursor, break_type, direction);
            }
            if !self.is_valid_cursor_index(cursor.caret_pos()) {
                cursor = self.get_adjacent_selection_model(&cursor, BreakType::Character, direction);
            }
        } else {
            cursor = self.get_adjacent_selection_model(&cursor, break_type, direction);
        }

        // The new selection is reversed when the caret crossed the anchor.
        let new_end = cursor.selection().end();
        let min_end = current_selection.end().min(new_end);
        let max_end = current_selection.end().max(new_end);
        let current_start = current_selection.start();
        let crossed = !current_selection.is_empty()
            && min_end <= current_start
            && current_start <= max_end;

        match behavior {
            SelectionBehavior::None => {}
            SelectionBehavior::Retain => cursor.set_selection_start(current_start),
            SelectionBehavior::Extend => cursor.set_selection_start(if crossed {
                current_selection.end()
            } else {
                current_start
            }),
            SelectionBehavior::Caret => {
                if crossed {
                    cursor = SelectionModel::new(current_start, self.selection_model.caret_affinity());
                } else {
                    cursor.set_selection_start(current_start);
                }
            }
        }
        tracing::trace!(
            ?break_type,
            ?direction,
            caret = cursor.caret_pos(),
            affinity = ?cursor.caret_affinity(),
            "moved cursor"
        );
        self.set_selection_model(cursor);
    }

    /// Replace the selection, clamped to the text. Rejects models whose
    /// endpoints are not valid cursor indices. Returns whether the
    /// selection changed.
    pub fn move_cursor_to(&mut self, model: &SelectionModel) -> bool {
        let len = self.text.len();
        let range = TextRange::new(
            model.selection().start().min(len),
            model.caret_pos().min(len),
        );
        if !self.is_valid_cursor_index(range.start()) || !self.is_valid_cursor_index(range.end()) {
            return false;
        }
        let model = SelectionModel::with_range(range, model.caret_affinity());
        let changed = model != self.selection_model;
        self.set_selection_model(model);
        changed
    }

    /// Select `range`, which may split graphemes but must land on valid
    /// logical indices.
    pub fn select_range(&mut self, range: TextRange) -> bool {
        let len = self.text.len();
        let range = TextRange::new(range.start().min(len), range.end().min(len));
        if !self.is_valid_logical_index(range.start()) || !self.is_valid_logical_index(range.end()) {
            return false;
        }
        let affinity = if range.is_reversed() || range.is_empty() {
            CursorAffinity::Forward
        } else {
            CursorAffinity::Backward
        };
        self.set_selection_model(SelectionModel::with_range(range, affinity));
        true
    }

    /// Grow the selection to word boundaries.
    pub fn select_word(&mut self) {
        let range = self.expand_range_to_word_boundary(self.selection());
        self.select_range(range);
    }

    /// `range` widened outward to the nearest word, whitespace or
    /// punctuation edges. Obscured text expands to everything.
    pub fn expand_range_to_word_boundary(&self, range: TextRange) -> TextRange {
        let len = self.text.len();
        if self.obscured {
            return if range.is_reversed() {
                TextRange::new(len, 0)
            } else {
                TextRange::new(0, len)
            };
        }
        let words = WordIterator::new(&self.text);

        let mut min = range.min().min(len);
        if min == len && min != 0 {
            min -= 1;
        }
        while min != 0 && !words.is_boundary(min) {
            min -= 1;
        }
        let mut max = range.max().min(len);
        if min == max && max != len {
            max += 1;
        }
        while max < len && !words.is_boundary(max) {
            max += 1;
        }
        if range.is_reversed() {
            TextRange::new(max, min)
        } else {
            TextRange::new(min, max)
        }
    }

    /// Start of the word at or before `index`, else the next word start;
    /// the text length when there is none.
    pub fn get_nearest_word_start_boundary(&self, index: usize) -> usize {
        let len = self.text.len();
        if self.obscured || len == 0 {
            return len;
        }
        let words = WordIterator::new(&self.text);
        (0..=index.min(len - 1))
            .rev()
            .find(|&i| words.is_start_of_word(i))
            .or_else(|| (index + 1..len).find(|&i| words.is_start_of_word(i)))
            .unwrap_or(len)
    }

    // Geometry.

    /// The caret nearest `point`, a view-space position.
    pub fn find_cursor_position(&mut self, point: Point) -> SelectionModel {
        self.ensure_layout();
        if self.text.is_empty() {
            return SelectionModel::new(0, CursorAffinity::Forward);
        }
        let top = self.get_line_offset(0).y;
        let line = self.get_line_containing_y(point.y - top);
        let x = point.x - self.get_line_offset(line).x;
        let hit = self
            .backend
            .find_cursor_position(self.layout.text(), line, x);
        match hit {
            CursorHit::BeforeLine => self.line_selection_model(line, VisualCursorDirection::Left),
            CursorHit::AfterLine => self.line_selection_model(line, VisualCursorDirection::Right),
            CursorHit::Grapheme {
                range,
                is_rtl,
                left_half,
            } => {
                let index = self.layout_index_to_text_index(range.start());
                if left_half != is_rtl {
                    SelectionModel::new(index, CursorAffinity::Forward)
                } else {
                    let end = self.index_of_adjacent_grapheme(index, CursorAffinity::Forward);
                    SelectionModel::new(end, CursorAffinity::Backward)
                }
            }
        }
    }

    /// View-space bounds of the caret for `caret`. Insert mode gives a
    /// 1-pixel bar on the grapheme edge the affinity points at; overtype
    /// mode covers the following grapheme.
    pub fn get_cursor_bounds(&mut self, caret: &SelectionModel, insert_mode: bool) -> Rect {
        self.ensure_layout();
        let affinity = if insert_mode {
            caret.caret_affinity()
        } else {
            CursorAffinity::Forward
        };
        let caret = SelectionModel::new(caret.caret_pos(), affinity);
        let caret_pos = caret.caret_pos();
        let line = self.get_line_containing_caret(&caret);
        let line_width = self
            .backend
            .lines()
            .get(line)
            .map_or(0.0, |l| l.size.width);

        let mut x = 0.0;
        let mut width = 1.0;
        let at_text_edge = match affinity {
            CursorAffinity::Backward => caret_pos == 0,
            CursorAffinity::Forward => caret_pos == self.text.len(),
        };
        if at_text_edge {
            if (caret_pos == 0) == self.get_display_text_direction().is_rtl() {
                x = line_width;
            }
        } else {
            let adjacent = self.index_of_adjacent_grapheme(caret_pos, affinity);
            let grapheme_start = self.text_index_to_layout_index(caret_pos.min(adjacent));
            let bounds = self
                .backend
                .glyph_bounds(self.layout.text(), grapheme_start)
                .filter(|(glyph_line, _)| *glyph_line == line);
            if let Some((_, span)) = bounds {
                if insert_mode {
                    x = match affinity {
                        CursorAffinity::Backward => span.end,
                        CursorAffinity::Forward => span.start,
                    };
                } else {
                    x = span.min();
                    width = span.max().ceil() - span.min().ceil();
                }
            }
        }
        let height = self
            .backend
            .lines()
            .get(line)
            .map_or(0.0, |l| l.size.height);
        let origin = self.get_line_offset(line) + Point::new(x, 0.0);
        Rect::new(origin.x, origin.y, width, height)
    }

    /// View-space rectangles covering `range`, one per visually contiguous
    /// span per line.
    pub fn get_substring_bounds(&mut self, range: TextRange) -> Vec<Rect> {
        self.ensure_layout();
        let len = self.text.len();
        let (min, max) = (range.min().min(len), range.max().min(len));
        let start = if self.is_valid_cursor_index(min) {
            min
        } else {
            self.index_of_adjacent_grapheme(min, CursorAffinity::Backward)
        };
        let end = if self.is_valid_cursor_index(max) {
            max
        } else {
            self.index_of_adjacent_grapheme(max, CursorAffinity::Forward)
        };
        let layout_range = TextRange::new(
            self.text_index_to_layout_index(start),
            self.text_index_to_layout_index(end),
        );
        let spans = self
            .backend
            .substring_bounds(self.layout.text(), layout_range);
        spans
            .into_iter()
            .map(|(line, span)| {
                let height = self
                    .backend
                    .lines()
                    .get(line)
                    .map_or(0.0, |l| l.size.height);
                let origin = self.get_line_offset(line);
                Rect::new(origin.x + span.min(), origin.y, span.len().abs(), height)
            })
            .collect()
    }

    /// Line-local x span of the grapheme at `index`, leading edge first.
    /// Indices without a glyph report the string's trailing edge.
    pub fn get_glyph_bounds(&mut self, index: usize) -> RangeF {
        let layout_index = self.text_index_to_layout_index(index);
        match self.backend.glyph_bounds(self.layout.text(), layout_index) {
            Some((_, bounds)) => bounds,
            None => RangeF::point(self.get_string_size().width),
        }
    }

    /// View-space point of a text-space point. Text space puts each line's
    /// left edge at x = 0 and stacks lines from y = 0.
    pub fn to_view_point(&mut self, point: Point) -> Point {
        self.ensure_layout();
        let line = self.get_line_containing_y(point.y);
        let line_x = self.get_line_offset(line).x;
        let top = self.get_line_offset(0).y;
        Point::new(point.x + line_x, point.y + top)
    }

    pub fn to_text_point(&mut self, point: Point) -> Point {
        self.ensure_layout();
        let top = self.get_line_offset(0).y;
        let line = self.get_line_containing_y(point.y - top);
        let line_x = self.get_line_offset(line).x;
        Point::new(point.x - line_x, point.y - top)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::MonospaceShaper;

    fn render_text(text: &str) -> RenderText {
        let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
        render_text.set_text(text);
        render_text
    }

    #[test]
    fn grapheme_interiors_are_logical_but_not_cursor_indices() {
        let mut render_text = render_text("e\u{301}x");
        assert!(render_text.is_valid_logical_index(1));
        assert!(!render_text.is_valid_cursor_index(1));
        assert!(!render_text.is_valid_logical_index(2));
        assert!(render_text.is_valid_cursor_index(3));
        assert_eq!(render_text.index_of_adjacent_grapheme(0, CursorAffinity::Forward), 3);
        assert_eq!(render_text.index_of_adjacent_grapheme(3, CursorAffinity::Backward), 0);
    }

    #[test]
    fn move_cursor_to_rejects_grapheme_interiors() {
        let mut render_text = render_text("e\u{301}x");
        assert!(!render_text.move_cursor_to(&SelectionModel::new(1, CursorAffinity::Forward)));
        assert!(render_text.move_cursor_to(&SelectionModel::new(3, CursorAffinity::Forward)));
        assert!(render_text.move_cursor_to(&SelectionModel::new(100, CursorAffinity::Forward)));
        assert_eq!(render_text.cursor_position(), 4);
    }

    #[test]
    fn select_range_keeps_direction() {
        let mut render_text = render_text("abcdef");
        assert!(render_text.select_range(TextRange::new(4, 1)));
        assert_eq!(render_text.selection(), TextRange::new(4, 1));
        assert_eq!(render_text.selection_model().caret_affinity(), CursorAffinity::Forward);
        assert_eq!(render_text.selected_text(), "bcd");

        assert!(render_text.select_range(TextRange::new(1, 4)));
        assert_eq!(render_text.selection_model().caret_affinity(), CursorAffinity::Backward);
    }

    #[test]
    fn word_moves_stop_at_word_edges() {
        let mut render_text = render_text("foo bar baz");
        render_text.move_cursor(BreakType::Word, VisualCursorDirection::Right, SelectionBehavior::None);
        assert_eq!(render_text.cursor_position(), 3);
        render_text.move_cursor(BreakType::Word, VisualCursorDirection::Right, SelectionBehavior::None);
        assert_eq!(render_text.cursor_position(), 7);
        render_text.move_cursor(BreakType::Word, VisualCursorDirection::Left, SelectionBehavior::None);
        assert_eq!(render_text.cursor_position(), 4);
    }

    #[test]
    fn collapsing_a_selection_picks_the_visual_edge() {
        let mut render_text = render_text("abcdef");
        render_text.select_range(TextRange::new(1, 4));
        render_text.move_cursor(BreakType::Character, VisualCursorDirection::Left, SelectionBehavior::None);
        assert_eq!(render_text.selection(), TextRange::collapsed(1));

        render_text.select_range(TextRange::new(4, 1));
        render_text.move_cursor(BreakType::Character, VisualCursorDirection::Right, SelectionBehavior::None);
        assert_eq!(render_text.selection(), TextRange::collapsed(4));
    }

    #[test]
    fn selection_behaviors_around_the_anchor() {
        let mut render_text = render_text("abcdef");
        render_text.select_range(TextRange::new(3, 4));
        render_text.move_cursor(BreakType::Character, VisualCursorDirection::Left, SelectionBehavior::Caret);
        assert_eq!(render_text.selection(), TextRange::collapsed(3));
        render_text.move_cursor(BreakType::Character, VisualCursorDirection::Left, SelectionBehavior::Caret);
        assert_eq!(render_text.selection(), TextRange::new(3, 2));

        render_text.select_range(TextRange::new(3, 4));
        for _ in 0..2 {
            render_text.move_cursor(BreakType::Character, VisualCursorDirection::Left, SelectionBehavior::Retain);
        }
        assert_eq!(render_text.selection(), TextRange::new(3, 2));

        render_text.select_range(TextRange::new(3, 4));
        for _ in 0..2 {
            render_text.move_cursor(BreakType::Character, VisualCursorDirection::Left, SelectionBehavior::Extend);
        }
        assert_eq!(render_text.selection(), TextRange::new(4, 2));
    }

    #[test]
    fn line_moves_go_to_line_edges() {
        let mut render_text = render_text("abc");
        render_text.move_cursor(BreakType::Line, VisualCursorDirection::Right, SelectionBehavior::None);
        assert_eq!(render_text.cursor_position(), 3);
        render_text.move_cursor(BreakType::Line, VisualCursorDirection::Left, SelectionBehavior::Retain);
        assert_eq!(render_text.selection(), TextRange::new(3, 0));
    }

    #[test]
    fn select_word_expands_to_word_edges() {
        let mut render_text = render_text("foo bar");
        render_text.set_cursor_position(5);
        render_text.select_word();
        assert_eq!(render_text.selection(), TextRange::new(4, 7));

        render_text.set_cursor_position(7);
        render_text.select_word();
        assert_eq!(render_text.selection(), TextRange::new(4, 7));

        render_text.set_obscured(true);
        render_text.set_cursor_position(2);
        render_text.select_word();
        assert_eq!(render_text.selection(), TextRange::new(0, 7));
    }

    #[test]
    fn cursor_bounds_track_affinity_in_mixed_text() {
        let mut render_text = render_text("abc\u{5d0}\u{5d1}");
        render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
        let before = render_text.get_cursor_bounds(&SelectionModel::new(3, CursorAffinity::Backward), true);
        let after = render_text.get_cursor_bounds(&SelectionModel::new(3, CursorAffinity::Forward), true);
        assert_eq!(before.x, 30.0);
        assert_eq!(after.x, 50.0);
        assert_eq!(before.width, 1.0);

        let overtype = render_text.get_cursor_bounds(&SelectionModel::new(1, CursorAffinity::Forward), false);
        assert_eq!((overtype.x, overtype.width), (10.0, 10.0));
    }

    #[test]
    fn hit_testing_splits_graphemes_at_the_midpoint() {
        let mut render_text = render_text("abc");
        render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(
            render_text.find_cursor_position(Point::new(12.0, 5.0)),
            SelectionModel::new(1, CursorAffinity::Forward)
        );
        assert_eq!(
            render_text.find_cursor_position(Point::new(17.0, 5.0)),
            SelectionModel::new(2, CursorAffinity::Backward)
        );
        assert_eq!(
            render_text.find_cursor_position(Point::new(-5.0, 5.0)),
            SelectionModel::new(0, CursorAffinity::Forward)
        );
        assert_eq!(
            render_text.find_cursor_position(Point::new(500.0, 5.0)),
            SelectionModel::new(3, CursorAffinity::Backward)
        );
    }

    #[test]
    fn substring_bounds_coalesce_adjacent_runs() {
        let mut render_text = render_text("abc");
        render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
        render_text.apply_weight(crate::style::Weight::BOLD, TextRange::new(1, 2));
        let bounds = render_text.get_substring_bounds(TextRange::new(0, 3));
        assert_eq!(bounds.len(), 1);
        assert_eq!((bounds[0].x, bounds[0].width), (0.0, 30.0));
    }

    #[test]
    fn view_and_text_points_round_trip() {
        let mut render_text = render_text("abc");
        render_text.set_display_rect(Rect::new(5.0, 7.0, 200.0, 20.0));
        let view = render_text.to_view_point(Point::new(3.0, 4.0));
        assert_eq!(render_text.to_text_point(view), Point::new(3.0, 4.0));
    }
}
