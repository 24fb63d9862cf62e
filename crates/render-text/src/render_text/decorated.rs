use crate::font::FontList;
use crate::geometry::Point;
use crate::range::TextRange;

use super::RenderText;

/// Font and decorations over part of a `DecoratedText`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangedAttribute {
    /// Range relative to the start of the decorated text.
    pub range: TextRange,
    pub font: FontList,
    pub strike: bool,
    pub diagonal_strike: bool,
    pub underline: bool,
}

/// A piece of logical text plus how each part of it is drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecoratedText {
    pub text: String,
    /// In visual run order.
    pub attributes: Vec<RangedAttribute>,
}

impl RenderText {
    /// The word nearest `point` (view space) with its attributes, and the
    /// view-space baseline origin of its leftmost glyph.
    pub fn get_decorated_word_at_point(&mut self, point: Point) -> Option<(DecoratedText, Point)> {
        if self.obscured {
            return None;
        }
        let caret = self.find_cursor_position(point);
        let word_start = self.get_nearest_word_start_boundary(caret.caret_pos());
        if word_start >= self.text.len() {
            return None;
        }
        let word = self.expand_range_to_word_boundary(TextRange::collapsed(word_start));
        if word.is_empty() {
            return None;
        }
        let bounds = self.get_substring_bounds(word);
        let left = bounds
            .iter()
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .copied()?;
        let decorated = self.get_decorated_text_for_range(word)?;

        let top = self.get_line_offset(0).y;
        let line = self.get_line_containing_y(left.center().y - top);
        let line_baseline = self.backend.lines().get(line)?.baseline;
        Some((decorated, Point::new(left.x, left.y + line_baseline)))
    }

    /// `range` of the logical text split by run and style.
    pub fn get_decorated_text_for_range(&mut self, range: TextRange) -> Option<DecoratedText> {
        if self.obscured {
            return None;
        }
        self.ensure_layout();
        let range = range.normalized();
        let text = self.text.get(range.as_range())?.to_owned();

        let run_list = self.backend.run_list();
        let mut attributes = Vec::new();
        for (_, run) in run_list.visual_runs() {
            let run_range = TextRange::new(
                self.layout.to_text(run.range.start()),
                if run.range.end() >= self.layout.text().len() {
                    self.text.len()
                } else {
                    self.layout.to_text(run.range.end())
                },
            );
            let Some(overlap) = run_range.intersect(&range).filter(|r| !r.is_empty()) else {
                continue;
            };
            for (span, style) in self.styles.spans() {
                let Some(piece) = span.intersect(&overlap).filter(|r| !r.is_empty()) else {
                    continue;
                };
                attributes.push(RangedAttribute {
                    range: TextRange::new(piece.start() - range.start(), piece.end() - range.start()),
                    font: run.font.clone(),
                    strike: style.strike,
                    diagonal_strike: style.diagonal_strike,
                    underline: style.underline,
                });
            }
        }
        Some(DecoratedText { text, attributes })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Rect;
    use crate::style::{TextStyle, Weight};
    use crate::testing::MonospaceShaper;

    #[test]
    fn decorated_word_carries_styles_and_baseline() {
        let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
        render_text.set_text("ab cde fg");
        render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
        render_text.apply_weight(Weight::BOLD, TextRange::new(3, 5));
        render_text.apply_style(TextStyle::Underline, true, TextRange::new(4, 6));

        let (word, baseline) = render_text
            .get_decorated_word_at_point(Point::new(45.0, 5.0))
            .expect("a word under the point");
        assert_eq!(word.text, "cde");
        let ranges: Vec<_> = word.attributes.iter().map(|a| a.range).collect();
        assert_eq!(ranges, [TextRange::new(0, 1), TextRange::new(1, 2), TextRange::new(2, 3)]);
        assert!(word.attributes[0].font.weight.is_bold());
        assert!(!word.attributes[0].underline);
        assert!(word.attributes[1].underline && word.attributes[1].font.weight.is_bold());
        assert!(word.attributes[2].underline && !word.attributes[2].font.weight.is_bold());
        assert_eq!(baseline.x, 30.0);
        assert_eq!(baseline.y, render_text.get_baseline());
    }

    #[test]
    fn obscured_text_has_no_decorated_word() {
        let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
        render_text.set_text("secret");
        render_text.set_obscured(true);
        assert!(render_text.get_decorated_word_at_point(Point::new(5.0, 5.0)).is_none());
    }
}
