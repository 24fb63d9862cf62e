use crate::geometry::{Insets, Point};
use crate::layout::ElideBehavior;
use crate::render::{FadeEffect, Renderer};
use crate::style::shadow_margins;

use super::{RenderText, VisualTextRequest};

impl RenderText {
    /// Paint selection, cursor and text through `renderer`.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        self.ensure_layout();
        let clip = self.clip_to_display_rect;
        if clip {
            let margins = shadow_margins(&self.shadows);
            renderer.push_clip_rect(self.display_rect.inset(Insets {
                top: -margins.top,
                left: -margins.left,
                bottom: -margins.bottom,
                right: -margins.right,
            }));
        }

        if self.focused {
            let selection = self.selection();
            if !selection.is_empty() {
                for rect in self.get_substring_bounds(selection) {
                    renderer.fill_rect(rect, self.selection_background_color);
                }
            }
        }

        if self.cursor_enabled && self.cursor_visible && self.focused {
            let caret = self.selection_model;
            let bounds = self.get_cursor_bounds(&caret, self.insert_mode);
            renderer.fill_rect(bounds, self.cursor_color);
        }

        self.draw_visual_text(renderer);

        if clip {
            renderer.pop_clip();
        }
    }

    fn draw_visual_text(&mut self, renderer: &mut dyn Renderer) {
        let line_count = self.backend.lines().len();
        let line_origins: Vec<Point> = (0..line_count).map(|line| self.get_line_offset(line)).collect();
        let fades = self.fade_effects();
        let selection = if self.focused && !self.selection().is_empty() {
            let selection = self.selection();
            let range = crate::range::TextRange::new(
                self.text_index_to_layout_index(selection.min()),
                self.text_index_to_layout_index(selection.max()),
            );
            Some((range, self.selection_color))
        } else {
            None
        };
        let request = VisualTextRequest {
            text: self.layout.text(),
            styles: &self.layout_styles,
            line_origins: &line_origins,
            selection,
            shadows: &self.shadows,
            fades: &fades,
        };
        self.backend.draw_visual_text(&request, renderer);
    }

    /// Alpha ramps for `FadeTail` text overflowing either display edge.
    fn fade_effects(&mut self) -> Vec<FadeEffect> {
        if self.multiline || self.elide_behavior != ElideBehavior::FadeTail {
            return Vec::new();
        }
        let display = self.display_rect;
        let content_width = self.get_content_width();
        if content_width <= display.width {
            return Vec::new();
        }
        let average_char_width = self.backend.font_metrics(&self.font_list).average_char_width;
        let gradient = (average_char_width * 3.0).min(display.width / 3.0);
        if gradient <= 0.0 {
            return Vec::new();
        }
        let text_left = self.get_line_offset(0).x;
        let text_right = text_left + content_width;
        let mut fades = Vec::new();
        if text_left < display.x {
            fades.push(FadeEffect::toward(display.x, gradient, false));
        }
        if text_right > display.right() {
            fades.push(FadeEffect::toward(display.right(), gradient, true));
        }
        fades
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::geometry::Rect;
    use crate::range::TextRange;
    use crate::render_text::RenderText;
    use crate::style::{BLUE, RED, Shadow, TextStyle};
    use crate::testing::{DrawCommand, MonospaceShaper, RecordingRenderer};
    use crate::geometry::Point;
    use crate::layout::ElideBehavior;

    fn render_text(text: &str) -> RenderText {
        let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
        render_text.set_text(text);
        render_text.set_display_rect(Rect::new(0.0, 0.0, 100.0, 20.0));
        render_text
    }

    #[test]
    fn paints_selection_then_cursor_then_text() {
        let mut render_text = render_text("abc");
        render_text.set_focused(true);
        render_text.set_cursor_visible(true);
        render_text.select_range(TextRange::new(0, 2));
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);

        let kinds: Vec<&str> = renderer.commands.iter().map(DrawCommand::kind).collect();
        assert_eq!(kinds, ["clip", "fill", "fill", "glyphs", "pop_clip"]);
        let DrawCommand::Glyphs { glyphs, .. } = &renderer.commands[3] else {
            panic!("expected glyphs");
        };
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0].color, render_text.selection_color());
        assert_eq!(glyphs[2].color, crate::style::BLACK);
    }

    #[test]
    fn unfocused_text_skips_selection_and_cursor() {
        let mut render_text = render_text("abc");
        render_text.set_cursor_visible(true);
        render_text.select_range(TextRange::new(0, 2));
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);
        assert!(renderer.fills().is_empty());
        assert!(renderer
            .glyph_colors()
            .iter()
            .all(|&color| color == crate::style::BLACK));
    }

    #[test]
    fn shadows_draw_first_and_widen_the_clip() {
        let mut render_text = render_text("ab");
        render_text.set_shadows(vec![Shadow {
            offset: Point::new(2.0, 2.0),
            blur: 0.0,
            color: BLUE,
        }]);
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);
        let DrawCommand::Clip(clip) = renderer.commands[0] else {
            panic!("expected a clip");
        };
        assert_eq!(clip, Rect::new(0.0, 0.0, 102.0, 22.0));
        let glyph_runs: Vec<_> = renderer
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Glyphs { glyphs, .. } => Some(glyphs),
                _ => None,
            })
            .collect();
        assert_eq!(glyph_runs.len(), 2);
        assert_eq!(glyph_runs[0][0].color, BLUE);
        assert_eq!(glyph_runs[0][0].position.x, glyph_runs[1][0].position.x + 2.0);
    }

    #[test]
    fn shadows_of_every_run_sit_below_all_text() {
        let mut render_text = render_text("ab\u{5d0}\u{5d1}cd");
        render_text.set_shadows(vec![Shadow {
            offset: Point::new(1.0, 1.0),
            blur: 0.0,
            color: BLUE,
        }]);
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);
        let run_colors: Vec<_> = renderer
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Glyphs { glyphs, .. } => Some(glyphs[0].color),
                _ => None,
            })
            .collect();
        assert_eq!(run_colors.len(), 6);
        assert!(run_colors[..3].iter().all(|&color| color == BLUE));
        assert!(run_colors[3..].iter().all(|&color| color == crate::style::BLACK));
    }

    #[test]
    fn decorations_follow_styles() {
        let mut render_text = render_text("abcd");
        render_text.apply_style(TextStyle::Underline, true, TextRange::new(1, 3));
        render_text.apply_color(RED, TextRange::new(1, 3));
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);
        let lines = renderer.lines();
        assert_eq!(lines.len(), 1);
        let (from, to, color) = lines[0];
        assert_eq!((from.x, to.x), (10.0, 30.0));
        assert_eq!(color, RED);
    }

    #[test]
    fn fade_tail_fades_overflowing_glyphs() {
        let mut render_text = render_text("abcdefghijklmnop");
        render_text.set_cursor_enabled(false);
        render_text.set_elide_behavior(ElideBehavior::FadeTail);
        let mut renderer = RecordingRenderer::default();
        render_text.draw(&mut renderer);
        let alphas: Vec<u8> = renderer.glyph_colors().iter().map(|c| c.alpha).collect();
        assert_eq!(alphas[0], 255);
        assert!(alphas[9] < 255);
        assert_eq!(alphas[15], 0);
    }
}
