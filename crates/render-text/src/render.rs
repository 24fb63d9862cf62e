//! The drawing collaborator and the effects applied on top of it.

use crate::font::FontList;
use crate::geometry::{Point, Rect};
use crate::shaping::GlyphId;
use crate::style::{Color, with_alpha_factor};

/// A glyph ready to draw, in view coordinates at its baseline origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub id: GlyphId,
    pub position: Point,
    pub color: Color,
}

/// Drawing surface used by `RenderText::draw`.
///
/// Calls arrive in paint order; clips nest.
pub trait Renderer {
    fn push_clip_rect(&mut self, rect: Rect);
    fn pop_clip(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, from: Point, to: Point, thickness: f32, color: Color);
    /// Draw glyphs shaped with `font`. A `blur` above 0 asks for a blurred
    /// mask, as used by shadows.
    fn draw_glyphs(&mut self, font: &FontList, glyphs: &[PositionedGlyph], blur: f32);
}

/// Linear alpha ramp over a horizontal span of view space.
///
/// Glyphs before `start` are opaque and glyphs at or past `end` are fully
/// transparent; `end < start` fades toward the left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEffect {
    pub start: f32,
    pub end: f32,
}

impl FadeEffect {
    /// Fade covering the last `width` pixels before `edge`, in the given
    /// direction.
    pub fn toward(edge: f32, width: f32, toward_right: bool) -> Self {
        if toward_right {
            Self {
                start: edge - width,
                end: edge,
            }
        } else {
            Self {
                start: edge + width,
                end: edge,
            }
        }
    }

    pub fn alpha_at(&self, x: f32) -> f32 {
        let span = self.end - self.start;
        if span == 0.0 {
            return 1.0;
        }
        1.0 - ((x - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn apply(&self, glyph: &mut PositionedGlyph, glyph_width: f32) {
        let center = glyph.position.x + glyph_width / 2.0;
        glyph.color = with_alpha_factor(glyph.color, self.alpha_at(center));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BLACK;

    #[test]
    fn fade_ramps_alpha_toward_the_edge() {
        let fade = FadeEffect::toward(100.0, 20.0, true);
        assert_eq!(fade.alpha_at(50.0), 1.0);
        assert_eq!(fade.alpha_at(90.0), 0.5);
        assert_eq!(fade.alpha_at(120.0), 0.0);

        let left = FadeEffect::toward(0.0, 10.0, false);
        assert_eq!(left.alpha_at(5.0), 0.5);
        assert_eq!(left.alpha_at(20.0), 1.0);

        let mut glyph = PositionedGlyph {
            id: 1,
            position: Point::new(85.0, 10.0),
            color: BLACK,
        };
        fade.apply(&mut glyph, 10.0);
        assert_eq!(glyph.color.alpha, 128);
    }
}
