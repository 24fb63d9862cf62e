/// Face-level metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    pub line_gap: f32,
    pub units_per_em: u16,
    pub cap_height: Option<f32>,
    pub x_height: Option<f32>,
    /// Average advance of lowercase glyphs (OS/2 `xAvgCharWidth`).
    pub average_width: Option<f32>,
}

impl FontMetrics {
    /// Scale to `font_size` pixels per em, filling in conventional
    /// fractions of the em for metrics the face does not provide.
    pub fn scale_to_pixels(&self, font_size: f32) -> ScaledFontMetrics {
        let scale = if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        };
        let ascent = self.ascent * scale;
        ScaledFontMetrics {
            ascent,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            cap_height: self.cap_height.map_or(ascent, |h| h * scale),
            x_height: self.x_height.map_or(font_size * 0.5, |h| h * scale),
            average_char_width: self.average_width.map_or(font_size * 0.5, |w| w * scale),
            font_size,
        }
    }
}

/// Metrics in pixels for one font at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub cap_height: f32,
    pub x_height: f32,
    pub average_char_width: f32,
    pub font_size: f32,
}

impl ScaledFontMetrics {
    /// Metrics synthesized from the font size alone, used when no face can
    /// be resolved.
    pub fn approximate(font_size: f32) -> Self {
        Self {
            ascent: (font_size * 0.8).round(),
            descent: (font_size * 0.2).round(),
            line_gap: 0.0,
            cap_height: (font_size * 0.7).round(),
            x_height: (font_size * 0.5).round(),
            average_char_width: (font_size * 0.5).round(),
            font_size,
        }
    }

    /// Line height in whole pixels.
    pub fn height(&self) -> f32 {
        (self.ascent.ceil() + self.descent.ceil()).max(0.0)
    }

    /// Distance from the line top to the baseline in whole pixels.
    pub fn baseline(&self) -> f32 {
        self.ascent.ceil()
    }
}
