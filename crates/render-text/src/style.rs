use palette::Srgba;

use crate::break_list::BreakList;
use crate::geometry::Point;
use crate::range::TextRange;

/// Non-premultiplied sRGB color with 8-bit channels.
pub type Color = Srgba<u8>;

pub const BLACK: Color = Srgba::new(0, 0, 0, 255);
pub const WHITE: Color = Srgba::new(255, 255, 255, 255);
pub const RED: Color = Srgba::new(255, 0, 0, 255);
pub const BLUE: Color = Srgba::new(0, 0, 255, 255);
pub const TRANSPARENT: Color = Srgba::new(0, 0, 0, 0);

/// Same color with its alpha channel scaled by `factor` (clamped to [0, 1]).
pub fn with_alpha_factor(color: Color, factor: f32) -> Color {
    let alpha = (color.alpha as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    Srgba::new(color.red, color.green, color.blue, alpha)
}

/// CSS-style font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(pub u16);

impl Weight {
    pub const THIN: Weight = Weight(100);
    pub const LIGHT: Weight = Weight(300);
    pub const NORMAL: Weight = Weight(400);
    pub const MEDIUM: Weight = Weight(500);
    pub const SEMIBOLD: Weight = Weight(600);
    pub const BOLD: Weight = Weight(700);
    pub const BLACK: Weight = Weight(900);

    pub fn is_bold(self) -> bool {
        self >= Weight::SEMIBOLD
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::NORMAL
    }
}

/// Vertical placement of a text range relative to the line baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaselineStyle {
    #[default]
    Normal,
    /// Raised, full size.
    Superscript,
    /// Smaller, top aligned with the cap height.
    Superior,
    /// Smaller, sitting on the baseline.
    Inferior,
    /// Lowered, full size.
    Subscript,
}

const SMALL_FONT_SCALE: f32 = 0.7;
const SUPERSCRIPT_RAISE: f32 = 1.0 / 3.0;
const SUBSCRIPT_DROP: f32 = 1.0 / 5.0;

impl BaselineStyle {
    /// Multiplier applied to the font size when shaping this style.
    pub fn size_scale(self) -> f32 {
        match self {
            BaselineStyle::Superior | BaselineStyle::Inferior => SMALL_FONT_SCALE,
            _ => 1.0,
        }
    }

    /// Vertical glyph offset in pixels (positive is down) for a font of
    /// `font_size` pixels with the given cap height.
    pub fn baseline_shift(self, font_size: f32, cap_height: f32) -> f32 {
        match self {
            BaselineStyle::Normal | BaselineStyle::Inferior => 0.0,
            BaselineStyle::Superscript => -font_size * SUPERSCRIPT_RAISE,
            BaselineStyle::Superior => -(cap_height * (1.0 - SMALL_FONT_SCALE)),
            BaselineStyle::Subscript => font_size * SUBSCRIPT_DROP,
        }
    }
}

/// Boolean per-character text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Italic,
    Strike,
    DiagonalStrike,
    Underline,
}

impl TextStyle {
    pub const COUNT: usize = 4;
    pub const ALL: [TextStyle; Self::COUNT] = [
        TextStyle::Italic,
        TextStyle::Strike,
        TextStyle::DiagonalStrike,
        TextStyle::Underline,
    ];

    pub fn index(self) -> usize {
        match self {
            TextStyle::Italic => 0,
            TextStyle::Strike => 1,
            TextStyle::DiagonalStrike => 2,
            TextStyle::Underline => 3,
        }
    }
}

/// A drop shadow drawn beneath the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: Point,
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    /// Extra space the shadow needs around the text on each edge.
    fn margin(&self) -> (f32, f32, f32, f32) {
        let blur = self.blur.max(0.0) / 2.0;
        (
            (blur - self.offset.y).max(0.0),
            (blur - self.offset.x).max(0.0),
            (blur + self.offset.y).max(0.0),
            (blur + self.offset.x).max(0.0),
        )
    }
}

/// Union of the margins of every shadow as (top, left, bottom, right).
pub fn shadow_margins(shadows: &[Shadow]) -> crate::geometry::Insets {
    let mut insets = crate::geometry::Insets::default();
    for shadow in shadows {
        let (top, left, bottom, right) = shadow.margin();
        insets.top = insets.top.max(top);
        insets.left = insets.left.max(left);
        insets.bottom = insets.bottom.max(bottom);
        insets.right = insets.right.max(right);
    }
    insets
}

/// Resolved style values at a single position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSnapshot {
    pub color: Color,
    pub baseline: BaselineStyle,
    pub weight: Weight,
    pub italic: bool,
    pub strike: bool,
    pub diagonal_strike: bool,
    pub underline: bool,
}

impl StyleSnapshot {
    /// Only weight, italics and baseline change which font is shaped.
    pub fn same_shaping(&self, other: &StyleSnapshot) -> bool {
        self.weight == other.weight
            && self.italic == other.italic
            && self.baseline == other.baseline
    }
}

/// Every ranged style attribute of a text, keyed over one index space.
#[derive(Debug, Clone, PartialEq)]
pub struct Styles {
    pub colors: BreakList<Color>,
    pub baselines: BreakList<BaselineStyle>,
    pub weights: BreakList<Weight>,
    pub styles: [BreakList<bool>; TextStyle::COUNT],
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            colors: BreakList::new(BLACK),
            baselines: BreakList::new(BaselineStyle::Normal),
            weights: BreakList::new(Weight::NORMAL),
            styles: [
                BreakList::new(false),
                BreakList::new(false),
                BreakList::new(false),
                BreakList::new(false),
            ],
        }
    }
}

impl Styles {
    pub fn set_max(&mut self, max: usize) {
        self.colors.set_max(max);
        self.baselines.set_max(max);
        self.weights.set_max(max);
        for style in &mut self.styles {
            style.set_max(max);
        }
    }

    pub fn style(&self, style: TextStyle) -> &BreakList<bool> {
        &self.styles[style.index()]
    }

    pub fn style_mut(&mut self, style: TextStyle) -> &mut BreakList<bool> {
        &mut self.styles[style.index()]
    }

    pub fn snapshot_at(&self, position: usize) -> StyleSnapshot {
        StyleSnapshot {
            color: *self.colors.value_at(position),
            baseline: *self.baselines.value_at(position),
            weight: *self.weights.value_at(position),
            italic: *self.style(TextStyle::Italic).value_at(position),
            strike: *self.style(TextStyle::Strike).value_at(position),
            diagonal_strike: *self.style(TextStyle::DiagonalStrike).value_at(position),
            underline: *self.style(TextStyle::Underline).value_at(position),
        }
    }

    /// Sorted, deduplicated break positions across every list, always
    /// starting with 0.
    pub fn break_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .colors
            .breaks()
            .iter()
            .map(|(p, _)| *p)
            .chain(self.baselines.breaks().iter().map(|(p, _)| *p))
            .chain(self.weights.breaks().iter().map(|(p, _)| *p))
            .chain(
                self.styles
                    .iter()
                    .flat_map(|list| list.breaks().iter().map(|(p, _)| *p)),
            )
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Maximal spans over which every attribute is constant.
    pub fn spans(&self) -> Vec<(TextRange, StyleSnapshot)> {
        let max = self.colors.max();
        let positions = self.break_positions();
        positions
            .iter()
            .enumerate()
            .filter(|(_, start)| **start < max)
            .map(|(i, start)| {
                let end = positions.get(i + 1).copied().unwrap_or(max).min(max);
                (TextRange::new(*start, end), self.snapshot_at(*start))
            })
            .collect()
    }

    /// Rebuild these styles in another index space.
    ///
    /// `map` converts a position of this index space into the target space
    /// and must be monotonic; the result has `max == len`.
    pub fn remapped(&self, len: usize, map: impl Fn(usize) -> usize) -> Styles {
        fn remap<T: Clone + PartialEq>(
            list: &BreakList<T>,
            len: usize,
            map: &impl Fn(usize) -> usize,
        ) -> BreakList<T> {
            let mut out = BreakList::new(list.breaks()[0].1.clone());
            out.set_max(len);
            for (range, value) in list.spans() {
                let start = map(range.start());
                let end = if range.end() >= list.max() {
                    len
                } else {
                    map(range.end())
                };
                out.apply_value(value.clone(), TextRange::new(start, end));
            }
            out
        }

        Styles {
            colors: remap(&self.colors, len, &map),
            baselines: remap(&self.baselines, len, &map),
            weights: remap(&self.weights, len, &map),
            styles: [
                remap(&self.styles[0], len, &map),
                remap(&self.styles[1], len, &map),
                remap(&self.styles[2], len, &map),
                remap(&self.styles[3], len, &map),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_split_at_every_attribute_change() {
        let mut styles = Styles::default();
        styles.set_max(10);
        styles.colors.apply_value(RED, TextRange::new(2, 6));
        styles
            .style_mut(TextStyle::Underline)
            .apply_value(true, TextRange::new(4, 8));

        let spans: Vec<_> = styles.spans().into_iter().map(|(r, _)| r.as_range()).collect();
        assert_eq!(spans, vec![0..2, 2..4, 4..6, 6..8, 8..10]);
        let at5 = styles.snapshot_at(5);
        assert_eq!(at5.color, RED);
        assert!(at5.underline);
    }

    #[test]
    fn remapping_to_a_longer_space_scales_breaks() {
        let mut styles = Styles::default();
        styles.set_max(4);
        styles.weights.apply_value(Weight::BOLD, TextRange::new(1, 2));
        let doubled = styles.remapped(8, |i| i * 2);
        assert!(doubled
            .weights
            .equals_for_testing(&[(0, Weight::NORMAL), (2, Weight::BOLD), (4, Weight::NORMAL)]));
        assert_eq!(doubled.colors.max(), 8);
    }

    #[test]
    fn shadow_margins_cover_offset_and_blur() {
        let shadows = [Shadow {
            offset: Point::new(2.0, -1.0),
            blur: 4.0,
            color: BLACK,
        }];
        let insets = shadow_margins(&shadows);
        assert_eq!(insets.top, 3.0);
        assert_eq!(insets.right, 4.0);
        assert_eq!(insets.left, 0.0);
    }
}
