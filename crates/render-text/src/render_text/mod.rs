//! The `RenderText` facade: text, styles and selection in logical space,
//! lazily turned into shaped lines by a `TextLayoutBackend`.

mod backend;
mod cursor;
mod decorated;
mod draw;
mod layout_text;

pub use backend::{CursorHit, LayoutRequest, ShapedLayout, TextLayoutBackend, VisualTextRequest};
pub use decorated::{DecoratedText, RangedAttribute};
pub use layout_text::{LayoutText, PASSWORD_REPLACEMENT_CHAR};

use std::sync::{Arc, OnceLock};

use palette::Srgba;
use serde::{Deserialize, Serialize};

use crate::font::{FontList, ScaledFontMetrics};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{ElideBehavior, ElidedText, Elider, SelectionModel, WordWrapBehavior};
use crate::range::TextRange;
use crate::shaping::{HarfrustShaper, Shaper};
use crate::style::{BLACK, BaselineStyle, Color, Shadow, Styles, TextStyle, WHITE, Weight};
use crate::unicode::{round_down_to_grapheme, round_up_to_grapheme};

/// How the paragraph direction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionalityMode {
    /// First strong character of the text; LTR when there is none.
    #[default]
    FromText,
    /// The UI direction set with `set_ui_direction`.
    FromUi,
    ForceLtr,
    ForceRtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    /// Left for LTR text, right for RTL text.
    ToHead,
}

/// Granularity of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakType {
    Character,
    Word,
    /// To the visual start or end of the caret's line.
    Line,
}

/// A direction on screen, independent of text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualCursorDirection {
    Left,
    Right,
}

/// What happens to the selection when the caret moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBehavior {
    /// Collapse to the new caret.
    None,
    /// Extend, but stop at the anchor instead of crossing it.
    Caret,
    /// Keep the anchor and extend or shrink toward the caret.
    Retain,
    /// Keep extending; crossing the anchor keeps the old extent selected.
    Extend,
}

/// How stale the cached layout is. Variants are ordered from most to least
/// work needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LayoutValidity {
    /// Layout text, runs and lines all need rebuilding.
    NeedsItemize,
    /// Runs are current; only lines need rebuilding.
    NeedsLineBreak,
    Valid,
}

const DEFAULT_SELECTION_BACKGROUND: Color = Srgba::new(51, 144, 255, 255);

fn default_shaper() -> Arc<dyn Shaper> {
    static SHAPER: OnceLock<Arc<HarfrustShaper>> = OnceLock::new();
    let shaper = SHAPER.get_or_init(|| Arc::new(HarfrustShaper::with_system_fonts()));
    Arc::clone(shaper) as Arc<dyn Shaper>
}

/// Bidi-aware single- or multi-line text with styles, a selection and a
/// cursor.
///
/// Every index taken or returned is a byte offset into `text()` unless the
/// name says otherwise. Mutators only record state and invalidate; layout
/// is rebuilt on the next query that needs it.
pub struct RenderText {
    backend: Box<dyn TextLayoutBackend>,

    text: String,
    font_list: FontList,
    styles: Styles,
    selection_model: SelectionModel,

    selection_color: Color,
    selection_background_color: Color,
    cursor_color: Color,
    focused: bool,
    cursor_enabled: bool,
    cursor_visible: bool,
    insert_mode: bool,

    horizontal_alignment: HorizontalAlignment,
    directionality_mode: DirectionalityMode,
    ui_direction: TextDirection,
    text_direction: Option<TextDirection>,

    obscured: bool,
    obscured_reveal_index: Option<usize>,
    truncate_length: usize,
    elide_behavior: ElideBehavior,

    multiline: bool,
    max_lines: usize,
    word_wrap_behavior: WordWrapBehavior,
    min_line_height: f32,

    display_rect: Rect,
    clip_to_display_rect: bool,
    shadows: Vec<Shadow>,

    baseline: Option<f32>,
    display_offset_x: f32,
    cursor_bounds: Rect,
    cached_bounds_valid: bool,

    validity: LayoutValidity,
    layout: LayoutText,
    /// `styles` in layout-text space.
    layout_styles: Styles,
}

impl RenderText {
    /// An empty instance shaping with the process-wide system-font shaper.
    pub fn create_instance() -> Self {
        Self::new(default_shaper())
    }

    pub fn new(shaper: Arc<dyn Shaper>) -> Self {
        Self::with_backend(Box::new(ShapedLayout::new(shaper)))
    }

    pub fn with_backend(backend: Box<dyn TextLayoutBackend>) -> Self {
        let mut styles = Styles::default();
        styles.set_max(0);
        Self {
            backend,
            text: String::new(),
            font_list: FontList::default(),
            layout_styles: styles.clone(),
            styles,
            selection_model: SelectionModel::default(),
            selection_color: WHITE,
            selection_background_color: DEFAULT_SELECTION_BACKGROUND,
            cursor_color: BLACK,
            focused: false,
            cursor_enabled: true,
            cursor_visible: false,
            insert_mode: true,
            horizontal_alignment: HorizontalAlignment::Left,
            directionality_mode: DirectionalityMode::FromText,
            ui_direction: TextDirection::Ltr,
            text_direction: None,
            obscured: false,
            obscured_reveal_index: None,
            truncate_length: 0,
            elide_behavior: ElideBehavior::NoElide,
            multiline: false,
            max_lines: 0,
            word_wrap_behavior: WordWrapBehavior::WrapLongWords,
            min_line_height: 0.0,
            display_rect: Rect::default(),
            clip_to_display_rect: true,
            shadows: Vec::new(),
            baseline: None,
            display_offset_x: 0.0,
            cursor_bounds: Rect::default(),
            cached_bounds_valid: false,
            validity: LayoutValidity::NeedsItemize,
            layout: LayoutText::plain(""),
        }
    }

    /// A fresh instance sharing this one's backend kind and every setting
    /// that affects measured width, holding `text`.
    pub fn create_instance_of_same_style(&self, text: &str) -> RenderText {
        let mut instance = RenderText::with_backend(self.backend.fresh());
        instance.font_list = self.font_list.clone();
        instance.directionality_mode = self.directionality_mode;
        instance.ui_direction = self.ui_direction;
        instance.cursor_enabled = self.cursor_enabled;
        instance.text = text.to_owned();
        instance.styles = self.layout_styles.clone();
        instance.styles.set_max(text.len());
        instance
    }

    // Text and font.

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_owned();
        self.styles.set_max(self.text.len());
        self.selection_model = SelectionModel::default();
        self.obscured_reveal_index = None;
        self.on_text_attribute_changed();
    }

    pub fn font_list(&self) -> &FontList {
        &self.font_list
    }

    pub fn set_font_list(&mut self, font_list: FontList) {
        if self.font_list == font_list {
            return;
        }
        self.font_list = font_list;
        self.baseline = None;
        self.on_layout_text_attribute_changed();
    }

    // Styles. Shaping-relevant ranges snap outward to graphemes; colors and
    // decorations may split a grapheme.

    pub fn set_color(&mut self, color: Color) {
        self.styles.colors.set_value(color);
        self.invalidate(LayoutValidity::NeedsLineBreak);
    }

    pub fn apply_color(&mut self, color: Color, range: TextRange) {
        self.styles.colors.apply_value(color, self.clamp_range(range));
        self.invalidate(LayoutValidity::NeedsLineBreak);
    }

    pub fn set_weight(&mut self, weight: Weight) {
        self.styles.weights.set_value(weight);
        self.on_layout_text_attribute_changed();
    }

    pub fn apply_weight(&mut self, weight: Weight, range: TextRange) {
        let range = self.snap_to_graphemes(range);
        self.styles.weights.apply_value(weight, range);
        self.on_layout_text_attribute_changed();
    }

    pub fn set_style(&mut self, style: TextStyle, value: bool) {
        self.styles.style_mut(style).set_value(value);
        self.on_style_changed(style);
    }

    pub fn apply_style(&mut self, style: TextStyle, value: bool, range: TextRange) {
        let range = if style == TextStyle::Italic {
            self.snap_to_graphemes(range)
        } else {
            self.clamp_range(range)
        };
        self.styles.style_mut(style).apply_value(value, range);
        self.on_style_changed(style);
    }

    pub fn set_baseline_style(&mut self, baseline: BaselineStyle) {
        self.styles.baselines.set_value(baseline);
        self.on_layout_text_attribute_changed();
    }

    pub fn apply_baseline_style(&mut self, baseline: BaselineStyle, range: TextRange) {
        let range = self.snap_to_graphemes(range);
        self.styles.baselines.apply_value(baseline, range);
        self.on_layout_text_attribute_changed();
    }

    /// Styles in logical-text space.
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }

    pub fn set_shadows(&mut self, shadows: Vec<Shadow>) {
        self.shadows = shadows;
    }

    pub fn selection_color(&self) -> Color {
        self.selection_color
    }

    pub fn set_selection_color(&mut self, color: Color) {
        self.selection_color = color;
    }

    pub fn selection_background_color(&self) -> Color {
        self.selection_background_color
    }

    pub fn set_selection_background_color(&mut self, color: Color) {
        self.selection_background_color = color;
    }

    pub fn cursor_color(&self) -> Color {
        self.cursor_color
    }

    pub fn set_cursor_color(&mut self, color: Color) {
        self.cursor_color = color;
    }

    // Cursor and focus.

    pub fn cursor_enabled(&self) -> bool {
        self.cursor_enabled
    }

    /// The cursor reserves one pixel of content width while enabled.
    pub fn set_cursor_enabled(&mut self, enabled: bool) {
        if self.cursor_enabled == enabled {
            return;
        }
        self.cursor_enabled = enabled;
        self.cached_bounds_valid = false;
        if self.elide_behavior.replaces_text() && !self.multiline {
            self.invalidate(LayoutValidity::NeedsItemize);
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    /// Overtype mode (`false`) draws the cursor over the whole grapheme.
    pub fn set_insert_mode(&mut self, insert_mode: bool) {
        self.insert_mode = insert_mode;
        self.cached_bounds_valid = false;
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    // Direction and alignment.

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        if self.horizontal_alignment != alignment {
            self.horizontal_alignment = alignment;
            self.display_offset_x = 0.0;
            self.cached_bounds_valid = false;
        }
    }

    pub fn directionality_mode(&self) -> DirectionalityMode {
        self.directionality_mode
    }

    pub fn set_directionality_mode(&mut self, mode: DirectionalityMode) {
        if self.directionality_mode == mode {
            return;
        }
        self.directionality_mode = mode;
        self.on_layout_text_attribute_changed();
    }

    pub fn ui_direction(&self) -> TextDirection {
        self.ui_direction
    }

    /// Direction used by `DirectionalityMode::FromUi`.
    pub fn set_ui_direction(&mut self, direction: TextDirection) {
        if self.ui_direction == direction {
            return;
        }
        self.ui_direction = direction;
        if self.directionality_mode == DirectionalityMode::FromUi {
            self.on_layout_text_attribute_changed();
        }
    }

    /// Paragraph direction of the displayed text.
    pub fn get_display_text_direction(&mut self) -> TextDirection {
        self.ensure_layout();
        self.text_direction.unwrap_or_default()
    }

    /// The screen side where logical text ends.
    pub fn get_visual_direction_of_logical_end(&mut self) -> VisualCursorDirection {
        if self.get_display_text_direction().is_rtl() {
            VisualCursorDirection::Left
        } else {
            VisualCursorDirection::Right
        }
    }

    /// `ToHead` resolved against the display text direction.
    pub fn get_current_horizontal_alignment(&mut self) -> HorizontalAlignment {
        match self.horizontal_alignment {
            HorizontalAlignment::ToHead => {
                if self.get_display_text_direction().is_rtl() {
                    HorizontalAlignment::Right
                } else {
                    HorizontalAlignment::Left
                }
            }
            alignment => alignment,
        }
    }

    // Obscuring, truncation and elision.

    pub fn obscured(&self) -> bool {
        self.obscured
    }

    pub fn set_obscured(&mut self, obscured: bool) {
        if self.obscured == obscured {
            return;
        }
        self.obscured = obscured;
        self.obscured_reveal_index = None;
        self.on_layout_text_attribute_changed();
    }

    pub fn obscured_reveal_index(&self) -> Option<usize> {
        self.obscured_reveal_index
    }

    /// Show the character starting at logical `index` in clear while
    /// obscured. Indices that do not start a character reveal nothing.
    pub fn set_obscured_reveal_index(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.text.len() && self.text.is_char_boundary(i));
        if self.obscured_reveal_index == index {
            return;
        }
        self.obscured_reveal_index = index;
        self.on_layout_text_attribute_changed();
    }

    pub fn truncate_length(&self) -> usize {
        self.truncate_length
    }

    /// Cap the layout text at `length` characters, the last one becoming an
    /// ellipsis. 0 disables truncation.
    pub fn set_truncate_length(&mut self, length: usize) {
        if self.truncate_length == length {
            return;
        }
        self.truncate_length = length;
        self.on_layout_text_attribute_changed();
    }

    pub fn elide_behavior(&self) -> ElideBehavior {
        self.elide_behavior
    }

    pub fn set_elide_behavior(&mut self, behavior: ElideBehavior) {
        if self.elide_behavior == behavior {
            return;
        }
        self.elide_behavior = behavior;
        self.on_layout_text_attribute_changed();
    }

    // Multiline.

    pub fn multiline(&self) -> bool {
        self.multiline
    }

    pub fn set_multiline(&mut self, multiline: bool) {
        if self.multiline == multiline {
            return;
        }
        self.multiline = multiline;
        self.cached_bounds_valid = false;
        self.on_layout_text_attribute_changed();
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Limit multiline layout to `max_lines` lines; 0 means no limit.
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
        self.invalidate(LayoutValidity::NeedsLineBreak);
    }

    pub fn word_wrap_behavior(&self) -> WordWrapBehavior {
        self.word_wrap_behavior
    }

    pub fn set_word_wrap_behavior(&mut self, behavior: WordWrapBehavior) {
        if self.word_wrap_behavior == behavior {
            return;
        }
        self.word_wrap_behavior = behavior;
        self.invalidate(LayoutValidity::NeedsLineBreak);
    }

    pub fn min_line_height(&self) -> f32 {
        self.min_line_height
    }

    pub fn set_min_line_height(&mut self, height: f32) {
        if self.min_line_height == height {
            return;
        }
        self.min_line_height = height;
        self.invalidate(LayoutValidity::NeedsLineBreak);
    }

    // Display rect and offsets.

    pub fn display_rect(&self) -> Rect {
        self.display_rect
    }

    pub fn set_display_rect(&mut self, rect: Rect) {
        if self.display_rect == rect {
            return;
        }
        let width_changed = self.display_rect.width != rect.width;
        if self.display_rect.height != rect.height {
            self.baseline = None;
        }
        self.display_rect = rect;
        self.cached_bounds_valid = false;
        if !width_changed {
            return;
        }
        if self.multiline {
            self.invalidate(LayoutValidity::NeedsLineBreak);
        } else if self.elide_behavior.replaces_text() {
            self.invalidate(LayoutValidity::NeedsItemize);
        }
    }

    pub fn clip_to_display_rect(&self) -> bool {
        self.clip_to_display_rect
    }

    pub fn set_clip_to_display_rect(&mut self, clip: bool) {
        self.clip_to_display_rect = clip;
    }

    /// Horizontal scroll of single-line text, updated so the caret stays
    /// visible.
    pub fn get_updated_display_offset(&mut self) -> f32 {
        self.update_cached_bounds_and_offset();
        self.display_offset_x
    }

    /// Scroll single-line text, clamped so content stays in view as far as
    /// the alignment allows.
    pub fn set_display_offset(&mut self, offset: f32) {
        let extra_content = self.get_content_width() - self.display_rect.width;
        let cursor_width = if self.cursor_enabled { 1.0 } else { 0.0 };
        let (mut min_offset, mut max_offset) = (0.0_f32, 0.0_f32);
        if extra_content > 0.0 {
            match self.get_current_horizontal_alignment() {
                HorizontalAlignment::Left | HorizontalAlignment::ToHead => {
                    min_offset = -extra_content;
                }
                HorizontalAlignment::Right => max_offset = extra_content,
                HorizontalAlignment::Center => {
                    min_offset = -((extra_content - cursor_width + 1.0) / 2.0).trunc() - cursor_width;
                    max_offset = ((extra_content - cursor_width) / 2.0).trunc();
                }
            }
        }
        self.cached_bounds_valid = true;
        self.display_offset_x = offset.clamp(min_offset, max_offset);
        let caret = self.selection_model;
        self.cursor_bounds = self.get_cursor_bounds(&caret, true);
    }

    fn update_cached_bounds_and_offset(&mut self) {
        if self.cached_bounds_valid {
            return;
        }
        self.ensure_layout();
        if self.multiline {
            self.display_offset_x = 0.0;
            self.cached_bounds_valid = true;
            return;
        }
        // Bounds are computed against the stale offset, then corrected.
        self.cached_bounds_valid = true;
        if self.cursor_enabled {
            let caret = self.selection_model;
            self.cursor_bounds = self.get_cursor_bounds(&caret, true);
        }
        let display = self.display_rect;
        let content_width = self.get_content_width();
        let delta = if content_width <= display.width || !self.cursor_enabled {
            -self.display_offset_x
        } else if self.cursor_bounds.right() > display.right() {
            display.right() - self.cursor_bounds.right()
        } else if self.cursor_bounds.x < display.x {
            display.x - self.cursor_bounds.x
        } else {
            0.0
        };
        self.set_display_offset(self.display_offset_x + delta);
    }

    /// View-space offset of line `line`'s top-left corner.
    pub fn get_line_offset(&mut self, line: usize) -> Point {
        self.ensure_layout();
        let mut offset = self.display_rect.origin();
        if self.multiline {
            let lines = self.backend.lines();
            if let Some(line) = lines.get(line).or(lines.last()) {
                offset.y += line.preceding_heights;
            }
        } else {
            offset.x += self.get_updated_display_offset();
        }
        offset + self.get_alignment_offset(line)
    }

    fn get_alignment_offset(&mut self, line: usize) -> Point {
        let alignment = self.get_current_horizontal_alignment();
        let mut offset = Point::default();
        if alignment != HorizontalAlignment::Left {
            let width = if self.multiline {
                let line_width = self
                    .backend
                    .lines()
                    .get(line)
                    .map_or(0.0, |l| l.size.width);
                line_width.ceil() + self.cursor_width()
            } else {
                self.get_content_width()
            };
            offset.x = self.display_rect.width - width;
            if alignment == HorizontalAlignment::Center {
                offset.x = ((offset.x + 1.0) / 2.0).trunc();
            }
        }
        if !self.multiline {
            let text_baseline = self.backend.lines().first().map_or(0.0, |l| l.baseline);
            offset.y = self.get_baseline() - text_baseline;
        }
        offset
    }

    // Measurement.

    /// Unrounded size of the laid out text.
    pub fn get_string_size_f(&mut self) -> Size {
        self.ensure_layout();
        self.backend.content_size()
    }

    pub fn get_string_size(&mut self) -> Size {
        self.get_string_size_f().ceil()
    }

    /// String width in whole pixels plus one pixel for an enabled cursor.
    pub fn get_content_width(&mut self) -> f32 {
        self.ensure_layout();
        self.content_width()
    }

    pub fn get_content_width_f(&mut self) -> f32 {
        self.get_content_width()
    }

    fn content_width(&self) -> f32 {
        self.backend.content_size().width.ceil() + self.cursor_width()
    }

    fn cursor_width(&self) -> f32 {
        if self.cursor_enabled { 1.0 } else { 0.0 }
    }

    /// Distance from the display rect top to the baseline, centering the
    /// font's cap height in the rect.
    pub fn get_baseline(&mut self) -> f32 {
        if let Some(baseline) = self.baseline {
            return baseline;
        }
        let metrics = self.backend.font_metrics(&self.font_list);
        let baseline = determine_baseline_centering_text(self.display_rect.height, &metrics);
        self.baseline = Some(baseline);
        baseline
    }

    pub fn get_num_lines(&mut self) -> usize {
        self.ensure_layout();
        self.backend.lines().len()
    }

    /// The displayed text: logical text after obscuring, truncation and
    /// elision.
    pub fn get_display_text(&mut self) -> &str {
        self.ensure_layout();
        self.layout.text()
    }

    /// Alias of `get_display_text`.
    pub fn layout_text(&mut self) -> &str {
        self.get_display_text()
    }

    /// Fonts requested for each run in logical order, with logical ranges.
    pub fn get_font_spans_for_testing(&mut self) -> Vec<(FontList, TextRange)> {
        self.ensure_layout();
        self.backend
            .run_list()
            .runs()
            .iter()
            .map(|run| {
                let range = TextRange::new(
                    self.layout.to_text(run.range.start()),
                    self.layout.to_text(run.range.end()),
                );
                (run.font.clone(), range)
            })
            .collect()
    }

    // Layout pipeline.

    pub(crate) fn validity(&self) -> LayoutValidity {
        self.validity
    }

    pub(crate) fn backend(&mut self) -> &dyn TextLayoutBackend {
        self.ensure_layout();
        self.backend.as_ref()
    }

    pub(crate) fn layout_styles(&mut self) -> &Styles {
        self.ensure_layout();
        &self.layout_styles
    }

    pub(crate) fn layout(&self) -> &LayoutText {
        &self.layout
    }

    fn invalidate(&mut self, validity: LayoutValidity) {
        self.validity = self.validity.min(validity);
        self.cached_bounds_valid = false;
    }

    fn on_layout_text_attribute_changed(&mut self) {
        self.text_direction = None;
        self.invalidate(LayoutValidity::NeedsItemize);
    }

    fn on_text_attribute_changed(&mut self) {
        self.on_layout_text_attribute_changed();
    }

    fn on_style_changed(&mut self, style: TextStyle) {
        if style == TextStyle::Italic {
            self.on_layout_text_attribute_changed();
        } else {
            self.invalidate(LayoutValidity::NeedsLineBreak);
        }
    }

    fn clamp_range(&self, range: TextRange) -> TextRange {
        let len = self.text.len();
        TextRange::new(range.min().min(len), range.max().min(len))
    }

    /// Widen `range` to grapheme boundaries of the logical text.
    fn snap_to_graphemes(&self, range: TextRange) -> TextRange {
        let range = self.clamp_range(range);
        TextRange::new(
            round_down_to_grapheme(&self.text, range.start()),
            round_up_to_grapheme(&self.text, range.end()),
        )
    }

    fn resolve_text_direction(&self) -> TextDirection {
        match self.directionality_mode {
            DirectionalityMode::FromText => {
                match crate::bidi::first_strong_direction(self.layout.text()) {
                    Some(true) => TextDirection::Rtl,
                    _ => TextDirection::Ltr,
                }
            }
            DirectionalityMode::FromUi => self.ui_direction,
            DirectionalityMode::ForceLtr => TextDirection::Ltr,
            DirectionalityMode::ForceRtl => TextDirection::Rtl,
        }
    }

    fn should_elide(&self) -> bool {
        !self.multiline && self.elide_behavior.replaces_text() && !self.text.is_empty()
    }

    /// Rebuild whatever `validity` says is stale.
    pub(crate) fn ensure_layout(&mut self) {
        let validity = self.validity;
        if validity == LayoutValidity::Valid {
            return;
        }
        if validity == LayoutValidity::NeedsItemize {
            self.layout = LayoutText::build(
                &self.text,
                self.obscured,
                self.obscured_reveal_index,
                self.truncate_length,
            );
        }
        if self.text_direction.is_none() {
            self.text_direction = Some(self.resolve_text_direction());
        }
        let paragraph_rtl = self.text_direction.unwrap_or_default().is_rtl();
        self.layout_styles = self.layout_space_styles();
        self.run_backend(paragraph_rtl, validity);

        if validity == LayoutValidity::NeedsItemize && self.should_elide() {
            let content_width = self.content_width();
            if content_width > self.display_rect.width {
                let elided = self.elide_layout_text(paragraph_rtl, content_width);
                if elided.is_elided() {
                    self.layout.apply_elision(&elided);
                    self.layout_styles = self.layout_space_styles();
                    self.run_backend(paragraph_rtl, LayoutValidity::NeedsItemize);
                }
            }
        }
        self.validity = LayoutValidity::Valid;
        self.cached_bounds_valid = false;
    }

    fn layout_space_styles(&self) -> Styles {
        let layout = &self.layout;
        self.styles
            .remapped(layout.text().len(), |index| layout.to_layout(index))
    }

    fn run_backend(&mut self, paragraph_rtl: bool, validity: LayoutValidity) {
        let request = LayoutRequest {
            text: self.layout.text(),
            styles: &self.layout_styles,
            font: &self.font_list,
            paragraph_rtl,
            multiline: self.multiline,
            max_width: self.display_rect.width,
            max_lines: self.max_lines,
            word_wrap: self.word_wrap_behavior,
            min_line_height: self.min_line_height,
        };
        self.backend.ensure_layout(&request, validity);
    }

    fn elide_layout_text(&self, paragraph_rtl: bool, content_width: f32) -> ElidedText {
        let mut measure = |candidate: &ElidedText| {
            let mut instance = self.create_instance_of_same_style(&candidate.text);
            instance.styles = self
                .layout_styles
                .remapped(candidate.text.len(), |index| candidate.to_layout(index));
            instance.get_content_width_f()
        };
        let mut elider = Elider::new(&mut measure, paragraph_rtl);
        let elided = elider.elide(
            self.layout.text(),
            content_width,
            self.display_rect.width,
            self.elide_behavior,
        );
        tracing::debug!(
            behavior = ?self.elide_behavior,
            available = self.display_rect.width,
            content_width,
            elided_len = elided.text.len(),
            "elided layout text"
        );
        elided
    }
}

/// Baseline that vertically centers cap height (or the whole font height
/// when the cap height is unknown) in `display_height`.
fn determine_baseline_centering_text(display_height: f32, metrics: &ScaledFontMetrics) -> f32 {
    let font_height = metrics.height();
    let min_shift = (display_height - font_height).min(0.0);
    let max_shift = (display_height - font_height).abs();
    let baseline = metrics.baseline();
    let cap_height = metrics.cap_height.round();
    let internal_leading = baseline - cap_height;
    let space = display_height
        - if internal_leading != 0.0 {
            cap_height
        } else {
            font_height
        };
    let shift = (space / 2.0).trunc() - internal_leading;
    baseline + shift.clamp(min_shift, max_shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::RED;
    use crate::testing::MonospaceShaper;

    fn render_text(text: &str) -> RenderText {
        let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
        render_text.set_text(text);
        render_text
    }

    #[test]
    fn set_text_resizes_styles_and_resets_selection() {
        let mut render_text = render_text("HELLO");
        render_text.apply_color(RED, TextRange::new(1, 4));
        assert!(render_text
            .styles()
            .colors
            .equals_for_testing(&[(0, BLACK), (1, RED), (4, BLACK)]));

        render_text.select_range(TextRange::new(1, 3));
        render_text.set_text("HEL");
        assert_eq!(render_text.styles().colors.max(), 3);
        assert!(render_text
            .styles()
            .colors
            .equals_for_testing(&[(0, BLACK), (1, RED)]));
        assert_eq!(render_text.selection(), TextRange::collapsed(0));
    }

    #[test]
    fn shaping_styles_snap_to_graphemes() {
        let mut render_text = render_text("ae\u{301}b");
        render_text.apply_weight(Weight::BOLD, TextRange::new(2, 3));
        assert!(render_text
            .styles()
            .weights
            .equals_for_testing(&[(0, Weight::NORMAL), (1, Weight::BOLD), (4, Weight::NORMAL)]));

        render_text.apply_color(RED, TextRange::new(2, 3));
        assert!(render_text
            .styles()
            .colors
            .equals_for_testing(&[(0, BLACK), (2, RED), (3, BLACK)]));
    }

    #[test]
    fn invalidation_levels() {
        let mut render_text = render_text("abc");
        render_text.get_string_size();
        assert_eq!(render_text.validity(), LayoutValidity::Valid);

        render_text.apply_color(RED, TextRange::new(0, 1));
        assert_eq!(render_text.validity(), LayoutValidity::NeedsLineBreak);
        render_text.get_string_size();

        render_text.set_style(TextStyle::Italic, true);
        assert_eq!(render_text.validity(), LayoutValidity::NeedsItemize);
        render_text.get_string_size();

        render_text.set_text("abc");
        assert_eq!(render_text.validity(), LayoutValidity::Valid);
    }

    #[test]
    fn display_text_direction_follows_mode() {
        let mut render_text = render_text("\u{5d0}bc");
        assert_eq!(render_text.get_display_text_direction(), TextDirection::Rtl);
        render_text.set_directionality_mode(DirectionalityMode::ForceLtr);
        assert_eq!(render_text.get_display_text_direction(), TextDirection::Ltr);
        render_text.set_directionality_mode(DirectionalityMode::FromUi);
        render_text.set_ui_direction(TextDirection::Rtl);
        assert_eq!(render_text.get_display_text_direction(), TextDirection::Rtl);

        render_text.set_directionality_mode(DirectionalityMode::FromText);
        render_text.set_obscured(true);
        assert_eq!(render_text.get_display_text_direction(), TextDirection::Ltr);
    }

    #[test]
    fn content_width_reserves_a_cursor_pixel() {
        let mut render_text = render_text("abc");
        assert_eq!(render_text.get_string_size().width, 30.0);
        assert_eq!(render_text.get_content_width(), 31.0);
        render_text.set_cursor_enabled(false);
        assert_eq!(render_text.get_content_width(), 30.0);
    }

    #[test]
    fn baseline_centers_cap_height() {
        // Approximate metrics at 13px: ascent 10, descent 3, cap height 9.
        let metrics = ScaledFontMetrics::approximate(13.0);
        assert_eq!(determine_baseline_centering_text(13.0, &metrics), 10.0);
        assert_eq!(determine_baseline_centering_text(30.0, &metrics), 19.0);
        assert_eq!(determine_baseline_centering_text(5.0, &metrics), 7.0);
    }

    #[test]
    fn alignment_offsets_single_line_text() {
        let mut render_text = render_text("abc");
        render_text.set_cursor_enabled(false);
        render_text.set_display_rect(Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(render_text.get_line_offset(0).x, 0.0);
        render_text.set_horizontal_alignment(HorizontalAlignment::Right);
        assert_eq!(render_text.get_line_offset(0).x, 70.0);
        render_text.set_horizontal_alignment(HorizontalAlignment::Center);
        assert_eq!(render_text.get_line_offset(0).x, 35.0);

        render_text.set_text("\u{5d0}\u{5d1}");
        render_text.set_horizontal_alignment(HorizontalAlignment::ToHead);
        assert_eq!(render_text.get_line_offset(0).x, 80.0);
    }

    #[test]
    fn tail_elision_fits_the_display_width() {
        let mut render_text = render_text("abcdefghij");
        render_text.set_cursor_enabled(false);
        render_text.set_elide_behavior(ElideBehavior::ElideTail);
        render_text.set_display_rect(Rect::new(0.0, 0.0, 55.0, 20.0));
        assert_eq!(render_text.get_display_text(), "abcd\u{2026}");
        assert!(render_text.get_content_width() <= 55.0);

        render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(render_text.get_display_text(), "abcdefghij");
    }

    #[test]
    fn head_elision_measures_candidates_with_their_own_styles() {
        let shaper = MonospaceShaper::new(10.0).with_bold_advance(20.0);
        let mut render_text = RenderText::new(Arc::new(shaper));
        render_text.set_text("abcdefghij");
        render_text.set_cursor_enabled(false);
        render_text.apply_weight(Weight::BOLD, TextRange::new(0, 2));
        render_text.set_elide_behavior(ElideBehavior::ElideHead);
        render_text.set_display_rect(Rect::new(0.0, 0.0, 60.0, 20.0));
        assert_eq!(render_text.get_display_text(), "\u{2026}fghij");
        assert_eq!(render_text.get_content_width_f(), 60.0);
    }
}
