use crate::layout::ElidedText;
use crate::unicode::{ELLIPSIS, round_down_to_grapheme};

/// Character shown in place of every obscured character.
pub const PASSWORD_REPLACEMENT_CHAR: char = '*';

/// Per-character map between logical text and its obscured form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ObscuredText {
    text: String,
    /// Byte offset of each character start in logical text, then its length.
    logical: Vec<usize>,
    /// Byte offset of each character start in the obscured text, then its
    /// length.
    obscured: Vec<usize>,
}

impl ObscuredText {
    fn new(source: &str, reveal_index: Option<usize>) -> Self {
        let mut text = String::with_capacity(source.chars().count());
        let mut logical = Vec::new();
        let mut obscured = Vec::new();
        for (index, c) in source.char_indices() {
            logical.push(index);
            obscured.push(text.len());
            if reveal_index == Some(index) {
                text.push(c);
            } else {
                text.push(PASSWORD_REPLACEMENT_CHAR);
            }
        }
        logical.push(source.len());
        obscured.push(text.len());
        Self {
            text,
            logical,
            obscured,
        }
    }

    fn to_obscured(&self, index: usize) -> usize {
        let slot = self.logical.partition_point(|&start| start <= index).saturating_sub(1);
        self.obscured[slot]
    }

    fn to_logical(&self, index: usize) -> usize {
        let slot = self.obscured.partition_point(|&start| start <= index).saturating_sub(1);
        self.logical[slot]
    }
}

/// The text handed to layout plus the maps back to logical text.
///
/// Logical text is first obscured (when enabled), then truncated, then
/// elided; each step can only drop or replace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutText {
    obscured: Option<ObscuredText>,
    /// Truncation and elision over the obscured (or logical) text.
    shortened: ElidedText,
}

impl LayoutText {
    /// Layout text equal to `text`.
    pub fn plain(text: &str) -> Self {
        Self {
            obscured: None,
            shortened: ElidedText::identity(text),
        }
    }

    /// Apply obscuring and truncation to `text`.
    ///
    /// `truncate_length` counts characters; 0 disables truncation.
    pub fn build(text: &str, obscured: bool, reveal_index: Option<usize>, truncate_length: usize) -> Self {
        let obscured = obscured.then(|| ObscuredText::new(text, reveal_index));
        let base = obscured.as_ref().map_or(text, |o| o.text.as_str());
        let shortened = truncate(base, truncate_length);
        Self {
            obscured,
            shortened,
        }
    }

    pub fn text(&self) -> &str {
        &self.shortened.text
    }

    /// Further shorten the current layout text with `elided`, an elision of
    /// `self.text()`.
    pub fn apply_elision(&mut self, elided: &ElidedText) {
        self.shortened = self.shortened.compose(elided);
    }

    pub fn to_layout(&self, index: usize) -> usize {
        let base = self.obscured.as_ref().map_or(index, |o| o.to_obscured(index));
        self.shortened.to_layout(base)
    }

    pub fn to_text(&self, index: usize) -> usize {
        let base = self.shortened.to_source(index);
        self.obscured.as_ref().map_or(base, |o| o.to_logical(base))
    }

    /// `true` if logical `index` lies inside text dropped by truncation or
    /// elision.
    pub fn is_hidden(&self, index: usize) -> bool {
        let base = self.obscured.as_ref().map_or(index, |o| o.to_obscured(index));
        self.shortened.is_hidden(base)
    }
}

/// Keep the first `length - 1` characters (rounded down to a grapheme) and
/// append an ellipsis when `text` has more than `length` characters.
fn truncate(text: &str, length: usize) -> ElidedText {
    if length == 0 || text.chars().nth(length).is_none() {
        return ElidedText::identity(text);
    }
    let keep = text
        .char_indices()
        .nth(length - 1)
        .map_or(text.len(), |(index, _)| index);
    let keep = round_down_to_grapheme(text, keep);
    let mut out = ElidedText::prefix(text, keep);
    out.push_inserted(&ELLIPSIS.to_string());
    out
}
