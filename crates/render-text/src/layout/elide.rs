use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::bidi::last_strong_direction;
use crate::unicode::{ELLIPSIS, LRM, RLM, next_grapheme_boundary, round_down_to_grapheme, round_up_to_grapheme};

/// How text wider than the display rect is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElideBehavior {
    /// Lay out the full text; the clip cuts it.
    #[default]
    NoElide,
    /// Cut at the edge without an ellipsis.
    Truncate,
    ElideHead,
    ElideMiddle,
    ElideTail,
    /// Shorten the username and domain of `user@domain` separately.
    ElideEmail,
    /// Keep the full text and fade out glyphs near the edge when drawing.
    FadeTail,
}

impl ElideBehavior {
    /// Behaviors that rewrite the text to fit the display width.
    pub fn replaces_text(self) -> bool {
        matches!(
            self,
            ElideBehavior::Truncate
                | ElideBehavior::ElideHead
                | ElideBehavior::ElideMiddle
                | ElideBehavior::ElideTail
                | ElideBehavior::ElideEmail
        )
    }
}

/// One contiguous piece of a derived string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Bytes of the derived string.
    pub layout: Range<usize>,
    /// Bytes of the source string copied here, `None` for inserted text such
    /// as an ellipsis.
    pub source: Option<Range<usize>>,
}

/// A string derived from a source string by dropping and inserting pieces,
/// together with offset maps in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElidedText {
    pub text: String,
    pieces: Vec<Piece>,
    source_len: usize,
}

impl ElidedText {
    /// The source string, unchanged.
    pub fn identity(source: &str) -> Self {
        let mut out = Self::empty(source.len());
        out.push_source(source, 0..source.len());
        out
    }

    /// Nothing of a source of `source_len` bytes survives.
    pub fn empty(source_len: usize) -> Self {
        Self {
            text: String::new(),
            pieces: Vec::new(),
            source_len,
        }
    }

    /// Keep `source[0..end]`.
    pub fn prefix(source: &str, end: usize) -> Self {
        Self::slice(source, 0..end)
    }

    /// Keep only `source[range]`.
    pub fn slice(source: &str, range: Range<usize>) -> Self {
        let mut out = Self::empty(source.len());
        out.push_source(source, range);
        out
    }

    /// Only `inserted`, with nothing of the source kept.
    pub fn inserted(source_len: usize, inserted: &str) -> Self {
        let mut out = Self::empty(source_len);
        out.push_inserted(inserted);
        out
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// `true` unless this is the identity over the whole source.
    pub fn is_elided(&self) -> bool {
        !matches!(self.pieces.as_slice(), [Piece { source: Some(s), .. }] if *s == (0..self.source_len))
            && !(self.source_len == 0 && self.pieces.is_empty())
    }

    pub fn push_source(&mut self, source: &str, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(&source[range.clone()]);
        if let Some(Piece {
            layout,
            source: Some(last),
        }) = self.pieces.last_mut()
        {
            if last.end == range.start && layout.end == start {
                last.end = range.end;
                layout.end = self.text.len();
                return;
            }
        }
        self.pieces.push(Piece {
            layout: start..self.text.len(),
            source: Some(range),
        });
    }

    pub fn push_inserted(&mut self, inserted: &str) {
        if inserted.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(inserted);
        self.pieces.push(Piece {
            layout: start..self.text.len(),
            source: None,
        });
    }

    /// Append `other`, whose source starts at `source_offset` in this
    /// text's source.
    pub fn append(&mut self, other: &ElidedText, source_offset: usize) {
        let shift = self.text.len();
        self.text.push_str(&other.text);
        for piece in &other.pieces {
            self.pieces.push(Piece {
                layout: piece.layout.start + shift..piece.layout.end + shift,
                source: piece
                    .source
                    .as_ref()
                    .map(|s| s.start + source_offset..s.end + source_offset),
            });
        }
    }

    /// Derived-string offset for source offset `src`.
    ///
    /// Dropped source offsets map to the end of the last kept piece before
    /// them.
    pub fn to_layout(&self, src: usize) -> usize {
        if src >= self.source_len {
            return self.text.len();
        }
        for piece in &self.pieces {
            if let Some(source) = &piece.source {
                if source.contains(&src) {
                    return piece.layout.start + (src - source.start);
                }
            }
        }
        self.pieces
            .iter()
            .filter(|piece| piece.source.as_ref().is_some_and(|s| s.end <= src))
            .map(|piece| piece.layout.end)
            .last()
            .unwrap_or(0)
    }

    /// Source offset for derived-string offset `layout`.
    ///
    /// Offsets inside inserted text map to the edge of the neighboring kept
    /// source: backward at its start, forward inside it.
    pub fn to_source(&self, layout: usize) -> usize {
        if layout >= self.text.len() {
            return self.source_len;
        }
        let Some(index) = self
            .pieces
            .iter()
            .position(|piece| piece.layout.contains(&layout))
        else {
            return self.source_len;
        };
        let piece = &self.pieces[index];
        match &piece.source {
            Some(source) => source.start + (layout - piece.layout.start),
            None if layout == piece.layout.start => self.pieces[..index]
                .iter()
                .rev()
                .find_map(|p| p.source.as_ref().map(|s| s.end))
                .unwrap_or(0),
            None => self.pieces[index + 1..]
                .iter()
                .find_map(|p| p.source.as_ref().map(|s| s.start))
                .unwrap_or(self.source_len),
        }
    }

    /// `true` if source offset `src` is strictly inside dropped text.
    pub fn is_hidden(&self, src: usize) -> bool {
        if src == 0 || src >= self.source_len {
            return false;
        }
        !self.pieces.iter().any(|piece| {
            piece
                .source
                .as_ref()
                .is_some_and(|s| s.start <= src && src <= s.end)
        })
    }

    /// Chain `self` (A to B) with `inner` (B to C) into one A to C map.
    pub fn compose(&self, inner: &ElidedText) -> ElidedText {
        let mut out = ElidedText::empty(self.source_len);
        out.text = inner.text.clone();
        for piece in &inner.pieces {
            let Some(mid) = &piece.source else {
                out.pieces.push(piece.clone());
                continue;
            };
            for outer in &self.pieces {
                let start = mid.start.max(outer.layout.start);
                let end = mid.end.min(outer.layout.end);
                if start >= end {
                    continue;
                }
                let layout_start = piece.layout.start + (start - mid.start);
                let layout = layout_start..layout_start + (end - start);
                let source = outer.source.as_ref().map(|s| {
                    let from = s.start + (start - outer.layout.start);
                    from..from + (end - start)
                });
                out.pieces.push(Piece { layout, source });
            }
        }
        out
    }
}

/// Produces the shortened form of a string given a width measure.
///
/// The measure sees every candidate as an `ElidedText` over the text passed to
/// `elide`, so it can carry per-offset styling onto the candidate.
pub struct Elider<'a> {
    measure: &'a mut dyn FnMut(&ElidedText) -> f32,
    paragraph_rtl: bool,
}

impl<'a> Elider<'a> {
    pub fn new(measure: &'a mut dyn FnMut(&ElidedText) -> f32, paragraph_rtl: bool) -> Self {
        Self {
            measure,
            paragraph_rtl,
        }
    }

    /// Shorten `text` to fit `available` pixels.
    ///
    /// `text_width` is the known width of `text`; pass 0 to have it
    /// measured. Text that already fits comes back unchanged.
    pub fn elide(
        &mut self,
        text: &str,
        text_width: f32,
        available: f32,
        behavior: ElideBehavior,
    ) -> ElidedText {
        self.elide_within(&ElidedText::identity(text), text_width, available, behavior)
    }

    /// Width of `derived`, a string derived from `base.text`.
    fn measure(&mut self, base: &ElidedText, derived: &ElidedText) -> f32 {
        (self.measure)(&base.compose(derived))
    }

    /// Elide `base.text`; the result maps from `base.text`, not from the
    /// source of `base`.
    fn elide_within(
        &mut self,
        base: &ElidedText,
        text_width: f32,
        available: f32,
        behavior: ElideBehavior,
    ) -> ElidedText {
        let text = base.text.as_str();
        if available <= 0.0 || text.is_empty() {
            return ElidedText::empty(text.len());
        }
        if behavior == ElideBehavior::ElideEmail {
            return self.elide_email(base, available);
        }

        let text_width = if text_width > 0.0 {
            text_width
        } else {
            self.measure(base, &ElidedText::identity(text))
        };
        if text_width > 0.0 && text_width <= available {
            return ElidedText::identity(text);
        }
        if text_width <= 0.0 {
            // Unmeasurable text; halve it until something can be measured.
            let first = next_grapheme_boundary(text, 0).unwrap_or(text.len());
            if first >= text.len() {
                return ElidedText::identity(text);
            }
            let half = round_down_to_grapheme(text, text.len() / 2).max(first);
            let head = ElidedText::prefix(text, half);
            let inner = self.elide_within(&base.compose(&head), 0.0, available, behavior);
            return head.compose(&inner);
        }

        let insert_ellipsis = behavior != ElideBehavior::Truncate;
        if insert_ellipsis
            && self.measure(base, &ElidedText::inserted(text.len(), &ELLIPSIS.to_string())) > available
        {
            return ElidedText::empty(text.len());
        }

        let slicer = StringSlicer {
            text,
            elide_in_middle: behavior == ElideBehavior::ElideMiddle,
            elide_at_beginning: behavior == ElideBehavior::ElideHead,
        };
        let mut best = self.candidate(&slicer, 0, behavior, insert_ellipsis);
        let mut lo = 0usize;
        let mut hi = text.len().saturating_sub(1);
        while lo <= hi {
            let guess = lo + (hi - lo) / 2;
            let candidate = self.candidate(&slicer, guess, behavior, insert_ellipsis);
            let width = self.measure(base, &candidate);
            tracing::trace!(guess, width, available, "elision candidate");
            if width > available {
                if guess == 0 {
                    break;
                }
                hi = guess - 1;
            } else {
                best = candidate;
                if width == available {
                    break;
                }
                lo = guess + 1;
            }
        }
        best
    }

    fn candidate(
        &self,
        slicer: &StringSlicer<'_>,
        length: usize,
        behavior: ElideBehavior,
        insert_ellipsis: bool,
    ) -> ElidedText {
        if behavior != ElideBehavior::ElideTail {
            return slicer.cut(length, insert_ellipsis);
        }
        let mut out = slicer.cut(length, false);
        out.push_inserted(&ELLIPSIS.to_string());
        // Keep the ellipsis on the side of the kept text when its direction
        // differs from the paragraph.
        if let Some(kept_rtl) = last_strong_direction(slicer.kept_head(&out)) {
            if kept_rtl != self.paragraph_rtl {
                let mark = if self.paragraph_rtl { RLM } else { LRM };
                out.push_inserted(&mark.to_string());
            }
        }
        out
    }

    /// Elide `user@domain` so the domain is shortened in the middle first,
    /// then the username at its tail.
    fn elide_email(&mut self, base: &ElidedText, available: f32) -> ElidedText {
        let text = base.text.as_str();
        let Some(at) = text.rfind('@').filter(|&at| at != 0 && at + 1 < text.len()) else {
            return self.elide_within(base, 0.0, available, ElideBehavior::ElideTail);
        };
        let full_width = self.measure(base, &ElidedText::identity(text));
        if full_width > 0.0 && full_width <= available {
            return ElidedText::identity(text);
        }

        let username = ElidedText::slice(text, 0..at);
        let domain = ElidedText::slice(text, at + 1..text.len());
        let username_base = base.compose(&username);
        let domain_base = base.compose(&domain);
        let mut available = available - self.measure(base, &ElidedText::slice(text, at..at + 1));

        let full_username_width = self.measure(base, &username);
        let first = next_grapheme_boundary(&username.text, 0).unwrap_or(at);
        let mut shortest_username = ElidedText::slice(text, 0..first);
        shortest_username.push_inserted(&ELLIPSIS.to_string());
        let min_username_width = self.measure(base, &shortest_username);
        let available_domain_width = available - full_username_width.min(min_username_width);

        let mut elided_domain = ElidedText::identity(&domain.text);
        if self.measure(base, &domain) > available_domain_width {
            let desired = available_domain_width
                .min((available - full_username_width).max(available / 2.0));
            elided_domain =
                self.elide_within(&domain_base, 0.0, desired, ElideBehavior::ElideMiddle);
            if elided_domain.text.chars().count() <= 1 {
                return ElidedText::inserted(text.len(), &ELLIPSIS.to_string());
            }
        }
        available -= self.measure(&domain_base, &elided_domain);
        let elided_username =
            self.elide_within(&username_base, 0.0, available, ElideBehavior::ElideTail);

        let mut out = ElidedText::empty(text.len());
        out.append(&elided_username, 0);
        out.push_source(text, at..at + 1);
        out.append(&elided_domain, at + 1);
        out
    }
}

/// Cuts a string down to roughly `length` bytes at grapheme boundaries.
struct StringSlicer<'a> {
    text: &'a str,
    elide_in_middle: bool,
    elide_at_beginning: bool,
}

impl StringSlicer<'_> {
    fn cut(&self, length: usize, insert_ellipsis: bool) -> ElidedText {
        let text = self.text;
        let ellipsis = if insert_ellipsis {
            ELLIPSIS.to_string()
        } else {
            String::new()
        };
        let length = length.min(text.len());
        let mut out = ElidedText::empty(text.len());
        if self.elide_at_beginning {
            let start = round_up_to_grapheme(text, text.len() - length);
            out.push_inserted(&ellipsis);
            out.push_source(text, start..text.len());
        } else if self.elide_in_middle {
            let half = length / 2;
            let prefix_end = round_down_to_grapheme(text, length - half);
            let suffix_start = round_up_to_grapheme(text, text.len() - half).max(prefix_end);
            out.push_source(text, 0..prefix_end);
            out.push_inserted(&ellipsis);
            out.push_source(text, suffix_start..text.len());
        } else {
            let end = round_down_to_grapheme(text, length);
            out.push_source(text, 0..end);
            out.push_inserted(&ellipsis);
        }
        out
    }

    /// The kept source prefix of a tail cut.
    fn kept_head<'t>(&'t self, cut: &ElidedText) -> &'t str {
        let end = cut
            .pieces()
            .first()
            .and_then(|piece| piece.source.as_ref())
            .map_or(0, |source| source.end);
        &self.text[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_width(text: &str) -> f32 {
        text.chars()
            .map(|c| if c == LRM || c == RLM { 0.0 } else { 10.0 })
            .sum()
    }

    fn elide(text: &str, available: f32, behavior: ElideBehavior) -> ElidedText {
        let mut measure = |candidate: &ElidedText| char_width(&candidate.text);
        Elider::new(&mut measure, false).elide(text, 0.0, available, behavior)
    }

    #[test]
    fn fitting_text_is_untouched() {
        let out = elide("hello", 50.0, ElideBehavior::ElideTail);
        assert_eq!(out.text, "hello");
        assert!(!out.is_elided());
    }

    #[test]
    fn tail_head_and_middle() {
        assert_eq!(elide("abcdefgh", 40.0, ElideBehavior::ElideTail).text, "abc\u{2026}");
        assert_eq!(elide("abcdefgh", 40.0, ElideBehavior::ElideHead).text, "\u{2026}fgh");
        assert_eq!(elide("abcdefgh", 50.0, ElideBehavior::ElideMiddle).text, "ab\u{2026}gh");
        assert_eq!(elide("abcdefgh", 40.0, ElideBehavior::Truncate).text, "abcd");
    }

    #[test]
    fn too_narrow_for_an_ellipsis_is_empty() {
        assert_eq!(elide("abc", 5.0, ElideBehavior::ElideTail).text, "");
        assert_eq!(elide("abc", 0.0, ElideBehavior::ElideTail).text, "");
    }

    #[test]
    fn eliding_twice_changes_nothing() {
        let once = elide("abcdefgh", 45.0, ElideBehavior::ElideMiddle);
        let twice = elide(&once.text, 45.0, ElideBehavior::ElideMiddle);
        assert_eq!(once.text, twice.text);
        assert!(char_width(&once.text) <= 45.0);
    }

    #[test]
    fn rtl_tail_in_ltr_paragraph_gets_a_mark() {
        let out = elide("\u{5d0}\u{5d1}\u{5d2}\u{5d3}", 30.0, ElideBehavior::ElideTail);
        assert_eq!(out.text, "\u{5d0}\u{5d1}\u{2026}\u{200E}");
    }

    #[test]
    fn email_elides_domain_then_username() {
        let out = elide("test@example.com", 120.0, ElideBehavior::ElideEmail);
        assert!(char_width(&out.text) <= 120.0);
        assert!(out.text.contains('@'));
        assert!(out.text.starts_with("test@"));

        let tiny = elide("test@example.com", 25.0, ElideBehavior::ElideEmail);
        assert_eq!(tiny.text, "\u{2026}");
    }

    #[test]
    fn offsets_map_through_the_ellipsis() {
        let out = elide("abcdefgh", 40.0, ElideBehavior::ElideTail);
        assert_eq!(out.to_layout(1), 1);
        assert_eq!(out.to_layout(5), 3);
        assert_eq!(out.to_layout(8), out.text.len());
        assert_eq!(out.to_source(3), 3);
        assert_eq!(out.to_source(4), 8);
        assert!(out.is_hidden(5));
        assert!(!out.is_hidden(3));

        let head = elide("abcdefgh", 40.0, ElideBehavior::ElideHead);
        assert_eq!(head.to_source(0), 0);
        assert_eq!(head.to_layout(5), 3);
        assert!(head.is_hidden(2));
    }

    #[test]
    fn composed_maps_chain() {
        let outer = ElidedText::prefix("abcdef", 4);
        let mut inner = ElidedText::empty(4);
        inner.push_source("abcd", 1..3);
        inner.push_inserted("*");
        let both = outer.compose(&inner);
        assert_eq!(both.text, "bc*");
        assert_eq!(both.to_layout(2), 1);
        assert_eq!(both.to_source(1), 2);
        assert!(both.is_hidden(4));
    }
}
