use core::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Classification of a word-level segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    /// Letters, digits and connector punctuation.
    Word,
    Whitespace,
    /// Any other character; each one is its own segment.
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSegment {
    pub range: Range<usize>,
    pub class: WordClass,
}

/// Word segmentation of one string, answering boundary queries by offset.
///
/// Segments start from UAX-29 word bounds, which are then split wherever the
/// class changes, so `a.b` yields `a`, `.` and `b` even though UAX-29 keeps
/// it together. Adjacent whitespace or punctuation merges into one run.
#[derive(Debug, Clone)]
pub struct WordIterator {
    segments: Vec<WordSegment>,
    len: usize,
}

impl WordIterator {
    pub fn new(text: &str) -> Self {
        let mut segments: Vec<WordSegment> = Vec::new();
        for (offset, bound) in text.split_word_bound_indices() {
            for (index, (start, grapheme)) in bound.grapheme_indices(true).enumerate() {
                let start = offset + start;
                let end = start + grapheme.len();
                let class = classify(grapheme);
                // Word segments never span a UAX-29 bound.
                let joinable = index > 0 || class != WordClass::Word;
                match segments.last_mut() {
                    Some(segment) if joinable && segment.class == class => segment.range.end = end,
                    _ => segments.push(WordSegment {
                        range: start..end,
                        class,
                    }),
                }
            }
        }
        Self {
            segments,
            len: text.len(),
        }
    }

    pub fn segments(&self) -> &[WordSegment] {
        &self.segments
    }

    /// `true` if a word segment begins at `pos`.
    pub fn is_start_of_word(&self, pos: usize) -> bool {
        self.segments
            .iter()
            .any(|s| s.class == WordClass::Word && s.range.start == pos)
    }

    /// `true` if a word segment ends at `pos`.
    pub fn is_end_of_word(&self, pos: usize) -> bool {
        self.segments
            .iter()
            .any(|s| s.class == WordClass::Word && s.range.end == pos)
    }

    /// `true` if `pos` lies on an edge of any word, whitespace or
    /// punctuation run.
    pub fn is_boundary(&self, pos: usize) -> bool {
        pos == 0
            || pos == self.len
            || self.segments.iter().any(|s| s.range.start == pos)
    }
}

fn classify(grapheme: &str) -> WordClass {
    match grapheme.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => WordClass::Word,
        Some(c) if c.is_whitespace() => WordClass::Whitespace,
        _ => WordClass::Punctuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(text: &str) -> Vec<&str> {
        WordIterator::new(text)
            .segments()
            .iter()
            .map(|s| &text[s.range.clone()])
            .collect()
    }

    #[test]
    fn splits_on_class_changes_inside_uax29_words() {
        assert_eq!(
            pieces(" foo  a.bc.d bar"),
            vec![" ", "foo", "  ", "a", ".", "bc", ".", "d", " ", "bar"]
        );
    }

    #[test]
    fn punctuation_and_whitespace_runs_stay_whole() {
        assert_eq!(pieces("hi!!"), vec!["hi", "!!"]);
        assert_eq!(pieces("a.. b"), vec!["a", "..", " ", "b"]);
        assert_eq!(pieces("x !? y"), vec!["x", " ", "!?", " ", "y"]);
    }

    #[test]
    fn boundaries_include_every_run_edge() {
        let words = WordIterator::new("a.. b");
        let edges: Vec<usize> = (0..=5).filter(|&pos| words.is_boundary(pos)).collect();
        assert_eq!(edges, vec![0, 1, 3, 4, 5]);
        assert!(!words.is_start_of_word(1));
    }

    #[test]
    fn word_edges() {
        let words = WordIterator::new("ab cd");
        assert!(words.is_start_of_word(0));
        assert!(words.is_end_of_word(2));
        assert!(!words.is_start_of_word(2));
        assert!(words.is_start_of_word(3));
        assert!(words.is_end_of_word(5));
        assert!(!words.is_start_of_word(1));
    }

    #[test]
    fn combining_marks_stay_in_words() {
        assert_eq!(pieces("cafe\u{301} ok"), vec!["cafe\u{301}", " ", "ok"]);
    }
}
