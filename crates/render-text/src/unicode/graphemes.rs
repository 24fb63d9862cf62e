use core::ops::Range;

use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// An extended grapheme cluster as a byte range of its string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeCluster {
    pub range: Range<usize>,
}

pub fn grapheme_clusters(text: &str) -> Vec<GraphemeCluster> {
    text.grapheme_indices(true)
        .map(|(start, g)| GraphemeCluster {
            range: start..start + g.len(),
        })
        .collect()
}

/// `true` if `offset` sits between two grapheme clusters.
///
/// Both ends of the string are boundaries; offsets past the end or inside a
/// UTF-8 sequence are not.
pub fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    if offset == 0 || offset == text.len() {
        return true;
    }
    if offset > text.len() || !text.is_char_boundary(offset) {
        return false;
    }
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    cursor.is_boundary(text, 0).unwrap_or(false)
}

/// Start of the cluster before `offset`, or `None` at the start of text.
///
/// An offset inside a cluster yields that cluster's start.
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = offset.min(text.len());
    let floored = floor_char_boundary(text, offset);
    if floored < offset {
        return Some(round_down_to_grapheme(text, floored));
    }
    if offset == 0 {
        return None;
    }
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    cursor.prev_boundary(text, 0).ok().flatten()
}

/// End of the cluster after `offset`, or `None` at the end of text.
///
/// An offset inside a cluster yields that cluster's end.
pub fn next_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    if offset >= text.len() {
        return None;
    }
    let offset = floor_char_boundary(text, offset);
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    cursor.next_boundary(text, 0).ok().flatten()
}

/// `offset` if it is a grapheme boundary, else the start of its cluster.
pub fn round_down_to_grapheme(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    if is_grapheme_boundary(text, offset) {
        offset
    } else {
        prev_grapheme_boundary(text, offset).unwrap_or(0)
    }
}

/// `offset` if it is a grapheme boundary, else the end of its cluster.
pub fn round_up_to_grapheme(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    if is_grapheme_boundary(text, offset) {
        offset
    } else {
        next_grapheme_boundary(text, offset).unwrap_or(text.len())
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_clusters() {
        let clusters = grapheme_clusters("abc");
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[1].range, 1..2);
    }

    #[test]
    fn combining_mark_stays_with_base() {
        let text = "a\u{0301}b";
        assert!(!is_grapheme_boundary(text, 1));
        assert!(is_grapheme_boundary(text, 3));
        assert_eq!(prev_grapheme_boundary(text, 3), Some(0));
        assert_eq!(next_grapheme_boundary(text, 0), Some(3));
        assert_eq!(next_grapheme_boundary(text, 1), Some(3));
        assert_eq!(round_down_to_grapheme(text, 2), 0);
        assert_eq!(round_up_to_grapheme(text, 2), 3);
    }

    #[test]
    fn offsets_inside_utf8_sequences_are_not_boundaries() {
        let text = "\u{5d0}\u{5d1}";
        assert!(!is_grapheme_boundary(text, 1));
        assert!(is_grapheme_boundary(text, 2));
        assert_eq!(prev_grapheme_boundary(text, 3), Some(2));
        assert_eq!(next_grapheme_boundary(text, 1), Some(2));
    }

    #[test]
    fn emoji_zwj_sequence_is_single_cluster() {
        let text = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let clusters = grapheme_clusters(text);
        assert_eq!(clusters.len(), 1);
        assert_eq!(next_grapheme_boundary(text, 0), Some(text.len()));
        assert_eq!(prev_grapheme_boundary(text, text.len()), Some(0));
    }

    #[test]
    fn edges_have_no_neighbors() {
        assert_eq!(prev_grapheme_boundary("ab", 0), None);
        assert_eq!(next_grapheme_boundary("ab", 2), None);
        assert_eq!(next_grapheme_boundary("", 0), None);
    }
}
