//! Unicode segmentation helpers over UTF-8 byte offsets.

pub mod graphemes;
pub mod script;
pub mod words;

pub use graphemes::{
    GraphemeCluster, grapheme_clusters, is_grapheme_boundary, next_grapheme_boundary,
    prev_grapheme_boundary, round_down_to_grapheme, round_up_to_grapheme,
};
pub use script::{ScriptRun, is_unusual_block_change, script_runs};
pub use words::{WordClass, WordIterator, WordSegment};

/// Left-to-right mark.
pub const LRM: char = '\u{200E}';
/// Right-to-left mark.
pub const RLM: char = '\u{200F}';
/// Horizontal ellipsis used for truncation and elision.
pub const ELLIPSIS: char = '\u{2026}';

/// `true` for characters that force a line break.
pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// `true` for invisible format characters that shape to nothing.
pub fn is_default_ignorable(c: char) -> bool {
    matches!(
        c,
        '\u{AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}
