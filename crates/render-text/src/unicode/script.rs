use core::ops::Range;

use unicode_script::{Script, ScriptExtension, UnicodeScript};

/// A maximal byte range whose characters share at least one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub range: Range<usize>,
    /// The resolved script, `Common` when only neutral characters are present.
    pub script: Script,
}

/// Split `text` into script runs.
///
/// Each run keeps the running intersection of its characters' script
/// extension sets. Common and inherited characters intersect as "any
/// script", so punctuation and combining marks join their neighbors. A run
/// ends at the first character that would make the intersection empty.
pub fn script_runs(text: &str) -> Vec<ScriptRun> {
    let mut runs = Vec::new();
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return runs;
    };

    let mut start = 0;
    let mut candidates = first.script_extension();
    for (index, c) in chars {
        let next = candidates.intersection(c.script_extension());
        if next.is_empty() {
            runs.push(ScriptRun {
                range: start..index,
                script: resolve(candidates),
            });
            start = index;
            candidates = c.script_extension();
        } else {
            candidates = next;
        }
    }
    runs.push(ScriptRun {
        range: start..text.len(),
        script: resolve(candidates),
    });
    runs
}

fn resolve(candidates: ScriptExtension) -> Script {
    if candidates.is_common() || candidates.is_inherited() {
        return Script::Common;
    }
    candidates.iter().next().unwrap_or(Script::Common)
}

/// Blocks whose characters are commonly served by a dedicated fallback font
/// (symbol and emoji fonts).
fn unusual_block(c: char) -> Option<u8> {
    match c as u32 {
        0x25A0..=0x25FF => Some(0), // Geometric Shapes
        0x2600..=0x26FF => Some(1), // Miscellaneous Symbols
        0x2700..=0x27BF => Some(2), // Dingbats
        0x1F300..=0x1F5FF => Some(3), // Miscellaneous Symbols and Pictographs
        0x1F600..=0x1F64F => Some(4), // Emoticons
        0x1F680..=0x1F6FF => Some(5), // Transport and Map Symbols
        0x1F900..=0x1F9FF => Some(6), // Supplemental Symbols and Pictographs
        _ => None,
    }
}

/// `true` when a run must break between `prev` and `next` so one fallback
/// font is not asked to cover an unusual block together with other text.
pub fn is_unusual_block_change(prev: char, next: char) -> bool {
    let (a, b) = (unusual_block(prev), unusual_block(next));
    (a.is_some() || b.is_some()) && a != b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_and_hebrew_split() {
        let runs = script_runs("abc \u{5d0}\u{5d1}");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].range, 0..4);
        assert_eq!(runs[0].script, Script::Latin);
        assert_eq!(runs[1].range, 4..8);
        assert_eq!(runs[1].script, Script::Hebrew);
    }

    #[test]
    fn neutral_prefix_joins_following_script() {
        let runs = script_runs("123 abc");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].script, Script::Latin);
    }

    #[test]
    fn all_neutral_text_is_common() {
        let runs = script_runs("1, 2.");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].script, Script::Common);
    }

    #[test]
    fn empty_text_has_no_runs() {
        assert!(script_runs("").is_empty());
    }

    #[test]
    fn emoji_next_to_text_breaks_block() {
        assert!(is_unusual_block_change('a', '\u{1F600}'));
        assert!(is_unusual_block_change('\u{2600}', '\u{1F600}'));
        assert!(!is_unusual_block_change('\u{1F600}', '\u{1F601}'));
        assert!(!is_unusual_block_change('a', 'b'));
    }
}
