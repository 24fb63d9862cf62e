use unicode_bidi::{BidiInfo, LTR_LEVEL, Level, RTL_LEVEL};

/// Resolved embedding levels for one layout text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiLevels {
    /// One level per byte; every byte of a character shares its level.
    pub levels: Vec<u8>,
    pub paragraph_rtl: bool,
}

impl BidiLevels {
    /// Everything at the paragraph level.
    pub fn uniform(len: usize, paragraph_rtl: bool) -> Self {
        Self {
            levels: vec![u8::from(paragraph_rtl); len],
            paragraph_rtl,
        }
    }

    pub fn level_at(&self, index: usize) -> u8 {
        self.levels
            .get(index)
            .copied()
            .unwrap_or(u8::from(self.paragraph_rtl))
    }
}

/// Run UAX-9 over `text` with an explicit paragraph direction.
///
/// Every paragraph of the text uses the same base level so that runs from
/// different paragraphs stay comparable. When the analysis does not produce
/// one level per byte the whole text falls back to a single run at the
/// paragraph level.
pub fn resolve_levels(text: &str, paragraph_rtl: bool) -> BidiLevels {
    if text.is_empty() {
        return BidiLevels::uniform(0, paragraph_rtl);
    }
    let base = if paragraph_rtl { RTL_LEVEL } else { LTR_LEVEL };
    let info = BidiInfo::new(text, Some(base));
    if info.levels.len() != text.len() {
        tracing::warn!(
            len = text.len(),
            levels = info.levels.len(),
            "bidi analysis failed, falling back to a single run"
        );
        return BidiLevels::uniform(text.len(), false);
    }
    BidiLevels {
        levels: info.levels.iter().map(Level::number).collect(),
        paragraph_rtl,
    }
}

/// Direction of the first strong character, if any.
pub fn first_strong_direction(text: &str) -> Option<bool> {
    let info = BidiInfo::new(text, None);
    let paragraph = info.paragraphs.first()?;
    let has_strong = text.chars().any(|c| {
        matches!(
            unicode_bidi::bidi_class(c),
            unicode_bidi::BidiClass::L | unicode_bidi::BidiClass::R | unicode_bidi::BidiClass::AL
        )
    });
    has_strong.then(|| paragraph.level.is_rtl())
}

/// Direction of the last strong character, if any.
pub fn last_strong_direction(text: &str) -> Option<bool> {
    text.chars().rev().find_map(|c| match unicode_bidi::bidi_class(c) {
        unicode_bidi::BidiClass::L => Some(false),
        unicode_bidi::BidiClass::R | unicode_bidi::BidiClass::AL => Some(true),
        _ => None,
    })
}
