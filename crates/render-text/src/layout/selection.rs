use crate::range::TextRange;

/// Which neighboring character a caret position is attached to.
///
/// At a boundary between runs of opposite direction one logical position has
/// two visual positions; the affinity picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorAffinity {
    /// Attached to the preceding character.
    Backward,
    /// Attached to the following character.
    #[default]
    Forward,
}

impl CursorAffinity {
    pub fn opposite(self) -> Self {
        match self {
            CursorAffinity::Backward => CursorAffinity::Forward,
            CursorAffinity::Forward => CursorAffinity::Backward,
        }
    }
}

/// A selection in logical text space plus caret affinity.
///
/// The caret is `selection.end()`; a reversed selection was extended
/// backward from its anchor at `selection.start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionModel {
    selection: TextRange,
    affinity: CursorAffinity,
}

impl SelectionModel {
    /// An empty selection (a caret) at `pos`.
    pub fn new(pos: usize, affinity: CursorAffinity) -> Self {
        Self {
            selection: TextRange::collapsed(pos),
            affinity,
        }
    }

    pub fn with_range(selection: TextRange, affinity: CursorAffinity) -> Self {
        Self {
            selection,
            affinity,
        }
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    pub fn caret_pos(&self) -> usize {
        self.selection.end()
    }

    pub fn caret_affinity(&self) -> CursorAffinity {
        self.affinity
    }

    /// Move the anchor, keeping caret and affinity.
    pub fn set_selection_start(&mut self, start: usize) {
        self.selection.set_start(start);
    }
}
