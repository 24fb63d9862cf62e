//! Runs, lines, elision and the selection model.

pub mod elide;
pub mod itemize;
pub mod line;
pub mod line_breaker;
pub mod selection;
pub mod text_run;

pub use elide::{ElideBehavior, ElidedText, Elider, Piece};
pub use itemize::{ItemizeInput, RunList, itemize};
pub use line::{Line, LineSegment};
pub use line_breaker::{LineBreaker, WordWrapBehavior, word_break_list};
pub use selection::{CursorAffinity, SelectionModel};
pub use text_run::TextRun;
