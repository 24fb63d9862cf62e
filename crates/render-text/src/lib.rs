//! render-text: bidi-aware text layout, cursor geometry and elision.
//!
//! The crate turns a logical string plus ranged style attributes into shaped,
//! line-broken, drawable text:
//! - `range` / `break_list`: index ranges and run-length style maps
//! - `unicode` / `bidi`: graphemes, words, scripts and UAX-9 levels
//! - `shaping`: the `Shaper` collaborator and its harfrust implementation
//! - `layout`: text runs, itemization, line breaking, elision, selection model
//! - `render_text`: the `RenderText` facade tying all of the above together
//! - `render`: the `Renderer` drawing collaborator
//! - `testing`: a deterministic shaper and recorder for tests

pub mod bidi;
pub mod break_list;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod range;
pub mod render;
pub mod render_text;
pub mod shaping;
pub mod style;
pub mod testing;
pub mod unicode;

pub use break_list::BreakList;
pub use error::{FontError, Result};
pub use font::{FontFace, FontList, FontMetrics, FontRegistry, ScaledFontMetrics};
pub use geometry::{Point, RangeF, Rect, Size};
pub use layout::{
    CursorAffinity, ElideBehavior, Line, LineSegment, RunList, SelectionModel, TextRun,
    WordWrapBehavior,
};
pub use range::TextRange;
pub use render::{FadeEffect, PositionedGlyph, Renderer};
pub use render_text::{
    BreakType, DecoratedText, DirectionalityMode, HorizontalAlignment, LayoutValidity,
    RangedAttribute, RenderText, SelectionBehavior, ShapedLayout, TextDirection,
    TextLayoutBackend, VisualCursorDirection,
};
pub use shaping::{FontMetricsProvider, HarfrustShaper, ShapeRequest, ShapedGlyphs, Shaper};
pub use style::{BaselineStyle, Color, Shadow, TextStyle, Weight};
