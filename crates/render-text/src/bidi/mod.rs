//! Bidirectional text support built on `unicode-bidi`.

pub mod levels;
pub mod reorder;

pub use levels::{BidiLevels, first_strong_direction, last_strong_direction, resolve_levels};
pub use reorder::{invert_permutation, visual_to_logical};
