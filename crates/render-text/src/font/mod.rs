pub mod face;
pub mod list;
pub mod metrics;
pub mod registry;

pub use face::FontFace;
pub use list::FontList;
pub use metrics::{FontMetrics, ScaledFontMetrics};
pub use registry::FontRegistry;
