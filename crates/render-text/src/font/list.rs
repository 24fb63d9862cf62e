use crate::style::Weight;

pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// An ordered family list plus the size and style to request from it.
///
/// This is the font request handed to the shaper; which concrete face ends
/// up satisfying it is the shaper's business.
#[derive(Debug, Clone, PartialEq)]
pub struct FontList {
    pub families: Vec<String>,
    /// Size in pixels per em.
    pub size: f32,
    pub weight: Weight,
    pub italic: bool,
}

impl FontList {
    pub fn new<I, S>(families: I, size: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
            size,
            weight: Weight::NORMAL,
            italic: false,
        }
    }

    /// Same families with a different size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// Same families and size with a different weight and slant.
    pub fn derive(&self, weight: Weight, italic: bool) -> Self {
        Self {
            weight,
            italic,
            ..self.clone()
        }
    }
}

impl Default for FontList {
    fn default() -> Self {
        Self::new(["sans-serif"], DEFAULT_FONT_SIZE)
    }
}
