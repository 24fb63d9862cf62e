use std::sync::Arc;

use swash::{FontRef, Metrics};

use crate::error::{FontError, Result};
use crate::font::{FontMetrics, ScaledFontMetrics};

/// A parsed font face that owns its file data.
///
/// Metrics are read once through swash; the raw bytes stay available for
/// handing to harfrust at shaping time.
#[derive(Debug, Clone)]
pub struct FontFace {
    data: Arc<[u8]>,
    index: u32,
    /// Globally unique id assigned by swash, used as the face identity in
    /// process-wide caches.
    key: swash::CacheKey,
    metrics: FontMetrics,
}

impl FontFace {
    /// Parse face `index` of a font file or collection.
    pub fn from_bytes(data: Arc<[u8]>, index: usize) -> Result<Self> {
        let font = FontRef::from_index(&data, index).ok_or(FontError::InvalidFont)?;
        let metrics = Self::read_metrics(&font);
        let key = font.key;
        Ok(Self {
            data,
            index: index as u32,
            key,
            metrics,
        })
    }

    pub fn from_vec(data: Vec<u8>, index: usize) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>, index: usize) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn cache_key(&self) -> u64 {
        self.key.value()
    }

    fn read_metrics(font: &FontRef<'_>) -> FontMetrics {
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            cap_height,
            x_height,
            average_width,
            ..
        } = font.metrics(&[]);

        FontMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
            cap_height: (cap_height > 0.0).then_some(cap_height),
            x_height: (x_height > 0.0).then_some(x_height),
            average_width: (average_width > 0.0).then_some(average_width),
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Font metrics at `font_size` pixels per em.
    pub fn scaled_metrics(&self, font_size: f32) -> ScaledFontMetrics {
        self.metrics.scale_to_pixels(font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = FontFace::from_vec(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, FontError::InvalidFont));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = FontFace::from_path("/definitely/not/a/font.ttf", 0).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }
}
