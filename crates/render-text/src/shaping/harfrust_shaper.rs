use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use harfrust::{
    Direction as HbDirection, FontRef as HbFontRef, Script as HbScript, ShaperData,
    ShaperInstance, Tag as HbTag, UnicodeBuffer as HbUnicodeBuffer,
};
use hashbrown::HashMap;
use unicode_script::Script;

use crate::font::{FontFace, FontList, FontRegistry, ScaledFontMetrics};

use super::{FontMetricsProvider, GlyphOffset, ShapeRequest, ShapedGlyphs, Shaper};

/// Process-wide harfrust binding cache, keyed by face identity.
///
/// Building `ShaperData` parses the face's layout tables, so it is done once
/// per face and shared by every layout in the process. Entries live until
/// process exit.
static SHAPER_DATA: OnceLock<Mutex<HashMap<u64, Arc<ShaperData>>>> = OnceLock::new();

fn shaper_data_for(face: &FontFace, font_ref: &HbFontRef<'_>) -> Arc<ShaperData> {
    let cache = SHAPER_DATA.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = cache.lock().unwrap_or_else(PoisonError::into_inner);
    map.entry(face.cache_key())
        .or_insert_with(|| Arc::new(ShaperData::new(font_ref)))
        .clone()
}

/// `Shaper` backed by harfrust, resolving fonts through a `FontRegistry`.
#[derive(Debug)]
pub struct HarfrustShaper {
    fonts: FontRegistry,
}

impl HarfrustShaper {
    pub fn new(fonts: FontRegistry) -> Self {
        Self { fonts }
    }

    /// A shaper over the fonts installed on this system.
    pub fn with_system_fonts() -> Self {
        Self::new(FontRegistry::with_system_fonts())
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    fn shape_with_face(face: &FontFace, request: &ShapeRequest<'_>) -> Option<ShapedGlyphs> {
        let font_ref = HbFontRef::from_index(face.data(), face.index()).ok()?;
        let data = shaper_data_for(face, &font_ref);
        let instance = ShaperInstance::from_variations(
            &font_ref,
            core::iter::empty::<harfrust::Variation>(),
        );
        let shaper = data
            .shaper(&font_ref)
            .instance(Some(&instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        buffer.push_str(request.text);
        buffer.set_direction(if request.is_rtl {
            HbDirection::RightToLeft
        } else {
            HbDirection::LeftToRight
        });
        if let Some(script) = hb_script(request.script) {
            buffer.set_script(script);
        }
        buffer.guess_segment_properties();

        let output = shaper.shape(buffer, &[]);
        let units_per_em = face.metrics().units_per_em;
        let scale = if units_per_em != 0 {
            request.font.size / units_per_em as f32
        } else {
            1.0
        };

        let infos = output.glyph_infos();
        let positions = output.glyph_positions();
        let mut shaped = ShapedGlyphs {
            glyphs: Vec::with_capacity(infos.len()),
            clusters: Vec::with_capacity(infos.len()),
            offsets: Vec::with_capacity(infos.len()),
            advances: Vec::with_capacity(infos.len()),
        };
        for (info, pos) in infos.iter().zip(positions) {
            shaped.glyphs.push(info.glyph_id);
            shaped.clusters.push(info.cluster as usize);
            shaped.offsets.push(GlyphOffset {
                x: pos.x_offset as f32 * scale,
                y: -(pos.y_offset as f32) * scale,
            });
            shaped.advances.push(pos.x_advance as f32 * scale);
        }
        Some(shaped)
    }
}

impl FontMetricsProvider for HarfrustShaper {
    fn metrics(&self, font: &FontList) -> ScaledFontMetrics {
        match self.fonts.resolve(font) {
            Ok(face) => face.scaled_metrics(font.size),
            Err(_) => ScaledFontMetrics::approximate(font.size),
        }
    }
}

impl Shaper for HarfrustShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> ShapedGlyphs {
        let fallback = || {
            let advance = ScaledFontMetrics::approximate(request.font.size).average_char_width;
            ShapedGlyphs::notdef_per_grapheme(request.text, request.is_rtl, advance)
        };
        let face = match self.fonts.resolve(request.font) {
            Ok(face) => face,
            Err(err) => {
                tracing::warn!(error = %err, "no face for run, drawing missing glyphs");
                return fallback();
            }
        };
        Self::shape_with_face(&face, request).unwrap_or_else(|| {
            tracing::warn!(
                families = ?request.font.families,
                "harfrust could not read face, drawing missing glyphs"
            );
            fallback()
        })
    }
}

fn hb_script(script: Script) -> Option<HbScript> {
    if matches!(script, Script::Common | Script::Inherited | Script::Unknown) {
        return None;
    }
    let name: [u8; 4] = script.short_name().as_bytes().try_into().ok()?;
    HbScript::from_iso15924_tag(HbTag::new(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_scripts_to_iso15924_tags() {
        assert!(hb_script(Script::Latin).is_some());
        assert!(hb_script(Script::Hebrew).is_some());
        assert!(hb_script(Script::Common).is_none());
    }

    #[test]
    fn unresolvable_font_degrades_to_notdef() {
        let shaper = HarfrustShaper::new(FontRegistry::new());
        let font = FontList::new(["No Such Family"], 10.0);
        let request = ShapeRequest {
            text: "ab",
            script: Script::Latin,
            is_rtl: false,
            font: &font,
        };
        let shaped = shaper.shape(&request);
        assert_eq!(shaped.glyphs, vec![0, 0]);
        assert_eq!(shaped.clusters, vec![0, 1]);
        assert_eq!(shaper.metrics(&font), ScaledFontMetrics::approximate(10.0));
    }

    #[test]
    fn shapes_with_a_system_font_when_available() {
        let shaper = HarfrustShaper::with_system_fonts();
        if shaper.fonts().is_empty() {
            return;
        }
        let font = FontList::default();
        let request = ShapeRequest {
            text: "hello",
            script: Script::Latin,
            is_rtl: false,
            font: &font,
        };
        let shaped = shaper.shape(&request);
        assert!(!shaped.glyphs.is_empty());
        assert!(shaped.width() > 0.0);
        assert!(shaped.clusters.windows(2).all(|w| w[0] <= w[1]));
    }
}
