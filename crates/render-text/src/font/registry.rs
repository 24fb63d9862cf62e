use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use fontdb::{Database, Family, Query, Stretch, Style, ID};
use hashbrown::HashMap;

use crate::error::{FontError, Result};
use crate::font::{FontFace, FontList};

/// Resolves `FontList` requests to loaded faces.
///
/// Wraps a `fontdb` database for matching and keeps every face it has parsed
/// so repeated requests share one `FontFace`.
#[derive(Debug, Default)]
pub struct FontRegistry {
    db: Database,
    faces: Mutex<HashMap<ID, Arc<FontFace>>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated with the fonts installed on this system.
    pub fn with_system_fonts() -> Self {
        let mut registry = Self::new();
        registry.db.load_system_fonts();
        tracing::debug!(faces = registry.db.len(), "loaded system fonts");
        registry
    }

    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.db.load_font_file(path.as_ref())?;
        Ok(())
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// The face best matching `font`, loading it on first use.
    pub fn resolve(&self, font: &FontList) -> Result<Arc<FontFace>> {
        let families: Vec<Family<'_>> = font
            .families
            .iter()
            .map(|name| match name.as_str() {
                "serif" => Family::Serif,
                "sans-serif" => Family::SansSerif,
                "monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                other => Family::Name(other),
            })
            .collect();
        let query = Query {
            families: &families,
            weight: fontdb::Weight(font.weight.0),
            stretch: Stretch::Normal,
            style: if font.italic { Style::Italic } else { Style::Normal },
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| FontError::FamilyNotFound(font.families.clone()))?;

        let mut faces = self.faces.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(face) = faces.get(&id) {
            return Ok(face.clone());
        }
        let face = self
            .db
            .with_face_data(id, |data, index| FontFace::from_vec(data.to_vec(), index as usize))
            .ok_or(FontError::InvalidFont)??;
        let face = Arc::new(face);
        faces.insert(id, face.clone());
        Ok(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_reports_family_not_found() {
        let registry = FontRegistry::new();
        let err = registry.resolve(&FontList::default()).unwrap_err();
        assert!(matches!(err, FontError::FamilyNotFound(families) if families == ["sans-serif"]));
    }
}
