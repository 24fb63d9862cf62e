//! render-text configuration
//!
//! Loads `RenderText` defaults from `render_text.toml`, with environment
//! variable overrides for quick experiments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use render_text::font::list::DEFAULT_FONT_SIZE;
use render_text::{
    DirectionalityMode, ElideBehavior, FontError, FontList, FontRegistry, HarfrustShaper,
    HorizontalAlignment, RenderText, WordWrapBehavior,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File read by `load_or_default`.
pub const DEFAULT_CONFIG_FILE: &str = "render_text.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to load configured font: {0}")]
    Font(#[from] FontError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RenderTextConfig {
    pub text: TextConfig,
    pub layout: LayoutConfig,
    pub cursor: CursorConfig,
}

/// Font and content settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Family names tried in order; generic names like `sans-serif` work.
    pub font_families: Vec<String>,
    /// Pixels per em.
    pub font_size: f32,
    /// Extra font file registered ahead of the system fonts.
    pub font_path: Option<PathBuf>,
    /// Password-style display.
    pub obscured: bool,
}

/// Paragraph settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub multiline: bool,
    /// 0 means unlimited.
    pub max_lines: usize,
    pub word_wrap: WordWrapBehavior,
    pub elide: ElideBehavior,
    pub directionality: DirectionalityMode,
    pub alignment: HorizontalAlignment,
    pub min_line_height: f32,
    /// Characters kept before truncating with an ellipsis; 0 disables.
    pub truncate_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub enabled: bool,
    pub visible: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_families: vec!["sans-serif".to_owned()],
            font_size: DEFAULT_FONT_SIZE,
            font_path: None,
            obscured: false,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            multiline: false,
            max_lines: 0,
            word_wrap: WordWrapBehavior::default(),
            elide: ElideBehavior::default(),
            directionality: DirectionalityMode::default(),
            alignment: HorizontalAlignment::default(),
            min_line_height: 0.0,
            truncate_length: 0,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: false,
        }
    }
}

impl RenderTextConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `render_text.toml` from the working directory, falling back to
    /// defaults when it is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_else(|err| {
            if !matches!(&err, ConfigError::Io(io) if io.kind() == std::io::ErrorKind::NotFound) {
                tracing::warn!(%err, file = DEFAULT_CONFIG_FILE, "ignoring config file");
            }
            Self::default()
        })
    }

    /// Apply environment overrides on top of the loaded values.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn merge_with_env(&mut self) {
        if let Ok(font) = std::env::var("RENDER_TEXT_FONT") {
            self.text.font_families = font
                .split(',')
                .map(str::trim)
                .filter(|family| !family.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Ok(val) = std::env::var("RENDER_TEXT_FONT_SIZE") {
            match val.parse::<f32>() {
                Ok(size) if size > 0.0 => self.text.font_size = size,
                _ => tracing::warn!(value = %val, "ignoring RENDER_TEXT_FONT_SIZE"),
            }
        }
        if let Ok(val) = std::env::var("RENDER_TEXT_MULTILINE") {
            self.layout.multiline = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("RENDER_TEXT_ELIDE") {
            match parse_enum::<ElideBehavior>(&val) {
                Some(elide) => self.layout.elide = elide,
                None => tracing::warn!(value = %val, "ignoring RENDER_TEXT_ELIDE"),
            }
        }
        if let Ok(val) = std::env::var("RENDER_TEXT_DIRECTION") {
            match parse_enum::<DirectionalityMode>(&val) {
                Some(mode) => self.layout.directionality = mode,
                None => tracing::warn!(value = %val, "ignoring RENDER_TEXT_DIRECTION"),
            }
        }
    }

    /// `load_or_default` followed by `merge_with_env`.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    pub fn font_list(&self) -> FontList {
        FontList::new(self.text.font_families.iter().map(String::as_str), self.text.font_size)
    }

    /// System fonts plus the configured font file, if any.
    pub fn font_registry(&self) -> Result<FontRegistry, ConfigError> {
        let mut registry = FontRegistry::with_system_fonts();
        if let Some(path) = &self.text.font_path {
            registry.load_font_file(path)?;
        }
        Ok(registry)
    }

    /// A `RenderText` shaping with the configured fonts and carrying every
    /// configured setting.
    pub fn build(&self) -> Result<RenderText, ConfigError> {
        let shaper = HarfrustShaper::new(self.font_registry()?);
        let mut render_text = RenderText::new(Arc::new(shaper));
        self.apply(&mut render_text);
        Ok(render_text)
    }

    /// Push every setting into `render_text`.
    pub fn apply(&self, render_text: &mut RenderText) {
        render_text.set_font_list(self.font_list());
        render_text.set_obscured(self.text.obscured);
        render_text.set_multiline(self.layout.multiline);
        render_text.set_max_lines(self.layout.max_lines);
        render_text.set_word_wrap_behavior(self.layout.word_wrap);
        render_text.set_elide_behavior(self.layout.elide);
        render_text.set_directionality_mode(self.layout.directionality);
        render_text.set_horizontal_alignment(self.layout.alignment);
        render_text.set_min_line_height(self.layout.min_line_height);
        render_text.set_truncate_length(self.layout.truncate_length);
        render_text.set_cursor_enabled(self.cursor.enabled);
        render_text.set_cursor_visible(self.cursor.visible);
        tracing::debug!(
            font_size = self.text.font_size,
            multiline = self.layout.multiline,
            elide = ?self.layout.elide,
            "applied render text config"
        );
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Parse a `snake_case` enum name the way the TOML file spells it.
fn parse_enum<T: for<'de> Deserialize<'de>>(val: &str) -> Option<T> {
    T::deserialize(toml::Value::String(val.trim().to_ascii_lowercase())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_render_text() {
        let config = RenderTextConfig::default();
        assert_eq!(config.text.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.layout.elide, ElideBehavior::NoElide);
        assert_eq!(config.layout.directionality, DirectionalityMode::FromText);
        assert!(config.cursor.enabled);
    }

    #[test]
    fn serializes_and_parses_back() {
        let mut config = RenderTextConfig::default();
        config.layout.elide = ElideBehavior::ElideMiddle;
        config.layout.alignment = HorizontalAlignment::ToHead;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("elide = \"elide_middle\""));
        let parsed: RenderTextConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!(parse_enum("ELIDE_TAIL"), Some(ElideBehavior::ElideTail));
        assert_eq!(parse_enum("force_rtl"), Some(DirectionalityMode::ForceRtl));
        assert_eq!(parse_enum::<ElideBehavior>("sideways"), None);
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("yes"));
    }
}
