use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use render_text::testing::MonospaceShaper;
use render_text::{
    DirectionalityMode, ElideBehavior, HorizontalAlignment, Rect, RenderText, TextDirection,
    WordWrapBehavior,
};
use render_text_config::{ConfigError, RenderTextConfig};

fn write_config(contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn partial_files_keep_defaults_for_missing_keys() -> Result<()> {
    let file = write_config(
        r#"
[text]
font_families = ["Noto Sans", "sans-serif"]
font_size = 18.0

[layout]
multiline = true
word_wrap = "truncate_long_words"
directionality = "force_rtl"
"#,
    )?;
    let config = RenderTextConfig::load_from_file(file.path())?;
    assert_eq!(config.text.font_families, ["Noto Sans", "sans-serif"]);
    assert_eq!(config.text.font_size, 18.0);
    assert!(!config.text.obscured);
    assert!(config.layout.multiline);
    assert_eq!(config.layout.word_wrap, WordWrapBehavior::TruncateLongWords);
    assert_eq!(config.layout.directionality, DirectionalityMode::ForceRtl);
    assert_eq!(config.layout.elide, ElideBehavior::NoElide);
    assert!(config.cursor.enabled);

    let font = config.font_list();
    assert_eq!(font.size, 18.0);
    assert_eq!(font.families[0], "Noto Sans");
    Ok(())
}

#[test]
fn missing_and_malformed_files_are_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = RenderTextConfig::load_from_file(dir.path().join("render_text.toml"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));

    let file = write_config("[layout]\nelide = \"sideways\"\n")?;
    let malformed = RenderTextConfig::load_from_file(file.path());
    assert!(matches!(malformed, Err(ConfigError::Parse(_))));
    Ok(())
}

#[test]
fn apply_pushes_settings_into_render_text() -> Result<()> {
    let file = write_config(
        r#"
[text]
obscured = true

[layout]
elide = "elide_tail"
alignment = "right"
truncate_length = 8
directionality = "force_rtl"

[cursor]
enabled = false
"#,
    )?;
    let config = RenderTextConfig::load_from_file(file.path())?;
    let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
    config.apply(&mut render_text);
    render_text.set_display_rect(Rect::new(0.0, 0.0, 500.0, 20.0));
    render_text.set_text("password123");

    assert!(render_text.obscured());
    assert_eq!(render_text.elide_behavior(), ElideBehavior::ElideTail);
    assert_eq!(render_text.horizontal_alignment(), HorizontalAlignment::Right);
    assert!(!render_text.cursor_enabled());
    assert_eq!(render_text.get_display_text_direction(), TextDirection::Rtl);
    assert_eq!(render_text.get_display_text(), "*******\u{2026}");
    Ok(())
}

#[test]
fn environment_overrides_the_file() -> Result<()> {
    unsafe {
        std::env::set_var("RENDER_TEXT_FONT", "Serif One, serif");
        std::env::set_var("RENDER_TEXT_FONT_SIZE", "20");
        std::env::set_var("RENDER_TEXT_MULTILINE", "1");
        std::env::set_var("RENDER_TEXT_ELIDE", "ELIDE_HEAD");
        std::env::set_var("RENDER_TEXT_DIRECTION", "not-a-mode");
    }

    let mut config = RenderTextConfig::default();
    config.merge_with_env();

    unsafe {
        std::env::remove_var("RENDER_TEXT_FONT");
        std::env::remove_var("RENDER_TEXT_FONT_SIZE");
        std::env::remove_var("RENDER_TEXT_MULTILINE");
        std::env::remove_var("RENDER_TEXT_ELIDE");
        std::env::remove_var("RENDER_TEXT_DIRECTION");
    }

    assert_eq!(config.text.font_families, ["Serif One", "serif"]);
    assert_eq!(config.text.font_size, 20.0);
    assert!(config.layout.multiline);
    assert_eq!(config.layout.elide, ElideBehavior::ElideHead);
    assert_eq!(config.layout.directionality, DirectionalityMode::FromText);
    Ok(())
}
