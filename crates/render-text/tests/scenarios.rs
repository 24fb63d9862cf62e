use std::sync::Arc;

use anyhow::Result;
use render_text::style::{BLACK, RED};
use render_text::testing::{MonospaceShaper, TestApi};
use render_text::{
    BreakType, CursorAffinity, DirectionalityMode, Rect, RenderText, SelectionBehavior,
    SelectionModel, TextRange, VisualCursorDirection,
};

fn render_text(text: &str) -> RenderText {
    let mut render_text = RenderText::new(Arc::new(MonospaceShaper::new(10.0)));
    render_text.set_text(text);
    render_text.set_display_rect(Rect::new(0.0, 0.0, 200.0, 20.0));
    render_text
}

fn move_right(render_text: &mut RenderText) -> usize {
    render_text.move_cursor(
        BreakType::Character,
        VisualCursorDirection::Right,
        SelectionBehavior::None,
    );
    render_text.cursor_position()
}

#[test]
fn apply_color_splits_the_color_breaks() -> Result<()> {
    let mut render_text = render_text("HELLO");
    render_text.apply_color(RED, TextRange::new(1, 4));
    let api = TestApi::new(&mut render_text);
    assert!(api
        .styles()
        .colors
        .equals_for_testing(&[(0, BLACK), (1, RED), (4, BLACK)]));
    Ok(())
}

#[test]
fn truncate_length_ends_with_an_ellipsis() -> Result<()> {
    let mut render_text = render_text("012345678");
    render_text.set_truncate_length(5);
    assert_eq!(render_text.get_display_text(), "0123\u{2026}");
    assert_eq!(render_text.text(), "012345678");
    Ok(())
}

#[test]
fn cursor_hops_over_the_truncated_span() -> Result<()> {
    let mut render_text = render_text("abcd");
    render_text.set_truncate_length(2);
    assert_eq!(render_text.get_display_text(), "a\u{2026}");

    let positions: Vec<usize> = (0..3).map(|_| move_right(&mut render_text)).collect();
    assert_eq!(positions, [1, 4, 4]);
    assert!(!render_text.is_valid_cursor_index(2));
    Ok(())
}

#[test]
fn right_arrow_walks_bidi_text_visually() -> Result<()> {
    let mut render_text = render_text("abc\u{5d0}\u{5d1}\u{5d2}");
    let mut visited = vec![render_text.cursor_position()];
    for _ in 0..7 {
        visited.push(move_right(&mut render_text));
    }
    assert_eq!(visited, [0, 1, 2, 3, 7, 5, 3, 9]);

    // The visual right edge is a fixed point.
    let edge = *render_text.selection_model();
    assert_eq!(move_right(&mut render_text), 9);
    assert_eq!(*render_text.selection_model(), edge);
    Ok(())
}

#[test]
fn select_word_selects_the_punctuation_fragment() -> Result<()> {
    let mut render_text = render_text(" foo  a.bc.d bar");
    render_text.set_cursor_position(8);
    render_text.select_word();
    assert_eq!(render_text.selection(), TextRange::new(8, 10));

    render_text.set_cursor_position(9);
    render_text.select_word();
    assert_eq!(render_text.selection(), TextRange::new(8, 10));
    Ok(())
}

fn word_around(text: &str, caret: usize) -> TextRange {
    let mut render_text = render_text(text);
    render_text.set_cursor_position(caret);
    render_text.select_word();
    render_text.selection()
}

#[test]
fn select_word_keeps_whitespace_and_punctuation_runs_apart() -> Result<()> {
    assert_eq!(word_around("a.. b", 2), TextRange::new(1, 3));
    assert_eq!(word_around("a.. b", 3), TextRange::new(3, 4));
    assert_eq!(word_around("a  b", 2), TextRange::new(1, 3));
    assert_eq!(word_around("x !? y", 3), TextRange::new(2, 4));
    assert_eq!(word_around("x !? y", 2), TextRange::new(2, 4));
    assert_eq!(word_around("x !? y", 6), TextRange::new(5, 6));
    Ok(())
}

#[test]
fn select_word_keeps_a_reversed_selection_reversed() -> Result<()> {
    let mut render_text = render_text("foo bar, baz");
    assert!(render_text.select_range(TextRange::new(5, 2)));
    render_text.select_word();
    assert_eq!(render_text.selection(), TextRange::new(7, 0));

    assert!(render_text.select_range(TextRange::new(8, 7)));
    render_text.select_word();
    assert_eq!(render_text.selection(), TextRange::new(8, 7));
    Ok(())
}

#[test]
fn obscured_text_hides_every_character_but_the_revealed_one() -> Result<()> {
    let mut render_text = render_text("hop on pop");
    render_text.set_obscured(true);
    assert_eq!(render_text.get_display_text(), "*".repeat(10));

    render_text.set_obscured_reveal_index(Some(2));
    assert_eq!(render_text.get_display_text(), "**p*******");
    assert_eq!(render_text.text(), "hop on pop");
    Ok(())
}

#[test]
fn obscured_word_moves_jump_to_the_edges() -> Result<()> {
    let mut render_text = render_text("hop on pop");
    render_text.set_obscured(true);
    render_text.move_cursor(
        BreakType::Word,
        VisualCursorDirection::Right,
        SelectionBehavior::None,
    );
    assert_eq!(render_text.cursor_position(), 10);
    render_text.move_cursor(
        BreakType::Word,
        VisualCursorDirection::Left,
        SelectionBehavior::Extend,
    );
    assert_eq!(render_text.selection(), TextRange::new(10, 0));
    Ok(())
}

#[test]
fn left_arrow_from_the_end_reverses_the_walk() -> Result<()> {
    let mut render_text = render_text("abc\u{5d0}\u{5d1}\u{5d2}");
    render_text.move_cursor_to(&SelectionModel::new(9, CursorAffinity::Forward));
    let mut visited = vec![render_text.cursor_position()];
    for _ in 0..7 {
        render_text.move_cursor(
            BreakType::Character,
            VisualCursorDirection::Left,
            SelectionBehavior::None,
        );
        visited.push(render_text.cursor_position());
    }
    assert_eq!(visited, [9, 5, 7, 9, 2, 1, 0, 0]);
    Ok(())
}

#[test]
fn rtl_paragraph_lays_runs_out_right_to_left() -> Result<()> {
    let mut rt = render_text("\u{5d0}\u{5d1} abc");
    rt.set_directionality_mode(DirectionalityMode::ForceRtl);
    let mut api = TestApi::new(&mut rt);
    let order = api.visual_run_order();
    assert!(order.len() >= 2);
    let reversed: Vec<usize> = (0..order.len()).rev().collect();
    assert_eq!(order, reversed);
    Ok(())
}

#[test]
fn display_offset_scrolls_to_keep_the_caret_visible() -> Result<()> {
    let mut rt = render_text("0123456789");
    rt.set_display_rect(Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(TestApi::new(&mut rt).display_offset(), 0.0);

    rt.move_cursor(
        BreakType::Line,
        VisualCursorDirection::Right,
        SelectionBehavior::None,
    );
    assert_eq!(rt.cursor_position(), 10);
    assert!(TestApi::new(&mut rt).display_offset() < 0.0);
    let caret = *rt.selection_model();
    let bounds = rt.get_cursor_bounds(&caret, true);
    assert!(bounds.x >= 0.0 && bounds.right() <= 50.0);
    Ok(())
}
