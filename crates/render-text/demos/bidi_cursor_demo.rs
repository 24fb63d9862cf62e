/// Walks the caret through mixed-direction text and prints where it lands.
///
/// Run with: cargo run -p render-text --example bidi_cursor_demo
///
/// Uses the system fonts when any are installed, otherwise a fixed-advance
/// shaper so the output is still meaningful.
use std::sync::Arc;

use render_text::testing::MonospaceShaper;
use render_text::{
    BreakType, HarfrustShaper, Rect, RenderText, SelectionBehavior, Shaper,
    VisualCursorDirection,
};

fn shaper() -> Arc<dyn Shaper> {
    let system = HarfrustShaper::with_system_fonts();
    if system.fonts().is_empty() {
        println!("(no system fonts, using a 10px monospace shaper)\n");
        Arc::new(MonospaceShaper::new(10.0))
    } else {
        Arc::new(system)
    }
}

fn walk(render_text: &mut RenderText, direction: VisualCursorDirection, break_type: BreakType) {
    let mut steps = 0;
    loop {
        let before = *render_text.selection_model();
        render_text.move_cursor(break_type, direction, SelectionBehavior::None);
        let after = *render_text.selection_model();
        let bounds = render_text.get_cursor_bounds(&after, true);
        println!(
            "   {:>2} -> {:>2} {:?} (x = {:.1})",
            before.caret_pos(),
            after.caret_pos(),
            after.caret_affinity(),
            bounds.x
        );
        steps += 1;
        if after.caret_pos() == before.caret_pos() || steps > 32 {
            break;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let mut render_text = RenderText::new(shaper());
    render_text.set_display_rect(Rect::new(0.0, 0.0, 400.0, 24.0));

    println!("=== Bidi Cursor Demo ===\n");

    // 1. Character moves
    let text = "abc \u{5e9}\u{5dc}\u{5d5}\u{5dd} def";
    render_text.set_text(text);
    println!("1. Right arrow through {text:?}:");
    println!("   direction: {:?}", render_text.get_display_text_direction());
    walk(&mut render_text, VisualCursorDirection::Right, BreakType::Character);
    println!();

    // 2. Word moves back
    println!("2. Ctrl+Left back to the start:");
    walk(&mut render_text, VisualCursorDirection::Left, BreakType::Word);
    println!();

    // 3. RTL paragraph
    let text = "\u{5e9}\u{5dc}\u{5d5}\u{5dd} abc";
    render_text.set_text(text);
    println!("3. Left arrow through RTL paragraph {text:?}:");
    println!("   direction: {:?}", render_text.get_display_text_direction());
    walk(&mut render_text, VisualCursorDirection::Left, BreakType::Character);
    println!();

    // 4. Selection
    render_text.select_all(false);
    println!("4. Select all:");
    for rect in render_text.get_substring_bounds(render_text.selection()) {
        println!("   highlight x = {:.1}..{:.1}", rect.x, rect.right());
    }
    println!("   selected: {:?}", render_text.selected_text());

    Ok(())
}
