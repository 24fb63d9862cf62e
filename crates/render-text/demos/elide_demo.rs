/// Shows how each elide behavior shortens text as the display narrows.
///
/// Run with: cargo run -p render-text --example elide_demo
use std::sync::Arc;

use render_text::testing::MonospaceShaper;
use render_text::{ElideBehavior, Rect, RenderText};

fn main() -> anyhow::Result<()> {
    let shaper = Arc::new(MonospaceShaper::new(8.0));
    let text = "The quick brown fox jumps over the lazy dog";
    let mut render_text = RenderText::new(shaper);
    render_text.set_text(text);
    render_text.set_cursor_enabled(false);

    println!("=== Elide Demo ===\n");
    println!("Text: {text:?}\n");

    let behaviors = [
        ElideBehavior::Truncate,
        ElideBehavior::ElideHead,
        ElideBehavior::ElideMiddle,
        ElideBehavior::ElideTail,
    ];
    for behavior in behaviors {
        println!("{behavior:?}:");
        render_text.set_elide_behavior(behavior);
        for width in [320.0, 160.0, 80.0, 24.0] {
            render_text.set_display_rect(Rect::new(0.0, 0.0, width, 20.0));
            let shown = render_text.get_display_text().to_owned();
            println!(
                "   {width:>5.0}px  {shown:?} ({:.0}px)",
                render_text.get_content_width_f()
            );
        }
        println!();
    }

    println!("Email:");
    render_text.set_text("jane.doe@example.com");
    render_text.set_elide_behavior(ElideBehavior::ElideEmail);
    for width in [160.0, 120.0, 80.0] {
        render_text.set_display_rect(Rect::new(0.0, 0.0, width, 20.0));
        println!("   {width:>5.0}px  {:?}", render_text.get_display_text());
    }
    println!();

    println!("Truncate length 10:");
    render_text.set_elide_behavior(ElideBehavior::NoElide);
    render_text.set_text(text);
    render_text.set_truncate_length(10);
    println!("   {:?}", render_text.get_display_text());

    Ok(())
}
