use std::collections::BTreeSet;

use unicode_script::Script;

use crate::bidi::{invert_permutation, resolve_levels, visual_to_logical};
use crate::font::FontList;
use crate::layout::selection::CursorAffinity;
use crate::layout::text_run::TextRun;
use crate::range::TextRange;
use crate::shaping::{ShapeRequest, ShapedGlyphs, Shaper};
use crate::style::Styles;
use crate::unicode::{grapheme_clusters, is_grapheme_boundary, is_newline, is_unusual_block_change, script_runs};

/// Everything itemization looks at, all in layout-text space.
#[derive(Debug, Clone, Copy)]
pub struct ItemizeInput<'a> {
    pub text: &'a str,
    pub paragraph_rtl: bool,
    pub font: &'a FontList,
    pub styles: &'a Styles,
}

/// Runs in logical order plus the visual permutation between them.
#[derive(Debug, Clone, Default)]
pub struct RunList {
    runs: Vec<TextRun>,
    visual_to_logical: Vec<usize>,
    logical_to_visual: Vec<usize>,
    width: f32,
}

impl RunList {
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TextRun> {
        self.runs.get(index)
    }

    /// Logical index of the run displayed at `visual` position.
    pub fn visual_to_logical(&self, visual: usize) -> usize {
        self.visual_to_logical[visual]
    }

    pub fn logical_to_visual(&self, logical: usize) -> usize {
        self.logical_to_visual[logical]
    }

    /// Runs in visual (left to right) order.
    pub fn visual_runs(&self) -> impl Iterator<Item = (usize, &TextRun)> + '_ {
        self.visual_to_logical.iter().map(move |&i| (i, &self.runs[i]))
    }

    /// Sum of all run widths.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The run holding the character the caret at `pos` is attached to.
    pub fn run_containing_caret(&self, pos: usize, affinity: CursorAffinity) -> Option<usize> {
        self.runs.iter().position(|run| match affinity {
            CursorAffinity::Forward => run.range.start() <= pos && pos < run.range.end(),
            CursorAffinity::Backward => run.range.start() < pos && pos <= run.range.end(),
        })
    }

    /// Shape every run and lay them out side by side in visual order.
    pub fn shape(&mut self, text: &str, base_font: &FontList, shaper: &dyn Shaper) {
        let base_metrics = shaper.metrics(base_font);
        for run in &mut self.runs {
            run.metrics = shaper.metrics(&run.font);
            run.baseline_offset = run
                .baseline_style
                .baseline_shift(base_font.size, base_metrics.cap_height);
            if run.is_newline {
                run.set_glyphs(ShapedGlyphs::default());
                continue;
            }
            let shaped = shaper.shape(&ShapeRequest {
                text: &text[run.range.as_range()],
                script: run.script,
                is_rtl: run.is_rtl,
                font: &run.font,
            });
            debug_assert_eq!(shaped.glyphs.len(), shaped.clusters.len());
            run.set_glyphs(shaped);
        }
        self.update_visual_positions();
        tracing::trace!(runs = self.runs.len(), width = self.width, "shaped runs");
    }

    fn update_visual_positions(&mut self) {
        let mut x = 0.0;
        for &logical in &self.visual_to_logical {
            let run = &mut self.runs[logical];
            run.preceding_run_widths = x;
            x += run.width;
        }
        self.width = x;
    }
}

/// Split layout text into runs of uniform bidi level, script and
/// shaping-relevant style.
///
/// Newlines get runs of their own, and a run also ends where text moves
/// into or out of a symbol or emoji block. Style breaks that fall inside a
/// grapheme are ignored. The returned runs are unshaped.
pub fn itemize(input: ItemizeInput<'_>) -> RunList {
    let text = input.text;
    if text.is_empty() {
        return RunList::default();
    }

    let levels = resolve_levels(text, input.paragraph_rtl);
    let scripts = script_runs(text);

    let mut boundaries = BTreeSet::from([0, text.len()]);
    let mut prev_level = None;
    for (index, _) in text.char_indices() {
        let level = levels.level_at(index);
        if prev_level.is_some_and(|prev| prev != level) {
            boundaries.insert(index);
        }
        prev_level = Some(level);
    }
    boundaries.extend(scripts.iter().map(|run| run.range.start));

    let spans = input.styles.spans();
    for pair in spans.windows(2) {
        let (_, before) = pair[0];
        let (range, after) = pair[1];
        if !before.same_shaping(&after) && is_grapheme_boundary(text, range.start()) {
            boundaries.insert(range.start());
        }
    }

    let mut prev_first: Option<char> = None;
    for cluster in grapheme_clusters(text) {
        let first = text[cluster.range.clone()].chars().next();
        if let (Some(prev), Some(first)) = (prev_first, first) {
            if is_unusual_block_change(prev, first) {
                boundaries.insert(cluster.range.start);
            }
        }
        if first.is_some_and(is_newline) {
            boundaries.insert(cluster.range.start);
            boundaries.insert(cluster.range.end);
        }
        prev_first = first;
    }

    let boundaries: Vec<usize> = boundaries.into_iter().collect();
    let runs: Vec<TextRun> = boundaries
        .windows(2)
        .map(|pair| {
            let range = TextRange::new(pair[0], pair[1]);
            let script = scripts
                .iter()
                .find(|run| run.range.contains(&range.start()))
                .map_or(Script::Common, |run| run.script);
            let style = input.styles.snapshot_at(range.start());
            let font = input
                .font
                .derive(style.weight, style.italic)
                .with_size(input.font.size * style.baseline.size_scale());
            let mut run = TextRun::new(range, levels.level_at(range.start()), script, font);
            run.baseline_style = style.baseline;
            run.is_newline = text[range.as_range()].chars().next().is_some_and(is_newline);
            run
        })
        .collect();

    let run_levels: Vec<u8> = runs.iter().map(|run| run.level).collect();
    let visual_to_logical = visual_to_logical(&run_levels);
    let logical_to_visual = invert_permutation(&visual_to_logical);
    tracing::debug!(runs = runs.len(), len = text.len(), "itemized layout text");

    RunList {
        runs,
        visual_to_logical,
        logical_to_visual,
        width: 0.0,
    }
}
