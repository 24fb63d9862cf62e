use crate::range::TextRange;

/// Run-length encoded mapping from positions in `[0, max)` to values.
///
/// Each `(position, value)` pair states that `value` holds from `position`
/// up to the next pair's position (or `max` for the last pair). Positions are
/// strictly increasing, the first one is always 0, and adjacent pairs never
/// carry equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakList<T> {
    breaks: Vec<(usize, T)>,
    max: usize,
}

impl<T: Clone + PartialEq> BreakList<T> {
    /// A list holding `value` over an empty domain.
    pub fn new(value: T) -> Self {
        Self {
            breaks: vec![(0, value)],
            max: 0,
        }
    }

    /// Collapse the whole domain to a single `value`.
    pub fn set_value(&mut self, value: T) {
        self.breaks.clear();
        self.breaks.push((0, value));
    }

    /// Set `value` over `range`, leaving values outside it untouched.
    ///
    /// The range is clamped to `[0, max)`; empty ranges are ignored.
    pub fn apply_value(&mut self, value: T, range: TextRange) {
        let start = range.min().min(self.max);
        let end = range.max().min(self.max);
        if start >= end {
            return;
        }

        // The value that must resume once the range ends.
        let resume = (end < self.max).then(|| self.value_at(end).clone());

        self.breaks.retain(|(pos, _)| *pos < start || *pos > end);
        let at = self.breaks.partition_point(|(pos, _)| *pos < start);
        let mut spliced = vec![(start, value)];
        if let Some(resume) = resume {
            spliced.push((end, resume));
        }
        self.breaks.splice(at..at, spliced);
        self.merge_equal_neighbors();
        self.check_breaks();
    }

    /// Resize the domain to `[0, max)`, dropping breaks at or beyond `max`.
    ///
    /// Growing the domain extends the last value.
    pub fn set_max(&mut self, max: usize) {
        self.breaks.retain(|(pos, _)| *pos == 0 || *pos < max);
        self.max = max;
        self.check_breaks();
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn breaks(&self) -> &[(usize, T)] {
        &self.breaks
    }

    /// Index of the break covering `position`.
    pub fn get_break(&self, position: usize) -> usize {
        self.breaks
            .partition_point(|(pos, _)| *pos <= position)
            .saturating_sub(1)
    }

    /// The range covered by the break at `index`.
    pub fn get_range(&self, index: usize) -> TextRange {
        let start = self.breaks.get(index).map_or(self.max, |(pos, _)| *pos);
        let end = self
            .breaks
            .get(index + 1)
            .map_or(self.max, |(pos, _)| *pos);
        TextRange::new(start, end.max(start))
    }

    /// The value in effect at `position`.
    pub fn value_at(&self, position: usize) -> &T {
        &self.breaks[self.get_break(position)].1
    }

    /// Iterate `(range, value)` spans in order.
    pub fn spans(&self) -> impl Iterator<Item = (TextRange, &T)> + '_ {
        (0..self.breaks.len()).map(move |i| (self.get_range(i), &self.breaks[i].1))
    }

    pub fn equals_value_for_testing(&self, value: &T) -> bool {
        self.breaks.len() == 1 && self.breaks[0].1 == *value
    }

    pub fn equals_for_testing(&self, expected: &[(usize, T)]) -> bool {
        self.breaks.as_slice() == expected
    }

    fn merge_equal_neighbors(&mut self) {
        self.breaks.dedup_by(|next, prev| next.1 == prev.1);
    }

    fn check_breaks(&self) {
        debug_assert!(!self.breaks.is_empty(), "break list must not be empty");
        debug_assert_eq!(self.breaks[0].0, 0, "first break must start at 0");
        debug_assert!(
            self.breaks.windows(2).all(|w| w[0].0 < w[1].0),
            "break positions must increase"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(max: usize) -> BreakList<bool> {
        let mut breaks = BreakList::new(false);
        breaks.set_max(max);
        breaks
    }

    #[test]
    fn set_value_collapses() {
        let mut breaks = list(10);
        breaks.apply_value(true, TextRange::new(2, 4));
        breaks.set_value(true);
        assert!(breaks.equals_value_for_testing(&true));
    }

    #[test]
    fn apply_value_splits_and_restores() {
        let mut breaks = list(10);
        breaks.apply_value(true, TextRange::new(0, 0));
        assert!(breaks.equals_value_for_testing(&false));

        breaks.apply_value(true, TextRange::new(2, 5));
        assert!(breaks.equals_for_testing(&[(0, false), (2, true), (5, false)]));

        breaks.apply_value(true, TextRange::new(0, 10));
        assert!(breaks.equals_value_for_testing(&true));
    }

    #[test]
    fn adjacent_ranges_merge() {
        let mut breaks = list(10);
        breaks.apply_value(true, TextRange::new(2, 3));
        breaks.apply_value(true, TextRange::new(1, 2));
        assert!(breaks.equals_for_testing(&[(0, false), (1, true), (3, false)]));
        breaks.apply_value(false, TextRange::new(1, 3));
        assert!(breaks.equals_value_for_testing(&false));
    }

    #[test]
    fn reversed_and_oversized_ranges_are_clamped() {
        let mut breaks = list(6);
        breaks.apply_value(true, TextRange::new(9, 4));
        assert!(breaks.equals_for_testing(&[(0, false), (4, true)]));
        assert_eq!(breaks.get_range(1), TextRange::new(4, 6));
    }

    #[test]
    fn set_max_truncates_breaks() {
        let mut breaks = list(10);
        breaks.apply_value(true, TextRange::new(2, 4));
        breaks.apply_value(true, TextRange::new(6, 8));
        breaks.set_max(5);
        assert!(breaks.equals_for_testing(&[(0, false), (2, true), (4, false)]));
        breaks.set_max(3);
        assert!(breaks.equals_for_testing(&[(0, false), (2, true)]));
        breaks.set_max(0);
        assert!(breaks.equals_value_for_testing(&false));
        breaks.set_max(12);
        assert_eq!(breaks.get_range(0), TextRange::new(0, 12));
    }

    #[test]
    fn values_outside_applied_range_are_preserved() {
        let mut colors = BreakList::new(0u32);
        colors.set_max(12);
        colors.apply_value(1, TextRange::new(0, 6));
        colors.apply_value(2, TextRange::new(4, 9));
        let before: Vec<u32> = (0..12).map(|i| *colors.value_at(i)).collect();

        colors.apply_value(3, TextRange::new(3, 7));
        for i in 0..12 {
            let expected = if (3..7).contains(&i) { 3 } else { before[i] };
            assert_eq!(*colors.value_at(i), expected, "position {i}");
        }
    }

    #[test]
    fn get_break_and_range_cover_every_position() {
        let mut breaks = list(8);
        breaks.apply_value(true, TextRange::new(3, 5));
        for pos in 0..8 {
            let index = breaks.get_break(pos);
            assert!(breaks.get_range(index).contains_index(pos));
        }
        let spans: Vec<_> = breaks.spans().map(|(r, v)| (r.as_range(), *v)).collect();
        assert_eq!(spans, vec![(0..3, false), (3..5, true), (5..8, false)]);
    }
}
