use core::ops::Range;

/// Half-open byte range over a string.
///
/// A range may be reversed (`start > end`) to describe a selection anchored
/// at `start` that extends backward to `end`. All set operations work on the
/// normalized `[min, max)` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty range positioned at `pos`.
    pub const fn collapsed(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub fn set_start(&mut self, start: usize) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    pub fn min(&self) -> usize {
        self.start.min(self.end)
    }

    pub fn max(&self) -> usize {
        self.start.max(self.end)
    }

    pub fn len(&self) -> usize {
        self.max() - self.min()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// The same span with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// The normalized (non-reversed) form of this range.
    pub fn normalized(&self) -> Self {
        Self::new(self.min(), self.max())
    }

    /// `true` when `other` lies within this range.
    ///
    /// An empty `other` is contained when its position is inside or on the
    /// edge of a non-empty range; an empty range only contains itself.
    pub fn contains(&self, other: &TextRange) -> bool {
        if self.is_empty() {
            return other.is_empty() && other.start == self.start;
        }
        self.min() <= other.min() && other.max() <= self.max()
    }

    /// `true` when `pos` falls inside `[min, max)`.
    pub fn contains_index(&self, pos: usize) -> bool {
        self.min() <= pos && pos < self.max()
    }

    /// Intersection of the normalized spans, or `None` when they are
    /// disjoint. Touching ranges produce an empty intersection.
    pub fn intersect(&self, other: &TextRange) -> Option<TextRange> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        (min <= max).then(|| TextRange::new(min, max))
    }

    /// `true` when the two ranges share at least one index.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.intersect(other).is_some_and(|r| !r.is_empty())
    }

    pub fn as_range(&self) -> Range<usize> {
        self.min()..self.max()
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_normalizes_min_max() {
        let r = TextRange::new(7, 2);
        assert!(r.is_reversed());
        assert_eq!(r.min(), 2);
        assert_eq!(r.max(), 7);
        assert_eq!(r.len(), 5);
        assert_eq!(r.reversed(), TextRange::new(2, 7));
    }

    #[test]
    fn intersect_handles_touching_and_disjoint() {
        let a = TextRange::new(0, 4);
        assert_eq!(a.intersect(&TextRange::new(2, 8)), Some(TextRange::new(2, 4)));
        assert_eq!(a.intersect(&TextRange::new(4, 8)), Some(TextRange::collapsed(4)));
        assert_eq!(a.intersect(&TextRange::new(5, 8)), None);
        assert!(!a.overlaps(&TextRange::new(4, 8)));
        assert!(a.overlaps(&TextRange::new(8, 3)));
    }

    #[test]
    fn containment_of_empty_ranges() {
        let a = TextRange::new(1, 3);
        assert!(a.contains(&TextRange::collapsed(3)));
        assert!(a.contains(&TextRange::new(3, 1)));
        assert!(!a.contains(&TextRange::new(0, 2)));
        assert!(TextRange::collapsed(2).contains(&TextRange::collapsed(2)));
        assert!(!TextRange::collapsed(2).contains(&TextRange::collapsed(3)));
    }
}
