//! Index span sets over a token sequence.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// A set of token indices, always reducible to contiguous ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSet {
    indices: BTreeSet<usize>,
}

impl SpanSet {
    /// Create an empty span set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a span set from inclusive ranges.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = RangeInclusive<usize>>,
    {
        Self {
            indices: ranges.into_iter().flatten().collect(),
        }
    }

    /// Build a span set from a boundary list, pairing boundaries two at a
    /// time: `[1, 3, 7, 19]` becomes `1..=3` and `7..=19`. An unpaired
    /// trailing boundary is ignored.
    pub fn from_boundaries(boundaries: &[usize]) -> Self {
        Self::from_ranges(
            boundaries
                .chunks_exact(2)
                .map(|pair| pair[0]..=pair[1]),
        )
    }

    /// Fill small holes in a sorted index list.
    ///
    /// Consecutive indices more than `threshold` apart split the list into
    /// separate runs; each run is filled from its minimum to its maximum.
    pub fn gap_filled(sorted: &[usize], threshold: usize) -> Self {
        let Some(&first) = sorted.first() else {
            return Self::new();
        };

        let mut ranges = Vec::new();
        let mut start = first;
        let mut prev = first;
        for &idx in &sorted[1..] {
            if idx.saturating_sub(prev) > threshold {
                ranges.push(start..=prev);
                start = idx;
            }
            prev = idx;
        }
        ranges.push(start..=prev);

        Self::from_ranges(ranges)
    }

    /// Indices present in both sets.
    pub fn intersection(&self, other: &SpanSet) -> SpanSet {
        Self {
            indices: self.indices.intersection(&other.indices).copied().collect(),
        }
    }

    /// Check if an index is in the set.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of indices in the set.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Iterate indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Reduce the set to ascending, non-overlapping inclusive ranges.
    pub fn ranges(&self) -> Vec<RangeInclusive<usize>> {
        let mut ranges = Vec::new();
        let mut iter = self.indices.iter().copied();
        let Some(first) = iter.next() else {
            return ranges;
        };

        let (mut start, mut end) = (first, first);
        for idx in iter {
            if idx == end + 1 {
                end = idx;
            } else {
                ranges.push(start..=end);
                start = idx;
                end = idx;
            }
        }
        ranges.push(start..=end);
        ranges
    }
}

impl FromIterator<usize> for SpanSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_fill_small_hole() {
        let span = SpanSet::gap_filled(&[1, 2, 4, 5], 2);
        assert_eq!(span.ranges(), vec![1..=5]);

        let span = SpanSet::gap_filled(&[3, 5, 6], 2);
        assert_eq!(span.ranges(), vec![3..=6]);
    }

    #[test]
    fn test_gap_fill_large_hole_splits() {
        let span = SpanSet::gap_filled(&[1, 2, 6, 7], 2);
        assert_eq!(span.ranges(), vec![1..=2, 6..=7]);
    }

    #[test]
    fn test_gap_fill_single_and_empty() {
        assert_eq!(SpanSet::gap_filled(&[4], 2).ranges(), vec![4..=4]);
        assert!(SpanSet::gap_filled(&[], 2).is_empty());
    }

    #[test]
    fn test_from_boundaries_pairs() {
        let span = SpanSet::from_boundaries(&[1, 3, 7, 9]);
        assert_eq!(span.ranges(), vec![1..=3, 7..=9]);

        let span = SpanSet::from_boundaries(&[2, 4, 8]);
        assert_eq!(span.ranges(), vec![2..=4]);
    }

    #[test]
    fn test_intersection() {
        let a = SpanSet::from_ranges([0..=5]);
        let b = SpanSet::from_ranges([3..=8]);
        let both = a.intersection(&b);
        assert_eq!(both.ranges(), vec![3..=5]);
        assert!(both.contains(4));
        assert!(!both.contains(6));
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        let span = SpanSet::from_ranges([0..=2, 3..=4]);
        assert_eq!(span.ranges(), vec![0..=4]);
        assert_eq!(span.len(), 5);
    }
}
