//! Range-level tag membership.
//!
//! Each tag owns a [`RangeSet`]: sorted, disjoint, non-adjacent spans.
//! Overlapping or touching spans are merged on insertion, which makes
//! adding a tag idempotent and lets the inverse of any tag command be
//! computed with plain set algebra.

use std::collections::BTreeMap;

use crate::core::position::{Position, Range};
use crate::core::tags::TagName;

/// Sorted, disjoint, non-adjacent, non-empty ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    spans: Vec<Range>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges<'a>(ranges: impl IntoIterator<Item = &'a Range>) -> Self {
        let mut set = Self::new();
        for range in ranges {
            set.insert(*range);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn ranges(&self) -> &[Range] {
        &self.spans
    }

    pub fn into_ranges(self) -> Vec<Range> {
        self.spans
    }

    pub fn contains(&self, position: Position) -> bool {
        self.spans.iter().any(|span| span.contains(position))
    }

    /// Add a span, merging it with every span it overlaps or touches.
    pub fn insert(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        let mut start = range.start();
        let mut end = range.end();
        let mut kept = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if span.touches(&Range::ordered(start, end)) {
                start = start.min(span.start());
                end = end.max(span.end());
            } else {
                kept.push(span);
            }
        }
        kept.push(Range::ordered(start, end));
        kept.sort();
        self.spans = kept;
    }

    /// Subtract a span, splitting any span that straddles it.
    pub fn remove(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if span.intersection(&range).is_none() {
                kept.push(span);
                continue;
            }
            if span.start() < range.start() {
                kept.push(Range::ordered(span.start(), range.start()));
            }
            if range.end() < span.end() {
                kept.push(Range::ordered(range.end(), span.end()));
            }
        }
        self.spans = kept;
    }

    /// The parts of `range` this set covers.
    pub fn covered(&self, range: Range) -> RangeSet {
        RangeSet {
            spans: self
                .spans
                .iter()
                .filter_map(|span| span.intersection(&range))
                .collect(),
        }
    }

    /// The parts of `range` this set does not cover.
    pub fn uncovered(&self, range: Range) -> RangeSet {
        let mut gaps = RangeSet::new();
        gaps.insert(range);
        for span in &self.spans {
            gaps.remove(*span);
        }
        gaps
    }

    /// Shift spans for `len` characters inserted at `at`.
    ///
    /// Inserted text carries no tags of its own: a span that strictly
    /// contains `at` is split around the new text, a span ending at `at` is
    /// not extended, and a span starting at `at` moves right.
    pub fn shift_for_insert(&mut self, at: Position, len: usize) {
        if len == 0 {
            return;
        }
        let mut shifted = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if span.end() <= at {
                shifted.push(span);
            } else if span.start() >= at {
                shifted.push(Range::ordered(
                    span.start().advance(len),
                    span.end().advance(len),
                ));
            } else {
                shifted.push(Range::ordered(span.start(), at));
                shifted.push(Range::ordered(at.advance(len), span.end().advance(len)));
            }
        }
        self.spans = shifted;
    }

    /// Collapse spans for the characters of `deleted` being removed.
    pub fn shift_for_delete(&mut self, deleted: Range) {
        if deleted.is_empty() {
            return;
        }
        let map = |p: Position| -> Position {
            if p <= deleted.start() {
                p
            } else if p >= deleted.end() {
                Position(p.0 - deleted.len())
            } else {
                deleted.start()
            }
        };
        let spans: Vec<Range> = self
            .spans
            .drain(..)
            .map(|span| Range::ordered(map(span.start()), map(span.end())))
            .collect();
        // Re-insert so spans that now touch across the hole merge again.
        for span in spans {
            self.insert(span);
        }
    }
}

/// Tag applications for one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: BTreeMap<TagName, RangeSet>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tag: &TagName, range: Range) {
        if range.is_empty() {
            return;
        }
        self.tags.entry(tag.clone()).or_default().insert(range);
    }

    pub fn remove(&mut self, tag: &TagName, range: Range) {
        if let Some(set) = self.tags.get_mut(tag) {
            set.remove(range);
            if set.is_empty() {
                self.tags.remove(tag);
            }
        }
    }

    /// Current coverage of `tag` (empty if never applied).
    pub fn coverage(&self, tag: &TagName) -> RangeSet {
        self.tags.get(tag).cloned().unwrap_or_default()
    }

    /// Ranges of `tag` in ascending order.
    pub fn ranges(&self, tag: &TagName) -> &[Range] {
        self.tags.get(tag).map(RangeSet::ranges).unwrap_or(&[])
    }

    /// Tags applied to the character at `position`.
    pub fn tags_at(&self, position: Position) -> Vec<TagName> {
        self.tags
            .iter()
            .filter(|(_, set)| set.contains(position))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// For every tag, the parts of `range` it covers.
    pub fn coverage_within(&self, range: Range) -> Vec<(TagName, Vec<Range>)> {
        self.tags
            .iter()
            .map(|(name, set)| (name.clone(), set.covered(range).into_ranges()))
            .filter(|(_, ranges)| !ranges.is_empty())
            .collect()
    }

    pub fn shift_for_insert(&mut self, at: Position, len: usize) {
        for set in self.tags.values_mut() {
            set.shift_for_insert(at, len);
        }
    }

    pub fn shift_for_delete(&mut self, deleted: Range) {
        for set in self.tags.values_mut() {
            set.shift_for_delete(deleted);
        }
        self.tags.retain(|_, set| !set.is_empty());
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Tag names with at least one span.
    pub fn applied_names(&self) -> impl Iterator<Item = &TagName> {
        self.tags.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(a: usize, b: usize) -> Range {
        Range::new(a, b).unwrap()
    }

    fn set(ranges: &[Range]) -> RangeSet {
        RangeSet::from_ranges(ranges)
    }

    #[test]
    fn test_insert_merges_overlap_and_adjacency() {
        let s = set(&[r(0, 3), r(5, 8), r(3, 4), r(7, 10)]);
        assert_eq!(s.ranges(), &[r(0, 4), r(5, 10)]);

        let s = set(&[r(4, 4)]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_remove_splits() {
        let mut s = set(&[r(0, 10)]);
        s.remove(r(3, 5));
        assert_eq!(s.ranges(), &[r(0, 3), r(5, 10)]);
        s.remove(r(0, 3));
        assert_eq!(s.ranges(), &[r(5, 10)]);
        s.remove(r(8, 20));
        assert_eq!(s.ranges(), &[r(5, 8)]);
    }

    #[test]
    fn test_covered_and_uncovered() {
        let s = set(&[r(2, 4), r(6, 8)]);
        assert_eq!(s.covered(r(3, 7)).ranges(), &[r(3, 4), r(6, 7)]);
        assert_eq!(s.uncovered(r(0, 10)).ranges(), &[r(0, 2), r(4, 6), r(8, 10)]);
        assert!(s.uncovered(r(2, 4)).is_empty());
    }

    #[test]
    fn test_shift_for_insert_splits_straddling_span() {
        let mut s = set(&[r(0, 2), r(2, 2), r(4, 8), r(10, 12)]);
        s.shift_for_insert(Position(6), 3);
        assert_eq!(s.ranges(), &[r(0, 2), r(4, 6), r(9, 11), r(13, 15)]);
    }

    #[test]
    fn test_shift_for_insert_at_boundaries() {
        let mut s = set(&[r(2, 5)]);
        s.shift_for_insert(Position(5), 2);
        assert_eq!(s.ranges(), &[r(2, 5)]);
        s.shift_for_insert(Position(2), 2);
        assert_eq!(s.ranges(), &[r(4, 7)]);
    }

    #[test]
    fn test_shift_for_delete_collapses_and_merges() {
        let mut s = set(&[r(2, 4), r(6, 9)]);
        s.shift_for_delete(r(3, 7));
        assert_eq!(s.ranges(), &[r(2, 5)]);

        let mut s = set(&[r(3, 5)]);
        s.shift_for_delete(r(2, 6));
        assert!(s.is_empty());
    }

    #[test]
    fn test_tag_index_queries() {
        let bold = TagName::new("bold");
        let red = TagName::new("text red");
        let mut index = TagIndex::new();
        index.add(&bold, r(0, 5));
        index.add(&red, r(3, 8));

        assert_eq!(index.tags_at(Position(4)), vec![bold.clone(), red.clone()]);
        assert_eq!(index.tags_at(Position(5)), vec![red.clone()]);
        assert!(index.tags_at(Position(8)).is_empty());

        assert_eq!(
            index.coverage_within(r(4, 6)),
            vec![(bold.clone(), vec![r(4, 5)]), (red.clone(), vec![r(4, 6)])]
        );

        index.remove(&bold, r(0, 5));
        assert!(index.ranges(&bold).is_empty());
        assert_eq!(index.applied_names().count(), 1);
    }
}
