use std::collections::BTreeMap;

use serde::Serialize;

/// Sparse outcome → occurrence count map, iterated in ascending outcome order.
///
/// Only observed outcomes are stored. Merging is associative and commutative,
/// so histograms from independent runs can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeHistogram {
    counts: BTreeMap<u64, u64>,
    total: u64,
}

impl OutcomeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: u64) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        for (&outcome, &count) in &other.counts {
            *self.counts.entry(outcome).or_insert(0) += count;
        }
        self.total += other.total;
    }

    /// Number of recorded trials.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, outcome: u64) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&outcome, &count)| (outcome, count))
    }

    /// `(outcome, count / total)` in ascending outcome order.
    pub fn relative_frequencies(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        let total = self.total as f64;
        self.iter()
            .map(move |(outcome, count)| (outcome, count as f64 / total))
    }

    /// Most frequent outcome and its count. The lowest outcome wins ties.
    pub fn mode(&self) -> Option<(u64, u64)> {
        let mut best: Option<(u64, u64)> = None;
        for (outcome, count) in self.iter() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((outcome, count));
            }
        }
        best
    }
}

impl FromIterator<u64> for OutcomeHistogram {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for outcome in iter {
            histogram.record(outcome);
        }
        histogram
    }
}
