//! Difficulty and severity breakdowns

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pass/fail counts for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl BucketCounts {
    /// Count one verdict
    #[inline]
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Add another bucket's counts to this one
    #[inline]
    pub fn absorb(&mut self, other: &BucketCounts) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.total += other.total;
    }

    /// `passed / total`, 0.0 for an empty bucket
    #[inline]
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.passed, self.total)
    }

    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.passed + self.failed == self.total
    }
}

/// Bucket key → counts, iterated in key order
pub type Breakdown<K> = BTreeMap<K, BucketCounts>;

/// Merge `from` into `into`, summing counts key-wise
///
/// A key missing on either side contributes zero, so disjoint key sets
/// produce their union and overlapping keys add up.
pub fn merge_breakdown<K: Ord + Copy>(into: &mut Breakdown<K>, from: &Breakdown<K>) {
    for (key, counts) in from {
        into.entry(*key).or_default().absorb(counts);
    }
}

/// `passed / total` guarded against an empty denominator
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    }
}

pub(crate) fn breakdown_total<K>(breakdown: &Breakdown<K>) -> usize {
    breakdown.values().map(|c| c.total).sum()
}
