//! Cross-category aggregation

use crate::breakdown::{merge_breakdown, pass_rate, Breakdown};
use crate::category::CategoryResult;
use crate::error::InvariantViolation;
use govbench_scenario::{Category, Difficulty, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall score across every category that ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    total_scenarios: usize,
    total_passed: usize,
    total_failed: usize,
    overall_pass_rate: f64,
    by_difficulty: Breakdown<Difficulty>,
    by_severity: Breakdown<Severity>,
}

impl AggregateScore {
    #[inline]
    #[must_use]
    pub fn total_scenarios(&self) -> usize {
        self.total_scenarios
    }

    #[inline]
    #[must_use]
    pub fn total_passed(&self) -> usize {
        self.total_passed
    }

    #[inline]
    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.total_failed
    }

    /// `total_passed / total_scenarios`, 0.0 when nothing ran
    #[inline]
    #[must_use]
    pub fn overall_pass_rate(&self) -> f64 {
        self.overall_pass_rate
    }

    #[inline]
    #[must_use]
    pub fn by_difficulty(&self) -> &Breakdown<Difficulty> {
        &self.by_difficulty
    }

    #[inline]
    #[must_use]
    pub fn by_severity(&self) -> &Breakdown<Severity> {
        &self.by_severity
    }

    /// Verify this aggregate is exactly the reduction of `results`
    ///
    /// Each category result is checked on its own first, then the totals
    /// and breakdowns are recomputed and compared.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_consistency(
        &self,
        results: &BTreeMap<Category, CategoryResult>,
    ) -> Result<(), InvariantViolation> {
        for (key, result) in results {
            if *key != result.category() {
                return Err(InvariantViolation::CategoryKey {
                    key: *key,
                    found: result.category(),
                });
            }
            result.check_invariants()?;
        }

        let expected = aggregate(results);
        let scope = || "aggregate".to_string();

        if self.total_passed + self.total_failed != self.total_scenarios {
            return Err(InvariantViolation::CountMismatch {
                scope: scope(),
                passed: self.total_passed,
                failed: self.total_failed,
                total: self.total_scenarios,
            });
        }
        if self.total_scenarios != expected.total_scenarios {
            return Err(InvariantViolation::ScoreCount {
                scope: scope(),
                total: self.total_scenarios,
                actual: expected.total_scenarios,
            });
        }
        if self.total_passed != expected.total_passed {
            return Err(InvariantViolation::PassedCount {
                scope: scope(),
                passed: self.total_passed,
                actual: expected.total_passed,
            });
        }
        if (self.overall_pass_rate - expected.overall_pass_rate).abs() > 1e-12 {
            return Err(InvariantViolation::PassRate {
                scope: scope(),
                actual: self.overall_pass_rate,
                expected: expected.overall_pass_rate,
            });
        }
        if self.by_difficulty != expected.by_difficulty {
            return Err(InvariantViolation::BreakdownMismatch {
                scope: scope(),
                breakdown: "difficulty",
            });
        }
        if self.by_severity != expected.by_severity {
            return Err(InvariantViolation::BreakdownMismatch {
                scope: scope(),
                breakdown: "severity",
            });
        }

        Ok(())
    }
}

/// Aggregate per-category results into an overall score
///
/// Totals are exact sums of the category fields. Breakdowns are merged
/// key-wise; categories need not report the same bucket keys.
#[must_use]
pub fn aggregate(results: &BTreeMap<Category, CategoryResult>) -> AggregateScore {
    let mut total_scenarios = 0;
    let mut total_passed = 0;
    let mut total_failed = 0;
    let mut by_difficulty = Breakdown::new();
    let mut by_severity = Breakdown::new();

    for result in results.values() {
        total_scenarios += result.total();
        total_passed += result.passed();
        total_failed += result.failed();
        merge_breakdown(&mut by_difficulty, result.by_difficulty());
        merge_breakdown(&mut by_severity, result.by_severity());
    }

    AggregateScore {
        total_scenarios,
        total_passed,
        total_failed,
        overall_pass_rate: pass_rate(total_passed, total_scenarios),
        by_difficulty,
        by_severity,
    }
}
