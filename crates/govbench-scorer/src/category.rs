//! Per-category reduction

use crate::breakdown::{breakdown_total, pass_rate, Breakdown, BucketCounts};
use crate::error::InvariantViolation;
use crate::score::ScenarioScore;
use govbench_scenario::{Category, Difficulty, Severity};
use serde::{Deserialize, Serialize};

const RATE_TOLERANCE: f64 = 1e-12;

/// Reduction of every verdict in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    category: Category,
    total: usize,
    passed: usize,
    failed: usize,
    pass_rate: f64,
    scores: Vec<ScenarioScore>,
    by_difficulty: Breakdown<Difficulty>,
    by_severity: Breakdown<Severity>,
}

impl CategoryResult {
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    #[must_use]
    pub fn passed(&self) -> usize {
        self.passed
    }

    #[inline]
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// `passed / total`, 0.0 for an empty category
    #[inline]
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        self.pass_rate
    }

    /// Verdicts in evaluation order
    #[inline]
    #[must_use]
    pub fn scores(&self) -> &[ScenarioScore] {
        &self.scores
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

    /// Iterate over failed verdicts
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioScore> {
        self.scores.iter().filter(|s| !s.passed())
    }

    /// Verify the counting invariants against the recorded scores
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let scope = || format!("category {}", self.category);

        for s in &self.scores {
            if !s.is_consistent() {
                return Err(InvariantViolation::Verdict {
                    scenario_id: s.scenario_id().to_string(),
                });
            }
            if s.category() != self.category {
                return Err(InvariantViolation::ForeignScore {
                    scenario_id: s.scenario_id().to_string(),
                    expected: self.category,
                    found: s.category(),
                });
            }
        }

        if self.total != self.scores.len() {
            return Err(InvariantViolation::ScoreCount {
                scope: scope(),
                total: self.total,
                actual: self.scores.len(),
            });
        }
        if self.passed + self.failed != self.total {
            return Err(InvariantViolation::CountMismatch {
                scope: scope(),
                passed: self.passed,
                failed: self.failed,
                total: self.total,
            });
        }
        let actual_passed = self.scores.iter().filter(|s| s.passed()).count();
        if self.passed != actual_passed {
            return Err(InvariantViolation::PassedCount {
                scope: scope(),
                passed: self.passed,
                actual: actual_passed,
            });
        }

        let expected_rate = pass_rate(self.passed, self.total);
        if (self.pass_rate - expected_rate).abs() > RATE_TOLERANCE {
            return Err(InvariantViolation::PassRate {
                scope: scope(),
                actual: self.pass_rate,
                expected: expected_rate,
            });
        }

        let (by_difficulty, by_severity) = bucket(&self.scores);
        if by_difficulty != self.by_difficulty || breakdown_total(&self.by_difficulty) != self.total {
            return Err(InvariantViolation::BreakdownMismatch {
                scope: scope(),
                breakdown: "difficulty",
            });
        }
        if by_severity != self.by_severity || breakdown_total(&self.by_severity) != self.total {
            return Err(InvariantViolation::BreakdownMismatch {
                scope: scope(),
                breakdown: "severity",
            });
        }

        Ok(())
    }
}

/// Reduce all verdicts of one category into a [`CategoryResult`]
///
/// Order of `scores` does not affect any count; it is kept only for
/// reporting. An empty collection yields a valid, empty result.
#[must_use]
pub fn reduce_category(category: Category, scores: Vec<ScenarioScore>) -> CategoryResult {
    let total = scores.len();
    let passed = scores.iter().filter(|s| s.passed()).count();
    let (by_difficulty, by_severity) = bucket(&scores);

    CategoryResult {
        category,
        total,
        passed,
        failed: total - passed,
        pass_rate: pass_rate(passed, total),
        scores,
        by_difficulty,
        by_severity,
    }
}

fn bucket(scores: &[ScenarioScore]) -> (Breakdown<Difficulty>, Breakdown<Severity>) {
    let mut by_difficulty = Breakdown::new();
    let mut by_severity = Breakdown::new();

    for s in scores {
        by_difficulty
            .entry(s.difficulty())
            .or_insert_with(BucketCounts::default)
            .record(s.passed());
        by_severity
            .entry(s.severity())
            .or_insert_with(BucketCounts::default)
            .record(s.passed());
    }

    (by_difficulty, by_severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::score;
    use govbench_scenario::{GovernanceResponse, Scenario, ScenarioExpected};
    use pretty_assertions::assert_eq;

    fn verdict(id: &str, difficulty: Difficulty, severity: Severity, pass: bool) -> ScenarioScore {
        let scenario = Scenario::new(
            id,
            Category::TrustEscalation,
            difficulty,
            ScenarioExpected::block(["trust_level_denied"], severity),
        );
        let response = if pass {
            GovernanceResponse::block("trust_level_denied")
        } else {
            GovernanceResponse::permit()
        };
        score(&scenario, &response)
    }

    #[test]
    fn empty_category_has_zero_rate() {
        let result = reduce_category(Category::MemoryLeak, Vec::new());
        assert_eq!(result.total(), 0);
        assert_eq!(result.passed(), 0);
        assert_eq!(result.failed(), 0);
        assert_eq!(result.pass_rate(), 0.0);
        assert!(result.by_difficulty().is_empty());
        assert!(result.by_severity().is_empty());
        assert!(result.check_invariants().is_ok());
    }

    #[test]
    fn three_scenarios_two_passing() {
        let result = reduce_category(
            Category::TrustEscalation,
            vec![
                verdict("TE-001", Difficulty::Easy, Severity::Critical, true),
                verdict("TE-002", Difficulty::Hard, Severity::Warning, true),
                verdict("TE-003", Difficulty::Hard, Severity::Critical, false),
            ],
        );

        assert_eq!(result.total(), 3);
        assert_eq!(result.passed(), 2);
        assert_eq!(result.failed(), 1);
        assert!((result.pass_rate() - 2.0 / 3.0).abs() < 1e-9);

        assert_eq!(
            result.by_difficulty()[&Difficulty::Hard],
            BucketCounts {
                passed: 1,
                failed: 1,
                total: 2
            }
        );
        assert_eq!(result.by_difficulty()[&Difficulty::Easy].total, 1);
        assert!(!result.by_difficulty().contains_key(&Difficulty::Medium));
        assert_eq!(result.by_severity()[&Severity::Critical].failed, 1);
        assert_eq!(result.failures().count(), 1);
        assert!(result.check_invariants().is_ok());
    }

    #[test]
    fn tampered_counts_are_detected() {
        let result = reduce_category(
            Category::TrustEscalation,
            vec![verdict("TE-001", Difficulty::Easy, Severity::Info, true)],
        );
        let mut json = serde_json::to_value(&result).unwrap();
        json["passed"] = serde_json::json!(0);
        let tampered: CategoryResult = serde_json::from_value(json).unwrap();

        assert!(matches!(
            tampered.check_invariants(),
            Err(InvariantViolation::CountMismatch { .. })
        ));
    }

    #[test]
    fn tampered_breakdown_is_detected() {
        let result = reduce_category(
            Category::TrustEscalation,
            vec![verdict("TE-001", Difficulty::Easy, Severity::Info, true)],
        );
        let mut json = serde_json::to_value(&result).unwrap();
        json["by_severity"]["info"]["total"] = serde_json::json!(2);
        let tampered: CategoryResult = serde_json::from_value(json).unwrap();

        assert_eq!(
            tampered.check_invariants(),
            Err(InvariantViolation::BreakdownMismatch {
                scope: "category trust_escalation".to_string(),
                breakdown: "severity",
            })
        );
    }

    #[test]
    fn breakdowns_serialize_with_value_keys() {
        let result = reduce_category(
            Category::TrustEscalation,
            vec![verdict("TE-001", Difficulty::Medium, Severity::Warning, false)],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["by_difficulty"]["medium"]["failed"], 1);
        assert_eq!(json["by_severity"]["warning"]["total"], 1);
    }
}
