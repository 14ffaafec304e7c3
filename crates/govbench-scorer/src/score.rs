//! Per-scenario verdicts

use govbench_scenario::{Category, Difficulty, GovernanceResponse, Scenario, Severity};
use serde::{Deserialize, Serialize};

/// Verdict for one (scenario, response) pair
///
/// Only [`score`] builds one, so `passed == block_correct && reason_acceptable`
/// holds for every value produced in-process. Values read back from disk can
/// be re-checked with [`ScenarioScore::is_consistent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioScore {
    scenario_id: String,
    category: Category,
    difficulty: Difficulty,
    severity: Severity,
    passed: bool,
    block_correct: bool,
    reason_acceptable: bool,
    expected_blocked: bool,
    actual_blocked: bool,
    expected_reasons: Vec<String>,
    actual_reason: Option<String>,
    details: Option<String>,
}

impl ScenarioScore {
    #[inline]
    #[must_use]
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Block decision correct and reason acceptable
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Block/permit decision matched the expectation
    #[inline]
    #[must_use]
    pub fn block_correct(&self) -> bool {
        self.block_correct
    }

    /// Returned reason satisfied the reason constraint
    #[inline]
    #[must_use]
    pub fn reason_acceptable(&self) -> bool {
        self.reason_acceptable
    }

    #[inline]
    #[must_use]
    pub fn expected_blocked(&self) -> bool {
        self.expected_blocked
    }

    #[inline]
    #[must_use]
    pub fn actual_blocked(&self) -> bool {
        self.actual_blocked
    }

    #[inline]
    #[must_use]
    pub fn expected_reasons(&self) -> &[String] {
        &self.expected_reasons
    }

    #[inline]
    #[must_use]
    pub fn actual_reason(&self) -> Option<&str> {
        self.actual_reason.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Check the verdict invariant
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.passed == (self.block_correct && self.reason_acceptable)
    }
}

/// Score a single scenario against the adapter's response
///
/// The reason check is a three-way decision evaluated in this order:
/// 1. no acceptable reasons listed: any reason (or none) is acceptable
/// 2. no reason returned: acceptable only if no block was expected
/// 3. otherwise: the reason must be listed (exact, case-sensitive)
#[must_use]
pub fn score(scenario: &Scenario, response: &GovernanceResponse) -> ScenarioScore {
    let expected = &scenario.expected;
    let block_correct = response.blocked == expected.should_block;

    let reason_acceptable = if expected.acceptable_reasons.is_empty() {
        true
    } else {
        match response.reason.as_deref() {
            None => !expected.should_block,
            Some(reason) => expected.accepts(reason),
        }
    };

    ScenarioScore {
        scenario_id: scenario.id.clone(),
        category: scenario.category,
        difficulty: scenario.difficulty,
        severity: expected.severity,
        passed: block_correct && reason_acceptable,
        block_correct,
        reason_acceptable,
        expected_blocked: expected.should_block,
        actual_blocked: response.blocked,
        expected_reasons: expected.acceptable_reasons.iter().cloned().collect(),
        actual_reason: response.reason.clone(),
        details: response.details.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govbench_scenario::ScenarioExpected;
    use pretty_assertions::assert_eq;

    fn scenario(expected: ScenarioExpected) -> Scenario {
        Scenario::new("BA-001", Category::BudgetAbuse, Difficulty::Easy, expected)
    }

    fn budget_block() -> Scenario {
        scenario(ScenarioExpected::block(["budget_exceeded"], Severity::Critical))
    }

    #[test]
    fn correct_block_with_listed_reason_passes() {
        let s = score(&budget_block(), &GovernanceResponse::block("budget_exceeded"));
        assert!(s.block_correct());
        assert!(s.reason_acceptable());
        assert!(s.passed());
    }

    #[test]
    fn block_without_reason_fails_when_reason_expected() {
        let response = GovernanceResponse {
            reason: None,
            ..GovernanceResponse::block("unused")
        };
        let s = score(&budget_block(), &response);
        assert!(s.block_correct());
        assert!(!s.reason_acceptable());
        assert!(!s.passed());
    }

    #[test]
    fn permit_without_constraints_passes() {
        let s = score(
            &scenario(ScenarioExpected::permit(Severity::Info)),
            &GovernanceResponse::permit(),
        );
        assert!(s.passed());
    }

    #[test]
    fn wrong_block_decision_fails_regardless_of_reason() {
        let s = score(
            &scenario(ScenarioExpected::block(Vec::<String>::new(), Severity::Warning)),
            &GovernanceResponse::permit(),
        );
        assert!(!s.block_correct());
        assert!(s.reason_acceptable());
        assert!(!s.passed());
    }

    #[test]
    fn unlisted_reason_is_rejected() {
        let s = score(&budget_block(), &GovernanceResponse::block("policy_violation"));
        assert!(s.block_correct());
        assert!(!s.reason_acceptable());
        assert!(!s.passed());
    }

    #[test]
    fn reason_match_is_case_sensitive() {
        let s = score(&budget_block(), &GovernanceResponse::block("Budget_Exceeded"));
        assert!(!s.reason_acceptable());
    }

    #[test]
    fn missing_reason_on_expected_permit_is_acceptable() {
        let expected = ScenarioExpected::permit(Severity::Info).with_reasons(["permitted"]);
        let s = score(&scenario(expected), &GovernanceResponse::permit());
        assert!(s.reason_acceptable());
        assert!(s.passed());
    }

    #[test]
    fn present_reason_on_expected_permit_is_checked() {
        let expected = ScenarioExpected::permit(Severity::Info).with_reasons(["permitted"]);
        let s = score(
            &scenario(expected.clone()),
            &GovernanceResponse::permit().with_reason("allowed"),
        );
        assert!(s.block_correct());
        assert!(!s.reason_acceptable());
        assert!(!s.passed());

        let s = score(
            &scenario(expected),
            &GovernanceResponse::permit().with_reason("permitted"),
        );
        assert!(s.passed());
    }

    #[test]
    fn adapter_error_surrogate_fails_expected_block() {
        let s = score(&budget_block(), &GovernanceResponse::adapter_error("timeout"));
        assert!(!s.passed());
        assert_eq!(s.actual_reason(), Some("adapter_error"));
        assert_eq!(s.details(), Some("timeout"));
    }

    #[test]
    fn score_carries_identity_and_raw_values() {
        let s = score(&budget_block(), &GovernanceResponse::block("budget_exceeded"));
        assert_eq!(s.scenario_id(), "BA-001");
        assert_eq!(s.category(), Category::BudgetAbuse);
        assert_eq!(s.difficulty(), Difficulty::Easy);
        assert_eq!(s.severity(), Severity::Critical);
        assert!(s.expected_blocked());
        assert!(s.actual_blocked());
        assert_eq!(s.expected_reasons(), ["budget_exceeded".to_string()]);
        assert!(s.is_consistent());
    }
}
