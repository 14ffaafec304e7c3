//! Invariant violations
//!
//! Results produced in-process satisfy every invariant by construction.
//! These errors surface when a result read back from storage has been
//! tampered with or produced by something else.

use govbench_scenario::Category;

/// A result structure breaks one of its counting invariants
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// passed + failed != total
    #[error("{scope}: passed ({passed}) + failed ({failed}) != total ({total})")]
    CountMismatch {
        scope: String,
        passed: usize,
        failed: usize,
        total: usize,
    },

    /// total disagrees with the number of recorded scores
    #[error("{scope}: total {total} but {actual} scores recorded")]
    ScoreCount {
        scope: String,
        total: usize,
        actual: usize,
    },

    /// passed count disagrees with the recorded verdicts
    #[error("{scope}: passed {passed} but {actual} scores passed")]
    PassedCount {
        scope: String,
        passed: usize,
        actual: usize,
    },

    /// Breakdown buckets do not partition the total
    #[error("{scope}: {breakdown} buckets differ from the expected counts")]
    BreakdownMismatch {
        scope: String,
        breakdown: &'static str,
    },

    /// Stored pass rate is not passed / total
    #[error("{scope}: pass rate {actual} != {expected}")]
    PassRate {
        scope: String,
        actual: f64,
        expected: f64,
    },

    /// A verdict whose `passed` flag contradicts its components
    #[error("score {scenario_id}: passed != block_correct && reason_acceptable")]
    Verdict { scenario_id: String },

    /// A score filed under the wrong category
    #[error("score {scenario_id} belongs to {found}, filed under {expected}")]
    ForeignScore {
        scenario_id: String,
        expected: Category,
        found: Category,
    },

    /// Category result keyed under a different category than it reports
    #[error("category result keyed as {key} reports {found}")]
    CategoryKey { key: Category, found: Category },

    /// A run's category set and result map disagree
    #[error("category {0} is not both run and reported")]
    CategorySet(Category),

    /// A category listed twice in a run
    #[error("category {0} run more than once")]
    DuplicateCategory(Category),
}
