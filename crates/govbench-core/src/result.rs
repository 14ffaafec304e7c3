//! Benchmark result envelope

use chrono::{DateTime, Utc};
use govbench_scenario::{CatalogDigest, Category};
use govbench_scorer::{AggregateScore, CategoryResult, InvariantViolation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Error text for a requested category the catalog does not contain
pub const NO_SCENARIOS_FOUND: &str = "no_scenarios_found";

/// Unique identifier of one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A requested category that could not be executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub category: Category,
    pub error: String,
}

impl ExecutionError {
    /// The category is absent from the catalog
    #[must_use]
    pub fn no_scenarios(category: Category) -> Self {
        Self {
            category,
            error: NO_SCENARIOS_FOUND.to_string(),
        }
    }
}

/// Complete output of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub run_id: RunId,
    pub adapter_name: String,
    pub started_at: DateTime<Utc>,
    pub catalog_digest: CatalogDigest,
    /// Categories executed, in request order
    pub categories_run: Vec<Category>,
    pub aggregate: AggregateScore,
    pub category_results: BTreeMap<Category, CategoryResult>,
    /// Wall-clock duration of the run
    pub duration_seconds: f64,
    pub errors: Vec<ExecutionError>,
}

impl BenchmarkResult {
    /// Verify every counting invariant of the result
    ///
    /// `categories_run` must hold each category once and match the keys of
    /// `category_results` exactly; the aggregate must equal the reduction of
    /// the category results.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut run = BTreeSet::new();
        for category in &self.categories_run {
            if !run.insert(*category) {
                return Err(InvariantViolation::DuplicateCategory(*category));
            }
        }

        let reported: BTreeSet<Category> = self.category_results.keys().copied().collect();
        if let Some(category) = run.symmetric_difference(&reported).next() {
            return Err(InvariantViolation::CategorySet(*category));
        }

        self.aggregate.check_consistency(&self.category_results)
    }

    /// Whether any requested category failed to execute
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
