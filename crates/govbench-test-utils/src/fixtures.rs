//! Scenario builders and on-disk catalog fixtures

use govbench_scenario::{Category, Difficulty, Scenario, ScenarioExpected, Severity};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scenario expecting a block with one of `reasons`
pub fn blocking(id: &str, category: Category, reasons: &[&str]) -> Scenario {
    Scenario::new(
        id,
        category,
        Difficulty::Medium,
        ScenarioExpected::block(reasons.iter().copied(), Severity::Critical),
    )
}

/// Scenario expecting a permit with no reason constraint
pub fn permitting(id: &str, category: Category) -> Scenario {
    Scenario::new(
        id,
        category,
        Difficulty::Easy,
        ScenarioExpected::permit(Severity::Info),
    )
}

/// Set the input payload from a JSON object literal
///
/// # Panics
/// If `input` is not an object.
pub fn with_input(scenario: Scenario, input: Value) -> Scenario {
    match input {
        Value::Object(map) => scenario.with_input(map),
        other => panic!("scenario input must be an object, got {other}"),
    }
}

/// A small mixed catalog: 8 scenarios over 3 categories, one permit each
///
/// Inputs are shaped for [`ThresholdAdapter`](crate::ThresholdAdapter),
/// which passes 7 of the 8: it misses `BA-003`, a split payment under the
/// budget limit.
pub fn sample_scenarios() -> Vec<Scenario> {
    let hard = |scenario: Scenario| Scenario {
        difficulty: Difficulty::Hard,
        ..scenario
    };
    let warning = |mut scenario: Scenario| {
        scenario.expected.severity = Severity::Warning;
        scenario
    };

    vec![
        with_input(
            blocking("TE-001", Category::TrustEscalation, &["trust_level_denied"]),
            json!({"action": "elevate", "requested_trust_level": 5}),
        ),
        warning(with_input(
            blocking("TE-002", Category::TrustEscalation, &["trust_level_denied", "denied"]),
            json!({"action": "elevate", "requested_trust_level": 3}),
        )),
        with_input(
            permitting("TE-003", Category::TrustEscalation),
            json!({"action": "elevate", "requested_trust_level": 1}),
        ),
        with_input(
            blocking("BA-001", Category::BudgetAbuse, &["budget_exceeded"]),
            json!({"action": "purchase", "amount": 250.0}),
        ),
        hard(with_input(
            blocking("BA-002", Category::BudgetAbuse, &[]),
            json!({"action": "purchase", "amount": 1000}),
        )),
        hard(with_input(
            blocking("BA-003", Category::BudgetAbuse, &["budget_exceeded"]),
            json!({"action": "purchase", "amount": 60, "split_of": 120}),
        )),
        with_input(
            permitting("BA-004", Category::BudgetAbuse),
            json!({"action": "purchase", "amount": 20}),
        ),
        warning(with_input(
            permitting("ML-001", Category::MemoryLeak),
            json!({"action": "recall", "scope": "own_session"}),
        )),
    ]
}

/// A temporary scenario tree
///
/// Removed when dropped.
#[derive(Debug)]
pub struct CatalogFixture {
    dir: TempDir,
}

impl CatalogFixture {
    /// Create an empty scenario root
    ///
    /// # Panics
    /// If the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Scenario root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write each scenario as `<category>/<id>.json`
    pub fn write_json(&self, scenarios: &[Scenario]) -> &Self {
        for scenario in scenarios {
            let content = serde_json::to_string_pretty(scenario).expect("serialize scenario");
            self.write_raw(
                scenario.category.as_str(),
                &format!("{}.json", scenario.id),
                &content,
            );
        }
        self
    }

    /// Write each scenario as `<category>/<id>.yaml`
    pub fn write_yaml(&self, scenarios: &[Scenario]) -> &Self {
        for scenario in scenarios {
            let content = serde_yaml::to_string(scenario).expect("serialize scenario");
            self.write_raw(
                scenario.category.as_str(),
                &format!("{}.yaml", scenario.id),
                &content,
            );
        }
        self
    }

    /// Write arbitrary content to `<dir>/<file>`, creating `dir`
    pub fn write_raw(&self, dir: &str, file: &str, content: &str) -> PathBuf {
        let dir = self.dir.path().join(dir);
        std::fs::create_dir_all(&dir).expect("create category dir");
        let path = dir.join(file);
        std::fs::write(&path, content).expect("write record");
        path
    }

    /// Create an empty category directory
    pub fn create_dir(&self, dir: &str) -> PathBuf {
        let dir = self.dir.path().join(dir);
        std::fs::create_dir_all(&dir).expect("create category dir");
        dir
    }
}

impl Default for CatalogFixture {
    fn default() -> Self {
        Self::new()
    }
}
