//! Testing utilities for the governance benchmark workspace
//!
//! Shared test adapters, scenario builders and on-disk catalog fixtures.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

mod adapters;
mod fixtures;

pub use adapters::{
    FailingAdapter, FailurePhase, LifecycleEvent, OracleAdapter, PermitAllAdapter,
    RecordingAdapter, ThresholdAdapter,
};
pub use fixtures::{blocking, permitting, sample_scenarios, with_input, CatalogFixture};

use govbench_core::{BenchmarkRunner, GovernanceAdapter, RunnerConfig, ScenarioCatalog};
use std::sync::Arc;

/// Runner over an in-memory catalog
pub fn runner_for(
    adapter: Arc<dyn GovernanceAdapter>,
    scenarios: Vec<govbench_scenario::Scenario>,
    config: RunnerConfig,
) -> BenchmarkRunner {
    BenchmarkRunner::new(adapter, Arc::new(ScenarioCatalog::from_scenarios(scenarios)))
        .with_config(config)
}
