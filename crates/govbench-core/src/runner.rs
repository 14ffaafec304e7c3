//! Benchmark runner
//!
//! Drives the adapter through prepare → decide → release for every
//! scenario of the requested categories and reduces the verdicts.
//!
//! Two execution modes:
//! - serial (`concurrency == 1`): scenarios run in catalog order and each
//!   lifecycle triple holds the adapter's lifecycle lock, shared by every
//!   runner built on the same adapter instance
//! - bounded (`concurrency > 1`, reentrant adapters only): at most
//!   `concurrency` triples in flight, scores still in catalog order
//!
//! Adapter failures never abort a run. A failed or panicking `prepare` or
//! `decide` is scored as a permit with reason `adapter_error`.

use crate::adapter::{AdapterConfig, GovernanceAdapter};
use crate::catalog::ScenarioCatalog;
use crate::config::RunnerConfig;
use crate::error::AdapterError;
use crate::result::{BenchmarkResult, ExecutionError, RunId};
use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use govbench_scenario::{Category, GovernanceResponse, Scenario};
use govbench_scorer::{aggregate, reduce_category, score, CategoryResult, ScenarioScore};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};

/// Runs scenarios from a catalog against one adapter
pub struct BenchmarkRunner {
    adapter: Arc<dyn GovernanceAdapter>,
    catalog: Arc<ScenarioCatalog>,
    config: RunnerConfig,
    /// Held for the whole triple in serial mode
    lifecycle: Arc<Mutex<()>>,
}

impl BenchmarkRunner {
    /// Create a serial runner with default configuration
    #[must_use]
    pub fn new(adapter: Arc<dyn GovernanceAdapter>, catalog: Arc<ScenarioCatalog>) -> Self {
        Self {
            lifecycle: lifecycle_lock(&adapter),
            adapter,
            catalog,
            config: RunnerConfig::default(),
        }
    }

    /// With runner configuration
    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn adapter(&self) -> &dyn GovernanceAdapter {
        self.adapter.as_ref()
    }

    /// Run the requested categories, or all eight when `None` or empty
    ///
    /// Categories absent from the catalog are reported in `errors` and left
    /// out of `categories_run`. A category requested twice runs once.
    pub async fn run(&self, categories: Option<&[Category]>) -> BenchmarkResult {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let clock = Instant::now();
        let adapter_name = self.adapter.name();
        let requested = match categories {
            Some(categories) if !categories.is_empty() => categories.to_vec(),
            _ => Category::ALL.to_vec(),
        };
        let concurrency = self.effective_concurrency();

        tracing::info!(
            %run_id,
            adapter = %adapter_name,
            categories = requested.len(),
            concurrency,
            "benchmark run started"
        );

        let mut seen = BTreeSet::new();
        let mut categories_run = Vec::with_capacity(requested.len());
        let mut category_results = BTreeMap::new();
        let mut errors = Vec::new();

        for category in requested {
            if !seen.insert(category) {
                tracing::debug!(%run_id, %category, "category requested twice, running once");
                continue;
            }
            if !self.catalog.contains(category) {
                tracing::warn!(%run_id, %category, "no scenarios found for category");
                errors.push(ExecutionError::no_scenarios(category));
                continue;
            }

            let result = self.evaluate_category(category, concurrency).await;
            categories_run.push(category);
            category_results.insert(category, result);
        }

        let aggregate = aggregate(&category_results);
        let duration_seconds = clock.elapsed().as_secs_f64();

        tracing::info!(
            %run_id,
            passed = aggregate.total_passed(),
            total = aggregate.total_scenarios(),
            pass_rate = aggregate.overall_pass_rate(),
            errors = errors.len(),
            duration_seconds,
            "benchmark run finished"
        );

        BenchmarkResult {
            run_id,
            adapter_name,
            started_at,
            catalog_digest: self.catalog.digest(),
            categories_run,
            aggregate,
            category_results,
            duration_seconds,
            errors,
        }
    }

    /// Run every scenario of one category
    ///
    /// A category absent from the catalog reduces to an empty result.
    pub async fn run_category(&self, category: Category) -> CategoryResult {
        let concurrency = self.effective_concurrency();
        self.evaluate_category(category, concurrency).await
    }

    /// Run one scenario through the full adapter lifecycle
    pub async fn run_single(&self, scenario: &Scenario) -> ScenarioScore {
        if self.is_bounded() {
            self.evaluate(scenario).await
        } else {
            let _guard = self.lifecycle.lock().await;
            self.evaluate(scenario).await
        }
    }

    async fn evaluate_category(&self, category: Category, concurrency: usize) -> CategoryResult {
        let scenarios = self.catalog.scenarios(category).unwrap_or_default();
        tracing::info!(%category, scenarios = scenarios.len(), "running category");

        let scores = if concurrency > 1 {
            let limiter = Semaphore::new(concurrency);
            let limiter = &limiter;
            join_all(scenarios.iter().map(|scenario| async move {
                // never closed
                let _permit = limiter.acquire().await.ok();
                self.evaluate(scenario).await
            }))
            .await
        } else {
            let mut scores = Vec::with_capacity(scenarios.len());
            for scenario in scenarios {
                scores.push(self.run_single(scenario).await);
            }
            scores
        };

        let result = reduce_category(category, scores);
        tracing::info!(
            %category,
            passed = result.passed(),
            total = result.total(),
            "category finished"
        );
        result
    }

    /// One prepare → decide → release triple, then score
    async fn evaluate(&self, scenario: &Scenario) -> ScenarioScore {
        let category = scenario.category.as_str();
        let config = self.prepare_config(scenario);

        let response = match self.prepare_and_decide(scenario, &config).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(scenario = %scenario.id, error = %err, "adapter failed");
                metrics::counter!("govbench_adapter_errors_total", "category" => category)
                    .increment(1);
                GovernanceResponse::adapter_error(err.to_string())
            }
        };

        if let Err(err) = guarded("release", self.adapter.release()).await {
            tracing::warn!(scenario = %scenario.id, error = %err, "adapter release failed");
        }

        let verdict = score(scenario, &response);
        let outcome = if verdict.passed() { "pass" } else { "fail" };
        metrics::counter!(
            "govbench_scenarios_scored_total",
            "category" => category,
            "outcome" => outcome
        )
        .increment(1);
        tracing::debug!(
            scenario = %scenario.id,
            blocked = response.blocked,
            reason = response.reason.as_deref().unwrap_or("-"),
            outcome,
            "scenario scored"
        );
        verdict
    }

    async fn prepare_and_decide(
        &self,
        scenario: &Scenario,
        config: &AdapterConfig,
    ) -> Result<GovernanceResponse, AdapterError> {
        guarded("prepare", self.adapter.prepare(config)).await?;

        let started = Instant::now();
        let response = guarded("decide", self.adapter.decide(&scenario.input)).await;
        metrics::histogram!("govbench_decide_seconds", "category" => scenario.category.as_str())
            .record(started.elapsed().as_secs_f64());
        response
    }

    fn prepare_config(&self, scenario: &Scenario) -> AdapterConfig {
        let mut config = self.config.adapter_config.clone();
        if self.config.expose_expected {
            let expected = &scenario.expected;
            config.insert("should_block".to_string(), Value::Bool(expected.should_block));
            config.insert(
                "acceptable_reasons".to_string(),
                Value::Array(
                    expected
                        .acceptable_reasons
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
            config.insert(
                "severity".to_string(),
                Value::String(expected.severity.as_str().to_string()),
            );
        }
        config
    }

    fn is_bounded(&self) -> bool {
        self.config.concurrency > 1 && self.adapter.is_reentrant()
    }

    fn effective_concurrency(&self) -> usize {
        if self.is_bounded() {
            self.config.concurrency
        } else {
            if self.config.concurrency > 1 {
                tracing::warn!(
                    adapter = %self.adapter.name(),
                    requested = self.config.concurrency,
                    "adapter is not reentrant, running serially"
                );
            }
            1
        }
    }
}

impl std::fmt::Debug for BenchmarkRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkRunner")
            .field("adapter", &self.adapter.name())
            .field("scenarios", &self.catalog.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Lifecycle lock of an adapter instance
///
/// Keyed by the adapter's allocation. Entries are weak, so a lock lives as
/// long as some runner holds it, and that runner keeps the adapter (and
/// therefore the key) alive.
fn lifecycle_lock(adapter: &Arc<dyn GovernanceAdapter>) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<parking_lot::Mutex<HashMap<usize, Weak<Mutex<()>>>>> = OnceLock::new();

    let key = Arc::as_ptr(adapter).cast::<()>() as usize;
    let mut locks = LOCKS.get_or_init(Default::default).lock();
    if let Some(lock) = locks.get(&key).and_then(Weak::upgrade) {
        return lock;
    }

    locks.retain(|_, lock| lock.strong_count() > 0);
    let lock = Arc::new(Mutex::new(()));
    locks.insert(key, Arc::downgrade(&lock));
    lock
}

/// Await an adapter call, turning a panic into an error
async fn guarded<T>(
    phase: &'static str,
    call: impl Future<Output = Result<T, AdapterError>>,
) -> Result<T, AdapterError> {
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or(Err(AdapterError::Panicked { phase }))
}
