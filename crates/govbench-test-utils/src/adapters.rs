//! Test adapters
//!
//! Baselines bracket the score range: [`PermitAllAdapter`] is the floor and
//! [`OracleAdapter`] (with `expose_expected`) the ceiling.

use async_trait::async_trait;
use govbench_core::{AdapterConfig, AdapterError, GovernanceAdapter};
use govbench_scenario::{GovernanceResponse, ScenarioInput};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Permits every action without inspection
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAllAdapter;

#[async_trait]
impl GovernanceAdapter for PermitAllAdapter {
    fn name(&self) -> String {
        "NoGovernance (permit-all baseline)".to_string()
    }

    fn is_reentrant(&self) -> bool {
        true
    }

    async fn decide(&self, _input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
        Ok(GovernanceResponse::permit().with_details("No governance: all actions permitted."))
    }
}

#[derive(Debug, Default)]
struct OracleState {
    should_block: bool,
    reason: Option<String>,
}

/// Echoes the expected outcome it was handed in `prepare`
///
/// Only meaningful with `RunnerConfig::expose_expected`. Holds per-scenario
/// state, so it is not reentrant.
#[derive(Debug, Default)]
pub struct OracleAdapter {
    state: Mutex<OracleState>,
}

impl OracleAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GovernanceAdapter for OracleAdapter {
    fn name(&self) -> String {
        "PerfectGovernance (oracle baseline)".to_string()
    }

    async fn prepare(&self, config: &AdapterConfig) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        state.should_block = config
            .get("should_block")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        state.reason = config
            .get("acceptable_reasons")
            .and_then(Value::as_array)
            .and_then(|reasons| reasons.first())
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(())
    }

    async fn decide(&self, _input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
        let state = self.state.lock();
        let mut response = GovernanceResponse::permit();
        response.blocked = state.should_block;
        response.reason.clone_from(&state.reason);
        Ok(response.with_details("PerfectGovernance oracle: always correct."))
    }

    async fn release(&self) -> Result<(), AdapterError> {
        *self.state.lock() = OracleState::default();
        Ok(())
    }
}

/// Small rule engine: trust level and budget thresholds
#[derive(Debug, Clone, Copy)]
pub struct ThresholdAdapter {
    pub max_trust_level: i64,
    pub budget_limit: f64,
}

impl Default for ThresholdAdapter {
    fn default() -> Self {
        Self {
            max_trust_level: 2,
            budget_limit: 100.0,
        }
    }
}

#[async_trait]
impl GovernanceAdapter for ThresholdAdapter {
    fn name(&self) -> String {
        "ThresholdRules v0.1".to_string()
    }

    fn is_reentrant(&self) -> bool {
        true
    }

    async fn decide(&self, input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
        if let Some(level) = input.get("requested_trust_level").and_then(Value::as_i64) {
            if level > self.max_trust_level {
                return Ok(GovernanceResponse::block("trust_level_denied").with_details(format!(
                    "requested level {level} exceeds max {}",
                    self.max_trust_level
                )));
            }
        }
        if let Some(amount) = input.get("amount").and_then(Value::as_f64) {
            if amount > self.budget_limit {
                return Ok(GovernanceResponse::block("budget_exceeded").with_details(format!(
                    "amount {amount} exceeds limit {}",
                    self.budget_limit
                )));
            }
        }
        Ok(GovernanceResponse::permit().with_reason("permitted"))
    }
}

/// Which lifecycle phase a [`FailingAdapter`] fails in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    Prepare,
    Decide,
    Release,
}

/// Fails one lifecycle phase on every scenario; otherwise blocks
#[derive(Debug, Clone)]
pub struct FailingAdapter {
    phase: FailurePhase,
    message: String,
}

impl FailingAdapter {
    #[must_use]
    pub fn new(phase: FailurePhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }

    /// Fails in `decide`
    #[must_use]
    pub fn on_decide(message: impl Into<String>) -> Self {
        Self::new(FailurePhase::Decide, message)
    }
}

#[async_trait]
impl GovernanceAdapter for FailingAdapter {
    async fn prepare(&self, _config: &AdapterConfig) -> Result<(), AdapterError> {
        match self.phase {
            FailurePhase::Prepare => Err(AdapterError::prepare(self.message.clone())),
            _ => Ok(()),
        }
    }

    async fn decide(&self, _input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
        match self.phase {
            FailurePhase::Decide => Err(AdapterError::decide(self.message.clone())),
            _ => Ok(GovernanceResponse::block("denied")),
        }
    }

    async fn release(&self) -> Result<(), AdapterError> {
        match self.phase {
            FailurePhase::Release => Err(AdapterError::Release(self.message.clone())),
            _ => Ok(()),
        }
    }
}

/// A lifecycle call observed by [`RecordingAdapter`]
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Prepare(AdapterConfig),
    Decide(ScenarioInput),
    Release,
}

/// Wraps an adapter, recording every lifecycle call
///
/// Also tracks how many triples were in flight at once, which is what the
/// concurrency tests assert on. An optional delay inside `decide` widens
/// the window for overlap.
#[derive(Debug)]
pub struct RecordingAdapter<A> {
    inner: A,
    reentrant: bool,
    delay: Option<Duration>,
    events: Mutex<Vec<LifecycleEvent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl<A: GovernanceAdapter> RecordingAdapter<A> {
    /// Wrap `inner`, inheriting its reentrancy
    #[must_use]
    pub fn new(inner: A) -> Self {
        let reentrant = inner.is_reentrant();
        Self {
            inner,
            reentrant,
            delay: None,
            events: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Override reported reentrancy
    #[must_use]
    pub fn with_reentrant(mut self, reentrant: bool) -> Self {
        self.reentrant = reentrant;
        self
    }

    /// Sleep inside every `decide`
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call seen so far, in order
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().clone()
    }

    /// Number of calls of one kind
    #[must_use]
    pub fn count(&self, matches: impl Fn(&LifecycleEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|event| matches(event)).count()
    }

    #[must_use]
    pub fn prepares(&self) -> usize {
        self.count(|event| matches!(event, LifecycleEvent::Prepare(_)))
    }

    #[must_use]
    pub fn decides(&self) -> usize {
        self.count(|event| matches!(event, LifecycleEvent::Decide(_)))
    }

    #[must_use]
    pub fn releases(&self) -> usize {
        self.count(|event| matches!(event, LifecycleEvent::Release))
    }

    /// Largest number of triples observed in flight at once
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<A: GovernanceAdapter> GovernanceAdapter for RecordingAdapter<A> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn prepare(&self, config: &AdapterConfig) -> Result<(), AdapterError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.events.lock().push(LifecycleEvent::Prepare(config.clone()));
        self.inner.prepare(config).await
    }

    async fn decide(&self, input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
        self.events.lock().push(LifecycleEvent::Decide(input.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.decide(input).await
    }

    async fn release(&self) -> Result<(), AdapterError> {
        self.events.lock().push(LifecycleEvent::Release);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.release().await
    }
}
