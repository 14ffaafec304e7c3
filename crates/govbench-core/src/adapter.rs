//! Governance adapter capability
//!
//! Implement [`GovernanceAdapter`] to connect a governance system to the
//! benchmark. The runner drives three phases per scenario:
//!
//! 1. `prepare` with the per-scenario configuration
//! 2. `decide` with the scenario's input payload, verbatim
//! 3. `release`, always, even when `prepare` or `decide` failed
//!
//! ```rust,ignore
//! struct RuleEngine;
//!
//! #[async_trait::async_trait]
//! impl GovernanceAdapter for RuleEngine {
//!     fn name(&self) -> String {
//!         "RuleEngine v0.1".to_string()
//!     }
//!
//!     async fn decide(&self, input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError> {
//!         match input.get("amount").and_then(|v| v.as_f64()) {
//!             Some(amount) if amount > 100.0 => Ok(GovernanceResponse::block("budget_exceeded")),
//!             _ => Ok(GovernanceResponse::permit().with_reason("permitted")),
//!         }
//!     }
//! }
//! ```

use crate::error::AdapterError;
use govbench_scenario::{GovernanceResponse, ScenarioInput};
use serde_json::{Map, Value};

/// Configuration handed to [`GovernanceAdapter::prepare`]
pub type AdapterConfig = Map<String, Value>;

/// A governance system under test
///
/// Calls take `&self`; adapters holding per-scenario state use interior
/// mutability. Unless [`is_reentrant`](GovernanceAdapter::is_reentrant)
/// returns true, the runner never overlaps two scenarios on one adapter.
#[async_trait::async_trait]
pub trait GovernanceAdapter: Send + Sync {
    /// Human-readable name shown in reports
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }

    /// Whether overlapping prepare/decide/release triples are safe
    fn is_reentrant(&self) -> bool {
        false
    }

    /// Prepare for a single scenario
    async fn prepare(&self, _config: &AdapterConfig) -> Result<(), AdapterError> {
        Ok(())
    }

    /// Decide whether the action described by `input` is blocked
    async fn decide(&self, input: &ScenarioInput) -> Result<GovernanceResponse, AdapterError>;

    /// Clean up after a scenario
    async fn release(&self) -> Result<(), AdapterError> {
        Ok(())
    }
}
