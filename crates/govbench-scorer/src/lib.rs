//! Governance benchmark scorer
//!
//! Turns raw adapter decisions into verdicts and rolls verdicts up into
//! statistics. Every function here is pure: no I/O, no shared state, and no
//! error path. Malformed inputs score as failures, they never panic.
//!
//! - [`score`]: one (scenario, response) pair → [`ScenarioScore`]
//! - [`reduce_category`]: all scores of one category → [`CategoryResult`]
//! - [`aggregate`]: all category results → [`AggregateScore`]
//!
//! # Example
//!
//! ```rust,ignore
//! use govbench_scorer::{aggregate, reduce_category, score};
//!
//! let verdict = score(&scenario, &response);
//! let result = reduce_category(scenario.category, vec![verdict]);
//! let mut results = BTreeMap::new();
//! results.insert(result.category(), result);
//! let overall = aggregate(&results);
//! println!("{:.1}%", overall.overall_pass_rate() * 100.0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod aggregate;
mod breakdown;
mod category;
mod error;
mod score;

pub use aggregate::{aggregate, AggregateScore};
pub use breakdown::{merge_breakdown, pass_rate, Breakdown, BucketCounts};
pub use category::{reduce_category, CategoryResult};
pub use error::InvariantViolation;
pub use score::{score, ScenarioScore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
