//! Governance benchmark scenarios
//!
//! The input side of the benchmark data model:
//!
//! - [`Scenario`]: one immutable test case (input payload + expected outcome)
//! - [`Category`], [`Difficulty`], [`Severity`]: closed enumerations
//! - [`GovernanceResponse`]: the decision an adapter returns for a scenario
//! - [`RecordFormat`] / [`parse_record`]: strict parsing of on-disk records
//! - [`CatalogDigest`]: content digest identifying a loaded catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use govbench_scenario::{parse_record, RecordFormat};
//!
//! let scenario = parse_record(raw_json, RecordFormat::Json)?;
//! assert!(scenario.expected.should_block);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod digest;
mod error;
mod record;
mod types;

pub use digest::{CatalogDigest, DigestBuilder};
pub use error::{ParseEnumError, RecordError};
pub use record::{parse_record, RecordFormat};
pub use types::{
    Category, Difficulty, GovernanceResponse, Scenario, ScenarioExpected, ScenarioInput, Severity,
};

/// Reason code attached to the synthetic response produced when an adapter fails.
pub const ADAPTER_ERROR_REASON: &str = "adapter_error";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
