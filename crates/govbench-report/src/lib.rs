//! Governance benchmark reports
//!
//! Renders a [`BenchmarkResult`](govbench_core::BenchmarkResult) as a
//! one-line summary, a Markdown report, or pretty JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use govbench_report::{ReportFormat, ReportGenerator};
//!
//! let generator = ReportGenerator::new();
//! println!("{}", generator.format_summary(&result));
//! std::fs::write("report.md", generator.render(&result, ReportFormat::Markdown)?)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod format;
mod generator;

pub use error::ReportError;
pub use format::ReportFormat;
pub use generator::ReportGenerator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
