//! Report output formats

use crate::error::ReportError;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportFormat {
    /// One line, for CI logs
    #[default]
    Summary,
    /// Tables and failure details
    Markdown,
    /// The full result, pretty-printed
    Json,
}

impl ReportFormat {
    /// All formats
    pub const ALL: [ReportFormat; 3] = [
        ReportFormat::Summary,
        ReportFormat::Markdown,
        ReportFormat::Json,
    ];

    /// Canonical name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Summary => "summary",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" | "text" => Ok(ReportFormat::Summary),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}
