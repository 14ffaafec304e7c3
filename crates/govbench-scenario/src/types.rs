//! Core scenario types
//!
//! Defines the closed enumerations used for bucketing, the scenario record
//! itself and the response an adapter produces for it.

use crate::error::ParseEnumError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Opaque key-value payload handed verbatim to the adapter
pub type ScenarioInput = Map<String, Value>;

/// Scenario category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TrustEscalation,
    BudgetAbuse,
    MemoryLeak,
    ConsentViolation,
    IdentitySpoofing,
    CrossDomainLeakage,
    SocialEngineering,
    PrivilegeEscalation,
}

impl Category {
    /// Every category, in canonical run order
    pub const ALL: [Category; 8] = [
        Category::TrustEscalation,
        Category::BudgetAbuse,
        Category::MemoryLeak,
        Category::ConsentViolation,
        Category::IdentitySpoofing,
        Category::CrossDomainLeakage,
        Category::SocialEngineering,
        Category::PrivilegeEscalation,
    ];

    /// Snake-case name, identical to the on-disk directory name
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::TrustEscalation => "trust_escalation",
            Category::BudgetAbuse => "budget_abuse",
            Category::MemoryLeak => "memory_leak",
            Category::ConsentViolation => "consent_violation",
            Category::IdentitySpoofing => "identity_spoofing",
            Category::CrossDomainLeakage => "cross_domain_leakage",
            Category::SocialEngineering => "social_engineering",
            Category::PrivilegeEscalation => "privilege_escalation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

/// Scenario difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Every difficulty, easiest first
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("difficulty", s))
    }
}

/// Severity of the violation a scenario exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Every severity, least severe first
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Critical];

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("severity", s))
    }
}

/// Expected governance outcome for a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioExpected {
    /// Whether the governance system should block the action
    pub should_block: bool,
    /// Reason codes the governance system may return; empty means unconstrained
    pub acceptable_reasons: IndexSet<String>,
    /// Severity of the violation being tested
    pub severity: Severity,
}

impl ScenarioExpected {
    /// Expect a block with any of the given reasons
    #[must_use]
    pub fn block<I, S>(reasons: I, severity: Severity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            should_block: true,
            acceptable_reasons: reasons.into_iter().map(Into::into).collect(),
            severity,
        }
    }

    /// Expect the action to be permitted, with no reason constraint
    #[must_use]
    pub fn permit(severity: Severity) -> Self {
        Self {
            should_block: false,
            acceptable_reasons: IndexSet::new(),
            severity,
        }
    }

    /// Replace the acceptable reason set
    #[must_use]
    pub fn with_reasons<I, S>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptable_reasons = reasons.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `reason` is one of the acceptable codes (exact, case-sensitive)
    #[inline]
    #[must_use]
    pub fn accepts(&self, reason: &str) -> bool {
        self.acceptable_reasons.contains(reason)
    }
}

/// A single benchmark scenario
///
/// Immutable once loaded; the catalog shares it read-only across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Unique scenario identifier, e.g. `TE-001`
    pub id: String,
    pub category: Category,
    /// Short human-readable name
    pub name: String,
    /// Full description of the attack or violation
    pub description: String,
    pub difficulty: Difficulty,
    /// Raw payload passed to the adapter
    pub input: ScenarioInput,
    pub expected: ScenarioExpected,
}

impl Scenario {
    /// Create a scenario with an empty input payload
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: Category,
        difficulty: Difficulty,
        expected: ScenarioExpected,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            description: String::new(),
            id,
            category,
            difficulty,
            input: ScenarioInput::new(),
            expected,
        }
    }

    /// With human-readable name and description
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// With input payload
    #[must_use]
    pub fn with_input(mut self, input: ScenarioInput) -> Self {
        self.input = input;
        self
    }

    /// Severity of the scenario (lives on the expected outcome)
    #[inline]
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.expected.severity
    }
}

/// Decision returned by a governance adapter for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceResponse {
    /// True if the governance system blocked the action
    pub blocked: bool,
    /// Machine-readable reason code
    #[serde(default)]
    pub reason: Option<String>,
    /// Optional human-readable explanation
    #[serde(default)]
    pub details: Option<String>,
    /// Any additional metadata from the governance system
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl GovernanceResponse {
    /// Permit the action with no reason code
    #[inline]
    #[must_use]
    pub fn permit() -> Self {
        Self {
            blocked: false,
            reason: None,
            details: None,
            metadata: Map::new(),
        }
    }

    /// Block the action with a reason code
    #[inline]
    #[must_use]
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: Some(reason.into()),
            details: None,
            metadata: Map::new(),
        }
    }

    /// Synthetic failing response substituted when the adapter errors
    #[must_use]
    pub fn adapter_error(details: impl Into<String>) -> Self {
        Self {
            blocked: false,
            reason: Some(crate::ADAPTER_ERROR_REASON.to_string()),
            details: Some(details.into()),
            metadata: Map::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
