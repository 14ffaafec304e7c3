//! Report rendering
//!
//! Every method is a pure projection of a [`BenchmarkResult`]: no I/O, and
//! no value is recomputed or altered on the way out.

use crate::error::ReportError;
use crate::format::ReportFormat;
use govbench_core::BenchmarkResult;
use govbench_scorer::{Breakdown, BucketCounts, ScenarioScore};
use std::fmt::Display;

const BUCKET_COLUMNS: &str = "| Total | Passed | Failed | Pass Rate |";
const BUCKET_RULE: &str = "|-------|--------|--------|-----------|";

/// Renders benchmark results as text
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render in the requested format
    ///
    /// # Errors
    /// Returns `ReportError::Json` if JSON serialization fails
    pub fn render(&self, result: &BenchmarkResult, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Summary => Ok(self.format_summary(result)),
            ReportFormat::Markdown => Ok(self.format_markdown(result)),
            ReportFormat::Json => self.format_json(result),
        }
    }

    /// One-line summary
    ///
    /// `[MyAdapter] 182/200 passed (91.0%) across 8 categories in 4.32s`
    #[must_use]
    pub fn format_summary(&self, result: &BenchmarkResult) -> String {
        let aggregate = &result.aggregate;
        format!(
            "[{}] {}/{} passed ({:.1}%) across {} categories in {:.2}s",
            result.adapter_name,
            aggregate.total_passed(),
            aggregate.total_scenarios(),
            aggregate.overall_pass_rate() * 100.0,
            result.categories_run.len(),
            result.duration_seconds,
        )
    }

    /// Markdown report with overall, per-category and per-bucket tables
    #[must_use]
    pub fn format_markdown(&self, result: &BenchmarkResult) -> String {
        let aggregate = &result.aggregate;
        let mut lines = vec![
            "# Governance Benchmark Report".to_string(),
            String::new(),
            format!("**Adapter:** {}  ", result.adapter_name),
            format!("**Run ID:** `{}`  ", result.run_id),
            format!("**Started:** {}  ", result.started_at.to_rfc3339()),
            format!("**Catalog:** `{}`  ", result.catalog_digest.short()),
            format!("**Duration:** {:.2}s  ", result.duration_seconds),
            String::new(),
            "## Overall Score".to_string(),
            String::new(),
            "| Metric | Value |".to_string(),
            "|--------|-------|".to_string(),
            format!("| Total scenarios | {} |", aggregate.total_scenarios()),
            format!("| Passed | {} |", aggregate.total_passed()),
            format!("| Failed | {} |", aggregate.total_failed()),
            format!(
                "| Pass rate | **{:.1}%** |",
                aggregate.overall_pass_rate() * 100.0
            ),
            String::new(),
            "## Results by Category".to_string(),
            String::new(),
            format!("| Category {BUCKET_COLUMNS}"),
            format!("|----------{BUCKET_RULE}"),
        ];

        let mut by_name: Vec<_> = result.category_results.iter().collect();
        by_name.sort_by_key(|(category, _)| category.as_str());
        for (category, category_result) in by_name {
            lines.push(format!(
                "| {category} | {} | {} | {} | {:.1}% |",
                category_result.total(),
                category_result.passed(),
                category_result.failed(),
                category_result.pass_rate() * 100.0,
            ));
        }
        lines.push(String::new());

        push_breakdown(&mut lines, "Difficulty", aggregate.by_difficulty());
        push_breakdown(&mut lines, "Severity", aggregate.by_severity());

        let mut failures: Vec<&ScenarioScore> = result
            .category_results
            .values()
            .flat_map(|category_result| category_result.failures())
            .collect();
        if !failures.is_empty() {
            failures.sort_by(|a, b| a.scenario_id().cmp(b.scenario_id()));
            lines.push("## Failed Scenarios".to_string());
            lines.push(String::new());
            lines.push(
                "| ID | Category | Difficulty | Severity | Expected Block | Actual Block | Reason |"
                    .to_string(),
            );
            lines.push(
                "|----|----------|------------|----------|----------------|--------------|--------|"
                    .to_string(),
            );
            for score in failures {
                lines.push(format!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    score.scenario_id(),
                    score.category(),
                    score.difficulty(),
                    score.severity(),
                    score.expected_blocked(),
                    score.actual_blocked(),
                    score.actual_reason().unwrap_or("-"),
                ));
            }
            lines.push(String::new());
        }

        if !result.errors.is_empty() {
            lines.push("## Errors".to_string());
            lines.push(String::new());
            for error in &result.errors {
                lines.push(format!("- **{}**: {}", error.category, error.error));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    /// The whole result as pretty-printed JSON
    ///
    /// # Errors
    /// Returns `ReportError::Json` if serialization fails
    pub fn format_json(&self, result: &BenchmarkResult) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

/// Append a bucket table, skipping buckets no scenario fell into
fn push_breakdown<K: Display>(lines: &mut Vec<String>, title: &str, breakdown: &Breakdown<K>) {
    lines.push(format!("## Results by {title}"));
    lines.push(String::new());
    lines.push(format!("| {title} {BUCKET_COLUMNS}"));
    lines.push(format!("|{}{BUCKET_RULE}", "-".repeat(title.len() + 2)));
    for (key, counts) in breakdown {
        if counts.total == 0 {
            continue;
        }
        lines.push(bucket_row(key, counts));
    }
    lines.push(String::new());
}

fn bucket_row(key: &impl Display, counts: &BucketCounts) -> String {
    format!(
        "| {key} | {} | {} | {} | {:.1}% |",
        counts.total,
        counts.passed,
        counts.failed,
        counts.pass_rate() * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use govbench_core::{ExecutionError, RunId};
    use govbench_scenario::{
        CatalogDigest, Category, Difficulty, GovernanceResponse, Scenario, ScenarioExpected,
        Severity,
    };
    use govbench_scorer::{aggregate, reduce_category, score};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn fixed_result() -> BenchmarkResult {
        let blocked = Scenario::new(
            "BA-001",
            Category::BudgetAbuse,
            Difficulty::Hard,
            ScenarioExpected::block(["budget_exceeded"], Severity::Critical),
        );
        let permitted = Scenario::new(
            "BA-002",
            Category::BudgetAbuse,
            Difficulty::Easy,
            ScenarioExpected::permit(Severity::Info),
        );
        let scores = vec![
            score(&blocked, &GovernanceResponse::permit()),
            score(&permitted, &GovernanceResponse::permit()),
        ];

        let mut category_results = BTreeMap::new();
        category_results.insert(
            Category::BudgetAbuse,
            reduce_category(Category::BudgetAbuse, scores),
        );

        BenchmarkResult {
            run_id: RunId::new(),
            adapter_name: "Fixed".to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            catalog_digest: CatalogDigest::default(),
            categories_run: vec![Category::BudgetAbuse],
            aggregate: aggregate(&category_results),
            category_results,
            duration_seconds: 1.25,
            errors: vec![ExecutionError::no_scenarios(Category::MemoryLeak)],
        }
    }

    #[test]
    fn summary_line() {
        let summary = ReportGenerator::new().format_summary(&fixed_result());
        assert_eq!(
            summary,
            "[Fixed] 1/2 passed (50.0%) across 1 categories in 1.25s"
        );
    }

    #[test]
    fn markdown_sections() {
        let markdown = ReportGenerator::new().format_markdown(&fixed_result());

        assert!(markdown.starts_with("# Governance Benchmark Report\n"));
        assert!(markdown.contains("**Adapter:** Fixed  "));
        assert!(markdown.contains("**Started:** 2026-01-02T03:04:05+00:00  "));
        assert!(markdown.contains("| Pass rate | **50.0%** |"));
        assert!(markdown.contains("| budget_abuse | 2 | 1 | 1 | 50.0% |"));
        assert!(markdown.contains("| Difficulty | Total | Passed | Failed | Pass Rate |\n|------------|"));
        assert!(markdown.contains("| easy | 1 | 1 | 0 | 100.0% |"));
        assert!(markdown.contains("| hard | 1 | 0 | 1 | 0.0% |"));
        assert!(!markdown.contains("| medium |"));
        assert!(markdown.contains("| Severity | Total | Passed | Failed | Pass Rate |\n|----------|"));
        assert!(!markdown.contains("| warning |"));
        assert!(markdown.contains("| BA-001 | budget_abuse | hard | critical | true | false | - |"));
        assert!(!markdown.contains("| BA-002 |"));
        assert!(markdown.contains("## Errors\n\n- **memory_leak**: no_scenarios_found"));
    }

    #[test]
    fn markdown_omits_empty_sections() {
        let mut result = fixed_result();
        result.errors.clear();
        result.category_results.clear();
        result.categories_run.clear();
        result.aggregate = aggregate(&result.category_results);

        let markdown = ReportGenerator::new().format_markdown(&result);
        assert!(!markdown.contains("## Failed Scenarios"));
        assert!(!markdown.contains("## Errors"));
        assert!(markdown.contains("| Pass rate | **0.0%** |"));
    }

    #[test]
    fn json_is_the_whole_result() {
        let result = fixed_result();
        let json = ReportGenerator::new().format_json(&result).unwrap();
        let back: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(json.contains("\n  \"adapter_name\": \"Fixed\""));
    }

    #[test]
    fn render_dispatches_on_format() {
        let result = fixed_result();
        let generator = ReportGenerator::new();
        assert_eq!(
            generator.render(&result, ReportFormat::Summary).unwrap(),
            generator.format_summary(&result)
        );
        assert_eq!(
            generator.render(&result, ReportFormat::Markdown).unwrap(),
            generator.format_markdown(&result)
        );
    }
}
