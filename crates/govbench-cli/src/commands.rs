//! Subcommand implementations
//!
//! Each command returns its output as a string so it can be tested without
//! spawning the binary.

use anyhow::Context;
use govbench_core::{BenchmarkConfig, BenchmarkResult, ScenarioCatalog};
use govbench_report::{ReportFormat, ReportGenerator};
use govbench_scenario::Category;
use govbench_scorer::InvariantViolation;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Resolve the scenario root: `--scenarios` wins over the config file
pub(crate) fn scenario_dir(config: Option<&Path>, scenarios: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = scenarios {
        tracing::debug!(dir = %dir.display(), "scenario root from command line");
        return Ok(dir.to_path_buf());
    }
    let config = match config {
        Some(path) => BenchmarkConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BenchmarkConfig::default(),
    };
    tracing::debug!(dir = %config.scenario_dir.display(), "scenario root from configuration");
    Ok(config.scenario_dir)
}

/// Describe a scenario catalog
pub(crate) async fn catalog(dir: &Path, as_json: bool) -> anyhow::Result<String> {
    let catalog = ScenarioCatalog::load(dir)
        .await
        .with_context(|| format!("failed to load scenarios from {}", dir.display()))?;
    let counts = catalog.loaded_scenario_counts();

    if as_json {
        let categories: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(category, count)| (category.to_string(), json!(count)))
            .collect();
        let value = json!({
            "root": dir.display().to_string(),
            "digest": catalog.digest(),
            "total": catalog.len(),
            "categories": categories,
            "skipped": catalog.skipped(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut lines = vec![
        format!("Scenario catalog: {}", dir.display()),
        format!("Digest: {}", catalog.digest()),
        String::new(),
    ];
    for category in Category::ALL {
        let count = counts
            .get(&category)
            .map_or_else(|| "-".to_string(), ToString::to_string);
        lines.push(format!("  {:<22} {count:>5}", category.as_str()));
    }
    lines.push(format!("  {:<22} {:>5}", "total", catalog.len()));

    if !catalog.skipped().is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({}):", catalog.skipped().len()));
        for skipped in catalog.skipped() {
            lines.push(format!("  {}: {}", skipped.location, skipped.reason));
        }
    }
    Ok(lines.join("\n"))
}

/// Read a saved result
pub(crate) fn read_result(path: &Path) -> anyhow::Result<BenchmarkResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let result: BenchmarkResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a benchmark result", path.display()))?;
    tracing::info!(
        path = %path.display(),
        run_id = %result.run_id,
        adapter = %result.adapter_name,
        "loaded benchmark result"
    );
    Ok(result)
}

/// Render a saved result after verifying it
pub(crate) fn report(path: &Path, format: ReportFormat) -> anyhow::Result<String> {
    let result = read_result(path)?;
    result
        .check_invariants()
        .with_context(|| format!("{} fails its invariant check", path.display()))?;
    Ok(ReportGenerator::new().render(&result, format)?)
}

/// Verify a saved result; the inner error is the first violation found
pub(crate) fn check(path: &Path) -> anyhow::Result<Result<BenchmarkResult, InvariantViolation>> {
    let result = read_result(path)?;
    Ok(result.check_invariants().map(|()| result))
}
