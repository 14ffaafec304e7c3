//! Scenario catalog
//!
//! The catalog is built once, explicitly, and handed to the runner. On disk
//! it is a directory tree with one subdirectory per category:
//!
//! ```text
//! scenarios/
//! ├── budget_abuse/
//! │   ├── BA-001.json
//! │   └── BA-002.yaml
//! └── trust_escalation/
//!     └── TE-001.json
//! ```
//!
//! Loading never aborts on a bad record. Malformed records, records filed
//! under the wrong category, duplicate ids and unknown category directories
//! are skipped with a warning and listed in [`ScenarioCatalog::skipped`].

use crate::error::CatalogError;
use govbench_scenario::{parse_record, CatalogDigest, Category, RecordFormat, Scenario};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A record or directory left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// File path, directory path, or scenario id for in-memory catalogs
    pub location: String,
    /// Why it was skipped
    pub reason: String,
}

/// Read-only scenario catalog, grouped by category
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    root: Option<PathBuf>,
    scenarios: BTreeMap<Category, Vec<Arc<Scenario>>>,
    skipped: Vec<SkippedRecord>,
    digest: CatalogDigest,
}

impl ScenarioCatalog {
    /// Create an empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from in-memory scenarios
    ///
    /// Scenarios keep their iteration order within a category. A repeated
    /// id is skipped, like it is when loading from disk.
    #[must_use]
    pub fn from_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let mut catalog = Self::new();
        let mut ids = HashSet::new();

        for scenario in scenarios {
            if !ids.insert(scenario.id.clone()) {
                catalog.skip(scenario.id.clone(), "duplicate scenario id");
                continue;
            }
            catalog
                .scenarios
                .entry(scenario.category)
                .or_default()
                .push(Arc::new(scenario));
        }

        catalog.refresh_digest();
        catalog
    }

    /// Register a category with no scenarios
    ///
    /// Mirrors a category directory that exists on disk but holds no valid
    /// records: the runner reports it as an empty result, not as missing.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.scenarios.entry(category).or_default();
        self
    }

    /// Load every category directory under `root`
    ///
    /// A missing root yields an empty catalog. Files are read in file-name
    /// order; only `json`, `yaml` and `yml` files are considered records.
    ///
    /// # Errors
    /// - `CatalogError::NotADirectory` if `root` is a file
    /// - `CatalogError::Io` if `root` cannot be listed
    pub async fn load(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        let mut catalog = Self {
            root: Some(root.to_path_buf()),
            ..Self::default()
        };

        let metadata = match tokio::fs::metadata(root).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %root.display(), "scenario directory not found, catalog is empty");
                return Ok(catalog);
            }
            Err(err) => return Err(CatalogError::io_error(root, err)),
        };
        if !metadata.is_dir() {
            return Err(CatalogError::NotADirectory(root.to_path_buf()));
        }

        let category_dirs = list_entries(root, |path, is_dir| is_dir && path.file_name().is_some())
            .await
            .map_err(|err| CatalogError::io_error(root, err))?;

        let mut ids = HashSet::new();
        for dir in category_dirs {
            let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let category = match name.parse::<Category>() {
                Ok(category) => category,
                Err(err) => {
                    catalog.skip(dir.display().to_string(), err.to_string());
                    continue;
                }
            };

            let files = match list_entries(&dir, |path, is_dir| !is_dir && RecordFormat::is_record(path)).await {
                Ok(files) => files,
                Err(err) => {
                    catalog.skip(dir.display().to_string(), err.to_string());
                    continue;
                }
            };

            let mut loaded = Vec::with_capacity(files.len());
            for file in files {
                match read_record(&file).await {
                    Ok(scenario) if scenario.category != category => {
                        let reason = format!(
                            "declares category {} but is filed under {category}",
                            scenario.category
                        );
                        catalog.skip(file.display().to_string(), reason);
                    }
                    Ok(scenario) if !ids.insert(scenario.id.clone()) => {
                        let reason = format!("duplicate scenario id {}", scenario.id);
                        catalog.skip(file.display().to_string(), reason);
                    }
                    Ok(scenario) => loaded.push(Arc::new(scenario)),
                    Err(err) => catalog.skip(file.display().to_string(), err.to_string()),
                }
            }

            tracing::debug!(%category, scenarios = loaded.len(), "loaded category");
            catalog.scenarios.insert(category, loaded);
        }

        catalog.refresh_digest();
        tracing::info!(
            path = %root.display(),
            scenarios = catalog.len(),
            categories = catalog.scenarios.len(),
            skipped = catalog.skipped.len(),
            digest = %catalog.digest.short(),
            "scenario catalog loaded"
        );
        Ok(catalog)
    }

    /// Scenarios of a category, or `None` if the category is absent
    #[inline]
    #[must_use]
    pub fn scenarios(&self, category: Category) -> Option<&[Arc<Scenario>]> {
        self.scenarios.get(&category).map(Vec::as_slice)
    }

    /// Whether the category exists in the catalog (possibly empty)
    #[inline]
    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.scenarios.contains_key(&category)
    }

    /// Categories present, in canonical order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.scenarios.keys().copied()
    }

    /// Number of scenarios per present category
    #[must_use]
    pub fn loaded_scenario_counts(&self) -> BTreeMap<Category, usize> {
        self.scenarios
            .iter()
            .map(|(category, scenarios)| (*category, scenarios.len()))
            .collect()
    }

    /// Total number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Digest over every scenario, in category then file order
    #[inline]
    #[must_use]
    pub fn digest(&self) -> CatalogDigest {
        self.digest
    }

    /// Records and directories left out while building the catalog
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Directory the catalog was loaded from, if any
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn skip(&mut self, location: String, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%location, %reason, "skipping scenario record");
        self.skipped.push(SkippedRecord { location, reason });
    }

    fn refresh_digest(&mut self) {
        self.digest = CatalogDigest::of_scenarios(
            self.scenarios.values().flatten().map(AsRef::as_ref),
        );
    }
}

/// List entries of `dir` accepted by `keep`, sorted by path
async fn list_entries(
    dir: &Path,
    keep: impl Fn(&Path, bool) -> bool,
) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        let path = entry.path();
        if keep(&path, is_dir) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

async fn read_record(path: &Path) -> Result<Scenario, govbench_scenario::RecordError> {
    let format = RecordFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| govbench_scenario::RecordError::io_error(path, err))?;
    parse_record(&content, format)
}
