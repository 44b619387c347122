//! Merged scenario sets and the memoizing spec repository.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use testbed_types::ScenarioSpec;

use crate::declaration::{Declaration, SPEC_FILE_NAME};
use crate::error::PlanError;

/// The merged, typed scenarios from one declaration file.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    path: PathBuf,
    scenarios: BTreeMap<String, ScenarioSpec>,
}

impl ScenarioSet {
    pub(crate) fn new(path: PathBuf, scenarios: BTreeMap<String, ScenarioSpec>) -> Self {
        Self { path, scenarios }
    }

    /// Declaration file these scenarios came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up one scenario. Absence is a configuration defect naming both
    /// the scenario and the declaration file.
    pub fn get(&self, scenario: &str) -> Result<&ScenarioSpec, PlanError> {
        self.scenarios
            .get(scenario)
            .ok_or_else(|| PlanError::MissingScenario {
                scenario: scenario.to_owned(),
                path: self.path.clone(),
            })
    }

    /// Scenario names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Iterate over (name, merged fields) pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScenarioSpec)> {
        self.scenarios
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Loads declaration files on demand and memoizes the merged result, so each
/// file is read, parsed, and folded at most once per run.
///
/// Lookups are keyed by canonical path where one exists, so two spellings of
/// the same location share one entry.
#[derive(Debug, Default)]
pub struct SpecRepository {
    cache: HashMap<PathBuf, Arc<ScenarioSet>>,
}

impl SpecRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized scenario set for `path`, loading it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<ScenarioSet>, PlanError> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Some(set) = self.cache.get(&key) {
            return Ok(Arc::clone(set));
        }

        let declaration = Declaration::load(path)?;
        let set = Arc::new(declaration.scenarios()?);
        debug!(
            path = %path.display(),
            scenarios = set.len(),
            "loaded declaration"
        );
        self.cache.insert(key, Arc::clone(&set));
        Ok(set)
    }

    /// Load the declaration conventionally named `testspec.yaml` under
    /// `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Arc<ScenarioSet>, PlanError> {
        self.load(&dir.join(SPEC_FILE_NAME))
    }

    /// Number of distinct declaration files loaded so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
