//! Test declaration files and the common-defaults fold.
//!
//! A declaration file (`testspec.yaml`) declares one or more named test
//! scenarios plus an optional `common` block of shared defaults:
//!
//! ```yaml
//! common:
//!   tags: kernel
//!   timeout: 30
//! tests:
//!   kernel.sched.basic:
//!     platform_allow: qemu_x86
//!   kernel.sched.slice:
//!     tags: sched
//!     filter: CONFIG_TIMESLICING
//! ```
//!
//! [`Declaration::scenarios`] folds `common` into every scenario and types
//! the result. Each scenario folds against its own copy of the defaults, so
//! the fold runs exactly once per scenario and never leaks appended values
//! from one scenario into the next.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use testbed_types::ScenarioSpec;

use crate::error::PlanError;
use crate::repository::ScenarioSet;

/// Well-known file name for per-directory test declarations.
pub const SPEC_FILE_NAME: &str = "testspec.yaml";

const COMMON_KEY: &str = "common";
const SAMPLE_KEY: &str = "sample";
const TESTS_KEY: &str = "tests";
const FILTER_KEY: &str = "filter";

/// An as-loaded test declaration document.
///
/// Holds the raw `common` defaults and per-scenario override mappings;
/// nothing is merged or typed until [`Declaration::scenarios`] is called.
#[derive(Debug, Clone)]
pub struct Declaration {
    path: PathBuf,
    common: Mapping,
    sample: Option<Value>,
    tests: BTreeMap<String, Mapping>,
}

impl Declaration {
    /// Read and parse the declaration file at `path`.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse declaration text. `origin` names the document in errors.
    pub fn parse(text: &str, origin: impl Into<PathBuf>) -> Result<Self, PlanError> {
        let path = origin.into();
        let document: Value = serde_yaml::from_str(text).map_err(|source| PlanError::Parse {
            path: path.clone(),
            source,
        })?;

        let Value::Mapping(mut root) = document else {
            return Err(invalid(path, "document root must be a mapping"));
        };

        let common = match take(&mut root, COMMON_KEY) {
            None | Some(Value::Null) => Mapping::new(),
            Some(Value::Mapping(mapping)) => mapping,
            Some(_) => return Err(invalid(path, "`common` must be a mapping")),
        };

        let sample = take(&mut root, SAMPLE_KEY);

        let tests_value = take(&mut root, TESTS_KEY)
            .ok_or_else(|| invalid(path.clone(), "missing required `tests` mapping"))?;
        let Value::Mapping(raw_tests) = tests_value else {
            return Err(invalid(path, "`tests` must be a mapping"));
        };
        if raw_tests.is_empty() {
            return Err(invalid(path, "`tests` must declare at least one scenario"));
        }

        let mut tests = BTreeMap::new();
        for (key, value) in raw_tests {
            let Value::String(name) = key else {
                return Err(invalid(path, "scenario names must be strings"));
            };
            let overrides = match value {
                // A bare scenario name inherits everything from `common`.
                Value::Null => Mapping::new(),
                Value::Mapping(mapping) => mapping,
                _ => {
                    return Err(invalid(
                        path,
                        format!("scenario `{}` must be a mapping", name),
                    ));
                }
            };
            tests.insert(name, overrides);
        }

        Ok(Self {
            path,
            common,
            sample,
            tests,
        })
    }

    /// Path this declaration was loaded from, or the origin given to
    /// [`Declaration::parse`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all declared scenarios, in sorted order.
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    /// The `sample` metadata block, if the file carries one. Sample metadata
    /// describes the application around the tests and takes no part in
    /// scenario resolution.
    pub fn sample(&self) -> Option<&Value> {
        self.sample.as_ref()
    }

    /// Fold `common` into every scenario and type the results.
    pub fn scenarios(&self) -> Result<ScenarioSet, PlanError> {
        let mut merged = BTreeMap::new();
        for (name, overrides) in &self.tests {
            let fields = fold_common(overrides.clone(), self.common.clone());
            let spec: ScenarioSpec = serde_yaml::from_value(Value::Mapping(fields)).map_err(
                |source| PlanError::InvalidScenario {
                    scenario: name.clone(),
                    path: self.path.clone(),
                    source,
                },
            )?;
            merged.insert(name.clone(), spec);
        }
        debug!(
            path = %self.path.display(),
            scenarios = merged.len(),
            "merged declaration"
        );
        Ok(ScenarioSet::new(self.path.clone(), merged))
    }
}

fn invalid(path: PathBuf, reason: impl Into<String>) -> PlanError {
    PlanError::InvalidDeclaration {
        path,
        reason: reason.into(),
    }
}

fn take(mapping: &mut Mapping, key: &str) -> Option<Value> {
    mapping.remove(&Value::String(key.to_owned()))
}

/// Fold shared defaults into one scenario's override mapping.
///
/// Keys only in `common` are inherited; keys in both are combined per field
/// kind: the filter expression by conjunction, strings by whitespace join,
/// sequences by concatenation with the scenario's entries first. Anything
/// else keeps the scenario's own value.
fn fold_common(mut scenario: Mapping, common: Mapping) -> Mapping {
    for (key, common_value) in common {
        match scenario.remove(&key) {
            None => {
                scenario.insert(key, common_value);
            }
            Some(scenario_value) => {
                let merged = merge_field(&key, scenario_value, common_value);
                scenario.insert(key, merged);
            }
        }
    }
    scenario
}

fn merge_field(key: &Value, scenario_value: Value, common_value: Value) -> Value {
    if key.as_str() == Some(FILTER_KEY) {
        if let (Some(ours), Some(theirs)) = (scenario_value.as_str(), common_value.as_str()) {
            return Value::String(join_filters(ours, theirs));
        }
        return scenario_value;
    }

    match (scenario_value, common_value) {
        (Value::String(ours), Value::String(theirs)) => Value::String(join_strings(&ours, &theirs)),
        (Value::Sequence(mut ours), Value::Sequence(mut theirs)) => {
            ours.append(&mut theirs);
            Value::Sequence(ours)
        }
        // Scalars and mismatched kinds: the scenario's own value wins.
        (ours, _) => ours,
    }
}

/// Conjoin two filter expressions. The empty expression is the identity: a
/// single non-empty side passes through without parentheses.
fn join_filters(ours: &str, theirs: &str) -> String {
    match (ours.is_empty(), theirs.is_empty()) {
        (true, true) => String::new(),
        (false, true) => ours.to_owned(),
        (true, false) => theirs.to_owned(),
        (false, false) => format!("({}) and ({})", ours, theirs),
    }
}

/// Join two strings with a single space, skipping empty sides.
fn join_strings(ours: &str, theirs: &str) -> String {
    [ours, theirs]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
