//! Declared per-scenario constraint fields.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Constraint and configuration fields for one test scenario, after the
/// shared `common` block has been folded in.
///
/// Every field has a permissive default: absent sets are empty, and an empty
/// allow-set never restricts anything. Unknown declaration fields are
/// ignored rather than rejected, so declarations may carry extra metadata
/// for other tools.
///
/// Set-valued fields accept either a YAML sequence or a single
/// whitespace-separated string; both forms are in common use in declaration
/// files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSpec {
    /// Free-form tags attached to the scenario.
    #[serde(deserialize_with = "string_or_seq")]
    pub tags: BTreeSet<String>,
    /// Architectures the scenario may run on. Empty allows all.
    #[serde(deserialize_with = "string_or_seq")]
    pub arch_allow: BTreeSet<String>,
    /// Architectures the scenario must not run on.
    #[serde(deserialize_with = "string_or_seq")]
    pub arch_exclude: BTreeSet<String>,
    /// Platform identifiers the scenario may run on. Empty allows all.
    #[serde(deserialize_with = "string_or_seq")]
    pub platform_allow: BTreeSet<String>,
    /// Platform identifiers the scenario must not run on.
    #[serde(deserialize_with = "string_or_seq")]
    pub platform_exclude: BTreeSet<String>,
    /// Platform kinds the scenario may run on. Empty allows all.
    #[serde(deserialize_with = "string_or_seq")]
    pub platform_type: BTreeSet<String>,
    /// Minimum RAM in KiB. Platforms with exactly this much qualify.
    pub min_ram: u64,
    /// Minimum flash in KiB. Platforms with exactly this much qualify.
    pub min_flash: u64,
    /// Toolchains the scenario may be built with. Empty allows all.
    #[serde(deserialize_with = "string_or_seq")]
    pub toolchain_allow: BTreeSet<String>,
    /// Toolchains the scenario must not be built with.
    #[serde(deserialize_with = "string_or_seq")]
    pub toolchain_exclude: BTreeSet<String>,
    /// Harness responsible for evaluating the test's output.
    pub harness: String,
    /// Build-configuration filter expression, or empty for none.
    pub filter: String,
    /// Declared timeout in seconds, before any platform multiplier.
    pub timeout: f64,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            arch_allow: BTreeSet::new(),
            arch_exclude: BTreeSet::new(),
            platform_allow: BTreeSet::new(),
            platform_exclude: BTreeSet::new(),
            platform_type: BTreeSet::new(),
            min_ram: 0,
            min_flash: 0,
            toolchain_allow: BTreeSet::new(),
            toolchain_exclude: BTreeSet::new(),
            harness: String::new(),
            filter: String::new(),
            timeout: 60.0,
        }
    }
}

/// Accept `tags: kernel posix` and `tags: [kernel, posix]` alike.
fn string_or_seq<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Joined(String),
        Listed(Vec<String>),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Joined(joined) => joined.split_whitespace().map(str::to_owned).collect(),
        Repr::Listed(items) => items.into_iter().collect(),
    })
}
