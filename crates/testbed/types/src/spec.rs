//! Resolved test specifications.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Location of a test source directory relative to the project root.
///
/// Sources living outside the project root (vendored or external test
/// trees) are recorded as a sentinel rather than failing resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelPath {
    /// The source directory lies under the project root.
    InTree(PathBuf),
    /// The source directory lies outside the project root.
    OutOfTree,
}

impl RelPath {
    /// Sentinel rendering for out-of-tree sources.
    pub const OUT_OF_TREE: &'static str = "out_of_tree";
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelPath::InTree(path) => write!(f, "{}", path.display()),
            RelPath::OutOfTree => f.write_str(Self::OUT_OF_TREE),
        }
    }
}

impl Serialize for RelPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A fully resolved test specification for one (scenario, platform) pair.
///
/// Built exactly once by the resolver and never mutated afterwards. The
/// eligibility predicates and the caller only read it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSpec {
    /// Display name, parameterized by platform, e.g.
    /// `kernel.sched.basic[qemu_cortex_m3]`.
    pub name: String,
    /// Scenario name as declared, without platform parameterization.
    pub original_name: String,
    /// Identifier of the platform this specification was resolved for.
    pub platform: String,
    /// Name of the build the test belongs to.
    pub build_name: String,
    /// Directory containing the test sources and their declaration file.
    pub source_dir: PathBuf,
    /// Source directory relative to the project root, or the out-of-tree
    /// sentinel.
    pub rel_path: RelPath,
    /// Effective timeout in whole seconds, after the platform multiplier.
    pub timeout: u64,
    /// Free-form tags attached to the scenario.
    pub tags: BTreeSet<String>,
    /// Architectures the test may run on. Empty allows all.
    pub arch_allow: BTreeSet<String>,
    /// Architectures the test must not run on.
    pub arch_exclude: BTreeSet<String>,
    /// Platform identifiers the test may run on. Empty allows all.
    pub platform_allow: BTreeSet<String>,
    /// Platform identifiers the test must not run on.
    pub platform_exclude: BTreeSet<String>,
    /// Platform kinds the test may run on. Empty allows all.
    pub platform_type: BTreeSet<String>,
    /// Minimum RAM in KiB.
    pub min_ram: u64,
    /// Minimum flash in KiB.
    pub min_flash: u64,
    /// Toolchains the test may be built with. Empty allows all.
    pub toolchain_allow: BTreeSet<String>,
    /// Toolchains the test must not be built with.
    pub toolchain_exclude: BTreeSet<String>,
    /// Harness responsible for evaluating the test's output.
    pub harness: String,
    /// Build-configuration filter expression, or empty for none.
    pub filter: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_path_displays_in_tree_path() {
        let rel = RelPath::InTree(PathBuf::from("tests/kernel/sched"));
        assert_eq!(rel.to_string(), "tests/kernel/sched");
    }

    #[test]
    fn test_rel_path_displays_out_of_tree_sentinel() {
        assert_eq!(RelPath::OutOfTree.to_string(), "out_of_tree");
    }

    #[test]
    fn test_rel_path_serializes_as_string() {
        let rel = RelPath::OutOfTree;
        let json = serde_json::to_string(&rel).unwrap();
        assert_eq!(json, "\"out_of_tree\"");

        let rel = RelPath::InTree(PathBuf::from("tests/misc"));
        let json = serde_json::to_string(&rel).unwrap();
        assert_eq!(json, "\"tests/misc\"");
    }
}
