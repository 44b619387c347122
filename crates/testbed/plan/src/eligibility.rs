//! Platform eligibility predicates.
//!
//! Each predicate is a pure function deciding whether a resolved
//! specification excludes the platform it was resolved for. The engine runs
//! the battery in a fixed order, short-circuits at the first firing
//! predicate, and emits exactly one audit event naming the reason. An empty
//! allow-set never restricts; only a non-empty allow-set or a matching
//! exclude-set can cause a skip.

use std::fmt;

use tracing::info;

use testbed_types::{Platform, TestSpec};

/// Harness literal reserved for tests the surrounding runner executes
/// natively. Such tests never go through plan scheduling.
pub const NATIVE_HARNESS: &str = "pytest";

/// Why a specification was excluded from a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipReason {
    /// Name of the predicate that fired.
    pub check: &'static str,
    /// Explanation suitable for skip markers and audit logs.
    pub reason: &'static str,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason)
    }
}

struct Check {
    name: &'static str,
    eval: fn(&TestSpec, &Platform) -> Option<&'static str>,
}

/// The fixed predicate battery. Appending a row is the only change needed
/// to introduce a predicate; no single row depends on another.
const CHECKS: &[Check] = &[
    Check {
        name: "arch",
        eval: arch,
    },
    Check {
        name: "platform",
        eval: platform_identity,
    },
    Check {
        name: "platform_type",
        eval: platform_type,
    },
    Check {
        name: "min_ram",
        eval: min_ram,
    },
    Check {
        name: "min_flash",
        eval: min_flash,
    },
    Check {
        name: "toolchain",
        eval: toolchain,
    },
    Check {
        name: "tag",
        eval: tag,
    },
    Check {
        name: "harness",
        eval: harness,
    },
];

/// Decide whether `spec` must be skipped on `platform`.
///
/// Returns the first firing predicate's reason, logging it once on the
/// `skip_audit` target. `None` means the pairing is eligible to run.
pub fn evaluate(spec: &TestSpec, platform: &Platform) -> Option<SkipReason> {
    for check in CHECKS {
        if let Some(reason) = (check.eval)(spec, platform) {
            info!(
                target: "skip_audit",
                scenario = %spec.original_name,
                platform = %platform.identifier,
                check = check.name,
                reason,
                "skipped test"
            );
            return Some(SkipReason {
                check: check.name,
                reason,
            });
        }
    }
    None
}

fn arch(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    if !spec.arch_allow.is_empty() && !spec.arch_allow.contains(&platform.arch) {
        return Some("platform architecture not in arch_allow");
    }
    if spec.arch_exclude.contains(&platform.arch) {
        return Some("platform architecture in arch_exclude");
    }
    None
}

fn platform_identity(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    if !spec.platform_allow.is_empty() && !spec.platform_allow.contains(&platform.identifier) {
        return Some("platform not in platform_allow");
    }
    if spec.platform_exclude.contains(&platform.identifier) {
        return Some("platform in platform_exclude");
    }
    None
}

fn platform_type(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    if !spec.platform_type.is_empty() && !spec.platform_type.contains(platform.kind.as_str()) {
        return Some("platform type not in platform_type");
    }
    None
}

// Equality is sufficient for both memory floors: only a strictly greater
// requirement skips.

fn min_ram(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    if spec.min_ram > platform.ram {
        return Some("platform has less ram than the declared minimum");
    }
    None
}

fn min_flash(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    if spec.min_flash > platform.flash {
        return Some("platform has less flash than the declared minimum");
    }
    None
}

fn toolchain(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    // A platform that declares no toolchains is never restricted by them.
    if platform.toolchains.is_empty() {
        return None;
    }
    if !spec.toolchain_allow.is_empty()
        && !platform
            .toolchains
            .iter()
            .any(|t| spec.toolchain_allow.contains(t))
    {
        return Some("platform toolchain not in toolchain_allow");
    }
    if platform
        .toolchains
        .iter()
        .any(|t| spec.toolchain_exclude.contains(t))
    {
        return Some("platform toolchain in toolchain_exclude");
    }
    None
}

fn tag(spec: &TestSpec, platform: &Platform) -> Option<&'static str> {
    let policy = &platform.testing;
    if !policy.only_tags.is_empty() && policy.only_tags.is_disjoint(&spec.tags) {
        return Some("no test tag in platform only_tags");
    }
    if !policy.ignore_tags.is_disjoint(&spec.tags) {
        return Some("test tag in platform ignore_tags");
    }
    None
}

fn harness(spec: &TestSpec, _platform: &Platform) -> Option<&'static str> {
    if spec.harness == NATIVE_HARNESS {
        return Some("harness is executed natively by the test runner");
    }
    None
}
