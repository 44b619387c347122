//! Per-platform specification resolution.

use std::path::PathBuf;

use tracing::debug;

use testbed_types::{Platform, RelPath, ScenarioSpec, TestSpec};

use crate::eligibility::{self, SkipReason};
use crate::error::PlanError;
use crate::item::TestItem;
use crate::repository::ScenarioSet;

/// Caller-supplied context a declaration alone cannot provide: names, the
/// source directory, and the project root.
///
/// The same resolver serves two callers. Discovery walking declaration files
/// builds contexts with [`ResolutionContext::for_scenario`]; a runner
/// holding an already-collected item uses [`ResolutionContext::for_item`].
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Display name for the resolved specification.
    pub name: String,
    /// Scenario name without platform parameterization.
    pub original_name: String,
    /// Name of the build the test belongs to.
    pub build_name: String,
    /// Directory containing the test sources.
    pub source_dir: PathBuf,
    /// Project root that relative paths are computed against.
    pub root_dir: PathBuf,
}

impl ResolutionContext {
    /// Context for declaration-driven resolution. The display name is the
    /// scenario parameterized by platform, `scenario[identifier]`.
    pub fn for_scenario(
        scenario: &str,
        platform: &Platform,
        source_dir: impl Into<PathBuf>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: format!("{}[{}]", scenario, platform.identifier),
            original_name: scenario.to_owned(),
            build_name: scenario.to_owned(),
            source_dir: source_dir.into(),
            root_dir: root_dir.into(),
        }
    }

    /// Context for item-driven resolution. Names and the source directory
    /// come from the collected item, the build name from the caller.
    pub fn for_item(
        item: &dyn TestItem,
        build_name: impl Into<String>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: item.name().to_owned(),
            original_name: item.original_name().to_owned(),
            build_name: build_name.into(),
            source_dir: item.source_dir().to_owned(),
            root_dir: root_dir.into(),
        }
    }
}

/// Outcome of resolving one (scenario, platform) pairing.
#[derive(Debug, Clone)]
pub enum Disposition {
    /// The specification applies to the platform and should run.
    Selected(TestSpec),
    /// The specification resolved, but a predicate excluded the platform.
    /// The caller marks the test skipped with the reason.
    Skipped { spec: TestSpec, reason: SkipReason },
}

/// Resolve the merged fields of `scenario` into a concrete [`TestSpec`] for
/// one platform.
///
/// Fails only on configuration defects (an unknown scenario). A source
/// directory outside the project root still resolves, with the out-of-tree
/// sentinel as its relative path.
pub fn resolve(
    set: &ScenarioSet,
    scenario: &str,
    platform: &Platform,
    ctx: &ResolutionContext,
) -> Result<TestSpec, PlanError> {
    let declared = set.get(scenario)?;
    Ok(build_spec(declared, platform, ctx))
}

/// Resolve and gate one (scenario, platform) pairing.
pub fn process(
    set: &ScenarioSet,
    scenario: &str,
    platform: &Platform,
    ctx: &ResolutionContext,
) -> Result<Disposition, PlanError> {
    let spec = resolve(set, scenario, platform, ctx)?;
    match eligibility::evaluate(&spec, platform) {
        Some(reason) => Ok(Disposition::Skipped { spec, reason }),
        None => {
            debug!(
                scenario = %spec.original_name,
                platform = %platform.identifier,
                "generated test specification"
            );
            Ok(Disposition::Selected(spec))
        }
    }
}

fn build_spec(declared: &ScenarioSpec, platform: &Platform, ctx: &ResolutionContext) -> TestSpec {
    let rel_path = match ctx.source_dir.strip_prefix(&ctx.root_dir) {
        Ok(rel) => RelPath::InTree(rel.to_path_buf()),
        Err(_) => RelPath::OutOfTree,
    };

    TestSpec {
        name: ctx.name.clone(),
        original_name: ctx.original_name.clone(),
        platform: platform.identifier.clone(),
        build_name: ctx.build_name.clone(),
        source_dir: ctx.source_dir.clone(),
        rel_path,
        timeout: scaled_timeout(declared.timeout, platform.timeout_multiplier()),
        tags: declared.tags.clone(),
        arch_allow: declared.arch_allow.clone(),
        arch_exclude: declared.arch_exclude.clone(),
        platform_allow: declared.platform_allow.clone(),
        platform_exclude: declared.platform_exclude.clone(),
        platform_type: declared.platform_type.clone(),
        min_ram: declared.min_ram,
        min_flash: declared.min_flash,
        toolchain_allow: declared.toolchain_allow.clone(),
        toolchain_exclude: declared.toolchain_exclude.clone(),
        harness: declared.harness.clone(),
        filter: declared.filter.clone(),
    }
}

/// Apply the platform's timeout multiplier, rounding up to whole seconds. A
/// slower platform never ends up with a shorter effective timeout.
fn scaled_timeout(declared: f64, multiplier: f64) -> u64 {
    (declared * multiplier).ceil() as u64
}
