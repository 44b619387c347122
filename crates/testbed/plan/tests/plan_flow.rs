//! End-to-end coverage: a declaration tree on disk driven through selection
//! filtering, repository loading, per-platform resolution, and eligibility.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use testbed_plan::{
    load_platform, process, resolve, CollectedItem, Disposition, FilterChain, PlanError,
    ResolutionContext, SlowTestFilter, SpecRepository, TagFilter, TestItem, SPEC_FILE_NAME,
};
use testbed_types::{Platform, PlatformType, RelPath, TestingPolicy};

const DECLARATION: &str = r#"
common:
  tags: app
  timeout: 5
  filter: CONFIG_APP
tests:
  app.smoke:
    tags: smoke
  app.arm_only:
    arch_allow: arm
    filter: CONFIG_SMP
  app.native_harness:
    harness: pytest
"#;

fn write_declaration(root: &Path) -> PathBuf {
    let dir = root.join("tests/app");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(SPEC_FILE_NAME), DECLARATION).unwrap();
    dir
}

fn arm_platform(multiplier: f64) -> Platform {
    Platform {
        identifier: "qemu_cortex_m3".to_string(),
        arch: "arm".to_string(),
        kind: PlatformType::Qemu,
        ram: 64,
        flash: 256,
        toolchains: vec!["gnuarmemb".to_string()],
        testing: TestingPolicy {
            timeout_multiplier: multiplier,
            ..TestingPolicy::default()
        },
    }
}

fn riscv_platform() -> Platform {
    Platform {
        identifier: "qemu_riscv32".to_string(),
        arch: "riscv32".to_string(),
        kind: PlatformType::Qemu,
        ram: 64,
        flash: 256,
        toolchains: vec!["gnuarmemb".to_string()],
        testing: TestingPolicy::default(),
    }
}

#[test]
fn declaration_resolves_per_platform() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    let platform = arm_platform(1.5);
    let ctx =
        ResolutionContext::for_scenario("app.smoke", &platform, &source_dir, project.path());
    let spec = resolve(&set, "app.smoke", &platform, &ctx).unwrap();

    assert_eq!(spec.name, "app.smoke[qemu_cortex_m3]");
    assert_eq!(spec.original_name, "app.smoke");
    // ceil(5 * 1.5) = 8 whole seconds.
    assert_eq!(spec.timeout, 8);
    assert_eq!(spec.rel_path, RelPath::InTree(PathBuf::from("tests/app")));
    assert!(spec.tags.contains("smoke") && spec.tags.contains("app"));
    assert_eq!(spec.filter, "CONFIG_APP");
}

#[test]
fn common_filter_is_conjoined_per_scenario() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    let platform = arm_platform(1.0);
    let ctx =
        ResolutionContext::for_scenario("app.arm_only", &platform, &source_dir, project.path());
    let spec = resolve(&set, "app.arm_only", &platform, &ctx).unwrap();

    assert_eq!(spec.filter, "(CONFIG_SMP) and (CONFIG_APP)");
}

#[test]
fn repository_reuses_the_merged_set() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let first = repository.load_dir(&source_dir).unwrap();
    let second = repository.load_dir(&source_dir).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn process_selects_and_skips_by_platform() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    let arm = arm_platform(1.0);
    let ctx = ResolutionContext::for_scenario("app.arm_only", &arm, &source_dir, project.path());
    let disposition = process(&set, "app.arm_only", &arm, &ctx).unwrap();
    assert!(matches!(disposition, Disposition::Selected(_)));

    let riscv = riscv_platform();
    let ctx =
        ResolutionContext::for_scenario("app.arm_only", &riscv, &source_dir, project.path());
    let disposition = process(&set, "app.arm_only", &riscv, &ctx).unwrap();
    match disposition {
        Disposition::Skipped { spec, reason } => {
            assert_eq!(spec.name, "app.arm_only[qemu_riscv32]");
            assert_eq!(reason.check, "arch");
        }
        Disposition::Selected(_) => panic!("expected arch predicate to fire"),
    }
}

#[test]
fn native_harness_skips_on_every_platform() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    for platform in [arm_platform(1.0), riscv_platform()] {
        let ctx = ResolutionContext::for_scenario(
            "app.native_harness",
            &platform,
            &source_dir,
            project.path(),
        );
        let disposition = process(&set, "app.native_harness", &platform, &ctx).unwrap();
        match disposition {
            Disposition::Skipped { reason, .. } => assert_eq!(reason.check, "harness"),
            Disposition::Selected(_) => panic!("native-harness tests must never be scheduled"),
        }
    }
}

#[test]
fn sources_outside_the_project_root_resolve_out_of_tree() {
    let project = tempfile::tempdir().unwrap();
    let external = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(external.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    let platform = arm_platform(1.0);
    let ctx =
        ResolutionContext::for_scenario("app.smoke", &platform, &source_dir, project.path());
    let spec = resolve(&set, "app.smoke", &platform, &ctx).unwrap();

    assert_eq!(spec.rel_path, RelPath::OutOfTree);
    assert_eq!(spec.rel_path.to_string(), "out_of_tree");
}

#[test]
fn unknown_scenario_names_scenario_and_file() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();

    let platform = arm_platform(1.0);
    let ctx =
        ResolutionContext::for_scenario("app.missing", &platform, &source_dir, project.path());
    let err = resolve(&set, "app.missing", &platform, &ctx).unwrap_err();

    assert!(matches!(err, PlanError::MissingScenario { .. }));
    let message = err.to_string();
    assert!(message.contains("app.missing"));
    assert!(message.contains(SPEC_FILE_NAME));
}

#[test]
fn filter_chain_prunes_before_resolution() {
    let project = tempfile::tempdir().unwrap();
    let source_dir = write_declaration(project.path());

    let mut chain = FilterChain::new();
    chain.add(Box::new(SlowTestFilter::new(false)));
    chain.add(Box::new(TagFilter::new(
        vec!["app".to_string()],
        Vec::new(),
    )));

    let mut items = vec![
        CollectedItem::new("app.smoke", &source_dir).with_tag("app"),
        CollectedItem::new("app.soak", &source_dir)
            .with_tag("app")
            .with_tag("slow"),
        CollectedItem::new("lib.unit", &source_dir).with_tag("lib"),
    ];

    let deselected = chain.apply(&mut items);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name(), "app.smoke");
    assert_eq!(deselected.len(), 2);
    assert_eq!(deselected[0].filter, "slow");
    assert_eq!(deselected[1].filter, "tag");

    // The survivors are what per-platform resolution then runs on.
    let mut repository = SpecRepository::new();
    let set = repository.load_dir(&source_dir).unwrap();
    let platform = arm_platform(1.0);
    for item in &items {
        let ctx = ResolutionContext::for_item(item, item.original_name(), project.path());
        let disposition = process(&set, item.original_name(), &platform, &ctx).unwrap();
        assert!(matches!(disposition, Disposition::Selected(_)));
    }
}

#[test]
fn platform_descriptors_load_from_yaml_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("qemu_cortex_m3.yaml");
    fs::write(
        &yaml_path,
        "identifier: qemu_cortex_m3\narch: arm\ntype: qemu\nram: 64\n",
    )
    .unwrap();
    let from_yaml = load_platform(&yaml_path).unwrap();
    assert_eq!(from_yaml.kind, PlatformType::Qemu);
    assert_eq!(from_yaml.ram, 64);

    let json_path = dir.path().join("native_sim.json");
    fs::write(
        &json_path,
        r#"{"identifier": "native_sim", "arch": "posix", "type": "native"}"#,
    )
    .unwrap();
    let from_json = load_platform(&json_path).unwrap();
    assert_eq!(from_json.kind, PlatformType::Native);
}
