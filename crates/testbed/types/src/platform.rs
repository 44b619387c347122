//! Target platform descriptors.
//!
//! A [`Platform`] describes one execution target: a physical board, an
//! emulated or simulated target, or a native host build. Descriptors are
//! produced by the surrounding build system as YAML or JSON documents and
//! are read-only inputs to plan resolution.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of execution target a platform represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    /// Physical microcontroller board.
    #[default]
    Mcu,
    /// Emulated target running under QEMU.
    Qemu,
    /// Simulated target.
    Sim,
    /// Host-side unit test target.
    Unit,
    /// Native host build of the application.
    Native,
}

impl PlatformType {
    /// Lowercase name as it appears in descriptor files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Mcu => "mcu",
            PlatformType::Qemu => "qemu",
            PlatformType::Sim => "sim",
            PlatformType::Unit => "unit",
            PlatformType::Native => "native",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-platform testing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingPolicy {
    /// Run only tests carrying at least one of these tags. Empty means no
    /// restriction.
    pub only_tags: BTreeSet<String>,
    /// Never run tests carrying any of these tags.
    pub ignore_tags: BTreeSet<String>,
    /// Scales declared test timeouts for slow targets.
    pub timeout_multiplier: f64,
}

impl Default for TestingPolicy {
    fn default() -> Self {
        Self {
            only_tags: BTreeSet::new(),
            ignore_tags: BTreeSet::new(),
            timeout_multiplier: 1.0,
        }
    }
}

/// A target platform: identity, hardware budgets, toolchains, and test
/// policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Unique identifier, e.g. `frdm_k64f` or `qemu_cortex_m3`.
    pub identifier: String,
    /// Processor architecture, e.g. `arm`, `riscv32`, `x86`.
    pub arch: String,
    /// Kind of target.
    #[serde(rename = "type", default)]
    pub kind: PlatformType,
    /// Available RAM in KiB.
    #[serde(default = "default_ram")]
    pub ram: u64,
    /// Available flash in KiB.
    #[serde(default = "default_flash")]
    pub flash: u64,
    /// Toolchains this platform can be built with.
    #[serde(rename = "toolchain", default)]
    pub toolchains: Vec<String>,
    /// Testing policy for this platform.
    #[serde(default)]
    pub testing: TestingPolicy,
}

fn default_ram() -> u64 {
    128
}

fn default_flash() -> u64 {
    512
}

impl Platform {
    /// Effective timeout multiplier for this platform.
    pub fn timeout_multiplier(&self) -> f64 {
        self.testing.timeout_multiplier
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
