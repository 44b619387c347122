//! # testbed-plan
//!
//! Declarative test-plan resolution for embedded target platforms.
//!
//! The engine turns a hierarchical test declaration plus a platform
//! descriptor into concrete, fully merged test specifications and decides,
//! per platform, which of them are applicable:
//!
//! 1. [`Declaration`] parses a `testspec.yaml` document and folds the shared
//!    `common` defaults into every declared scenario.
//! 2. [`SpecRepository`] memoizes the merged result per declaration file, so
//!    each file is read and merged at most once per run.
//! 3. [`resolve`] and [`process`] produce an immutable [`TestSpec`] for one
//!    (scenario, platform) pairing, scaling timeouts and locating sources
//!    relative to the project root.
//! 4. [`eligibility::evaluate`] runs the predicate battery and reports the
//!    first reason to skip, if any.
//! 5. [`FilterChain`] prunes whole collected items (slow tests, tag queries)
//!    before any per-platform resolution happens.
//!
//! An ineligible pairing is not an error: it produces one audit event on the
//! `skip_audit` target and a [`Disposition::Skipped`] the caller turns into
//! a skip marker. A scenario with no backing declaration, by contrast, is a
//! configuration defect surfaced as [`PlanError::MissingScenario`].
//!
//! [`TestSpec`]: testbed_types::TestSpec

#![deny(unsafe_code)]

pub mod declaration;
pub mod eligibility;
pub mod error;
pub mod filter;
pub mod item;
pub mod provider;
pub mod repository;
pub mod resolver;

pub use declaration::{Declaration, SPEC_FILE_NAME};
pub use eligibility::{SkipReason, NATIVE_HARNESS};
pub use error::PlanError;
pub use filter::{Deselected, FilterChain, ItemFilter, SlowTestFilter, TagFilter};
pub use item::{CollectedItem, TestItem};
pub use provider::load_platform;
pub use repository::{ScenarioSet, SpecRepository};
pub use resolver::{process, resolve, Disposition, ResolutionContext};
