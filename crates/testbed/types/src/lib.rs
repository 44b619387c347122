//! Core type definitions for the Testbed plan engine.
//!
//! This crate holds the shared data model and nothing else: target platform
//! descriptors, the declared per-scenario constraint fields, and the fully
//! resolved test specification. All I/O, merging, and gating logic lives in
//! `testbed-plan`.

#![deny(unsafe_code)]

pub mod platform;
pub mod scenario;
pub mod spec;

pub use platform::{Platform, PlatformType, TestingPolicy};
pub use scenario::ScenarioSpec;
pub use spec::{RelPath, TestSpec};
