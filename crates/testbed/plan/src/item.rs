//! Collected test items.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A test item collected by the surrounding runner.
///
/// The engine only reads items: selection filters consult names and tags,
/// and the resolver draws display names and source locations from them.
pub trait TestItem {
    /// Display name of the collected item, parameterization included.
    fn name(&self) -> &str;

    /// Name before any parameterization.
    fn original_name(&self) -> &str {
        self.name()
    }

    /// Directory containing the item's sources.
    fn source_dir(&self) -> &Path;

    /// Tags attached to the item.
    fn tags(&self) -> &BTreeSet<String>;
}

/// A plain owned test item, for callers without a richer item type of their
/// own.
#[derive(Debug, Clone)]
pub struct CollectedItem {
    name: String,
    original_name: String,
    source_dir: PathBuf,
    tags: BTreeSet<String>,
}

impl CollectedItem {
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            source_dir: source_dir.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Set the unparameterized name when it differs from the display name.
    pub fn with_original_name(mut self, original_name: impl Into<String>) -> Self {
        self.original_name = original_name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

impl TestItem for CollectedItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn original_name(&self) -> &str {
        &self.original_name
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_name_defaults_to_name() {
        let item = CollectedItem::new("app.smoke", "/work/tests/app");
        assert_eq!(item.name(), "app.smoke");
        assert_eq!(item.original_name(), "app.smoke");
    }

    #[test]
    fn test_builder_sets_parameterized_names_and_tags() {
        let item = CollectedItem::new("app.smoke[qemu_x86]", "/work/tests/app")
            .with_original_name("app.smoke")
            .with_tag("smoke")
            .with_tag("smoke");

        assert_eq!(item.name(), "app.smoke[qemu_x86]");
        assert_eq!(item.original_name(), "app.smoke");
        assert_eq!(item.tags().len(), 1);
    }
}
