//! Collection-level selection filters.
//!
//! Filters prune whole collected items before any per-platform resolution is
//! attempted, e.g. dropping categorically slow tests. They are independent
//! of the per-platform eligibility predicates.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::item::TestItem;

/// Tag marking a test as categorically slow.
pub const SLOW_TAG: &str = "slow";

/// A coarse-grained selection filter over collected items.
pub trait ItemFilter: fmt::Debug + Send + Sync {
    /// Short name identifying this filter in deselection records.
    fn name(&self) -> &str;

    /// True if `item` should be deselected.
    fn exclude(&self, item: &dyn TestItem) -> bool;
}

/// A deselected item and the filter that dropped it.
#[derive(Debug)]
pub struct Deselected<I> {
    pub item: I,
    /// Name of the first filter that excluded the item.
    pub filter: String,
}

/// An ordered chain of selection filters.
///
/// Filters run in registration order and the first filter excluding an item
/// decides it; later filters are not consulted for that item. Items no
/// filter excludes keep their original relative order.
#[derive(Debug, Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ItemFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter. Registration is idempotent per filter name.
    pub fn add(&mut self, filter: Box<dyn ItemFilter>) {
        if self.filters.iter().all(|known| known.name() != filter.name()) {
            self.filters.push(filter);
        }
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Partition `items` in place: the collection keeps exactly the selected
    /// subset, and the deselected items come back as one batch for the
    /// caller to report.
    pub fn apply<I: TestItem>(&self, items: &mut Vec<I>) -> Vec<Deselected<I>> {
        let mut selected = Vec::with_capacity(items.len());
        let mut deselected = Vec::new();

        for item in items.drain(..) {
            match self.first_excluding(&item) {
                Some(filter) => deselected.push(Deselected {
                    item,
                    filter: filter.to_owned(),
                }),
                None => selected.push(item),
            }
        }

        *items = selected;
        if !deselected.is_empty() {
            debug!(
                deselected = deselected.len(),
                selected = items.len(),
                "filtered test collection"
            );
        }
        deselected
    }

    fn first_excluding(&self, item: &dyn TestItem) -> Option<&str> {
        self.filters
            .iter()
            .find(|filter| filter.exclude(item))
            .map(|filter| filter.name())
    }
}

/// Drops items tagged [`SLOW_TAG`] unless slow tests are enabled.
#[derive(Debug, Clone)]
pub struct SlowTestFilter {
    enable_slow: bool,
}

impl SlowTestFilter {
    pub fn new(enable_slow: bool) -> Self {
        Self { enable_slow }
    }
}

impl ItemFilter for SlowTestFilter {
    fn name(&self) -> &str {
        "slow"
    }

    fn exclude(&self, item: &dyn TestItem) -> bool {
        !self.enable_slow && item.tags().contains(SLOW_TAG)
    }
}

/// Keeps items matching a tag query: with a non-empty include set an item
/// must share at least one tag, and any excluded tag drops the item. An
/// empty include set never restricts.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl TagFilter {
    pub fn new(
        include: impl IntoIterator<Item = String>,
        exclude: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }
}

impl ItemFilter for TagFilter {
    fn name(&self) -> &str {
        "tag"
    }

    fn exclude(&self, item: &dyn TestItem) -> bool {
        let tags = item.tags();
        if !self.include.is_empty() && self.include.is_disjoint(tags) {
            return true;
        }
        !self.exclude.is_disjoint(tags)
    }
}
