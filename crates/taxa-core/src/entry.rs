//! Classified entries and their optional capabilities.
//!
//! An [`Entry`] is the classification result of exactly one descriptor under
//! exactly one category definition. Entries opt into lifecycle phases by
//! returning `Some(self)` from the matching capability accessor:
//! [`Navigable`] for lazily-computed cross-references, [`PostInit`] for a
//! hook that runs once all navigations exist, [`Validatable`] for constraint
//! checks that report into the diagnostic tree.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use taxa_common::{CategoryName, Error, RawKey};
use taxa_report::Node;

use crate::contracts::Check;
use crate::pool::EntryPool;

/// A classified entry. Built once by a category factory, immutable to the
/// rest of the system apart from its own navigation slots and derived fields.
pub trait Entry: Send + Sync + 'static {
    /// Key of the descriptor this entry was classified from.
    fn raw_key(&self) -> RawKey;

    /// Name of the category definition that produced this entry.
    fn category(&self) -> CategoryName;

    /// Downcast support for typed pool queries.
    fn as_any(&self) -> &dyn Any;

    /// Downcast support for typed `Arc` retrieval (navigation targets).
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Cross-reference capability; `None` for entries without navigations.
    fn as_navigable(&self) -> Option<&dyn Navigable> {
        None
    }

    /// Post-init capability; `None` for entries without a post-init hook.
    fn as_post_init(&self) -> Option<&dyn PostInit> {
        None
    }

    /// Validation capability; `None` for entries without constraints.
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        None
    }
}

/// Capability: the entry owns navigation slots.
pub trait Navigable: Send + Sync {
    /// Force every declared navigation slot exactly once.
    ///
    /// Called by the orchestrator for all entries before post-init and
    /// validation run, so later phases never observe partially-computed
    /// state. Failures are recorded on the slots, not returned.
    fn materialize(&self, pool: &EntryPool);

    /// Failures recorded on this entry's slots so far.
    fn nav_failures(&self) -> Vec<Error>;
}

/// Capability: the entry runs a hook once all entries' navigations exist.
pub trait PostInit: Send + Sync {
    /// May set derived fields exactly once; failures go to `errors`.
    fn post_init(&self, pool: &EntryPool, errors: &Node);
}

/// Capability: the entry declares constraints checked after post-init.
pub trait Validatable: Send + Sync {
    /// Record violations through `check`; never aborts sibling entries.
    fn validate(&self, pool: &EntryPool, check: &mut Check<'_>);
}

/// A derived field set at most once, typically from a post-init hook.
///
/// Reads before the hook ran return `None`; a second `set` is rejected
/// rather than overwriting.
#[derive(Debug, Default)]
pub struct Derived<T> {
    cell: OnceLock<T>,
}

impl<T> Derived<T> {
    pub fn new() -> Self {
        Derived {
            cell: OnceLock::new(),
        }
    }

    /// Set the value. Returns false if it was already set.
    pub fn set(&self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_sets_once() {
        let field: Derived<u32> = Derived::new();
        assert!(field.get().is_none());
        assert!(field.set(7));
        assert!(!field.set(9));
        assert_eq!(field.get(), Some(&7));
    }
}
