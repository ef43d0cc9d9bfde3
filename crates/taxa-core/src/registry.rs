//! Category definitions and the classifier registry.
//!
//! A [`CategoryDef`] is a declarative rule: an ordered set of filters (all
//! must pass), a priority for tie-breaking (lower wins), and a factory that
//! builds the classified entry. Definitions are registered once, before
//! classification starts; the registry is frozen afterwards.

use std::sync::Arc;

use taxa_common::{CategoryName, Error, Result};

use crate::descriptor::Descriptor;
use crate::entry::Entry;

/// Priority assigned to definitions that do not specify one. Lower numbers
/// win, so explicit priorities take precedence over defaults.
pub const DEFAULT_PRIORITY: i32 = 10_000;

/// One predicate over a raw descriptor. Blanket-implemented for closures, so
/// `|raw: &R| ...` registers directly; named filter types implement it for
/// reusable rules.
pub trait Filter<R>: Send + Sync {
    fn matches(&self, raw: &R) -> bool;
}

impl<R, F> Filter<R> for F
where
    F: Fn(&R) -> bool + Send + Sync,
{
    fn matches(&self, raw: &R) -> bool {
        self(raw)
    }
}

/// Errors a factory may fail with; wrapped into the engine taxonomy as a
/// factory failure scoped to the descriptor being classified.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

type Factory<R> = Box<dyn Fn(&Arc<R>) -> std::result::Result<Arc<dyn Entry>, FactoryError> + Send + Sync>;

/// A declarative classification rule: name, AND-composed filters, priority,
/// and an entry factory.
pub struct CategoryDef<R> {
    name: CategoryName,
    priority: i32,
    filters: Vec<Box<dyn Filter<R>>>,
    factory: Factory<R>,
}

impl<R: Descriptor> CategoryDef<R> {
    /// Create a definition with no filters and the default priority.
    ///
    /// A definition without filters matches every descriptor; add filters
    /// with [`with_filter`](Self::with_filter).
    pub fn new<F>(name: impl Into<CategoryName>, factory: F) -> Self
    where
        F: Fn(&Arc<R>) -> std::result::Result<Arc<dyn Entry>, FactoryError> + Send + Sync + 'static,
    {
        CategoryDef {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            filters: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// Append a filter. Filters AND together: all must pass for a match.
    pub fn with_filter(mut self, filter: impl Filter<R> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Override the priority. Lower numbers win ties between categories.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether every filter accepts the descriptor.
    pub(crate) fn matches(&self, raw: &R) -> bool {
        self.filters.iter().all(|f| f.matches(raw))
    }

    pub(crate) fn build(&self, raw: &Arc<R>) -> std::result::Result<Arc<dyn Entry>, FactoryError> {
        (self.factory)(raw)
    }
}

impl<R> std::fmt::Debug for CategoryDef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDef")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Holds the category definitions evaluated during classification.
///
/// Registration is only allowed before [`freeze`](Self::freeze); the
/// orchestrator freezes the registry when classification starts, after which
/// it is read-only.
#[derive(Debug)]
pub struct Registry<R> {
    defs: Vec<CategoryDef<R>>,
    frozen: bool,
}

impl<R: Descriptor> Registry<R> {
    pub fn new() -> Self {
        Registry {
            defs: Vec::new(),
            frozen: false,
        }
    }

    /// Register a definition. Fails if the registry is frozen or a
    /// definition with the same name already exists.
    pub fn register(&mut self, def: CategoryDef<R>) -> Result<()> {
        if self.frozen {
            return Err(Error::RegistryFrozen {
                category: def.name().clone(),
            });
        }
        if self.defs.iter().any(|d| d.name() == def.name()) {
            return Err(Error::DuplicateCategory {
                category: def.name().clone(),
            });
        }
        self.defs.push(def);
        Ok(())
    }

    /// Make the registry read-only. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub(crate) fn defs(&self) -> &[CategoryDef<R>] {
        &self.defs
    }
}

impl<R: Descriptor> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxa_common::{ErrorKind, RawKey};

    #[derive(Debug)]
    struct Item(u32);

    impl Descriptor for Item {
        fn key(&self) -> RawKey {
            RawKey::new(format!("item-{}", self.0))
        }
    }

    struct Plain {
        raw: RawKey,
    }

    impl Entry for Plain {
        fn raw_key(&self) -> RawKey {
            self.raw.clone()
        }

        fn category(&self) -> CategoryName {
            CategoryName::new("Plain")
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_arc(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
            self
        }
    }

    fn plain_def(name: &str) -> CategoryDef<Item> {
        CategoryDef::new(name, |raw: &Arc<Item>| {
            Ok(Arc::new(Plain { raw: raw.key() }) as Arc<dyn Entry>)
        })
    }

    #[test]
    fn filters_and_together() {
        let def = plain_def("Both")
            .with_filter(|item: &Item| item.0 % 2 == 0)
            .with_filter(|item: &Item| item.0 < 10);
        assert!(def.matches(&Item(4)));
        assert!(!def.matches(&Item(12)));
        assert!(!def.matches(&Item(3)));
    }

    #[test]
    fn no_filters_matches_everything() {
        let def = plain_def("Any");
        assert!(def.matches(&Item(999)));
        assert_eq!(def.priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.register(plain_def("A")).unwrap();
        let err = registry.register(plain_def("A")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateCategory);
    }

    #[test]
    fn frozen_registry_rejects_registration() {
        let mut registry = Registry::new();
        registry.register(plain_def("A")).unwrap();
        registry.freeze();
        let err = registry.register(plain_def("B")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegistryFrozen);
        assert_eq!(registry.len(), 1);
    }
}
