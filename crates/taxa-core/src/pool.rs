//! The read-only entry pool and its typed query surface.
//!
//! Built once by the orchestrator after classification; immutable afterwards.
//! Typed queries downcast through [`Entry::as_any`], so `pool.get::<OrderEntry>(key)`
//! returns the concrete entry type. Lookup failures here are the only errors
//! in the engine that propagate directly to the caller: by the time the pool
//! is queried it is guaranteed complete.

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use taxa_common::{Error, RawKey, Result};
use taxa_report::{Leaf, Node};

use crate::entry::Entry;

/// Read-only index of classified entries, keyed by raw descriptor key.
pub struct EntryPool {
    entries: Vec<Arc<dyn Entry>>,
    index: HashMap<RawKey, usize>,
}

impl EntryPool {
    /// Build the pool. Input is expected to hold at most one entry per raw
    /// key; violations are recorded on `errors` and the first entry wins.
    pub(crate) fn build(entries: Vec<Arc<dyn Entry>>, errors: &Node) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        let mut kept: Vec<Arc<dyn Entry>> = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = entry.raw_key();
            if index.contains_key(&key) {
                let err = Error::DuplicateKey { raw: key };
                errors.add_leaf(Leaf::from(&err));
                continue;
            }
            index.insert(key, kept.len());
            kept.push(entry);
        }
        EntryPool {
            entries: kept,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, untyped, in classification order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Entry>> {
        self.entries.iter()
    }

    /// All entries of category type `C`. Order is not significant.
    pub fn all<C: Entry>(&self) -> impl Iterator<Item = &C> {
        self.entries
            .iter()
            .filter_map(|entry| entry.as_any().downcast_ref::<C>())
    }

    /// Entries of type `C` satisfying the predicate.
    pub fn filtered<C: Entry>(&self, predicate: impl Fn(&C) -> bool) -> Vec<&C> {
        self.all::<C>().filter(|entry| predicate(entry)).collect()
    }

    /// The entry of type `C` classified for `raw`.
    pub fn get<C: Entry>(&self, raw: &RawKey) -> Result<&C> {
        self.try_get(raw).ok_or_else(|| Error::NotFound {
            category: short_type_name::<C>().to_string(),
            query: format!("raw '{raw}'"),
        })
    }

    /// Like [`get`](Self::get) but `None` instead of failing.
    pub fn try_get<C: Entry>(&self, raw: &RawKey) -> Option<&C> {
        self.index
            .get(raw)
            .and_then(|&i| self.entries[i].as_any().downcast_ref::<C>())
    }

    /// Owning handle to the entry for `raw`, for storing in navigation slots.
    pub fn get_arc<C: Entry>(&self, raw: &RawKey) -> Result<Arc<C>> {
        self.try_get_arc(raw).ok_or_else(|| Error::NotFound {
            category: short_type_name::<C>().to_string(),
            query: format!("raw '{raw}'"),
        })
    }

    /// Like [`get_arc`](Self::get_arc) but `None` instead of failing.
    pub fn try_get_arc<C: Entry>(&self, raw: &RawKey) -> Option<Arc<C>> {
        let entry = self.index.get(raw).map(|&i| self.entries[i].clone())?;
        entry.as_any_arc().downcast::<C>().ok()
    }

    /// The one entry of type `C` satisfying the predicate.
    ///
    /// Fails with `NotFound` for zero matches and `AmbiguousMatch` for more
    /// than one.
    pub fn single<C: Entry>(&self, predicate: impl Fn(&C) -> bool) -> Result<&C> {
        self.try_single(predicate)?.ok_or_else(|| Error::NotFound {
            category: short_type_name::<C>().to_string(),
            query: "predicate".to_string(),
        })
    }

    /// Like [`single`](Self::single) but zero matches is `Ok(None)`; more
    /// than one is still an error.
    pub fn try_single<C: Entry>(&self, predicate: impl Fn(&C) -> bool) -> Result<Option<&C>> {
        let mut iter = self.all::<C>().filter(|entry| predicate(entry));
        let first = iter.next();
        let rest = iter.count();
        if rest > 0 {
            return Err(Error::AmbiguousMatch {
                category: short_type_name::<C>().to_string(),
                matched: rest + 1,
            });
        }
        Ok(first)
    }
}

impl std::fmt::Debug for EntryPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPool")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Last path segment of a type name, for readable query errors.
fn short_type_name<C>() -> &'static str {
    let full = type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use taxa_common::{CategoryName, ErrorKind};

    #[derive(Debug)]
    struct Alpha {
        raw: RawKey,
        n: i64,
    }

    impl Entry for Alpha {
        fn raw_key(&self) -> RawKey {
            self.raw.clone()
        }

        fn category(&self) -> CategoryName {
            CategoryName::new("Alpha")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[derive(Debug)]
    struct Beta {
        raw: RawKey,
    }

    impl Entry for Beta {
        fn raw_key(&self) -> RawKey {
            self.raw.clone()
        }

        fn category(&self) -> CategoryName {
            CategoryName::new("Beta")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn alpha(key: &str, n: i64) -> Arc<dyn Entry> {
        Arc::new(Alpha {
            raw: RawKey::new(key),
            n,
        })
    }

    fn beta(key: &str) -> Arc<dyn Entry> {
        Arc::new(Beta {
            raw: RawKey::new(key),
        })
    }

    fn sample() -> EntryPool {
        EntryPool::build(
            vec![alpha("a1", 1), alpha("a2", 2), beta("b1")],
            &Node::new("test"),
        )
    }

    #[test]
    fn all_filters_by_type() {
        let pool = sample();
        assert_eq!(pool.all::<Alpha>().count(), 2);
        assert_eq!(pool.all::<Beta>().count(), 1);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn get_and_try_get() {
        let pool = sample();
        assert_eq!(pool.get::<Alpha>(&"a1".into()).unwrap().n, 1);
        assert!(pool.try_get::<Alpha>(&"missing".into()).is_none());
        // Wrong category type is NotFound too.
        let err = pool.get::<Beta>(&"a1".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("Beta"));
        assert!(err.to_string().contains("a1"));
    }

    #[test]
    fn arc_retrieval_downcasts() {
        let pool = sample();
        let entry = pool.get_arc::<Alpha>(&"a2".into()).unwrap();
        assert_eq!(entry.n, 2);
        assert!(pool.try_get_arc::<Beta>(&"a2".into()).is_none());
    }

    #[test]
    fn single_and_try_single() {
        let pool = sample();
        assert_eq!(pool.single::<Alpha>(|e| e.n == 2).unwrap().n, 2);

        let err = pool.single::<Alpha>(|_| true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
        assert!(err.to_string().contains('2'));

        assert!(pool.try_single::<Alpha>(|e| e.n == 99).unwrap().is_none());
        let err = pool.try_single::<Alpha>(|_| true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);

        let err = pool.single::<Beta>(|_| false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn duplicate_key_recorded_first_wins() {
        let errors = Node::new("test");
        let pool = EntryPool::build(vec![alpha("dup", 1), alpha("dup", 2)], &errors);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get::<Alpha>(&"dup".into()).unwrap().n, 1);
        let rendered = errors.render().expect("duplicate recorded");
        assert_eq!(rendered.leaves[0].kind, "duplicate_key");
    }
}
