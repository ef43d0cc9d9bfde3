//! Taxa Core Library
//!
//! This library classifies a pool of raw descriptors into mutually-exclusive
//! categories using declarative rule sets, resolves lazily-computed
//! cross-references between the classified entries (with cycle detection),
//! runs per-entry post-init and validation hooks, and reports every failure
//! across the whole pipeline as one structured diagnostic tree instead of
//! failing fast:
//! - Category definitions and the frozen registry
//! - The classification engine (priority tie-breaks, ambiguity detection)
//! - Memoized navigation slots with reentrancy detection
//! - The lifecycle orchestrator and the read-only entry pool
//! - Reusable contract helpers for validation hooks
//!
//! The caller assembles the descriptor pool and the definition set up front
//! and passes both into [`lifecycle::build`]; the engine never discovers
//! anything on its own.

pub mod classify;
pub mod contracts;
pub mod descriptor;
pub mod entry;
pub mod lifecycle;
pub mod nav;
pub mod pool;
pub mod registry;

pub use classify::classify;
pub use contracts::Check;
pub use descriptor::Descriptor;
pub use entry::{Derived, Entry, Navigable, PostInit, Validatable};
pub use lifecycle::{build, BuildFailed, Outcome};
pub use nav::NavSlot;
pub use pool::EntryPool;
pub use registry::{CategoryDef, Filter, Registry, DEFAULT_PRIORITY};

pub use taxa_common::{CategoryName, Error, ErrorKind, NavPath, RawKey, Result};
pub use taxa_report::{Leaf, Node, Rendered};
