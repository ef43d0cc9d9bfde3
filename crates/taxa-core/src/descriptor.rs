//! The raw descriptor seam.
//!
//! A descriptor is whatever opaque input item the caller wants classified.
//! The engine only ever reads it: filters inspect its structure, factories
//! turn it into entries, and its key identifies it in every diagnostic.

use taxa_common::RawKey;

/// An unclassified input item with a stable identity.
///
/// The pool of descriptors is assembled by an external collaborator and
/// handed to [`build`](crate::lifecycle::build) as an immutable snapshot;
/// keys are expected to be unique across the pool.
pub trait Descriptor: Send + Sync + 'static {
    /// Stable identity of this descriptor, used in diagnostics and for
    /// entry lookup on the finished pool.
    fn key(&self) -> RawKey;
}
