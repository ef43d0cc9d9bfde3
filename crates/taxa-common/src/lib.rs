//! Taxa common types, identities, and errors.
//!
//! This crate provides foundational types shared across the taxa engine:
//! - Stable identity newtypes for descriptors, categories, and navigations
//! - The engine-wide error taxonomy with stable codes

pub mod error;
pub mod id;

pub use error::{Error, ErrorKind, Result};
pub use id::{CategoryName, NavPath, RawKey};
