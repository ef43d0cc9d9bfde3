//! Hierarchical, prunable diagnostic tree.
//!
//! This crate provides the error aggregation primitive used by every phase of
//! the taxa engine, and is usable standalone by any component that wants to
//! collect many independent failures without aborting on the first one:
//! - [`Node`]: a thread-safe tree node accepting leaf errors and child nodes
//! - [`Scope`]: a guarded child that prunes itself when empty and refuses to
//!   be silently dropped when it holds errors
//! - [`Rendered`]: the finalized tree with deterministic text and structured
//!   JSON forms, grouping repeated same-kind errors under one header
//!
//! Empty nodes carry no information and never appear in rendered output, so
//! callers create children speculatively at no cost.

pub mod node;
pub mod render;
pub mod scope;

pub use node::{Leaf, Node};
pub use render::Rendered;
pub use scope::Scope;
