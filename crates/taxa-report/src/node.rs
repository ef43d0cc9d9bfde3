//! Tree nodes and leaf errors.
//!
//! A [`Node`] is a cheap clonable handle onto shared state. Leaf and child
//! lists sit behind a mutex so independent workers can report into the same
//! node concurrently without lost updates. Values are append-only; pruning
//! happens at render time (and on [`Scope`](crate::Scope) exit), never by
//! mutating recorded errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::render::Rendered;

/// A single recorded error: a kind used for grouping plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Grouping key, e.g. `ambiguous_classification`.
    pub kind: String,
    /// Human-readable detail, including enough identity to locate the cause.
    pub message: String,
}

impl Leaf {
    /// Create a leaf with an explicit kind.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Leaf {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Kind used by [`Node::add_error`] when the caller has no taxonomy of its own.
pub const GENERIC_KIND: &str = "error";

/// A child whose content is produced lazily at render time.
type DeferredProvider = Box<dyn Fn() -> Option<Rendered> + Send + Sync>;

enum Child {
    Eager(Node),
    Deferred(DeferredProvider),
}

struct Inner {
    label: String,
    leaves: Mutex<Vec<Leaf>>,
    children: Mutex<Vec<Child>>,
}

/// One node of the diagnostic tree.
///
/// Cloning a `Node` clones the handle, not the content; all clones report
/// into the same underlying node.
#[derive(Clone)]
pub struct Node {
    inner: Arc<Inner>,
}

impl Node {
    /// Create a detached node, typically the root of a report.
    pub fn new(label: impl Into<String>) -> Self {
        Node {
            inner: Arc::new(Inner {
                label: label.into(),
                leaves: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The label this node renders under.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Append a leaf with an explicit kind.
    pub fn add(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.add_leaf(Leaf::new(kind, message));
    }

    /// Append a pre-built leaf (e.g. converted from a typed error).
    pub fn add_leaf(&self, leaf: Leaf) {
        self.inner
            .leaves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(leaf);
    }

    /// Append a generic leaf from anything displayable.
    pub fn add_error(&self, message: impl fmt::Display) {
        self.add_leaf(Leaf::new(GENERIC_KIND, message.to_string()));
    }

    /// Create and attach a child node.
    ///
    /// Children may be created speculatively: a child that never receives a
    /// leaf (directly or transitively) is excluded from rendered output.
    pub fn create_child(&self, label: impl Into<String>) -> Node {
        let child = Node::new(label);
        self.inner
            .children
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Child::Eager(child.clone()));
        child
    }

    /// Attach a child whose content is computed at render time.
    ///
    /// The provider runs on every render, so late failures recorded by its
    /// producer after registration still surface. Returning `None` (or an
    /// empty tree) prunes the child from that render.
    pub fn add_deferred(&self, provider: impl Fn() -> Option<Rendered> + Send + Sync + 'static) {
        self.inner
            .children
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Child::Deferred(Box::new(provider)));
    }

    /// Create a guarded child scope. See [`Scope`](crate::Scope).
    pub fn scope(&self, label: impl Into<String>) -> crate::Scope {
        crate::Scope::attach(self, label)
    }

    /// Whether this subtree carries no errors at all.
    ///
    /// Deferred providers are evaluated, so this reflects the same answer
    /// [`Node::render`] would give.
    pub fn is_empty(&self) -> bool {
        self.render().is_none()
    }

    /// Render this subtree, or `None` if nothing has been recorded anywhere
    /// in it. Empty descendants are pruned.
    pub fn render(&self) -> Option<Rendered> {
        let leaves = self
            .inner
            .leaves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let mut children = Vec::new();
        {
            let guard = self
                .inner
                .children
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            for child in guard.iter() {
                let rendered = match child {
                    Child::Eager(node) => node.render(),
                    Child::Deferred(provider) => provider().filter(|r| !r.is_empty()),
                };
                if let Some(r) = rendered {
                    children.push(r);
                }
            }
        }
        if leaves.is_empty() && children.is_empty() {
            return None;
        }
        Some(Rendered {
            label: self.inner.label.clone(),
            leaves,
            children,
        })
    }

    /// Detach a previously attached eager child. Used by scope guards when
    /// their node turned out empty; unknown children are ignored.
    pub(crate) fn detach_child(&self, node: &Node) {
        let mut guard = self
            .inner
            .children
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        guard.retain(|child| match child {
            Child::Eager(n) => !Arc::ptr_eq(&n.inner, &node.inner),
            Child::Deferred(_) => true,
        });
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("label", &self.inner.label)
            .finish_non_exhaustive()
    }
}
