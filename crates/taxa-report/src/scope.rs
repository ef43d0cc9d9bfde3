//! Guarded child scopes.
//!
//! A [`Scope`] is a child node with deterministic cleanup-on-drop semantics:
//! an empty scope detaches itself from its parent, so speculative scopes cost
//! nothing; a scope holding errors must be explicitly consumed or kept, and
//! raises on drop otherwise so a failure can never be silently swallowed.

use std::fmt;
use std::ops::Deref;
use std::thread;

use crate::node::Node;
use crate::render::Rendered;

/// A guarded child node. Derefs to [`Node`], so errors and grandchildren are
/// recorded through it directly.
pub struct Scope {
    node: Node,
    parent: Node,
    state: State,
}

#[derive(PartialEq)]
enum State {
    Armed,
    Disarmed,
}

impl Scope {
    pub(crate) fn attach(parent: &Node, label: impl Into<String>) -> Self {
        Scope {
            node: parent.create_child(label),
            parent: parent.clone(),
            state: State::Armed,
        }
    }

    /// The underlying node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Detach the scope from its parent and take whatever it recorded.
    ///
    /// Returns `None` if the scope is empty. Either way the parent no longer
    /// references this node.
    pub fn consume(mut self) -> Option<Rendered> {
        self.state = State::Disarmed;
        self.parent.detach_child(&self.node);
        self.node.render()
    }

    /// Leave any recorded content attached to the parent and disarm the
    /// guard: the parent's report is now responsible for surfacing it.
    pub fn keep(mut self) {
        self.state = State::Disarmed;
        if self.node.is_empty() {
            self.parent.detach_child(&self.node);
        }
    }
}

impl Deref for Scope {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("label", &self.node.label())
            .finish_non_exhaustive()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.state == State::Disarmed {
            return;
        }
        match self.node.render() {
            None => self.parent.detach_child(&self.node),
            Some(rendered) => {
                // Errors were recorded but nobody consumed or kept them.
                if !thread::panicking() {
                    panic!(
                        "scope '{}' dropped with unhandled errors:\n{}",
                        self.node.label(),
                        rendered.to_text()
                    );
                }
            }
        }
    }
}
