//! Reusable contract helpers for validation hooks.
//!
//! A [`Check`] wraps an entry's error-reporting child node: every helper
//! appends a validation-failure leaf instead of returning early, so one hook
//! can record all of its violations in a single pass and sibling entries are
//! never affected.

use taxa_common::{Error, RawKey};
use taxa_report::{Leaf, Node};

/// Assertion context handed to a [`Validatable`](crate::entry::Validatable)
/// hook. Violations land on the entry's child node in the diagnostic tree.
pub struct Check<'a> {
    raw: RawKey,
    node: &'a Node,
    failures: usize,
}

impl<'a> Check<'a> {
    pub fn new(raw: RawKey, node: &'a Node) -> Self {
        Check {
            raw,
            node,
            failures: 0,
        }
    }

    /// Record a violation unconditionally.
    pub fn fail(&mut self, message: impl Into<String>) {
        let err = Error::ValidationFailure {
            raw: self.raw.clone(),
            message: message.into(),
        };
        self.node.add_leaf(Leaf::from(&err));
        self.failures += 1;
    }

    /// Require the condition to hold. Returns whether it did.
    pub fn require(&mut self, condition: bool, message: impl Into<String>) -> bool {
        if !condition {
            self.fail(message);
        }
        condition
    }

    /// Require the condition to be false. Returns whether it was.
    pub fn forbid(&mut self, condition: bool, message: impl Into<String>) -> bool {
        self.require(!condition, message)
    }

    /// Require a value to be present, passing it through when it is.
    pub fn require_some<T>(&mut self, value: Option<T>, message: impl Into<String>) -> Option<T> {
        if value.is_none() {
            self.fail(message);
        }
        value
    }

    /// Require an exact count, e.g. "must have 2 type parameters".
    pub fn require_count(&mut self, what: &str, actual: usize, expected: usize) -> bool {
        self.require(
            actual == expected,
            format!("must have {expected} {what}, found {actual}"),
        )
    }

    /// Require a named capability to appear in the descriptor's capability
    /// list, e.g. "must implement Comparable".
    pub fn require_capability(&mut self, capabilities: &[&str], needed: &str) -> bool {
        self.require(
            capabilities.contains(&needed),
            format!("must implement capability '{needed}'"),
        )
    }

    /// Number of violations recorded through this check.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Whether any violation was recorded.
    pub fn failed(&self) -> bool {
        self.failures > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_records_and_reports() {
        let node = Node::new("entry");
        let mut check = Check::new(RawKey::new("model"), &node);

        assert!(check.require(true, "unused"));
        assert!(!check.require(false, "field list must not be empty"));
        assert!(check.failed());
        assert_eq!(check.failures(), 1);

        let rendered = node.render().expect("violation recorded");
        assert_eq!(rendered.leaves[0].kind, "validation_failure");
        assert!(rendered.leaves[0].message.contains("model"));
        assert!(rendered.leaves[0].message.contains("field list"));
    }

    #[test]
    fn all_violations_recorded_in_one_pass() {
        let node = Node::new("entry");
        let mut check = Check::new(RawKey::new("model"), &node);

        check.forbid(true, "must not be parametric");
        check.require_count("type parameters", 3, 1);
        check.require_capability(&["Cloneable"], "Comparable");
        assert!(check.require_some(None::<u8>, "missing partner").is_none());

        assert_eq!(check.failures(), 4);
        assert_eq!(node.render().expect("violations").leaf_count(), 4);
    }

    #[test]
    fn clean_check_leaves_node_empty() {
        let node = Node::new("entry");
        let mut check = Check::new(RawKey::new("model"), &node);
        check.require(true, "fine");
        check.require_capability(&["Comparable"], "Comparable");
        assert!(!check.failed());
        assert!(node.is_empty());
    }
}
