//! Finalized tree rendering.
//!
//! Both renderers are deterministic given the same recorded order: the text
//! form is the human-facing report, the value form feeds agents and tests.

use serde::Serialize;
use serde_json::{json, Value};

use crate::node::Leaf;

/// A finalized (pruned) snapshot of a diagnostic subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Label of the node this snapshot came from.
    pub label: String,
    /// Leaves recorded directly on the node, in recorded order.
    pub leaves: Vec<Leaf>,
    /// Non-empty children, in attachment order.
    pub children: Vec<Rendered>,
}

impl Rendered {
    /// Whether the snapshot carries no errors. Rendering prunes empty
    /// subtrees, so this is only ever true for hand-built values.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.children.iter().all(Rendered::is_empty)
    }

    /// Total number of leaves in the subtree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len() + self.children.iter().map(Rendered::leaf_count).sum::<usize>()
    }

    /// Indented plain-text form.
    ///
    /// Sibling leaves of the same kind are grouped: a lone leaf renders as
    /// `kind: message`, repeats render as a `kind (n)` header with the
    /// messages listed beneath it. Kind order is first-seen order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, 0);
        out
    }

    fn write_text(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        out.push_str(&pad);
        out.push_str(&self.label);
        out.push('\n');
        for (kind, messages) in group_by_kind(&self.leaves) {
            if messages.len() == 1 {
                out.push_str(&format!("{pad}  {kind}: {}\n", messages[0]));
            } else {
                out.push_str(&format!("{pad}  {kind} ({})\n", messages.len()));
                for message in messages {
                    out.push_str(&format!("{pad}    - {message}\n"));
                }
            }
        }
        for child in &self.children {
            child.write_text(out, depth + 1);
        }
    }

    /// Structured tree form: `{label, errors: {kind: [messages]}, children}`.
    pub fn to_value(&self) -> Value {
        let errors: Vec<Value> = group_by_kind(&self.leaves)
            .into_iter()
            .map(|(kind, messages)| {
                json!({
                    "kind": kind,
                    "count": messages.len(),
                    "messages": messages,
                })
            })
            .collect();
        let children: Vec<Value> = self.children.iter().map(Rendered::to_value).collect();
        json!({
            "label": self.label,
            "errors": errors,
            "children": children,
        })
    }
}

/// Group leaves by kind, preserving first-seen kind order and recorded
/// message order within each kind.
fn group_by_kind(leaves: &[Leaf]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for leaf in leaves {
        match groups.iter_mut().find(|(kind, _)| *kind == leaf.kind) {
            Some((_, messages)) => messages.push(leaf.message.clone()),
            None => groups.push((leaf.kind.clone(), vec![leaf.message.clone()])),
        }
    }
    groups
}
