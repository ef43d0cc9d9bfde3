//! No-mock diagnostic tree tests.
//!
//! Covers:
//! - Concurrent reporting from many threads without lost updates
//! - Deferred children surfacing late failures
//! - Pruning in both render forms
//! - Scope guard semantics across thread boundaries

use std::thread;

use taxa_report::{Leaf, Node, Rendered};

#[test]
fn concurrent_adds_are_not_lost() {
    let root = Node::new("root");
    let mut handles = Vec::new();
    for t in 0..8 {
        let node = root.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                node.add("worker_error", format!("t{t} i{i}"));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("worker");
    }
    let rendered = root.render().expect("non-empty");
    assert_eq!(rendered.leaf_count(), 800);
}

#[test]
fn concurrent_children_all_attach() {
    let root = Node::new("root");
    let mut handles = Vec::new();
    for t in 0..8 {
        let node = root.clone();
        handles.push(thread::spawn(move || {
            let child = node.create_child(format!("phase-{t}"));
            child.add("kind", "err");
        }));
    }
    for handle in handles {
        handle.join().expect("worker");
    }
    let rendered = root.render().expect("non-empty");
    assert_eq!(rendered.children.len(), 8);
}

#[test]
fn pruned_child_absent_from_both_render_forms() {
    let root = Node::new("root");
    root.create_child("never-used");
    root.add("kind", "only error");

    let rendered = root.render().expect("non-empty");
    assert!(!rendered.to_text().contains("never-used"));

    let value = rendered.to_value();
    assert_eq!(value["children"].as_array().map(Vec::len), Some(0));
}

#[test]
fn deferred_provider_reflects_latest_state() {
    let root = Node::new("root");
    let producer = Node::new("producer");
    let handle = producer.clone();
    root.add_deferred(move || handle.render());

    assert!(root.render().is_none());
    producer.add("late_kind", "first");
    assert_eq!(root.render().expect("one").leaf_count(), 1);
    producer.add("late_kind", "second");
    assert_eq!(root.render().expect("two").leaf_count(), 2);
}

#[test]
fn deferred_provider_returning_empty_tree_is_pruned() {
    let root = Node::new("root");
    root.add_deferred(|| {
        Some(Rendered {
            label: "hollow".into(),
            leaves: Vec::new(),
            children: Vec::new(),
        })
    });
    root.add("kind", "real");
    let rendered = root.render().expect("non-empty");
    assert!(rendered.children.is_empty());
}

#[test]
fn scope_consumed_on_another_thread() {
    let root = Node::new("root");
    let scope = root.scope("work");
    scope.add("kind", "remote failure");
    let taken = thread::spawn(move || scope.consume())
        .join()
        .expect("join")
        .expect("content");
    assert_eq!(taken.leaves, vec![Leaf::new("kind", "remote failure")]);
    assert!(root.is_empty());
}

#[test]
fn nested_scopes_prune_bottom_up() {
    let root = Node::new("root");
    {
        let outer = root.scope("outer");
        {
            let inner = outer.scope("inner");
            inner.keep();
        }
        outer.keep();
    }
    assert!(root.is_empty());
}
