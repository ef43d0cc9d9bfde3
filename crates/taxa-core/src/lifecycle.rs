//! The build orchestrator.
//!
//! Strict phase order: classify → materialize navigations → post-init hooks →
//! validation hooks → finalize. No phase starts before the previous one has
//! been attempted for every entry, and a failure in one entry never blocks
//! siblings from progressing through the same phase. Every phase reports into
//! its own child of one diagnostic tree; the aggregate alone decides whether
//! the build succeeded.

use std::sync::Arc;

use taxa_report::{Leaf, Node, Rendered};
use thiserror::Error;
use tracing::{debug_span, info};

use crate::classify::classify;
use crate::contracts::Check;
use crate::descriptor::Descriptor;
use crate::entry::Entry;
use crate::pool::EntryPool;
use crate::registry::Registry;

/// The finished build: the read-only pool plus whatever diagnostics were
/// recorded along the way. The caller decides whether to inspect or fail.
pub struct Outcome {
    pool: EntryPool,
    report: Node,
}

impl Outcome {
    /// The classified entry pool. Present even when the build recorded
    /// errors: entries that survived their phases stay queryable.
    pub fn pool(&self) -> &EntryPool {
        &self.pool
    }

    /// Render the diagnostic tree, or `None` for a clean build.
    ///
    /// Rendering is repeatable; navigation failures recorded by on-demand
    /// resolution after the build still surface here.
    pub fn diagnostics(&self) -> Option<Rendered> {
        self.report.render()
    }

    pub fn is_success(&self) -> bool {
        self.report.is_empty()
    }

    /// Convert into the pool, failing if any error was recorded.
    pub fn into_result(self) -> Result<EntryPool, BuildFailed> {
        match self.report.render() {
            None => Ok(self.pool),
            Some(rendered) => Err(BuildFailed { rendered }),
        }
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outcome")
            .field("entries", &self.pool.len())
            .field("success", &self.is_success())
            .finish()
    }
}

/// The build recorded at least one error. `Display` is the full indented
/// report, so propagating this with `?` surfaces every failure at once.
#[derive(Debug, Error)]
#[error("build failed with {} error(s):\n{}", rendered.leaf_count(), rendered.to_text())]
pub struct BuildFailed {
    pub rendered: Rendered,
}

/// Run the full lifecycle over an immutable descriptor snapshot.
///
/// Freezes the registry, classifies every descriptor, eagerly forces every
/// navigation slot on every navigable entry, then runs post-init and
/// validation hooks with per-entry report children.
pub fn build<R: Descriptor>(raws: Vec<Arc<R>>, mut registry: Registry<R>) -> Outcome {
    let report = Node::new("build");
    registry.freeze();

    let pool = {
        let _span = debug_span!("classify").entered();
        let errors = report.create_child("classification");
        let entries = classify(&raws, &registry, &errors);
        info!(
            raws = raws.len(),
            definitions = registry.len(),
            entries = entries.len(),
            "classification complete"
        );
        EntryPool::build(entries, &errors)
    };

    {
        let _span = debug_span!("materialize").entered();
        let errors = report.create_child("navigation");
        let navigable: Vec<Arc<dyn Entry>> = pool
            .iter()
            .filter(|entry| entry.as_navigable().is_some())
            .cloned()
            .collect();
        for entry in &navigable {
            if let Some(nav) = entry.as_navigable() {
                nav.materialize(&pool);
            }
        }
        info!(navigable = navigable.len(), "navigations materialized");
        // Deferred so failures recorded by later on-demand resolution (a
        // consumer navigating an optional slot the entry never declared for
        // materialization) still show up in the final report.
        errors.add_deferred(move || {
            let leaves: Vec<Leaf> = navigable
                .iter()
                .filter_map(|entry| entry.as_navigable())
                .flat_map(|nav| nav.nav_failures())
                .map(|err| Leaf::from(&err))
                .collect();
            if leaves.is_empty() {
                return None;
            }
            Some(Rendered {
                label: "slots".to_string(),
                leaves,
                children: Vec::new(),
            })
        });
    }

    {
        let _span = debug_span!("post_init").entered();
        let errors = report.create_child("post-init");
        for entry in pool.iter() {
            if let Some(hook) = entry.as_post_init() {
                let child = errors.create_child(entry.raw_key().to_string());
                hook.post_init(&pool, &child);
            }
        }
    }

    {
        let _span = debug_span!("validate").entered();
        let errors = report.create_child("validation");
        for entry in pool.iter() {
            if let Some(hook) = entry.as_validatable() {
                let child = errors.create_child(entry.raw_key().to_string());
                let mut check = Check::new(entry.raw_key(), &child);
                hook.validate(&pool, &mut check);
            }
        }
    }

    let outcome = Outcome { pool, report };
    match outcome.diagnostics() {
        None => info!(entries = outcome.pool.len(), "build succeeded"),
        Some(rendered) => info!(
            entries = outcome.pool.len(),
            errors = rendered.leaf_count(),
            "build completed with errors"
        ),
    }
    outcome
}
