//! The classification engine.
//!
//! For each descriptor: evaluate every definition, keep only the matches in
//! the lowest priority group, then either build the entry (one winner),
//! record an ambiguity (several winners), or silently skip (no match — most
//! descriptors are expected to match nothing). A failure on one descriptor
//! never aborts the batch; everything lands in the supplied report node.

use std::sync::Arc;

use taxa_common::Error;
use taxa_report::{Leaf, Node};
use tracing::{debug, trace};

use crate::descriptor::Descriptor;
use crate::entry::Entry;
use crate::registry::{CategoryDef, Registry};

/// Classify the descriptor pool against a frozen registry.
///
/// Returns the entries that were successfully built; ambiguities and factory
/// failures are recorded as leaves on `errors`, scoped to the descriptor
/// they occurred on.
pub fn classify<R: Descriptor>(
    raws: &[Arc<R>],
    registry: &Registry<R>,
    errors: &Node,
) -> Vec<Arc<dyn Entry>> {
    debug_assert!(registry.is_frozen(), "classify requires a frozen registry");
    let mut entries: Vec<Arc<dyn Entry>> = Vec::new();

    for raw in raws {
        let key = raw.key();
        let matched: Vec<&CategoryDef<R>> = registry
            .defs()
            .iter()
            .filter(|def| def.matches(raw))
            .collect();

        let Some(lowest) = matched.iter().map(|def| def.priority()).min() else {
            trace!(raw = %key, "no definition matched");
            continue;
        };

        let (winners, losers): (Vec<&CategoryDef<R>>, Vec<&CategoryDef<R>>) = matched
            .into_iter()
            .partition(|def| def.priority() == lowest);

        // Ties among out-prioritized definitions are not ambiguity: only the
        // lowest priority group competes. Log them for rule authors.
        if losers.len() > 1 {
            debug!(
                raw = %key,
                lowest,
                losers = losers.len(),
                "out-prioritized definitions also matched"
            );
        }

        if winners.len() > 1 {
            let err = Error::AmbiguousClassification {
                raw: key.clone(),
                priority: lowest,
                candidates: winners.iter().map(|def| def.name().clone()).collect(),
            };
            errors.add_leaf(Leaf::from(&err));
            continue;
        }

        let winner = winners[0];
        match winner.build(raw) {
            Ok(entry) => {
                trace!(raw = %key, category = %winner.name(), "classified");
                entries.push(entry);
            }
            Err(source) => {
                let err = Error::FactoryFailure {
                    raw: key.clone(),
                    category: winner.name().clone(),
                    message: source.to_string(),
                };
                errors.add_leaf(Leaf::from(&err));
            }
        }
    }

    entries
}
