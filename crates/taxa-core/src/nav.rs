//! Memoized navigation slots with cycle detection.
//!
//! A [`NavSlot`] holds one lazily-computed cross-reference of an entry.
//! State machine: `Unresolved → Resolving → Resolved(value) | Failed(error)`.
//! The slot lock is released while the resolver runs, so resolution may
//! navigate through other entries; a reentrant call on the *same* slot
//! observes `Resolving` and reports a cycle instead of deadlocking or
//! recursing. Whatever is stored first — value or failure — is what every
//! later read returns.

use std::sync::Mutex;

use taxa_common::{Error, NavPath, RawKey, Result};

use crate::pool::EntryPool;

enum State<T> {
    Unresolved,
    Resolving,
    Resolved(Option<T>),
    Failed(Error),
}

/// One navigation property of an entry. Owned exclusively by its entry;
/// declare as a field and resolve with a closure over the pool.
pub struct NavSlot<T> {
    name: &'static str,
    required: bool,
    state: Mutex<State<T>>,
}

impl<T: Clone> NavSlot<T> {
    /// A navigation that must resolve to a value; resolving to `None` is a
    /// null violation recorded on first observation.
    pub fn required(name: &'static str) -> Self {
        NavSlot {
            name,
            required: true,
            state: Mutex::new(State::Unresolved),
        }
    }

    /// A navigation for which `None` is a legitimate outcome.
    pub fn optional(name: &'static str) -> Self {
        NavSlot {
            name,
            required: false,
            state: Mutex::new(State::Unresolved),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve the slot, invoking `resolver` only on the first call.
    ///
    /// Later calls return the memoized value or the recorded failure without
    /// re-running the resolver. `owner` is the key of the owning entry, used
    /// to identify the slot in diagnostics.
    pub fn resolve<F>(&self, owner: &RawKey, pool: &EntryPool, resolver: F) -> Result<Option<T>>
    where
        F: FnOnce(&EntryPool) -> Result<Option<T>>,
    {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match &*state {
                State::Resolved(value) => return Ok(value.clone()),
                State::Failed(err) => return Err(err.clone()),
                State::Resolving => {
                    let err = Error::NavigationCycle {
                        path: self.path(owner),
                    };
                    *state = State::Failed(err.clone());
                    return Err(err);
                }
                State::Unresolved => *state = State::Resolving,
            }
        }

        // Lock released: the resolver may navigate other slots freely.
        let outcome = resolver(pool);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let State::Failed(err) = &*state {
            // A reentrant call recorded a cycle underneath us; the first
            // observation wins over whatever the resolver computed.
            return Err(err.clone());
        }
        match outcome {
            Err(err) => {
                *state = State::Failed(err.clone());
                Err(err)
            }
            Ok(None) if self.required => {
                let err = Error::NavigationNullViolation {
                    path: self.path(owner),
                };
                *state = State::Failed(err.clone());
                Err(err)
            }
            Ok(value) => {
                *state = State::Resolved(value.clone());
                Ok(value)
            }
        }
    }

    /// The failure recorded on this slot, if any.
    pub fn failure(&self) -> Option<Error> {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Whether a value (possibly `None` for optional slots) is memoized.
    pub fn is_resolved(&self) -> bool {
        matches!(
            &*self.state.lock().unwrap_or_else(|e| e.into_inner()),
            State::Resolved(_)
        )
    }

    /// The memoized value, without resolving. `None` until resolved.
    pub fn peek(&self) -> Option<Option<T>> {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn path(&self, owner: &RawKey) -> NavPath {
        NavPath::new(owner.clone(), self.name)
    }
}

impl<T> std::fmt::Debug for NavSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Unresolved => "unresolved",
            State::Resolving => "resolving",
            State::Resolved(_) => "resolved",
            State::Failed(_) => "failed",
        };
        f.debug_struct("NavSlot")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("state", &state)
            .finish()
    }
}
