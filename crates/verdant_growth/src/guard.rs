//! Reentrancy markers for per-entity operations.
//!
//! A destruction cascade can synchronously trigger further destruction
//! events for the same plant; the marker set drops the reentrant call
//! instead of recursing. The guard clears its marker in `Drop`, so every
//! exit path - early return, `?`, panic unwind - releases it.

use std::collections::HashSet;

use parking_lot::Mutex;
use verdant_shared::EntityId;

/// Which logical operation is in flight for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Operation {
    /// A timed or random growth update.
    Growth,
    /// A destruction/connectivity query.
    Destruction,
}

/// The set of (entity, operation) pairs currently executing.
#[derive(Debug, Default)]
pub(crate) struct OperationGuardSet {
    active: Mutex<HashSet<(EntityId, Operation)>>,
}

impl OperationGuardSet {
    /// Marks (entity, operation) in-progress.
    ///
    /// Returns `None` if it already is - the caller must drop the
    /// reentrant invocation.
    pub(crate) fn try_begin(
        &self,
        entity: EntityId,
        operation: Operation,
    ) -> Option<OperationGuard<'_>> {
        let mut active = self.active.lock();
        if !active.insert((entity, operation)) {
            return None;
        }
        Some(OperationGuard { set: self, key: (entity, operation) })
    }
}

/// RAII marker; clears its (entity, operation) entry on drop.
#[derive(Debug)]
pub(crate) struct OperationGuard<'a> {
    set: &'a OperationGuardSet,
    key: (EntityId, Operation),
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.set.active.lock().remove(&self.key);
    }
}
