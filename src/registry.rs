//! Registry of currently managed patches.
//!
//! Admission here is the single de-duplication point for the whole hub: the
//! scanner admits a patch before spawning its session, and the session
//! releases it on the way out.  Both run concurrently, so every operation
//! takes the one internal lock.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::ble::PatchId;

/// Registry entry for a patch that currently has a live session.
#[derive(Debug, Clone)]
pub struct ManagedPatch {
    pub id: PatchId,
    pub name: String,
    pub joined_at: DateTime<Local>,
}

/// Concurrency-safe set of managed patch identities.
#[derive(Default)]
pub struct PatchRegistry {
    inner: Mutex<HashMap<PatchId, ManagedPatch>>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert `id` iff absent.
    ///
    /// Returns `false` (and changes nothing) when the patch is already
    /// managed.  Callers may only spawn a session after a `true` return;
    /// that rule is what keeps one patch from ever having two sessions.
    pub fn try_admit(&self, id: &PatchId, name: &str) -> bool {
        match self.inner.lock().entry(id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ManagedPatch {
                    id: id.clone(),
                    name: name.to_owned(),
                    joined_at: Local::now(),
                });
                true
            }
        }
    }

    /// Remove `id` unconditionally.
    ///
    /// Idempotent: releasing an absent identity is a no-op, which lets a
    /// late disconnect callback race an agent-initiated teardown safely.
    pub fn release(&self, id: &PatchId) {
        self.inner.lock().remove(id);
    }

    pub fn contains(&self, id: &PatchId) -> bool {
        self.inner.lock().contains_key(id)
    }

    /// Identities of all currently managed patches.
    pub fn snapshot(&self) -> Vec<PatchId> {
        self.inner.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
