//! Re-entry history for composite states.
//!
//! When a composite state is left, the store remembers which child was
//! active inside it. Re-entering with [`HistoryType::Shallow`] or
//! [`HistoryType::Deep`] resumes from those records instead of the
//! child-initial chain.

use crate::core::{EventId, StateId};
use crate::hierarchy::{Hierarchy, StateIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which nested state to resume when re-entering a composite state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryType {
    /// Always enter the child-initial chain.
    #[default]
    None,
    /// Resume the last active immediate child, then its initial chain.
    Shallow,
    /// Resume the last active child at every nested level.
    Deep,
}

/// The child that was active inside `parent` when it was last left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HistoryEntry<S: StateId> {
    pub parent: S,
    pub child: S,
    pub recorded_at: DateTime<Utc>,
}

/// Last active child per composite state.
///
/// Serializable so a machine can checkpoint it alongside its current
/// state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HistoryStore<S: StateId> {
    entries: Vec<HistoryEntry<S>>,
}

impl<S: StateId> Default for HistoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> HistoryStore<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Remember `child` as the active child of `parent`, replacing any
    /// earlier record for `parent`.
    pub fn record(&mut self, parent: &S, child: &S) {
        let recorded_at = Utc::now();
        match self.entries.iter_mut().find(|e| e.parent == *parent) {
            Some(entry) => {
                entry.child = child.clone();
                entry.recorded_at = recorded_at;
            }
            None => self.entries.push(HistoryEntry {
                parent: parent.clone(),
                child: child.clone(),
                recorded_at,
            }),
        }
    }

    /// Record the whole active chain ending at `leaf`: every ancestor gets
    /// the child through which `leaf` is reached.
    pub fn record_exit<E: EventId, C>(&mut self, hierarchy: &Hierarchy<S, E, C>, leaf: StateIndex) {
        let mut child = leaf;
        for parent in hierarchy.ancestors(leaf) {
            self.record(hierarchy.id(parent), hierarchy.id(child));
            child = parent;
        }
    }

    pub fn last_active(&self, parent: &S) -> Option<&S> {
        self.entry(parent).map(|e| &e.child)
    }

    pub fn entry(&self, parent: &S) -> Option<&HistoryEntry<S>> {
        self.entries.iter().find(|e| e.parent == *parent)
    }

    pub fn entries(&self) -> &[HistoryEntry<S>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn forget(&mut self, parent: &S) {
        self.entries.retain(|e| e.parent != *parent);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
