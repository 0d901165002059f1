//! Per-cycle candidate queue
//!
//! A flat ranked container over the whole candidate set. Insertion
//! deduplicates on canonical identity; extraction is a plain O(n) scan for
//! the highest priority; actor counts per turn are small and clarity of
//! flow matters more than asymptotics here.

use std::collections::BTreeSet;

use super::Objective;

/// All currently-valid objectives for one planning cycle
#[derive(Debug, Clone, Default)]
pub struct ObjectiveQueue {
    entries: BTreeSet<Objective>,
}

impl ObjectiveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate. A same-identity duplicate (fresh jitter or not)
    /// is discarded and `false` returned.
    pub fn insert(&mut self, objective: Objective) -> bool {
        self.entries.insert(objective)
    }

    /// The single best remaining candidate, or `None` when nothing is left
    ///
    /// Exact priority ties are possible but not contractually ordered;
    /// either entry may win.
    pub fn best(&self) -> Option<&Objective> {
        self.entries.iter().max_by_key(|o| o.priority())
    }

    /// Drop a fulfilled objective together with every entry that it
    /// invalidated outright: any candidate aimed at the same map object.
    ///
    /// Same-actor survivors stay queued; fulfillment re-validates them
    /// against the live world before a command is ever issued.
    pub fn retire(&mut self, done: &Objective) {
        let done_target = done.target().copied();
        self.entries.retain(|entry| {
            if entry == done {
                return false;
            }
            match (done_target, entry.target()) {
                (Some(t), Some(e)) => t != *e,
                _ => true,
            }
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Objective> {
        self.entries.iter()
    }
}
