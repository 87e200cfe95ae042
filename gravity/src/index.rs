//! Body -> zone membership bookkeeping.
//!
//! The index stores, for every tracked body, the set of zone ids it currently
//! overlaps. It is mutated by enter/leave notifications and read once per tick
//! by the resolver. Eligibility and exclusion-tag checks happen in the
//! resolver, which knows the zones; the index is pure storage.
//!
//! Pruning rules:
//! - `remove` (a leave event) never prunes the body entry, even if its set is
//!   now empty; a leave for a body that was never a member is a silent no-op.
//! - `purge_zone` removes the zone from every body's set and prunes bodies
//!   left with an empty set.
//! - `remove_body` drops a body outright (stale-handle cleanup during a tick).

use std::collections::{HashMap, HashSet};

use crate::handle::{BodyHandle, ZoneId};

#[derive(Debug, Default)]
pub struct OverlapIndex {
    members: HashMap<BodyHandle, HashSet<ZoneId>>,
}

impl OverlapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `zone` to `body`'s membership set, creating the set if absent.
    /// Returns true when the membership was newly inserted.
    pub fn insert(&mut self, body: BodyHandle, zone: ZoneId) -> bool {
        self.members.entry(body).or_default().insert(zone)
    }

    /// Removes `zone` from `body`'s set if present. Does not prune the body
    /// entry; pruning happens lazily during iteration or on `purge_zone`.
    pub fn remove(&mut self, body: BodyHandle, zone: ZoneId) {
        if let Some(set) = self.members.get_mut(&body) {
            set.remove(&zone);
        }
    }

    /// Removes `zone` from every body's set and prunes now-empty bodies.
    pub fn purge_zone(&mut self, zone: ZoneId) {
        for set in self.members.values_mut() {
            set.remove(&zone);
        }
        self.members.retain(|_, set| !set.is_empty());
    }

    /// Drops a body and its whole set (used when a handle goes stale).
    pub fn remove_body(&mut self, body: BodyHandle) {
        self.members.remove(&body);
    }

    /// The zone set of a tracked body, if any.
    pub fn zones_of(&self, body: BodyHandle) -> Option<&HashSet<ZoneId>> {
        self.members.get(&body)
    }

    /// Snapshot of tracked body handles as of now.
    ///
    /// The resolver iterates this snapshot so that membership mutations made
    /// while resolving (stale-handle pruning) never invalidate the walk.
    pub fn bodies(&self) -> Vec<BodyHandle> {
        self.members.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_without_enter_is_a_silent_noop() {
        let mut index = OverlapIndex::new();
        index.remove(1, 10);
        assert!(index.is_empty());
    }

    #[test]
    fn leave_keeps_the_empty_body_entry() {
        let mut index = OverlapIndex::new();
        index.insert(1, 10);
        index.remove(1, 10);
        // Deliberate: leave never prunes; the entry stays until iteration
        // or unregister cleans it up.
        assert_eq!(index.len(), 1);
        assert!(index.zones_of(1).unwrap().is_empty());
    }

    #[test]
    fn purge_zone_removes_everywhere_and_prunes_empties() {
        let mut index = OverlapIndex::new();
        index.insert(1, 10);
        index.insert(2, 10);
        index.insert(2, 11);

        index.purge_zone(10);

        // Body 1 only overlapped zone 10 and must be gone entirely.
        assert!(index.zones_of(1).is_none());
        // Body 2 keeps its remaining membership.
        assert_eq!(index.zones_of(2).unwrap().len(), 1);
        assert!(index.zones_of(2).unwrap().contains(&11));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn duplicate_enter_is_idempotent() {
        let mut index = OverlapIndex::new();
        assert!(index.insert(1, 10));
        assert!(!index.insert(1, 10));
        assert_eq!(index.zones_of(1).unwrap().len(), 1);
    }
}
