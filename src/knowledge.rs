//! Long-lived map knowledge
//!
//! The planner remembers every visitable object it has seen but not yet
//! acted on. Objects leave this set when the engine removes them or once a
//! hero successfully visits them; fog rolling back in does NOT forget them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::core::types::{MapPos, ObjectId};
use crate::engine::{ObjectInfo, ObjectKind};

/// A map object the AI has observed but not yet visited
///
/// Identity is `(pos, id)`; the kind is carried along for planning but does
/// not participate in ordering or equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KnownObject {
    pub pos: MapPos,
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl KnownObject {
    pub fn new(pos: MapPos, id: ObjectId, kind: ObjectKind) -> Self {
        Self { pos, id, kind }
    }
}

impl From<ObjectInfo> for KnownObject {
    fn from(info: ObjectInfo) -> Self {
        Self::new(info.pos, info.id, info.kind)
    }
}

impl PartialEq for KnownObject {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.id == other.id
    }
}

impl Eq for KnownObject {}

impl Ord for KnownObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos
            .cmp(&other.pos)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for KnownObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The deduplicated set of known-but-unvisited objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnownObjects(BTreeSet<KnownObject>);

impl KnownObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly observed object. Re-observing is a no-op.
    pub fn insert(&mut self, object: KnownObject) -> bool {
        self.0.insert(object)
    }

    /// Forget an object (removed from the map, or successfully visited)
    pub fn remove(&mut self, pos: MapPos, id: ObjectId) -> bool {
        self.0.remove(&KnownObject::new(pos, id, ObjectKind::Other))
    }

    /// Forget by identity alone, for notifications that carry no position
    pub fn remove_by_id(&mut self, id: ObjectId) -> bool {
        let found = self.0.iter().find(|o| o.id == id).copied();
        match found {
            Some(object) => self.0.remove(&object),
            None => false,
        }
    }

    pub fn contains(&self, pos: MapPos, id: ObjectId) -> bool {
        self.0.contains(&KnownObject::new(pos, id, ObjectKind::Other))
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownObject> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obj(x: i32, y: i32, id: u32) -> KnownObject {
        KnownObject::new(MapPos::new(x, y, 0), ObjectId(id), ObjectKind::Treasure)
    }

    #[test]
    fn test_insert_deduplicates_on_identity() {
        let mut known = KnownObjects::new();
        assert!(known.insert(obj(3, 4, 7)));
        // Same (pos, id), different kind: still the same object
        assert!(!known.insert(KnownObject::new(
            MapPos::new(3, 4, 0),
            ObjectId(7),
            ObjectKind::Monster
        )));
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut known = KnownObjects::new();
        known.insert(obj(1, 1, 1));
        known.insert(obj(2, 2, 2));

        assert!(known.remove(MapPos::new(1, 1, 0), ObjectId(1)));
        assert!(!known.remove(MapPos::new(1, 1, 0), ObjectId(1)));
        assert_eq!(known.len(), 1);
        assert!(known.contains(MapPos::new(2, 2, 0), ObjectId(2)));
    }

    #[test]
    fn test_remove_by_id_scans() {
        let mut known = KnownObjects::new();
        known.insert(obj(5, 5, 9));
        assert!(known.remove_by_id(ObjectId(9)));
        assert!(known.is_empty());
        assert!(!known.remove_by_id(ObjectId(9)));
    }

    #[test]
    fn test_canonical_order_is_position_then_id() {
        assert!(obj(1, 5, 9) < obj(2, 0, 0));
        assert!(obj(2, 2, 1) < obj(2, 2, 2));
    }

    proptest! {
        /// After any interleaving of inserts and removes, the set holds
        /// exactly the objects added and not subsequently removed.
        #[test]
        fn prop_set_matches_add_remove_history(
            ops in prop::collection::vec((0i32..6, 0i32..6, 0u32..12, prop::bool::ANY), 0..60)
        ) {
            let mut known = KnownObjects::new();
            let mut model = std::collections::BTreeSet::new();

            for (x, y, id, add) in ops {
                if add {
                    known.insert(obj(x, y, id));
                    model.insert((x, y, id));
                } else {
                    known.remove(MapPos::new(x, y, 0), ObjectId(id));
                    model.remove(&(x, y, id));
                }
            }

            prop_assert_eq!(known.len(), model.len());
            for (x, y, id) in model {
                prop_assert!(known.contains(MapPos::new(x, y, 0), ObjectId(id)));
            }
        }
    }
}
