//! Per-cycle planning snapshot
//!
//! What the planner believes it can work with, captured in one pass over the
//! rules engine. A snapshot never mutates after creation: fulfillment and
//! `pretend` produce *new* snapshots describing the hypothetical world after
//! an action, and every objective holds slot indices into exactly one
//! snapshot generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::types::{HeroId, MapPos, ResourceKind, ResourcePool, TownId};
use crate::engine::{
    BuildCandidate, HeroInfo, RecruitableStack, RulesEngine, TownInfo, UpgradeCandidate,
};
use crate::knowledge::{KnownObject, KnownObjects};

/// Stable index of a hero within one snapshot generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HeroSlot(pub usize);

/// Stable index of a town within one snapshot generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TownSlot(pub usize);

/// Planning view of one owned hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroView {
    pub id: HeroId,
    pub pos: MapPos,
    /// Movement points left this turn
    pub movement_left: u32,
    /// Point of interest the hero is heading toward, if any
    pub goal: Option<MapPos>,
}

impl HeroView {
    fn from_info(info: HeroInfo) -> Self {
        Self {
            id: info.id,
            pos: info.pos,
            movement_left: info.movement_left,
            goal: None,
        }
    }
}

/// Planning view of one owned town
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownView {
    pub id: TownId,
    pub pos: MapPos,
    pub built_this_turn: bool,
    pub visiting_hero: Option<HeroId>,
    pub recruitable: Vec<RecruitableStack>,
    pub buildable: Vec<BuildCandidate>,
    pub upgradable: Vec<UpgradeCandidate>,
}

impl TownView {
    fn from_info(info: TownInfo) -> Self {
        Self {
            id: info.id,
            pos: info.pos,
            built_this_turn: info.built_this_turn,
            visiting_hero: info.visiting_hero,
            recruitable: info.recruitable,
            buildable: info.buildable,
            upgradable: info.upgradable,
        }
    }
}

/// Everything one planning cycle reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub heroes: Vec<HeroView>,
    pub towns: Vec<TownView>,
    /// Heroes hireable at the first owned town (empty when townless)
    pub hireable: Vec<HeroInfo>,
    pub resources: ResourcePool,
    /// Copy of the long-lived known-objects set at capture time
    pub objects: BTreeSet<KnownObject>,
}

impl WorldSnapshot {
    /// Capture the engine's state at this instant. Pure read.
    pub fn capture<E: RulesEngine + ?Sized>(engine: &E, known: &KnownObjects) -> Self {
        let heroes = engine
            .owned_heroes()
            .into_iter()
            .map(HeroView::from_info)
            .collect();

        let towns: Vec<TownView> = engine
            .owned_towns()
            .into_iter()
            .map(TownView::from_info)
            .collect();

        let hireable = match towns.first() {
            Some(first) if engine.town_count() > 0 => engine.heroes_for_hire(first.id),
            _ => Vec::new(),
        };

        let mut resources = ResourcePool::new();
        for &kind in &ResourceKind::ALL {
            resources.set(kind, engine.resource_amount(kind));
        }

        Self {
            heroes,
            towns,
            hireable,
            resources,
            objects: known.iter().copied().collect(),
        }
    }

    pub fn hero(&self, slot: HeroSlot) -> Option<&HeroView> {
        self.heroes.get(slot.0)
    }

    pub fn town(&self, slot: TownSlot) -> Option<&TownView> {
        self.towns.get(slot.0)
    }

    pub fn hero_slots(&self) -> impl Iterator<Item = HeroSlot> {
        (0..self.heroes.len()).map(HeroSlot)
    }

    pub fn town_slots(&self) -> impl Iterator<Item = TownSlot> {
        (0..self.towns.len()).map(TownSlot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BuildingId, ObjectId};
    use crate::engine::{EngineError, ObjectKind};

    struct StubEngine {
        heroes: Vec<HeroInfo>,
        towns: Vec<TownInfo>,
        hires: Vec<HeroInfo>,
        gold: i64,
    }

    impl RulesEngine for StubEngine {
        fn owned_heroes(&self) -> Vec<HeroInfo> {
            self.heroes.clone()
        }
        fn owned_towns(&self) -> Vec<TownInfo> {
            self.towns.clone()
        }
        fn town_count(&self) -> usize {
            self.towns.len()
        }
        fn heroes_for_hire(&self, _town: TownId) -> Vec<HeroInfo> {
            self.hires.clone()
        }
        fn resource_amount(&self, kind: ResourceKind) -> i64 {
            match kind {
                ResourceKind::Gold => self.gold,
                _ => 0,
            }
        }
        fn reach_cost(&self, _hero: HeroId, _target: MapPos) -> Option<u32> {
            None
        }
        fn move_hero(&mut self, _hero: HeroId, _target: MapPos) -> Result<(), EngineError> {
            Ok(())
        }
        fn attack(&mut self, _hero: HeroId, _target: ObjectId) -> Result<(), EngineError> {
            Ok(())
        }
        fn recruit_hero(&mut self, _town: TownId, _slot: usize) -> Result<(), EngineError> {
            Ok(())
        }
        fn start_building(
            &mut self,
            _town: TownId,
            _building: BuildingId,
        ) -> Result<(), EngineError> {
            Ok(())
        }
        fn recruit_creatures(
            &mut self,
            _town: TownId,
            _stack: usize,
            _count: u32,
        ) -> Result<(), EngineError> {
            Ok(())
        }
        fn upgrade_creatures(&mut self, _town: TownId, _stack: usize) -> Result<(), EngineError> {
            Ok(())
        }
        fn end_turn(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    fn town(id: u32) -> TownInfo {
        TownInfo {
            id: TownId(id),
            pos: MapPos::new(10, 10, 0),
            built_this_turn: false,
            visiting_hero: None,
            recruitable: vec![],
            buildable: vec![],
            upgradable: vec![],
        }
    }

    #[test]
    fn test_capture_enumerates_heroes_and_towns() {
        let engine = StubEngine {
            heroes: vec![
                HeroInfo {
                    id: HeroId(1),
                    pos: MapPos::new(2, 3, 0),
                    movement_left: 1500,
                },
                HeroInfo {
                    id: HeroId(2),
                    pos: MapPos::new(7, 1, 0),
                    movement_left: 0,
                },
            ],
            towns: vec![town(5)],
            hires: vec![HeroInfo {
                id: HeroId(40),
                pos: MapPos::new(10, 10, 0),
                movement_left: 1500,
            }],
            gold: 3000,
        };

        let snap = WorldSnapshot::capture(&engine, &KnownObjects::new());
        assert_eq!(snap.heroes.len(), 2);
        assert_eq!(snap.towns.len(), 1);
        assert_eq!(snap.hireable.len(), 1);
        assert_eq!(snap.resources.amount(ResourceKind::Gold), 3000);
        assert_eq!(snap.resources.amount(ResourceKind::Wood), 0);
        assert!(snap.hero(HeroSlot(0)).is_some());
        assert!(snap.hero(HeroSlot(2)).is_none());
        assert_eq!(snap.heroes[0].goal, None);
    }

    #[test]
    fn test_capture_without_towns_has_no_hires() {
        let engine = StubEngine {
            heroes: vec![],
            towns: vec![],
            hires: vec![HeroInfo {
                id: HeroId(40),
                pos: MapPos::new(0, 0, 0),
                movement_left: 0,
            }],
            gold: 0,
        };

        let snap = WorldSnapshot::capture(&engine, &KnownObjects::new());
        assert!(snap.hireable.is_empty());
    }

    #[test]
    fn test_capture_copies_known_objects() {
        let mut known = KnownObjects::new();
        known.insert(KnownObject::new(
            MapPos::new(4, 4, 0),
            ObjectId(11),
            ObjectKind::Treasure,
        ));

        let engine = StubEngine {
            heroes: vec![],
            towns: vec![],
            hires: vec![],
            gold: 0,
        };

        let snap = WorldSnapshot::capture(&engine, &known);
        assert_eq!(snap.objects.len(), 1);

        // The snapshot owns its copy: mutating the live set afterwards
        // must not be visible through the snapshot.
        known.remove(MapPos::new(4, 4, 0), ObjectId(11));
        assert_eq!(snap.objects.len(), 1);
    }
}
