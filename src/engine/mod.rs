//! Rules-engine boundary
//!
//! The planner never touches game rules directly: map contents, movement
//! costs, build requirements and combat all live behind [`RulesEngine`].
//! Queries are infallible (a failing engine is unrecoverable host input);
//! commands are blocking round-trips that the engine may reject.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{
    BuildingId, CreatureId, HeroId, MapPos, ObjectId, ResourceKind, ResourcePool, TownId,
};

/// Gold price for hiring a hero from a town's tavern
pub const HERO_HIRE_COST: i64 = 2500;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("command rejected by rules engine: {0}")]
    Rejected(String),

    #[error("rules engine unavailable: {0}")]
    Unavailable(String),
}

/// Classification of a map object, as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Pickup that disappears when visited (resource pile, chest)
    Treasure,
    Artifact,
    /// External creature dwelling
    Dwelling,
    /// Visitable bonus site (shrine, well, stables)
    Shrine,
    /// Wandering monster guarding the map
    Monster,
    EnemyHero,
    Other,
}

impl ObjectKind {
    /// Visiting this object means fighting for it
    pub fn is_hostile(&self) -> bool {
        matches!(self, ObjectKind::Monster | ObjectKind::EnemyHero)
    }
}

/// A map object as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub pos: MapPos,
    pub kind: ObjectKind,
}

/// An owned (or hireable) hero as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroInfo {
    pub id: HeroId,
    pub pos: MapPos,
    /// Movement points left this turn
    pub movement_left: u32,
}

/// A creature stack the town can currently recruit from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitableStack {
    /// Dwelling slot within the town
    pub slot: usize,
    pub creature: CreatureId,
    /// Creatures available this week
    pub available: u32,
    pub unit_cost: ResourcePool,
    /// Whether the garrison can take this creature (free slot or mergeable)
    pub has_free_slot: bool,
}

/// A building the town is currently eligible to construct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCandidate {
    pub building: BuildingId,
    pub cost: ResourcePool,
}

/// A garrison stack with an upgrade available in this town
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCandidate {
    /// Garrison stack index
    pub stack: usize,
    pub cost: ResourcePool,
}

/// An owned town as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownInfo {
    pub id: TownId,
    pub pos: MapPos,
    /// Whether a building was already started this turn
    pub built_this_turn: bool,
    pub visiting_hero: Option<HeroId>,
    pub recruitable: Vec<RecruitableStack>,
    pub buildable: Vec<BuildCandidate>,
    pub upgradable: Vec<UpgradeCandidate>,
}

/// The planner's window onto the game rules
///
/// Commands return only after the engine has applied or rejected the effect;
/// there is no cancellation.
pub trait RulesEngine {
    // --- queries ---

    /// All heroes owned by this player, enumerated fresh
    fn owned_heroes(&self) -> Vec<HeroInfo>;

    /// All towns owned by this player, enumerated fresh
    fn owned_towns(&self) -> Vec<TownInfo>;

    fn town_count(&self) -> usize;

    /// Heroes available to hire at the given town's tavern
    fn heroes_for_hire(&self, town: TownId) -> Vec<HeroInfo>;

    fn resource_amount(&self, kind: ResourceKind) -> i64;

    /// Movement points required for the hero to reach `target` this turn,
    /// or `None` when no route exists within the turn
    fn reach_cost(&self, hero: HeroId, target: MapPos) -> Option<u32>;

    // --- commands ---

    fn move_hero(&mut self, hero: HeroId, target: MapPos) -> Result<(), EngineError>;

    fn attack(&mut self, hero: HeroId, target: ObjectId) -> Result<(), EngineError>;

    fn recruit_hero(&mut self, town: TownId, slot: usize) -> Result<(), EngineError>;

    fn start_building(&mut self, town: TownId, building: BuildingId) -> Result<(), EngineError>;

    fn recruit_creatures(
        &mut self,
        town: TownId,
        stack: usize,
        count: u32,
    ) -> Result<(), EngineError>;

    fn upgrade_creatures(&mut self, town: TownId, stack: usize) -> Result<(), EngineError>;

    fn end_turn(&mut self) -> Result<(), EngineError>;
}
