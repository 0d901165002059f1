//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for heroes, issued by the rules engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HeroId(pub u32);

/// Unique identifier for towns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TownId(pub u32);

/// Unique identifier for map objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Identifier for a building within a town's build tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u16);

/// Identifier for a creature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub u16);

/// Identifier for a secondary skill offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u16);

/// Identifier for a creature stack inside a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackId(pub u32);

/// Map position: surface coordinates plus level (0 = surface, 1 = underground)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MapPos {
    pub x: i32,
    pub y: i32,
    pub level: i32,
}

impl MapPos {
    pub fn new(x: i32, y: i32, level: i32) -> Self {
        Self { x, y, level }
    }
}

/// Player-stockpiled resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum ResourceKind {
    Wood,
    Mercury,
    Ore,
    Sulfur,
    Crystal,
    Gems,
    Gold,
    Mithril,
}

impl ResourceKind {
    pub const COUNT: usize = 8;

    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::Wood,
        ResourceKind::Mercury,
        ResourceKind::Ore,
        ResourceKind::Sulfur,
        ResourceKind::Crystal,
        ResourceKind::Gems,
        ResourceKind::Gold,
        ResourceKind::Mithril,
    ];
}

/// Fixed-size resource vector, one slot per kind
///
/// Used both for the player stockpile and for costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool([i64; ResourceKind::COUNT]);

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self, kind: ResourceKind) -> i64 {
        self.0[kind as usize]
    }

    pub fn set(&mut self, kind: ResourceKind, amount: i64) {
        self.0[kind as usize] = amount;
    }

    /// Whether every slot covers the corresponding cost slot
    pub fn can_afford(&self, cost: &ResourcePool) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&k| self.amount(k) >= cost.amount(k))
    }

    /// Deduct a cost. Caller must have checked affordability first.
    pub fn pay(&mut self, cost: &ResourcePool) {
        for &k in &ResourceKind::ALL {
            self.0[k as usize] -= cost.amount(k);
        }
    }

    /// Convenience: a gold-only cost
    pub fn gold(amount: i64) -> Self {
        let mut pool = Self::new();
        pool.set(ResourceKind::Gold, amount);
        pool
    }
}
