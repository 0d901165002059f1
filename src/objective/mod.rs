//! Candidate objectives and their two orderings
//!
//! An objective is one unit of progress the AI could commit to this cycle.
//! Objectives carry two independent orders: a *canonical identity* order
//! (task kind, then target, then actor) used for set deduplication, and a
//! *priority* used for scheduling. Priority includes random jitter so that
//! equally-valued objectives don't always resolve in the same sequence.

pub mod fulfill;
pub mod generator;
pub mod queue;

pub use fulfill::{fulfill, pretend, Outcome};
pub use queue::ObjectiveQueue;

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;

use crate::core::config::PlannerConfig;
use crate::knowledge::KnownObject;
use crate::snapshot::{HeroSlot, TownSlot};

/// Scheduling priority; higher is more urgent
pub type Priority = OrderedFloat<f32>;

/// What a hero-bound objective asks the hero to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeroTask {
    Visit,
    Attack,
    Flee,
    DismissUnits,
    DismissSelf,
    /// Spend leftover movement heading toward the hero's goal
    FinishTurn,
}

/// What a town-bound objective asks the town to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TownTask {
    RecruitHero,
    BuildBuilding,
    RecruitCreatures,
    UpgradeCreatures,
}

/// An objective bound to one hero of the current snapshot
#[derive(Debug, Clone)]
pub struct HeroObjective {
    pub task: HeroTask,
    pub actor: HeroSlot,
    /// Target map object, where the task has one
    pub target: Option<KnownObject>,
    priority: Priority,
}

impl HeroObjective {
    /// Create with the standard coarse priority: base plus bounded jitter
    pub fn new(
        task: HeroTask,
        actor: HeroSlot,
        target: Option<KnownObject>,
        config: &PlannerConfig,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            task,
            actor,
            target,
            priority: roll_priority(config, rng),
        }
    }

    pub fn with_priority(
        task: HeroTask,
        actor: HeroSlot,
        target: Option<KnownObject>,
        priority: f32,
    ) -> Self {
        Self {
            task,
            actor,
            target,
            priority: OrderedFloat(priority),
        }
    }
}

/// An objective bound to one town of the current snapshot
#[derive(Debug, Clone)]
pub struct TownObjective {
    pub task: TownTask,
    pub actor: TownSlot,
    /// Which building / recruitable stack / hire slot, as a snapshot index
    pub index: usize,
    priority: Priority,
}

impl TownObjective {
    pub fn new(
        task: TownTask,
        actor: TownSlot,
        index: usize,
        config: &PlannerConfig,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            task,
            actor,
            index,
            priority: roll_priority(config, rng),
        }
    }

    pub fn with_priority(task: TownTask, actor: TownSlot, index: usize, priority: f32) -> Self {
        Self {
            task,
            actor,
            index,
            priority: OrderedFloat(priority),
        }
    }
}

fn roll_priority(config: &PlannerConfig, rng: &mut StdRng) -> Priority {
    let jitter = if config.objective_jitter > 0.0 {
        rng.gen_range(0.0..config.objective_jitter)
    } else {
        0.0
    };
    OrderedFloat(config.objective_base_value + jitter)
}

/// One candidate unit of progress for this planning cycle
#[derive(Debug, Clone)]
pub enum Objective {
    Hero(HeroObjective),
    Town(TownObjective),
}

impl Objective {
    pub fn priority(&self) -> Priority {
        match self {
            Objective::Hero(o) => o.priority,
            Objective::Town(o) => o.priority,
        }
    }

    /// Stable rank of the task kind for canonical ordering
    fn kind_rank(&self) -> u8 {
        match self {
            Objective::Hero(o) => o.task as u8,
            Objective::Town(o) => 6 + o.task as u8,
        }
    }

    /// Target map object, for hero objectives that have one
    pub fn target(&self) -> Option<&KnownObject> {
        match self {
            Objective::Hero(o) => o.target.as_ref(),
            Objective::Town(_) => None,
        }
    }
}

// Canonical identity: task kind, then target, then actor. Priority is
// deliberately excluded so a re-generated objective with fresh jitter
// deduplicates against its earlier self.
impl Ord for Objective {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind_rank()
            .cmp(&other.kind_rank())
            .then_with(|| match (self, other) {
                (Objective::Hero(a), Objective::Hero(b)) => a
                    .target
                    .cmp(&b.target)
                    .then_with(|| a.actor.cmp(&b.actor)),
                (Objective::Town(a), Objective::Town(b)) => a
                    .index
                    .cmp(&b.index)
                    .then_with(|| a.actor.cmp(&b.actor)),
                // Distinct kind ranks already decided these
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Objective {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Objective {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Objective {}
