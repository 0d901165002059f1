//! Candidate objective generation
//!
//! Expands one snapshot into everything each actor could usefully do right
//! now. Priorities are intentionally coarse: every kind draws from the same
//! base band, because the scheduler's job is picking among nearly-tied
//! options, not computing fine-grained utility.

use rand::rngs::StdRng;

use crate::core::config::PlannerConfig;
use crate::core::types::ResourcePool;
use crate::engine::{RulesEngine, HERO_HIRE_COST};
use crate::objective::{HeroObjective, HeroTask, Objective, ObjectiveQueue, TownObjective, TownTask};
use crate::snapshot::{HeroSlot, TownSlot, WorldSnapshot};

/// Generate all candidates for every controllable actor
pub fn fill_queue<E: RulesEngine + ?Sized>(
    engine: &E,
    snapshot: &WorldSnapshot,
    config: &PlannerConfig,
    rng: &mut StdRng,
) -> ObjectiveQueue {
    let mut queue = ObjectiveQueue::new();
    for slot in snapshot.hero_slots() {
        add_hero_objectives(slot, snapshot, engine, config, rng, &mut queue);
    }
    for slot in snapshot.town_slots() {
        add_town_objectives(slot, snapshot, config, rng, &mut queue);
    }
    tracing::debug!(candidates = queue.len(), "objective queue filled");
    queue
}

/// Candidates for one hero: a visit (or attack, if hostile) for every known
/// object reachable within the hero's remaining movement
pub fn add_hero_objectives<E: RulesEngine + ?Sized>(
    slot: HeroSlot,
    snapshot: &WorldSnapshot,
    engine: &E,
    config: &PlannerConfig,
    rng: &mut StdRng,
    queue: &mut ObjectiveQueue,
) {
    let Some(hero) = snapshot.hero(slot) else {
        return;
    };
    if hero.movement_left == 0 {
        return;
    }

    for object in &snapshot.objects {
        let Some(cost) = engine.reach_cost(hero.id, object.pos) else {
            continue;
        };
        if cost > hero.movement_left {
            continue;
        }

        let task = if object.kind.is_hostile() {
            HeroTask::Attack
        } else {
            HeroTask::Visit
        };
        queue.insert(Objective::Hero(HeroObjective::new(
            task,
            slot,
            Some(*object),
            config,
            rng,
        )));
    }
}

/// Candidates for one town: eligible buildings, recruitable and upgradable
/// stacks, and a hero hire when the slot is free
pub fn add_town_objectives(
    slot: TownSlot,
    snapshot: &WorldSnapshot,
    config: &PlannerConfig,
    rng: &mut StdRng,
    queue: &mut ObjectiveQueue,
) {
    let Some(town) = snapshot.town(slot) else {
        return;
    };

    if !town.built_this_turn {
        for (index, candidate) in town.buildable.iter().enumerate() {
            if snapshot.resources.can_afford(&candidate.cost) {
                queue.insert(Objective::Town(TownObjective::new(
                    TownTask::BuildBuilding,
                    slot,
                    index,
                    config,
                    rng,
                )));
            }
        }
    }

    for (index, stack) in town.recruitable.iter().enumerate() {
        if stack.available == 0 || !stack.has_free_slot {
            continue;
        }
        if !snapshot.resources.can_afford(&stack.unit_cost) {
            continue;
        }
        queue.insert(Objective::Town(TownObjective::new(
            TownTask::RecruitCreatures,
            slot,
            index,
            config,
            rng,
        )));
    }

    for (index, upgrade) in town.upgradable.iter().enumerate() {
        if snapshot.resources.can_afford(&upgrade.cost) {
            queue.insert(Objective::Town(TownObjective::new(
                TownTask::UpgradeCreatures,
                slot,
                index,
                config,
                rng,
            )));
        }
    }

    // Hires are listed for the first town only (see WorldSnapshot::capture)
    if slot == TownSlot(0)
        && town.visiting_hero.is_none()
        && !snapshot.hireable.is_empty()
        && snapshot.resources.can_afford(&ResourcePool::gold(HERO_HIRE_COST))
    {
        queue.insert(Objective::Town(TownObjective::new(
            TownTask::RecruitHero,
            slot,
            0,
            config,
            rng,
        )));
    }
}
