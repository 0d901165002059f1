//! Objective fulfillment
//!
//! Converts a chosen objective into the one concrete engine command it
//! stands for, after re-validating that the world still permits it. The
//! world may have moved on since generation (another actor took the
//! target, a notification removed it), so a failed validation drops the
//! objective silently instead of failing the turn.

use std::sync::{Mutex, MutexGuard};

use crate::core::types::{BuildingId, HeroId, MapPos, ObjectId, ResourcePool, TownId};
use crate::engine::{EngineError, RulesEngine, HERO_HIRE_COST};
use crate::knowledge::KnownObjects;
use crate::objective::{HeroTask, Objective, TownTask};
use crate::snapshot::{HeroView, WorldSnapshot};

/// Result of attempting to fulfill an objective
#[derive(Debug)]
pub enum Outcome {
    /// The command was issued; subsequent picks this cycle should plan
    /// against this hypothetical post-action snapshot
    Advanced(WorldSnapshot),
    /// The objective was no longer valid; dropped, no command issued
    Stale,
}

/// The single engine command an objective resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveHero(HeroId, MapPos),
    Attack(HeroId, ObjectId),
    RecruitHero(TownId, usize),
    StartBuilding(TownId, BuildingId),
    RecruitCreatures(TownId, usize, u32),
    UpgradeCreatures(TownId, usize),
}

fn lock(live: &Mutex<KnownObjects>) -> MutexGuard<'_, KnownObjects> {
    live.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Execute the single side-effecting step for `objective`
///
/// Issues at most one engine command. Engine rejection propagates as an
/// error (the caller ends the turn); a stale objective is merely dropped.
pub fn fulfill<E: RulesEngine + ?Sized>(
    objective: &Objective,
    snapshot: &WorldSnapshot,
    engine: &mut E,
    live: &Mutex<KnownObjects>,
) -> Result<Outcome, EngineError> {
    // A targeted objective must still exist in the live set: a concurrent
    // notification may have removed the object after generation.
    if let Some(target) = objective.target() {
        if !lock(live).contains(target.pos, target.id) {
            tracing::debug!(?target, "target vanished before fulfillment; dropping");
            return Ok(Outcome::Stale);
        }
    }

    // Planning doubles as the validity check against the (possibly already
    // hypothetical) snapshot.
    let Some((command, next)) = plan(objective, snapshot, engine) else {
        tracing::debug!("objective no longer applicable; dropping");
        return Ok(Outcome::Stale);
    };

    match command {
        Command::MoveHero(hero, target) => engine.move_hero(hero, target)?,
        Command::Attack(hero, target) => engine.attack(hero, target)?,
        Command::RecruitHero(town, slot) => engine.recruit_hero(town, slot)?,
        Command::StartBuilding(town, building) => engine.start_building(town, building)?,
        Command::RecruitCreatures(town, stack, count) => {
            engine.recruit_creatures(town, stack, count)?
        }
        Command::UpgradeCreatures(town, stack) => engine.upgrade_creatures(town, stack)?,
    }

    // A successfully visited object is progress made: forget it so it is
    // not targeted again next cycle.
    if let Some(target) = objective.target() {
        lock(live).remove(target.pos, target.id);
    }

    Ok(Outcome::Advanced(next))
}

/// The hypothetical post-action snapshot, with no side effects
///
/// Reads the engine only for movement-cost queries. Used for one step of
/// planning lookahead; this system never looks further ahead.
pub fn pretend<E: RulesEngine + ?Sized>(
    objective: &Objective,
    snapshot: &WorldSnapshot,
    engine: &E,
) -> WorldSnapshot {
    match plan(objective, snapshot, engine) {
        Some((_, next)) => next,
        None => snapshot.clone(),
    }
}

/// Resolve an objective into its command and post-action snapshot, or
/// `None` when the snapshot no longer admits it
fn plan<E: RulesEngine + ?Sized>(
    objective: &Objective,
    snapshot: &WorldSnapshot,
    engine: &E,
) -> Option<(Command, WorldSnapshot)> {
    match objective {
        Objective::Hero(o) => {
            let hero = snapshot.hero(o.actor)?;
            match o.task {
                HeroTask::Visit | HeroTask::Attack => {
                    let target = o.target?;
                    if !snapshot.objects.contains(&target) {
                        return None;
                    }
                    let cost = reachable_cost(engine, hero, target.pos)?;

                    let command = if o.task == HeroTask::Attack {
                        Command::Attack(hero.id, target.id)
                    } else {
                        Command::MoveHero(hero.id, target.pos)
                    };

                    let mut next = snapshot.clone();
                    let hero = &mut next.heroes[o.actor.0];
                    hero.goal = Some(target.pos);
                    hero.pos = target.pos;
                    hero.movement_left -= cost;
                    next.objects.remove(&target);
                    Some((command, next))
                }
                HeroTask::FinishTurn => {
                    let goal = hero.goal?;
                    let cost = reachable_cost(engine, hero, goal)?;

                    let mut next = snapshot.clone();
                    let hero_mut = &mut next.heroes[o.actor.0];
                    hero_mut.pos = goal;
                    hero_mut.movement_left -= cost;
                    Some((Command::MoveHero(hero.id, goal), next))
                }
                HeroTask::Flee => {
                    // Run for the closest own town still in range
                    let refuge = snapshot
                        .towns
                        .iter()
                        .filter_map(|t| reachable_cost(engine, hero, t.pos).map(|c| (c, t.pos)))
                        .min_by_key(|(cost, _)| *cost)?;
                    let (cost, refuge_pos) = refuge;

                    let mut next = snapshot.clone();
                    let hero_mut = &mut next.heroes[o.actor.0];
                    hero_mut.goal = Some(refuge_pos);
                    hero_mut.pos = refuge_pos;
                    hero_mut.movement_left -= cost;
                    Some((Command::MoveHero(hero.id, refuge_pos), next))
                }
                // The engine exposes no dismiss commands; these kinds exist
                // in the model but cannot be acted on
                HeroTask::DismissUnits | HeroTask::DismissSelf => None,
            }
        }
        Objective::Town(o) => {
            let town = snapshot.town(o.actor)?;
            match o.task {
                TownTask::RecruitHero => {
                    if town.visiting_hero.is_some() {
                        return None;
                    }
                    let hired = *snapshot.hireable.get(o.index)?;
                    let cost = ResourcePool::gold(HERO_HIRE_COST);
                    if !snapshot.resources.can_afford(&cost) {
                        return None;
                    }

                    let mut next = snapshot.clone();
                    next.resources.pay(&cost);
                    next.hireable.remove(o.index);
                    next.towns[o.actor.0].visiting_hero = Some(hired.id);
                    next.heroes.push(HeroView {
                        id: hired.id,
                        pos: town.pos,
                        movement_left: hired.movement_left,
                        goal: None,
                    });
                    Some((Command::RecruitHero(town.id, o.index), next))
                }
                TownTask::BuildBuilding => {
                    if town.built_this_turn {
                        return None;
                    }
                    let candidate = town.buildable.get(o.index)?;
                    if !snapshot.resources.can_afford(&candidate.cost) {
                        return None;
                    }

                    let mut next = snapshot.clone();
                    next.resources.pay(&candidate.cost);
                    next.towns[o.actor.0].built_this_turn = true;
                    Some((Command::StartBuilding(town.id, candidate.building), next))
                }
                TownTask::RecruitCreatures => {
                    let stack = town.recruitable.get(o.index)?;
                    if stack.available == 0 || !stack.has_free_slot {
                        return None;
                    }
                    let count =
                        recruitable_count(stack.available, &stack.unit_cost, &snapshot.resources);
                    if count == 0 {
                        return None;
                    }

                    let mut next = snapshot.clone();
                    for _ in 0..count {
                        next.resources.pay(&stack.unit_cost);
                    }
                    // Keep index stability for sibling objectives: decrement
                    // in place rather than removing the entry
                    next.towns[o.actor.0].recruitable[o.index].available -= count;
                    Some((Command::RecruitCreatures(town.id, stack.slot, count), next))
                }
                TownTask::UpgradeCreatures => {
                    let upgrade = town.upgradable.get(o.index)?;
                    if !snapshot.resources.can_afford(&upgrade.cost) {
                        return None;
                    }

                    let mut next = snapshot.clone();
                    let cost = next.towns[o.actor.0].upgradable[o.index].cost;
                    next.resources.pay(&cost);
                    Some((Command::UpgradeCreatures(town.id, upgrade.stack), next))
                }
            }
        }
    }
}

/// Movement cost to `target`, when the hero can actually cover it this turn
fn reachable_cost<E: RulesEngine + ?Sized>(
    engine: &E,
    hero: &HeroView,
    target: MapPos,
) -> Option<u32> {
    let cost = engine.reach_cost(hero.id, target)?;
    if cost > hero.movement_left {
        return None;
    }
    Some(cost)
}

/// How many creatures the stockpile can pay for, capped by availability
fn recruitable_count(available: u32, unit_cost: &ResourcePool, stock: &ResourcePool) -> u32 {
    use crate::core::types::ResourceKind;

    let mut count = available;
    for &kind in &ResourceKind::ALL {
        let per_unit = unit_cost.amount(kind);
        if per_unit > 0 {
            let cap = (stock.amount(kind) / per_unit).max(0) as u32;
            count = count.min(cap);
        }
    }
    count
}
