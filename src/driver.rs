//! Turn driver and event bridge
//!
//! [`AiPlayer`] runs the per-turn planning loop; [`EventBridge`] is the
//! cloneable handle the host engine invokes for notifications. The two sides
//! share exactly two pieces of guarded state (the known-objects set and the
//! battle flag) and nothing else, so handlers are safe to invoke at any
//! time, including mid-plan, from whatever thread the engine calls back on.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::battle::{BattleAction, BattleFlag, BattleState, BattleTactics, PassiveTactics};
use crate::core::config::PlannerConfig;
use crate::core::error::{AiError, Result};
use crate::core::types::{HeroId, MapPos, SkillId, StackId};
use crate::engine::{HeroInfo, ObjectInfo, RulesEngine};
use crate::knowledge::KnownObjects;
use crate::objective::{fulfill, generator, Objective, Outcome};
use crate::snapshot::WorldSnapshot;

type SharedTactics = Arc<Mutex<Box<dyn BattleTactics>>>;

fn lock<T: ?Sized>(mutex: &Mutex<Box<T>>) -> MutexGuard<'_, Box<T>> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

fn lock_objects(objects: &Mutex<KnownObjects>) -> MutexGuard<'_, KnownObjects> {
    objects.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// The strategic AI for one player
///
/// Owns the long-lived map knowledge and the battle flag; everything else is
/// rebuilt from scratch each planning cycle.
pub struct AiPlayer {
    config: PlannerConfig,
    rng: StdRng,
    objects: Arc<Mutex<KnownObjects>>,
    battle: Arc<BattleFlag>,
    tactics: SharedTactics,
    turn: u32,
}

impl AiPlayer {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Self::build(config, StdRng::from_entropy())
    }

    /// Create with a fixed RNG seed for deterministic behavior
    pub fn with_seed(config: PlannerConfig, seed: u64) -> Result<Self> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: PlannerConfig, rng: StdRng) -> Result<Self> {
        config.validate().map_err(AiError::Config)?;
        Ok(Self {
            config,
            rng,
            objects: Arc::new(Mutex::new(KnownObjects::new())),
            battle: Arc::new(BattleFlag::new()),
            tactics: Arc::new(Mutex::new(Box::new(PassiveTactics))),
            turn: 0,
        })
    }

    /// Replace the battle-tactics collaborator
    pub fn set_tactics(&mut self, tactics: Box<dyn BattleTactics>) {
        *lock(&self.tactics) = tactics;
    }

    /// The notification handle to wire into the rules engine
    pub fn bridge(&self) -> EventBridge {
        EventBridge {
            objects: Arc::clone(&self.objects),
            battle: Arc::clone(&self.battle),
            tactics: Arc::clone(&self.tactics),
        }
    }

    pub fn battle_state(&self) -> BattleState {
        self.battle.get()
    }

    /// Turns completed so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Run one full turn: plan, act until nothing profitable remains, then
    /// signal end-of-turn to the engine
    ///
    /// This is the entry point for the engine's your-turn notification; the
    /// host calls it once per turn from the planning thread. Blocks while a
    /// battle is in progress. An engine command failure ends the turn early
    /// rather than retrying, so turn budget always moves forward.
    pub fn take_turn<E: RulesEngine + ?Sized>(&mut self, engine: &mut E) -> Result<()> {
        self.turn += 1;
        tracing::info!(turn = self.turn, "turn started");

        self.battle.wait_until(BattleState::NoBattle);

        let mut snapshot = self.capture(engine);
        let mut queue = generator::fill_queue(engine, &snapshot, &self.config, &mut self.rng);

        loop {
            // A battle that broke out mid-cycle suspends planning; the
            // world it leaves behind is stale, so start the cycle over.
            if self.battle.get() != BattleState::NoBattle {
                tracing::info!("battle in progress; strategic planning suspended");
                self.battle.wait_until(BattleState::NoBattle);
                snapshot = self.capture(engine);
                queue = generator::fill_queue(engine, &snapshot, &self.config, &mut self.rng);
                continue;
            }

            let Some(best) = queue.best().cloned() else {
                break;
            };
            if best.priority().into_inner() < self.config.viability_threshold {
                tracing::debug!(
                    priority = best.priority().into_inner(),
                    "best candidate below viability threshold; ending turn"
                );
                break;
            }

            match fulfill(&best, &snapshot, engine, &self.objects) {
                Ok(Outcome::Advanced(next)) => {
                    tracing::debug!(objective = ?summary(&best), "objective fulfilled");
                    snapshot = next;
                    queue.retire(&best);
                }
                Ok(Outcome::Stale) => {
                    queue.retire(&best);
                }
                Err(error) => {
                    tracing::warn!(%error, "engine call failed; ending turn early");
                    break;
                }
            }
        }

        engine.end_turn()?;
        tracing::info!(turn = self.turn, "turn ended");
        Ok(())
    }

    fn capture<E: RulesEngine + ?Sized>(&self, engine: &E) -> WorldSnapshot {
        WorldSnapshot::capture(engine, &lock_objects(&self.objects))
    }
}

fn summary(objective: &Objective) -> String {
    match objective {
        Objective::Hero(o) => format!("{:?} by hero #{}", o.task, o.actor.0),
        Objective::Town(o) => format!("{:?} by town #{}", o.task, o.actor.0),
    }
}

/// Notification surface the rules engine invokes
///
/// Cloneable and thread-safe; handlers never assume a snapshot exists and
/// apply their updates in the order they are called.
#[derive(Clone)]
pub struct EventBridge {
    objects: Arc<Mutex<KnownObjects>>,
    battle: Arc<BattleFlag>,
    tactics: SharedTactics,
}

impl EventBridge {
    // --- lifecycle ---

    pub fn on_hero_created(&self, hero: HeroInfo) {
        tracing::debug!(id = ?hero.id, "hero created");
    }

    pub fn on_hero_killed(&self, hero: HeroId) {
        tracing::debug!(id = ?hero, "hero killed");
    }

    pub fn on_hero_moved(&self, hero: HeroId, to: MapPos) {
        tracing::trace!(id = ?hero, ?to, "hero moved");
    }

    /// A visitable object appeared (built, spawned, or dropped)
    pub fn on_new_object(&self, object: ObjectInfo) {
        tracing::debug!(?object, "new object appeared");
        lock_objects(&self.objects).insert(object.into());
    }

    /// An object left the map (collected, defeated, dispelled)
    pub fn on_object_removed(&self, object: ObjectInfo) {
        let mut known = lock_objects(&self.objects);
        // The reported position can differ from where we first saw it
        // (a wandering monster, a moved hero); fall back to identity.
        if !known.remove(object.pos, object.id) {
            known.remove_by_id(object.id);
        }
    }

    /// Fog lifted from a tile; `visible` lists the objects now observable
    pub fn on_tile_revealed(&self, pos: MapPos, visible: &[ObjectInfo]) {
        tracing::trace!(?pos, count = visible.len(), "tile revealed");
        let mut known = lock_objects(&self.objects);
        for &object in visible {
            known.insert(object.into());
        }
    }

    /// Fog rolled back in. Knowledge persists: known-but-unseen is exactly
    /// what the long-lived set models.
    pub fn on_tile_hidden(&self, pos: MapPos) {
        tracing::trace!(?pos, "tile hidden");
    }

    /// The engine asks which secondary skill to take on level-up
    pub fn on_hero_leveled(&self, hero: HeroId, offered: &[SkillId]) -> Option<SkillId> {
        tracing::debug!(id = ?hero, ?offered, "hero leveled");
        offered.first().copied()
    }

    pub fn on_garrison_dialog(&self) {
        tracing::debug!("garrison dialog shown; leaving armies as they are");
    }

    pub fn on_player_blocked(&self, reason: i32) {
        tracing::debug!(reason, "player input blocked");
    }

    // --- battle ---

    pub fn on_battle_about_to_start(&self) {
        self.battle.set(BattleState::Upcoming);
    }

    pub fn on_battlefield_prepared(&self) {
        lock(&self.tactics).battlefield_prepared();
        self.battle.set(BattleState::Ongoing);
    }

    pub fn on_battle_round_start(&self, round: i32) {
        lock(&self.tactics).round_started(round);
    }

    pub fn on_action_started(&self) {
        lock(&self.tactics).action_started();
    }

    pub fn on_action_finished(&self) {
        lock(&self.tactics).action_finished();
    }

    pub fn on_stack_attacked(&self, stack: StackId) {
        lock(&self.tactics).stack_attacked(stack);
    }

    pub fn on_stack_moved(&self, stack: StackId) {
        lock(&self.tactics).stack_moved(stack);
    }

    pub fn on_spell_cast(&self) {
        lock(&self.tactics).spell_cast();
    }

    pub fn on_battle_end(&self) {
        lock(&self.tactics).battle_ended();
        self.battle.set(BattleState::Ending);
    }

    /// The engine has applied the battle results to the world
    pub fn on_battle_results_applied(&self) {
        self.battle.set(BattleState::NoBattle);
    }

    /// Turn decision for a stack, delegated entirely to the tactics
    /// collaborator
    pub fn choose_battle_action(&self, stack: StackId) -> BattleAction {
        lock(&self.tactics).choose_action(stack)
    }
}
