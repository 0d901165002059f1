//! Battle gating and the tactics seam
//!
//! Strategic planning must stop while a fight is running. The engine drives
//! the four-phase battle lifecycle through notifications; the turn loop
//! blocks on [`BattleFlag`] until the cycle returns to [`BattleState::NoBattle`].
//! What happens *inside* the fight belongs to the [`BattleTactics`]
//! collaborator, not to this crate.

use serde::{Deserialize, Serialize};
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::core::types::StackId;

/// Battle lifecycle phase
///
/// Transitions are cyclic and one-directional:
/// NoBattle → Upcoming → Ongoing → Ending → NoBattle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleState {
    #[default]
    NoBattle,
    Upcoming,
    Ongoing,
    Ending,
}

impl BattleState {
    /// The only state legally reachable from this one
    pub fn successor(&self) -> BattleState {
        match self {
            BattleState::NoBattle => BattleState::Upcoming,
            BattleState::Upcoming => BattleState::Ongoing,
            BattleState::Ongoing => BattleState::Ending,
            BattleState::Ending => BattleState::NoBattle,
        }
    }
}

/// Monitor-style battle flag scoped to one AI instance
///
/// Supports atomic read/update and blocking wait for a target state, so the
/// turn loop can park itself until combat resolves. Multiple instances never
/// interfere; there is no process-wide state.
#[derive(Debug, Default)]
pub struct BattleFlag {
    state: Mutex<BattleState>,
    changed: Condvar,
}

impl BattleFlag {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, BattleState> {
        // A panicked notification handler must not wedge the turn loop
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn get(&self) -> BattleState {
        *self.guard()
    }

    /// Advance the flag, enforcing the cyclic transition order
    ///
    /// A repeat of the current state is accepted silently; any other
    /// out-of-order transition is logged and ignored so the §8-style
    /// lifecycle invariant holds even against a misbehaving host.
    pub fn set(&self, next: BattleState) {
        let mut state = self.guard();
        let current = *state;
        if next == current {
            return;
        }
        if next != current.successor() {
            tracing::warn!(?current, ?next, "ignoring illegal battle transition");
            return;
        }
        tracing::debug!(?current, ?next, "battle state transition");
        *state = next;
        self.changed.notify_all();
    }

    /// Block the calling thread until the flag reads `target`
    pub fn wait_until(&self, target: BattleState) {
        let mut state = self.guard();
        while *state != target {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(|poison| poison.into_inner());
        }
    }
}

/// One concrete action for a stack whose turn has come up in combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Wait,
    Defend,
    Attack { target: StackId },
    Retreat,
}

/// The battle-tactics collaborator
///
/// The strategic planner forwards battle notifications here and obeys the
/// returned actions verbatim. Observation hooks default to no-ops.
pub trait BattleTactics: Send {
    /// Decide the action for the stack whose turn it is
    fn choose_action(&mut self, stack: StackId) -> BattleAction;

    fn battle_started(&mut self) {}
    fn battlefield_prepared(&mut self) {}
    fn round_started(&mut self, _round: i32) {}
    fn action_started(&mut self) {}
    fn action_finished(&mut self) {}
    fn stack_attacked(&mut self, _stack: StackId) {}
    fn stack_moved(&mut self, _stack: StackId) {}
    fn spell_cast(&mut self) {}
    fn battle_ended(&mut self) {}
}

/// Fallback tactics: every stack holds its ground
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveTactics;

impl BattleTactics for PassiveTactics {
    fn choose_action(&mut self, _stack: StackId) -> BattleAction {
        BattleAction::Defend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_full_cycle_is_legal() {
        let flag = BattleFlag::new();
        assert_eq!(flag.get(), BattleState::NoBattle);

        flag.set(BattleState::Upcoming);
        flag.set(BattleState::Ongoing);
        flag.set(BattleState::Ending);
        flag.set(BattleState::NoBattle);
        assert_eq!(flag.get(), BattleState::NoBattle);
    }

    #[test]
    fn test_illegal_transition_is_ignored() {
        let flag = BattleFlag::new();
        flag.set(BattleState::Ending);
        assert_eq!(flag.get(), BattleState::NoBattle);

        flag.set(BattleState::Upcoming);
        flag.set(BattleState::NoBattle); // skipping Ongoing/Ending
        assert_eq!(flag.get(), BattleState::Upcoming);
    }

    #[test]
    fn test_repeat_state_is_accepted() {
        let flag = BattleFlag::new();
        flag.set(BattleState::Upcoming);
        flag.set(BattleState::Upcoming);
        assert_eq!(flag.get(), BattleState::Upcoming);
    }

    #[test]
    fn test_wait_until_blocks_across_threads() {
        let flag = Arc::new(BattleFlag::new());
        flag.set(BattleState::Upcoming);
        flag.set(BattleState::Ongoing);

        let setter = Arc::clone(&flag);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            setter.set(BattleState::Ending);
            setter.set(BattleState::NoBattle);
        });

        flag.wait_until(BattleState::NoBattle);
        assert_eq!(flag.get(), BattleState::NoBattle);
        handle.join().expect("setter thread panicked");
    }

    #[test]
    fn test_wait_until_returns_immediately_when_satisfied() {
        let flag = BattleFlag::new();
        flag.wait_until(BattleState::NoBattle);
    }

    #[test]
    fn test_passive_tactics_defends() {
        let mut tactics = PassiveTactics;
        assert_eq!(tactics.choose_action(StackId(1)), BattleAction::Defend);
    }
}
