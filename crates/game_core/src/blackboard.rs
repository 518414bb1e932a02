//! Named values the AI/animation layer reads.
//!
//! The action core only writes here. Delayed flag clears (for example the
//! melee-pressed pulse) are explicit scheduled tasks advanced by the tick
//! loop, keyed by actor and key; re-scheduling resets the delay.

use std::collections::HashMap;

use crate::actor::ActorId;

/// Well-known blackboard keys.
pub mod keys {
    pub const VELOCITY: &str = "Velocity";
    pub const SHIELDING: &str = "Shielding";
    pub const SHOOTING: &str = "Shooting";
    pub const RELOADING: &str = "Reloading";
    pub const DRIVING: &str = "Driving";
    pub const MELEE_PRESSED: &str = "Melee Pressed";
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Scalar(f32),
    Vector([f32; 3]),
}

#[derive(Debug, Default)]
pub struct Blackboard {
    values: HashMap<(ActorId, String), Value>,
}

impl Blackboard {
    pub fn set(&mut self, actor: ActorId, key: &str, value: Value) {
        self.values.insert((actor, key.to_string()), value);
    }

    #[inline]
    pub fn set_flag(&mut self, actor: ActorId, key: &str, on: bool) {
        self.set(actor, key, Value::Bool(on));
    }

    pub fn get(&self, actor: ActorId, key: &str) -> Option<&Value> {
        self.values.get(&(actor, key.to_string()))
    }

    /// Boolean read with a false default (absent means cleared).
    pub fn flag(&self, actor: ActorId, key: &str) -> bool {
        matches!(self.get(actor, key), Some(Value::Bool(true)))
    }

    /// Drop everything written for `actor`.
    pub fn forget(&mut self, actor: ActorId) {
        self.values.retain(|(a, _), _| *a != actor);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ClearTask {
    actor: ActorId,
    key: String,
    remaining_s: f32,
}

/// Deterministic replacement for fire-and-forget delayed clears.
#[derive(Debug, Default)]
pub struct ScheduledClears {
    tasks: Vec<ClearTask>,
}

impl ScheduledClears {
    /// Clear `(actor, key)` to false after `delay_s`. Re-scheduling the same
    /// pair resets the delay.
    pub fn schedule(&mut self, actor: ActorId, key: &str, delay_s: f32) {
        if let Some(t) = self
            .tasks
            .iter_mut()
            .find(|t| t.actor == actor && t.key == key)
        {
            t.remaining_s = delay_s;
            return;
        }
        self.tasks.push(ClearTask {
            actor,
            key: key.to_string(),
            remaining_s: delay_s,
        });
    }

    /// Advance timers; expired tasks write their flag false and are dropped.
    pub fn advance(&mut self, dt: f32, blackboard: &mut Blackboard) {
        for t in &mut self.tasks {
            t.remaining_s -= dt;
        }
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].remaining_s <= 0.0 {
                let t = self.tasks.swap_remove(i);
                blackboard.set_flag(t.actor, &t.key, false);
                continue;
            }
            i += 1;
        }
    }

    /// Drop pending tasks for `actor`.
    pub fn forget(&mut self, actor: ActorId) {
        self.tasks.retain(|t| t.actor != actor);
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_clear_fires_once() {
        let mut bb = Blackboard::default();
        let mut clears = ScheduledClears::default();
        let a = ActorId(1);
        bb.set_flag(a, keys::MELEE_PRESSED, true);
        clears.schedule(a, keys::MELEE_PRESSED, 0.25);

        clears.advance(0.1, &mut bb);
        assert!(bb.flag(a, keys::MELEE_PRESSED));
        clears.advance(0.2, &mut bb);
        assert!(!bb.flag(a, keys::MELEE_PRESSED));
        assert_eq!(clears.pending(), 0);
    }

    #[test]
    fn reschedule_resets_delay() {
        let mut bb = Blackboard::default();
        let mut clears = ScheduledClears::default();
        let a = ActorId(2);
        bb.set_flag(a, keys::MELEE_PRESSED, true);
        clears.schedule(a, keys::MELEE_PRESSED, 0.25);
        clears.advance(0.2, &mut bb);
        clears.schedule(a, keys::MELEE_PRESSED, 0.25);
        clears.advance(0.2, &mut bb);
        assert!(bb.flag(a, keys::MELEE_PRESSED), "reset delay still pending");
        clears.advance(0.1, &mut bb);
        assert!(!bb.flag(a, keys::MELEE_PRESSED));
    }
}
