//! Actor identity, transform, and the resource ledger.
//!
//! Pools clamp before any announcement is published, so observers never see
//! a value outside `[0, max]`. Health crossing zero flips the actor to the
//! terminal dead state exactly once; every later mutation is a no-op that
//! reports zero effective change.

use glam::Vec3;

use events_core::{EntityRef, EventBus, GameEvent};

use crate::shooter::Shooter;
use crate::status::StatusSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(pub u32);

impl ActorId {
    #[inline]
    pub fn entity_ref(self) -> EntityRef {
        EntityRef(self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn from_pos(pos: Vec3) -> Self {
        Self { pos, yaw: 0.0 }
    }

    /// Facing direction on the XZ plane.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }
}

/// A clamped resource pool.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pool {
    pub current: f32,
    pub max: f32,
}

impl Pool {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn with_current(current: f32, max: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    /// Remove up to `amount`, clamping at zero. Returns the applied delta.
    pub fn spend(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        before - self.current
    }

    /// Add up to `amount`, clamping at `max`. Returns the applied delta.
    pub fn restore(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// Which resource pool an operation addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Health,
    Mana,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub tr: Transform,
    pub health: Pool,
    pub mana: Pool,
    pub dead: bool,
    pub statuses: StatusSet,
    pub shooter: Option<Shooter>,
}

impl Actor {
    /// Spend from a pool. Zero and no side effects once dead. Spending
    /// Health to zero performs the death transition exactly once.
    pub fn spend(&mut self, kind: PoolKind, amount: f32, bus: &mut EventBus) -> f32 {
        if self.dead {
            return 0.0;
        }
        let me = self.id.entity_ref();
        match kind {
            PoolKind::Health => {
                let effective = self.health.spend(amount);
                bus.publish_to(
                    GameEvent::HealthChanged {
                        current: self.health.current,
                        max: self.health.max,
                    },
                    me,
                    Some(me),
                );
                if self.health.is_empty() {
                    self.dead = true;
                    bus.publish_to(GameEvent::Died, me, Some(me));
                }
                effective
            }
            PoolKind::Mana => {
                let effective = self.mana.spend(amount);
                bus.publish_to(
                    GameEvent::ManaChanged {
                        current: self.mana.current,
                        max: self.mana.max,
                    },
                    me,
                    Some(me),
                );
                effective
            }
        }
    }

    /// Restore into a pool. Zero and no side effects once dead.
    pub fn restore(&mut self, kind: PoolKind, amount: f32, bus: &mut EventBus) -> f32 {
        if self.dead {
            return 0.0;
        }
        let me = self.id.entity_ref();
        match kind {
            PoolKind::Health => {
                let effective = self.health.restore(amount);
                bus.publish_to(
                    GameEvent::HealthChanged {
                        current: self.health.current,
                        max: self.health.max,
                    },
                    me,
                    Some(me),
                );
                effective
            }
            PoolKind::Mana => {
                let effective = self.mana.restore(amount);
                bus.publish_to(
                    GameEvent::ManaChanged {
                        current: self.mana.current,
                        max: self.mana.max,
                    },
                    me,
                    Some(me),
                );
                effective
            }
        }
    }

    #[inline]
    pub fn take_damage(&mut self, amount: f32, bus: &mut EventBus) -> f32 {
        self.spend(PoolKind::Health, amount, bus)
    }

    #[inline]
    pub fn heal(&mut self, amount: f32, bus: &mut EventBus) -> f32 {
        self.restore(PoolKind::Health, amount, bus)
    }

    #[inline]
    pub fn use_mana(&mut self, amount: f32, bus: &mut EventBus) -> f32 {
        self.spend(PoolKind::Mana, amount, bus)
    }

    #[inline]
    pub fn grow_mana(&mut self, amount: f32, bus: &mut EventBus) -> f32 {
        self.restore(PoolKind::Mana, amount, bus)
    }

    #[inline]
    pub fn alive(&self) -> bool {
        !self.dead
    }
}

/// Linear actor store. Sessions hold a handful of actors, so lookups scan.
#[derive(Debug, Default)]
pub struct ActorStore {
    next_id: u32,
    actors: Vec<Actor>,
}

impl ActorStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            actors: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        tr: Transform,
        health: Pool,
        mana: Pool,
        statuses: StatusSet,
    ) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.actors.push(Actor {
            id,
            tr,
            health,
            mana,
            dead: false,
            statuses,
            shooter: None,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    #[inline]
    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Remove an actor. Returns false when the id is unknown.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let before = self.actors.len();
        self.actors.retain(|a| a.id != id);
        self.actors.len() != before
    }

    /// Mutable access to `target` and, when distinct, `caster`.
    pub fn target_and_caster(
        &mut self,
        target: ActorId,
        caster: ActorId,
    ) -> Option<(&mut Actor, Option<&mut Actor>)> {
        if target == caster {
            return self.get_mut(target).map(|a| (a, None));
        }
        let ti = self.actors.iter().position(|a| a.id == target)?;
        let ci = self.actors.iter().position(|a| a.id == caster);
        match ci {
            None => Some((&mut self.actors[ti], None)),
            Some(ci) if ci < ti => {
                let (lo, hi) = self.actors.split_at_mut(ti);
                Some((&mut hi[0], Some(&mut lo[ci])))
            }
            Some(ci) => {
                let (lo, hi) = self.actors.split_at_mut(ci);
                Some((&mut lo[ti], Some(&mut hi[0])))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_clamps_both_bounds() {
        let mut p = Pool::full(10.0);
        assert_eq!(p.restore(5.0), 0.0);
        assert_eq!(p.spend(4.0), 4.0);
        assert_eq!(p.spend(100.0), 6.0);
        assert_eq!(p.current, 0.0);
        assert_eq!(p.restore(25.0), 10.0);
        assert_eq!(p.current, 10.0);
    }

    #[test]
    fn negative_amounts_are_inert() {
        let mut p = Pool::with_current(5.0, 10.0);
        assert_eq!(p.spend(-3.0), 0.0);
        assert_eq!(p.restore(-3.0), 0.0);
        assert_eq!(p.current, 5.0);
    }

    #[test]
    fn pair_access_returns_disjoint_actors() {
        let mut store = ActorStore::new();
        let a = store.spawn(
            Transform::from_pos(Vec3::ZERO),
            Pool::full(10.0),
            Pool::full(10.0),
            StatusSet::default(),
        );
        let b = store.spawn(
            Transform::from_pos(Vec3::ONE),
            Pool::full(10.0),
            Pool::full(10.0),
            StatusSet::default(),
        );
        let (target, caster) = store.target_and_caster(a, b).expect("pair");
        assert_eq!(target.id, a);
        assert_eq!(caster.expect("distinct caster").id, b);
        let (target, caster) = store.target_and_caster(a, a).expect("self pair");
        assert_eq!(target.id, a);
        assert!(caster.is_none());
    }
}
