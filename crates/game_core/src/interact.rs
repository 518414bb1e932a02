//! Interaction resolver and the helm (steering post) hand-off.
//!
//! The resolver picks the nearest willing candidate within a fixed radius.
//! The helm is a toggle: the controlling actor interacting again releases
//! control. State changes happen only inside `interact` (via the named
//! begin/end steps below), never inside the `can_interact` predicate.

use glam::Vec3;

use events_core::{EntityRef, EventBus, GameEvent};

use crate::actor::ActorId;

/// Capability set every interaction candidate exposes.
pub trait Interactable {
    fn position(&self) -> Vec3;
    /// Pure predicate: would `interact` be meaningful for this actor now?
    fn can_interact(&self, actor: ActorId, actor_pos: Vec3) -> bool;
    fn interact(&mut self, actor: ActorId, actor_pos: Vec3, bus: &mut EventBus);
}

/// Broad-phase capability supplied by the host physics layer.
pub trait SpatialQuery {
    /// Indices of candidates within `radius` of `center`.
    fn query_within_radius(&self, center: Vec3, radius: f32) -> Vec<usize>;
}

/// Linear-scan fallback over a candidate position list.
pub struct LinearScan<'a> {
    pub positions: &'a [Vec3],
}

impl SpatialQuery for LinearScan<'_> {
    fn query_within_radius(&self, center: Vec3, radius: f32) -> Vec<usize> {
        let r2 = radius * radius;
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| (**p - center).length_squared() <= r2)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Per-actor interaction reach.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interactor {
    pub radius: f32,
}

impl Default for Interactor {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

impl Interactor {
    /// Find the nearest willing candidate in range and interact with it.
    /// Returns false when none survives the filters. Equal distances break
    /// arbitrarily but stably (first in slice order wins).
    pub fn try_interact(
        &self,
        actor: ActorId,
        actor_pos: Vec3,
        candidates: &mut [&mut dyn Interactable],
        bus: &mut EventBus,
    ) -> bool {
        let positions: Vec<Vec3> = candidates.iter().map(|c| c.position()).collect();
        let scan = LinearScan {
            positions: &positions,
        };
        let in_range = scan.query_within_radius(actor_pos, self.radius);
        let mut best: Option<(f32, usize)> = None;
        for i in in_range {
            if !candidates[i].can_interact(actor, actor_pos) {
                continue;
            }
            let d2 = (positions[i] - actor_pos).length_squared();
            if best.map(|(b, _)| d2 < b).unwrap_or(true) {
                best = Some((d2, i));
            }
        }
        let Some((_d2, idx)) = best else {
            return false;
        };
        candidates[idx].interact(actor, actor_pos, bus);
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HelmState {
    Free,
    Controlled(ActorId),
}

/// Steering post with exclusive toggle-based control hand-off.
#[derive(Debug, Clone)]
pub struct Helm {
    pub pos: Vec3,
    /// Forward axis of the post; grabbing requires standing behind it.
    pub forward: Vec3,
    /// Hand-off reference point carried on the control-started event.
    pub control_point: Vec3,
    /// Entity announcements about this helm are targeted at (the ship).
    pub ship: EntityRef,
    state: HelmState,
}

impl Helm {
    pub fn new(pos: Vec3, forward: Vec3, control_point: Vec3, ship: EntityRef) -> Self {
        Self {
            pos,
            forward: forward.normalize_or_zero(),
            control_point,
            ship,
            state: HelmState::Free,
        }
    }

    #[inline]
    pub fn state(&self) -> HelmState {
        self.state
    }

    #[inline]
    pub fn controller(&self) -> Option<ActorId> {
        match self.state {
            HelmState::Controlled(a) => Some(a),
            HelmState::Free => None,
        }
    }

    fn begin_control(&mut self, actor: ActorId, bus: &mut EventBus) {
        self.state = HelmState::Controlled(actor);
        bus.publish_to(
            GameEvent::HelmControlStarted {
                control_point: self.control_point.to_array(),
            },
            self.ship,
            Some(actor.entity_ref()),
        );
    }

    fn end_control(&mut self, actor: ActorId, bus: &mut EventBus) {
        self.state = HelmState::Free;
        bus.publish_to(
            GameEvent::HelmControlEnded,
            self.ship,
            Some(actor.entity_ref()),
        );
    }

    /// Release control held by `actor` (e.g. on despawn). True when a
    /// control-ended announcement was published.
    pub fn release_if_controlled_by(&mut self, actor: ActorId, bus: &mut EventBus) -> bool {
        if self.state == HelmState::Controlled(actor) {
            self.end_control(actor, bus);
            return true;
        }
        false
    }

    /// Standing behind the post along its forward axis.
    fn is_behind(&self, actor_pos: Vec3) -> bool {
        let dir = (actor_pos - self.pos).normalize_or_zero();
        self.forward.dot(dir) < 0.0
    }
}

impl Interactable for Helm {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn can_interact(&self, actor: ActorId, actor_pos: Vec3) -> bool {
        match self.state {
            // The controller may always interact again: that is the toggle
            // that ends control.
            HelmState::Controlled(current) => current == actor,
            HelmState::Free => self.is_behind(actor_pos),
        }
    }

    fn interact(&mut self, actor: ActorId, _actor_pos: Vec3, bus: &mut EventBus) {
        match self.state {
            HelmState::Controlled(current) if current == actor => self.end_control(actor, bus),
            HelmState::Free => self.begin_control(actor, bus),
            HelmState::Controlled(other) => {
                // Filtered out by can_interact; keep the hand-off exclusive.
                log::warn!("helm interact from {actor:?} while controlled by {other:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helm_at_origin() -> Helm {
        Helm::new(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -0.5), EntityRef(100))
    }

    #[test]
    fn grab_requires_standing_behind() {
        let helm = helm_at_origin();
        let behind = Vec3::new(0.0, 0.0, -1.0);
        let in_front = Vec3::new(0.0, 0.0, 1.0);
        assert!(helm.can_interact(ActorId(1), behind));
        assert!(!helm.can_interact(ActorId(1), in_front));
    }

    #[test]
    fn toggle_releases_and_reopens_geometry_gate() {
        let mut helm = helm_at_origin();
        let mut bus = EventBus::new();
        let behind = Vec3::new(0.0, 0.0, -1.0);
        let in_front = Vec3::new(0.0, 0.0, 1.0);

        helm.interact(ActorId(1), behind, &mut bus);
        assert_eq!(helm.state(), HelmState::Controlled(ActorId(1)));
        // Controller keeps the right to interact regardless of position.
        assert!(helm.can_interact(ActorId(1), in_front));
        // Someone else does not.
        assert!(!helm.can_interact(ActorId(2), behind));

        helm.interact(ActorId(1), in_front, &mut bus);
        assert_eq!(helm.state(), HelmState::Free);
        // Geometry gates again once free.
        assert!(helm.can_interact(ActorId(2), behind));
        assert!(!helm.can_interact(ActorId(2), in_front));

        let kinds: Vec<&'static str> = bus.drain().iter().map(|e| e.event.kind()).collect();
        assert_eq!(kinds, vec!["helm_control_started", "helm_control_ended"]);
    }
}
