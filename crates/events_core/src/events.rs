//! Event payload types surfaced to UI/AI consumers.
//!
//! Positions travel as `[f32; 3]` so consumers do not need a math crate.

use serde::{Deserialize, Serialize};

/// Opaque identity used to scope announcements to an entity. Stable for the
/// lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u32);

/// Closed set of announcements the action core publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Health pool state after an effective mutation.
    HealthChanged { current: f32, max: f32 },
    /// Mana pool state after an effective mutation.
    ManaChanged { current: f32, max: f32 },
    /// Ammo count after a shot or a reload.
    AmmoChanged { remaining: u32, max: u32 },
    /// Terminal transition; published exactly once per actor.
    Died,
    /// Shooter refilled to full ammo.
    Reloaded,
    /// An actor took the helm; carries the hand-off reference point.
    HelmControlStarted { control_point: [f32; 3] },
    /// The controlling actor released the helm.
    HelmControlEnded,
    /// Session boot marker.
    LevelStarted { name: String },
}

impl GameEvent {
    /// Discriminant name, handy for log lines and coarse filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::HealthChanged { .. } => "health_changed",
            GameEvent::ManaChanged { .. } => "mana_changed",
            GameEvent::AmmoChanged { .. } => "ammo_changed",
            GameEvent::Died => "died",
            GameEvent::Reloaded => "reloaded",
            GameEvent::HelmControlStarted { .. } => "helm_control_started",
            GameEvent::HelmControlEnded => "helm_control_ended",
            GameEvent::LevelStarted { .. } => "level_started",
        }
    }
}
