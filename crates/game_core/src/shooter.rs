//! Ranged-attack slot: attack-rate limiting and ammunition accounting.
//!
//! Independent of the ability system; it guards exactly one action. The
//! session layer composes this gate with the projectile pool and the
//! announcement channel.

use anyhow::{Context, Result};

use data_runtime::specs::shooters::ShooterSpec;

use crate::projectile::ProjectileKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Shooter {
    pub remaining_ammo: u32,
    pub max_ammo: u32,
    pub ammo_consumption: u32,
    /// Minimum seconds between shots (`1 / attack_speed`).
    pub cooldown_s: f32,
    /// Timestamp of the last accepted shot; seeded one cooldown in the past
    /// so the first shot is never rate-limited.
    pub last_fire_s: f32,
    /// Reload hold time, surfaced to the AI layer via the blackboard.
    pub reload_s: f32,
    pub projectile: ProjectileKind,
    pub launch_speed_mps: f32,
}

impl Shooter {
    pub fn from_spec(spec: &ShooterSpec) -> Result<Self> {
        if spec.attack_speed <= 0.0 {
            anyhow::bail!("attack_speed must be positive");
        }
        let projectile = ProjectileKind::parse(&spec.projectile)
            .with_context(|| format!("unknown projectile kind '{}'", spec.projectile))?;
        let cooldown_s = 1.0 / spec.attack_speed;
        Ok(Self {
            remaining_ammo: spec.max_ammo,
            max_ammo: spec.max_ammo,
            ammo_consumption: spec.ammo_consumption,
            cooldown_s,
            last_fire_s: -cooldown_s,
            reload_s: spec.reload_s,
            projectile,
            launch_speed_mps: spec.launch_speed_mps,
        })
    }

    /// Cooldown elapsed and enough ammo for one shot.
    #[inline]
    pub fn can_fire(&self, now_s: f32) -> bool {
        now_s - self.last_fire_s >= self.cooldown_s
            && self.remaining_ammo >= self.ammo_consumption
    }

    /// Consume one shot. Re-checks the gate so a stale `can_fire` read
    /// cannot sneak a shot through; mutates nothing on rejection.
    pub fn fire(&mut self, now_s: f32) -> bool {
        if !self.can_fire(now_s) {
            return false;
        }
        self.remaining_ammo -= self.ammo_consumption;
        self.last_fire_s = now_s;
        true
    }

    /// Refill to full. The cooldown timer is untouched.
    pub fn reload(&mut self) {
        self.remaining_ammo = self.max_ammo;
    }
}
