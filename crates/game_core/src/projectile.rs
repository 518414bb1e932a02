//! Type-keyed bounded pools for short-lived projectile instances.
//!
//! Instances move out of the pool on rent and back in on return, so a held
//! handle cannot be returned twice. The per-kind bound caps simultaneously
//! live instances; exhaustion is an expected outcome (logged, `None`).

use std::collections::HashMap;

use anyhow::{Context, Result};
use glam::Vec3;

use data_runtime::specs::projectiles::{PoolBounds, ProjectileSpec, ProjectileSpecDb};

use crate::actor::ActorId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Regular,
    Bouncing,
    Homing,
    Timed,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 4] = [
        ProjectileKind::Regular,
        ProjectileKind::Bouncing,
        ProjectileKind::Homing,
        ProjectileKind::Timed,
    ];

    /// Parse a config name (`"regular"`, `"bouncing"`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "bouncing" => Some(Self::Bouncing),
            "homing" => Some(Self::Homing),
            "timed" => Some(Self::Timed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Bouncing => "bouncing",
            Self::Homing => "homing",
            Self::Timed => "timed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Session-assigned id; zero while idle in the pool.
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub age_s: f32,
    pub life_s: f32,
    pub damage: f32,
    pub owner: Option<ActorId>,
}

impl Projectile {
    fn idle(kind: ProjectileKind, spec: &ProjectileSpec) -> Self {
        Self {
            id: 0,
            kind,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            age_s: 0.0,
            life_s: spec.life_s,
            damage: spec.damage,
            owner: None,
        }
    }

    /// Reset transform, velocity, age, and ownership to idle defaults.
    fn reset(&mut self, spec: &ProjectileSpec) {
        self.id = 0;
        self.pos = Vec3::ZERO;
        self.vel = Vec3::ZERO;
        self.age_s = 0.0;
        self.life_s = spec.life_s;
        self.damage = spec.damage;
        self.owner = None;
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.age_s >= self.life_s
    }
}

/// One kind's pool.
#[derive(Debug)]
struct Pool {
    kind: ProjectileKind,
    spec: ProjectileSpec,
    idle: Vec<Projectile>,
    live: usize,
    max_size: usize,
}

impl Pool {
    fn new(kind: ProjectileKind, spec: ProjectileSpec, bounds: PoolBounds) -> Self {
        let idle = (0..bounds.capacity)
            .map(|_| Projectile::idle(kind, &spec))
            .collect();
        Self {
            kind,
            spec,
            idle,
            live: 0,
            max_size: bounds.max_size,
        }
    }

    fn rent(&mut self) -> Option<Projectile> {
        if self.live >= self.max_size {
            log::warn!(
                "projectile pool '{}' exhausted ({} live)",
                self.kind.name(),
                self.live
            );
            metrics::counter!("projectile.pool_exhausted_total").increment(1);
            return None;
        }
        self.live += 1;
        Some(
            self.idle
                .pop()
                .unwrap_or_else(|| Projectile::idle(self.kind, &self.spec)),
        )
    }

    fn give_back(&mut self, mut p: Projectile) {
        p.reset(&self.spec);
        self.idle.push(p);
        self.live = self.live.saturating_sub(1);
    }
}

/// All per-kind pools for one session.
#[derive(Debug)]
pub struct ProjectilePools {
    pools: HashMap<ProjectileKind, Pool>,
}

impl ProjectilePools {
    pub fn from_specs(db: &ProjectileSpecDb) -> Result<Self> {
        let mut pools = HashMap::new();
        for (name, spec) in &db.kinds {
            let kind = ProjectileKind::parse(name)
                .with_context(|| format!("unknown projectile kind '{name}'"))?;
            pools.insert(kind, Pool::new(kind, *spec, db.pool));
        }
        Ok(Self { pools })
    }

    /// Rent an instance of `kind`. `None` when the kind is not configured
    /// or its live bound is reached.
    pub fn rent(&mut self, kind: ProjectileKind) -> Option<Projectile> {
        match self.pools.get_mut(&kind) {
            Some(pool) => pool.rent(),
            None => {
                log::warn!("projectile kind '{}' not configured", kind.name());
                None
            }
        }
    }

    /// Return an instance to its kind's pool, resetting it to idle.
    pub fn give_back(&mut self, p: Projectile) {
        match self.pools.get_mut(&p.kind) {
            Some(pool) => pool.give_back(p),
            // Unconfigured kinds cannot be rented, so this is unreachable
            // in practice; drop the instance rather than corrupt a pool.
            None => log::warn!("returned projectile of unconfigured kind '{}'", p.kind.name()),
        }
    }

    pub fn spec(&self, kind: ProjectileKind) -> Option<&ProjectileSpec> {
        self.pools.get(&kind).map(|p| &p.spec)
    }

    /// Currently-live count for `kind`.
    pub fn live(&self, kind: ProjectileKind) -> usize {
        self.pools.get(&kind).map(|p| p.live).unwrap_or(0)
    }

    /// Idle instances currently held for `kind`.
    pub fn idle(&self, kind: ProjectileKind) -> usize {
        self.pools.get(&kind).map(|p| p.idle.len()).unwrap_or(0)
    }
}
