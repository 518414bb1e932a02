//! Projectile specifications and pool bounds used to parameterize the
//! session projectile pools.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::loader;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ProjectileSpec {
    pub damage: f32,
    pub life_s: f32,
    pub speed_mps: f32,
}

/// Bounds applied to each per-kind pool.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PoolBounds {
    /// Instances pre-warmed at construction.
    pub capacity: usize,
    /// Hard bound on simultaneously-live instances per kind.
    pub max_size: usize,
}

impl Default for PoolBounds {
    fn default() -> Self {
        Self {
            capacity: 20,
            max_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectileSpecDb {
    #[serde(default)]
    pub pool: PoolBounds,
    /// Map from kind name (`"regular"`, `"bouncing"`, ...) to spec.
    #[serde(default)]
    pub kinds: HashMap<String, ProjectileSpec>,
}

impl ProjectileSpecDb {
    /// Load `data/config/projectiles.toml`, falling back to defaults.
    pub fn load_default() -> Result<Self> {
        let path = loader::data_root().join("config/projectiles.toml");
        if path.is_file() {
            let txt = loader::read_toml("config/projectiles.toml")?;
            let db: Self = toml::from_str(&txt).context("parse projectiles TOML")?;
            return Ok(db);
        }
        Ok(Self::builtin())
    }

    pub fn builtin() -> Self {
        let mut kinds = HashMap::new();
        kinds.insert(
            "regular".to_string(),
            ProjectileSpec {
                damage: 10.0,
                life_s: 3.0,
                speed_mps: 30.0,
            },
        );
        kinds.insert(
            "bouncing".to_string(),
            ProjectileSpec {
                damage: 8.0,
                life_s: 4.0,
                speed_mps: 24.0,
            },
        );
        kinds.insert(
            "homing".to_string(),
            ProjectileSpec {
                damage: 6.0,
                life_s: 5.0,
                speed_mps: 18.0,
            },
        );
        kinds.insert(
            "timed".to_string(),
            ProjectileSpec {
                damage: 14.0,
                life_s: 2.0,
                speed_mps: 26.0,
            },
        );
        Self {
            pool: PoolBounds::default(),
            kinds,
        }
    }
}
