//! Shooter (ranged-attack slot) specifications.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::loader;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShooterSpec {
    #[serde(default)]
    pub description: String,
    pub max_ammo: u32,
    #[serde(default = "default_consumption")]
    pub ammo_consumption: u32,
    /// Shots per second; the cooldown window is its reciprocal.
    pub attack_speed: f32,
    /// Time the reload animation holds the shooter, read by the AI layer.
    pub reload_s: f32,
    /// Projectile kind name fired by this shooter.
    pub projectile: String,
    pub launch_speed_mps: f32,
}

fn default_consumption() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShooterSpecDb {
    /// Map from shooter name (e.g. `"deck_cannon"`) to spec.
    #[serde(default)]
    pub shooters: HashMap<String, ShooterSpec>,
}

impl ShooterSpecDb {
    /// Load `data/config/shooters.toml`, falling back to defaults.
    pub fn load_default() -> Result<Self> {
        let path = loader::data_root().join("config/shooters.toml");
        if path.is_file() {
            let txt = loader::read_toml("config/shooters.toml")?;
            let db: Self = toml::from_str(&txt).context("parse shooters TOML")?;
            return Ok(db);
        }
        Ok(Self::builtin())
    }

    pub fn builtin() -> Self {
        let mut shooters = HashMap::new();
        shooters.insert(
            "deck_cannon".to_string(),
            ShooterSpec {
                description: "Deck cannon".into(),
                max_ammo: 10,
                ammo_consumption: 1,
                attack_speed: 1.0,
                reload_s: 3.0,
                projectile: "regular".into(),
                launch_speed_mps: 30.0,
            },
        );
        Self { shooters }
    }
}
