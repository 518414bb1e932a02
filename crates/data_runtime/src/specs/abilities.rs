//! Ability recipe specifications.
//!
//! Recipes are registered once at session start; the ids handed out by the
//! registry are derived from the stable `name` strings here. Field values
//! are stringly at this layer (`"mana"`, `"act"`, `"damage"`) and validated
//! when the registry is built.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::loader;

/// Resource cost attached to a cast. Absence means the cast is free.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostSpec {
    /// Cost pool name; currently only `"mana"`.
    pub kind: String,
    pub amount: f32,
}

/// Secondary effect that runs with the realized magnitude of its parent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostEffectSpec {
    /// `"heal_caster"` or `"grow_mana_caster"`.
    pub kind: String,
    #[serde(default = "default_factor")]
    pub factor: f32,
}

fn default_factor() -> f32 {
    1.0
}

/// One effect entry, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EffectSpec {
    /// `"damage"`, `"heal"` or `"grow_mana"`.
    pub kind: String,
    pub amount: f32,
    /// Trigger: `"apply"` (default) or `"interval"`.
    #[serde(default = "default_trigger")]
    pub on: String,
    #[serde(default)]
    pub post: Vec<PostEffectSpec>,
}

fn default_trigger() -> String {
    "apply".to_string()
}

/// Status condition applied to the cast target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionSpec {
    /// `"stun"`, `"root"`, `"disarm"` or `"silence"`.
    pub kind: String,
    pub duration_s: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AbilitySpec {
    /// Stable registry name.
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: Option<CostSpec>,
    /// Legal-action category the caster must currently have.
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    /// Period of the `"interval"` effects, if any.
    #[serde(default)]
    pub interval_s: Option<f32>,
    /// Total lifetime of the cast instance; `None` means open-ended.
    #[serde(default)]
    pub duration_s: Option<f32>,
    /// Re-applying while active refreshes the instance instead of stacking.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AbilitySpecDb {
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
}

impl AbilitySpecDb {
    /// Load `data/config/abilities.toml`, falling back to the built-in table.
    pub fn load_default() -> Result<Self> {
        let path = loader::data_root().join("config/abilities.toml");
        if path.is_file() {
            let txt = loader::read_toml("config/abilities.toml")?;
            let db: Self = toml::from_str(&txt).context("parse abilities TOML")?;
            return Ok(db);
        }
        Ok(Self::builtin())
    }

    /// Parse a database from a TOML string (used by tests and tools).
    pub fn from_toml(txt: &str) -> Result<Self> {
        toml::from_str(txt).context("parse abilities TOML")
    }

    /// Built-in recipe table matching the shipped game data.
    pub fn builtin() -> Self {
        Self {
            abilities: vec![
                AbilitySpec {
                    name: "mana_grow".into(),
                    display_name: "Mana Natural Grow".into(),
                    description: "Restores energy passively every 2 seconds.".into(),
                    cost: None,
                    requires: None,
                    effects: vec![EffectSpec {
                        kind: "grow_mana".into(),
                        amount: 1.0,
                        on: "interval".into(),
                        post: Vec::new(),
                    }],
                    conditions: Vec::new(),
                    interval_s: Some(2.0),
                    duration_s: None,
                    refresh: false,
                },
                AbilitySpec {
                    name: "melee".into(),
                    display_name: "Melee".into(),
                    description: "Melee".into(),
                    cost: None,
                    requires: Some("act".into()),
                    effects: vec![EffectSpec {
                        kind: "damage".into(),
                        amount: 2.0,
                        on: "apply".into(),
                        post: Vec::new(),
                    }],
                    conditions: Vec::new(),
                    interval_s: None,
                    duration_s: None,
                    refresh: false,
                },
                AbilitySpec {
                    name: "stun".into(),
                    display_name: "Stun".into(),
                    description: "Damage and stun 2s".into(),
                    cost: Some(CostSpec {
                        kind: "mana".into(),
                        amount: 10.0,
                    }),
                    requires: Some("act".into()),
                    effects: vec![EffectSpec {
                        kind: "damage".into(),
                        amount: 4.0,
                        on: "apply".into(),
                        post: Vec::new(),
                    }],
                    conditions: vec![ConditionSpec {
                        kind: "stun".into(),
                        duration_s: 2.0,
                    }],
                    interval_s: None,
                    duration_s: Some(2.0),
                    refresh: true,
                },
                AbilitySpec {
                    name: "heal".into(),
                    display_name: "Range Heal".into(),
                    description: "Heal player in range".into(),
                    cost: None,
                    requires: Some("act".into()),
                    effects: vec![EffectSpec {
                        kind: "heal".into(),
                        amount: 2.0,
                        on: "apply".into(),
                        post: Vec::new(),
                    }],
                    conditions: Vec::new(),
                    interval_s: None,
                    duration_s: None,
                    refresh: false,
                },
                AbilitySpec {
                    name: "life_drain".into(),
                    display_name: "Life Drain".into(),
                    description: "Damage that heals the caster by the amount dealt".into(),
                    cost: Some(CostSpec {
                        kind: "mana".into(),
                        amount: 6.0,
                    }),
                    requires: Some("cast".into()),
                    effects: vec![EffectSpec {
                        kind: "damage".into(),
                        amount: 3.0,
                        on: "apply".into(),
                        post: vec![PostEffectSpec {
                            kind: "heal_caster".into(),
                            factor: 1.0,
                        }],
                    }],
                    conditions: Vec::new(),
                    interval_s: None,
                    duration_s: None,
                    refresh: false,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_present() {
        let db = AbilitySpecDb::load_default().expect("load");
        assert!(db.abilities.iter().any(|a| a.name == "stun"));
        assert!(db.abilities.iter().any(|a| a.name == "mana_grow"));
    }

    #[test]
    fn parses_inline_toml() {
        let txt = r#"
            [[abilities]]
            name = "spark"
            display_name = "Spark"
            cost = { kind = "mana", amount = 1.5 }
            requires = "cast"

            [[abilities.effects]]
            kind = "damage"
            amount = 1.0
        "#;
        let db = AbilitySpecDb::from_toml(txt).expect("parse");
        assert_eq!(db.abilities.len(), 1);
        assert_eq!(db.abilities[0].effects[0].on, "apply");
        assert!(db.abilities[0].cost.as_ref().unwrap().amount > 1.0);
    }
}
