//! Ability registry, effect dispatch, and interval cast instances.
//!
//! Recipes are validated and frozen at session start; ids are handed out in
//! registration order from the stable spec names. Unknown names in spec data
//! are configuration errors and fail the build loudly. Looking up an id that
//! was never issued is a programming error and panics.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use events_core::EventBus;

use data_runtime::specs::abilities::{AbilitySpec, AbilitySpecDb};

use crate::actor::{ActorId, ActorStore};
use crate::status::{LegalAction, StatusKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AbilityId(pub u32);

/// Result of a cast request. Rejections are expected outcomes, not errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    Applied,
    RejectedCost,
    RejectedLegality,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Cost {
    None,
    Mana(f32),
}

/// Secondary effect fed the realized magnitude of its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PostEffect {
    HealCaster { factor: f32 },
    GrowManaCaster { factor: f32 },
}

/// Closed set of observable mutations an ability can route.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Damage { amount: f32, post: Vec<PostEffect> },
    Heal { amount: f32 },
    GrowMana { amount: f32 },
}

/// When an effect entry runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    OnApply,
    OnInterval,
}

#[derive(Clone, Debug)]
pub struct AbilityRecipe {
    pub id: AbilityId,
    pub name: String,
    pub display_name: String,
    pub cost: Cost,
    pub requires: Option<LegalAction>,
    /// Effects in declaration order, each with its trigger.
    pub effects: Vec<(Effect, Trigger)>,
    /// Conditions applied to the target on a successful cast.
    pub conditions: Vec<(StatusKind, f32)>,
    pub interval_s: Option<f32>,
    pub duration_s: Option<f32>,
    pub refresh: bool,
}

/// Immutable recipe registry built once at session start.
#[derive(Debug, Default)]
pub struct AbilityBook {
    by_name: HashMap<String, AbilityId>,
    recipes: Vec<AbilityRecipe>,
}

impl AbilityBook {
    pub fn from_specs(db: &AbilitySpecDb) -> Result<Self> {
        let mut book = Self::default();
        for spec in &db.abilities {
            let recipe = build_recipe(AbilityId(book.recipes.len() as u32), spec)
                .with_context(|| format!("ability '{}'", spec.name))?;
            if book
                .by_name
                .insert(spec.name.clone(), recipe.id)
                .is_some()
            {
                bail!("duplicate ability name '{}'", spec.name);
            }
            book.recipes.push(recipe);
        }
        log::info!("ability registry built: {} recipes", book.recipes.len());
        Ok(book)
    }

    pub fn id(&self, name: &str) -> Option<AbilityId> {
        self.by_name.get(name).copied()
    }

    /// Recipe lookup. The id comes from this book, so absence is a
    /// programming error.
    pub fn recipe(&self, id: AbilityId) -> &AbilityRecipe {
        self.recipes
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("unknown ability id {:?}", id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &AbilityRecipe> {
        self.recipes.iter()
    }
}

fn build_recipe(id: AbilityId, spec: &AbilitySpec) -> Result<AbilityRecipe> {
    let cost = match &spec.cost {
        None => Cost::None,
        Some(c) => match c.kind.as_str() {
            "mana" => Cost::Mana(c.amount),
            other => bail!("unknown cost kind '{other}'"),
        },
    };
    let requires = match &spec.requires {
        None => None,
        Some(s) => Some(
            LegalAction::parse(s).with_context(|| format!("unknown legal action '{s}'"))?,
        ),
    };
    let mut effects = Vec::with_capacity(spec.effects.len());
    for e in &spec.effects {
        let trigger = match e.on.as_str() {
            "apply" => Trigger::OnApply,
            "interval" => Trigger::OnInterval,
            other => bail!("unknown effect trigger '{other}'"),
        };
        if trigger == Trigger::OnInterval && spec.interval_s.is_none() {
            bail!("interval effect without interval_s");
        }
        let mut post = Vec::with_capacity(e.post.len());
        for p in &e.post {
            post.push(match p.kind.as_str() {
                "heal_caster" => PostEffect::HealCaster { factor: p.factor },
                "grow_mana_caster" => PostEffect::GrowManaCaster { factor: p.factor },
                other => bail!("unknown post effect '{other}'"),
            });
        }
        let effect = match e.kind.as_str() {
            "damage" => Effect::Damage {
                amount: e.amount,
                post,
            },
            "heal" => {
                if !post.is_empty() {
                    bail!("post effects are only supported on damage");
                }
                Effect::Heal { amount: e.amount }
            }
            "grow_mana" => {
                if !post.is_empty() {
                    bail!("post effects are only supported on damage");
                }
                Effect::GrowMana { amount: e.amount }
            }
            other => bail!("unknown effect kind '{other}'"),
        };
        effects.push((effect, trigger));
    }
    let mut conditions = Vec::with_capacity(spec.conditions.len());
    for c in &spec.conditions {
        let kind = StatusKind::parse(&c.kind)
            .with_context(|| format!("unknown status kind '{}'", c.kind))?;
        conditions.push((kind, c.duration_s));
    }
    if let Some(p) = spec.interval_s {
        if p <= 0.0 {
            bail!("interval_s must be positive");
        }
    }
    Ok(AbilityRecipe {
        id,
        name: spec.name.clone(),
        display_name: spec.display_name.clone(),
        cost,
        requires,
        effects,
        conditions,
        interval_s: spec.interval_s,
        duration_s: spec.duration_s,
        refresh: spec.refresh,
    })
}

/// Runtime state of a cast with an interval component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActiveCast {
    pub ability: AbilityId,
    pub caster: ActorId,
    pub target: ActorId,
    /// Interval accumulator. Whole periods are subtracted as they fire, so
    /// boundaries are never missed or double-counted across uneven ticks.
    pub elapsed_s: f32,
    /// Lifetime accumulator against the recipe's total duration.
    pub age_s: f32,
}

/// Apply every effect of `recipe` matching `trigger`, in declared order.
/// Post effects run with the realized magnitude of their parent.
pub fn apply_effects(
    actors: &mut ActorStore,
    recipe: &AbilityRecipe,
    trigger: Trigger,
    caster: ActorId,
    target: ActorId,
    bus: &mut EventBus,
) {
    for (effect, trig) in &recipe.effects {
        if *trig != trigger {
            continue;
        }
        apply_effect(actors, effect, caster, target, bus);
    }
}

fn apply_effect(
    actors: &mut ActorStore,
    effect: &Effect,
    caster: ActorId,
    target: ActorId,
    bus: &mut EventBus,
) {
    let Some((dst, src)) = actors.target_and_caster(target, caster) else {
        log::warn!("effect dropped: target {target:?} not present");
        return;
    };
    match effect {
        Effect::Damage { amount, post } => {
            let realized = dst.take_damage(*amount, bus);
            if post.is_empty() {
                return;
            }
            // `None` means the caster is the target itself.
            let back = match src {
                Some(c) => c,
                None => dst,
            };
            for p in post {
                match p {
                    PostEffect::HealCaster { factor } => {
                        back.heal(realized * factor, bus);
                    }
                    PostEffect::GrowManaCaster { factor } => {
                        back.grow_mana(realized * factor, bus);
                    }
                }
            }
        }
        Effect::Heal { amount } => {
            dst.heal(*amount, bus);
        }
        Effect::GrowMana { amount } => {
            dst.grow_mana(*amount, bus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_assigns_ids_in_order() {
        let db = AbilitySpecDb::builtin();
        let book = AbilityBook::from_specs(&db).expect("build");
        assert_eq!(book.len(), db.abilities.len());
        let first = book.id(&db.abilities[0].name).expect("id");
        assert_eq!(first, AbilityId(0));
        assert_eq!(book.recipe(first).name, db.abilities[0].name);
    }

    #[test]
    fn unknown_status_kind_is_fatal() {
        let db = AbilitySpecDb::from_toml(
            r#"
            [[abilities]]
            name = "bad"
            display_name = "Bad"

            [[abilities.conditions]]
            kind = "petrify"
            duration_s = 1.0
            "#,
        )
        .expect("parse");
        assert!(AbilityBook::from_specs(&db).is_err());
    }

    #[test]
    fn duplicate_names_are_fatal() {
        let db = AbilitySpecDb::from_toml(
            r#"
            [[abilities]]
            name = "dup"
            display_name = "A"

            [[abilities]]
            name = "dup"
            display_name = "B"
            "#,
        )
        .expect("parse");
        assert!(AbilityBook::from_specs(&db).is_err());
    }

    #[test]
    fn interval_effect_requires_period() {
        let db = AbilitySpecDb::from_toml(
            r#"
            [[abilities]]
            name = "tick"
            display_name = "Tick"

            [[abilities.effects]]
            kind = "damage"
            amount = 1.0
            on = "interval"
            "#,
        )
        .expect("parse");
        assert!(AbilityBook::from_specs(&db).is_err());
    }
}
