//! Authoritative gameplay-action core.
//!
//! `GameState` is the explicit session context: actor store, ability
//! registry, cast instances, projectile pools, helm, blackboard, and the
//! announcement bus, constructed from `data_runtime` specs and torn down
//! with the session. One fixed tick order applies throughout: gates and
//! cast instances decay first, then queued commands run, then projectiles
//! age, so every query made during a tick observes post-advancement state.

use glam::Vec3;

use events_core::{EventBus, GameEvent};

use data_runtime::configs::status::{StatusConfig, StatusPolicy};
use data_runtime::specs::abilities::AbilitySpecDb;
use data_runtime::specs::projectiles::ProjectileSpecDb;
use data_runtime::specs::shooters::ShooterSpecDb;

pub mod ability;
pub mod actor;
pub mod blackboard;
pub mod interact;
pub mod projectile;
pub mod shooter;
pub mod status;

pub use ability::{AbilityId, CastOutcome};
pub use actor::{Actor, ActorId, Pool, PoolKind, Transform};
pub use interact::{Helm, HelmState, Interactor};
pub use projectile::{Projectile, ProjectileKind};
pub use status::{LegalAction, StatusKind};

use ability::{ActiveCast, Cost, Trigger};
use actor::ActorStore;
use blackboard::{keys, Blackboard, ScheduledClears};
use interact::Interactable;
use projectile::ProjectilePools;
use shooter::Shooter;
use status::StatusSet;

pub const DEFAULT_MAX_HEALTH: f32 = 20.0;
pub const DEFAULT_MAX_MANA: f32 = 20.0;

/// Duration the melee-pressed blackboard pulse stays set.
const MELEE_PRESSED_PULSE_S: f32 = 0.25;

/// Deferred player actions resolved inside the tick, after advancement.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Command {
    Cast {
        ability: AbilityId,
        caster: ActorId,
        target: ActorId,
    },
    Fire {
        actor: ActorId,
    },
    Interact {
        actor: ActorId,
    },
}

#[derive(Debug)]
pub struct GameState {
    time_s: f32,
    next_proj_id: u32,
    pub actors: ActorStore,
    pub abilities: ability::AbilityBook,
    pub casts: Vec<ActiveCast>,
    pub pools: ProjectilePools,
    /// Projectiles currently in flight (rented from the pools).
    pub projectiles: Vec<Projectile>,
    pub helm: Option<Helm>,
    pub interactor: Interactor,
    pub blackboard: Blackboard,
    clears: ScheduledClears,
    pub bus: EventBus,
    queued: Vec<Command>,
    status_policy: StatusPolicy,
    shooter_specs: ShooterSpecDb,
}

impl GameState {
    /// Boot a session from the default spec databases.
    pub fn new() -> anyhow::Result<Self> {
        let abilities = AbilitySpecDb::load_default()?;
        let projectiles = ProjectileSpecDb::load_default()?;
        let shooters = ShooterSpecDb::load_default()?;
        let status_cfg = data_runtime::configs::status::load_default()?;
        Self::from_specs(&abilities, &projectiles, shooters, status_cfg)
    }

    /// Boot a session from explicit spec databases. Configuration errors
    /// (unknown names, duplicates) fail here, before any tick runs.
    pub fn from_specs(
        abilities: &AbilitySpecDb,
        projectiles: &ProjectileSpecDb,
        shooters: ShooterSpecDb,
        status_cfg: StatusConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            time_s: 0.0,
            next_proj_id: 1,
            actors: ActorStore::new(),
            abilities: ability::AbilityBook::from_specs(abilities)?,
            casts: Vec::new(),
            pools: ProjectilePools::from_specs(projectiles)?,
            projectiles: Vec::new(),
            helm: None,
            interactor: Interactor::default(),
            blackboard: Blackboard::default(),
            clears: ScheduledClears::default(),
            bus: EventBus::new(),
            queued: Vec::new(),
            status_policy: status_cfg.policy,
            shooter_specs: shooters,
        })
    }

    /// Accumulated session time in seconds.
    #[inline]
    pub fn now(&self) -> f32 {
        self.time_s
    }

    /// Announce the level start to subscribers.
    pub fn begin_level(&mut self, name: &str) {
        log::info!("{name} started...");
        self.bus.publish(GameEvent::LevelStarted { name: name.into() });
    }

    // ------------------------------------------------------------------
    // Actor lifecycle
    // ------------------------------------------------------------------

    pub fn spawn_player(&mut self, pos: Vec3) -> ActorId {
        self.spawn_player_with(pos, DEFAULT_MAX_HEALTH, DEFAULT_MAX_MANA)
    }

    pub fn spawn_player_with(&mut self, pos: Vec3, max_health: f32, max_mana: f32) -> ActorId {
        let id = self.actors.spawn(
            Transform::from_pos(pos),
            Pool::full(max_health),
            Pool::full(max_mana),
            StatusSet::new(self.status_policy),
        );
        let me = id.entity_ref();
        self.bus.publish_to(
            GameEvent::HealthChanged {
                current: max_health,
                max: max_health,
            },
            me,
            Some(me),
        );
        self.bus.publish_to(
            GameEvent::ManaChanged {
                current: max_mana,
                max: max_mana,
            },
            me,
            Some(me),
        );
        // Passive mana growth rides the normal cast path, self-targeted.
        if let Some(grow) = self.abilities.id("mana_grow") {
            let _ = self.try_cast(grow, id, id);
        }
        id
    }

    /// Remove an actor and everything bound to it: cast instances,
    /// blackboard writes, pending clears, helm control.
    pub fn despawn(&mut self, id: ActorId) {
        if !self.actors.remove(id) {
            log::warn!("despawn of unknown actor {id:?}");
            return;
        }
        self.casts.retain(|c| c.caster != id && c.target != id);
        self.blackboard.forget(id);
        self.clears.forget(id);
        if let Some(h) = self.helm.as_mut() {
            h.release_if_controlled_by(id, &mut self.bus);
        }
    }

    /// Install a shooter slot on an actor and announce its initial ammo.
    pub fn attach_shooter(&mut self, actor: ActorId, name: &str) -> anyhow::Result<()> {
        let spec = self
            .shooter_specs
            .shooters
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown shooter '{name}'"))?;
        let sh = Shooter::from_spec(spec)?;
        let (remaining, max) = (sh.remaining_ammo, sh.max_ammo);
        match self.actors.get_mut(actor) {
            Some(a) => a.shooter = Some(sh),
            None => anyhow::bail!("unknown actor {actor:?}"),
        }
        let me = actor.entity_ref();
        self.bus
            .publish_to(GameEvent::AmmoChanged { remaining, max }, me, Some(me));
        Ok(())
    }

    pub fn add_helm(&mut self, helm: Helm) {
        self.helm = Some(helm);
    }

    // ------------------------------------------------------------------
    // Casting
    // ------------------------------------------------------------------

    /// Resolve a cast request immediately. Rejections leave no side effects;
    /// the cost is all-or-nothing.
    pub fn try_cast(&mut self, ability: AbilityId, caster: ActorId, target: ActorId) -> CastOutcome {
        let recipe = self.abilities.recipe(ability);
        let Some(c) = self.actors.get(caster) else {
            log::warn!("cast '{}' from unknown actor {caster:?}", recipe.name);
            return CastOutcome::RejectedLegality;
        };
        if c.dead {
            return CastOutcome::RejectedLegality;
        }
        if let Some(required) = recipe.requires {
            if !c.statuses.has_legal_action(required) {
                metrics::counter!("cast.rejected_total").increment(1);
                return CastOutcome::RejectedLegality;
            }
        }
        if let Cost::Mana(amount) = recipe.cost {
            if c.mana.current < amount {
                metrics::counter!("cast.rejected_total").increment(1);
                return CastOutcome::RejectedCost;
            }
            if let Some(cm) = self.actors.get_mut(caster) {
                cm.use_mana(amount, &mut self.bus);
            }
        }
        ability::apply_effects(
            &mut self.actors,
            recipe,
            Trigger::OnApply,
            caster,
            target,
            &mut self.bus,
        );
        for (kind, duration_s) in &recipe.conditions {
            match self.actors.get_mut(target) {
                Some(t) => t.statuses.apply(*kind, *duration_s),
                None => log::warn!("condition dropped: target {target:?} not present"),
            }
        }
        if recipe.interval_s.is_some() {
            let existing = self
                .casts
                .iter_mut()
                .find(|ac| ac.ability == ability && ac.caster == caster && ac.target == target);
            match existing {
                Some(ac) => {
                    if recipe.refresh {
                        ac.age_s = 0.0;
                    }
                }
                None => self.casts.push(ActiveCast {
                    ability,
                    caster,
                    target,
                    elapsed_s: 0.0,
                    age_s: 0.0,
                }),
            }
        }
        CastOutcome::Applied
    }

    /// Cast melee and pulse the melee-pressed blackboard flag; the pulse is
    /// cleared by a scheduled task, not by a suspended routine.
    pub fn press_melee(&mut self, actor: ActorId, target: ActorId) -> CastOutcome {
        let Some(id) = self.abilities.id("melee") else {
            log::warn!("melee ability not registered");
            return CastOutcome::RejectedLegality;
        };
        let outcome = self.try_cast(id, actor, target);
        if outcome == CastOutcome::Applied {
            self.blackboard.set_flag(actor, keys::MELEE_PRESSED, true);
            self.clears
                .schedule(actor, keys::MELEE_PRESSED, MELEE_PRESSED_PULSE_S);
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Ranged fire
    // ------------------------------------------------------------------

    /// Fire an actor's shooter slot: rate/ammo gate, pool rent, launch.
    /// Pool exhaustion consumes the shot but materializes no projectile.
    pub fn fire_shooter(&mut self, actor: ActorId) -> bool {
        let now_s = self.time_s;
        let (kind, launch, remaining, max, consumption, origin, dir) = {
            let Some(a) = self.actors.get_mut(actor) else {
                log::warn!("fire from unknown actor {actor:?}");
                return false;
            };
            if a.dead || !a.statuses.has_legal_action(LegalAction::Act) {
                return false;
            }
            let origin = a.tr.pos;
            let dir = a.tr.forward();
            let Some(sh) = a.shooter.as_mut() else {
                log::warn!("actor {actor:?} has no shooter slot");
                return false;
            };
            if !sh.fire(now_s) {
                return false;
            }
            (
                sh.projectile,
                sh.launch_speed_mps,
                sh.remaining_ammo,
                sh.max_ammo,
                sh.ammo_consumption,
                origin,
                dir,
            )
        };
        if let Some(mut p) = self.pools.rent(kind) {
            p.id = self.next_proj_id;
            self.next_proj_id = self.next_proj_id.wrapping_add(1);
            p.owner = Some(actor);
            p.pos = origin + dir * 0.3;
            p.vel = dir * launch;
            self.projectiles.push(p);
        }
        let me = actor.entity_ref();
        self.bus
            .publish_to(GameEvent::AmmoChanged { remaining, max }, me, Some(me));
        if remaining < consumption {
            self.blackboard.set_flag(actor, keys::RELOADING, true);
        }
        true
    }

    /// Refill the shooter slot. The cooldown window is untouched.
    pub fn reload_shooter(&mut self, actor: ActorId) -> bool {
        let (remaining, max) = {
            let Some(a) = self.actors.get_mut(actor) else {
                log::warn!("reload on unknown actor {actor:?}");
                return false;
            };
            let Some(sh) = a.shooter.as_mut() else {
                log::warn!("actor {actor:?} has no shooter slot");
                return false;
            };
            sh.reload();
            (sh.remaining_ammo, sh.max_ammo)
        };
        let me = actor.entity_ref();
        self.bus
            .publish_to(GameEvent::AmmoChanged { remaining, max }, me, Some(me));
        self.bus.publish_to(GameEvent::Reloaded, me, Some(me));
        self.blackboard.set_flag(actor, keys::RELOADING, false);
        true
    }

    /// Return an in-flight projectile to its pool (host collision response).
    /// Unknown ids (already returned or expired) warn and no-op.
    pub fn return_projectile(&mut self, id: u32) -> bool {
        match self.projectiles.iter().position(|p| p.id == id) {
            Some(i) => {
                let p = self.projectiles.swap_remove(i);
                self.pools.give_back(p);
                true
            }
            None => {
                log::warn!("return of unknown projectile id {id}");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Resolve a discrete interact action for `actor` against the session's
    /// interactables (currently the helm). Mirrors the helm state into the
    /// actor's "Driving" blackboard flag.
    pub fn try_interact(&mut self, actor: ActorId) -> bool {
        let Some(pos) = self.actors.get(actor).map(|a| a.tr.pos) else {
            log::warn!("interact from unknown actor {actor:?}");
            return false;
        };
        let mut ok = false;
        if let Some(helm) = self.helm.as_mut() {
            let mut candidates: [&mut dyn Interactable; 1] = [helm];
            ok = self
                .interactor
                .try_interact(actor, pos, &mut candidates, &mut self.bus);
        }
        if let Some(helm) = self.helm.as_ref() {
            let driving = helm.controller() == Some(actor);
            self.blackboard.set_flag(actor, keys::DRIVING, driving);
        }
        ok
    }

    // ------------------------------------------------------------------
    // Blackboard writes owned by the core
    // ------------------------------------------------------------------

    pub fn set_shielding(&mut self, actor: ActorId, on: bool) {
        self.blackboard.set_flag(actor, keys::SHIELDING, on);
    }

    pub fn set_velocity(&mut self, actor: ActorId, velocity: Vec3) {
        self.blackboard
            .set(actor, keys::VELOCITY, blackboard::Value::Vector(velocity.to_array()));
    }

    // ------------------------------------------------------------------
    // Deferred commands
    // ------------------------------------------------------------------

    pub fn enqueue_cast(&mut self, ability: AbilityId, caster: ActorId, target: ActorId) {
        self.queued.push(Command::Cast {
            ability,
            caster,
            target,
        });
    }

    pub fn enqueue_fire(&mut self, actor: ActorId) {
        self.queued.push(Command::Fire { actor });
    }

    pub fn enqueue_interact(&mut self, actor: ActorId) {
        self.queued.push(Command::Interact { actor });
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Step the session by `dt` seconds in the fixed order: decay, queued
    /// commands, projectile aging, cleanup.
    pub fn step_authoritative(&mut self, dt: f32) {
        let t0 = std::time::Instant::now();
        self.time_s += dt;

        // 1) Decay status gates and cast instances before anything queries.
        for a in self.actors.iter_mut() {
            a.statuses.advance(dt);
        }
        self.advance_casts(dt);
        self.clears.advance(dt, &mut self.blackboard);

        // 2) Queued commands observe post-advancement state.
        let queued = std::mem::take(&mut self.queued);
        for cmd in queued {
            match cmd {
                Command::Cast {
                    ability,
                    caster,
                    target,
                } => {
                    let _ = self.try_cast(ability, caster, target);
                }
                Command::Fire { actor } => {
                    let _ = self.fire_shooter(actor);
                }
                Command::Interact { actor } => {
                    let _ = self.try_interact(actor);
                }
            }
        }

        // 3) Integrate and age projectiles; expired ones return to their
        // pool without external prompting.
        let mut i = 0;
        while i < self.projectiles.len() {
            let p = &mut self.projectiles[i];
            p.pos += p.vel * dt;
            p.age_s += dt;
            if p.expired() {
                let p = self.projectiles.swap_remove(i);
                self.pools.give_back(p);
                continue;
            }
            i += 1;
        }

        // 4) Drop cast instances whose endpoints vanished mid-tick.
        let actors = &self.actors;
        self.casts
            .retain(|c| actors.contains(c.caster) && actors.contains(c.target));

        let ms = t0.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("tick.ms").record(ms);
    }

    /// Fire interval effects once per crossed period boundary and expire
    /// instances whose total duration elapsed.
    fn advance_casts(&mut self, dt: f32) {
        let mut fires: Vec<(AbilityId, ActorId, ActorId)> = Vec::new();
        let mut expired: Vec<usize> = Vec::new();
        for (i, c) in self.casts.iter_mut().enumerate() {
            let recipe = self.abilities.recipe(c.ability);
            if let Some(period) = recipe.interval_s {
                c.elapsed_s += dt;
                // Subtract periods instead of resetting so uneven ticks do
                // not drift; a dt larger than the period fires per boundary.
                while c.elapsed_s >= period {
                    c.elapsed_s -= period;
                    fires.push((c.ability, c.caster, c.target));
                }
            }
            if let Some(total) = recipe.duration_s {
                c.age_s += dt;
                if c.age_s >= total {
                    expired.push(i);
                }
            }
        }
        for (ability, caster, target) in fires {
            let recipe = self.abilities.recipe(ability);
            ability::apply_effects(
                &mut self.actors,
                recipe,
                Trigger::OnInterval,
                caster,
                target,
                &mut self.bus,
            );
        }
        for i in expired.into_iter().rev() {
            self.casts.swap_remove(i);
        }
    }
}
