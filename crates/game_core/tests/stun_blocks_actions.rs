use glam::Vec3;

use game_core::{CastOutcome, GameState, LegalAction, StatusKind};

#[test]
fn stunned_actor_neither_fires_nor_melees() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);
    let dummy = s.spawn_player(Vec3::new(1.0, 0.0, 0.0));
    s.attach_shooter(p, "deck_cannon").expect("cannon");

    s.actors
        .get_mut(p)
        .expect("actor")
        .statuses
        .apply(StatusKind::Stun, 1.0);

    let ammo_before = s
        .actors
        .get(p)
        .expect("actor")
        .shooter
        .as_ref()
        .expect("shooter")
        .remaining_ammo;
    assert!(!s.fire_shooter(p), "stunned actor must not fire");
    let ammo_after = s
        .actors
        .get(p)
        .expect("actor")
        .shooter
        .as_ref()
        .expect("shooter")
        .remaining_ammo;
    assert_eq!(ammo_before, ammo_after, "rejected fire consumes nothing");
    assert!(s.projectiles.is_empty());

    assert_eq!(s.press_melee(p, dummy), CastOutcome::RejectedLegality);
    assert_eq!(
        s.actors.get(dummy).expect("dummy").health.current,
        game_core::DEFAULT_MAX_HEALTH
    );
}

#[test]
fn expiry_happens_before_queued_commands_in_the_same_tick() {
    let mut s = GameState::new().expect("boot");
    let caster = s.spawn_player(Vec3::ZERO);
    let target = s.spawn_player(Vec3::new(1.0, 0.0, 0.0));
    let melee = s.abilities.id("melee").expect("melee");

    s.actors
        .get_mut(caster)
        .expect("caster")
        .statuses
        .apply(StatusKind::Stun, 0.1);
    assert!(!s
        .actors
        .get(caster)
        .expect("caster")
        .statuses
        .has_legal_action(LegalAction::Act));

    // The stun expires inside this tick; the queued cast, resolved after
    // advancement, must observe the expiry and be accepted.
    s.enqueue_cast(melee, caster, target);
    s.step_authoritative(0.2);
    assert_eq!(
        s.actors.get(target).expect("target").health.current,
        game_core::DEFAULT_MAX_HEALTH - 2.0
    );
}

#[test]
fn distinct_conditions_block_only_their_categories() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);
    let a = s.actors.get_mut(p).expect("actor");
    a.statuses.apply(StatusKind::Silence, 1.0);
    assert!(a.statuses.has_legal_action(LegalAction::Move));
    assert!(a.statuses.has_legal_action(LegalAction::Act));
    assert!(!a.statuses.has_legal_action(LegalAction::Cast));
    a.statuses.apply(StatusKind::Root, 1.0);
    assert!(!a.statuses.has_legal_action(LegalAction::Move));
    assert!(a.statuses.has_legal_action(LegalAction::Act));
}
