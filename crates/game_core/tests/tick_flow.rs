use glam::Vec3;

use events_core::GameEvent;
use game_core::blackboard::keys;
use game_core::{CastOutcome, GameState};

#[test]
fn session_boot_and_spawn_announce_initial_state() {
    let mut s = GameState::new().expect("boot");
    s.begin_level("dockside");
    let p = s.spawn_player(Vec3::ZERO);
    s.attach_shooter(p, "deck_cannon").expect("cannon");

    let events = s.bus.drain();
    assert!(events.iter().any(|e| matches!(
        &e.event,
        GameEvent::LevelStarted { name } if name == "dockside"
    )));
    let me = p.entity_ref();
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::HealthChanged { .. }) && e.target == Some(me)));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::ManaChanged { .. }) && e.target == Some(me)));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::AmmoChanged { .. }) && e.target == Some(me)));
}

#[test]
fn queued_commands_run_inside_the_tick() {
    let mut s = GameState::new().expect("boot");
    let caster = s.spawn_player(Vec3::ZERO);
    let target = s.spawn_player(Vec3::new(2.0, 0.0, 0.0));
    s.attach_shooter(caster, "deck_cannon").expect("cannon");
    let stun = s.abilities.id("stun").expect("stun");

    s.enqueue_cast(stun, caster, target);
    s.enqueue_fire(caster);
    s.step_authoritative(0.016);

    assert_eq!(
        s.actors.get(target).expect("target").health.current,
        game_core::DEFAULT_MAX_HEALTH - 4.0
    );
    assert_eq!(s.projectiles.len(), 1);
}

#[test]
fn melee_pulse_sets_and_clears_the_blackboard_flag() {
    let mut s = GameState::new().expect("boot");
    let caster = s.spawn_player(Vec3::ZERO);
    let target = s.spawn_player(Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(s.press_melee(caster, target), CastOutcome::Applied);
    assert!(s.blackboard.flag(caster, keys::MELEE_PRESSED));
    s.step_authoritative(0.1);
    assert!(s.blackboard.flag(caster, keys::MELEE_PRESSED));
    s.step_authoritative(0.2);
    assert!(!s.blackboard.flag(caster, keys::MELEE_PRESSED));
}

#[test]
fn core_owned_blackboard_writes_are_visible() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);

    s.set_shielding(p, true);
    assert!(s.blackboard.flag(p, keys::SHIELDING));
    s.set_velocity(p, Vec3::new(0.0, 0.0, 2.5));
    match s.blackboard.get(p, keys::VELOCITY) {
        Some(game_core::blackboard::Value::Vector(v)) => assert_eq!(v[2], 2.5),
        other => panic!("unexpected velocity entry: {other:?}"),
    }
    s.set_shielding(p, false);
    assert!(!s.blackboard.flag(p, keys::SHIELDING));
}

#[test]
fn despawn_forgets_blackboard_and_pending_clears() {
    let mut s = GameState::new().expect("boot");
    let caster = s.spawn_player(Vec3::ZERO);
    let target = s.spawn_player(Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(s.press_melee(caster, target), CastOutcome::Applied);
    s.despawn(caster);
    assert!(s.blackboard.get(caster, keys::MELEE_PRESSED).is_none());
    // The pending clear is gone too; stepping must not reintroduce a value.
    s.step_authoritative(0.3);
    assert!(s.blackboard.get(caster, keys::MELEE_PRESSED).is_none());
}
