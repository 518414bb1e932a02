use glam::Vec3;

use events_core::GameEvent;
use game_core::blackboard::keys;
use game_core::GameState;

fn ammo_of(s: &GameState, p: game_core::ActorId) -> u32 {
    s.actors
        .get(p)
        .expect("actor")
        .shooter
        .as_ref()
        .expect("shooter")
        .remaining_ammo
}

#[test]
fn refire_within_cooldown_consumes_exactly_one_shot() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);
    s.attach_shooter(p, "deck_cannon").expect("cannon");
    let full = ammo_of(&s, p);

    assert!(s.fire_shooter(p));
    assert!(!s.fire_shooter(p), "cooldown must block the second shot");
    assert_eq!(ammo_of(&s, p), full - 1, "ammo decremented exactly once");

    // Advance past the cooldown window (attack_speed 1.0 => 1 second).
    for _ in 0..11 {
        s.step_authoritative(0.1);
    }
    assert!(s.fire_shooter(p));
    assert_eq!(ammo_of(&s, p), full - 2);
}

#[test]
fn reload_refills_announces_and_keeps_cooldown() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);
    s.attach_shooter(p, "deck_cannon").expect("cannon");
    let full = ammo_of(&s, p);

    assert!(s.fire_shooter(p));
    s.bus.drain();
    assert!(s.reload_shooter(p));
    assert_eq!(ammo_of(&s, p), full);

    let events = s.bus.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::AmmoChanged { remaining, .. } if remaining == full)));
    assert!(events.iter().any(|e| e.event == GameEvent::Reloaded));

    // The cooldown window is independent of reloading.
    assert!(!s.fire_shooter(p), "reload must not reset the cooldown");
}

#[test]
fn running_dry_raises_the_reloading_flag() {
    let mut s = GameState::new().expect("boot");
    let p = s.spawn_player(Vec3::ZERO);
    s.attach_shooter(p, "deck_cannon").expect("cannon");
    let full = ammo_of(&s, p);

    for _ in 0..full {
        assert!(s.fire_shooter(p));
        // Step past the cooldown between shots.
        for _ in 0..11 {
            s.step_authoritative(0.1);
        }
    }
    assert_eq!(ammo_of(&s, p), 0);
    assert!(s.blackboard.flag(p, keys::RELOADING));
    assert!(!s.fire_shooter(p), "empty shooter cannot fire");

    assert!(s.reload_shooter(p));
    assert!(!s.blackboard.flag(p, keys::RELOADING));
}
