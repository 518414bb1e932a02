//! Scripted session: two deckhands, a cannon, a stun, and a helm grab.
//! Prints every announcement the core publishes while it runs.

use glam::Vec3;

use events_core::EntityRef;
use game_core::{GameState, Helm};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut s = GameState::new()?;
    s.begin_level("dockside");

    let ada = s.spawn_player(Vec3::new(0.0, 0.0, -2.0));
    let brig = s.spawn_player(Vec3::new(1.5, 0.0, -2.0));
    s.attach_shooter(ada, "deck_cannon")?;
    s.add_helm(Helm::new(
        Vec3::ZERO,
        Vec3::Z,
        Vec3::new(0.0, 0.0, -0.5),
        EntityRef(1000),
    ));

    let stun = s
        .abilities
        .id("stun")
        .ok_or_else(|| anyhow::anyhow!("stun not registered"))?;

    let dt = 0.1_f32;
    for step in 0..100 {
        match step {
            5 => s.enqueue_fire(ada),
            20 => s.enqueue_cast(stun, ada, brig),
            40 => s.enqueue_interact(brig),
            70 => s.enqueue_interact(brig),
            _ => {}
        }
        s.step_authoritative(dt);
        for e in s.bus.drain() {
            println!(
                "[{:5.1}s] {:?} target={:?} source={:?}",
                s.now(),
                e.event,
                e.target,
                e.source
            );
        }
    }

    for a in s.actors.iter() {
        println!(
            "final: actor {:?} hp {:.1}/{:.1} mana {:.1}/{:.1}",
            a.id, a.health.current, a.health.max, a.mana.current, a.mana.max
        );
    }
    Ok(())
}
