//! Drop Sequencer.
//!
//! A completed press/release hands the held fruit to the simulation and locks
//! input for the configured cooldown. The next fruit is spawned from the frame
//! loop once the cooldown timer finishes.

use std::time::Duration;

use bevy::prelude::*;
use fm_core::{FruitDropped, GameConfigRes, GameSession, Held};
use fm_physics::released_body;

use crate::spawning::FruitSpawner;

/// Sent by the input bridge when a gesture completes and a drop should follow.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DropRequested;

fn cooldown(cfg: Option<&GameConfigRes>) -> Duration {
    let secs = cfg.map(|c| c.0.drop.cooldown_secs).unwrap_or(1.0);
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::ZERO)
}

pub(crate) fn drop_held_fruit(
    mut requests: EventReader<DropRequested>,
    time: Res<Time>,
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    cfg: Option<Res<GameConfigRes>>,
    mut dropped: EventWriter<FruitDropped>,
) {
    if requests.read().last().is_none() {
        return;
    }
    let cfg = cfg.as_deref();
    let Some(held) = session.drop_held(cooldown(cfg), time.elapsed()) else {
        return;
    };
    let restitution = cfg.map(|c| c.0.bounce.restitution).unwrap_or(0.2);
    if let Ok(mut entity) = commands.get_entity(held.entity) {
        entity.remove::<Held>().insert(released_body(restitution));
    }
    dropped.write(FruitDropped {
        entity: held.entity,
        rank: held.rank,
    });
    info!(target: "spawn", "dropped rank {} (drop #{})", held.rank, session.stats().drops);
}

/// Once the post-drop cooldown has fully elapsed, spawn the next fruit and unlock.
pub(crate) fn advance_cooldown(
    time: Res<Time>,
    mut session: ResMut<GameSession>,
    mut spawner: FruitSpawner,
) {
    if session.cooldown_finished(time.elapsed()) {
        spawner.spawn_next(&mut session);
        session.unlock();
    }
}

#[cfg(test)]
mod tests {
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier2d::prelude::{Restitution, RigidBody};
    use fm_core::{FruitSpawned, RngSeed};

    use super::*;
    use crate::test_support::*;
    use crate::PointerGesture;

    #[test]
    fn negative_cooldown_is_zero() {
        let mut cfg = fm_config::GameConfig::default();
        cfg.drop.cooldown_secs = -3.0;
        assert_eq!(cooldown(Some(&GameConfigRes(cfg))), Duration::ZERO);
        assert_eq!(cooldown(None), Duration::from_secs(1));
    }

    #[test]
    fn dropped_fruit_becomes_dynamic_with_bounce() {
        let mut app = app(11);
        let e = held_entity(&mut app).expect("held");
        app.world_mut().send_event(PointerGesture::Pressed { x: 120.0 });
        app.world_mut().send_event(PointerGesture::Released);
        app.update();
        assert!(app.world().get::<Held>(e).is_none());
        assert_eq!(app.world().get::<RigidBody>(e), Some(&RigidBody::Dynamic));
        let restitution = app.world().get::<Restitution>(e).expect("restitution");
        assert!((restitution.coefficient - 0.2).abs() < 1e-6);
        assert_eq!(session(&app).stats().drops, 1);
    }

    #[test]
    fn next_fruit_waits_for_full_cooldown() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(RngSeed(2));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_plugins((
            fm_core::CorePlugin,
            fm_physics::PhysicsPlugin,
            crate::GameplayPlugin,
        ));
        app.update();
        app.update();

        app.world_mut().send_event(PointerGesture::Pressed { x: 240.0 });
        app.world_mut().send_event(PointerGesture::Released);
        app.update();
        assert!(session(&app).is_locked());
        let dropped_at = app.world().resource::<Time>().elapsed();

        let mut frames = 0;
        while session(&app).is_locked() {
            app.update();
            frames += 1;
            assert!(frames < 50, "cooldown never finished");
        }
        let unlocked_at = app.world().resource::<Time>().elapsed();
        let locked_for = unlocked_at - dropped_at;
        assert!(
            locked_for >= Duration::from_secs(1),
            "unlocked after only {locked_for:?}"
        );
        assert!(locked_for < Duration::from_millis(1100), "lock outlived the cooldown: {locked_for:?}");
        assert_eq!(held_count(&mut app), 1);
        let spawned = app.world().resource::<Events<FruitSpawned>>();
        assert!(!spawned.is_empty());
    }
}
