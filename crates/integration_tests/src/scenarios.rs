use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use fm_config::GameConfig;
use fm_core::{
    FieldGeometry, Fruit, FruitCatalog, FruitMerged, FruitRadius, FruitSpawned, GameOver,
    GameSession, Held, Rank, RestartRequested,
};
use fm_gameplay::PointerGesture;
use fm_physics::merged_body;

use crate::{advance, build_game_app, FRAME};

fn game(seed: u64) -> App {
    build_game_app(GameConfig::default(), seed)
}

fn session(app: &App) -> &GameSession {
    app.world().resource::<GameSession>()
}

/// Place a free dynamic fruit at a world position.
fn place(app: &mut App, rank: usize, at: Vec2) -> Entity {
    let radius = app
        .world()
        .resource::<FruitCatalog>()
        .get(Rank(rank))
        .map(|d| d.radius)
        .expect("rank in catalog");
    let transform = Transform::from_translation(at.extend(0.0));
    app.world_mut()
        .spawn((
            Fruit { rank: Rank(rank) },
            FruitRadius(radius),
            transform,
            GlobalTransform::from(transform),
            merged_body(radius),
        ))
        .id()
}

fn free_ranks(app: &mut App) -> Vec<usize> {
    let mut q = app
        .world_mut()
        .query_filtered::<&Fruit, Without<Held>>();
    let mut v: Vec<usize> = q.iter(app.world()).map(|f| f.rank.0).collect();
    v.sort_unstable();
    v
}

fn held_count(app: &mut App) -> usize {
    let mut q = app.world_mut().query_filtered::<(), With<Held>>();
    q.iter(app.world()).count()
}

fn drained<E: Event + Clone>(app: &mut App) -> Vec<E> {
    let mut events = app.world_mut().resource_mut::<Events<E>>();
    events.drain().collect()
}

/// Step `frames` frames, draining `E` after each so nothing expires between reads.
fn advance_collecting<E: Event + Clone>(app: &mut App, frames: u32) -> Vec<E> {
    let mut seen = Vec::new();
    for _ in 0..frames {
        app.update();
        seen.extend(drained::<E>(app));
    }
    seen
}

fn elapsed(app: &App) -> Duration {
    app.world().resource::<Time>().elapsed()
}

fn pipeline_active(app: &mut App) -> bool {
    let mut q = app.world_mut().query::<&RapierConfiguration>();
    q.iter(app.world()).all(|c| c.physics_pipeline_active)
}

fn drop_at(app: &mut App, field_x: f32) {
    app.world_mut().send_event(PointerGesture::Pressed { x: field_x });
    app.update();
    app.world_mut().send_event(PointerGesture::Released);
    app.update();
}

/// World y just above the ground's top face.
fn floor_y(app: &App) -> f32 {
    let field = app.world().resource::<FieldGeometry>();
    -field.height * 0.5 + field.wall_thickness
}

#[test]
fn rank0_on_rank0_becomes_single_rank1_at_contact() {
    let mut app = game(1);
    let floor = floor_y(&app);
    let r = app.world().resource::<FruitCatalog>().get(Rank(0)).map(|d| d.radius).unwrap_or(0.0);
    let lower = place(&mut app, 0, Vec2::new(0.0, floor + r + 1.0));
    let upper = place(&mut app, 0, Vec2::new(0.0, floor + 3.0 * r));
    drained::<FruitMerged>(&mut app);

    let mut merges = Vec::new();
    for _ in 0..60 {
        app.update();
        merges.extend(drained::<FruitMerged>(&mut app));
        if !merges.is_empty() {
            break;
        }
    }
    app.update();

    assert_eq!(merges.len(), 1, "exactly one merge: {merges:?}");
    let m = merges[0];
    assert_eq!((m.from, m.into), (Rank(0), Rank(1)));
    assert!(app.world().get_entity(lower).is_err());
    assert!(app.world().get_entity(upper).is_err());
    assert_eq!(free_ranks(&mut app), vec![1]);
    // Contact lies between the two centers (within the contact slop).
    assert!(m.at.x.abs() < 2.0, "contact x {}", m.at.x);
    assert!(m.at.y > floor && m.at.y < floor + 4.0 * r, "contact y {}", m.at.y);
    assert_eq!(session(&app).stats().merges, 1);
}

#[test]
fn two_max_rank_fruits_never_merge() {
    let mut app = game(2);
    let max = app.world().resource::<FruitCatalog>().max_rank();
    let r = app.world().resource::<FruitCatalog>().get(max).map(|d| d.radius).unwrap_or(0.0);
    let floor = floor_y(&app);
    let a = place(&mut app, max.0, Vec2::new(0.0, floor + r + 1.0));
    let b = place(&mut app, max.0, Vec2::new(0.0, floor + 3.0 * r));

    advance(&mut app, 90);

    assert!(app.world().get_entity(a).is_ok());
    assert!(app.world().get_entity(b).is_ok());
    assert_eq!(free_ranks(&mut app), vec![max.0, max.0]);
    assert!(drained::<FruitMerged>(&mut app).is_empty());
}

#[test]
fn dragging_past_right_wall_keeps_fruit_inside() {
    let mut app = game(3);
    let held = session(&app).held().expect("held fruit");
    let field = *app.world().resource::<FieldGeometry>();
    let radius = app.world().get::<FruitRadius>(held.entity).map(|r| r.0).unwrap_or(0.0);
    let start_y = app.world().get::<Transform>(held.entity).map(|t| t.translation.y);

    app.world_mut().send_event(PointerGesture::Pressed { x: field.width * 0.5 });
    app.update();
    app.world_mut().send_event(PointerGesture::Moved { x: field.width * 3.0 });
    advance(&mut app, 10);

    let tf = app.world().get::<Transform>(held.entity).expect("transform");
    let right_edge = field.world_x_to_field(tf.translation.x) + radius;
    assert!(
        (right_edge - (field.width - field.wall_thickness)).abs() < 1e-3,
        "right edge {right_edge}"
    );
    let dy = start_y.map(|y| (tf.translation.y - y).abs());
    assert!(dy.is_some_and(|d| d < 1e-3), "held fruit does not fall: {dy:?}");
    assert!(session(&app).held().is_some(), "still held while dragging");
}

#[test]
fn sensor_contact_during_cooldown_is_ignored() {
    let mut app = game(4);
    drop_at(&mut app, 100.0);
    assert!(session(&app).is_locked());

    let field = *app.world().resource::<FieldGeometry>();
    let sensor = field.to_world(Vec2::new(field.width * 0.8, field.sensor_y()));
    place(&mut app, 0, sensor);
    let over = advance_collecting::<GameOver>(&mut app, 10);

    assert!(session(&app).is_locked(), "still inside the cooldown");
    assert!(!session(&app).is_game_over());
    assert!(over.is_empty());
}

#[test]
fn sensor_contact_while_unlocked_ends_the_game() {
    let mut app = game(5);
    let field = *app.world().resource::<FieldGeometry>();
    let sensor = field.to_world(Vec2::new(field.width * 0.8, field.sensor_y()));
    place(&mut app, 0, sensor);
    let over = advance_collecting::<GameOver>(&mut app, 5);

    assert!(session(&app).is_game_over());
    assert!(!pipeline_active(&mut app), "physics halts on game over");
    assert_eq!(over.len(), 1, "game over is reported exactly once");
    assert_eq!(over[0].stats, session(&app).stats());

    // Terminal: further gestures are ignored.
    let held = session(&app).held();
    drop_at(&mut app, 100.0);
    assert_eq!(session(&app).held(), held);
    assert_eq!(session(&app).stats().drops, 0);
}

#[test]
fn drop_cycle_keeps_one_held_body_outside_cooldown() {
    let mut app = game(6);
    assert_eq!(held_count(&mut app), 1);
    drop_at(&mut app, 150.0);
    assert_eq!(held_count(&mut app), 0);
    let dropped_at = elapsed(&app);

    let mut frames = 0;
    while session(&app).is_locked() {
        assert_eq!(held_count(&mut app), 0, "no held body during cooldown");
        app.update();
        frames += 1;
        assert!(frames < 200, "cooldown never ended");
    }
    let locked_for = elapsed(&app) - dropped_at;
    assert!(locked_for >= Duration::from_secs(1), "lock lasted only {locked_for:?}");
    assert!(locked_for < Duration::from_secs(1) + FRAME, "lock outlived the cooldown: {locked_for:?}");
    assert_eq!(held_count(&mut app), 1);

    // The dropped fruit fell under gravity.
    let field = *app.world().resource::<FieldGeometry>();
    let spawn_y = field.to_world(field.spawn_point()).y;
    let mut q = app.world_mut().query_filtered::<&Transform, (With<Fruit>, Without<Held>)>();
    let dropped = q.single(app.world()).expect("one dropped fruit");
    assert!(dropped.translation.y < spawn_y - 50.0);
}

#[test]
fn restart_restores_a_playable_session() {
    let mut app = game(7);
    drop_at(&mut app, 200.0);
    let field = *app.world().resource::<FieldGeometry>();
    place(&mut app, 2, field.to_world(Vec2::new(field.width * 0.3, field.height * 0.6)));
    advance(&mut app, 70);
    let sensor = field.to_world(Vec2::new(field.width * 0.8, field.sensor_y()));
    place(&mut app, 0, sensor);
    advance(&mut app, 5);
    assert!(session(&app).is_game_over());

    app.world_mut().send_event(RestartRequested);
    advance(&mut app, 2);

    assert!(!session(&app).is_game_over());
    assert!(session(&app).accepts_input());
    assert!(pipeline_active(&mut app));
    assert_eq!(free_ranks(&mut app), Vec::<usize>::new(), "old fruits are gone");
    assert_eq!(held_count(&mut app), 1);
    assert!(session(&app).next_preview().is_some());
}

#[test]
fn fixed_seed_replays_the_same_fruits() {
    let sequence = |seed: u64| {
        let mut cfg = GameConfig::default();
        cfg.drop.cooldown_secs = 0.0;
        let mut app = build_game_app(cfg, seed);
        let mut ranks: Vec<Rank> = drained::<FruitSpawned>(&mut app).iter().map(|e| e.rank).collect();
        for i in 0..4 {
            drop_at(&mut app, 60.0 + 90.0 * i as f32);
            ranks.extend(drained::<FruitSpawned>(&mut app).iter().map(|e| e.rank));
        }
        ranks
    };
    let a = sequence(1234);
    assert_eq!(a.len(), 5);
    assert_eq!(a, sequence(1234));
    let pool = FruitCatalog::default().spawn_pool();
    assert!(a.iter().all(|r| r.0 < pool));
}
