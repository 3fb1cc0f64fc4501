// Merge Resolver and Game-Over Detector.
// One handler per frame drains the collision-start batch from Rapier, plans merges with
// `fm_core::resolve_contacts`, applies them, and checks the sensor line.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use fm_core::{
    resolve_contacts, BodyInfo, Fruit, FruitCatalog, FruitMerged, FruitRadius, GameOver,
    GameSession, Held, SensorLine,
};
use fm_physics::{merged_body, started_contacts};

pub(crate) fn resolve_collisions(
    mut collisions: EventReader<CollisionEvent>,
    rapier: ReadRapierContext,
    mut commands: Commands,
    catalog: Res<FruitCatalog>,
    mut session: ResMut<GameSession>,
    fruits: Query<(&Fruit, &Transform, &FruitRadius), Without<Held>>,
    sensors: Query<(), With<SensorLine>>,
    mut merged: EventWriter<FruitMerged>,
    mut game_over: EventWriter<GameOver>,
) {
    let contacts = started_contacts(&mut collisions, &rapier);
    if contacts.is_empty() || session.is_game_over() {
        return;
    }

    let batch = resolve_contacts(
        &contacts,
        &catalog,
        |e| {
            fruits.get(e).ok().map(|(fruit, tf, radius)| BodyInfo {
                rank: fruit.rank,
                position: tf.translation.truncate(),
                radius: radius.0,
            })
        },
        |e| sensors.contains(e),
    );

    for m in &batch.merges {
        let Some(descriptor) = catalog.get(m.into) else {
            continue;
        };
        for e in m.consumed {
            commands.entity(e).despawn();
        }
        let transform = Transform::from_translation(m.at.extend(0.0));
        let spawned = commands
            .spawn((
                Fruit { rank: m.into },
                FruitRadius(descriptor.radius),
                Name::new(format!("Fruit[{}]", descriptor.visual)),
                transform,
                GlobalTransform::from(transform),
                merged_body(descriptor.radius),
            ))
            .id();
        session.record_merge(m.into);
        merged.write(FruitMerged {
            from: m.from,
            into: m.into,
            at: m.at,
            spawned,
        });
        debug!(target: "merge", "rank {} + {} -> {} at {:?}", m.from, m.from, m.into, m.at);
    }

    if batch.triggers_game_over(session.is_locked()) && session.enter_game_over() {
        let stats = session.stats();
        game_over.write(GameOver { stats });
        info!(
            target: "session",
            "game over: drops={} merges={} highest rank={}",
            stats.drops,
            stats.merges,
            stats.highest_rank
        );
    }
}
