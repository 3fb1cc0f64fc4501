//! Session start and reset.

use bevy::prelude::*;
use fm_core::{Fruit, GameSession, RestartRequested};

use crate::spawning::FruitSpawner;

/// Fill the preview, then spawn the first held fruit from it.
pub(crate) fn start_session(mut session: ResMut<GameSession>, mut spawner: FruitSpawner) {
    let first = spawner.draw();
    session.seed_preview(first);
    spawner.spawn_next(&mut session);
    info!(target: "session", "session started");
}

/// Clear every fruit and begin a fresh session. Physics resumes through the
/// session change; boundaries are kept.
pub(crate) fn restart_session(
    mut requests: EventReader<RestartRequested>,
    mut session: ResMut<GameSession>,
    fruits: Query<Entity, With<Fruit>>,
    mut spawner: FruitSpawner,
) {
    if requests.read().last().is_none() {
        return;
    }
    let previous = session.stats();
    let mut cleared = 0usize;
    for e in &fruits {
        spawner.commands.entity(e).despawn();
        cleared += 1;
    }
    session.reset();
    let first = spawner.draw();
    session.seed_preview(first);
    spawner.spawn_next(&mut session);
    info!(
        target: "session",
        "session restarted: cleared {cleared} fruits (previous drops={} merges={})",
        previous.drops,
        previous.merges
    );
}
