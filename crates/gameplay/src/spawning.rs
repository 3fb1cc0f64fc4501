//! Spawn Controller.
//!
//! Creates the held fruit at the top of the field and keeps the one-slot
//! preview filled. Rank draws come from [`FruitRng`], seeded from
//! [`RngSeed`] so a fixed seed replays the same fruit sequence.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use fm_core::{
    FieldGeometry, Fruit, FruitCatalog, FruitRadius, FruitSpawned, GameSession, Held, HeldFruit,
    Rank, RngSeed,
};
use fm_physics::held_body;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Resource, Debug, Clone)]
pub struct FruitRng(pub StdRng);

impl FruitRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

pub(crate) fn init_fruit_rng(mut commands: Commands, seed: Option<Res<RngSeed>>) {
    let seed = seed.map(|s| s.0).unwrap_or_default();
    debug!(target: "spawn", "fruit rng seeded with {seed}");
    commands.insert_resource(FruitRng::from_seed(seed));
}

/// Everything needed to put a new held fruit into the world.
#[derive(SystemParam)]
pub struct FruitSpawner<'w, 's> {
    pub commands: Commands<'w, 's>,
    catalog: Res<'w, FruitCatalog>,
    field: Res<'w, FieldGeometry>,
    rng: ResMut<'w, FruitRng>,
    spawned: EventWriter<'w, FruitSpawned>,
}

impl FruitSpawner<'_, '_> {
    /// Uniform draw from the spawn pool.
    pub fn draw(&mut self) -> Rank {
        self.catalog.random_spawn_rank(&mut self.rng.0)
    }

    /// Spawn the next held fruit (the previewed rank) and draw a new preview.
    /// Does nothing if a fruit is already held.
    pub fn spawn_next(&mut self, session: &mut GameSession) -> Option<Entity> {
        if session.held().is_some() {
            return None;
        }
        let catalog = &self.catalog;
        let rng = &mut self.rng.0;
        let rank = session.take_spawn_rank(|| catalog.random_spawn_rank(&mut *rng));
        let descriptor = self.catalog.get(rank)?;
        let radius = descriptor.radius;
        let at = self.field.to_world(self.field.spawn_point());
        let transform = Transform::from_translation(at.extend(0.0));

        let entity = self
            .commands
            .spawn((
                Fruit { rank },
                FruitRadius(radius),
                Held,
                Name::new(format!("Fruit[{}]", descriptor.visual)),
                transform,
                GlobalTransform::from(transform),
                held_body(radius),
            ))
            .id();
        session.hold(HeldFruit { entity, rank });
        self.spawned.write(FruitSpawned { entity, rank });
        debug!(
            target: "spawn",
            "held fruit rank={rank} r={radius} next={:?}",
            session.next_preview()
        );
        Some(entity)
    }
}
