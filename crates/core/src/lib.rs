// Core crate: shared ECS vocabulary for the merge game.
// Components, resources, events and system set labels used by every other crate,
// plus the pure game rules (fruit catalog, field geometry, session state, merge resolution).

use bevy::prelude::*;

pub mod catalog;
pub mod field;
pub mod merge;
pub mod session;

pub use catalog::{CatalogError, FruitCatalog, FruitDescriptor, Rank};
pub use field::{BoundaryKind, BoundarySpec, FieldGeometry};
pub use merge::{resolve_contacts, BatchResolution, BodyInfo, ContactReport, PlannedMerge};
pub use session::{GameSession, HeldFruit, SessionPhase, SessionStats};

/// A fruit body. The rank indexes into [`FruitCatalog`].
#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fruit {
    pub rank: Rank,
}

/// Collider radius, kept alongside the rank so visuals don't need the catalog.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct FruitRadius(pub f32);

/// Marks the fruit being positioned by the player (kinematic, no merges, no sensor contacts).
#[derive(Component, Debug, Default)]
pub struct Held;

/// Static boundary body created by world setup.
#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Boundary(pub BoundaryKind);

/// The non-colliding trigger whose contact ends the game.
#[derive(Component, Debug, Default)]
pub struct SensorLine;

/// Tag component for the visual child spawned under each fruit.
#[derive(Component, Debug)]
pub struct FruitVisual;

/// Deterministic RNG seed resource (set once at startup / tests for reproducible spawning).
#[derive(Resource, Debug, Copy, Clone, Default)]
pub struct RngSeed(pub u64);

// Wrapper Bevy resource for the pure-data GameConfig (keeps fm_config free of bevy dependency).
#[derive(Resource, Debug, Clone, Default)]
pub struct GameConfigRes(pub fm_config::GameConfig);

#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct FruitSpawned {
    pub entity: Entity,
    pub rank: Rank,
}

#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct FruitDropped {
    pub entity: Entity,
    pub rank: Rank,
}

#[derive(Event, Debug, Copy, Clone, PartialEq)]
pub struct FruitMerged {
    pub from: Rank,
    pub into: Rank,
    pub at: Vec2,
    pub spawned: Entity,
}

#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub stats: SessionStats,
}

/// Ask for a fresh session (quit confirmed or restart after game over).
#[derive(Event, Debug, Copy, Clone, Default)]
pub struct RestartRequested;

/// Ordering of the handlers that touch [`GameSession`] within `Update`.
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum GameplaySet {
    /// Pointer sampling and held-fruit steering.
    Input,
    /// Release handling.
    Drop,
    /// Collision batch: merges and game over.
    Resolve,
    /// Cooldown tick, next spawn, session reset.
    Spawn,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let cfg = app
            .world()
            .get_resource::<GameConfigRes>()
            .map(|c| c.0.clone())
            .unwrap_or_default();

        if !app.world().contains_resource::<FruitCatalog>() {
            let catalog = match FruitCatalog::from_config(&cfg) {
                Ok(c) => c,
                Err(e) => {
                    error!(target: "config", "invalid fruit table ({e}); using built-in fruits");
                    FruitCatalog::default()
                }
            };
            app.insert_resource(catalog);
        }
        if !app.world().contains_resource::<FieldGeometry>() {
            app.insert_resource(FieldGeometry::from_config(&cfg));
        }

        app.init_resource::<GameSession>()
            .init_resource::<RngSeed>()
            .add_event::<FruitSpawned>()
            .add_event::<FruitDropped>()
            .add_event::<FruitMerged>()
            .add_event::<GameOver>()
            .add_event::<RestartRequested>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Drop,
                    GameplaySet::Resolve,
                    GameplaySet::Spawn,
                )
                    .chain(),
            );
    }
}
