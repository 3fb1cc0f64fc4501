// Gameplay crate: the spawn/steer/drop/merge loop.
// Systems are placed in the chained `GameplaySet`s from fm_core so that, within a frame,
// input is handled before drops, drops before collision resolution, and resolution before
// the cooldown tick and session resets.

use bevy::prelude::*;
use fm_core::GameplaySet;

pub mod drop;
pub mod input;
pub mod merge;
pub mod session;
pub mod spawning;

pub use drop::DropRequested;
pub use input::PointerGesture;
pub use spawning::{FruitRng, FruitSpawner};

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PointerGesture>()
            .add_event::<DropRequested>()
            .add_systems(PreStartup, spawning::init_fruit_rng)
            .add_systems(Startup, session::start_session)
            .add_systems(
                Update,
                (input::read_pointer, input::handle_gestures)
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            .add_systems(Update, drop::drop_held_fruit.in_set(GameplaySet::Drop))
            .add_systems(
                Update,
                merge::resolve_collisions.in_set(GameplaySet::Resolve),
            )
            .add_systems(
                Update,
                (drop::advance_cooldown, session::restart_session)
                    .chain()
                    .in_set(GameplaySet::Spawn),
            );
    }
}
