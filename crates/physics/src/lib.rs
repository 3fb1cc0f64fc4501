// Physics crate: Rapier integration for the merge game.
// Installs the Rapier plugin scaled from config, applies gravity, builds the static arena
// (walls, ground, sensor line) and pauses the pipeline while the session is over.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use fm_core::{GameConfigRes, GameSession};

pub mod arena;
pub mod bodies;
pub mod contacts;

pub use arena::spawn_arena;
pub use bodies::{held_body, merged_body, released_body};
pub use contacts::{contact_point, started_contacts};

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let ppm = app
            .world()
            .get_resource::<GameConfigRes>()
            .map(|c| c.0.physics.pixels_per_meter)
            .unwrap_or(100.0);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(ppm));

        app.add_systems(Startup, spawn_arena);
        app.add_systems(PreUpdate, apply_gravity);
        app.add_systems(Update, sync_pipeline_with_session);
    }
}

/// Configure gravity on every Rapier context as it appears.
fn apply_gravity(
    cfg: Option<Res<GameConfigRes>>,
    mut q_cfg: Query<&mut RapierConfiguration, Added<RapierConfiguration>>,
) {
    let gravity_y = cfg.map(|c| c.0.gravity.y).unwrap_or(-1000.0);
    for mut rapier in &mut q_cfg {
        rapier.gravity = Vect::new(0.0, gravity_y);
        debug!("rapier gravity set to {gravity_y}");
    }
}

/// The simulation freezes once the session is over and resumes after a reset.
fn sync_pipeline_with_session(
    session: Res<GameSession>,
    mut q_cfg: Query<&mut RapierConfiguration>,
) {
    if !session.is_changed() {
        return;
    }
    let active = !session.is_game_over();
    for mut rapier in &mut q_cfg {
        if rapier.physics_pipeline_active != active {
            rapier.physics_pipeline_active = active;
            info!(
                target: "session",
                "physics {}",
                if active { "resumed" } else { "paused" }
            );
        }
    }
}
