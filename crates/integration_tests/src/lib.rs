// integration_tests: black-box scenarios across the published plugin APIs.
// Apps run the real Rapier pipeline on a manual clock; fruits are placed directly
// or dropped through `PointerGesture` events, never by touching session internals.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use fm_config::GameConfig;
use fm_core::{CorePlugin, GameConfigRes, RngSeed};
use fm_gameplay::GameplayPlugin;
use fm_physics::PhysicsPlugin;
use fm_rendering::HudPlugin;

/// Simulated frame length used by every scenario.
pub const FRAME: Duration = Duration::from_millis(16);

pub fn build_minimal_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    // TransformPlugin -> GlobalTransform propagation for kinematic steering
    // InputPlugin -> ButtonInput/Touches used by pointer sampling
    app.add_plugins((
        bevy::transform::TransformPlugin,
        bevy::input::InputPlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app
}

/// Full game (minus world visuals) with the given config and seed, after startup.
pub fn build_game_app(cfg: GameConfig, seed: u64) -> App {
    let mut app = build_minimal_app();
    app.insert_resource(GameConfigRes(cfg));
    app.insert_resource(RngSeed(seed));
    app.add_plugins((CorePlugin, PhysicsPlugin, HudPlugin, GameplayPlugin));
    app.update();
    app
}

pub fn advance(app: &mut App, frames: u32) {
    for _ in 0..frames {
        app.update();
    }
}

#[cfg(test)]
mod scenarios;
