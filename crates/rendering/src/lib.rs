// Rendering crate: camera, clear color, world visuals and HUD.
// Thin glue over Bevy's sprite/mesh/UI; no gameplay state is owned here.

use bevy::prelude::*;

mod palette;
pub use palette::{fruit_tint, Palette};

pub mod hud;
pub use hud::{GameOverOverlay, HudAction, HudPlugin, NextFruitImage, QuitDialog};

mod visuals;
pub use visuals::VisualsPlugin;

pub struct RenderingPlugin;

#[derive(Component)]
pub struct GameCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, GameCamera));
}

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((VisualsPlugin, HudPlugin))
            .add_systems(Startup, setup_camera)
            .insert_resource(ClearColor(Palette::BACKGROUND));
    }
}
