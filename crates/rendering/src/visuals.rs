//! World visuals for fruits and boundaries.
//!
//! Each fruit gets a child holding its sprite (`<visual>.png`, sized to the
//! diameter) layered over a tinted circle that shows while the image is
//! missing. Boundaries are flat rectangles in the boundary color.
//!
//! Test/headless mode spawns only the `FruitVisual` marker child so plugin
//! wiring can be checked without a renderer or asset server.

use bevy::prelude::*;
#[cfg(not(any(test, feature = "headless")))]
use bevy::sprite::{ColorMaterial, MeshMaterial2d};
#[cfg(not(any(test, feature = "headless")))]
use bevy::math::primitives::Circle;
use fm_core::{Boundary, FieldGeometry, Fruit, FruitVisual};
#[cfg(not(any(test, feature = "headless")))]
use fm_core::{FruitCatalog, FruitRadius};

use crate::palette::Palette;
#[cfg(not(any(test, feature = "headless")))]
use crate::palette::fruit_tint;

#[cfg(not(any(test, feature = "headless")))]
#[derive(Resource)]
struct CircleMeshHandle(Handle<Mesh>);

pub struct VisualsPlugin;

#[cfg(not(any(test, feature = "headless")))]
impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, prepare_circle_mesh)
            .add_systems(Update, (spawn_fruit_visuals, spawn_boundary_visuals));
    }
}

#[cfg(any(test, feature = "headless"))]
impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_fruit_markers, spawn_boundary_visuals));
    }
}

#[cfg(any(test, feature = "headless"))]
fn spawn_fruit_markers(mut commands: Commands, q_new: Query<Entity, Added<Fruit>>) {
    for e in &q_new {
        let child = commands.spawn((FruitVisual,)).id();
        commands.entity(e).add_child(child);
    }
}

#[cfg(not(any(test, feature = "headless")))]
fn prepare_circle_mesh(mut meshes: ResMut<Assets<Mesh>>, mut commands: Commands) {
    let mesh = meshes.add(Mesh::from(Circle::new(0.5)));
    commands.insert_resource(CircleMeshHandle(mesh));
}

#[cfg(not(any(test, feature = "headless")))]
fn spawn_fruit_visuals(
    mut commands: Commands,
    circle_mesh: Option<Res<CircleMeshHandle>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    asset_server: Res<AssetServer>,
    catalog: Res<FruitCatalog>,
    q_new: Query<(Entity, &Fruit, &FruitRadius), Added<Fruit>>,
) {
    let Some(circle_mesh) = circle_mesh else {
        return;
    };
    for (entity, fruit, radius) in &q_new {
        let Some(descriptor) = catalog.get(fruit.rank) else {
            continue;
        };
        let diameter = radius.0 * 2.0;
        let material = materials.add(ColorMaterial::from(fruit_tint(descriptor.color)));
        commands.entity(entity).insert(Visibility::Visible).with_children(|parent| {
            parent.spawn((
                Mesh2d::from(circle_mesh.0.clone()),
                MeshMaterial2d(material),
                Transform::from_xyz(0.0, 0.0, -0.01).with_scale(Vec3::splat(diameter)),
            ));
            parent.spawn((
                FruitVisual,
                Sprite {
                    image: asset_server.load(descriptor.image_path()),
                    custom_size: Some(Vec2::splat(diameter)),
                    ..default()
                },
            ));
        });
    }
}

fn spawn_boundary_visuals(
    mut commands: Commands,
    field: Res<FieldGeometry>,
    q_new: Query<(Entity, &Boundary), Added<Boundary>>,
) {
    for (entity, boundary) in &q_new {
        let Some(spec) = field.boundaries().into_iter().find(|b| b.kind == boundary.0) else {
            continue;
        };
        commands.entity(entity).insert(Sprite {
            color: Palette::BOUNDARY,
            custom_size: Some(spec.size),
            ..default()
        });
    }
}
