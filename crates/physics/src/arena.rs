//! Static arena: two walls, the ground and the sensor line.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use fm_core::{Boundary, BoundaryKind, FieldGeometry, SensorLine};

fn boundary_name(kind: BoundaryKind) -> &'static str {
    match kind {
        BoundaryKind::LeftWall => "LeftWall",
        BoundaryKind::RightWall => "RightWall",
        BoundaryKind::Ground => "Ground",
        BoundaryKind::SensorLine => "SensorLine",
    }
}

/// World setup. Runs once; boundaries survive session resets.
pub fn spawn_arena(mut commands: Commands, field: Res<FieldGeometry>) {
    for spec in field.boundaries() {
        let center = field.to_world(spec.center);
        let transform = Transform::from_translation(center.extend(0.0));
        let mut entity = commands.spawn((
            Boundary(spec.kind),
            Name::new(boundary_name(spec.kind)),
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(spec.size.x * 0.5, spec.size.y * 0.5),
        ));
        if spec.kind == BoundaryKind::SensorLine {
            entity.insert((SensorLine, Sensor, ActiveEvents::COLLISION_EVENTS));
        }
    }
    debug!(
        "arena spawned: {}x{} walls={} sensor_y={}",
        field.width,
        field.height,
        field.wall_thickness,
        field.sensor_y()
    );
}
