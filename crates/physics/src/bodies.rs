//! Rigid body bundles for the three fruit lifecycles.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// A fruit positioned by the player. Kinematic: unaffected by gravity and ignored
/// by the sensor line (kinematic/fixed pairs never report).
pub fn held_body(radius: f32) -> impl Bundle {
    (
        RigidBody::KinematicPositionBased,
        Collider::ball(radius),
        ActiveEvents::COLLISION_EVENTS,
    )
}

/// Components swapped onto a held fruit when it is dropped.
pub fn released_body(restitution: f32) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Restitution::coefficient(restitution),
        Velocity::zero(),
    )
}

/// Free fruit produced by a merge, with default material.
pub fn merged_body(radius: f32) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::ball(radius),
        ActiveEvents::COLLISION_EVENTS,
        Velocity::zero(),
    )
}
