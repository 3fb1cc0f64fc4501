//! Collision batch extraction.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use fm_core::ContactReport;

/// First solver contact point between two colliders, in world space.
pub fn contact_point(ctx: &RapierContext, a: Entity, b: Entity) -> Option<Vec2> {
    let pair = ctx.contact_pair(a, b)?;
    let point = pair
        .manifolds()
        .find_map(|m| m.solver_contacts().next().map(|c| c.point()));
    point
}

/// Drain this frame's collision events into the contacts that began, in engine order.
pub fn started_contacts(
    events: &mut EventReader<CollisionEvent>,
    rapier: &ReadRapierContext,
) -> Vec<ContactReport> {
    let ctx = rapier.single().ok();
    events
        .read()
        .filter_map(|ev| match ev {
            CollisionEvent::Started(a, b, _) => Some(ContactReport {
                a: *a,
                b: *b,
                point: ctx.as_ref().and_then(|c| contact_point(c, *a, *b)),
            }),
            CollisionEvent::Stopped(..) => None,
        })
        .collect()
}
