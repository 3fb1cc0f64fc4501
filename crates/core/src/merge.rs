//! Collision batch resolution.
//!
//! The physics engine reports contacts that began during a step as a batch of
//! pairs. [`resolve_contacts`] turns one batch into a list of merges plus a
//! sensor flag, independent of how the engine orders or groups the pairs.
//! A body consumed by an earlier merge in the batch is never merged again.

use std::collections::HashSet;
use bevy::prelude::*;

use crate::catalog::{FruitCatalog, Rank};

/// A contact that began between two colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactReport {
    pub a: Entity,
    pub b: Entity,
    /// First contact point reported by the engine (world space), if any.
    pub point: Option<Vec2>,
}

/// What the resolver needs to know about a free (non-held) fruit body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyInfo {
    pub rank: Rank,
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedMerge {
    pub consumed: [Entity; 2],
    pub from: Rank,
    pub into: Rank,
    pub at: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResolution {
    pub merges: Vec<PlannedMerge>,
    /// A fruit touched the sensor line somewhere in the batch.
    pub sensor_contact: bool,
}

impl BatchResolution {
    /// Sensor contacts only end the game while input is unlocked.
    pub fn triggers_game_over(&self, action_locked: bool) -> bool {
        self.sensor_contact && !action_locked
    }
}

/// Point on the segment between the two centers, `a.radius` away from `a`.
pub fn contact_point_between(a: &BodyInfo, b: &BodyInfo) -> Vec2 {
    let delta = b.position - a.position;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return (a.position + b.position) * 0.5;
    }
    a.position + delta / dist * a.radius.min(dist)
}

pub fn resolve_contacts<B, S>(
    contacts: &[ContactReport],
    catalog: &FruitCatalog,
    body: B,
    is_sensor: S,
) -> BatchResolution
where
    B: Fn(Entity) -> Option<BodyInfo>,
    S: Fn(Entity) -> bool,
{
    let mut out = BatchResolution::default();
    let mut consumed: HashSet<Entity> = HashSet::new();

    for c in contacts {
        let (sensor_a, sensor_b) = (is_sensor(c.a), is_sensor(c.b));
        if sensor_a || sensor_b {
            let other = if sensor_a { c.b } else { c.a };
            if body(other).is_some() {
                out.sensor_contact = true;
            }
            continue;
        }
        if c.a == c.b || consumed.contains(&c.a) || consumed.contains(&c.b) {
            continue;
        }
        let (Some(ia), Some(ib)) = (body(c.a), body(c.b)) else {
            continue;
        };
        if ia.rank != ib.rank {
            continue;
        }
        let Some(into) = catalog.merge_result(ia.rank) else {
            continue;
        };
        let at = c.point.unwrap_or_else(|| contact_point_between(&ia, &ib));
        consumed.insert(c.a);
        consumed.insert(c.b);
        out.merges.push(PlannedMerge {
            consumed: [c.a, c.b],
            from: ia.rank,
            into,
            at,
        });
    }
    out
}
