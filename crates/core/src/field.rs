//! Play field geometry.
//!
//! Field coordinates put the origin at the viewport's top-left corner with y
//! growing downward (the way pointer positions arrive). World coordinates are
//! Bevy's: origin at the viewport center, y up. All conversions live here.

use bevy::prelude::*;
use fm_config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    LeftWall,
    RightWall,
    Ground,
    SensorLine,
}

/// One static boundary rectangle in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySpec {
    pub kind: BoundaryKind,
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub sensor_fraction: f32,
    pub sensor_thickness: f32,
    pub spawn_fraction: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl FieldGeometry {
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self {
            width: cfg.window.width,
            height: cfg.window.height,
            wall_thickness: cfg.field.wall_thickness,
            sensor_fraction: cfg.field.sensor_line_fraction,
            sensor_thickness: cfg.field.sensor_line_thickness,
            spawn_fraction: cfg.field.spawn_height_fraction,
        }
    }

    pub fn inner_width(&self) -> f32 {
        self.width - self.wall_thickness * 2.0
    }

    /// Allowed center range for a circle of `radius` between the walls.
    pub fn x_bounds(&self, radius: f32) -> (f32, f32) {
        (
            self.wall_thickness + radius,
            self.width - self.wall_thickness - radius,
        )
    }

    /// Clamp a field-space x so a circle of `radius` stays inside the walls.
    /// A circle wider than the interior is centered.
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let (lo, hi) = self.x_bounds(radius);
        if lo > hi {
            return self.width * 0.5;
        }
        if x.is_nan() {
            return self.width * 0.5;
        }
        x.clamp(lo, hi)
    }

    pub fn to_world(&self, field: Vec2) -> Vec2 {
        Vec2::new(field.x - self.width * 0.5, self.height * 0.5 - field.y)
    }

    pub fn world_x_to_field(&self, world_x: f32) -> f32 {
        world_x + self.width * 0.5
    }

    pub fn field_x_to_world(&self, field_x: f32) -> f32 {
        field_x - self.width * 0.5
    }

    /// Field position where a new held fruit appears.
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * self.spawn_fraction)
    }

    pub fn sensor_y(&self) -> f32 {
        self.height * self.sensor_fraction
    }

    pub fn boundaries(&self) -> [BoundarySpec; 4] {
        let (w, h, t) = (self.width, self.height, self.wall_thickness);
        [
            BoundarySpec {
                kind: BoundaryKind::LeftWall,
                center: Vec2::new(t * 0.5, h * 0.5),
                size: Vec2::new(t, h),
            },
            BoundarySpec {
                kind: BoundaryKind::RightWall,
                center: Vec2::new(w - t * 0.5, h * 0.5),
                size: Vec2::new(t, h),
            },
            BoundarySpec {
                kind: BoundaryKind::Ground,
                center: Vec2::new(w * 0.5, h - t * 0.5),
                size: Vec2::new(w, t),
            },
            BoundarySpec {
                kind: BoundaryKind::SensorLine,
                center: Vec2::new(w * 0.5, self.sensor_y()),
                size: Vec2::new(self.inner_width(), self.sensor_thickness),
            },
        ]
    }
}
