// Pure-data configuration crate (no Bevy dependency).
// Provides: data structures, layered loading, validation producing warnings (non-fatal), and tests.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in logical pixels; also the play field width.
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 800.0,
            title: "Fruit Merge".into(),
        }
    }
}

/// Static boundary layout, expressed relative to the viewport.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub wall_thickness: f32,
    /// Distance of the game-over sensor from the top edge as a fraction of viewport height.
    pub sensor_line_fraction: f32,
    pub sensor_line_thickness: f32,
    /// Distance of the held fruit's center from the top edge as a fraction of viewport height.
    pub spawn_height_fraction: f32,
}
impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 12.0,
            sensor_line_fraction: 0.12,
            sensor_line_thickness: 2.0,
            spawn_height_fraction: 0.05,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -1000.0 }
    }
}

/// Restitution applied to dropped fruits. Merged fruits keep the engine default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BounceConfig {
    pub restitution: f32,
}
impl Default for BounceConfig {
    fn default() -> Self {
        Self { restitution: 0.2 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub pixels_per_meter: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 100.0,
        }
    }
}

/// One entry of the ordered fruit table. Position in the list is the rank.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FruitConfig {
    /// Visual identifier; resolved to `<name>.png` by the asset server.
    pub name: String,
    pub radius: f32,
    /// Fallback tint (linear 0..1 sRGB components) drawn under the sprite.
    pub color: [f32; 3],
}
impl Default for FruitConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            radius: 10.0,
            color: [1.0, 1.0, 1.0],
        }
    }
}

fn fruit(name: &str, diameter: f32, color: [f32; 3]) -> FruitConfig {
    FruitConfig {
        name: format!("fruits/{name}"),
        radius: diameter / 2.0,
        color,
    }
}

/// Classic eleven-tier table, smallest to largest.
pub fn default_fruits() -> Vec<FruitConfig> {
    vec![
        fruit("00_cherry", 33.0, [0.86, 0.08, 0.24]),
        fruit("01_strawberry", 48.0, [0.98, 0.36, 0.36]),
        fruit("02_grape", 61.0, [0.58, 0.33, 0.80]),
        fruit("03_gyool", 69.0, [1.00, 0.66, 0.13]),
        fruit("04_orange", 89.0, [1.00, 0.55, 0.00]),
        fruit("05_apple", 114.0, [0.91, 0.20, 0.18]),
        fruit("06_pear", 129.0, [0.95, 0.89, 0.42]),
        fruit("07_peach", 156.0, [1.00, 0.75, 0.70]),
        fruit("08_pineapple", 177.0, [0.98, 0.85, 0.20]),
        fruit("09_melon", 220.0, [0.60, 0.85, 0.45]),
        fruit("10_watermelon", 259.0, [0.20, 0.60, 0.25]),
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Number of lowest ranks eligible as drops / preview (ranks `0..pool_size`).
    pub pool_size: usize,
    /// Fixed RNG seed; `None` means the binary picks one at startup.
    pub seed: Option<u64>,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DropConfig {
    /// Settle window after a drop during which input is locked.
    pub cooldown_secs: f32,
}
impl Default for DropConfig {
    fn default() -> Self {
        Self { cooldown_secs: 1.0 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub field: FieldConfig,
    pub gravity: GravityConfig,
    pub bounce: BounceConfig,
    pub physics: PhysicsConfig,
    pub fruits: Vec<FruitConfig>,
    pub spawn: SpawnConfig,
    pub drop: DropConfig,
    pub rapier_debug: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            field: Default::default(),
            gravity: Default::default(),
            bounce: Default::default(),
            physics: Default::default(),
            fruits: default_fruits(),
            spawn: Default::default(),
            drop: Default::default(),
            rapier_debug: false,
        }
    }
}

impl GameConfig {
    /// Parse a RON document (used directly for the config embedded on wasm).
    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load multiple layers; later overrides earlier (deep merge on maps, lists replaced whole).
    /// Unreadable layers are skipped and reported; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(ev, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        match merged {
            Some(val) => match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (GameConfig::default(), used, errors)
                }
            },
            None => (GameConfig::default(), used, errors),
        }
    }

    /// Play field width left between the two walls.
    pub fn inner_width(&self) -> f32 {
        self.window.width - self.field.wall_thickness * 2.0
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.field.wall_thickness <= 0.0 {
            w.push("field.wall_thickness must be > 0".into());
        }
        if self.inner_width() <= 0.0 {
            w.push(format!(
                "field.wall_thickness {} leaves no interior in a {} wide window",
                self.field.wall_thickness, self.window.width
            ));
        }
        if !(0.0..1.0).contains(&self.field.sensor_line_fraction) {
            w.push(format!(
                "field.sensor_line_fraction {} outside 0..1",
                self.field.sensor_line_fraction
            ));
        }
        if self.field.sensor_line_thickness <= 0.0 {
            w.push("field.sensor_line_thickness must be > 0".into());
        }
        if self.field.spawn_height_fraction >= self.field.sensor_line_fraction {
            w.push(format!(
                "field.spawn_height_fraction {} is at or below the sensor line ({}); held fruit starts past it",
                self.field.spawn_height_fraction, self.field.sensor_line_fraction
            ));
        }
        if self.gravity.y.abs() < 1e-4 {
            w.push("gravity.y magnitude near zero; fruits will float".into());
        }
        if self.gravity.y > 0.0 {
            w.push(format!(
                "gravity.y is positive ({}); fruits fall upward",
                self.gravity.y
            ));
        }
        if !(0.0..=1.0).contains(&self.bounce.restitution) {
            w.push(format!(
                "bounce.restitution {} outside 0..1",
                self.bounce.restitution
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push("physics.pixels_per_meter must be > 0".into());
        }
        if self.fruits.is_empty() {
            w.push("fruits list is empty; nothing can spawn".into());
        }
        for (rank, f) in self.fruits.iter().enumerate() {
            if f.radius <= 0.0 {
                w.push(format!("fruits[{rank}] ({}) radius must be > 0", f.name));
            }
            if f.name.is_empty() {
                w.push(format!("fruits[{rank}] has an empty name"));
            }
            if f.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                w.push(format!("fruits[{rank}] color {:?} outside 0..1", f.color));
            }
        }
        for (rank, pair) in self.fruits.windows(2).enumerate() {
            if pair[1].radius <= pair[0].radius {
                w.push(format!(
                    "fruits[{}] radius {} not larger than fruits[{rank}] radius {}",
                    rank + 1,
                    pair[1].radius,
                    pair[0].radius
                ));
            }
        }
        if self.spawn.pool_size == 0 {
            w.push("spawn.pool_size is 0; nothing can spawn".into());
        }
        if self.spawn.pool_size > self.fruits.len() {
            w.push(format!(
                "spawn.pool_size {} exceeds fruits list length {}",
                self.spawn.pool_size,
                self.fruits.len()
            ));
        }
        let pool_end = self.spawn.pool_size.min(self.fruits.len());
        if let Some(largest) = self.fruits[..pool_end].last() {
            if largest.radius * 2.0 > self.inner_width() {
                w.push(format!(
                    "spawn pool fruit {} (radius {}) wider than the field interior",
                    largest.name, largest.radius
                ));
            }
        }
        if self.drop.cooldown_secs < 0.0 {
            w.push(format!(
                "drop.cooldown_secs {} negative -> treated as 0",
                self.drop.cooldown_secs
            ));
        } else if self.drop.cooldown_secs < 0.1 {
            w.push(format!(
                "drop.cooldown_secs {} very small; drops may stack at spawn",
                self.drop.cooldown_secs
            ));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_warning_free() {
        let cfg = GameConfig::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(cfg.fruits.len(), 11);
        assert_eq!(cfg.spawn.pool_size, 5);
        assert!((cfg.drop.cooldown_secs - 1.0).abs() < 1e-6);
    }

    #[test]
    fn parse_sample_config() {
        let sample = r#"(
            window: (width: 600.0, height: 900.0, title: "Test"),
            field: (wall_thickness: 20.0, sensor_line_fraction: 0.15),
            gravity: (y: -800.0),
            bounce: (restitution: 0.3),
            fruits: [
                (name: "a", radius: 10.0, color: (1.0, 0.0, 0.0)),
                (name: "b", radius: 20.0, color: (0.0, 1.0, 0.0)),
                (name: "c", radius: 30.0, color: (0.0, 0.0, 1.0)),
            ],
            spawn: (pool_size: 2, seed: Some(7)),
            drop: (cooldown_secs: 0.5),
        )"#;
        let cfg = GameConfig::from_ron_str(sample).expect("parse config");
        assert_eq!(cfg.window.width, 600.0);
        assert_eq!(cfg.field.wall_thickness, 20.0);
        // Unspecified field keys keep their defaults.
        assert_eq!(cfg.field.spawn_height_fraction, 0.05);
        assert_eq!(cfg.fruits.len(), 3);
        assert_eq!(cfg.fruits[1].name, "b");
        assert_eq!(cfg.spawn.seed, Some(7));
        assert_eq!(cfg.inner_width(), 560.0);
        assert!(cfg.validate().is_empty(), "expected no warnings");
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = GameConfig::default();
        bad.window.width = -100.0;
        bad.field.sensor_line_fraction = 1.5;
        bad.gravity.y = 0.0;
        bad.bounce.restitution = -0.2;
        bad.fruits = vec![
            FruitConfig {
                name: "big".into(),
                radius: 30.0,
                color: [1.0, 1.0, 1.0],
            },
            FruitConfig {
                name: "small".into(),
                radius: 20.0,
                color: [2.0, 0.0, 0.0],
            },
        ];
        bad.spawn.pool_size = 4;
        bad.drop.cooldown_secs = -1.0;
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("leaves no interior"));
        assert!(joined.contains("sensor_line_fraction"));
        assert!(joined.contains("gravity.y magnitude near zero"));
        assert!(joined.contains("bounce.restitution"));
        assert!(joined.contains("fruits[1] radius 20 not larger"));
        assert!(joined.contains("fruits[1] color"));
        assert!(joined.contains("spawn.pool_size 4 exceeds"));
        assert!(joined.contains("drop.cooldown_secs -1 negative"));
    }

    #[test]
    fn empty_fruit_list_warns_without_panicking() {
        let mut cfg = GameConfig::default();
        cfg.fruits.clear();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("fruits list is empty")));
        assert!(warnings.iter().any(|w| w.contains("exceeds fruits list length")));
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r"(
            window: (width: 500.0),
            gravity: (y: -700.0),
            drop: (cooldown_secs: 2.0),
        )";
        let override_one = r#"(
            window: (title: "Custom Title"),
            drop: (cooldown_secs: 0.75),
            fruits: [(name: "only", radius: 12.0)],
        )"#;
        let (cfg, used, errors) = GameConfig::load_layered([
            write_temp(base).path().to_path_buf(),
            write_temp(override_one).path().to_path_buf(),
        ]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 500.0);
        assert_eq!(cfg.window.title, "Custom Title");
        assert_eq!(cfg.window.height, WindowConfig::default().height);
        assert_eq!(cfg.gravity.y, -700.0);
        assert_eq!(cfg.drop.cooldown_secs, 0.75);
        // Lists are replaced, not merged element-wise.
        assert_eq!(cfg.fruits.len(), 1);
        assert_eq!(cfg.fruits[0].name, "only");
    }

    #[test]
    fn layered_skips_missing_layer() {
        let base = r"(spawn: (pool_size: 3))";
        let (cfg, used, errors) = GameConfig::load_layered([
            write_temp(base).path().to_path_buf(),
            std::path::PathBuf::from("missing/game.local.ron"),
        ]);
        assert_eq!(used.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("read error"));
        assert_eq!(cfg.spawn.pool_size, 3);
    }

    #[test]
    fn from_ron_str_reports_parse_errors() {
        let err = GameConfig::from_ron_str("(window: (width: \"wide\"))").unwrap_err();
        assert!(err.starts_with("parse RON"), "got {err}");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = include_str!("../../../assets/config/game.ron");
        let cfg = GameConfig::from_ron_str(shipped).expect("shipped config parses");
        assert_eq!(cfg, GameConfig::default());
        assert!(cfg.validate().is_empty());
    }

    // Helper: create a temp file with given contents; returns handle (kept for lifetime)
    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp");
        f.write_all(contents.as_bytes()).unwrap();
        f
    }
}
