/*!
Fruit merge binary.

* Config loading: layered RON on native (`--config` adds layers), embedded on wasm.
  An unreadable `--config` layer refuses to start; skipped default layers are logged.
* Validation warnings are logged; an invalid fruit table refuses to start.
* Seed precedence: `--seed`, then `spawn.seed` from config, then entropy.
* Rapier debug render gating (CLI, config or `debug` feature).
*/

use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierDebugRenderPlugin;
use clap::Parser;
use fm_config::GameConfig;
use fm_core::{CorePlugin, FruitCatalog, GameConfigRes, RngSeed};
use fm_gameplay::GameplayPlugin;
use fm_physics::PhysicsPlugin;
use fm_rendering::RenderingPlugin;

#[derive(Parser, Debug)]
#[command(name = "fruit_merge", version, about = "Drop fruits, merge pairs, stay below the line")]
struct Cli {
    /// Extra config layer merged over the defaults (repeatable, later wins)
    #[arg(long = "config", value_name = "PATH")]
    configs: Vec<PathBuf>,
    /// Fixed RNG seed for a reproducible fruit sequence
    #[arg(long)]
    seed: Option<u64>,
    /// Draw Rapier collider outlines
    #[arg(long)]
    rapier_debug: bool,
}

// ---------------- Config Loading ----------------

/// Loaded config plus what happened on the way, logged once `LogPlugin` is up.
#[derive(Debug, Default)]
struct ConfigLoad {
    cfg: GameConfig,
    used: Vec<String>,
    errors: Vec<String>,
}

impl ConfigLoad {
    fn log(&self) {
        for e in &self.errors {
            warn!(target: "config", "config layer skipped: {e}");
        }
        if self.used.is_empty() {
            info!(target: "config", "no config layers found; using defaults");
        } else {
            info!(target: "config", used = ?self.used, "config layers loaded");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config(_extra: &[PathBuf]) -> anyhow::Result<ConfigLoad> {
    const RAW: &str = include_str!("../../../assets/config/game.ron");
    Ok(match GameConfig::from_ron_str(RAW) {
        Ok(cfg) => ConfigLoad {
            cfg,
            used: vec!["embedded game.ron".into()],
            errors: Vec::new(),
        },
        Err(e) => ConfigLoad {
            errors: vec![format!("embedded config: {e}")],
            ..ConfigLoad::default()
        },
    })
}

/// Default layers are optional; every path passed with `--config` must load.
#[cfg(not(target_arch = "wasm32"))]
fn load_config(extra: &[PathBuf]) -> anyhow::Result<ConfigLoad> {
    let mut layers = vec![
        PathBuf::from("assets/config/game.ron"),
        PathBuf::from("assets/config/game.local.ron"),
    ];
    layers.extend(extra.iter().cloned());
    let (cfg, used, errors) = GameConfig::load_layered(&layers);
    for path in extra {
        let shown = path.as_os_str().to_string_lossy();
        if !used.iter().any(|u| *u == shown) {
            let reason = errors
                .iter()
                .find(|e| e.starts_with(&*path.display().to_string()))
                .cloned()
                .unwrap_or_else(|| "not loaded".to_string());
            anyhow::bail!("--config {}: {reason}", path.display());
        }
    }
    Ok(ConfigLoad { cfg, used, errors })
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    rand::random()
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

// ---------------- Main ----------------

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }

    let cli = Cli::parse();
    let loaded = load_config(&cli.configs)?;
    let mut cfg = loaded.cfg.clone();
    if cli.rapier_debug {
        cfg.rapier_debug = true;
    }

    let catalog = FruitCatalog::from_config(&cfg).context("invalid fruit table in config")?;
    let seed = cli.seed.or(cfg.spawn.seed).unwrap_or_else(entropy_seed);

    let mut app = App::new();
    app.insert_resource(GameConfigRes(cfg.clone()))
        .insert_resource(catalog)
        .insert_resource(RngSeed(seed))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }));

    // Logging is installed by DefaultPlugins; report config state now that it is up.
    loaded.log();
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }
    info!(
        target: "config",
        fruits = cfg.fruits.len(),
        pool = cfg.spawn.pool_size,
        seed,
        "starting {}x{}",
        cfg.window.width,
        cfg.window.height
    );

    app.add_plugins((CorePlugin, PhysicsPlugin, RenderingPlugin, GameplayPlugin));

    if cfg!(feature = "debug") || cfg.rapier_debug {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }

    app.run();
    Ok(())
}
