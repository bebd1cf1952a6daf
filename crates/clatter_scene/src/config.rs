//! Playground configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `CLATTER_MAX_FRAMES`, `CLATTER_SOUND`,
//!    `CLATTER_SEED`, `CLATTER_MUTE`
//! 2. Config file named by `CLATTER_CONFIG`
//! 3. `clatter.toml`, then `config/clatter.toml`
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [physics]
//! gravity = [0.0, -9.82, 0.0]
//! max_substeps = 3
//!
//! [audio]
//! clip_path = "sounds/hit.mp3"
//! min_strength = 1.5
//!
//! [scene]
//! target_fps = 60
//! seed = 42
//!
//! [[scene.initial]]
//! kind = "sphere"
//! radius = 0.5
//! position = [0.0, 3.0, 0.0]
//!
//! [camera]
//! fov = 75.0
//! ```

use crate::camera::CameraConfig;
use crate::error::{Result, SceneError};
use crate::mesh::SurfaceMaterial;
use clatter_audio::ImpactSettings;
use clatter_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_FILES: [&str; 2] = ["clatter.toml", "config/clatter.toml"];

/// Random spawn placement and sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRanges {
    /// Random sphere radii fall in (0, sphere_max_radius)
    pub sphere_max_radius: f32,
    /// Random box edges fall in (0, box_max_size)
    pub box_max_size: f32,
    /// Horizontal spread around the origin on x and z
    pub spread: f32,
    /// Height at which random objects appear
    pub drop_height: f32,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            sphere_max_radius: 0.5,
            box_max_size: 1.0,
            spread: 5.0,
            drop_height: 10.0,
        }
    }
}

/// An object placed at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InitialObject {
    Sphere { radius: f32, position: [f32; 3] },
    Box { size: [f32; 3], position: [f32; 3] },
}

/// Scene and frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Frame pacing of the binary
    pub target_fps: u32,
    /// Stop after this many frames (0 = run until interrupted)
    pub max_frames: u64,
    /// Seed for the debug panel (random when absent)
    pub seed: Option<u64>,
    /// Edge length of the visual floor
    pub floor_size: f32,
    /// Log a frame summary every this many frames (0 disables)
    pub summary_interval: u64,
    pub spawn: SpawnRanges,
    pub surface: SurfaceMaterial,
    pub initial: Vec<InitialObject>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: 0,
            seed: None,
            floor_size: 10.0,
            summary_interval: 120,
            spawn: SpawnRanges::default(),
            surface: SurfaceMaterial::default(),
            initial: vec![
                InitialObject::Sphere {
                    radius: 0.5,
                    position: [0.0, 3.0, 0.0],
                },
                InitialObject::Box {
                    size: [1.0, 1.0, 1.0],
                    position: [1.0, 4.0, 1.0],
                },
            ],
        }
    }
}

/// Complete playground configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub physics: PhysicsConfig,
    pub audio: ImpactSettings,
    pub scene: PlaygroundConfig,
    pub camera: CameraConfig,
    /// Where this configuration was read from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl SceneConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CLATTER_CONFIG") {
            Ok(path) if !path.is_empty() => Self::load_from_file(&path)?,
            _ => Self::load_default_files()?,
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn load_default_files() -> Result<Self> {
        for path in CONFIG_FILES {
            if Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_string());
        log::info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SceneError::Config(e.to_string()))
    }

    /// Override values from environment-style lookups. Unparsable values are
    /// logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("CLATTER_MAX_FRAMES") {
            match value.parse() {
                Ok(frames) => self.scene.max_frames = frames,
                Err(_) => log::warn!("Ignoring CLATTER_MAX_FRAMES={}", value),
            }
        }

        if let Some(value) = lookup("CLATTER_SEED") {
            match value.parse() {
                Ok(seed) => self.scene.seed = Some(seed),
                Err(_) => log::warn!("Ignoring CLATTER_SEED={}", value),
            }
        }

        if let Some(path) = lookup("CLATTER_SOUND") {
            if !path.is_empty() {
                log::info!("Impact clip from env: {}", path);
                self.audio.clip_path = path;
            }
        }

        if lookup("CLATTER_MUTE").map(|v| v == "1" || v == "true").unwrap_or(false) {
            self.audio.muted = true;
        }
    }

    /// Check everything the playground cannot run with
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;

        if self.scene.target_fps == 0 {
            return Err(SceneError::Config("target_fps must be at least 1".to_string()));
        }

        let spawn = &self.scene.spawn;
        let positive = [
            ("sphere_max_radius", spawn.sphere_max_radius),
            ("box_max_size", spawn.box_max_size),
            ("floor_size", self.scene.floor_size),
            ("volume_scale", self.audio.volume_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::Config(format!("{} must be > 0, got {}", name, value)));
            }
        }

        let non_negative = [
            ("min_strength", f64::from(self.audio.min_strength)),
            ("min_interval", self.audio.min_interval),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SceneError::Config(format!("{} must be >= 0, got {}", name, value)));
            }
        }

        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            return Err(SceneError::Config(format!(
                "master_volume must be within [0, 1], got {}",
                self.audio.master_volume
            )));
        }
        Ok(())
    }
}
