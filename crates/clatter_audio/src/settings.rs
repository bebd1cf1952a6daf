//! Impact sound settings

use serde::{Deserialize, Serialize};

/// How collisions turn into impact sounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSettings {
    /// Clip played on every audible impact
    pub clip_path: String,
    /// Impacts at or below this closing speed are silent
    pub min_strength: f32,
    /// Minimum simulated seconds between two played sounds
    pub min_interval: f64,
    /// Closing speed that maps to full volume
    pub volume_scale: f32,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Skip opening an output device at all
    pub muted: bool,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        Self {
            clip_path: "sounds/hit.mp3".to_string(),
            min_strength: 1.5,
            min_interval: 0.001,
            volume_scale: 10.0,
            master_volume: 1.0,
            muted: false,
        }
    }
}

impl ImpactSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clip path
    pub fn with_clip(mut self, path: impl Into<String>) -> Self {
        self.clip_path = path.into();
        self
    }

    /// Set the audibility threshold
    pub fn with_min_strength(mut self, strength: f32) -> Self {
        self.min_strength = strength.max(0.0);
        self
    }

    /// Set the rate limit interval
    pub fn with_min_interval(mut self, seconds: f64) -> Self {
        self.min_interval = seconds.max(0.0);
        self
    }

    /// Set master volume
    pub fn with_master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Mute
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }
}
