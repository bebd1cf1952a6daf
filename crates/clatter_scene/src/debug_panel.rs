//! Debug controls: random spawns and reset

use crate::config::SpawnRanges;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// A button on the debug panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    SpawnSphere,
    SpawnBox,
    Reset,
}

impl fmt::Display for DebugAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnSphere => write!(f, "sphere"),
            Self::SpawnBox => write!(f, "box"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

impl FromStr for DebugAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sphere" | "s" => Ok(Self::SpawnSphere),
            "box" | "b" => Ok(Self::SpawnBox),
            "reset" | "r" | "clear" => Ok(Self::Reset),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

/// What the playground should do for an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    Sphere { radius: f32, position: Vec3 },
    Box { size: Vec3, position: Vec3 },
    Reset,
}

/// Turns panel actions into concrete, randomised requests
pub struct DebugPanel {
    rng: StdRng,
    ranges: SpawnRanges,
}

impl DebugPanel {
    /// Create a panel; the same seed always yields the same spawns
    pub fn new(ranges: SpawnRanges, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, ranges }
    }

    /// Ranges used for random spawns
    pub fn ranges(&self) -> &SpawnRanges {
        &self.ranges
    }

    /// Turn an action into a concrete request
    pub fn request(&mut self, action: DebugAction) -> SpawnRequest {
        match action {
            DebugAction::SpawnSphere => SpawnRequest::Sphere {
                radius: self.nonzero_unit() * self.ranges.sphere_max_radius,
                position: self.drop_position(),
            },
            DebugAction::SpawnBox => SpawnRequest::Box {
                size: Vec3::new(
                    self.nonzero_unit() * self.ranges.box_max_size,
                    self.nonzero_unit() * self.ranges.box_max_size,
                    self.nonzero_unit() * self.ranges.box_max_size,
                ),
                position: self.drop_position(),
            },
            DebugAction::Reset => SpawnRequest::Reset,
        }
    }

    /// Uniform in (0, 1); zero would make a degenerate shape
    fn nonzero_unit(&mut self) -> f32 {
        loop {
            let value: f32 = self.rng.random();
            if value > 0.0 {
                return value;
            }
        }
    }

    fn drop_position(&mut self) -> Vec3 {
        let x = (self.rng.random::<f32>() - 0.5) * self.ranges.spread;
        let z = (self.rng.random::<f32>() - 0.5) * self.ranges.spread;
        Vec3::new(x, self.ranges.drop_height, z)
    }
}
