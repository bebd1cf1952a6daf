//! Physics configuration

use crate::error::{PhysicsError, Result};
use crate::material::ContactMaterial;
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.82 in Y)
    pub gravity: [f32; 3],

    /// Fixed timestep used by the frame loop
    pub fixed_timestep: f32,

    /// Maximum number of substeps per frame
    pub max_substeps: u32,

    /// Allow inactive bodies to fall asleep
    pub allow_sleep: bool,

    /// Linear speed below which a body may sleep
    pub sleep_linear_threshold: f32,

    /// Angular speed below which a body may sleep
    pub sleep_angular_threshold: f32,

    /// Seconds a body must stay below the thresholds before sleeping
    pub sleep_time_limit: f32,

    /// Solver iterations per substep
    pub solver_iterations: usize,

    /// Name of the material assigned to spawned bodies
    pub default_material: String,

    /// Coefficients used when no specific material pair matches
    pub default_contact: ContactMaterial,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.82, 0.0],
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,
            allow_sleep: true,
            sleep_linear_threshold: 0.1,
            sleep_angular_threshold: 0.1,
            sleep_time_limit: 1.0,
            solver_iterations: 4,
            default_material: "concrete".to_string(),
            default_contact: ContactMaterial::new(0.1, 0.7),
        }
    }
}

impl PhysicsConfig {
    /// Create a configuration for high-precision simulation
    pub fn high_precision() -> Self {
        Self {
            solver_iterations: 8,
            max_substeps: 8,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = [x, y, z];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.fixed_timestep = timestep;
        self
    }

    /// Enable or disable sleeping
    pub fn with_sleep(mut self, allow_sleep: bool) -> Self {
        self.allow_sleep = allow_sleep;
        self
    }

    /// Check the values a world cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(self.fixed_timestep));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".to_string(),
            ));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        self.default_contact.validate()
    }
}
