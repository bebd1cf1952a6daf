//! Clatter Scene - the playground
//!
//! Pairs every spawned rigid body with a mesh, steps the world once per
//! frame, copies body poses onto meshes and hands the frame to a render host.
//!
//! # Architecture
//!
//! ```text
//!  DebugPanel ──actions──▶ Playground::tick
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!        PhysicsWorld ──▶ ImpactSound     ObjectRegistry
//!          (step)         Controller      (body ──▶ mesh)
//!                                               │
//!                                               ▼
//!                                          SceneHost
//!                                    (controls, render)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use clatter_scene::prelude::*;
//!
//! let config = SceneConfig::default();
//! let host = HeadlessHost::new(&config.camera);
//! let mut playground = Playground::new(&config, host, Box::new(SilentClip))?;
//! playground.spawn_sphere(0.5, Vec3::new(0.0, 3.0, 0.0))?;
//!
//! let stats = playground.tick(1.0 / 60.0)?;
//! ```

pub mod camera;
pub mod config;
pub mod debug_panel;
pub mod error;
pub mod host;
pub mod mesh;
pub mod registry;
pub mod simulation;
pub mod spawn;

pub mod prelude {
    pub use crate::camera::{CameraConfig, OrbitCamera};
    pub use crate::config::{InitialObject, PlaygroundConfig, SceneConfig, SpawnRanges};
    pub use crate::debug_panel::{DebugAction, DebugPanel, SpawnRequest};
    pub use crate::error::{Result, SceneError};
    pub use crate::host::{HeadlessHost, SceneHost};
    pub use crate::mesh::{Geometry, MeshId, PrimitiveKind, SurfaceMaterial, VisualMesh};
    pub use crate::registry::{ObjectRegistry, RegistryEntry};
    pub use crate::simulation::{
        Clock, FrameScheduler, FrameStats, ManualClock, PacedScheduler, Playground, SystemClock,
    };
    pub use crate::spawn::SpawnFactory;
    pub use clatter_audio::{ImpactClip, ImpactSettings, SilentClip};
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;
