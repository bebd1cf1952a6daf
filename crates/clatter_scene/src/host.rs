//! Render host the playground drives

use crate::camera::{CameraConfig, OrbitCamera};
use crate::mesh::{MeshId, PrimitiveKind, VisualMesh};
use crate::registry::ObjectRegistry;
use std::collections::BTreeMap;

/// The renderer side of the playground
pub trait SceneHost {
    /// Start drawing a mesh
    fn add_mesh(&mut self, mesh: &VisualMesh);

    /// Stop drawing a mesh; returns whether it was present
    fn remove_mesh(&mut self, id: MeshId) -> bool;

    /// Advance camera controls by `delta` seconds
    fn update_controls(&mut self, delta: f32);

    /// Draw a frame with the current poses of the registry's meshes
    fn render(&mut self, registry: &ObjectRegistry);
}

/// Host without a window: tracks the scene and logs what it would draw
pub struct HeadlessHost {
    meshes: BTreeMap<MeshId, PrimitiveKind>,
    camera: OrbitCamera,
    frames_rendered: u64,
    /// Log a summary every this many frames (0 disables)
    summary_interval: u64,
}

impl HeadlessHost {
    /// Create a host with the configured camera
    pub fn new(camera: &CameraConfig) -> Self {
        Self {
            meshes: BTreeMap::new(),
            camera: OrbitCamera::new(camera, 16.0 / 9.0),
            frames_rendered: 0,
            summary_interval: 0,
        }
    }

    /// Log a frame summary every `frames` frames
    pub fn with_summary_interval(mut self, frames: u64) -> Self {
        self.summary_interval = frames;
        self
    }

    /// Meshes currently in the scene
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the mesh is in the scene
    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(&id)
    }

    /// Number of meshes of one kind
    pub fn count_of(&self, kind: PrimitiveKind) -> usize {
        self.meshes.values().filter(|k| **k == kind).count()
    }

    /// Frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Orbit camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Mutable orbit camera
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}

impl SceneHost for HeadlessHost {
    fn add_mesh(&mut self, mesh: &VisualMesh) {
        self.meshes.insert(mesh.id, mesh.kind());
    }

    fn remove_mesh(&mut self, id: MeshId) -> bool {
        self.meshes.remove(&id).is_some()
    }

    fn update_controls(&mut self, delta: f32) {
        self.camera.update(delta);
    }

    fn render(&mut self, registry: &ObjectRegistry) {
        self.frames_rendered += 1;
        if self.summary_interval == 0 || self.frames_rendered % self.summary_interval != 0 {
            return;
        }

        let lowest = registry
            .iter()
            .map(|e| e.mesh.position.y)
            .fold(f32::INFINITY, f32::min);
        log::info!(
            "Frame {}: {} meshes, {} dynamic, lowest y {:.2}, camera at {:.1?}",
            self.frames_rendered,
            self.meshes.len(),
            registry.len(),
            if lowest.is_finite() { lowest } else { 0.0 },
            self.camera.eye()
        );
    }
}
