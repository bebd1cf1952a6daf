//! Live (mesh, body) pairs

use crate::error::Result;
use crate::host::SceneHost;
use crate::mesh::VisualMesh;
use clatter_physics::{PhysicsWorld, RigidBodyHandle};

/// A mesh and the body that drives it
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub mesh: VisualMesh,
    pub body: RigidBodyHandle,
}

impl RegistryEntry {
    /// Copy the body's pose onto the mesh
    pub fn sync(&mut self, world: &PhysicsWorld) -> Result<()> {
        let pose = world.body_pose(self.body)?;
        self.mesh.set_pose(pose);
        Ok(())
    }
}

/// Every spawned object, in spawn order
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    entries: Vec<RegistryEntry>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair; spawn order is kept
    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }

    /// Iterate pairs in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Iterate pairs mutably in spawn order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegistryEntry> {
        self.entries.iter_mut()
    }

    /// Number of registered pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Body handles in spawn order
    pub fn bodies(&self) -> Vec<RigidBodyHandle> {
        self.entries.iter().map(|e| e.body).collect()
    }

    /// Copy every body pose onto its mesh. Returns the number of entries synced.
    pub fn sync_from(&mut self, world: &PhysicsWorld) -> Result<usize> {
        for entry in &mut self.entries {
            entry.sync(world)?;
        }
        Ok(self.entries.len())
    }

    /// Remove every entry from the world and the host.
    ///
    /// The physics removal is checked up front; if it fails nothing changes.
    /// Returns the number of entries removed.
    pub fn clear_all(&mut self, world: &mut PhysicsWorld, host: &mut dyn SceneHost) -> Result<usize> {
        world.remove_bodies(&self.bodies())?;

        for entry in &self.entries {
            if !host.remove_mesh(entry.mesh.id) {
                log::warn!("Mesh {:?} was not in the scene", entry.mesh.id);
            }
        }

        let removed = self.entries.len();
        self.entries.clear();
        if removed > 0 {
            log::info!("Cleared {} objects", removed);
        }
        Ok(removed)
    }
}
