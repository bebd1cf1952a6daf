//! Builds paired meshes and bodies

use crate::error::Result;
use crate::host::SceneHost;
use crate::mesh::{Geometry, MeshId, SurfaceMaterial, VisualMesh};
use crate::registry::{ObjectRegistry, RegistryEntry};
use clatter_physics::{ColliderShape, MaterialId, PhysicsWorld, RigidBodyDesc, RigidBodyHandle};
use glam::{Quat, Vec3};
use std::sync::Arc;

/// Mass of every spawned object in kg
const SPAWN_MASS: f32 = 1.0;

/// Creates spheres and boxes with shared geometry and material
pub struct SpawnFactory {
    sphere_geometry: Arc<Geometry>,
    box_geometry: Arc<Geometry>,
    surface: Arc<SurfaceMaterial>,
    body_material: MaterialId,
    next_mesh: u64,
}

impl SpawnFactory {
    /// Create a factory whose bodies use the world's configured default material
    pub fn new(world: &mut PhysicsWorld, surface: SurfaceMaterial) -> Self {
        let name = world.config().default_material.clone();
        let body_material = world.contact_materials_mut().material(&name);
        Self {
            sphere_geometry: Arc::new(Geometry::unit_sphere()),
            box_geometry: Arc::new(Geometry::unit_box()),
            surface: Arc::new(surface),
            body_material,
            next_mesh: 1,
        }
    }

    fn allocate_mesh_id(&mut self) -> MeshId {
        let id = MeshId(self.next_mesh);
        self.next_mesh += 1;
        id
    }

    /// Material assigned to spawned bodies
    pub fn body_material(&self) -> MaterialId {
        self.body_material
    }

    /// Shared sphere geometry
    pub fn sphere_geometry(&self) -> &Arc<Geometry> {
        &self.sphere_geometry
    }

    /// Shared box geometry
    pub fn box_geometry(&self) -> &Arc<Geometry> {
        &self.box_geometry
    }

    /// Spawn a sphere of `radius` at `position`
    pub fn spawn_sphere(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut ObjectRegistry,
        host: &mut dyn SceneHost,
        radius: f32,
        position: Vec3,
    ) -> Result<RigidBodyHandle> {
        let shape = ColliderShape::sphere(radius);
        shape.validate()?;

        let geometry = self.sphere_geometry.clone();
        let handle = self.spawn(world, registry, host, shape, geometry, Vec3::splat(radius), position)?;
        log::debug!("Spawned sphere r={:.2} at {}", radius, position);
        Ok(handle)
    }

    /// Spawn a box of full `size` at `position`
    pub fn spawn_box(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut ObjectRegistry,
        host: &mut dyn SceneHost,
        size: Vec3,
        position: Vec3,
    ) -> Result<RigidBodyHandle> {
        let shape = ColliderShape::from_size(size.x, size.y, size.z);
        shape.validate()?;

        let geometry = self.box_geometry.clone();
        let handle = self.spawn(world, registry, host, shape, geometry, size, position)?;
        log::debug!("Spawned box {} at {}", size, position);
        Ok(handle)
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut ObjectRegistry,
        host: &mut dyn SceneHost,
        shape: ColliderShape,
        geometry: Arc<Geometry>,
        scale: Vec3,
        position: Vec3,
    ) -> Result<RigidBodyHandle> {
        let desc = RigidBodyDesc::dynamic(SPAWN_MASS, shape)
            .with_position(position)
            .with_rotation(Quat::IDENTITY)
            .with_material(self.body_material);
        let body = world.add_body(desc)?;
        world.subscribe_collisions(body)?;

        let mesh = VisualMesh::new(self.allocate_mesh_id(), geometry, self.surface.clone())
            .with_scale(scale)
            .with_position(position)
            .with_shadows(true, false);
        host.add_mesh(&mesh);
        registry.push(RegistryEntry { mesh, body });

        Ok(body)
    }

    /// Create the permanent floor: a static plane at y = 0 and a square
    /// visual of `size` that receives shadows. Not tracked by the registry.
    pub fn spawn_floor(
        &mut self,
        world: &mut PhysicsWorld,
        host: &mut dyn SceneHost,
        size: f32,
    ) -> Result<(RigidBodyHandle, VisualMesh)> {
        let body = world.add_body(
            RigidBodyDesc::fixed(ColliderShape::Plane).with_material(self.body_material),
        )?;

        let geometry = Arc::new(Geometry::Plane {
            width: size,
            height: size,
        });
        let mesh = VisualMesh::new(
            self.allocate_mesh_id(),
            geometry,
            Arc::new(SurfaceMaterial::floor()),
        )
        .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
        .with_shadows(false, true);
        host.add_mesh(&mesh);

        log::debug!("Floor created ({}x{})", size, size);
        Ok((body, mesh))
    }
}
