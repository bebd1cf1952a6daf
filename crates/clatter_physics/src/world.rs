//! Physics world - main simulation container

use crate::body::{from_rotation, from_vector, to_vector, BodyPose, RigidBodyDesc, RigidBodyHandle, SleepState};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{ChannelEventCollector, CollisionEvent, CollisionHandler};
use crate::material::{material_to_user_data, ContactMaterialTable, MaterialHooks, MaterialId};
use glam::{Quat, Vec3};
use rapier3d::prelude as rapier;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Velocities captured before a substep, used to measure how hard new contacts hit
#[derive(Debug, Clone, Copy)]
struct VelocitySample {
    linvel: Vec3,
    angvel: Vec3,
    center: Vec3,
}

impl VelocitySample {
    fn at(&self, point: Vec3) -> Vec3 {
        self.linvel + self.angvel.cross(point - self.center)
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager (also tracks sleeping)
    islands: rapier::IslandManager,

    /// Sweep-and-prune broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Contact coefficients per material pair
    materials: ContactMaterialTable,

    /// Bodies whose collisions are delivered to the handler
    subscriptions: HashSet<RigidBodyHandle>,

    /// Contacts that started during the last `step`
    last_events: Vec<CollisionEvent>,

    /// Time not yet consumed by a fixed substep
    accumulated_time: f32,

    /// Total simulated time
    simulated_time: f64,
}

impl PhysicsWorld {
    /// Create a world whose contact table holds the configured default material
    /// and default contact coefficients
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        let mut materials = ContactMaterialTable::new();
        let default_material = materials.material(&config.default_material);
        materials.add_contact_material(default_material, default_material, config.default_contact)?;
        materials.set_default(config.default_contact)?;
        Ok(Self::build(config, materials))
    }

    /// Create a world with a caller-supplied contact table, used as-is
    pub fn with_materials(config: PhysicsConfig, materials: ContactMaterialTable) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, materials))
    }

    fn build(config: PhysicsConfig, materials: ContactMaterialTable) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.fixed_timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::debug!(
            "Physics world created: gravity {:?}, sleep {}",
            config.gravity,
            config.allow_sleep
        );

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            materials,
            subscriptions: HashSet::new(),
            last_events: Vec::new(),
            accumulated_time: 0.0,
            simulated_time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Set gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }

    /// Get gravity
    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Contact material table
    pub fn contact_materials(&self) -> &ContactMaterialTable {
        &self.materials
    }

    /// Mutable contact material table, for registering materials and pairs
    pub fn contact_materials_mut(&mut self) -> &mut ContactMaterialTable {
        &mut self.materials
    }

    /// Id of the configured default material
    pub fn default_material(&self) -> Option<MaterialId> {
        self.materials.material_id(&self.config.default_material)
    }

    // ==================== Rigid Bodies ====================

    /// Insert a body and its collider
    pub fn add_body(&mut self, desc: RigidBodyDesc) -> Result<RigidBodyHandle> {
        desc.shape.validate()?;
        if !(desc.mass.is_finite() && desc.mass >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "body mass must be >= 0, got {}",
                desc.mass
            )));
        }

        let can_sleep = self.config.allow_sleep && desc.can_sleep && !desc.is_static();
        let handle = self
            .bodies
            .insert(desc.to_rapier_builder().can_sleep(can_sleep));

        if can_sleep {
            if let Some(body) = self.bodies.get_mut(handle) {
                let activation = body.activation_mut();
                activation.normalized_linear_threshold = self.config.sleep_linear_threshold;
                activation.angular_threshold = self.config.sleep_angular_threshold;
                activation.time_until_sleep = self.config.sleep_time_limit;
            }
        }

        // Baseline coefficients; the material hooks override them per pair.
        let baseline = self
            .materials
            .resolve(desc.material, desc.material)
            .unwrap_or_default();
        let mut collider = rapier::ColliderBuilder::new(desc.shape.to_rapier())
            .friction(baseline.friction)
            .restitution(baseline.restitution)
            .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
            .active_hooks(rapier::ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .user_data(material_to_user_data(desc.material));
        if !desc.is_static() {
            collider = collider.mass(desc.mass);
        }
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        log::trace!("Added body {:?}: {:?} at {}", handle, desc.shape, desc.position);
        Ok(RigidBodyHandle(handle))
    }

    /// Remove several bodies at once, detaching their subscriptions first.
    ///
    /// Every handle is checked before anything is removed, so an error leaves
    /// the world untouched.
    pub fn remove_bodies(&mut self, handles: &[RigidBodyHandle]) -> Result<()> {
        let mut seen = HashSet::with_capacity(handles.len());
        for &handle in handles {
            if !self.bodies.contains(handle.0) {
                return Err(PhysicsError::BodyNotFound(handle));
            }
            if !seen.insert(handle) {
                return Err(PhysicsError::DuplicateBody(handle));
            }
        }

        for &handle in handles {
            self.subscriptions.remove(&handle);
            self.bodies.remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true, // Remove attached colliders
            );
        }

        log::debug!("Removed {} bodies", handles.len());
        Ok(())
    }

    /// Whether a body is still in the world
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Handles of every body, floor included
    pub fn body_handles(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.bodies.iter().map(|(h, _)| RigidBodyHandle(h))
    }

    fn body(&self, handle: RigidBodyHandle) -> Result<&rapier::RigidBody> {
        self.bodies
            .get(handle.0)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn dynamic_body_mut(&mut self, handle: RigidBodyHandle) -> Result<&mut rapier::RigidBody> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        if body.is_fixed() {
            return Err(PhysicsError::StaticBody(handle));
        }
        Ok(body)
    }

    /// Get rigid body position
    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.body(handle).map(|b| from_vector(b.translation()))
    }

    /// Get rigid body rotation
    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Result<Quat> {
        self.body(handle).map(|b| from_rotation(b.rotation()))
    }

    /// Position and rotation in one lookup
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Result<BodyPose> {
        self.body(handle).map(|b| BodyPose {
            position: from_vector(b.translation()),
            rotation: from_rotation(b.rotation()),
        })
    }

    /// Get rigid body linear velocity
    pub fn body_linear_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.body(handle).map(|b| from_vector(b.linvel()))
    }

    /// Get rigid body angular velocity
    pub fn body_angular_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.body(handle).map(|b| from_vector(b.angvel()))
    }

    /// Get the body mass (0 for static bodies)
    pub fn body_mass(&self, handle: RigidBodyHandle) -> Result<f32> {
        self.body(handle)
            .map(|b| if b.is_fixed() { 0.0 } else { b.mass() })
    }

    /// Whether the body is static
    pub fn is_static(&self, handle: RigidBodyHandle) -> Result<bool> {
        self.body(handle).map(|b| b.is_fixed())
    }

    /// Sleep state; static bodies always report awake since they are never simulated
    pub fn sleep_state(&self, handle: RigidBodyHandle) -> Result<SleepState> {
        self.body(handle).map(|b| {
            if !b.is_fixed() && b.is_sleeping() {
                SleepState::Asleep
            } else {
                SleepState::Awake
            }
        })
    }

    /// Apply a force during the next substep only, waking the body
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec3) -> Result<()> {
        let body = self.dynamic_body_mut(handle)?;
        body.add_force(to_vector(force), true);
        Ok(())
    }

    /// Apply an impulse, waking the body
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) -> Result<()> {
        let body = self.dynamic_body_mut(handle)?;
        body.apply_impulse(to_vector(impulse), true);
        Ok(())
    }

    // ==================== Subscriptions ====================

    /// Deliver this body's new contacts to the handler passed to `step`
    pub fn subscribe_collisions(&mut self, handle: RigidBodyHandle) -> Result<()> {
        if !self.bodies.contains(handle.0) {
            return Err(PhysicsError::BodyNotFound(handle));
        }
        self.subscriptions.insert(handle);
        Ok(())
    }

    /// Stop delivering this body's contacts; returns whether it was subscribed
    pub fn unsubscribe_collisions(&mut self, handle: RigidBodyHandle) -> bool {
        self.subscriptions.remove(&handle)
    }

    /// Whether contacts of this body are delivered
    pub fn is_subscribed(&self, handle: RigidBodyHandle) -> bool {
        self.subscriptions.contains(&handle) && self.bodies.contains(handle.0)
    }

    /// Number of subscribed bodies
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    // ==================== Simulation ====================

    /// Advance by whole `fixed_dt` substeps to catch up with `elapsed`,
    /// running at most `max_substeps` of them. Returns the substeps taken.
    ///
    /// Collision events are handed to `handler` before this returns.
    pub fn step(
        &mut self,
        fixed_dt: f32,
        elapsed: f32,
        max_substeps: u32,
        handler: &mut dyn CollisionHandler,
    ) -> Result<u32> {
        if !(fixed_dt.is_finite() && fixed_dt > 0.0) {
            return Err(PhysicsError::InvalidTimestep(fixed_dt));
        }
        if !self.materials.has_default() {
            return Err(PhysicsError::MissingDefaultContactMaterial);
        }

        self.last_events.clear();
        // NaN and negative deltas (clock hiccups) advance nothing
        self.accumulated_time += elapsed.max(0.0);

        let mut substeps = 0;
        while self.accumulated_time >= fixed_dt && substeps < max_substeps {
            self.step_internal(fixed_dt, handler);
            self.accumulated_time -= fixed_dt;
            substeps += 1;
        }

        // Drop whatever the substep cap could not consume
        self.accumulated_time %= fixed_dt;

        if substeps > 0 {
            log::trace!("Stepped {} substeps, t = {:.3}", substeps, self.simulated_time);
        }
        Ok(substeps)
    }

    /// Internal fixed timestep
    fn step_internal(&mut self, dt: f32, handler: &mut dyn CollisionHandler) {
        self.integration_params.dt = dt;
        let velocities = self.sample_velocities();

        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector {
            collision_events: collision_send,
        };
        let hooks = MaterialHooks {
            table: &self.materials,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &hooks,
            &event_handler,
        );
        self.simulated_time += f64::from(dt);

        // User forces last a single substep
        let pushed: Vec<_> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic() && b.user_force() != rapier::Vector::zeros())
            .map(|(h, _)| h)
            .collect();
        for handle in pushed {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.reset_forces(false);
            }
        }

        while let Ok(event) = collision_recv.try_recv() {
            if !event.started() || event.sensor() {
                continue;
            }
            if let Some(collision) = self.describe_contact(event.collider1(), event.collider2(), &velocities) {
                self.dispatch(collision, handler);
            }
        }
    }

    fn sample_velocities(&self) -> HashMap<RigidBodyHandle, VelocitySample> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic())
            .map(|(h, b)| {
                let com = b.center_of_mass();
                (
                    RigidBodyHandle(h),
                    VelocitySample {
                        linvel: from_vector(b.linvel()),
                        angvel: from_vector(b.angvel()),
                        center: Vec3::new(com.x, com.y, com.z),
                    },
                )
            })
            .collect()
    }

    /// Build the event for a new contact, addressed to the first collider's body
    fn describe_contact(
        &self,
        h1: rapier::ColliderHandle,
        h2: rapier::ColliderHandle,
        velocities: &HashMap<RigidBodyHandle, VelocitySample>,
    ) -> Option<CollisionEvent> {
        let b1 = self.colliders.get(h1)?.parent().map(RigidBodyHandle);
        let b2 = self.colliders.get(h2)?.parent().map(RigidBodyHandle);

        // Address the event to a collider that has a body
        let (h1, h2, body, other) = match (b1, b2) {
            (Some(b1), b2) => (h1, h2, b1, b2),
            (None, Some(b2)) => (h2, h1, b2, None),
            (None, None) => return None,
        };

        let (normal, contact_point) = match self.contact_geometry(h1, h2) {
            Some((normal, point)) => (normal, Some(point)),
            None => {
                let from = self.body_position(body).ok()?;
                let to = other.and_then(|o| self.body_position(o).ok()).unwrap_or(from);
                ((to - from).normalize_or_zero(), None)
            }
        };

        let velocity_of = |handle: Option<RigidBodyHandle>| {
            handle
                .and_then(|h| velocities.get(&h))
                .map_or(Vec3::ZERO, |sample| match contact_point {
                    Some(point) => sample.at(point),
                    None => sample.linvel,
                })
        };
        let relative = velocity_of(Some(body)) - velocity_of(other);

        Some(CollisionEvent {
            body,
            other,
            impact_velocity_along_normal: relative.dot(normal),
            contact_point,
            normal,
            time: self.simulated_time,
        })
    }

    /// Deepest contact point and the normal pointing from `h1` toward `h2`
    fn contact_geometry(&self, h1: rapier::ColliderHandle, h2: rapier::ColliderHandle) -> Option<(Vec3, Vec3)> {
        let pair = self.narrow_phase.contact_pair(h1, h2)?;
        let flipped = pair.collider1 != h1;
        let first = self.colliders.get(pair.collider1)?;

        let manifold = pair.manifolds.iter().find(|m| !m.points.is_empty())?;
        let deepest = manifold
            .points
            .iter()
            .min_by(|a, b| a.dist.total_cmp(&b.dist))?;

        let point = first.position() * deepest.local_p1;
        let normal = from_vector(&manifold.data.normal);
        let normal = if flipped { -normal } else { normal };
        Some((normal, Vec3::new(point.x, point.y, point.z)))
    }

    fn dispatch(&mut self, collision: CollisionEvent, handler: &mut dyn CollisionHandler) {
        log::trace!(
            "Contact {:?} -> {:?}, impact {:.2}",
            collision.body,
            collision.other,
            collision.impact_velocity_along_normal
        );
        self.last_events.push(collision);

        if self.is_subscribed(collision.body) {
            handler.on_collide(&collision);
        }
        if let Some(other) = collision.other {
            if self.is_subscribed(other) {
                handler.on_collide(&collision.mirrored(other));
            }
        }
    }

    // ==================== Events ====================

    /// Contacts that started during the last `step`, one per pair
    pub fn collision_events(&self) -> &[CollisionEvent] {
        &self.last_events
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of bodies with non-zero mass
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get number of active (awake) bodies
    pub fn active_body_count(&self) -> usize {
        self.islands.active_dynamic_bodies().len()
    }

    /// Total simulated time in seconds
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}
