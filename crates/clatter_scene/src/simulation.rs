//! Frame loop: step physics, sync meshes, draw

use crate::config::{InitialObject, SceneConfig};
use crate::debug_panel::{DebugAction, DebugPanel, SpawnRequest};
use crate::error::Result;
use crate::host::{HeadlessHost, SceneHost};
use crate::registry::ObjectRegistry;
use crate::spawn::SpawnFactory;
use clatter_audio::{ImpactClip, ImpactSoundController};
use clatter_physics::{PhysicsWorld, RigidBodyHandle};
use crossbeam_channel::Receiver;
use glam::Vec3;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Seconds since the previous frame
    pub delta: f32,
    /// Physics substeps taken
    pub substeps: u32,
    /// Meshes updated from their bodies
    pub synced: usize,
}

/// Source of elapsed time since the loop started
pub trait Clock {
    fn elapsed(&mut self) -> f64;
}

/// Wall clock
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that advances a fixed amount per reading
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: f64,
    step: f64,
}

impl ManualClock {
    /// Create a clock that advances `step` seconds per call
    pub fn new(step: f64) -> Self {
        Self { now: 0.0, step }
    }

    /// A clock that never advances
    pub fn frozen() -> Self {
        Self::new(0.0)
    }

    /// Change the per-call advance
    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }
}

impl Clock for ManualClock {
    fn elapsed(&mut self) -> f64 {
        self.now += self.step;
        self.now
    }
}

/// Decides when (and whether) the next frame runs
pub trait FrameScheduler {
    /// Wait for the next frame; `false` means the host is gone
    fn next_frame(&mut self, stats: &FrameStats) -> bool;
}

impl<F> FrameScheduler for F
where
    F: FnMut(&FrameStats) -> bool,
{
    fn next_frame(&mut self, stats: &FrameStats) -> bool {
        self(stats)
    }
}

/// Sleeps out the rest of each frame budget until stopped
pub struct PacedScheduler {
    frame_time: Duration,
    frame_start: Instant,
    running: Arc<AtomicBool>,
    max_frames: u64,
}

impl PacedScheduler {
    /// Pace frames at `target_fps` while `running` stays set
    pub fn new(target_fps: u32, running: Arc<AtomicBool>) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            frame_start: Instant::now(),
            running,
            max_frames: 0,
        }
    }

    /// Stop after `frames` frames (0 = never)
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = frames;
        self
    }
}

impl FrameScheduler for PacedScheduler {
    fn next_frame(&mut self, stats: &FrameStats) -> bool {
        if self.max_frames > 0 && stats.frame >= self.max_frames {
            return false;
        }

        let spent = self.frame_start.elapsed();
        if spent < self.frame_time {
            std::thread::sleep(self.frame_time - spent);
        }
        self.frame_start = Instant::now();

        self.running.load(Ordering::SeqCst)
    }
}

/// The whole playground: world, live objects, sounds and the render host
pub struct Playground<H: SceneHost = HeadlessHost> {
    world: PhysicsWorld,
    registry: ObjectRegistry,
    factory: SpawnFactory,
    sounds: ImpactSoundController,
    host: H,
    floor: RigidBodyHandle,
    fixed_timestep: f32,
    max_substeps: u32,
    last_elapsed: f64,
    frame: u64,
    panel: Option<(DebugPanel, Receiver<DebugAction>)>,
}

impl<H: SceneHost> Playground<H> {
    /// Build the world, the floor and the sound controller. Initial objects
    /// are not spawned; see [`Playground::spawn_initial`].
    pub fn new(config: &SceneConfig, mut host: H, clip: Box<dyn ImpactClip>) -> Result<Self> {
        let mut world = PhysicsWorld::new(config.physics.clone())?;
        let mut factory = SpawnFactory::new(&mut world, config.scene.surface.clone());
        let (floor, _) = factory.spawn_floor(&mut world, &mut host, config.scene.floor_size)?;
        let sounds = ImpactSoundController::new(config.audio.clone(), clip);

        log::info!(
            "Playground ready: dt {:.4}s, up to {} substeps per frame",
            config.physics.fixed_timestep,
            config.physics.max_substeps
        );

        Ok(Self {
            world,
            registry: ObjectRegistry::new(),
            factory,
            sounds,
            host,
            floor,
            fixed_timestep: config.physics.fixed_timestep,
            max_substeps: config.physics.max_substeps,
            last_elapsed: 0.0,
            frame: 0,
            panel: None,
        })
    }

    /// Spawn the objects listed in the configuration
    pub fn spawn_initial(&mut self, objects: &[InitialObject]) -> Result<()> {
        for object in objects {
            match *object {
                InitialObject::Sphere { radius, position } => {
                    self.spawn_sphere(radius, Vec3::from_array(position))?;
                }
                InitialObject::Box { size, position } => {
                    self.spawn_box(Vec3::from_array(size), Vec3::from_array(position))?;
                }
            }
        }
        Ok(())
    }

    /// Receive debug actions; they run at the start of each frame
    pub fn attach_panel(&mut self, panel: DebugPanel, actions: Receiver<DebugAction>) {
        self.panel = Some((panel, actions));
    }

    /// Spawn a sphere and register it
    pub fn spawn_sphere(&mut self, radius: f32, position: Vec3) -> Result<RigidBodyHandle> {
        self.factory.spawn_sphere(
            &mut self.world,
            &mut self.registry,
            &mut self.host,
            radius,
            position,
        )
    }

    /// Spawn a box and register it
    pub fn spawn_box(&mut self, size: Vec3, position: Vec3) -> Result<RigidBodyHandle> {
        self.factory
            .spawn_box(&mut self.world, &mut self.registry, &mut self.host, size, position)
    }

    /// Remove every spawned object. The floor stays.
    pub fn reset(&mut self) -> Result<usize> {
        self.registry.clear_all(&mut self.world, &mut self.host)
    }

    /// Carry out a debug panel request
    pub fn apply(&mut self, request: SpawnRequest) -> Result<()> {
        match request {
            SpawnRequest::Sphere { radius, position } => {
                self.spawn_sphere(radius, position)?;
            }
            SpawnRequest::Box { size, position } => {
                self.spawn_box(size, position)?;
            }
            SpawnRequest::Reset => {
                self.reset()?;
            }
        }
        Ok(())
    }

    fn drain_actions(&mut self) {
        let Some((mut panel, actions)) = self.panel.take() else {
            return;
        };
        while let Ok(action) = actions.try_recv() {
            let request = panel.request(action);
            if let Err(e) = self.apply(request) {
                log::warn!("Debug action '{}' failed: {}", action, e);
            }
        }
        self.panel = Some((panel, actions));
    }

    /// Run one frame at `elapsed` seconds since the loop started
    pub fn tick(&mut self, elapsed: f64) -> Result<FrameStats> {
        self.drain_actions();

        let delta = (elapsed - self.last_elapsed).max(0.0) as f32;
        self.last_elapsed = elapsed;

        let substeps = self.world.step(
            self.fixed_timestep,
            delta,
            self.max_substeps,
            &mut self.sounds,
        )?;
        let synced = self.registry.sync_from(&self.world)?;

        self.host.update_controls(delta);
        self.host.render(&self.registry);

        self.frame += 1;
        Ok(FrameStats {
            frame: self.frame,
            delta,
            substeps,
            synced,
        })
    }

    /// Keep ticking until the scheduler reports the host is gone. Returns
    /// the number of frames run.
    pub fn run(&mut self, clock: &mut dyn Clock, scheduler: &mut dyn FrameScheduler) -> Result<u64> {
        let first = self.frame;
        loop {
            let stats = self.tick(clock.elapsed())?;
            if !scheduler.next_frame(&stats) {
                break;
            }
        }
        let frames = self.frame - first;
        log::info!(
            "Stopped after {} frames, {:.1}s simulated, {} impact sounds",
            frames,
            self.world.simulated_time(),
            self.sounds.played_count()
        );
        Ok(frames)
    }

    /// Physics world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable physics world
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Registered meshes and bodies
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Impact sound controller
    pub fn sounds(&self) -> &ImpactSoundController {
        &self.sounds
    }

    /// Render host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable render host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle of the permanent floor
    pub fn floor(&self) -> RigidBodyHandle {
        self.floor
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
