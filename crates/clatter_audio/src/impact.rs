//! Collision-driven impact sounds

use crate::clip::ImpactClip;
use crate::settings::ImpactSettings;
use clatter_physics::{CollisionEvent, CollisionHandler};

/// Enforces a minimum spacing between played sounds, across all bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    min_interval: f64,
    last: Option<f64>,
}

impl RateLimiter {
    /// Create a limiter that has never fired
    pub fn new(min_interval: f64) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Whether a sound at `now` would be far enough from the last one
    pub fn is_ready(&self, now: f64) -> bool {
        self.last.map_or(true, |last| now - last > self.min_interval)
    }

    /// Claim the slot at `now` if it is free
    pub fn try_acquire(&mut self, now: f64) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Time of the last acquired slot
    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

/// Plays the impact clip for collisions that hit hard enough
pub struct ImpactSoundController {
    settings: ImpactSettings,
    clip: Box<dyn ImpactClip>,
    limiter: RateLimiter,
    played: u64,
    suppressed: u64,
}

impl ImpactSoundController {
    /// Create a controller around a clip
    pub fn new(settings: ImpactSettings, clip: Box<dyn ImpactClip>) -> Self {
        let limiter = RateLimiter::new(settings.min_interval);
        Self {
            settings,
            clip,
            limiter,
            played: 0,
            suppressed: 0,
        }
    }

    /// Volume for an impact of the given strength, before the master volume
    pub fn volume_for(&self, strength: f32) -> f32 {
        (strength / self.settings.volume_scale).clamp(0.0, 1.0)
    }

    /// Play the clip for an impact at simulated time `now` if it is loud
    /// enough and the rate limit allows. Returns whether it played.
    pub fn handle_impact(&mut self, strength: f32, now: f64) -> bool {
        if strength.is_nan() || strength <= self.settings.min_strength {
            return false;
        }
        if !self.limiter.try_acquire(now) {
            self.suppressed += 1;
            return false;
        }

        let volume = self.volume_for(strength) * self.settings.master_volume;
        if let Err(e) = self.clip.restart(volume) {
            log::warn!("Impact sound failed: {}", e);
            return false;
        }

        self.played += 1;
        log::debug!("Impact {:.2} m/s at t={:.3}, volume {:.2}", strength, now, volume);
        true
    }

    /// Sounds played so far
    pub fn played_count(&self) -> u64 {
        self.played
    }

    /// Audible impacts dropped by the rate limiter
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }

    /// The rate limiter state
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Get the settings
    pub fn settings(&self) -> &ImpactSettings {
        &self.settings
    }
}

impl CollisionHandler for ImpactSoundController {
    fn on_collide(&mut self, event: &CollisionEvent) {
        self.handle_impact(event.impact_velocity_along_normal, event.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::RecordingClip;
    use approx::assert_relative_eq;

    fn controller() -> (ImpactSoundController, RecordingClip) {
        let clip = RecordingClip::new();
        let controller =
            ImpactSoundController::new(ImpactSettings::default(), Box::new(clip.clone()));
        (controller, clip)
    }

    #[test]
    fn test_volume_scales_and_clamps() {
        let (controller, _) = controller();
        assert_relative_eq!(controller.volume_for(5.0), 0.5);
        assert_relative_eq!(controller.volume_for(20.0), 1.0);
        assert_relative_eq!(controller.volume_for(-3.0), 0.0);
    }

    #[test]
    fn test_soft_impacts_are_silent() {
        let (mut controller, clip) = controller();
        assert!(!controller.handle_impact(1.4, 1.0));
        assert!(!controller.handle_impact(1.5, 2.0));
        assert!(!controller.handle_impact(f32::NAN, 3.0));
        assert_eq!(clip.play_count(), 0);
        assert_eq!(controller.suppressed_count(), 0);
    }

    #[test]
    fn test_plays_with_scaled_volume() {
        let (mut controller, clip) = controller();
        assert!(controller.handle_impact(5.0, 0.1));
        assert!(controller.handle_impact(20.0, 0.2));
        assert_eq!(clip.plays(), vec![0.5, 1.0]);
        assert_eq!(controller.played_count(), 2);
    }

    #[test]
    fn test_rate_limit_is_global() {
        let (mut controller, clip) = controller();
        assert!(controller.handle_impact(5.0, 1.0));
        assert!(!controller.handle_impact(8.0, 1.0));
        assert!(!controller.handle_impact(8.0, 1.0005));
        assert!(controller.handle_impact(8.0, 1.002));
        assert_eq!(clip.play_count(), 2);
        assert_eq!(controller.suppressed_count(), 2);
    }

    #[test]
    fn test_silent_impacts_do_not_consume_the_slot() {
        let (mut controller, _) = controller();
        controller.handle_impact(1.0, 1.0);
        assert_eq!(controller.limiter().last(), None);
        assert!(controller.handle_impact(3.0, 1.0));
    }

    #[test]
    fn test_master_volume_applies_after_scaling() {
        let clip = RecordingClip::new();
        let settings = ImpactSettings::default().with_master_volume(0.5);
        let mut controller = ImpactSoundController::new(settings, Box::new(clip.clone()));
        controller.handle_impact(10.0, 0.0);
        assert_eq!(clip.plays(), vec![0.5]);
    }

    #[test]
    fn test_limiter_first_use_is_ready() {
        let mut limiter = RateLimiter::new(0.001);
        assert!(limiter.is_ready(0.0));
        assert!(limiter.try_acquire(0.0));
        assert!(!limiter.is_ready(0.0005));
        assert_eq!(limiter.last(), Some(0.0));
    }
}
