//! Clatter Audio - impact sounds
//!
//! Turns collision events from `clatter_physics` into playback of a single
//! impact clip through rodio.
//!
//! # Features
//!
//! - Strength threshold and linear volume scaling
//! - Global rate limiting in simulated time
//! - Single-voice clip: each impact restarts the clip
//! - Silent fallback when no device or clip is available
//!
//! # Example
//!
//! ```ignore
//! use clatter_audio::prelude::*;
//!
//! let settings = ImpactSettings::default();
//! let mut sounds = ImpactSoundController::new(settings.clone(), open_clip(&settings));
//!
//! // Hand the controller to the physics step
//! world.step(1.0 / 60.0, delta, 3, &mut sounds)?;
//! ```

pub mod clip;
pub mod error;
pub mod impact;
pub mod settings;

pub mod prelude {
    pub use crate::clip::{open_clip, ImpactClip, RecordingClip, RodioClip, SilentClip};
    pub use crate::error::AudioError;
    pub use crate::impact::{ImpactSoundController, RateLimiter};
    pub use crate::settings::ImpactSettings;
}

pub use prelude::*;
