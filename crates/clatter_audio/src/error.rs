//! Audio error types

use thiserror::Error;

/// Audio error types
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Failed to initialize audio device: {0}")]
    DeviceInit(String),

    /// Clip file could not be opened
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    /// Clip file could not be decoded
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// Output refused the clip
    #[error("Playback failed: {0}")]
    Playback(String),
}
