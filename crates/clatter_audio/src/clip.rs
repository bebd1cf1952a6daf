//! Impact clip playback

use crate::error::AudioError;
use crate::settings::ImpactSettings;
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

/// A single reusable sound. Restarting it cuts off whatever is still playing.
pub trait ImpactClip {
    /// Set the volume, rewind to the start and play
    fn restart(&mut self, volume: f32) -> Result<(), AudioError>;
}

type ClipSource = Buffered<Decoder<BufReader<File>>>;

/// Clip decoded once and replayed through rodio
pub struct RodioClip {
    /// Output stream (must be kept alive)
    _stream: OutputStream,
    /// Stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Decoded samples, cloned per playback
    source: ClipSource,
    /// The one voice this clip may occupy
    sink: Option<Sink>,
}

impl RodioClip {
    /// Decode the clip and open the default output device
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|_| AudioError::FileNotFound(path.display().to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Decode(e.to_string()))?
            .buffered();

        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        log::info!("Loaded impact clip {}", path.display());
        Ok(Self {
            _stream: stream,
            stream_handle,
            source,
            sink: None,
        })
    }
}

impl ImpactClip for RodioClip {
    fn restart(&mut self, volume: f32) -> Result<(), AudioError> {
        if let Some(previous) = self.sink.take() {
            previous.stop();
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(self.source.clone());
        self.sink = Some(sink);
        Ok(())
    }
}

/// Clip that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentClip;

impl ImpactClip for SilentClip {
    fn restart(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Clip that remembers the volume of every restart instead of playing.
///
/// Clones share the same log, so a boxed clip can still be inspected.
#[derive(Debug, Default, Clone)]
pub struct RecordingClip {
    plays: Rc<RefCell<Vec<f32>>>,
}

impl RecordingClip {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Volumes of every restart so far
    pub fn plays(&self) -> Vec<f32> {
        self.plays.borrow().clone()
    }

    /// Number of restarts so far
    pub fn play_count(&self) -> usize {
        self.plays.borrow().len()
    }
}

impl ImpactClip for RecordingClip {
    fn restart(&mut self, volume: f32) -> Result<(), AudioError> {
        self.plays.borrow_mut().push(volume);
        Ok(())
    }
}

/// Open the configured clip, falling back to silence when muted or when
/// the device or file is unavailable
pub fn open_clip(settings: &ImpactSettings) -> Box<dyn ImpactClip> {
    if settings.muted {
        log::info!("Impact sounds muted");
        return Box::new(SilentClip);
    }
    match RodioClip::open(&settings.clip_path) {
        Ok(clip) => Box::new(clip),
        Err(e) => {
            log::warn!("{}; impact sounds disabled", e);
            Box::new(SilentClip)
        }
    }
}
