//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! # Example
//!
//! ```no_run
//! use sound_engine::audio::backend::{AudioBackend, AudioBackendConfig};
//! use sound_engine::audio::backend::rodio_backend::RodioBackend;
//! use sound_engine::audio::{AudioAsset, SoundHandle};
//! use sound_engine::events::TaskQueue;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//!
//! let asset = AudioAsset::from_file("resources/audio/sound.wav").unwrap();
//! let mut sound = SoundHandle::new("resources/audio/sound.wav", TaskQueue::new());
//! sound.attach_resource(backend.create_resource(&asset).unwrap());
//!
//! sound.play(0.0, false);
//! loop {
//!     sound.update(); // fires "ended" once the source drains
//!     # break;
//! }
//! ```

use super::{AudioBackend, AudioBackendConfig};
use crate::audio::native::{NativeAudio, NativeListenerSet, NativeThunk, ENDED};
use crate::audio::{AudioAsset, AudioError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// Rodio-based audio backend
///
/// Resources stay audible only while the backend (and its output stream)
/// is alive.
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            initialized: false,
        }
    }
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        // Create output stream
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        // Drop stream handle and output
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn create_resource(&mut self, asset: &AudioAsset) -> Result<Box<dyn NativeAudio>, AudioError> {
        let stream_handle = self.stream_handle.as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;

        // Fail here rather than on first play
        let data: Arc<[u8]> = Arc::from(asset.data());
        Decoder::new(Cursor::new(Arc::clone(&data)))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {}", e)))?;

        Ok(Box::new(RodioAudio::new(sink, data)))
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Position last requested through [`NativeAudio::set_current_time`]
///
/// The sink only publishes its position on its 5 ms tick, and that tick
/// writes the position before applying a queued seek. Until the sink
/// reports something other than `stale`, `target` is the real position.
#[derive(Debug, Clone, Copy)]
struct SeekAnchor {
    target: Duration,
    /// Sink position right after the seek was applied, `None` while no
    /// source is loaded to apply it to
    stale: Option<Duration>,
}

/// Native resource backed by one `rodio::Sink`
///
/// Rodio has no end-of-playback callback, so [`NativeAudio::update`] polls
/// the sink and fires `"ended"` thunks when a non-looping source drains.
pub struct RodioAudio {
    sink: Sink,
    data: Arc<[u8]>,
    /// Loop flag for the next source appended
    looping: bool,
    /// Loop flag of the source currently in the sink
    source_loops: bool,
    anchor: Option<SeekAnchor>,
    playing: bool,
    listeners: NativeListenerSet,
}

impl RodioAudio {
    fn new(sink: Sink, data: Arc<[u8]>) -> Self {
        sink.pause();
        let mut audio = Self {
            sink,
            data,
            looping: false,
            source_loops: false,
            anchor: None,
            playing: false,
            listeners: NativeListenerSet::new(),
        };
        audio.append_source();
        audio
    }

    /// Replace whatever is in the sink with a fresh decode of the data.
    /// Leaves the sink paused.
    fn append_source(&mut self) -> bool {
        self.sink.clear();
        let decoder = match Decoder::new(Cursor::new(Arc::clone(&self.data))) {
            Ok(decoder) => decoder,
            Err(e) => {
                log::warn!("Failed to decode audio: {}", e);
                return false;
            }
        };
        if self.looping {
            self.sink.append(decoder.repeat_infinite());
        } else {
            self.sink.append(decoder);
        }
        self.source_loops = self.looping;
        true
    }

    /// Seek the loaded source and anchor the reported position to `position`
    fn seek_to(&mut self, position: Duration) {
        let applied = match self.sink.try_seek(position) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to seek to {:?}: {}", position, e);
                false
            }
        };
        self.anchor = applied.then(|| SeekAnchor {
            target: position,
            stale: Some(self.sink.get_pos()),
        });
    }

    /// Playback position, preferring a requested one the sink has not caught up with
    fn position(&self) -> Duration {
        let reported = self.sink.get_pos();
        match self.anchor {
            Some(SeekAnchor { target, stale }) if stale.map_or(true, |stale| stale == reported) => target,
            _ => reported,
        }
    }
}

impl NativeAudio for RodioAudio {
    fn current_time(&self) -> f64 {
        self.position().as_secs_f64()
    }

    fn set_current_time(&mut self, seconds: f64) {
        let position = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or_default();
        if self.sink.empty() {
            self.anchor = Some(SeekAnchor { target: position, stale: None });
        } else {
            self.seek_to(position);
        }
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn play(&mut self) {
        if self.sink.empty() || self.source_loops != self.looping {
            let resume_at = match self.anchor {
                Some(SeekAnchor { target, stale: None }) => target,
                _ if self.sink.empty() => Duration::ZERO,
                _ => self.position(),
            };
            if !self.append_source() {
                return;
            }
            self.seek_to(resume_at);
        }
        self.sink.play();
        self.playing = true;
    }

    fn pause(&mut self) {
        self.sink.pause();
        self.playing = false;
    }

    fn load(&mut self) {
        self.playing = false;
        if self.append_source() {
            self.seek_to(Duration::ZERO);
        } else {
            self.anchor = None;
        }
    }

    fn add_event_listener(&mut self, name: &str, thunk: NativeThunk, use_capture: bool) {
        self.listeners.add(name, thunk, use_capture);
    }

    fn remove_event_listener(&mut self, name: &str, thunk: &NativeThunk, use_capture: bool) {
        self.listeners.remove(name, thunk, use_capture);
    }

    fn update(&mut self) {
        if self.playing && self.sink.empty() {
            self.playing = false;
            let fired = self.listeners.fire(ENDED);
            log::debug!("Playback ended ({} listener(s))", fired);
        }
    }
}
