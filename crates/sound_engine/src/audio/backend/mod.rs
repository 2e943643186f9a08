//! Audio backend implementations
//!
//! A backend owns the output device and turns an [`AudioAsset`] into a
//! [`NativeAudio`] resource that a [`SoundHandle`](crate::audio::SoundHandle)
//! can be attached to.

#[cfg(feature = "rodio")]
pub mod rodio_backend;

use serde::{Deserialize, Serialize};

use crate::audio::{AudioAsset, AudioError, NativeAudio};

/// Audio backend trait for platform abstraction
///
/// # Threading
/// Not Send + Sync: resources are driven from the host loop's thread.
pub trait AudioBackend {
    /// Initialize the audio backend
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError>;

    /// Shutdown the audio backend
    fn shutdown(&mut self);

    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;

    /// Build a native resource for an asset, paused at position 0
    fn create_resource(&mut self, asset: &AudioAsset) -> Result<Box<dyn NativeAudio>, AudioError>;
}

/// Configuration for audio backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBackendConfig {
    /// Sample rate (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of output channels (1=mono, 2=stereo)
    pub channels: u16,
    /// Buffer size for audio processing
    pub buffer_size: usize,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            buffer_size: 4096,
        }
    }
}

/// Create the default audio backend for the platform
#[cfg(feature = "rodio")]
pub fn create_backend(config: &AudioBackendConfig) -> Result<Box<dyn AudioBackend>, AudioError> {
    let mut backend = Box::new(rodio_backend::RodioBackend::new());
    backend.initialize(config)?;
    Ok(backend)
}
