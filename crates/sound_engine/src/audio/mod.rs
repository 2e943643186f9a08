//! Audio system
//!
//! [`SoundHandle`] is the engine-facing object: transport controls, volume,
//! and a `SOUND_COMPLETE` event bridged from the native `"ended"`
//! notification. Everything audible happens behind the [`NativeAudio`]
//! trait, which a backend implements and a [`SoundLoader`] attaches.

pub mod asset;
pub mod backend;
pub mod category;
pub mod loader;
pub mod native;
pub mod sound;

#[cfg(test)]
pub(crate) mod mock;

pub use asset::{AudioAsset, AudioFormat};
pub use category::SoundCategory;
pub use loader::SoundLoader;
pub use native::{NativeAudio, NativeListenerSet, NativeThunk};
pub use sound::{PlaybackState, SoundHandle};

use thiserror::Error;

/// Audio system errors
///
/// Transport controls on [`SoundHandle`] never fail; these come from
/// loading, decoding and backend setup.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Backend used before `initialize`
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Output device or stream could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Sink creation or decoding failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Bytes or values that do not describe a sound
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
