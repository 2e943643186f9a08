//! # Sound Engine
//!
//! Sound handles for a 2D game/UI engine.
//!
//! A [`SoundHandle`](audio::SoundHandle) wraps one native audio resource and
//! exposes transport controls (play, pause, stop, replay, volume, looping)
//! plus a synthetic "sound complete" event that engine-level listeners can
//! subscribe to. Decoding and output belong to the native resource; this
//! crate only translates calls and events between the two worlds.
//!
//! ## Features
//!
//! - **Permissive transport**: every control is a silent no-op until a
//!   resource has been attached, so callers never need to check first
//! - **Completion events**: `SOUND_COMPLETE` listeners are bridged onto the
//!   native `"ended"` notification, deduplicated per listener/owner pair
//! - **Deferred callbacks**: `preload` completion runs through a FIFO
//!   [`TaskQueue`](events::TaskQueue) pumped by the host loop
//! - **Rodio backend**: optional native resource built on `rodio::Sink`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sound_engine::prelude::*;
//!
//! # #[cfg(feature = "rodio")]
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tasks = TaskQueue::new();
//!     let config = SoundConfig::load_or_default("sound.toml")?;
//!     let mut loader = SoundLoader::with_default_backend(config)?;
//!     let mut sound = loader.load_file("resources/audio/explosion.wav", &tasks)?;
//!
//!     let on_complete = Listener::new(|_event: &Event| log::info!("explosion finished"));
//!     sound.add_event_listener(SoundEvent::SOUND_COMPLETE, &on_complete, None, false);
//!
//!     sound.set_volume(0.8);
//!     sound.play(0.0, false);
//!
//!     // Host loop: pump deferred callbacks and native notifications
//!     loop {
//!         tasks.run_pending();
//!         sound.update();
//!         # break;
//!     }
//!     Ok(())
//! }
//! # #[cfg(not(feature = "rodio"))]
//! # fn main() {}
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod audio;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        audio::{
            AudioAsset, AudioError, AudioFormat, NativeAudio, NativeThunk, PlaybackState,
            SoundCategory, SoundHandle, SoundLoader,
            backend::{AudioBackend, AudioBackendConfig},
        },
        config::{Config, ConfigError, ConfigFormat, ReplayPolicy, SoundConfig},
        events::{Event, EventDispatcher, Listener, OwnerId, SoundEvent, TaskQueue},
    };
}
