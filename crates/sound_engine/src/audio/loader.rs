//! Sound loading
//!
//! The loader is the one collaborator expected to call
//! [`SoundHandle::attach_resource`]: it reads an asset, asks the backend for
//! a native resource and binds it to a handle.

use std::path::Path;

use crate::config::SoundConfig;
use crate::events::TaskQueue;

use super::backend::AudioBackend;
use super::{AudioAsset, AudioError, SoundHandle};

/// Builds attached [`SoundHandle`]s from files or bytes
pub struct SoundLoader {
    backend: Box<dyn AudioBackend>,
    config: SoundConfig,
}

impl SoundLoader {
    /// Create a loader over an already initialized backend
    pub fn new(backend: Box<dyn AudioBackend>, config: SoundConfig) -> Self {
        Self { backend, config }
    }

    /// Create a loader on the default rodio backend
    ///
    /// # Errors
    /// `BackendInitFailed` if no output device can be opened
    #[cfg(feature = "rodio")]
    pub fn with_default_backend(config: SoundConfig) -> Result<Self, AudioError> {
        let backend = super::backend::create_backend(&config.backend)?;
        Ok(Self::new(backend, config))
    }

    /// Settings applied to every handle this loader creates
    pub fn config(&self) -> &SoundConfig {
        &self.config
    }

    /// Backend used to create native resources
    pub fn backend_mut(&mut self) -> &mut dyn AudioBackend {
        self.backend.as_mut()
    }

    /// Load a file into a new attached handle
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `InvalidData` for unrecognised
    /// bytes, backend errors if no resource can be created
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, tasks: &TaskQueue) -> Result<SoundHandle, AudioError> {
        let path = path.as_ref();
        let asset = AudioAsset::from_file(path)?;
        self.load_asset(path.to_string_lossy(), &asset, tasks)
    }

    /// Load in-memory file bytes into a new attached handle
    ///
    /// # Errors
    /// As [`SoundLoader::load_file`], minus `Io`
    pub fn load_bytes(&mut self, path: &str, bytes: &[u8], tasks: &TaskQueue) -> Result<SoundHandle, AudioError> {
        let asset = AudioAsset::from_bytes(bytes)?;
        self.load_asset(path, &asset, tasks)
    }

    /// Create a handle for an already validated asset
    ///
    /// # Errors
    /// Backend errors if no resource can be created
    pub fn load_asset(
        &mut self,
        path: impl Into<String>,
        asset: &AudioAsset,
        tasks: &TaskQueue,
    ) -> Result<SoundHandle, AudioError> {
        let mut sound = SoundHandle::with_config(path, tasks.clone(), &self.config);
        self.attach(&mut sound, asset)?;
        Ok(sound)
    }

    /// Bind a native resource for `asset` to an existing handle
    ///
    /// # Errors
    /// Backend errors if no resource can be created; the handle is left
    /// untouched in that case
    pub fn attach(&mut self, sound: &mut SoundHandle, asset: &AudioAsset) -> Result<(), AudioError> {
        let resource = self.backend.create_resource(asset)?;
        sound.attach_resource(resource);
        log::debug!("Loaded '{}' ({:?})", sound.path, asset.format());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::AudioBackendConfig;
    use crate::audio::mock::MockBackend;
    use crate::audio::native::ENDED;
    use crate::audio::{PlaybackState, SoundCategory};
    use crate::config::ReplayPolicy;
    use crate::events::{Listener, SoundEvent};
    use std::cell::Cell;
    use std::rc::Rc;

    fn mock_loader(config: SoundConfig) -> (SoundLoader, MockBackend) {
        let mut backend = MockBackend::default();
        backend.initialize(&AudioBackendConfig::default()).unwrap();
        let observer = MockBackend {
            initialized: true,
            probes: Rc::clone(&backend.probes),
        };
        (SoundLoader::new(Box::new(backend), config), observer)
    }

    #[test]
    fn test_load_bytes_attaches_resource() {
        let (mut loader, observer) = mock_loader(SoundConfig::default());
        let tasks = TaskQueue::new();
        let sound = loader.load_bytes("boom.wav", b"RIFF....WAVE", &tasks).unwrap();

        assert!(sound.is_attached());
        assert_eq!(sound.state(), PlaybackState::Stopped);
        assert_eq!(sound.path, "boom.wav");
        assert_eq!(observer.probes.borrow().len(), 1);
    }

    #[test]
    fn test_loaded_handle_uses_loader_config() {
        let config = SoundConfig {
            default_category: SoundCategory::Music,
            replay_policy: ReplayPolicy::ResumeFromPause,
            ..SoundConfig::default()
        };
        let (mut loader, observer) = mock_loader(config);
        let tasks = TaskQueue::new();
        let mut sound = loader.load_bytes("theme.ogg", b"OggS....", &tasks).unwrap();
        assert!(sound.is_music());

        let probe = observer.probes.borrow()[0].clone();
        sound.play_default();
        probe.advance_to(1.5);
        sound.pause();
        assert!((sound.paused_offset() - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_bytes_rejected_before_backend() {
        let (mut loader, observer) = mock_loader(SoundConfig::default());
        let result = loader.load_bytes("x.bin", b"garbage", &TaskQueue::new());

        assert!(matches!(result, Err(AudioError::InvalidData(_))));
        assert!(observer.probes.borrow().is_empty());
    }

    #[test]
    fn test_backend_failure_leaves_handle_unattached() {
        let mut loader = SoundLoader::new(Box::new(MockBackend::default()), SoundConfig::default());
        let mut sound = SoundHandle::new("late.wav", TaskQueue::new());
        let asset = AudioAsset::from_bytes(b"RIFF....").unwrap();

        let result = loader.attach(&mut sound, &asset);
        assert!(matches!(result, Err(AudioError::BackendNotInitialized)));
        assert!(!sound.is_attached());
    }

    #[test]
    fn test_backend_shutdown_through_loader() {
        let config = SoundConfig {
            clamp_negative_position: true,
            ..SoundConfig::default()
        };
        let (mut loader, _observer) = mock_loader(config);
        assert!(loader.config().clamp_negative_position);
        assert!(loader.backend_mut().is_initialized());

        loader.backend_mut().shutdown();
        let result = loader.load_bytes("late.wav", b"RIFF....", &TaskQueue::new());
        assert!(matches!(result, Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_missing_file() {
        let (mut loader, _observer) = mock_loader(SoundConfig::default());
        let result = loader.load_file("no/such/file.wav", &TaskQueue::new());
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn test_end_to_end_completion() {
        let (mut loader, observer) = mock_loader(SoundConfig::default());
        let tasks = TaskQueue::new();
        let mut sound = loader.load_bytes("jump.wav", b"RIFF....", &tasks).unwrap();
        let probe = observer.probes.borrow()[0].clone();

        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        let listener = Listener::new(move |_| counter.set(counter.get() + 1));
        sound.add_event_listener(SoundEvent::SOUND_COMPLETE, &listener, None, false);

        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);
        sound.preload(SoundCategory::Effect, Some(Box::new(move || flag.set(true))));
        tasks.run_pending();
        assert!(ready.get());

        sound.play_default();
        assert_eq!(completed.get(), 0);
        probe.fire(ENDED);
        assert_eq!(completed.get(), 1);
    }
}
