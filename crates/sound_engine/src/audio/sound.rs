//! Sound handle
//!
//! A [`SoundHandle`] proxies exactly one native audio resource. Until a
//! loader attaches one, every transport call is a silent no-op, so callers
//! never have to check attachment first.
//!
//! # Example
//!
//! ```no_run
//! use sound_engine::audio::SoundHandle;
//! use sound_engine::events::{Listener, SoundEvent, TaskQueue};
//!
//! let tasks = TaskQueue::new();
//! let mut sound = SoundHandle::new("audio/theme.ogg", tasks.clone());
//!
//! // Nothing attached yet: ignored
//! sound.play(0.0, true);
//!
//! let on_complete = Listener::new(|event| log::info!("{:?} finished", event.get_path()));
//! sound.add_event_listener(SoundEvent::SOUND_COMPLETE, &on_complete, None, false);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::config::{ReplayPolicy, SoundConfig};
use crate::events::{Event, EventDispatcher, Listener, ListenerId, OwnerId, SoundEvent, TaskQueue};

use super::native::{NativeAudio, NativeThunk, ENDED};
use super::SoundCategory;

/// Playback state as driven through this handle
///
/// Reflects the last transport command applied. A sound that reaches its
/// end on its own reports that through `SOUND_COMPLETE`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No native resource attached
    Unattached,
    /// Attached and stopped (initial state after attaching)
    Stopped,
    /// Playing
    Playing,
    /// Paused mid-playback
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BindingKey {
    listener: ListenerId,
    owner: Option<OwnerId>,
    native_type: String,
}

struct NativeBinding {
    // Holding the listener keeps its id from being reused while bound
    _listener: Listener,
    use_capture: bool,
    thunk: NativeThunk,
}

/// Engine event names that differ from their native counterparts
fn native_event_type(event_type: &str) -> &str {
    if event_type == SoundEvent::SOUND_COMPLETE {
        ENDED
    } else {
        event_type
    }
}

/// Handle to one playable sound
pub struct SoundHandle {
    /// Asset path, informational only
    pub path: String,
    category: SoundCategory,
    resource: Option<Box<dyn NativeAudio>>,
    paused_offset_ms: f64,
    bindings: HashMap<BindingKey, NativeBinding>,
    dispatcher: EventDispatcher,
    tasks: TaskQueue,
    state: PlaybackState,
    replay_policy: ReplayPolicy,
    clamp_negative_position: bool,
}

impl SoundHandle {
    /// Background music label
    pub const MUSIC: &'static str = SoundCategory::Music.as_str();
    /// Sound effect label
    pub const EFFECT: &'static str = SoundCategory::Effect.as_str();

    /// Create an unattached handle with default settings
    pub fn new(path: impl Into<String>, tasks: TaskQueue) -> Self {
        Self::with_config(path, tasks, &SoundConfig::default())
    }

    /// Create an unattached handle
    ///
    /// `tasks` receives `preload` callbacks; the host pumps it.
    pub fn with_config(path: impl Into<String>, tasks: TaskQueue, config: &SoundConfig) -> Self {
        Self {
            path: path.into(),
            category: config.default_category,
            resource: None,
            paused_offset_ms: 0.0,
            bindings: HashMap::new(),
            dispatcher: EventDispatcher::new(),
            tasks,
            state: PlaybackState::Unattached,
            replay_policy: config.replay_policy,
            clamp_negative_position: config.clamp_negative_position,
        }
    }

    fn ignored(&self, operation: &str) {
        log::trace!("{} on '{}' ignored: no resource attached", operation, self.path);
    }

    /// Attach the native resource. Meant for loaders, not gameplay code.
    ///
    /// Replaces any resource already attached; native thunks registered on
    /// the old one are removed first. Listeners added while unattached are
    /// not bridged retroactively.
    pub fn attach_resource(&mut self, resource: Box<dyn NativeAudio>) {
        if self.detach_resource().is_some() {
            log::debug!("Replacing native resource of '{}'", self.path);
        }
        self.resource = Some(resource);
        self.state = PlaybackState::Stopped;
        log::debug!("Attached native resource to '{}'", self.path);
    }

    /// Detach and return the native resource, unregistering every native
    /// thunk this handle added to it
    pub fn detach_resource(&mut self) -> Option<Box<dyn NativeAudio>> {
        let mut resource = self.resource.take()?;
        for (key, binding) in self.bindings.drain() {
            resource.remove_event_listener(&key.native_type, &binding.thunk, false);
        }
        self.state = PlaybackState::Unattached;
        log::debug!("Detached native resource from '{}'", self.path);
        Some(resource)
    }

    /// Whether a native resource is attached
    pub fn is_attached(&self) -> bool {
        self.resource.is_some()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Sound category
    pub fn category(&self) -> SoundCategory {
        self.category
    }

    /// Change the sound category
    pub fn set_category(&mut self, category: SoundCategory) {
        self.category = category;
    }

    /// True for background music
    pub fn is_music(&self) -> bool {
        self.category == SoundCategory::Music
    }

    /// Start playback at `position_ms`, optionally looping
    pub fn play(&mut self, position_ms: f64, looping: bool) {
        let position_ms = if self.clamp_negative_position {
            position_ms.max(0.0)
        } else {
            position_ms
        };
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("play");
        };
        resource.set_current_time(position_ms / 1000.0);
        resource.set_loop(looping);
        resource.play();
        self.state = PlaybackState::Playing;
    }

    /// Play once from the start
    pub fn play_default(&mut self) {
        self.play(0.0, false);
    }

    /// Stop playback and rewind to the start
    ///
    /// The stored replay offset is cleared, not set to the stop position.
    pub fn stop(&mut self) {
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("stop");
        };
        self.paused_offset_ms = 0.0;
        resource.set_current_time(0.0);
        resource.pause();
        self.state = PlaybackState::Stopped;
    }

    /// Pause without moving the playback position
    pub fn pause(&mut self) {
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("pause");
        };
        if self.replay_policy == ReplayPolicy::ResumeFromPause {
            self.paused_offset_ms = resource.current_time() * 1000.0;
        }
        resource.pause();
        self.state = PlaybackState::Paused;
    }

    /// Resume from the stored offset, then clear it
    pub fn replay(&mut self) {
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("replay");
        };
        resource.set_current_time(self.paused_offset_ms / 1000.0);
        self.paused_offset_ms = 0.0;
        resource.play();
        self.state = PlaybackState::Playing;
    }

    /// Ask the native resource to reload its data
    pub fn load(&mut self) {
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("load");
        };
        resource.load();
    }

    /// Playback position in milliseconds, 0 when unattached
    pub fn position(&self) -> f64 {
        self.resource
            .as_deref()
            .map_or(0.0, |resource| resource.current_time() * 1000.0)
    }

    /// Offset `replay` will resume from, in milliseconds
    pub fn paused_offset(&self) -> f64 {
        self.paused_offset_ms
    }

    /// Volume in 0..1, 0 when unattached
    pub fn volume(&self) -> f32 {
        self.resource
            .as_deref()
            .map_or(0.0, |resource| resource.volume())
    }

    /// Set volume, clamped to 0..1
    pub fn set_volume(&mut self, volume: f32) {
        let Some(resource) = self.resource.as_deref_mut() else {
            return self.ignored("set_volume");
        };
        resource.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Set volume
    #[deprecated(note = "use `set_volume`")]
    pub fn set_volume_level(&mut self, volume: f32) {
        self.set_volume(volume);
    }

    /// Get volume
    #[deprecated(note = "use `volume`")]
    pub fn get_volume(&self) -> f32 {
        self.volume()
    }

    /// Subscribe to an event on this sound
    ///
    /// Always registers with the engine-level dispatcher. With a resource
    /// attached, also binds a native thunk (at most one per listener, owner
    /// and native event type) that re-dispatches `SOUND_COMPLETE`.
    /// `SOUND_COMPLETE` maps to the native `"ended"`; other names pass
    /// through unchanged.
    pub fn add_event_listener(
        &mut self,
        event_type: &str,
        listener: &Listener,
        owner: Option<OwnerId>,
        use_capture: bool,
    ) {
        self.dispatcher
            .add_event_listener(event_type, listener, owner, use_capture);

        let Some(resource) = self.resource.as_deref_mut() else {
            return;
        };
        let native_type = native_event_type(event_type);
        let key = BindingKey {
            listener: listener.id(),
            owner,
            native_type: native_type.to_string(),
        };
        if self.bindings.contains_key(&key) {
            return;
        }

        let dispatcher = self.dispatcher.downgrade();
        let path = self.path.clone();
        let thunk = NativeThunk::new(move || {
            dispatcher.dispatch_event(&SoundEvent::sound_complete(&path));
        });
        resource.add_event_listener(native_type, thunk.clone(), false);
        self.bindings.insert(
            key,
            NativeBinding {
                _listener: listener.clone(),
                use_capture,
                thunk,
            },
        );
    }

    /// Unsubscribe; unknown listeners are ignored
    pub fn remove_event_listener(
        &mut self,
        event_type: &str,
        listener: &Listener,
        owner: Option<OwnerId>,
        use_capture: bool,
    ) {
        self.dispatcher
            .remove_event_listener(event_type, listener, owner, use_capture);

        let Some(resource) = self.resource.as_deref_mut() else {
            return;
        };
        let native_type = native_event_type(event_type);
        let key = BindingKey {
            listener: listener.id(),
            owner,
            native_type: native_type.to_string(),
        };
        if !self
            .bindings
            .get(&key)
            .is_some_and(|binding| binding.use_capture == use_capture)
        {
            return;
        }
        if let Some(binding) = self.bindings.remove(&key) {
            resource.remove_event_listener(native_type, &binding.thunk, false);
        }
    }

    /// Whether any engine-level listener is registered for `event_type`
    pub fn has_event_listener(&self, event_type: &str) -> bool {
        self.dispatcher.has_event_listener(event_type)
    }

    /// Number of native thunks currently bound
    pub fn native_binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Dispatch an event to this sound's engine-level listeners
    pub fn dispatch_event(&self, event: &Event) -> bool {
        self.dispatcher.dispatch_event(event)
    }

    /// Engine-level dispatcher of this sound
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Set the category, then run `callback` on a later pump of the task
    /// queue. The callback is never run synchronously.
    pub fn preload(&mut self, category: SoundCategory, callback: Option<Box<dyn FnOnce()>>) {
        self.category = category;
        if let Some(callback) = callback {
            self.tasks.call_later(callback);
        }
    }

    /// Forward the host's per-frame pump to the native resource
    pub fn update(&mut self) {
        if let Some(resource) = self.resource.as_deref_mut() {
            resource.update();
        }
    }

    /// Release the native resource and every listener
    ///
    /// `preload` callbacks already queued still run.
    pub fn destroy(&mut self) {
        drop(self.detach_resource());
        self.dispatcher.clear();
        self.paused_offset_ms = 0.0;
        log::debug!("Destroyed sound '{}'", self.path);
    }
}

impl fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundHandle")
            .field("path", &self.path)
            .field("category", &self.category)
            .field("state", &self.state)
            .field("paused_offset_ms", &self.paused_offset_ms)
            .field("native_bindings", &self.bindings.len())
            .finish_non_exhaustive()
    }
}
