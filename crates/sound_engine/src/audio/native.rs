//! Native audio contract
//!
//! What a [`SoundHandle`](super::SoundHandle) needs from the host's audio
//! object. Times are in seconds, volume is 0..1.

use std::fmt;
use std::rc::Rc;

/// Native notification raised when playback reaches the end
pub const ENDED: &str = "ended";

/// Callback registered on a native resource
///
/// Compared by identity: removal needs the same thunk that was added.
#[derive(Clone)]
pub struct NativeThunk(Rc<dyn Fn()>);

impl NativeThunk {
    /// Wrap a callback
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Invoke the callback
    pub fn call(&self) {
        (self.0)();
    }
}

impl PartialEq for NativeThunk {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeThunk {}

impl fmt::Debug for NativeThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeThunk")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Host audio object
///
/// # Threading
/// Not Send + Sync: handles, dispatchers and thunks all live on the host
/// loop's thread.
pub trait NativeAudio {
    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position (seconds)
    fn set_current_time(&mut self, seconds: f64);

    /// Volume in 0..1
    fn volume(&self) -> f32;

    /// Set volume; callers pass values already clamped to 0..1
    fn set_volume(&mut self, volume: f32);

    /// Loop when playback reaches the end
    fn set_loop(&mut self, looping: bool);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause without moving the position
    fn pause(&mut self);

    /// (Re)load the underlying data
    fn load(&mut self);

    /// Register a thunk for a native notification
    fn add_event_listener(&mut self, name: &str, thunk: NativeThunk, use_capture: bool);

    /// Unregister a thunk previously added with the same name and phase
    fn remove_event_listener(&mut self, name: &str, thunk: &NativeThunk, use_capture: bool);

    /// Host pump hook, called once per frame. Resources that have to poll
    /// for end of playback fire their `"ended"` thunks from here.
    fn update(&mut self) {}
}

struct NativeEntry {
    name: String,
    thunk: NativeThunk,
    use_capture: bool,
}

/// Thunk registry for [`NativeAudio`] implementations
///
/// Adding an identical `(name, thunk, use_capture)` twice keeps one entry.
#[derive(Default)]
pub struct NativeListenerSet {
    entries: Vec<NativeEntry>,
}

impl NativeListenerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a thunk
    pub fn add(&mut self, name: &str, thunk: NativeThunk, use_capture: bool) {
        if self.position(name, &thunk, use_capture).is_none() {
            self.entries.push(NativeEntry {
                name: name.to_string(),
                thunk,
                use_capture,
            });
        }
    }

    /// Unregister a thunk. Returns `false` if it was not registered.
    pub fn remove(&mut self, name: &str, thunk: &NativeThunk, use_capture: bool) -> bool {
        match self.position(name, thunk, use_capture) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of thunks registered for `name`
    pub fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.name == name).count()
    }

    /// Total number of registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the thunks for `name`, in registration order
    pub fn thunks_for(&self, name: &str) -> Vec<NativeThunk> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.thunk.clone())
            .collect()
    }

    /// Invoke every thunk for `name`. Returns how many ran.
    pub fn fire(&self, name: &str) -> usize {
        let thunks = self.thunks_for(name);
        for thunk in &thunks {
            thunk.call();
        }
        thunks.len()
    }

    fn position(&self, name: &str, thunk: &NativeThunk, use_capture: bool) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name && e.thunk == *thunk && e.use_capture == use_capture)
    }
}

impl fmt::Debug for NativeListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeListenerSet")
            .field("entries", &self.entries.len())
            .finish()
    }
}
