//! Recording native resource and backend for tests

use std::cell::RefCell;
use std::rc::Rc;

use super::backend::{AudioBackend, AudioBackendConfig};
use super::native::{NativeAudio, NativeListenerSet, NativeThunk};
use super::{AudioAsset, AudioError};

#[derive(Debug)]
pub(crate) struct MockState {
    pub current_time: f64,
    pub volume: f32,
    pub looping: bool,
    pub playing: bool,
    pub load_calls: u32,
    pub update_calls: u32,
    pub calls: Vec<&'static str>,
    pub listeners: NativeListenerSet,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            volume: 1.0,
            looping: false,
            playing: false,
            load_calls: 0,
            update_calls: 0,
            calls: Vec::new(),
            listeners: NativeListenerSet::new(),
        }
    }
}

/// `NativeAudio` that records every call into shared state
pub(crate) struct MockAudio {
    state: Rc<RefCell<MockState>>,
}

/// Test-side view of a [`MockAudio`] after it has been attached
#[derive(Clone)]
pub(crate) struct MockProbe {
    state: Rc<RefCell<MockState>>,
}

impl MockAudio {
    pub fn new() -> (Box<dyn NativeAudio>, MockProbe) {
        let state = Rc::new(RefCell::new(MockState::default()));
        let probe = MockProbe {
            state: Rc::clone(&state),
        };
        (Box::new(Self { state }), probe)
    }
}

impl MockProbe {
    pub fn state(&self) -> std::cell::Ref<'_, MockState> {
        self.state.borrow()
    }

    /// Simulate the host advancing playback
    pub fn advance_to(&self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    /// Simulate a native notification; the state is not borrowed while
    /// thunks run.
    pub fn fire(&self, name: &str) -> usize {
        let thunks = self.state.borrow().listeners.thunks_for(name);
        for thunk in &thunks {
            thunk.call();
        }
        thunks.len()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.state.borrow().listeners.count(name)
    }
}

impl NativeAudio for MockAudio {
    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.current_time = seconds;
        state.calls.push("set_current_time");
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn set_loop(&mut self, looping: bool) {
        let mut state = self.state.borrow_mut();
        state.looping = looping;
        state.calls.push("set_loop");
    }

    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.calls.push("play");
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.calls.push("pause");
    }

    fn load(&mut self) {
        let mut state = self.state.borrow_mut();
        state.load_calls += 1;
        state.calls.push("load");
    }

    fn add_event_listener(&mut self, name: &str, thunk: NativeThunk, use_capture: bool) {
        self.state.borrow_mut().listeners.add(name, thunk, use_capture);
    }

    fn remove_event_listener(&mut self, name: &str, thunk: &NativeThunk, use_capture: bool) {
        self.state.borrow_mut().listeners.remove(name, thunk, use_capture);
    }

    fn update(&mut self) {
        self.state.borrow_mut().update_calls += 1;
    }
}

/// Backend handing out [`MockAudio`] resources
#[derive(Default)]
pub(crate) struct MockBackend {
    pub initialized: bool,
    pub probes: Rc<RefCell<Vec<MockProbe>>>,
}

impl AudioBackend for MockBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn create_resource(&mut self, _asset: &AudioAsset) -> Result<Box<dyn NativeAudio>, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }
        let (resource, probe) = MockAudio::new();
        self.probes.borrow_mut().push(probe);
        Ok(resource)
    }
}
