//! Engine-level event system
//!
//! Key principles:
//! - Event types are free-form strings, so native names can pass through
//! - Key-value arguments (no order dependency)
//! - Registration is deduplicated on listener identity, owner and phase
//! - Deferred work goes through [`TaskQueue`] and runs when the host pumps it

pub mod task_queue;

pub use task_queue::TaskQueue;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Free-form text (asset paths, names)
    Text(String),
    /// Numeric value (positions, volumes)
    Number(f64),
}

/// Event with a type name and key-value arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    event_type: String,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event of the given type
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    #[must_use]
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Type name of this event
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get the `path` argument if present
    pub fn get_path(&self) -> Option<&str> {
        if let Some(EventArg::Text(path)) = self.get_arg("path") {
            Some(path)
        } else {
            None
        }
    }
}

/// Sound event kinds
pub struct SoundEvent;

impl SoundEvent {
    /// Dispatched after a sound finishes playing
    pub const SOUND_COMPLETE: &'static str = "soundComplete";

    /// Build a `SOUND_COMPLETE` event for the sound at `path`
    pub fn sound_complete(path: &str) -> Event {
        Event::new(Self::SOUND_COMPLETE).with_arg("path", EventArg::Text(path.to_string()))
    }
}

/// Identity of whoever registered a listener
///
/// Two registrations of the same callback under different owners are
/// distinct listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

/// Stable identity of a [`Listener`], valid while any clone of it is alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Shared event callback
///
/// Clones share identity, so the same `Listener` can be passed to both
/// `add_event_listener` and `remove_event_listener`.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    /// Wrap a callback
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Identity used for deduplication and removal
    pub fn id(&self) -> ListenerId {
        ListenerId(Rc::as_ptr(&self.0).cast::<()>() as usize)
    }

    /// Invoke the callback
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.id()).finish()
    }
}

struct Registration {
    event_type: String,
    listener: Listener,
    owner: Option<OwnerId>,
    use_capture: bool,
}

impl Registration {
    fn matches(&self, event_type: &str, listener: &Listener, owner: Option<OwnerId>, use_capture: bool) -> bool {
        self.event_type == event_type
            && self.listener == *listener
            && self.owner == owner
            && self.use_capture == use_capture
    }
}

/// Listener registry and dispatcher
///
/// Clones share the same registry. Listeners run in registration order.
/// Events dispatched directly are at their target, so capture-phase
/// registrations are kept for identity but are not notified.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    registrations: Rc<RefCell<Vec<Registration>>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns `false` if an identical registration
    /// already exists.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        listener: &Listener,
        owner: Option<OwnerId>,
        use_capture: bool,
    ) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        if registrations
            .iter()
            .any(|r| r.matches(event_type, listener, owner, use_capture))
        {
            return false;
        }
        registrations.push(Registration {
            event_type: event_type.to_string(),
            listener: listener.clone(),
            owner,
            use_capture,
        });
        true
    }

    /// Remove a listener. Returns `false` if nothing matched.
    pub fn remove_event_listener(
        &self,
        event_type: &str,
        listener: &Listener,
        owner: Option<OwnerId>,
        use_capture: bool,
    ) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        match registrations
            .iter()
            .position(|r| r.matches(event_type, listener, owner, use_capture))
        {
            Some(index) => {
                registrations.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check whether any listener is registered for `event_type`
    pub fn has_event_listener(&self, event_type: &str) -> bool {
        self.registrations
            .borrow()
            .iter()
            .any(|r| r.event_type == event_type)
    }

    /// Number of registrations for `event_type`, both phases
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registrations
            .borrow()
            .iter()
            .filter(|r| r.event_type == event_type)
            .count()
    }

    /// Dispatch an event to its listeners. Returns `true` if any listener ran.
    ///
    /// The registry is not borrowed while callbacks run, so listeners may
    /// add or remove registrations; changes apply to the next dispatch.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        let targets: Vec<Listener> = self
            .registrations
            .borrow()
            .iter()
            .filter(|r| !r.use_capture && r.event_type == event.event_type())
            .map(|r| r.listener.clone())
            .collect();

        for listener in &targets {
            listener.call(event);
        }
        !targets.is_empty()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.registrations.borrow_mut().clear();
    }

    /// Non-owning reference, for callbacks stored inside native resources
    pub fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher {
            registrations: Rc::downgrade(&self.registrations),
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registrations", &self.registrations.borrow().len())
            .finish()
    }
}

/// Weak handle to an [`EventDispatcher`]
#[derive(Clone)]
pub struct WeakDispatcher {
    registrations: Weak<RefCell<Vec<Registration>>>,
}

impl WeakDispatcher {
    /// Upgrade to a dispatcher if it is still alive
    pub fn upgrade(&self) -> Option<EventDispatcher> {
        self.registrations
            .upgrade()
            .map(|registrations| EventDispatcher { registrations })
    }

    /// Dispatch if the dispatcher is still alive
    pub fn dispatch_event(&self, event: &Event) -> bool {
        self.upgrade()
            .is_some_and(|dispatcher| dispatcher.dispatch_event(event))
    }
}
