//! Synchronous event emitter with ordered, named listener lists

use std::cell::{Cell, OnceCell, Ref, RefCell};
use std::rc::{Rc, Weak};

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::config::{EmitterConfig, DEFAULT_MAX_LISTENERS};
use crate::error::{EmitterError, Result};
use crate::listener::{Arg, Listener, WeakListener};

/// Published with `(event_name, listener)` before a listener is registered
pub const NEW_LISTENER_EVENT: &str = "new-listener";

/// Published with `(event_name, listener)` after every removal request
pub const LISTENER_REMOVED_EVENT: &str = "listener-removed";

struct Registry {
    listeners: IndexMap<String, Vec<Listener>>,
    max_listeners: usize,
}

impl Registry {
    fn new(max_listeners: usize) -> Self {
        let mut listeners = IndexMap::new();
        listeners.insert(NEW_LISTENER_EVENT.to_string(), Vec::new());
        listeners.insert(LISTENER_REMOVED_EVENT.to_string(), Vec::new());
        Self {
            listeners,
            max_listeners,
        }
    }
}

/// Registry of named listener lists with synchronous, in-order dispatch.
///
/// The emitter is a cheap handle: clones share one registry, so a listener can
/// capture a clone and subscribe, unsubscribe or publish from inside a
/// dispatch. No registry borrow is held while a listener runs.
///
/// Dispatch walks a snapshot of the list taken when [`publish`](Self::publish)
/// starts. A listener added during a pass is not called in that pass; a
/// listener removed during a pass is still called in that pass.
#[derive(Clone)]
pub struct EventEmitter {
    inner: Rc<RefCell<Registry>>,
}

impl EventEmitter {
    /// Create an emitter with the default listener limit
    pub fn new() -> Self {
        Self::with_max_listeners(DEFAULT_MAX_LISTENERS)
    }

    /// Create an emitter with the limit from `config`
    pub fn with_config(config: &EmitterConfig) -> Self {
        Self::with_max_listeners(config.max_listeners)
    }

    /// Create an emitter allowing `max_listeners` listeners per event name
    pub fn with_max_listeners(max_listeners: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::new(max_listeners))),
        }
    }

    /// Invoke every listener registered for `event_name`, in order.
    ///
    /// Returns `false` without side effects when the event has no listeners.
    /// A panicking listener aborts the rest of the pass.
    pub fn publish(&self, event_name: &str, args: &[Arg]) -> bool {
        let snapshot = {
            let registry = self.inner.borrow();
            match registry.listeners.get(event_name) {
                Some(listeners) if !listeners.is_empty() => listeners.clone(),
                _ => return false,
            }
        };

        trace!(event = event_name, listeners = snapshot.len(), "Publishing event");
        for listener in &snapshot {
            listener.call(args);
        }
        true
    }

    /// Alias of [`publish`](Self::publish)
    pub fn emit(&self, event_name: &str, args: &[Arg]) -> bool {
        self.publish(event_name, args)
    }

    /// Append `listener` to the list for `event_name`.
    ///
    /// [`NEW_LISTENER_EVENT`] is published first, so its handlers never see
    /// `listener` as active. Fails with [`EmitterError::CapacityExceeded`]
    /// if the existing list is already at the limit; the registry is then
    /// left untouched.
    pub fn subscribe(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, listener, false)
    }

    /// Alias of [`subscribe`](Self::subscribe)
    pub fn on(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, listener, false)
    }

    /// Alias of [`subscribe`](Self::subscribe)
    pub fn add_listener(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, listener, false)
    }

    /// Like [`subscribe`](Self::subscribe), but inserts at the front of the list
    pub fn prepend_listener(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, listener, true)
    }

    /// Register `listener` to run on the next dispatch of `event_name` only.
    ///
    /// What gets registered is an adapter with its own identity, so passing
    /// `listener` to [`unsubscribe`](Self::unsubscribe) does not cancel it.
    /// Use [`once_listener`](Self::once_listener) to get the adapter handle.
    pub fn once(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, self.once_adapter(event_name, listener), false)?;
        Ok(self)
    }

    /// Like [`once`](Self::once), but inserts at the front of the list
    pub fn prepend_once(&self, event_name: &str, listener: Listener) -> Result<&Self> {
        self.insert(event_name, self.once_adapter(event_name, listener), true)?;
        Ok(self)
    }

    /// Like [`once`](Self::once), returning the registered adapter handle
    pub fn once_listener(&self, event_name: &str, listener: Listener) -> Result<Listener> {
        let adapter = self.once_adapter(event_name, listener);
        self.insert(event_name, adapter.clone(), false)?;
        Ok(adapter)
    }

    /// Remove the first occurrence of `listener` from the list for `event_name`.
    ///
    /// [`LISTENER_REMOVED_EVENT`] is published afterwards whether or not a
    /// matching listener was found.
    pub fn unsubscribe(&self, event_name: &str, listener: &Listener) -> &Self {
        let removed = {
            let mut registry = self.inner.borrow_mut();
            match registry.listeners.get_mut(event_name) {
                Some(listeners) => match listeners.iter().position(|l| l == listener) {
                    Some(index) => {
                        listeners.remove(index);
                        true
                    }
                    None => false,
                },
                None => false,
            }
        };

        trace!(event = event_name, listener = %listener.id(), removed, "Listener removal");
        self.publish(
            LISTENER_REMOVED_EVENT,
            &[Arg::from(event_name), Arg::from(listener)],
        );
        self
    }

    /// Alias of [`unsubscribe`](Self::unsubscribe)
    pub fn off(&self, event_name: &str, listener: &Listener) -> &Self {
        self.unsubscribe(event_name, listener)
    }

    /// Alias of [`unsubscribe`](Self::unsubscribe)
    pub fn remove_listener(&self, event_name: &str, listener: &Listener) -> &Self {
        self.unsubscribe(event_name, listener)
    }

    /// Delete the entry for `event_name`, or every entry when `None`.
    ///
    /// Clearing everything also drops the two meta-event entries and their
    /// listeners. No meta-event is published. The listener limit is kept.
    pub fn unsubscribe_all(&self, event_name: Option<&str>) -> &Self {
        let mut registry = self.inner.borrow_mut();
        match event_name {
            Some(name) => {
                registry.listeners.shift_remove(name);
                debug!(event = name, "Removed all listeners for event");
            }
            None => {
                registry.listeners.clear();
                debug!("Removed all listeners");
            }
        }
        self
    }

    /// Current per-event listener limit
    pub fn max_listeners(&self) -> usize {
        self.inner.borrow().max_listeners
    }

    /// Change the per-event limit. Lists already above it are left alone.
    pub fn set_max_listeners(&self, max_listeners: usize) -> &Self {
        self.inner.borrow_mut().max_listeners = max_listeners;
        self
    }

    /// Number of listeners registered for `event_name`, 0 if absent
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Every event name present in the registry, in order of creation
    pub fn event_names(&self) -> Vec<String> {
        self.inner.borrow().listeners.keys().cloned().collect()
    }

    /// Copy of the list for `event_name`
    pub fn listeners(&self, event_name: &str) -> Vec<Listener> {
        self.raw_listeners(event_name).to_vec()
    }

    /// Live view of the stored list for `event_name`.
    ///
    /// The view borrows the registry: drop it before subscribing or
    /// unsubscribing through this emitter, or the registry borrow panics.
    pub fn raw_listeners(&self, event_name: &str) -> Ref<'_, [Listener]> {
        Ref::map(self.inner.borrow(), |registry| {
            registry
                .listeners
                .get(event_name)
                .map_or(&[][..], Vec::as_slice)
        })
    }

    fn insert(&self, event_name: &str, listener: Listener, prepend: bool) -> Result<&Self> {
        self.publish(
            NEW_LISTENER_EVENT,
            &[Arg::from(event_name), Arg::from(&listener)],
        );

        let mut registry = self.inner.borrow_mut();
        let limit = registry.max_listeners;
        let id = listener.id();
        match registry.listeners.entry(event_name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(vec![listener]);
            }
            Entry::Occupied(entry) if entry.get().len() >= limit => {
                warn!(event = event_name, limit, "Listener limit reached, rejecting listener");
                return Err(EmitterError::CapacityExceeded { limit });
            }
            Entry::Occupied(mut entry) => {
                let listeners = entry.get_mut();
                if prepend {
                    listeners.insert(0, listener);
                } else {
                    listeners.push(listener);
                }
            }
        }

        trace!(event = event_name, listener = %id, prepend, "Listener added");
        Ok(self)
    }

    /// Wrap `listener` so that each invocation first unsubscribes the
    /// wrapper itself; only the first invocation reaches `listener`.
    fn once_adapter(&self, event_name: &str, listener: Listener) -> Listener {
        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.inner);
        let name = event_name.to_string();
        let this: Rc<OnceCell<WeakListener>> = Rc::new(OnceCell::new());
        let fired = Cell::new(false);

        let slot = Rc::clone(&this);
        let adapter = Listener::new(move |args| {
            let handle = slot.get().and_then(WeakListener::upgrade);
            if let (Some(inner), Some(handle)) = (registry.upgrade(), handle) {
                EventEmitter { inner }.unsubscribe(&name, &handle);
            }
            if fired.replace(true) {
                return;
            }
            listener.call(args);
        });
        let _ = this.set(adapter.downgrade());
        adapter
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.borrow();
        f.debug_struct("EventEmitter")
            .field("event_names", &registry.listeners.keys().collect::<Vec<_>>())
            .field("max_listeners", &registry.max_listeners)
            .finish()
    }
}
