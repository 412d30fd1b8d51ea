//! In-process event emitter
//!
//! This crate provides a synchronous, single-threaded publish/subscribe
//! registry. Listeners are stored per event name in registration order and
//! invoked on the caller's thread. Changes to the registry are themselves
//! announced through the [`NEW_LISTENER_EVENT`] and [`LISTENER_REMOVED_EVENT`]
//! meta-events.

mod config;
mod emitter;
mod error;
mod listener;

pub use config::{EmitterConfig, DEFAULT_MAX_LISTENERS};
pub use emitter::{EventEmitter, LISTENER_REMOVED_EVENT, NEW_LISTENER_EVENT};
pub use error::{ConfigError, EmitterError, Result};
pub use listener::{Arg, Listener, ListenerId};
