//! Property bag whose writes are announced through an owned emitter

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use events::{Arg, EmitterConfig, EventEmitter, Listener};
use serde_json::Value;
use tracing::debug;

use crate::bag::{Properties, PropertyBag};
use crate::hooks::{NoHooks, PropertyHooks};

/// Published with `(key, current_value)` before a property is written
pub const PROPERTY_CHANGING_EVENT: &str = "before-change";

/// Published with `(key, new_value)` after a property is written
pub const PROPERTY_CHANGE_EVENT: &str = "after-change";

/// A property bag plus the emitter that announces its mutations.
///
/// Each instance creates its own [`EventEmitter`] and subscribes its hooks to
/// [`PROPERTY_CHANGING_EVENT`] and [`PROPERTY_CHANGE_EVENT`] on it, so hooks
/// run ahead of any listener attached later through [`emitter`](Self::emitter).
pub struct Observable<P = Properties, H = NoHooks> {
    emitter: EventEmitter,
    properties: RefCell<P>,
    hooks: Rc<H>,
}

impl<P: PropertyBag> Observable<P, NoHooks> {
    pub fn new(properties: P) -> events::Result<Self> {
        Self::with_hooks(properties, NoHooks)
    }
}

impl<P, H> Observable<P, H>
where
    P: PropertyBag,
    H: PropertyHooks + 'static,
{
    pub fn with_hooks(properties: P, hooks: H) -> events::Result<Self> {
        Self::with_config(properties, hooks, &EmitterConfig::default())
    }

    /// Build an observable whose emitter uses `config`.
    ///
    /// The bag is moved in as-is. Only fails if the hook subscriptions are
    /// rejected by the emitter.
    pub fn with_config(properties: P, hooks: H, config: &EmitterConfig) -> events::Result<Self> {
        let emitter = EventEmitter::with_config(config);
        let hooks = Rc::new(hooks);

        let changing = Rc::clone(&hooks);
        emitter.on(
            PROPERTY_CHANGING_EVENT,
            Listener::new(move |args| {
                if let Some((key, value)) = key_and_value(args) {
                    changing.on_property_changing(key, value);
                }
            }),
        )?;

        let changed = Rc::clone(&hooks);
        emitter.on(
            PROPERTY_CHANGE_EVENT,
            Listener::new(move |args| {
                if let Some((key, value)) = key_and_value(args) {
                    changed.on_property_change(key, value);
                }
            }),
        )?;

        Ok(Self {
            emitter,
            properties: RefCell::new(properties),
            hooks,
        })
    }

    /// Write each pair of `partial` in iteration order.
    ///
    /// Every key gets its own full cycle: publish [`PROPERTY_CHANGING_EVENT`]
    /// with the value read before the write, write, then publish
    /// [`PROPERTY_CHANGE_EVENT`] with the new value. The bag is not borrowed
    /// while either event is being dispatched.
    pub fn set_properties<I, K, V>(&self, partial: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in partial {
            let key = key.into();
            let value = value.into();

            let current = self
                .properties
                .borrow()
                .property(&key)
                .unwrap_or(Value::Null);
            self.emitter.publish(
                PROPERTY_CHANGING_EVENT,
                &[Arg::from(key.as_str()), Arg::from(current)],
            );

            self.properties
                .borrow_mut()
                .set_property(key.clone(), value.clone());
            debug!(property = %key, "Property updated");

            self.emitter
                .publish(PROPERTY_CHANGE_EVENT, &[Arg::from(key), Arg::from(value)]);
        }
    }

    /// Read view of the live bag. Drop it before calling `set_properties`.
    pub fn properties(&self) -> Ref<'_, P> {
        self.properties.borrow()
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn into_properties(self) -> P {
        self.properties.into_inner()
    }
}

impl<P: std::fmt::Debug, H> std::fmt::Debug for Observable<P, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("properties", &self.properties.borrow())
            .field("emitter", &self.emitter)
            .finish()
    }
}

fn key_and_value(args: &[Arg]) -> Option<(&str, &Value)> {
    let key = args.first()?.as_str()?;
    let value = args.get(1)?.as_value()?;
    Some((key, value))
}
