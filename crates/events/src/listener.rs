//! Listener handles and the positional arguments passed to them

use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use uuid::Uuid;

/// Identity of a registered callable.
///
/// Every call to [`Listener::new`] mints a fresh id; clones of a handle share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A callable registered with an [`EventEmitter`](crate::EventEmitter).
///
/// Equality is identity: two handles are equal only if one was cloned from
/// the other. Wrapping the same closure twice yields two distinct listeners.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Rc<dyn Fn(&[Arg])>,
}

impl Listener {
    /// Wrap a callable in a new listener handle
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[Arg]) + 'static,
    {
        Self {
            id: ListenerId::new(),
            callback: Rc::new(callback),
        }
    }

    /// Handle that does not keep the callable alive
    pub(crate) fn downgrade(&self) -> WeakListener {
        WeakListener {
            id: self.id,
            callback: Rc::downgrade(&self.callback),
        }
    }

    /// Identity shared by this handle and all of its clones
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the underlying callable
    pub fn call(&self, args: &[Arg]) {
        (self.callback)(args)
    }
}

/// Non-owning counterpart of [`Listener`], for callables that refer to themselves
pub(crate) struct WeakListener {
    id: ListenerId,
    callback: Weak<dyn Fn(&[Arg])>,
}

impl WeakListener {
    pub(crate) fn upgrade(&self) -> Option<Listener> {
        Some(Listener {
            id: self.id,
            callback: self.callback.upgrade()?,
        })
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish()
    }
}

/// One positional argument of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Arbitrary data
    Value(Value),
    /// A listener handle, as carried by the registry meta-events
    Listener(Listener),
}

impl Arg {
    /// The JSON payload, or `None` for a listener handle
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            Arg::Listener(_) => None,
        }
    }

    /// The payload as a string slice, if it is a JSON string
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The listener handle, if this argument carries one
    pub fn as_listener(&self) -> Option<&Listener> {
        match self {
            Arg::Listener(listener) => Some(listener),
            Arg::Value(_) => None,
        }
    }

    /// Consume the argument, turning a listener handle into `null`
    pub fn into_value(self) -> Value {
        match self {
            Arg::Value(value) => value,
            Arg::Listener(_) => Value::Null,
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Listener> for Arg {
    fn from(listener: Listener) -> Self {
        Arg::Listener(listener)
    }
}

impl From<&Listener> for Arg {
    fn from(listener: &Listener) -> Self {
        Arg::Listener(listener.clone())
    }
}

macro_rules! arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

arg_from_value!(&str, String, bool, i32, i64, u32, u64, usize, f64);

/// Build a `Vec<Arg>` from a list of convertible expressions.
///
/// ```
/// use events::args;
///
/// let args = args!["key", 42, true];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[0].as_str(), Some("key"));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
