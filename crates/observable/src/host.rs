use std::cell::Ref;

use events::EventEmitter;
use serde_json::Value;

use crate::bag::PropertyBag;
use crate::hooks::PropertyHooks;
use crate::observable::Observable;

/// A type that embeds an [`Observable`] and exposes its surface as its own.
///
/// Implementors only provide [`observable`](Self::observable); the rest is
/// delegated.
pub trait ObservableHost {
    type Properties: PropertyBag;
    type Hooks: PropertyHooks + 'static;

    fn observable(&self) -> &Observable<Self::Properties, Self::Hooks>;

    fn set_properties<I, K, V>(&self, partial: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.observable().set_properties(partial)
    }

    fn properties(&self) -> Ref<'_, Self::Properties> {
        self.observable().properties()
    }

    fn emitter(&self) -> &EventEmitter {
        self.observable().emitter()
    }
}
