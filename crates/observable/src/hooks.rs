use serde_json::Value;

/// Callbacks run for every property transition of an [`Observable`](crate::Observable).
///
/// Hooks observe; they cannot veto or rewrite the incoming value. Both
/// methods default to doing nothing.
pub trait PropertyHooks {
    /// Called before `key` is written, with its current value (`null` if unset)
    fn on_property_changing(&self, _key: &str, _value: &Value) {}

    /// Called after `key` is written, with its new value
    fn on_property_change(&self, _key: &str, _value: &Value) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PropertyHooks for NoHooks {}

impl<T: PropertyHooks + ?Sized> PropertyHooks for std::rc::Rc<T> {
    fn on_property_changing(&self, key: &str, value: &Value) {
        (**self).on_property_changing(key, value)
    }

    fn on_property_change(&self, key: &str, value: &Value) {
        (**self).on_property_change(key, value)
    }
}
