//! Observable property bags
//!
//! An [`Observable`] owns a property bag and an [`events::EventEmitter`].
//! Every write made through [`Observable::set_properties`] is bracketed by a
//! [`PROPERTY_CHANGING_EVENT`] and a [`PROPERTY_CHANGE_EVENT`] dispatch.

mod bag;
mod hooks;
mod host;
mod observable;

pub use bag::{Properties, PropertyBag};
pub use hooks::{NoHooks, PropertyHooks};
pub use host::ObservableHost;
pub use observable::{Observable, PROPERTY_CHANGE_EVENT, PROPERTY_CHANGING_EVENT};
