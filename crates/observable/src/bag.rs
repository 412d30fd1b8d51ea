//! Property storage behind an [`Observable`](crate::Observable)

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered, string-keyed property map
pub type Properties = IndexMap<String, Value>;

/// Keyed read/write access to a set of properties.
///
/// Open maps accept any key. Fixed-field types may implement this by
/// matching on the keys they recognise and ignoring the rest.
pub trait PropertyBag {
    /// Current value of `key`, if the bag has one
    fn property(&self, key: &str) -> Option<Value>;

    fn set_property(&mut self, key: String, value: Value);
}

impl PropertyBag for Properties {
    fn property(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn set_property(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

impl PropertyBag for Map<String, Value> {
    fn property(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn set_property(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_properties_keep_insertion_order() {
        let mut bag = Properties::new();
        bag.set_property("z".to_string(), json!(1));
        bag.set_property("a".to_string(), json!(2));
        bag.set_property("z".to_string(), json!(3));

        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(bag.property("z"), Some(json!(3)));
        assert_eq!(bag.property("missing"), None);
    }

    #[test]
    fn test_json_map_bag() {
        let mut bag = match json!({"title": "draft"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        bag.set_property("title".to_string(), json!("final"));

        assert_eq!(bag.property("title"), Some(json!("final")));
    }
}
