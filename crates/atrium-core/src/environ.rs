//! The gateway environment mapping owned by the wrapped request.
//!
//! Legacy root-factory code expects the request to behave like a bare
//! environment mapping rather than a structured object. [`Environ`] is that
//! mapping; the accessors on `RequestContext` delegate here so both views
//! observe the same storage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered, string-keyed environment mapping.
///
/// Bulk `clear` is deliberately not provided (wiping the environment out from
/// under the gateway is unsafe), and there is no `copy` (the wrapped request
/// owns duplication).
///
/// # Example
///
/// ```
/// use atrium_core::Environ;
///
/// let mut environ = Environ::new();
/// environ.insert("REQUEST_METHOD", "GET");
/// assert!(environ.contains_key("REQUEST_METHOD"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environ(IndexMap<String, Value>);

impl Environ {
    /// Creates an empty environment mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts `value` under `key`, returning the previous value if one
    /// existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// Preserves the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Removes and returns the most recently inserted entry.
    pub fn pop(&mut self) -> Option<(String, Value)> {
        self.0.pop()
    }

    /// Returns the value under `key`, inserting the result of `default`
    /// first if the key is absent.
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<String>,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.0.entry(key.into()).or_insert_with(default)
    }

    /// Merges `entries` into the mapping, overwriting existing keys.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.0.extend(entries);
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Environ {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Environ {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut environ = Environ::new();
        assert!(environ.is_empty());

        assert!(environ.insert("PATH_INFO", "/users").is_none());
        assert_eq!(environ.get("PATH_INFO"), Some(&json!("/users")));
        assert_eq!(environ.len(), 1);

        let previous = environ.insert("PATH_INFO", "/groups");
        assert_eq!(previous, Some(json!("/users")));
        assert_eq!(environ.len(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut environ = Environ::new();
        environ.insert("a", 1);
        environ.insert("b", 2);
        environ.insert("c", 3);

        assert_eq!(environ.remove("b"), Some(json!(2)));
        let keys: Vec<&str> = environ.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_pop_returns_last_entry() {
        let mut environ = Environ::new();
        environ.insert("first", 1);
        environ.insert("second", 2);

        assert_eq!(environ.pop(), Some(("second".to_string(), json!(2))));
        assert_eq!(environ.pop(), Some(("first".to_string(), json!(1))));
        assert_eq!(environ.pop(), None);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut environ = Environ::new();
        environ.insert("present", "kept");

        let value = environ.get_or_insert_with("present", || json!("ignored"));
        assert_eq!(*value, json!("kept"));

        let value = environ.get_or_insert_with("absent", || json!("default"));
        assert_eq!(*value, json!("default"));
        assert_eq!(environ.get("absent"), Some(&json!("default")));
    }

    #[test]
    fn test_extend_overwrites() {
        let mut environ = Environ::new();
        environ.insert("a", 1);
        environ.extend(vec![
            ("a".to_string(), json!(10)),
            ("b".to_string(), json!(20)),
        ]);

        assert_eq!(environ.get("a"), Some(&json!(10)));
        assert_eq!(environ.get("b"), Some(&json!(20)));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut environ = Environ::new();
        environ.insert("z", 1);
        environ.insert("a", 2);
        environ.insert("m", 3);

        let keys: Vec<&str> = environ.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
