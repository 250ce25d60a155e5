//! The materialized key/value map for one (source, locale) pair.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::Locale;

/// An immutable-once-loaded bundle of key→value entries, scoped to one
/// (source identifier, locale) pair.
///
/// Stores are created by the registry the first time a pair is registered
/// and never mutated afterwards; re-registration of the same pair is a
/// no-op and a full registry clear is the only way a store goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleStore {
    source: String,
    locale: Locale,
    entries: HashMap<String, String>,
}

impl BundleStore {
    pub(crate) fn new(
        source: impl Into<String>,
        locale: Locale,
        entries: HashMap<String, String>,
    ) -> Self {
        BundleStore {
            source: source.into(),
            locale,
            entries,
        }
    }

    /// The source identifier this store was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The locale variant this store holds.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Looks up the raw template for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all keys in this store (unordered).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BundleStore {
        let mut entries = HashMap::new();
        entries.insert("app.title".to_string(), "My App".to_string());
        entries.insert("app.greeting".to_string(), "Hello {0}".to_string());
        BundleStore::new("i18n/app", Locale::new("en").unwrap(), entries)
    }

    #[test]
    fn test_identity_accessors() {
        let store = store();
        assert_eq!(store.source(), "i18n/app");
        assert_eq!(store.locale().as_str(), "en");
    }

    #[test]
    fn test_get_and_contains() {
        let store = store();
        assert_eq!(store.get("app.title"), Some("My App"));
        assert!(store.contains_key("app.greeting"));
        assert_eq!(store.get("app.missing"), None);
    }

    #[test]
    fn test_len_and_keys() {
        let store = store();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        let mut keys: Vec<_> = store.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["app.greeting", "app.title"]);
    }
}
