//! Source providers: where bundle data comes from.
//!
//! The registry is format- and storage-agnostic; a [`SourceProvider`]
//! resolves a (source identifier, locale) pair to raw key/value entries.
//! [`DirProvider`] reads conventional bundle files from a directory tree;
//! [`MemoryProvider`] serves embedded or test data.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    formats::{self, EXTENSION_PRECEDENCE},
    types::Locale,
};

/// Resolves backing data for a (source, locale) pair.
///
/// Loads are synchronous: they either produce the full entry map or fail.
/// A missing pair must be reported as [`Error::SourceNotFound`] so the
/// registry can distinguish "no such variant" from a real read failure.
pub trait SourceProvider: Send + Sync {
    /// Loads all entries for the given source and locale.
    fn load(&self, source: &str, locale: &Locale) -> Result<HashMap<String, String>, Error>;

    /// Returns whether backing data exists for the given source and locale,
    /// without loading it.
    fn exists(&self, source: &str, locale: &Locale) -> bool;
}

/// Loads bundle files from a base directory.
///
/// A source `i18n/app` in locale `fr-FR` resolves to
/// `<base>/i18n/app_fr-FR.<ext>`, probing extensions in
/// [`EXTENSION_PRECEDENCE`] order. The source identifier is treated as a
/// relative path, so identifiers may nest into subdirectories.
#[derive(Debug, Clone)]
pub struct DirProvider {
    base: PathBuf,
}

impl DirProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirProvider { base: base.into() }
    }

    /// The base directory bundle files are resolved under.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn candidate(&self, source: &str, locale: &Locale, extension: &str) -> PathBuf {
        self.base
            .join(format!("{}_{}.{}", source, locale, extension))
    }

    fn find(&self, source: &str, locale: &Locale) -> Option<PathBuf> {
        EXTENSION_PRECEDENCE
            .iter()
            .map(|ext| self.candidate(source, locale, ext))
            .find(|path| path.is_file())
    }
}

impl SourceProvider for DirProvider {
    fn load(&self, source: &str, locale: &Locale) -> Result<HashMap<String, String>, Error> {
        match self.find(source, locale) {
            Some(path) => formats::read_path(&path),
            None => Err(Error::source_not_found(source, locale)),
        }
    }

    fn exists(&self, source: &str, locale: &Locale) -> bool {
        self.find(source, locale).is_some()
    }
}

/// Serves bundle data from memory.
///
/// Useful for embedded defaults and for tests that should not touch the
/// filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    bundles: HashMap<(String, String), HashMap<String, String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or extends) the bundle for a (source, locale) pair.
    pub fn insert<K, V>(
        &mut self,
        source: &str,
        locale: &Locale,
        entries: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let bundle = self
            .bundles
            .entry((source.to_string(), locale.to_string()))
            .or_default();
        for (key, value) in entries {
            bundle.insert(key.into(), value.into());
        }
    }

    /// Builder-style variant of [`MemoryProvider::insert`].
    pub fn with_bundle<K, V>(
        mut self,
        source: &str,
        locale: &Locale,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(source, locale, entries);
        self
    }
}

impl SourceProvider for MemoryProvider {
    fn load(&self, source: &str, locale: &Locale) -> Result<HashMap<String, String>, Error> {
        self.bundles
            .get(&(source.to_string(), locale.to_string()))
            .cloned()
            .ok_or_else(|| Error::source_not_found(source, locale))
    }

    fn exists(&self, source: &str, locale: &Locale) -> bool {
        self.bundles
            .contains_key(&(source.to_string(), locale.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale::new("en").unwrap()
    }

    fn fr() -> Locale {
        Locale::new("fr").unwrap()
    }

    #[test]
    fn test_memory_provider_load_and_exists() {
        let provider =
            MemoryProvider::new().with_bundle("i18n/app", &en(), [("app.title", "My App")]);

        assert!(provider.exists("i18n/app", &en()));
        assert!(!provider.exists("i18n/app", &fr()));

        let entries = provider.load("i18n/app", &en()).unwrap();
        assert_eq!(entries["app.title"], "My App");

        assert!(matches!(
            provider.load("i18n/app", &fr()),
            Err(Error::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_memory_provider_insert_extends() {
        let mut provider = MemoryProvider::new();
        provider.insert("s", &en(), [("a", "1")]);
        provider.insert("s", &en(), [("b", "2")]);
        let entries = provider.load("s", &en()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_dir_provider_resolves_by_convention() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("i18n")).unwrap();
        std::fs::write(
            dir.path().join("i18n/app_en.properties"),
            "app.title = My App\n",
        )
        .unwrap();

        let provider = DirProvider::new(dir.path());
        assert!(provider.exists("i18n/app", &en()));
        assert!(!provider.exists("i18n/app", &fr()));

        let entries = provider.load("i18n/app", &en()).unwrap();
        assert_eq!(entries["app.title"], "My App");
    }

    #[test]
    fn test_dir_provider_extension_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app_en.properties"), "origin = properties\n").unwrap();
        std::fs::write(dir.path().join("app_en.json"), r#"{"origin": "json"}"#).unwrap();

        let provider = DirProvider::new(dir.path());
        let entries = provider.load("app", &en()).unwrap();
        assert_eq!(entries["origin"], "properties");
    }

    #[test]
    fn test_dir_provider_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirProvider::new(dir.path());
        assert!(matches!(
            provider.load("ghost", &en()),
            Err(Error::SourceNotFound { .. })
        ));
    }
}
