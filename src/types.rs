//! Core types for resbundle.
//! The registry, discovery, and resolution modules all build on these.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A language/region dimension used to select a bundle variant
/// (e.g. `en`, `fr-FR`).
///
/// Locales act purely as lookup keys: resolution uses exact matches plus a
/// single configured default, no negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parses a BCP-47 locale string, normalizing its case
    /// (`fr-fr` → `fr-FR`).
    pub fn new(tag: &str) -> Result<Self, Error> {
        let id: LanguageIdentifier = tag
            .parse()
            .map_err(|_| Error::InvalidLocale(tag.to_string()))?;
        Ok(Locale(id.to_string()))
    }

    /// Returns the canonical string form of this locale.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the parsed language identifier for this locale.
    pub fn language_identifier(&self) -> LanguageIdentifier {
        // The constructor only accepts strings that already parsed.
        self.0.parse().unwrap_or_default()
    }

    /// Check whether two locales share the same primary language,
    /// ignoring region (`en` vs `en-US`).
    pub fn same_language(&self, other: &Locale) -> bool {
        self.language_identifier().language == other.language_identifier().language
    }
}

impl Default for Locale {
    /// English, matching the conventional resource-bundle default.
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::new(s)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locale fallback policy applied during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// The exact requested locale must have the key/bundle; a miss is a
    /// locale-mismatch error.
    Strict,

    /// A miss on the requested locale falls back once to the registry's
    /// default locale.
    #[default]
    Lenient,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STRICT" => Ok(LoadPolicy::Strict),
            "LENIENT" => Ok(LoadPolicy::Lenient),
            _ => Err(format!("Unknown load policy: {}", s)),
        }
    }
}

/// A statically-declared discoverable source.
///
/// Each declaration names a loadable set of key/value pairs (`id`), the
/// prefix its keys live under (`root`), and a registration priority.
/// Discovery registers declarations in ascending priority order; combined
/// with the never-overwrite rule, the lowest-numbered source wins any key
/// declared by several sources.
///
/// Declarations are plain statics so a crate can export its bundle table:
///
/// ```rust
/// use resbundle::SourceDecl;
///
/// pub static APP_BUNDLE: SourceDecl = SourceDecl::new("i18n/app", "app.", 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDecl {
    /// Source identifier: a path-like name, opaque to the engine.
    pub id: &'static str,
    /// Key prefix ("root") for symbolic keys declared against this source.
    pub root: &'static str,
    /// Registration priority; lower numbers register first.
    pub priority: i32,
}

impl SourceDecl {
    pub const fn new(id: &'static str, root: &'static str, priority: i32) -> Self {
        SourceDecl { id, root, priority }
    }
}

/// A typed symbolic key: a reference to its declaring source plus a local
/// key suffix.
///
/// Resolution composes `root + "." + suffix` (without doubling the
/// separator when the root already ends in a dot) and delegates to the
/// string-key path, so declared keys stay cheap and `Copy`:
///
/// ```rust
/// use resbundle::{BundleKey, SourceDecl};
///
/// pub static APP_BUNDLE: SourceDecl = SourceDecl::new("i18n/app", "app.", 1);
/// pub static GREETING: BundleKey = BundleKey::new(&APP_BUNDLE, "greeting");
///
/// assert_eq!(GREETING.qualified(), "app.greeting");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleKey {
    /// The declaring source's metadata.
    pub source: &'static SourceDecl,
    /// Local key suffix, relative to the source's root.
    pub suffix: &'static str,
}

impl BundleKey {
    pub const fn new(source: &'static SourceDecl, suffix: &'static str) -> Self {
        BundleKey { source, suffix }
    }

    /// The fully-qualified key this symbolic key resolves through.
    pub fn qualified(&self) -> String {
        let root = self.source.root;
        if root.is_empty() {
            self.suffix.to_string()
        } else if root.ends_with('.') {
            format!("{}{}", root, self.suffix)
        } else {
            format!("{}.{}", root, self.suffix)
        }
    }
}

impl Display for BundleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_DECL: SourceDecl = SourceDecl::new("i18n/test", "test.", 7);
    static BARE_DECL: SourceDecl = SourceDecl::new("i18n/bare", "bare", 8);
    static ROOTLESS_DECL: SourceDecl = SourceDecl::new("i18n/rootless", "", 9);

    #[test]
    fn test_locale_parse_and_display() {
        let locale = Locale::new("fr-FR").unwrap();
        assert_eq!(locale.as_str(), "fr-FR");
        assert_eq!(locale.to_string(), "fr-FR");
    }

    #[test]
    fn test_locale_normalizes_case() {
        let locale = Locale::new("fr-fr").unwrap();
        assert_eq!(locale.as_str(), "fr-FR");
        assert_eq!(locale, Locale::new("FR-fr").unwrap());
    }

    #[test]
    fn test_locale_rejects_garbage() {
        assert!(Locale::new("not a locale").is_err());
        assert!(matches!(
            Locale::new("not a locale"),
            Err(Error::InvalidLocale(_))
        ));
    }

    #[test]
    fn test_locale_same_language() {
        let en = Locale::new("en").unwrap();
        let en_us = Locale::new("en-US").unwrap();
        let fr = Locale::new("fr").unwrap();
        assert!(en.same_language(&en_us));
        assert!(!en.same_language(&fr));
    }

    #[test]
    fn test_load_policy_from_str() {
        assert_eq!(LoadPolicy::from_str("strict").unwrap(), LoadPolicy::Strict);
        assert_eq!(
            LoadPolicy::from_str("LENIENT").unwrap(),
            LoadPolicy::Lenient
        );
        assert!(LoadPolicy::from_str("loose").is_err());
    }

    #[test]
    fn test_load_policy_default_is_lenient() {
        assert_eq!(LoadPolicy::default(), LoadPolicy::Lenient);
    }

    #[test]
    fn test_bundle_key_qualified_with_trailing_dot_root() {
        let key = BundleKey::new(&TEST_DECL, "message.hello");
        assert_eq!(key.qualified(), "test.message.hello");
    }

    #[test]
    fn test_bundle_key_qualified_without_trailing_dot() {
        let key = BundleKey::new(&BARE_DECL, "message.hello");
        assert_eq!(key.qualified(), "bare.message.hello");
    }

    #[test]
    fn test_bundle_key_qualified_empty_root() {
        let key = BundleKey::new(&ROOTLESS_DECL, "message.hello");
        assert_eq!(key.qualified(), "message.hello");
    }

    #[test]
    fn test_bundle_key_display() {
        let key = BundleKey::new(&TEST_DECL, "greeting");
        assert_eq!(format!("{}", key), "test.greeting");
    }
}
