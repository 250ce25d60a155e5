//! Builder for creating a [`Registry`] with a fluent interface.
//!
//! Everything the registry depends on is injected here (default locale,
//! fallback policy, source provider, declared-source table), so tests and
//! embedders get isolated instances instead of process-wide state.
//!
//! # Example
//!
//! ```rust,no_run
//! use resbundle::{LoadPolicy, Locale, Registry, SourceDecl};
//!
//! static APP: SourceDecl = SourceDecl::new("i18n/app", "app.", 1);
//!
//! let registry = Registry::builder()
//!     .with_default_locale(Locale::new("en")?)
//!     .with_policy(LoadPolicy::Lenient)
//!     .with_base_dir("resources")
//!     .declare(&APP)
//!     .build();
//! registry.ensure_ready()?;
//! # Ok::<(), resbundle::Error>(())
//! ```

use crate::{
    provider::{DirProvider, SourceProvider},
    registry::Registry,
    types::{LoadPolicy, Locale, SourceDecl},
};

/// The conventional bundle directory used when no provider is injected.
const DEFAULT_BASE_DIR: &str = "i18n";

pub struct RegistryBuilder {
    default_locale: Locale,
    policy: LoadPolicy,
    declared: Vec<SourceDecl>,
    provider: Option<Box<dyn SourceProvider>>,
}

impl RegistryBuilder {
    /// Creates a builder with the defaults: English default locale, lenient
    /// policy, no declared sources, and a [`DirProvider`] over `i18n/`.
    pub fn new() -> Self {
        RegistryBuilder {
            default_locale: Locale::default(),
            policy: LoadPolicy::default(),
            declared: Vec::new(),
            provider: None,
        }
    }

    /// Sets the default locale (used for lookups without an explicit locale
    /// and as the lenient fallback target).
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Sets the locale fallback policy.
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Injects the provider bundle data is loaded through.
    pub fn with_provider(mut self, provider: impl SourceProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Shorthand for a [`DirProvider`] rooted at `base`.
    pub fn with_base_dir(self, base: impl Into<std::path::PathBuf>) -> Self {
        self.with_provider(DirProvider::new(base.into()))
    }

    /// Declares one discoverable source.
    pub fn declare(mut self, decl: &SourceDecl) -> Self {
        self.declared.push(decl.clone());
        self
    }

    /// Declares a whole table of discoverable sources.
    pub fn with_sources(mut self, decls: impl IntoIterator<Item = SourceDecl>) -> Self {
        self.declared.extend(decls);
        self
    }

    /// Builds the registry. Discovery does not run here; the first
    /// [`Registry::ensure_ready`] (or any operation that needs readiness)
    /// triggers it.
    pub fn build(self) -> Registry {
        let provider = self
            .provider
            .unwrap_or_else(|| Box::new(DirProvider::new(DEFAULT_BASE_DIR)));
        Registry::from_parts(provider, self.default_locale, self.policy, self.declared)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;

    static APP: SourceDecl = SourceDecl::new("i18n/app", "app.", 1);

    #[test]
    fn test_builder_defaults() {
        let registry = RegistryBuilder::new().build();
        assert_eq!(registry.default_locale().as_str(), "en");
        assert_eq!(registry.policy(), LoadPolicy::Lenient);
    }

    #[test]
    fn test_builder_overrides() {
        let registry = RegistryBuilder::new()
            .with_default_locale(Locale::new("fr-FR").unwrap())
            .with_policy(LoadPolicy::Strict)
            .with_provider(MemoryProvider::new())
            .declare(&APP)
            .build();
        assert_eq!(registry.default_locale().as_str(), "fr-FR");
        assert_eq!(registry.policy(), LoadPolicy::Strict);
    }
}
