//! The locale registry and resolution engine.
//!
//! A [`Registry`] owns every loaded [`BundleStore`], keyed by locale, and
//! resolves keys through a two-phase algorithm: *lookup* decides which
//! source owns a key (scanning the requested locale's stores in
//! registration order, then the default locale's), and *retrieve* decides
//! which locale variant of that source to materialize, lazily loading it
//! on first use. The [`LoadPolicy`] governs whether a missing exact-locale
//! variant falls back to the default locale (lenient) or fails with a
//! locale mismatch (strict).
//!
//! Registries are explicit values: construct one with [`Registry::builder`],
//! share it behind an `Arc`, and every operation is safe to call from any
//! thread.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::{
    builder::RegistryBuilder,
    discovery::{Association, Ledger, ScanPhase},
    error::Error,
    lifecycle::{InitClaim, Lifecycle},
    message,
    provider::SourceProvider,
    store::BundleStore,
    types::{BundleKey, LoadPolicy, Locale, SourceDecl},
};

type LocaleMap = HashMap<Locale, Vec<BundleStore>>;

/// The process-facing resource bundle registry.
pub struct Registry {
    stores: RwLock<LocaleMap>,
    ledger: Mutex<Ledger>,
    lifecycle: Lifecycle,
    provider: Box<dyn SourceProvider>,
    default_locale: RwLock<Locale>,
    policy: LoadPolicy,
    declared: Vec<SourceDecl>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        provider: Box<dyn SourceProvider>,
        default_locale: Locale,
        policy: LoadPolicy,
        declared: Vec<SourceDecl>,
    ) -> Self {
        Registry {
            stores: RwLock::new(HashMap::new()),
            ledger: Mutex::new(Ledger::new()),
            lifecycle: Lifecycle::new(),
            provider,
            default_locale: RwLock::new(default_locale),
            policy,
            declared,
        }
    }

    // Lock helpers. Every writer leaves the maps in a complete state, so a
    // poisoned lock is recovered rather than propagated.
    fn read_stores(&self) -> RwLockReadGuard<'_, LocaleMap> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_stores(&self) -> RwLockWriteGuard<'_, LocaleMap> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Guarantees the registry is initialized.
    ///
    /// The first caller runs the discovery scan; callers arriving during the
    /// scan block until it finishes; later callers return immediately. After
    /// a failed scan every call fails with [`Error::InitializationFailed`]
    /// until [`Registry::reinitialize`] is invoked.
    pub fn ensure_ready(&self) -> Result<(), Error> {
        match self.lifecycle.begin() {
            InitClaim::Ready => Ok(()),
            InitClaim::Failed(reason) => Err(Error::InitializationFailed { reason }),
            InitClaim::Run => {
                let outcome = {
                    let mut ledger = self.lock_ledger();
                    let default_locale = self.default_locale();
                    ledger.scan(&self.declared, |decl| {
                        self.load_and_insert(decl.id, &default_locale).map(|_| ())
                    })
                };
                match outcome {
                    Ok(()) => {
                        self.lifecycle.complete_ok();
                        Ok(())
                    }
                    Err(error) => {
                        let reason = error.to_string();
                        self.lifecycle.complete_err(reason.clone());
                        Err(Error::InitializationFailed { reason })
                    }
                }
            }
        }
    }

    /// Resets a failed (or initialized) registry and re-runs discovery.
    ///
    /// Already-loaded stores and recorded associations are kept; the scan
    /// skips sources that are still associated.
    pub fn reinitialize(&self) -> Result<(), Error> {
        self.lifecycle.reset();
        self.ensure_ready()
    }

    /// Registers a source for the current default locale.
    ///
    /// Registering an already-loaded pair is a logged no-op; a source with
    /// no backing data fails with [`Error::SourceNotFound`]. Directly
    /// registered sources are *not* recorded for replay: after a
    /// [`Registry::clear`] they stay gone until registered again.
    pub fn register(&self, source: &str) -> Result<(), Error> {
        self.ensure_ready()?;
        let locale = self.default_locale();
        self.load_and_insert(source, &locale)?;
        Ok(())
    }

    /// Registers a source for an explicit locale. See [`Registry::register`].
    pub fn register_with_locale(&self, source: &str, locale: &Locale) -> Result<(), Error> {
        self.ensure_ready()?;
        self.load_and_insert(source, locale)?;
        Ok(())
    }

    /// Loads and inserts a (source, locale) pair unless it is present.
    ///
    /// Returns whether a new store was inserted. The provider load happens
    /// outside the store lock; when two callers race, the first insert wins
    /// and the loser's load is discarded, preserving the never-overwrite
    /// invariant.
    fn load_and_insert(&self, source: &str, locale: &Locale) -> Result<bool, Error> {
        if self.exists(source, locale) {
            info!(source, locale = %locale, "bundle ignored, already registered");
            return Ok(false);
        }

        let entries = self.provider.load(source, locale)?;

        let mut stores = self.write_stores();
        let bucket = stores.entry(locale.clone()).or_default();
        if bucket.iter().any(|store| store.source() == source) {
            info!(source, locale = %locale, "bundle ignored, already registered");
            return Ok(false);
        }
        bucket.push(BundleStore::new(source, locale.clone(), entries));
        info!(source, locale = %locale, "bundle registered");
        Ok(true)
    }

    /// Returns whether a store is loaded for the (source, locale) pair.
    pub fn exists(&self, source: &str, locale: &Locale) -> bool {
        self.read_stores()
            .get(locale)
            .is_some_and(|bucket| bucket.iter().any(|store| store.source() == source))
    }

    /// Number of sources loaded for a locale; 0 for a never-touched locale.
    pub fn count(&self, locale: &Locale) -> usize {
        self.read_stores().get(locale).map_or(0, Vec::len)
    }

    /// Total number of loaded stores across all locales.
    pub fn count_all(&self) -> usize {
        self.read_stores().values().map(Vec::len).sum()
    }

    /// Source identifiers loaded for a locale, in registration order.
    pub fn list_sources(&self, locale: &Locale) -> Vec<String> {
        self.read_stores().get(locale).map_or_else(Vec::new, |bucket| {
            bucket
                .iter()
                .map(|store| store.source().to_string())
                .collect()
        })
    }

    /// A snapshot of the loaded store for a (source, locale) pair, if any.
    ///
    /// Stores are immutable once loaded, so the clone stays accurate until
    /// the next [`Registry::clear`].
    pub fn store(&self, source: &str, locale: &Locale) -> Option<BundleStore> {
        store_for(&self.read_stores(), locale, source).cloned()
    }

    /// Locales that currently have at least one loaded store.
    pub fn locales(&self) -> Vec<Locale> {
        self.read_stores()
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(locale, _)| locale.clone())
            .collect()
    }

    /// Removes every loaded store, then replays recorded discovery
    /// associations in ascending priority order.
    ///
    /// Auto-discovered sources reappear; directly registered ones do not.
    pub fn clear(&self) -> Result<(), Error> {
        self.ensure_ready()?;

        {
            let mut stores = self.write_stores();
            let removed: usize = stores.values().map(Vec::len).sum();
            stores.clear();
            info!(removed, "registry cleared");
        }

        let replay = self.lock_ledger().replay_order();
        let default_locale = self.default_locale();
        for association in replay {
            debug!(source = %association.source, "replaying discovered source");
            self.load_and_insert(&association.source, &default_locale)?;
        }
        Ok(())
    }

    /// Discards all discovery associations.
    ///
    /// Unlike [`Registry::clear`], loaded stores stay in place; the next
    /// clear simply has nothing to replay, and a re-initialization will
    /// discover the declared sources afresh.
    pub fn forget_associations(&self) {
        self.lock_ledger().forget();
        info!("discovery associations forgotten");
    }

    /// A snapshot of the recorded discovery associations.
    pub fn associations(&self) -> Vec<Association> {
        self.lock_ledger().associations().to_vec()
    }

    /// Progress of the discovery scan.
    pub fn scan_phase(&self) -> ScanPhase {
        self.lock_ledger().phase()
    }

    /// The locale used when no explicit locale is supplied, and the
    /// fallback target of the lenient policy.
    pub fn default_locale(&self) -> Locale {
        self.default_locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overrides the default locale.
    ///
    /// Already-loaded stores are not reloaded; only subsequent lookups,
    /// registrations, and replays see the new default.
    pub fn set_default_locale(&self, locale: Locale) {
        let mut guard = self
            .default_locale
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        info!(from = %guard, to = %locale, "default locale changed");
        *guard = locale;
    }

    /// The locale fallback policy this registry was built with.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Resolves a key in the current default locale.
    pub fn get(&self, key: &str) -> Result<String, Error> {
        self.get_with_locale(key, &self.default_locale())
    }

    /// Resolves a key in an explicit locale.
    pub fn get_with_locale(&self, key: &str, locale: &Locale) -> Result<String, Error> {
        self.get_with_args(key, locale, &[])
    }

    /// Resolves a key and substitutes positional `{0}`-style placeholders
    /// with `args`, in order.
    pub fn get_with_args(
        &self,
        key: &str,
        locale: &Locale,
        args: &[&dyn Display],
    ) -> Result<String, Error> {
        self.ensure_ready()?;
        let owner = self.lookup_owner(key, locale)?;
        let template = self.retrieve(&owner, key, locale)?;
        Ok(message::format_positional(&template, args))
    }

    /// Resolves a symbolic key in the current default locale.
    pub fn resolve(&self, key: &BundleKey) -> Result<String, Error> {
        self.get(&key.qualified())
    }

    /// Resolves a symbolic key in an explicit locale.
    pub fn resolve_with_locale(&self, key: &BundleKey, locale: &Locale) -> Result<String, Error> {
        self.get_with_locale(&key.qualified(), locale)
    }

    /// Resolves a symbolic key with positional arguments.
    pub fn resolve_with_args(
        &self,
        key: &BundleKey,
        locale: &Locale,
        args: &[&dyn Display],
    ) -> Result<String, Error> {
        self.get_with_args(&key.qualified(), locale, args)
    }

    /// Lookup phase: decides which source owns `key` for `locale`.
    ///
    /// Scans the requested locale's stores in registration order, then the
    /// default locale's. Under the strict policy a hit that only exists in
    /// the default locale is a locale mismatch rather than a fallback.
    fn lookup_owner(&self, key: &str, locale: &Locale) -> Result<String, Error> {
        let default_locale = self.default_locale();
        let stores = self.read_stores();

        if !stores.values().any(|bucket| !bucket.is_empty()) {
            return Err(Error::NoBundleRegistered);
        }

        if let Some(owner) = owner_in(&stores, locale, key) {
            return Ok(owner);
        }

        if *locale == default_locale {
            return Err(Error::key_not_found(key, locale));
        }

        match owner_in(&stores, &default_locale, key) {
            None => Err(Error::key_not_found(key, locale)),
            Some(owner) => match self.policy {
                LoadPolicy::Lenient => {
                    debug!(key, requested = %locale, fallback = %default_locale,
                        "key resolved through default locale");
                    Ok(owner)
                }
                LoadPolicy::Strict => Err(Error::LocaleMismatch {
                    source: owner,
                    requested: locale.to_string(),
                    default: default_locale.to_string(),
                }),
            },
        }
    }

    /// Retrieve phase: picks the locale variant of `source` to read `key`
    /// from, lazily materializing the requested locale's variant.
    fn retrieve(&self, source: &str, key: &str, locale: &Locale) -> Result<String, Error> {
        if !self.exists(source, locale) {
            match self.load_and_insert(source, locale) {
                Ok(_) => {}
                Err(Error::SourceNotFound { .. }) => {
                    let default_locale = self.default_locale();
                    if self.policy == LoadPolicy::Strict && *locale != default_locale {
                        return Err(Error::LocaleMismatch {
                            source: source.to_string(),
                            requested: locale.to_string(),
                            default: default_locale.to_string(),
                        });
                    }
                    // Lenient: fall through to the default locale's store.
                }
                Err(error) => return Err(error),
            }
        }

        let default_locale = self.default_locale();
        let stores = self.read_stores();
        let store = store_for(&stores, locale, source)
            .or_else(|| store_for(&stores, &default_locale, source))
            .ok_or_else(|| Error::BundleNotFound {
                source: source.to_string(),
                locale: locale.to_string(),
            })?;

        match store.get(key) {
            Some(template) => Ok(template.to_string()),
            None => Err(Error::key_not_found(key, locale)),
        }
    }
}

fn owner_in(stores: &LocaleMap, locale: &Locale, key: &str) -> Option<String> {
    stores.get(locale).and_then(|bucket| {
        bucket
            .iter()
            .find(|store| store.contains_key(key))
            .map(|store| store.source().to_string())
    })
}

fn store_for<'a>(stores: &'a LocaleMap, locale: &Locale, source: &str) -> Option<&'a BundleStore> {
    stores
        .get(locale)
        .and_then(|bucket| bucket.iter().find(|store| store.source() == source))
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("default_locale", &self.default_locale().to_string())
            .field("policy", &self.policy)
            .field("stores", &self.count_all())
            .field("declared", &self.declared.len())
            .finish()
    }
}
