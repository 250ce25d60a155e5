#![forbid(unsafe_code)]
//! Locale-aware resource bundle registry for Rust.
//!
//! A [`Registry`] discovers, registers, caches, and resolves textual
//! entries keyed by a source identifier and a locale, with a configurable
//! strict/lenient fallback policy and positional `{0}`-style message
//! formatting. All operations are thread-safe; share one registry behind
//! an `Arc` and call it from anywhere.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resbundle::{BundleKey, Locale, Registry, SourceDecl};
//!
//! // Declare discoverable sources once, as plain statics.
//! static APP: SourceDecl = SourceDecl::new("i18n/app", "app.", 1);
//! static GREETING: BundleKey = BundleKey::new(&APP, "greeting");
//!
//! let registry = Registry::builder()
//!     .with_base_dir("resources")
//!     .declare(&APP)
//!     .build();
//!
//! // First use runs discovery; `i18n/app` is loaded for the default locale.
//! let title = registry.get("app.title")?;
//! let hello = registry.resolve_with_args(&GREETING, &Locale::new("fr")?, &[&"Ada"])?;
//! # Ok::<(), resbundle::Error>(())
//! ```
//!
//! # Features
//!
//! - Idempotent registration: a (source, locale) pair, once loaded, is
//!   never replaced; duplicate registrations are logged no-ops
//! - Priority-ordered auto-discovery of declared sources with replay after
//!   [`Registry::clear`]
//! - Strict or lenient locale fallback, decided per registry
//! - Bundle data from `.properties`, JSON, XML, or CSV files, or from
//!   memory via [`MemoryProvider`]
//! - One-time initialization lifecycle with explicit re-initialization
//!   after a failed discovery scan

pub mod builder;
pub mod discovery;
pub mod error;
pub mod formats;
mod lifecycle;
pub mod message;
pub mod provider;
pub mod registry;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    builder::RegistryBuilder,
    discovery::{Association, ScanPhase, SourceKind},
    error::Error,
    formats::FormatType,
    provider::{DirProvider, MemoryProvider, SourceProvider},
    registry::Registry,
    store::BundleStore,
    types::{BundleKey, LoadPolicy, Locale, SourceDecl},
};
