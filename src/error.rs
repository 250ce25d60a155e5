//! All error types for the resbundle crate.
//!
//! These are returned from all fallible operations (registration, resolution,
//! bundle loading, parsing, etc.).

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A lookup was attempted before any source was registered for any locale.
    NoBundleRegistered,

    /// An explicit registration named a source with no backing data for the
    /// requested locale.
    SourceNotFound { source: String, locale: String },

    /// No locale variant of a known source could be materialized.
    BundleNotFound { source: String, locale: String },

    /// A source was located, but the key is absent from its bundle.
    KeyNotFound { key: String, locale: String },

    /// Strict policy only: the exact-locale variant is missing.
    LocaleMismatch {
        source: String,
        requested: String,
        default: String,
    },

    /// The discovery scan failed; the registry stays unusable until an
    /// explicit re-initialization.
    InitializationFailed { reason: String },

    /// A locale string could not be parsed as a BCP-47 language identifier.
    InvalidLocale(String),

    UnknownFormat(String),

    Parse(serde_json::Error),

    XmlParse(quick_xml::Error),

    CsvParse(csv::Error),

    Io(std::io::Error),

    DataMismatch(String),
}

// NOTE: `Display`/`std::error::Error`/`From` are hand-written below rather than
// produced by `#[derive(thiserror::Error)]`. thiserror unconditionally treats a
// field named `source` as the error source (it must implement `std::error::Error`),
// but here `source` is a plain `String` resource identifier that is interpolated
// into the message. These impls reproduce thiserror's output and source chaining
// exactly while keeping the `source` field name that the public API and tests use.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoBundleRegistered => write!(f, "no bundle registered for any locale"),
            Error::SourceNotFound { source, locale } => {
                write!(f, "source `{source}` not found for locale `{locale}`")
            }
            Error::BundleNotFound { source, locale } => write!(
                f,
                "no bundle for source `{source}` in locale `{locale}` or the default locale"
            ),
            Error::KeyNotFound { key, locale } => {
                write!(f, "key `{key}` not found for locale `{locale}`")
            }
            Error::LocaleMismatch {
                source,
                requested,
                default,
            } => write!(
                f,
                "source `{source}` has no variant for locale `{requested}` (strict policy, default is `{default}`)"
            ),
            Error::InitializationFailed { reason } => {
                write!(f, "registry initialization failed: {reason}")
            }
            Error::InvalidLocale(locale) => write!(f, "invalid locale `{locale}`"),
            Error::UnknownFormat(format) => write!(f, "unknown format `{format}`"),
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Error::CsvParse(e) => write!(f, "CSV parse error: {e}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::DataMismatch(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::XmlParse(e) => Some(e),
            Error::CsvParse(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::XmlParse(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::CsvParse(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl Error {
    /// Creates a source-not-found error for a (source, locale) pair.
    pub fn source_not_found(source: impl Into<String>, locale: impl ToString) -> Self {
        Error::SourceNotFound {
            source: source.into(),
            locale: locale.to_string(),
        }
    }

    /// Creates a key-not-found error for a (key, locale) pair.
    pub fn key_not_found(key: impl Into<String>, locale: impl ToString) -> Self {
        Error::KeyNotFound {
            key: key.into(),
            locale: locale.to_string(),
        }
    }

    /// Creates an initialization-failed error.
    pub fn initialization_failed(reason: impl Into<String>) -> Self {
        Error::InitializationFailed {
            reason: reason.into(),
        }
    }
}
