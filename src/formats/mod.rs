//! All supported on-disk bundle formats.
//!
//! This module re-exports the main types for each format and provides the
//! [`FormatType`] enum plus the dispatch that turns any backing file into
//! the flat key/value map a bundle store is built from.

pub mod csv;
pub mod json;
pub mod properties;
pub mod xml;

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use csv::BundleRecord;
pub use json::Format as JsonFormat;
pub use properties::Format as PropertiesFormat;
pub use xml::Format as XmlFormat;

use crate::{Error, traits::Parser};

/// File extensions a provider probes for, in precedence order.
///
/// A source backed by several formats at once resolves to the first match,
/// so the order is part of the loading contract.
pub const EXTENSION_PRECEDENCE: [&str; 4] = ["properties", "json", "xml", "csv"];

/// Represents all supported bundle file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Java-style `.properties` files.
    Properties,
    /// Flat or nested JSON objects.
    Json,
    /// `<bundle><entry key="…">` XML documents.
    Xml,
    /// Two-column `key,value` CSV files.
    Csv,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Properties => write!(f, "properties"),
            FormatType::Json => write!(f, "json"),
            FormatType::Xml => write!(f, "xml"),
            FormatType::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "properties" | "props" => Ok(FormatType::Properties),
            "json" => Ok(FormatType::Json),
            "xml" => Ok(FormatType::Xml),
            "csv" => Ok(FormatType::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Properties => "properties",
            FormatType::Json => "json",
            FormatType::Xml => "xml",
            FormatType::Csv => "csv",
        }
    }
}

/// Infers a [`FormatType`] from a file path's extension.
///
/// Returns `Some(FormatType)` if the extension matches a known format,
/// otherwise `None`.
///
/// # Example
/// ```rust
/// use resbundle::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(
///     infer_format_from_extension("app_en.properties"),
///     Some(FormatType::Properties)
/// );
/// assert_eq!(infer_format_from_extension("app_en.json"), Some(FormatType::Json));
/// assert_eq!(infer_format_from_extension("app_en.txt"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    match path.as_ref().extension().and_then(|s| s.to_str()) {
        Some("properties") => Some(FormatType::Properties),
        Some("json") => Some(FormatType::Json),
        Some("xml") => Some(FormatType::Xml),
        Some("csv") => Some(FormatType::Csv),
        _ => None,
    }
}

/// Reads a bundle file with an explicit format, producing the flat entry
/// map a store is built from.
///
/// Duplicate keys within one file keep the last occurrence, matching how
/// line-oriented bundle formats have always behaved.
pub fn read_path_as<P: AsRef<Path>>(
    path: P,
    format: FormatType,
) -> Result<HashMap<String, String>, Error> {
    let path = path.as_ref();
    let entries = match format {
        FormatType::Properties => PropertiesFormat::read_from(path)?
            .pairs
            .into_iter()
            .map(|pair| (pair.key, pair.value))
            .collect(),
        FormatType::Json => JsonFormat::read_from(path)?.entries.into_iter().collect(),
        FormatType::Xml => XmlFormat::read_from(path)?
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect(),
        FormatType::Csv => Vec::<BundleRecord>::read_from(path)?
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect(),
    };
    Ok(entries)
}

/// Reads a bundle file, inferring its format from the file extension.
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, Error> {
    let format = infer_format_from_extension(&path).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "cannot infer bundle format from extension: {:?}",
            path.as_ref().extension()
        ))
    })?;
    read_path_as(path, format)
}
