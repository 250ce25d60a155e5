//! Support for JSON bundle files.
//!
//! A bundle is a JSON object whose values are strings, numbers, booleans,
//! or nested objects. Nested objects are flattened with dot-joined keys, so
//! `{"app": {"title": "My App"}}` yields the key `app.title`.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde_json::Value;

use crate::{error::Error, traits::Parser};

/// Represents a parsed JSON bundle file as flattened key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Flattened pairs, sorted by key (JSON objects carry no order).
    pub entries: BTreeMap<String, String>,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader)?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::DataMismatch(format!(
                    "bundle JSON must be an object, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            flatten_into(&key, value, &mut entries)?;
        }
        Ok(Format { entries })
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, &self.entries).map_err(Error::Parse)
    }
}

fn flatten_into(
    prefix: &str,
    value: Value,
    out: &mut BTreeMap<String, String>,
) -> Result<(), Error> {
    match value {
        Value::String(s) => {
            out.insert(prefix.to_string(), s);
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{}.{}", prefix, key), nested, out)?;
            }
        }
        other => {
            return Err(Error::DataMismatch(format!(
                "unsupported value for key `{}`: {}",
                prefix,
                json_kind(&other)
            )));
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    #[test]
    fn test_parse_flat_object() {
        let json = r#"{"app.title": "My App", "app.greeting": "Hello {0}"}"#;
        let parsed = Format::from_str(json).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries["app.title"], "My App");
        assert_eq!(parsed.entries["app.greeting"], "Hello {0}");
    }

    #[test]
    fn test_parse_nested_object_flattens() {
        let json = indoc! {r#"
            {
                "app": {
                    "title": "My App",
                    "menu": { "exit": "Quit" }
                }
            }
        "#};
        let parsed = Format::from_str(json).unwrap();
        assert_eq!(parsed.entries["app.title"], "My App");
        assert_eq!(parsed.entries["app.menu.exit"], "Quit");
    }

    #[test]
    fn test_scalars_stringified() {
        let json = r#"{"count": 3, "enabled": true}"#;
        let parsed = Format::from_str(json).unwrap();
        assert_eq!(parsed.entries["count"], "3");
        assert_eq!(parsed.entries["enabled"], "true");
    }

    #[test]
    fn test_array_rejected() {
        let json = r#"{"items": ["a", "b"]}"#;
        let error = Format::from_str(json).unwrap_err();
        assert!(error.to_string().contains("items"));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(Format::from_str(r#"["a"]"#).is_err());
        assert!(Format::from_str(r#""just a string""#).is_err());
    }

    #[test]
    fn test_round_trip() {
        let json = r#"{"a": "1", "b": "2"}"#;
        let parsed = Format::from_str(json).unwrap();
        let mut output = Vec::new();
        parsed.to_writer(&mut output).unwrap();
        let reparsed = Format::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
