//! Support for CSV bundle files.
//!
//! Two columns, `key,value`, no header row. Extra columns are rejected so
//! a mis-exported spreadsheet fails loudly instead of silently truncating.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

/// One `key,value` row of a CSV bundle file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BundleRecord {
    pub key: String,
    pub value: String,
}

impl Parser for Vec<BundleRecord> {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for record in self {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_csv() {
        let csv_content = "app.title,My App\napp.greeting,Hello {0}\n";
        let records = Vec::<BundleRecord>::from_reader(Cursor::new(csv_content)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "app.title");
        assert_eq!(records[0].value, "My App");
        assert_eq!(records[1].value, "Hello {0}");
    }

    #[test]
    fn test_quoted_value_with_comma() {
        let csv_content = "list,\"a, b, c\"\n";
        let records = Vec::<BundleRecord>::from_reader(Cursor::new(csv_content)).unwrap();
        assert_eq!(records[0].value, "a, b, c");
    }

    #[test]
    fn test_empty_value() {
        let csv_content = "empty,\n";
        let records = Vec::<BundleRecord>::from_reader(Cursor::new(csv_content)).unwrap();
        assert_eq!(records[0].key, "empty");
        assert_eq!(records[0].value, "");
    }

    #[test]
    fn test_extra_column_rejected() {
        let csv_content = "key,value,surprise\n";
        assert!(Vec::<BundleRecord>::from_reader(Cursor::new(csv_content)).is_err());
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            BundleRecord {
                key: "a".to_string(),
                value: "1".to_string(),
            },
            BundleRecord {
                key: "b".to_string(),
                value: "with, comma".to_string(),
            },
        ];
        let mut output = Vec::new();
        records.to_writer(&mut output).unwrap();
        let reparsed =
            Vec::<BundleRecord>::from_reader(Cursor::new(String::from_utf8(output).unwrap()))
                .unwrap();
        assert_eq!(records, reparsed);
    }
}
