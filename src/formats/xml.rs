//! Support for XML bundle files.
//!
//! A bundle document is a `<bundle>` element containing `<entry key="…">`
//! children whose text is the value:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <bundle>
//!     <entry key="app.title">My App</entry>
//!     <entry key="app.empty"/>
//! </bundle>
//! ```

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Format {
    pub entries: Vec<XmlEntry>,
}

/// One `<entry>` element of an XML bundle document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlEntry {
    pub key: String,
    pub value: String,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut entries = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"entry" => {
                    let key = entry_key(e)?;
                    let value = read_entry_text(&mut xml_reader)?;
                    entries.push(XmlEntry { key, value });
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"entry" => {
                    let key = entry_key(e)?;
                    entries.push(XmlEntry {
                        key,
                        value: String::new(),
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format { entries })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("bundle")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for entry in &self.entries {
            let mut elem = BytesStart::new("entry");
            elem.push_attribute(("key", entry.key.as_str()));
            xml_writer.write_event(Event::Start(elem))?;
            xml_writer.write_event(Event::Text(BytesText::new(&entry.value)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("entry")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("bundle")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn entry_key(e: &BytesStart) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        if attr.key.as_ref() == b"key" {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Err(Error::DataMismatch(
        "entry tag missing 'key' attribute".to_string(),
    ))
}

fn read_entry_text<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                return Ok(e.unescape().map_err(Error::XmlParse)?.to_string());
            }
            Ok(Event::End(_)) => return Ok(String::new()),
            Ok(Event::Eof) => {
                return Err(Error::DataMismatch(
                    "unexpected EOF inside entry element".to_string(),
                ));
            }
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_parse_basic_bundle_xml() {
        let xml = r#"
        <bundle>
            <entry key="app.title">My App</entry>
            <entry key="app.greeting">Hello {0}</entry>
            <entry key="app.empty"/>
        </bundle>
        "#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.entries.len(), 3);
        assert_eq!(format.entries[0].key, "app.title");
        assert_eq!(format.entries[0].value, "My App");
        assert_eq!(format.entries[1].value, "Hello {0}");
        assert_eq!(format.entries[2].value, "");
    }

    #[test]
    fn test_entry_without_key_rejected() {
        let xml = "<bundle><entry>orphan</entry></bundle>";
        assert!(Format::from_str(xml).is_err());
    }

    #[test]
    fn test_escaped_text_unescaped() {
        let xml = r#"<bundle><entry key="html">a &lt; b &amp; c</entry></bundle>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.entries[0].value, "a < b & c");
    }

    #[test]
    fn test_round_trip() {
        let format = Format {
            entries: vec![
                XmlEntry {
                    key: "a".to_string(),
                    value: "1".to_string(),
                },
                XmlEntry {
                    key: "b".to_string(),
                    value: "two & three".to_string(),
                },
            ],
        };
        let mut output = Vec::new();
        format.to_writer(&mut output).unwrap();
        let reparsed = Format::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(format, reparsed);
    }
}
