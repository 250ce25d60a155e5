//! Support for Java-style `.properties` bundle files.
//!
//! The historical format behind resource bundles: `key = value` lines,
//! `#`/`!` comments, backslash line continuations, and `\uXXXX` escapes.
//! Files are read BOM-aware and fall back to Latin-1 when the bytes are
//! not valid UTF-8, since legacy properties files predate UTF-8 defaults.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indoc::indoc;

use crate::{error::Error, traits::Parser};

/// Represents a parsed `.properties` bundle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs (and optional comments) in the file.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair, possibly with the comment that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
    /// Only a comment on the line(s) immediately above the pair is attached.
    pub comment: Option<String>,
}

impl Parser for Format {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let content = reader.lines().collect::<Result<Vec<_>, _>>()?.join("\n");

        let mut pairs = Vec::new();
        let mut last_comment: Option<String> = None;

        let mut lines = content.lines();
        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                last_comment = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with('!') {
                last_comment = Some(trimmed[1..].trim().to_string());
                continue;
            }

            // Fold continuation lines into one logical line.
            let mut logical = trimmed.to_string();
            while ends_with_odd_backslashes(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (raw_key, raw_value) = split_pair(&logical);
            if raw_key.is_empty() {
                continue;
            }

            pairs.push(Pair {
                key: unescape(raw_key),
                value: unescape(raw_value),
                comment: last_comment.take(),
            });
        }

        Ok(Format { pairs })
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(indoc! {"
            # Generated bundle file.
            # One key = value pair per line; blank and comment lines are ignored.

        "});

        for pair in &self.pairs {
            if let Some(comment) = &pair.comment {
                content.push_str(&format!("# {}\n", comment));
            }
            content.push_str(&format!("{} = {}\n", escape_key(&pair.key), escape_value(&pair.value)));
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Override default file reading to support BOM-aware decoding and the
    /// Latin-1 fallback for legacy files.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut file = File::open(path).map_err(Error::Io)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(Error::Io)?;
        Self::from_bytes(&bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let decoded = decode_lossless(bytes)?;
        Self::from_str(&decoded)
    }
}

/// Decodes bundle bytes: honor a BOM if present, try UTF-8, then fall back
/// to Windows-1252 (a superset of ISO-8859-1).
fn decode_lossless(bytes: &[u8]) -> Result<String, Error> {
    if bytes.starts_with(b"\xef\xbb\xbf")
        || bytes.starts_with(b"\xff\xfe")
        || bytes.starts_with(b"\xfe\xff")
    {
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(bytes);
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
        return Ok(decoded);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

// A logical line continues when it ends with an odd number of backslashes.
fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace run.
fn split_pair(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'=' | b':' => {
                return (line[..i].trim_end(), line[i + 1..].trim_start());
            }
            b' ' | b'\t' => {
                let key = &line[..i];
                let rest = line[i..].trim_start();
                // "key value" form, unless the whitespace just pads a separator.
                return match rest.strip_prefix(['=', ':']) {
                    Some(value) => (key, value.trim_start()),
                    None => (key, rest),
                };
            }
            _ => i += 1,
        }
    }
    (line.trim_end(), "")
}

/// Resolves `\t`, `\n`, `\r`, `\f`, `\uXXXX` and quoted characters.
fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&code);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn escape_key(key: &str) -> String {
    key.replace('\\', "\\\\")
        .replace('=', "\\=")
        .replace(':', "\\:")
        .replace(' ', "\\ ")
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}
