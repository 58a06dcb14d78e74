//! The session `env` file format.
//!
//! One variable per line, `name:hex(value)`, lines joined by `\n`. Values are
//! hex-encoded so embedded colons, newlines, and non-UTF-8 bytes cannot break
//! the line structure. Names are written verbatim; a name that contains `:` or
//! `\n` (or is empty) cannot be represented and is dropped with a warning.

use std::{
    ffi::OsString,
    os::unix::ffi::{OsStrExt, OsStringExt},
};

use thiserror::Error;

use super::EnvSnapshot;

const SEPARATOR: u8 = b':';
const NEWLINE: u8 = b'\n';

/// Errors raised while decoding an `env` file.
#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("line {line} has no `:` separator")]
    MissingSeparator { line: usize },

    #[error("line {line} has an invalid hex value: {source}")]
    InvalidHex {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },
}

/// Serialize a snapshot into the `env` file format.
#[must_use]
pub fn encode(snapshot: &EnvSnapshot) -> Vec<u8> {
    let mut out = Vec::new();

    for (name, value) in snapshot.iter() {
        let name = name.as_bytes();
        if name.is_empty() || name.contains(&SEPARATOR) || name.contains(&NEWLINE) {
            tracing::warn!(
                name = %String::from_utf8_lossy(name),
                "skipping environment variable with an unencodable name"
            );
            continue;
        }

        if !out.is_empty() {
            out.push(NEWLINE);
        }
        out.extend_from_slice(name);
        out.push(SEPARATOR);
        out.extend_from_slice(hex::encode(value.as_bytes()).as_bytes());
    }

    out
}

/// Parse the `env` file format back into a snapshot.
///
/// Blank lines are ignored, so an empty file decodes to an empty snapshot.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the first line (1-based) that lacks a
/// separator or carries a value that is not valid hex.
pub fn decode(data: &[u8]) -> Result<EnvSnapshot, DecodeError> {
    let mut snapshot = EnvSnapshot::new();

    for (index, line) in data.split(|&b| b == NEWLINE).enumerate() {
        if line.is_empty() {
            continue;
        }

        let line_no = index + 1;
        let split = line
            .iter()
            .position(|&b| b == SEPARATOR)
            .ok_or(DecodeError::MissingSeparator { line: line_no })?;
        let (name, encoded) = (&line[..split], &line[split + 1..]);

        let value = hex::decode(encoded).map_err(|source| DecodeError::InvalidHex {
            line: line_no,
            source,
        })?;

        snapshot.insert(
            OsString::from_vec(name.to_vec()),
            OsString::from_vec(value),
        );
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(bytes: &[u8]) -> OsString {
        OsString::from_vec(bytes.to_vec())
    }

    #[test]
    fn test_encode_format() {
        let snapshot: EnvSnapshot = [("HOME", "/home/u"), ("A", "")].into_iter().collect();

        let encoded = encode(&snapshot);
        assert_eq!(encoded, b"A:\nHOME:2f686f6d652f75");
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.insert("EMPTY", "");
        snapshot.insert("COLONS", "a:b::c:");
        snapshot.insert("NEWLINES", "line one\nline two\n");
        snapshot.insert("CONTROL", "\t\r\x1b[0m\x07");
        snapshot.insert("QUOTES", "it's \"quoted\" $HOME `cmd`");
        snapshot.insert(os(b"RAW"), os(&[0xff, 0xfe, 0x00, 0x80]));

        let decoded = decode(&encode(&snapshot)).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_round_trip_every_byte() {
        let all: Vec<u8> = (0..=255).collect();
        let mut snapshot = EnvSnapshot::new();
        snapshot.insert("ALL", os(&all));

        let decoded = decode(&encode(&snapshot)).unwrap();
        assert_eq!(decoded.get("ALL"), Some(os(&all).as_os_str()));
    }

    #[test]
    fn test_empty_snapshot_round_trip() {
        let snapshot = EnvSnapshot::new();

        assert!(encode(&snapshot).is_empty());
        assert_eq!(decode(b"").unwrap(), snapshot);
    }

    #[test]
    fn test_unencodable_names_are_dropped() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.insert("GOOD", "1");
        snapshot.insert("BAD:NAME", "2");
        snapshot.insert("BAD\nNAME", "3");

        let decoded = decode(&encode(&snapshot)).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains("GOOD"));
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        let decoded = decode(b"HOME:2f\n").unwrap();
        assert_eq!(decoded.get("HOME"), Some(os(b"/").as_os_str()));
    }

    #[test]
    fn test_decode_missing_separator() {
        let err = decode(b"A:61\nBROKEN").unwrap_err();
        assert_eq!(err, DecodeError::MissingSeparator { line: 2 });
    }

    #[test]
    fn test_decode_invalid_hex() {
        let err = decode(b"A:zz").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex { line: 1, .. }));
    }
}
