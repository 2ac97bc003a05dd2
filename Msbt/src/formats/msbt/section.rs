//! Section framing
//!
//! Every section starts on a 16-byte boundary with a sub-header:
//!
//! ```text
//! 0x00  tag       4 ASCII bytes
//! 0x04  size      u32, payload bytes following the sub-header
//! 0x08  reserved  8 bytes
//! ```
//!
//! Padding between sections is `0xAB` when written here and ignored on read.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::cursor::{ByteReader, ByteWriter};
use super::{PADDING_BYTE, SECTION_ALIGNMENT, SECTION_HEADER_SIZE};
use crate::error::{Error, Result};

/// Four-byte section tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionTag(pub [u8; 4]);

impl SectionTag {
    /// Label groups
    pub const LABELS: Self = Self(*b"LBL1");
    /// String table
    pub const TEXTS: Self = Self(*b"TXT2");

    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Prefix marking a tag stored as base64 because it is not ASCII
const ENCODED_TAG_PREFIX: &str = "b64:";

impl Serialize for SectionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_ascii() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_str(&format!("{ENCODED_TAG_PREFIX}{}", STANDARD.encode(self.0)))
        }
    }
}

impl<'de> Deserialize<'de> for SectionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let invalid = || serde::de::Error::custom(format!("invalid section tag '{text}'"));

        if let Ok(bytes) = <[u8; 4]>::try_from(text.as_bytes()) {
            return Ok(Self(bytes));
        }
        let encoded = text.strip_prefix(ENCODED_TAG_PREFIX).ok_or_else(invalid)?;
        let decoded = STANDARD.decode(encoded).map_err(|_| invalid())?;
        let bytes: [u8; 4] = decoded.as_slice().try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

/// Parsed section sub-header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub tag: SectionTag,
    /// Payload size in bytes
    pub size: u32,
}

/// Read one framed section and leave the reader on the next aligned boundary
///
/// The returned payload borrows from the reader's buffer.
pub fn read_section<'a>(reader: &mut ByteReader<'a>) -> Result<(SectionHeader, &'a [u8])> {
    let start = reader.position();

    let tag = SectionTag(reader.read_array()?);
    let size = reader.read_u32()?;
    reader.skip(8)?;

    let declared = size as usize;
    if declared > reader.remaining() {
        return Err(Error::TruncatedSection {
            tag: tag.to_string(),
            declared,
            available: reader.remaining(),
        });
    }

    let payload = reader.read_fixed_bytes(declared)?;
    reader.seek(start + SECTION_HEADER_SIZE + declared)?;
    reader.align_forward(SECTION_ALIGNMENT);

    tracing::debug!("Read section {} ({} bytes) at {:#x}", tag, declared, start);
    Ok((SectionHeader { tag, size }, payload))
}

/// Append a framed section followed by alignment padding
///
/// Returns the offset of the section's sub-header.
pub fn write_section(writer: &mut ByteWriter, tag: SectionTag, payload: &[u8]) -> Result<usize> {
    let size = u32::try_from(payload.len()).map_err(|_| Error::SectionTooLarge {
        what: "section payload",
        value: payload.len(),
    })?;

    let start = writer.position();
    writer.write_bytes(tag.as_bytes())?;
    writer.write_u32(size)?;
    writer.write_bytes(&[0u8; 8])?;
    writer.write_bytes(payload)?;
    let padding = writer.pad_to(SECTION_ALIGNMENT, PADDING_BYTE)?;

    tracing::debug!(
        "Wrote section {} ({} bytes + {} padding) at {:#x}",
        tag,
        payload.len(),
        padding,
        start
    );
    Ok(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_write_section_pads() {
        let mut writer = ByteWriter::new();
        let offset = write_section(&mut writer, SectionTag::TEXTS, &[1, 2, 3]).unwrap();
        assert_eq!(offset, 0);

        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..4], b"TXT2");
        assert_eq!(&bytes[4..8], &[3, 0, 0, 0]);
        assert!(bytes[8..16].iter().all(|&b| b == 0));
        assert_eq!(&bytes[16..19], &[1, 2, 3]);
        assert!(bytes[19..].iter().all(|&b| b == PADDING_BYTE));
    }

    #[test]
    fn test_read_skips_any_padding() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ATR1");
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&[9; 5]);
        // Padding with an arbitrary fill value
        bytes.extend_from_slice(&[0x00; 11]);
        bytes.extend_from_slice(b"NEXT");

        let mut reader = ByteReader::new(&bytes);
        let (header, payload) = read_section(&mut reader).unwrap();
        assert_eq!(header.tag, SectionTag::new(*b"ATR1"));
        assert_eq!(header.size, 5);
        assert_eq!(payload, &[9; 5]);
        assert_eq!(reader.position(), 32);
    }

    #[test]
    fn test_truncated_section() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"LBL1");
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&[0; 10]);

        let err = read_section(&mut ByteReader::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedSection { ref tag, declared: 100, available: 10 } if tag == "LBL1"
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_tag_serde() {
        let json = serde_json::to_string(&SectionTag::LABELS).unwrap();
        assert_eq!(json, "\"LBL1\"");
        let tag: SectionTag = serde_json::from_str("\"ATO1\"").unwrap();
        assert_eq!(tag, SectionTag::new(*b"ATO1"));
        assert!(serde_json::from_str::<SectionTag>("\"TOOLONG\"").is_err());
    }

    #[test]
    fn test_non_ascii_tag_serde() {
        let tag = SectionTag::new([0xFF, 0x00, b'A', 0x80]);
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"b64:/wBBgA==\"");
        assert_eq!(serde_json::from_str::<SectionTag>(&json).unwrap(), tag);

        // Plain four-byte text always wins over the encoded form
        let literal: SectionTag = serde_json::from_str("\"b64:\"").unwrap();
        assert_eq!(literal, SectionTag::new(*b"b64:"));
        assert!(serde_json::from_str::<SectionTag>("\"b64:QUJD\"").is_err());
        assert!(serde_json::from_str::<SectionTag>("\"b64:!!\"").is_err());
    }
}
