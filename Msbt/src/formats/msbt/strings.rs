//! `TXT2` section codec
//!
//! ```text
//! u32          text count
//! u32 offset   per text, from payload start
//! UTF-16LE     text bytes, entry i spans offset[i]..offset[i + 1]
//! ```
//!
//! The last entry runs to the end of the payload. Lengths come purely from
//! offset deltas; no terminator is added or stripped.

use super::cursor::{ByteReader, ByteWriter, TextEncoding};
use crate::error::{Error, Result};

/// UTF-16LE byte length of `text`
fn encoded_len(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

fn to_u32(what: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::SectionTooLarge { what, value })
}

/// Parse a `TXT2` payload into the string table
pub fn parse_strings(payload: &[u8]) -> Result<Vec<String>> {
    let mut reader = ByteReader::new(payload);
    let text_count = reader.read_u32()? as usize;

    let mut offsets = Vec::with_capacity(text_count.min(reader.remaining() / 4));
    for _ in 0..text_count {
        offsets.push(reader.read_u32()? as usize);
    }

    let mut texts = Vec::with_capacity(offsets.len());
    for (index, &start) in offsets.iter().enumerate() {
        let end = offsets.get(index + 1).copied().unwrap_or(payload.len());
        if start > end || end > payload.len() {
            return Err(Error::InvalidStringSpan {
                index,
                start,
                end,
                payload_len: payload.len(),
            });
        }

        let len = end - start;
        if len % 2 != 0 {
            return Err(Error::OddStringSpan { index, len });
        }

        reader.seek(start)?;
        let text = reader
            .read_string(len, TextEncoding::Utf16Le)
            .map_err(|err| match err {
                Error::InvalidEncoding { .. } => Error::InvalidUtf16 { index },
                other => other,
            })?;
        texts.push(text);
    }

    Ok(texts)
}

/// Offset of each encoded text, relative to the payload start
#[must_use]
pub fn string_offsets(texts: &[String]) -> Vec<usize> {
    let mut offset = 4 + texts.len() * 4;
    texts
        .iter()
        .map(|text| {
            let start = offset;
            offset += encoded_len(text);
            start
        })
        .collect()
}

/// Serialize the string table into a `TXT2` payload
pub fn encode_strings(texts: &[String]) -> Result<Vec<u8>> {
    let offsets = string_offsets(texts);
    let body_len: usize = texts.iter().map(|text| encoded_len(text)).sum();

    let mut writer = ByteWriter::with_capacity(4 + texts.len() * 4 + body_len);
    writer.write_u32(to_u32("string count", texts.len())?)?;
    for &offset in &offsets {
        writer.write_u32(to_u32("string offset", offset)?)?;
    }
    for text in texts {
        writer.write_string(text, TextEncoding::Utf16Le)?;
    }

    Ok(writer.into_inner())
}
