//! `.msbt` file reading and parsing

use super::cursor::ByteReader;
use super::header::read_header;
use super::labels::parse_labels;
use super::section::{SectionTag, read_section};
use super::strings::parse_strings;
use super::{MsbtFile, RawSection};
use crate::error::Result;
use std::path::Path;

/// Read a .msbt file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any parse error from
/// [`parse_msbt_bytes`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_msbt<P: AsRef<Path>>(path: P) -> Result<MsbtFile> {
    let buffer = std::fs::read(path)?;
    parse_msbt_bytes(&buffer)
}

/// Parse .msbt data from bytes
///
/// Label table indices are not checked against the string table here; see
/// [`resolve`](super::resolve).
///
/// # Errors
///
/// Returns [`Error::InvalidMagic`] for a foreign file, [`Error::TruncatedSection`]
/// when a section runs past the end of the data, [`Error::OutOfBounds`] for
/// offsets pointing outside their section, and encoding errors for undecodable
/// label names or strings.
///
/// [`Error::InvalidMagic`]: crate::Error::InvalidMagic
/// [`Error::TruncatedSection`]: crate::Error::TruncatedSection
/// [`Error::OutOfBounds`]: crate::Error::OutOfBounds
pub fn parse_msbt_bytes(data: &[u8]) -> Result<MsbtFile> {
    let mut reader = ByteReader::new(data);
    let header = read_header(&mut reader)?;

    let mut msbt = MsbtFile {
        byte_order_mark: header.byte_order_mark,
        version: header.version,
        section_count: header.section_count,
        label_groups: Vec::new(),
        string_table: Vec::new(),
        extra_sections: Vec::new(),
    };

    for _ in 0..header.section_count {
        let (section, payload) = read_section(&mut reader)?;

        match section.tag {
            SectionTag::LABELS => msbt.label_groups = parse_labels(payload)?,
            SectionTag::TEXTS => msbt.string_table = parse_strings(payload)?,
            tag => msbt.extra_sections.push(RawSection {
                tag,
                payload: payload.to_vec(),
            }),
        }
    }

    // Empty LBL1/TXT2 sections are not kept, so they do not count
    if msbt.sync_section_count() != header.section_count {
        tracing::debug!(
            "Dropped {} empty sections",
            header.section_count.saturating_sub(msbt.section_count)
        );
    }

    tracing::debug!(
        "Parsed MSBT: {} sections, {} label groups, {} strings",
        msbt.section_count,
        msbt.label_groups.len(),
        msbt.string_table.len()
    );
    Ok(msbt)
}
