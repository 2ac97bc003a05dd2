//! `.msbt` file writing

use super::cursor::ByteWriter;
use super::header::{MsbtHeader, patch_file_size, write_header};
use super::labels::encode_labels;
use super::section::{SectionTag, write_section};
use super::strings::encode_strings;
use super::{HEADER_SIZE, MsbtFile};
use crate::error::Result;
use std::path::Path;

/// Write a .msbt file to disk
///
/// The file is fully serialized in memory first, so a failed encode never
/// leaves a partial file behind.
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_msbt<P: AsRef<Path>>(path: P, msbt: &MsbtFile) -> Result<()> {
    let bytes = serialize_msbt(msbt)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a container to bytes
///
/// Emits the header, then `LBL1` if there are label groups, any opaque
/// sections, then `TXT2` if the string table is non-empty; each section is
/// padded to 16 bytes with `0xAB`. The header's file size field is patched
/// last. The header's section count is the number of sections emitted,
/// whatever `msbt.section_count` holds.
///
/// # Errors
/// Returns [`Error::LabelNameTooLong`] if a label name exceeds 255 bytes, or
/// [`Error::SectionTooLarge`] if a count or size overflows its field.
///
/// [`Error::LabelNameTooLong`]: crate::Error::LabelNameTooLong
/// [`Error::SectionTooLarge`]: crate::Error::SectionTooLarge
pub fn serialize_msbt(msbt: &MsbtFile) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::with_capacity(HEADER_SIZE);
    write_header(&mut writer, &MsbtHeader::for_file(msbt)?)?;

    if !msbt.label_groups.is_empty() {
        let payload = encode_labels(&msbt.label_groups)?;
        write_section(&mut writer, SectionTag::LABELS, &payload)?;
    }

    for section in &msbt.extra_sections {
        write_section(&mut writer, section.tag, &section.payload)?;
    }

    if !msbt.string_table.is_empty() {
        let payload = encode_strings(&msbt.string_table)?;
        write_section(&mut writer, SectionTag::TEXTS, &payload)?;
    }

    let total = patch_file_size(&mut writer)?;
    tracing::debug!("Serialized MSBT: {} bytes", total);

    Ok(writer.into_inner())
}
