//! MSBT file header
//!
//! ```text
//! 0x00  magic          "MsgStdBn"
//! 0x08  byte order     u16
//! 0x0A  reserved       2 bytes
//! 0x0C  version        u16
//! 0x0E  section count  u16
//! 0x10  reserved       2 bytes
//! 0x12  file size      u32
//! 0x16  reserved       10 bytes
//! ```
//!
//! Reserved bytes are written as zero. The stored file size is not trusted on
//! read and is patched after everything else has been written.

use super::cursor::{ByteReader, ByteWriter};
use super::{FILE_SIZE_OFFSET, HEADER_SIZE, MSBT_MAGIC, MsbtFile};
use crate::error::{Error, Result};

/// Header fields that carry information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsbtHeader {
    pub byte_order_mark: u16,
    pub version: u16,
    pub section_count: u16,
    /// Total file size as stored on disk (informational only)
    pub file_size: u32,
}

impl MsbtHeader {
    /// Header describing `msbt`, with a zero file size placeholder
    ///
    /// The section count is taken from the sections the writer will emit,
    /// not from the stored field.
    pub fn for_file(msbt: &MsbtFile) -> Result<Self> {
        let populated = msbt.populated_section_count();
        let section_count = u16::try_from(populated).map_err(|_| Error::SectionTooLarge {
            what: "section count",
            value: populated,
        })?;

        Ok(Self {
            byte_order_mark: msbt.byte_order_mark,
            version: msbt.version,
            section_count,
            file_size: 0,
        })
    }
}

/// Parse the 32-byte header at the reader's position
pub fn read_header(reader: &mut ByteReader<'_>) -> Result<MsbtHeader> {
    let magic: [u8; 8] = reader.read_array()?;
    if magic != MSBT_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let byte_order_mark = reader.read_u16()?;
    reader.skip(2)?;
    let version = reader.read_u16()?;
    let section_count = reader.read_u16()?;
    reader.skip(2)?;
    let file_size = reader.read_u32()?;
    reader.skip(10)?;

    Ok(MsbtHeader {
        byte_order_mark,
        version,
        section_count,
        file_size,
    })
}

/// Emit the 32-byte header with a zero file size
pub fn write_header(writer: &mut ByteWriter, header: &MsbtHeader) -> Result<()> {
    writer.write_bytes(&MSBT_MAGIC)?;
    writer.write_u16(header.byte_order_mark)?;
    writer.write_u16(0)?;
    writer.write_u16(header.version)?;
    writer.write_u16(header.section_count)?;
    writer.write_u16(0)?;
    // File size, patched once the total length is known
    writer.write_u32(0)?;
    writer.write_bytes(&[0u8; 10])?;

    debug_assert_eq!(writer.len(), HEADER_SIZE);
    Ok(())
}

/// Overwrite the header's file size field with the sink's current length
///
/// Leaves the writer positioned at the end of the sink.
pub fn patch_file_size(writer: &mut ByteWriter) -> Result<u32> {
    let total = u32::try_from(writer.len()).map_err(|_| Error::SectionTooLarge {
        what: "file",
        value: writer.len(),
    })?;

    writer.seek(FILE_SIZE_OFFSET)?;
    writer.write_u32(total)?;
    writer.seek_end()?;
    Ok(total)
}
