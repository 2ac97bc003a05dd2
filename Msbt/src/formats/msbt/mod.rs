//! .msbt localized-text container format
//!
//! Binary message container used by interactive-media assets. A file is a
//! fixed 32-byte header followed by 16-byte aligned sections:
//!
//! - `LBL1` - label groups, each mapping label names to string table indices
//! - `TXT2` - the string table itself, UTF-16LE
//!
//! Any other section is carried through opaquely.

mod cursor;
mod editor;
mod header;
mod labels;
mod reader;
mod resolve;
mod section;
mod strings;
mod writer;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use cursor::{ByteReader, ByteWriter, TextEncoding};
pub use editor::ReplaceResult;
pub use header::{MsbtHeader, patch_file_size, read_header, write_header};
pub use labels::{encode_labels, label_offsets, parse_labels};
pub use reader::{parse_msbt_bytes, read_msbt};
pub use resolve::{LabelIndex, LabelRef, ResolvedGroup, ResolvedLabel, ResolvedView, resolve};
pub use section::{SectionHeader, SectionTag, read_section, write_section};
pub use strings::{encode_strings, parse_strings, string_offsets};
pub use writer::{serialize_msbt, write_msbt};

/// "MsgStdBn" magic signature
pub const MSBT_MAGIC: [u8; 8] = *b"MsgStdBn";

/// Size of the file header
pub const HEADER_SIZE: usize = 0x20;

/// Byte offset of the total file size field in the header
pub const FILE_SIZE_OFFSET: usize = 0x12;

/// Size of each section sub-header (tag + size + reserved)
pub const SECTION_HEADER_SIZE: usize = 0x10;

/// Sections start on multiples of this
pub const SECTION_ALIGNMENT: usize = 16;

/// Fill byte written between sections
pub const PADDING_BYTE: u8 = 0xAB;

/// Longest label name the one-byte length prefix can describe
pub const MAX_LABEL_NAME_LEN: usize = u8::MAX as usize;

/// Byte-order mark of little-endian files as read by this codec
pub const BOM_LITTLE_ENDIAN: u16 = 0xFEFF;

/// Label group identifier: the group's 0-based position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named reference into the string table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Short identifier, at most 255 bytes of UTF-8
    pub name: String,
    /// Position of the label's text in the string table
    pub table_index: i32,
}

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>, table_index: i32) -> Self {
        Self {
            name: name.into(),
            table_index,
        }
    }
}

/// An ordered set of labels sharing one offset-table slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelGroup {
    /// Position of the group in the offset table
    pub id: GroupId,
    pub labels: Vec<Label>,
}

impl LabelGroup {
    #[must_use]
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            labels: Vec::new(),
        }
    }

    pub fn add(&mut self, label: Label) {
        self.labels.push(label);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A section this codec does not interpret, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSection {
    pub tag: SectionTag,
    #[serde(with = "crate::converter::base64_bytes")]
    pub payload: Vec<u8>,
}

/// The logical content of one .msbt file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsbtFile {
    /// Byte-order mark, round-tripped verbatim
    pub byte_order_mark: u16,
    /// Format version, round-tripped verbatim
    pub version: u16,
    /// Number of populated sections
    ///
    /// Refreshed on parse and by [`MsbtFile::sync_section_count`]; the
    /// writer always derives the header value from the sections it emits.
    pub section_count: u16,
    pub label_groups: Vec<LabelGroup>,
    pub string_table: Vec<String>,
    /// Unrecognized sections in file order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_sections: Vec<RawSection>,
}

impl Default for MsbtFile {
    fn default() -> Self {
        Self::new()
    }
}

impl MsbtFile {
    /// Create an empty little-endian container
    #[must_use]
    pub fn new() -> Self {
        Self {
            byte_order_mark: BOM_LITTLE_ENDIAN,
            version: 3,
            section_count: 0,
            label_groups: Vec::new(),
            string_table: Vec::new(),
            extra_sections: Vec::new(),
        }
    }

    /// Total number of labels across all groups
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.label_groups.iter().map(LabelGroup::len).sum()
    }

    /// Number of sections the writer will emit for this container
    #[must_use]
    pub fn populated_section_count(&self) -> usize {
        usize::from(!self.label_groups.is_empty())
            + self.extra_sections.len()
            + usize::from(!self.string_table.is_empty())
    }
}
