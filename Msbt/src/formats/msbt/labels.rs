//! `LBL1` section codec
//!
//! ```text
//! u32                       group count
//! { u32 count, u32 offset } per group, offset from payload start
//! { u8 len, name, i32 index } label records, addressed by the offsets
//! ```

use super::cursor::{ByteReader, ByteWriter, TextEncoding};
use super::{GroupId, Label, LabelGroup, MAX_LABEL_NAME_LEN};
use crate::error::{Error, Result};

/// Encoded size of one label record
fn record_len(label: &Label) -> usize {
    1 + label.name.len() + 4
}

fn to_u32(what: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::SectionTooLarge { what, value })
}

/// Parse an `LBL1` payload into label groups
///
/// Group ids are assigned from offset-table order.
pub fn parse_labels(payload: &[u8]) -> Result<Vec<LabelGroup>> {
    let mut reader = ByteReader::new(payload);
    let group_count = reader.read_u32()? as usize;

    let mut slots = Vec::with_capacity(group_count.min(reader.remaining() / 8));
    for _ in 0..group_count {
        let label_count = reader.read_u32()?;
        let offset = reader.read_u32()?;
        slots.push((label_count, offset));
    }

    let mut groups = Vec::with_capacity(slots.len());
    for (index, &(label_count, offset)) in slots.iter().enumerate() {
        reader.seek(offset as usize)?;

        let mut group = LabelGroup::new(GroupId(index as u32));
        group
            .labels
            .reserve((label_count as usize).min(reader.remaining() / 5));

        for _ in 0..label_count {
            let name_len = reader.read_u8()? as usize;
            let name_offset = reader.position();
            let name = reader
                .read_string(name_len, TextEncoding::Utf8)
                .map_err(|err| match err {
                    Error::InvalidEncoding { .. } => Error::InvalidLabelName {
                        offset: name_offset,
                    },
                    other => other,
                })?;
            let table_index = reader.read_i32()?;
            group.add(Label { name, table_index });
        }

        groups.push(group);
    }

    Ok(groups)
}

/// Offset of each group's label records, relative to the payload start
///
/// The first run starts right after the offset table; each following run
/// starts where the previous one ended, so empty groups share the offset of
/// their successor.
#[must_use]
pub fn label_offsets(groups: &[LabelGroup]) -> Vec<usize> {
    let mut offset = 4 + groups.len() * 8;
    groups
        .iter()
        .map(|group| {
            let start = offset;
            offset += group.labels.iter().map(record_len).sum::<usize>();
            start
        })
        .collect()
}

/// Serialize one group's label records into a contiguous run
fn encode_run(group: &LabelGroup) -> Result<Vec<u8>> {
    let mut run = ByteWriter::with_capacity(group.labels.iter().map(record_len).sum());

    for label in &group.labels {
        let name = label.name.as_bytes();
        if name.len() > MAX_LABEL_NAME_LEN {
            return Err(Error::LabelNameTooLong {
                name: label.name.clone(),
                len: name.len(),
            });
        }
        run.write_u8(name.len() as u8)?;
        run.write_bytes(name)?;
        run.write_i32(label.table_index)?;
    }

    Ok(run.into_inner())
}

/// Serialize label groups into an `LBL1` payload
pub fn encode_labels(groups: &[LabelGroup]) -> Result<Vec<u8>> {
    let runs = groups.iter().map(encode_run).collect::<Result<Vec<_>>>()?;
    let offsets = label_offsets(groups);

    let table_size = 4 + groups.len() * 8;
    let mut writer = ByteWriter::with_capacity(table_size + runs.iter().map(Vec::len).sum::<usize>());

    writer.write_u32(to_u32("label group count", groups.len())?)?;
    for (group, &offset) in groups.iter().zip(&offsets) {
        writer.write_u32(to_u32("label count", group.len())?)?;
        writer.write_u32(to_u32("label offset", offset)?)?;
    }
    for run in &runs {
        writer.write_bytes(run)?;
    }

    Ok(writer.into_inner())
}
