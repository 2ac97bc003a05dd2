use msbt::formats::msbt::{PADDING_BYTE, RawSection, SectionTag};
use msbt::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// Fill values for the bytes a reader must ignore
#[derive(Clone, Copy)]
struct Fill {
    reserved: u8,
    padding: u8,
}

/// What this codec writes: zeroed reserved bytes, 0xAB padding
const CANONICAL: Fill = Fill {
    reserved: 0,
    padding: PADDING_BYTE,
};

/// Section framing: tag, size, 8 reserved bytes, payload, padding
fn section(tag: &[u8; 4], payload: &[u8], fill: Fill) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&[fill.reserved; 8]);
    bytes.extend_from_slice(payload);
    while bytes.len() % 16 != 0 {
        bytes.push(fill.padding);
    }
    bytes
}

fn header(section_count: u16, file_size: u32, fill: Fill) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MsgStdBn");
    bytes.extend_from_slice(&0xFEFFu16.to_le_bytes());
    bytes.extend_from_slice(&[fill.reserved; 2]);
    bytes.extend_from_slice(&3u16.to_le_bytes());
    bytes.extend_from_slice(&section_count.to_le_bytes());
    bytes.extend_from_slice(&[fill.reserved; 2]);
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[fill.reserved; 10]);
    bytes
}

/// Header reserved ranges, as absolute offsets
const HEADER_RESERVED: [std::ops::Range<usize>; 3] = [0x0A..0x0C, 0x10..0x12, 0x16..0x20];

/// LBL1 payload with one group holding label "a" → 0
fn labels_payload() -> Vec<u8> {
    let mut labels = Vec::new();
    labels.extend_from_slice(&1u32.to_le_bytes());
    labels.extend_from_slice(&1u32.to_le_bytes());
    labels.extend_from_slice(&12u32.to_le_bytes());
    labels.push(1);
    labels.push(b'a');
    labels.extend_from_slice(&0i32.to_le_bytes());
    labels
}

/// TXT2 payload holding `texts` back to back
fn texts_payload(texts: &[&str]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = texts
        .iter()
        .map(|t| t.encode_utf16().flat_map(u16::to_le_bytes).collect())
        .collect();

    let mut payload = Vec::new();
    payload.extend_from_slice(&(texts.len() as u32).to_le_bytes());
    let mut offset = 4 + texts.len() * 4;
    for text in &encoded {
        payload.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += text.len();
    }
    for text in &encoded {
        payload.extend_from_slice(text);
    }
    payload
}

fn assemble(sections: &[Vec<u8>], fill: Fill) -> Vec<u8> {
    let size = 32 + sections.iter().map(Vec::len).sum::<usize>();
    let mut bytes = header(sections.len() as u16, size as u32, fill);
    for section in sections {
        bytes.extend_from_slice(section);
    }
    bytes
}

/// One group holding label "a" → 0, string table ["Hi"]
fn hand_built_with(fill: Fill) -> Vec<u8> {
    let lbl1 = section(b"LBL1", &labels_payload(), fill);
    let txt2 = section(b"TXT2", &texts_payload(&["Hi"]), fill);
    assemble(&[lbl1, txt2], fill)
}

fn hand_built() -> Vec<u8> {
    hand_built_with(CANONICAL)
}

/// Offsets of every section header in a serialized file
fn section_offsets(bytes: &[u8]) -> Vec<usize> {
    let count = u16::from_le_bytes([bytes[0x0E], bytes[0x0F]]);
    let mut offsets = Vec::new();
    let mut pos = 32;
    for _ in 0..count {
        offsets.push(pos);
        let size = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().unwrap()) as usize;
        pos += 16 + size;
        pos = pos.div_ceil(16) * 16;
    }
    offsets
}

fn sample() -> MsbtFile {
    let mut container = MsbtFile::new();
    container.push_group(vec![Label::new("title", 0), Label::new("start", 1)]);
    container.push_group(Vec::new());
    container.push_group(vec![Label::new("quit", 2)]);
    container.string_table = vec![
        "Adventure\0".to_string(),
        "Press \u{1F3AE} to start\0".to_string(),
        String::new(),
    ];
    container.sync_section_count();
    container
}

#[test]
fn test_hand_built_file() {
    let bytes = hand_built();
    assert_eq!(bytes.len(), 112);

    let container = parse_msbt_bytes(&bytes).unwrap();
    assert_eq!(container.section_count, 2);
    assert_eq!(container.label_groups.len(), 1);
    assert_eq!(container.label_groups[0].labels[0], Label::new("a", 0));
    assert_eq!(container.string_table, vec!["Hi".to_string()]);

    assert_eq!(serialize_msbt(&container).unwrap(), bytes);
}

#[test]
fn test_roundtrip_ignores_reserved_and_padding() {
    let foreign = Fill {
        reserved: 0x5A,
        padding: 0xCD,
    };
    let input = hand_built_with(foreign);
    let first = parse_msbt_bytes(&input).unwrap();

    let output = serialize_msbt(&first).unwrap();
    assert_eq!(output.len(), input.len());
    assert_eq!(output, hand_built());
    assert_eq!(parse_msbt_bytes(&output).unwrap(), first);

    // Every byte that differs is a reserved byte or section padding
    let mut ignorable: Vec<usize> = HEADER_RESERVED.iter().cloned().flatten().collect();
    for offset in section_offsets(&input) {
        let size = u32::from_le_bytes(input[offset + 4..offset + 8].try_into().unwrap()) as usize;
        ignorable.extend(offset + 8..offset + 16);
        let payload_end = offset + 16 + size;
        ignorable.extend(payload_end..payload_end.div_ceil(16) * 16);
    }
    ignorable.sort_unstable();

    let differing: Vec<usize> = (0..input.len()).filter(|&i| input[i] != output[i]).collect();
    assert_eq!(differing, ignorable);
}

#[test]
fn test_empty_string_section_is_dropped() {
    let lbl1 = section(b"LBL1", &labels_payload(), CANONICAL);
    let txt2 = section(b"TXT2", &texts_payload(&[]), CANONICAL);
    let input = assemble(&[lbl1, txt2], CANONICAL);

    let first = parse_msbt_bytes(&input).unwrap();
    assert!(first.string_table.is_empty());
    assert_eq!(first.section_count, 1);

    let output = serialize_msbt(&first).unwrap();
    assert_eq!(u16::from_le_bytes([output[0x0E], output[0x0F]]), 1);
    assert_eq!(section_offsets(&output), vec![32]);
    assert_eq!(parse_msbt_bytes(&output).unwrap(), first);
}

#[test]
fn test_unsynced_count_is_derived_on_write() {
    let mut container = MsbtFile::new();
    let group = container.push_group(Vec::new());
    container.add_label(group, "a", "Hi").unwrap();
    assert_eq!(container.section_count, 0);

    let bytes = serialize_msbt(&container).unwrap();
    assert_eq!(bytes, hand_built());

    let back = parse_msbt_bytes(&bytes).unwrap();
    assert_eq!(back.section_count, 2);
    assert_eq!(back.string_table, vec!["Hi".to_string()]);
    assert_eq!(back.get_text("a"), Some("Hi"));
}

#[test]
fn test_roundtrip_is_stable() {
    let first = serialize_msbt(&sample()).unwrap();
    let parsed = parse_msbt_bytes(&first).unwrap();
    assert_eq!(parsed, sample());

    let second = serialize_msbt(&parsed).unwrap();
    assert_eq!(second, first);
}

#[test]
fn test_header_size_and_alignment() {
    let bytes = serialize_msbt(&sample()).unwrap();
    let size = u32::from_le_bytes(bytes[0x12..0x16].try_into().unwrap());
    assert_eq!(size as usize, bytes.len());
    assert_eq!(bytes.len() % 16, 0);

    let offsets = section_offsets(&bytes);
    assert_eq!(offsets.len(), 2);
    assert!(offsets.iter().all(|o| o % 16 == 0));
    assert_eq!(&bytes[offsets[0]..offsets[0] + 4], b"LBL1");
    assert_eq!(&bytes[offsets[1]..offsets[1] + 4], b"TXT2");
}

#[test]
fn test_empty_sections_are_omitted() {
    let mut container = MsbtFile::new();
    container.string_table.push("Only text".to_string());
    assert_eq!(container.sync_section_count(), 1);

    let bytes = serialize_msbt(&container).unwrap();
    assert_eq!(section_offsets(&bytes), vec![32]);
    assert_eq!(&bytes[32..36], b"TXT2");

    let empty = serialize_msbt(&MsbtFile::new()).unwrap();
    assert_eq!(empty.len(), 32);
    assert_eq!(parse_msbt_bytes(&empty).unwrap(), MsbtFile::new());
}

#[test]
fn test_unknown_sections_are_kept() {
    let mut container = sample();
    container.extra_sections.push(RawSection {
        tag: SectionTag::new(*b"ATR1"),
        payload: vec![2, 0, 0, 0, 4, 0, 0, 0, 9, 9],
    });
    container.sync_section_count();

    let bytes = serialize_msbt(&container).unwrap();
    let offsets = section_offsets(&bytes);
    let tags: Vec<_> = offsets.iter().map(|&o| &bytes[o..o + 4]).collect();
    assert_eq!(tags, vec![&b"LBL1"[..], &b"ATR1"[..], &b"TXT2"[..]]);

    assert_eq!(parse_msbt_bytes(&bytes).unwrap(), container);
}

#[test]
fn test_bad_magic() {
    let mut bytes = hand_built();
    bytes[..8].copy_from_slice(b"MsgPrjBn");
    let err = parse_msbt_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_truncated_file() {
    let bytes = hand_built();
    let err = parse_msbt_bytes(&bytes[..60]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(parse_msbt_bytes(&bytes[..20]).is_err());
}

#[test]
fn test_edit_and_save() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("Menu.msbt");
    write_msbt(&path, &sample()).unwrap();

    let mut container = read_msbt(&path).unwrap();
    assert!(container.set_text("quit", "Quit\0"));
    let group = container.push_group(Vec::new());
    container.add_label(group, "credits", "Credits\0").unwrap();
    container.sync_section_count();
    write_msbt(&path, &container).unwrap();

    let reread = read_msbt(&path).unwrap();
    assert_eq!(reread.get_text("quit"), Some("Quit\0"));
    assert_eq!(reread.get_text("credits"), Some("Credits\0"));
    assert_eq!(reread.label_index().len(), 4);
}

#[test]
fn test_json_conversion_through_files() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("Menu.msbt");
    let json = temp.path().join("Menu.json");
    let rebuilt = temp.path().join("Rebuilt.msbt");

    write_msbt(&source, &sample()).unwrap();
    convert_file(&source, &json).unwrap();
    convert_file(&json, &rebuilt).unwrap();

    assert_eq!(std::fs::read(&rebuilt).unwrap(), std::fs::read(&source).unwrap());

    let text = converter::decode_text_document(&std::fs::read(&json).unwrap()).unwrap();
    assert!(text.contains("\"stringTable\""));
}

#[test]
fn test_directory_conversion() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("Message");
    let dest = temp.path().join("Json");
    std::fs::create_dir_all(source.join("Npc")).unwrap();
    write_msbt(source.join("Menu.msbt"), &sample()).unwrap();
    write_msbt(source.join("Npc/Shop.msbt"), &sample()).unwrap();

    let ConversionPlan::Directory { files, .. } = plan_conversion(&source, &dest).unwrap() else {
        panic!("expected a directory plan");
    };
    let options = BatchOptions::new().threads(2);
    let pool = options.build_pool().unwrap();
    let result = batch_convert(&pool, &files, &source, &dest, &options, |_| {});

    assert_eq!(result.success_count, 2);
    assert_eq!(result.fail_count, 0);
    assert!(dest.join("Npc/Shop.json").is_file());
}
