//! MSBT ⇄ JSON conversion
//!
//! The JSON document mirrors [`MsbtFile`] field for field and is stored on
//! disk as UTF-16LE without a byte-order mark. A leading BOM is tolerated on
//! read.

use std::path::Path;

use crate::converter::{ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::Result;
use crate::formats::msbt::{self, MsbtFile, TextEncoding};

/// UTF-16LE byte-order mark
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Convert .msbt file to its JSON form
///
/// # Errors
/// Returns an error if reading, parsing or writing fails.
pub fn convert_msbt_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_msbt_to_json_with_progress(source, dest, &|_| {})
}

/// Convert .msbt file to its JSON form with progress callback
///
/// # Errors
/// Returns an error if reading, parsing or writing fails.
pub fn convert_msbt_to_json_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ConvertProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting MSBT→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        4,
        "Reading MSBT file...",
    ));
    let bytes = std::fs::read(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Parsing,
        2,
        4,
        format!("Parsing {} bytes...", bytes.len()),
    ));
    let container = msbt::parse_msbt_bytes(&bytes)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        3,
        4,
        format!("Converting {} labels to JSON...", container.label_count()),
    ));
    let document = encode_text_document(&to_json(&container)?)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        4,
        4,
        "Writing JSON file...",
    ));
    std::fs::write(dest, document)?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 4, 4));
    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a JSON document back to .msbt
///
/// # Errors
/// Returns an error if reading, decoding, encoding or writing fails.
pub fn convert_json_to_msbt<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_json_to_msbt_with_progress(source, dest, &|_| {})
}

/// Convert a JSON document back to .msbt with progress callback
///
/// # Errors
/// Returns an error if reading, decoding, encoding or writing fails.
pub fn convert_json_to_msbt_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ConvertProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting JSON→MSBT: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        4,
        "Reading JSON file...",
    ));
    let bytes = std::fs::read(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Parsing,
        2,
        4,
        "Parsing JSON...",
    ));
    let container = from_json(&decode_text_document(&bytes)?)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        3,
        4,
        format!("Encoding {} strings...", container.string_table.len()),
    ));
    let output = msbt::serialize_msbt(&container)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        4,
        4,
        "Writing MSBT file...",
    ));
    std::fs::write(dest, output)?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 4, 4));
    tracing::info!("Conversion complete");
    Ok(())
}

/// Serialize a container to its JSON form
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn to_json(container: &MsbtFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(container)?)
}

/// Parse a container from its JSON form
///
/// Group ids are reassigned from the groups' positions in the document.
///
/// # Errors
/// Returns an error if the document is not valid JSON or does not match the
/// container layout.
pub fn from_json(text: &str) -> Result<MsbtFile> {
    let mut container: MsbtFile = serde_json::from_str(text)?;
    container.renumber_groups();
    Ok(container)
}

/// JSON export with each label's text inlined
///
/// For display only; the result cannot be read back with [`from_json`].
///
/// # Errors
/// Returns an error if a label index is outside the string table.
pub fn to_resolved_json(container: &MsbtFile) -> Result<String> {
    let view = msbt::resolve(container)?;
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Encode a text document as UTF-16LE, without a byte-order mark
///
/// # Errors
/// Propagates encoder failures.
pub fn encode_text_document(text: &str) -> Result<Vec<u8>> {
    TextEncoding::Utf16Le.encode(text)
}

/// Decode a UTF-16LE text document, skipping a leading byte-order mark
///
/// # Errors
/// Returns [`Error::InvalidEncoding`] for an odd byte count or malformed
/// UTF-16.
///
/// [`Error::InvalidEncoding`]: crate::Error::InvalidEncoding
pub fn decode_text_document(bytes: &[u8]) -> Result<String> {
    let body = bytes.strip_prefix(&UTF16_LE_BOM).unwrap_or(bytes);
    TextEncoding::Utf16Le.decode(body)
}
