//! Format conversion utilities
//!
//! This module handles conversions between the binary container and its
//! structured-text form:
//! - MSBT (binary) ↔ JSON (UTF-16LE text)
//!
//! [`convert_file`] picks the direction from the file extensions.

pub mod msbt_json;

use std::path::Path;

use crate::error::{Error, Result};

pub use msbt_json::{
    convert_json_to_msbt, convert_json_to_msbt_with_progress, convert_msbt_to_json,
    convert_msbt_to_json_with_progress, decode_text_document, encode_text_document, from_json,
    to_json, to_resolved_json,
};

/// Progress callback type for conversion operations
pub type ConvertProgressCallback<'a> = &'a dyn Fn(&ConvertProgress);

/// Progress information for a single-file conversion
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    /// Current conversion phase
    pub phase: ConvertPhase,
    /// Current step number (1-indexed)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Description of the current step (if applicable)
    pub current_file: Option<String>,
}

impl ConvertProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a step description
    #[must_use]
    pub fn with_file(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Reading the source file from disk
    ReadingSource,
    /// Decoding the source into a container
    Parsing,
    /// Producing the destination representation
    Converting,
    /// Writing the destination file
    WritingOutput,
    /// Conversion finished
    Complete,
}

impl ConvertPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadingSource => "Reading source",
            Self::Parsing => "Parsing",
            Self::Converting => "Converting",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}

/// Lowercased extension of `path`, or an empty string
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Convert a single file, choosing the direction from the extensions
///
/// # Errors
/// Returns [`Error::UnsupportedConversion`] unless the pair is
/// `.msbt → .json` or `.json → .msbt`, otherwise any read, parse or write
/// error of the conversion itself.
pub fn convert_file<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_file_with_progress(source, dest, &|_| {})
}

/// Convert a single file with progress callback
///
/// # Errors
/// See [`convert_file`].
pub fn convert_file_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ConvertProgressCallback,
) -> Result<()> {
    let from = extension_of(source.as_ref());
    let to = extension_of(dest.as_ref());

    match (from.as_str(), to.as_str()) {
        ("msbt", "json") => convert_msbt_to_json_with_progress(source, dest, progress),
        ("json", "msbt") => convert_json_to_msbt_with_progress(source, dest, progress),
        _ => Err(Error::UnsupportedConversion { from, to }),
    }
}

/// Serde adapter storing byte payloads as standard base64 strings
pub(crate) mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_progress_percentage() {
        let progress = ConvertProgress::new(ConvertPhase::Parsing, 1, 4);
        assert!((progress.percentage() - 0.25).abs() < f32::EPSILON);
        assert!((ConvertProgress::new(ConvertPhase::Complete, 0, 0).percentage() - 1.0).abs() < f32::EPSILON);
        assert_eq!(ConvertPhase::WritingOutput.as_str(), "Writing output");
    }

    #[test]
    fn test_unsupported_pair() {
        let err = convert_file("a.msbt", "b.txt").unwrap_err();
        assert!(matches!(
            &err,
            Error::UnsupportedConversion { from, to } if from == "msbt" && to == "txt"
        ));
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(extension_of(Path::new("dir/Menu.MSBT")), "msbt");
        assert_eq!(extension_of(Path::new("noext")), "");
    }
}
