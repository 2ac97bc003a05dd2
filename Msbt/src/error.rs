//! Error types for `msbt`

use std::path::PathBuf;

use thiserror::Error;

/// Broad error category, independent of the concrete variant.
///
/// Codec callers that only need to tell a corrupt file apart from a bad
/// edit (or an I/O problem) can match on this instead of on [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes do not describe a valid container.
    Format,
    /// Text could not be encoded or decoded.
    Encoding,
    /// A read or seek went past the end of the buffer.
    OutOfBounds,
    /// Underlying file system failure.
    Io,
    /// Structured-text or batch conversion failure.
    Conversion,
}

/// The error type for `msbt` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Format Errors ====================
    /// The file does not start with the `MsgStdBn` magic.
    #[error("bad magic: expected MsgStdBn, found {0:?}")]
    InvalidMagic([u8; 8]),

    /// A section declares more payload bytes than the buffer holds.
    #[error("truncated section {tag}: declared {declared} bytes, {available} available")]
    TruncatedSection {
        /// The section tag as read from the file.
        tag: String,
        /// Payload size from the section header.
        declared: usize,
        /// Bytes remaining after the section header.
        available: usize,
    },

    /// A string table entry spans an odd number of bytes.
    #[error("string {index} spans an odd number of bytes ({len})")]
    OddStringSpan {
        /// Position of the entry in the string table.
        index: usize,
        /// Length of the span in bytes.
        len: usize,
    },

    /// A string table offset points backwards or past the payload.
    #[error("string {index} has invalid span {start}..{end} (payload is {payload_len} bytes)")]
    InvalidStringSpan {
        /// Position of the entry in the string table.
        index: usize,
        /// Start offset of the span.
        start: usize,
        /// End offset of the span.
        end: usize,
        /// Size of the section payload.
        payload_len: usize,
    },

    /// A count or size does not fit its on-disk field.
    #[error("{what} too large for the file format: {value}")]
    SectionTooLarge {
        /// What overflowed.
        what: &'static str,
        /// The offending value.
        value: usize,
    },

    /// Invalid format error (use specific variants when possible).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    // ==================== Encoding Errors ====================
    /// A label name is longer than its one-byte length prefix allows.
    #[error("label name '{name}' is {len} bytes, the format allows at most 255")]
    LabelNameTooLong {
        /// The offending name.
        name: String,
        /// Its UTF-8 length in bytes.
        len: usize,
    },

    /// A label name is not valid UTF-8.
    #[error("label name at offset {offset} is not valid UTF-8")]
    InvalidLabelName {
        /// Payload offset of the name bytes.
        offset: usize,
    },

    /// A string table entry is not well-formed UTF-16.
    #[error("string {index} is not valid UTF-16")]
    InvalidUtf16 {
        /// Position of the entry in the string table.
        index: usize,
    },

    /// Bytes could not be decoded in the requested encoding.
    #[error("cannot decode {len} bytes as {encoding}")]
    InvalidEncoding {
        /// Name of the encoding.
        encoding: &'static str,
        /// Number of bytes that failed to decode.
        len: usize,
    },

    // ==================== Bounds Errors ====================
    /// A cursor read or seek went past the end of the buffer.
    #[error("out of bounds: {requested} bytes at offset {offset}, buffer is {len} bytes")]
    OutOfBounds {
        /// Position of the access.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Total length of the buffer.
        len: usize,
    },

    /// A label references a string table entry that does not exist.
    #[error("label '{label}' references string {index}, table has {table_len} entries")]
    InvalidTableIndex {
        /// Name of the label.
        label: String,
        /// The table index it carries.
        index: i32,
        /// Number of entries in the string table.
        table_len: usize,
    },

    // ==================== Conversion Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// The source/destination extension pair is not a supported conversion.
    #[error("unsupported conversion: {from} -> {to}")]
    UnsupportedConversion {
        /// Source extension.
        from: String,
        /// Destination extension.
        to: String,
    },

    /// The batch worker pool could not be started.
    #[error("worker pool error: {0}")]
    WorkerPool(String),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl Error {
    /// The broad category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::InvalidPath(_) | Self::WalkDirError(_) => ErrorKind::Io,
            Self::InvalidMagic(_)
            | Self::TruncatedSection { .. }
            | Self::OddStringSpan { .. }
            | Self::InvalidStringSpan { .. }
            | Self::SectionTooLarge { .. }
            | Self::InvalidFormat(_) => ErrorKind::Format,
            Self::LabelNameTooLong { .. }
            | Self::InvalidLabelName { .. }
            | Self::InvalidUtf16 { .. }
            | Self::InvalidEncoding { .. } => ErrorKind::Encoding,
            Self::OutOfBounds { .. } | Self::InvalidTableIndex { .. } => ErrorKind::OutOfBounds,
            Self::JsonError(_)
            | Self::Utf8Error(_)
            | Self::UnsupportedConversion { .. }
            | Self::WorkerPool(_) => ErrorKind::Conversion,
        }
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `msbt` operations.
pub type Result<T> = std::result::Result<T, Error>;
