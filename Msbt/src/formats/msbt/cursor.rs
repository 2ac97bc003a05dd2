//! Bounds-checked byte cursors
//!
//! [`ByteReader`] walks an immutable buffer that was fully loaded into memory.
//! [`ByteWriter`] appends to a growable sink and supports seeking back to
//! overwrite fields whose value is only known once everything else is written.
//! All integers are little-endian.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// Character encoding for fixed-length string fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// 7-bit ASCII (section tags, magic)
    Ascii,
    /// UTF-8 (label names)
    Utf8,
    /// UTF-16, little-endian code units (string table)
    Utf16Le,
}

impl TextEncoding {
    /// Human-readable name of the encoding
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
        }
    }

    /// Encode `text` into bytes
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Ascii if !text.is_ascii() => Err(Error::InvalidEncoding {
                encoding: self.name(),
                len: text.len(),
            }),
            Self::Ascii | Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }

    /// Decode `bytes` into a string
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        let invalid = || Error::InvalidEncoding {
            encoding: self.name(),
            len: bytes.len(),
        };

        match self {
            Self::Ascii if !bytes.is_ascii() => Err(invalid()),
            Self::Ascii | Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| invalid()),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(invalid());
                }
                let units: Vec<u16> = bytes.chunks_exact(2).map(LittleEndian::read_u16).collect();
                String::from_utf16(&units).map_err(|_| invalid())
            }
        }
    }
}

/// Position-tracked reader over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute position
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer length
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the current position and the end of the buffer
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn out_of_bounds(&self, offset: usize, requested: usize) -> Error {
        Error::OutOfBounds {
            offset,
            requested,
            len: self.data.len(),
        }
    }

    /// Read `n` raw bytes, borrowing them from the buffer
    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(self.pos, n))?;

        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed_bytes(N)?);
        Ok(out)
    }

    /// Read an `n`-byte string field in the given encoding
    pub fn read_string(&mut self, n: usize, encoding: TextEncoding) -> Result<String> {
        let bytes = self.read_fixed_bytes(n)?;
        encoding.decode(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_fixed_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_fixed_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_fixed_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_fixed_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_fixed_bytes(4)?))
    }

    /// Advance by `n` bytes without reading them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_fixed_bytes(n).map(|_| ())
    }

    /// Move to an absolute position; the end of the buffer is a valid target
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(self.out_of_bounds(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance to the next multiple of `boundary`
    ///
    /// No-op when already aligned. Stops at the end of the buffer when the
    /// trailing padding is cut short.
    pub fn align_forward(&mut self, boundary: usize) {
        if boundary <= 1 {
            return;
        }
        self.pos = self.pos.next_multiple_of(boundary).min(self.data.len());
    }
}

/// Byte sink with append, padding, and seek-and-overwrite
#[derive(Debug, Default)]
pub struct ByteWriter {
    inner: Cursor<Vec<u8>>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Cursor::new(Vec::with_capacity(capacity)),
        }
    }

    /// Current write position
    #[must_use]
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Total number of bytes in the sink
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Bytes written so far
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// Consume the writer and return the bytes
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Write `value` as a `width`-byte little-endian unsigned integer
    pub fn write_fixed(&mut self, width: usize, value: u64) -> Result<()> {
        let fits = match width {
            8 => true,
            1..=7 => value >> (width * 8) == 0,
            _ => false,
        };
        if !fits {
            return Err(Error::SectionTooLarge {
                what: "fixed-width field",
                value: value as usize,
            });
        }
        self.inner.write_uint::<LittleEndian>(value, width)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write `text` in the given encoding, returning the number of bytes written
    pub fn write_string(&mut self, text: &str, encoding: TextEncoding) -> Result<usize> {
        let bytes = encoding.encode(text)?;
        self.write_bytes(&bytes)?;
        Ok(bytes.len())
    }

    /// Append `fill` until the sink length is a multiple of `boundary`
    ///
    /// Returns the number of padding bytes appended.
    pub fn pad_to(&mut self, boundary: usize, fill: u8) -> Result<usize> {
        if boundary <= 1 {
            return Ok(0);
        }
        self.inner.seek(SeekFrom::End(0))?;
        let padding = (boundary - self.len() % boundary) % boundary;
        self.write_bytes(&vec![fill; padding])?;
        Ok(padding)
    }

    /// Move to an absolute position inside the already-written bytes
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.len() {
            return Err(Error::OutOfBounds {
                offset: pos,
                requested: 0,
                len: self.len(),
            });
        }
        self.inner.seek(SeekFrom::Start(pos as u64))?;
        Ok(())
    }

    /// Move to the end of the sink
    pub fn seek_end(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::End(0))?;
        Ok(())
    }
}
