// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked cursor for reading service data payloads.
//!
//! BLE advertising payloads are flat byte sequences with no alignment
//! rules; fields are read at cumulative offsets with per-field width,
//! signedness and endianness. Every read is bounds-checked and returns a
//! [`CodecError::BufferTooShort`] failure instead of panicking, so a
//! malformed advertisement can never crash the decode path.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::{CodecError, Result};

/// Cursor over a service data payload or element slice.
///
/// Tracks the current read position; reads advance the position by the
/// field width. Decoders validate the frame length up front and then read
/// fields in wire order.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of the given payload.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Get the current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Get the total payload length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the remaining bytes available to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Check if at end of payload.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Consume `count` bytes, returning the slice read.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(CodecError::buffer_too_short(
                count,
                self.remaining(),
                self.offset,
            ));
        }
        let slice = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    /// Skip `count` bytes without interpreting them.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read a big-endian u16.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read a little-endian i16.
    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    /// Read a little-endian 24-bit unsigned integer.
    pub fn read_u24_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u24(self.read_bytes(3)?))
    }

    /// Read a little-endian 24-bit signed integer.
    pub fn read_i24_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i24(self.read_bytes(3)?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a big-endian u32.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a little-endian i32.
    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read `count` bytes as a lowercase hexadecimal string.
    pub fn read_hex(&mut self, count: usize) -> Result<String> {
        Ok(hex::encode(self.read_bytes(count)?))
    }

    /// Read all remaining bytes as a lowercase hexadecimal string.
    pub fn read_hex_to_end(&mut self) -> Result<String> {
        self.read_hex(self.remaining())
    }

    /// Read `count` bytes as UTF-8 text, replacing invalid sequences.
    pub fn read_utf8(&mut self, count: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(self.read_bytes(count)?).into_owned())
    }

    /// Read all remaining bytes as UTF-8 text.
    pub fn read_utf8_to_end(&mut self) -> Result<String> {
        self.read_utf8(self.remaining())
    }
}
