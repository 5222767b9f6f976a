//! # Length-Prefixed Sequences
//!
//! The "assigned" family: a sequence written as a 32-bit element count followed
//! by each element in order. Built on the primitive codec, so any [`Primitive`]
//! element type works, plus helpers for UUIDs and UTF-8 text.
//!
//! ## Wire Format
//! ```text
//! [Count(32)] [Element(BITS)] x Count
//! UUID:   [High(64)] [Low(64)]
//! String: [ByteCount(32)] [UTF-8 bytes]
//! ```
//!
//! Counts are capped at `2^31-1` ([`MAX_ASSIGNED_LEN`]). A negative prefix on read
//! is rejected, and the remaining bits are checked before anything is allocated.

use crate::core::bit_buffer::BitBuffer;
use crate::core::primitive::Primitive;
use crate::error::{constants, ProtocolError, Result};
use uuid::Uuid;

/// Largest element count a length prefix can carry
pub const MAX_ASSIGNED_LEN: usize = i32::MAX as usize;

/// Width of a length prefix in bits
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Bits needed to store `len` elements of `T` with their prefix.
pub fn assigned_bits<T: Primitive>(len: usize) -> usize {
    LENGTH_PREFIX_BITS + len * T::BITS
}

impl BitBuffer {
    fn put_length(&mut self, len: usize) -> Result<()> {
        let prefix = i32::try_from(len).map_err(|_| {
            ProtocolError::RangeError(format!("{}: {len}", constants::ERR_LENGTH_TOO_LARGE))
        })?;
        self.put_i32(prefix)
    }

    /// Read a length prefix and make sure `element_bits`-wide elements of that
    /// count are actually present.
    fn get_length(&mut self, element_bits: usize) -> Result<usize> {
        let prefix = self.get_i32()?;
        let len = usize::try_from(prefix).map_err(|_| {
            ProtocolError::RangeError(format!("{}: {prefix}", constants::ERR_NEGATIVE_LENGTH))
        })?;

        let needed = len.saturating_mul(element_bits);
        if needed > self.remaining() {
            return Err(ProtocolError::Underflow {
                requested: needed,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    pub fn put_assigned<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
        self.put_length(values.len())?;
        for &value in values {
            value.put_into(self)?;
        }
        Ok(())
    }

    pub fn get_assigned<T: Primitive>(&mut self) -> Result<Vec<T>> {
        let len = self.get_length(T::BITS)?;
        (0..len).map(|_| T::get_from(self)).collect()
    }

    pub fn put_assigned_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_length(bytes.len())?;
        self.put_byte_array(bytes)
    }

    pub fn get_assigned_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.get_length(8)?;
        self.get_byte_array(len)
    }

    /// Write a UUID as its high and then low 64 bits.
    pub fn put_uuid(&mut self, id: Uuid) -> Result<()> {
        let (high, low) = id.as_u64_pair();
        self.put_i64(high as i64)?;
        self.put_i64(low as i64)
    }

    pub fn get_uuid(&mut self) -> Result<Uuid> {
        let high = self.get_i64()? as u64;
        let low = self.get_i64()? as u64;
        Ok(Uuid::from_u64_pair(high, low))
    }

    /// Write text as length-prefixed UTF-8.
    pub fn put_string(&mut self, text: &str) -> Result<()> {
        self.put_assigned_bytes(text.as_bytes())
    }

    pub fn get_string(&mut self) -> Result<String> {
        let bytes = self.get_assigned_bytes()?;
        String::from_utf8(bytes).map_err(|e| ProtocolError::InvalidText(e.to_string()))
    }
}

/// Bits needed to store `text` with [`BitBuffer::put_string`].
pub fn string_bits(text: &str) -> usize {
    LENGTH_PREFIX_BITS + text.len() * 8
}

/// Bits needed to store a UUID
pub const UUID_BITS: usize = 128;
