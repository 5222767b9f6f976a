//! # Bit Buffer
//!
//! A fixed-capacity, cursor-addressed sequence of bits.
//!
//! Every codec in this crate reads and writes through a [`BitBuffer`]. Bits are
//! stored packed, most significant bit of each byte first, so the backing bytes
//! are exactly the wire bytes and [`BitBuffer::as_bytes`] needs no conversion.
//!
//! ## Cursor Rules
//! - Every successful read or write advances the position by the number of bits
//!   it consumed or produced
//! - Writing at `position >= capacity` fails with `Overflow`
//! - Reading more bits than remain fails with `Underflow`
//! - Multi-bit writes are not atomic: an `Overflow` part way through leaves the
//!   leading bits written, so a buffer must be discarded after a write failure
//! - Bulk reads check the full length first and leave the cursor untouched on failure
//!
//! ## Ownership
//! All mutating operations take `&mut self`, so a buffer is always owned by a
//! single encode or decode call at a time. Distinct buffers never share storage.

use crate::core::primitive::{self, Primitive};
use crate::error::{constants, ProtocolError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitBuffer {
    storage: Vec<u8>,
    capacity: usize,
    position: usize,
}

impl BitBuffer {
    /// Allocate a zeroed buffer holding `capacity_bits` bits.
    ///
    /// # Errors
    /// `CapacityError` when `capacity_bits` is negative or not addressable.
    pub fn allocate(capacity_bits: i64) -> Result<Self> {
        if capacity_bits < 0 {
            return Err(ProtocolError::CapacityError(format!(
                "{}: {capacity_bits}",
                constants::ERR_NEGATIVE_CAPACITY
            )));
        }
        let capacity = usize::try_from(capacity_bits).map_err(|_| {
            ProtocolError::CapacityError(format!(
                "{}: {capacity_bits}",
                constants::ERR_CAPACITY_TOO_LARGE
            ))
        })?;
        Ok(Self::with_capacity(capacity))
    }

    /// Allocate a zeroed buffer of `capacity_bits` bits.
    pub fn with_capacity(capacity_bits: usize) -> Self {
        Self {
            storage: vec![0; capacity_bits.div_ceil(8)],
            capacity: capacity_bits,
            position: 0,
        }
    }

    /// Copy a bit sequence into a new buffer positioned at zero.
    pub fn wrap_bits(bits: &[bool]) -> Self {
        Self {
            storage: primitive::decode_bytes(bits),
            capacity: bits.len(),
            position: 0,
        }
    }

    /// Copy a byte sequence into a new buffer positioned at zero.
    ///
    /// Each byte contributes 8 bits, most significant first.
    pub fn wrap_bytes(bytes: &[u8]) -> Self {
        Self {
            storage: bytes.to_vec(),
            capacity: bytes.len() * 8,
            position: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. Bounds are only enforced by later reads and writes.
    #[inline]
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Bits between the cursor and the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.position)
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    #[inline]
    fn bit_at(&self, index: usize) -> bool {
        (self.storage[index / 8] >> (7 - (index % 8))) & 1 == 1
    }

    #[inline]
    fn set_bit(&mut self, index: usize, value: bool) {
        let mask = 1u8 << (7 - (index % 8));
        if value {
            self.storage[index / 8] |= mask;
        } else {
            self.storage[index / 8] &= !mask;
        }
    }

    fn ensure_readable(&self, requested: usize) -> Result<()> {
        match self.position.checked_add(requested) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(ProtocolError::Underflow {
                requested,
                remaining: self.remaining(),
            }),
        }
    }

    /// Write one bit at the cursor.
    pub fn put(&mut self, bit: bool) -> Result<()> {
        if self.position >= self.capacity {
            return Err(ProtocolError::Overflow {
                requested: 1,
                remaining: 0,
            });
        }
        self.set_bit(self.position, bit);
        self.position += 1;
        Ok(())
    }

    /// Write bits in order. Not atomic: see the module docs.
    pub fn put_bits(&mut self, bits: &[bool]) -> Result<()> {
        let remaining = self.remaining();
        for &bit in bits {
            self.put(bit).map_err(|_| ProtocolError::Overflow {
                requested: bits.len(),
                remaining,
            })?;
        }
        Ok(())
    }

    /// Read one bit at the cursor.
    pub fn get(&mut self) -> Result<bool> {
        self.ensure_readable(1)?;
        let bit = self.bit_at(self.position);
        self.position += 1;
        Ok(bit)
    }

    /// Fill `dst` with the next `dst.len()` bits.
    pub fn get_into(&mut self, dst: &mut [bool]) -> Result<()> {
        self.ensure_readable(dst.len())?;
        for (offset, slot) in dst.iter_mut().enumerate() {
            *slot = self.bit_at(self.position + offset);
        }
        self.position += dst.len();
        Ok(())
    }

    /// Read the next `count` bits into a new vector.
    pub fn get_bits(&mut self, count: usize) -> Result<Vec<bool>> {
        self.ensure_readable(count)?;
        let mut bits = vec![false; count];
        self.get_into(&mut bits)?;
        Ok(bits)
    }

    /// Write raw bytes, 8 bits each.
    pub fn put_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        let aligned = self.position % 8 == 0;
        if aligned && bytes.len() * 8 <= self.remaining() {
            let start = self.position / 8;
            self.storage[start..start + bytes.len()].copy_from_slice(bytes);
            self.position += bytes.len() * 8;
            return Ok(());
        }
        for &byte in bytes {
            byte.put_into(self)?;
        }
        Ok(())
    }

    /// Read exactly `len` bytes.
    ///
    /// A read ending precisely at the end of the buffer succeeds.
    pub fn get_byte_array(&mut self, len: usize) -> Result<Vec<u8>> {
        let bits = len.checked_mul(8).ok_or(ProtocolError::Underflow {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.ensure_readable(bits)?;

        if self.position % 8 == 0 {
            let start = self.position / 8;
            let bytes = self.storage[start..start + len].to_vec();
            self.position += bits;
            return Ok(bytes);
        }

        (0..len).map(|_| u8::get_from(self)).collect()
    }

    pub fn put_bool(&mut self, value: bool) -> Result<()> {
        self.put(value)
    }

    pub fn get_bool(&mut self) -> Result<bool> {
        self.get()
    }

    pub fn put_i8(&mut self, value: i8) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_i8(&mut self) -> Result<i8> {
        i8::get_from(self)
    }

    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        u8::get_from(self)
    }

    /// Write a 16-bit UTF-16 code unit.
    pub fn put_char(&mut self, value: u16) -> Result<()> {
        value.put_into(self)
    }

    /// Read a 16-bit UTF-16 code unit.
    pub fn get_char(&mut self) -> Result<u16> {
        u16::get_from(self)
    }

    pub fn put_i16(&mut self, value: i16) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_i16(&mut self) -> Result<i16> {
        i16::get_from(self)
    }

    pub fn put_i32(&mut self, value: i32) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_i32(&mut self) -> Result<i32> {
        i32::get_from(self)
    }

    pub fn put_i64(&mut self, value: i64) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_i64(&mut self) -> Result<i64> {
        i64::get_from(self)
    }

    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_f32(&mut self) -> Result<f32> {
        f32::get_from(self)
    }

    pub fn put_f64(&mut self, value: f64) -> Result<()> {
        value.put_into(self)
    }

    pub fn get_f64(&mut self) -> Result<f64> {
        f64::get_from(self)
    }

    /// Write `value` as a `bit_count`-wide integer.
    ///
    /// # Errors
    /// `RangeError` if the width is invalid or cannot hold the value (nothing is
    /// written in that case), `Overflow` if the buffer runs out of room.
    pub fn put_var(&mut self, value: i128, bit_count: u32, signed: bool) -> Result<()> {
        let bits = primitive::encode_var(value, bit_count, signed)?;
        self.put_bits(&bits)
    }

    /// Read a `bit_count`-wide integer.
    pub fn get_var(&mut self, bit_count: u32, signed: bool) -> Result<i128> {
        primitive::VarWidth::new(bit_count, signed)?;
        let bits = self.get_bits(bit_count as usize)?;
        primitive::decode_var(&bits, signed)
    }

    pub fn put_var_signed(&mut self, value: i64, bit_count: u32) -> Result<()> {
        self.put_var(i128::from(value), bit_count, true)
    }

    pub fn get_var_signed(&mut self, bit_count: u32) -> Result<i64> {
        let value = self.get_var(bit_count, true)?;
        i64::try_from(value).map_err(|e| ProtocolError::RangeError(e.to_string()))
    }

    pub fn put_var_unsigned(&mut self, value: u64, bit_count: u32) -> Result<()> {
        self.put_var(i128::from(value), bit_count, false)
    }

    pub fn get_var_unsigned(&mut self, bit_count: u32) -> Result<u64> {
        let value = self.get_var(bit_count, false)?;
        u64::try_from(value).map_err(|e| ProtocolError::RangeError(e.to_string()))
    }

    /// The whole backing store as bytes, independent of the cursor.
    ///
    /// When the capacity is not a multiple of 8 the last byte is padded with zero bits.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.storage
    }

    /// Copy of the backing bits.
    pub fn to_bits(&self) -> Vec<bool> {
        (0..self.capacity).map(|i| self.bit_at(i)).collect()
    }

    /// Render every bit as `0` or `1`.
    pub fn to_bit_string(&self) -> String {
        (0..self.capacity)
            .map(|i| if self.bit_at(i) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer[pos={} cap={}]", self.position, self.capacity)
    }
}
