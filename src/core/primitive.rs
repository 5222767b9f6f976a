//! # Primitive Codec
//!
//! Stateless conversions between Rust primitives and bit sequences.
//!
//! Every encoder here has an exact inverse decoder. Bits are always emitted
//! most-significant first, signed integers use two's complement and floats reuse
//! their IEEE-754 bit layout verbatim.
//!
//! | Type   | Bits | Layout                          |
//! |--------|------|---------------------------------|
//! | `bool` | 1    | `1` = true                      |
//! | `i8`   | 8    | two's complement                |
//! | `u8`   | 8    | unsigned                        |
//! | `u16`  | 16   | UTF-16 code unit ("char")       |
//! | `i16`  | 16   | two's complement                |
//! | `i32`  | 32   | two's complement                |
//! | `i64`  | 64   | two's complement                |
//! | `f32`  | 32   | IEEE-754 binary32               |
//! | `f64`  | 64   | IEEE-754 binary64               |
//!
//! The variable-width codec ([`encode_var`] / [`decode_var`]) stores an integer in
//! any width from 1 to 64 bits, validating the value against the range the width
//! can represent.

use crate::core::bit_buffer::BitBuffer;
use crate::error::{constants, ProtocolError, Result};
use std::ops::RangeInclusive;

/// Smallest supported variable-width bit count
pub const MIN_BIT_COUNT: u32 = 1;

/// Largest supported variable-width bit count
pub const MAX_BIT_COUNT: u32 = 64;

#[inline]
fn encode_fixed<const N: usize>(value: u64) -> [bool; N] {
    let mut bits = [false; N];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (value >> (N - 1 - i)) & 1 == 1;
    }
    bits
}

#[inline]
fn decode_fixed(bits: &[bool], width: usize) -> Result<u64> {
    if bits.len() < width {
        return Err(ProtocolError::RangeError(format!(
            "Expected {width} bits, got {}",
            bits.len()
        )));
    }
    Ok(bits[..width]
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
}

pub fn encode_bool(value: bool) -> [bool; 1] {
    [value]
}

pub fn decode_bool(bits: &[bool]) -> Result<bool> {
    decode_fixed(bits, 1).map(|v| v == 1)
}

pub fn encode_i8(value: i8) -> [bool; 8] {
    encode_fixed(u64::from(value as u8))
}

pub fn decode_i8(bits: &[bool]) -> Result<i8> {
    decode_fixed(bits, 8).map(|v| v as u8 as i8)
}

pub fn encode_u8(value: u8) -> [bool; 8] {
    encode_fixed(u64::from(value))
}

pub fn decode_u8(bits: &[bool]) -> Result<u8> {
    decode_fixed(bits, 8).map(|v| v as u8)
}

/// Encode a 16-bit UTF-16 code unit.
pub fn encode_char(value: u16) -> [bool; 16] {
    encode_fixed(u64::from(value))
}

/// Decode a 16-bit UTF-16 code unit.
pub fn decode_char(bits: &[bool]) -> Result<u16> {
    decode_fixed(bits, 16).map(|v| v as u16)
}

pub fn encode_i16(value: i16) -> [bool; 16] {
    encode_fixed(u64::from(value as u16))
}

pub fn decode_i16(bits: &[bool]) -> Result<i16> {
    decode_fixed(bits, 16).map(|v| v as u16 as i16)
}

pub fn encode_i32(value: i32) -> [bool; 32] {
    encode_fixed(u64::from(value as u32))
}

pub fn decode_i32(bits: &[bool]) -> Result<i32> {
    decode_fixed(bits, 32).map(|v| v as u32 as i32)
}

pub fn encode_i64(value: i64) -> [bool; 64] {
    encode_fixed(value as u64)
}

pub fn decode_i64(bits: &[bool]) -> Result<i64> {
    decode_fixed(bits, 64).map(|v| v as i64)
}

/// Encode an `f32` through its IEEE-754 bit pattern.
pub fn encode_f32(value: f32) -> [bool; 32] {
    encode_fixed(u64::from(value.to_bits()))
}

pub fn decode_f32(bits: &[bool]) -> Result<f32> {
    decode_fixed(bits, 32).map(|v| f32::from_bits(v as u32))
}

/// Encode an `f64` through its IEEE-754 bit pattern.
pub fn encode_f64(value: f64) -> [bool; 64] {
    encode_fixed(value.to_bits())
}

pub fn decode_f64(bits: &[bool]) -> Result<f64> {
    decode_fixed(bits, 64).map(f64::from_bits)
}

/// Expand bytes into bits, most significant bit of each byte first.
pub fn encode_bytes(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        bits.extend_from_slice(&encode_u8(byte));
    }
    bits
}

/// Pack bits into bytes. A trailing partial byte is padded with zero bits.
pub fn decode_bytes(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

fn check_bit_count(bit_count: u32) -> Result<()> {
    if (MIN_BIT_COUNT..=MAX_BIT_COUNT).contains(&bit_count) {
        Ok(())
    } else {
        Err(ProtocolError::RangeError(format!(
            "{}, got {bit_count}",
            constants::ERR_BIT_COUNT_RANGE
        )))
    }
}

/// Width and signedness of a variable-width integer field.
///
/// Only [`VarWidth::new`] and [`required_width`] build one, so the width is
/// always within 1..=64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarWidth {
    bit_count: u32,
    signed: bool,
}

impl VarWidth {
    pub fn new(bit_count: u32, signed: bool) -> Result<Self> {
        check_bit_count(bit_count)?;
        Ok(Self { bit_count, signed })
    }

    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Inclusive range of values this width can represent.
    pub fn range(&self) -> RangeInclusive<i128> {
        let n = self.bit_count;
        if self.signed {
            -(1i128 << (n - 1))..=(1i128 << (n - 1)) - 1
        } else {
            0..=(1i128 << n) - 1
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        self.range().contains(&value)
    }
}

/// Representable range of a `bit_count`-wide field.
///
/// Signed: `[-2^(n-1), 2^(n-1)-1]`. Unsigned: `[0, 2^n-1]`.
pub fn range(bit_count: u32, signed: bool) -> Result<RangeInclusive<i128>> {
    VarWidth::new(bit_count, signed).map(|width| width.range())
}

/// Smallest width able to hold every value in `[min, max]`.
///
/// The field is signed exactly when `min` is negative.
pub fn required_width(min: i128, max: i128) -> Result<VarWidth> {
    if min > max {
        return Err(ProtocolError::RangeError(format!(
            "{}: {min} > {max}",
            constants::ERR_EMPTY_RANGE
        )));
    }

    let signed = min < 0;
    (MIN_BIT_COUNT..=MAX_BIT_COUNT)
        .map(|bit_count| VarWidth { bit_count, signed })
        .find(|width| width.contains(min) && width.contains(max))
        .ok_or_else(|| {
            ProtocolError::RangeError(format!("Range {min}..={max} does not fit in 64 bits"))
        })
}

/// Encode `value` into exactly `bit_count` bits.
///
/// Negative signed values are stored as `2^bit_count + value`.
///
/// # Errors
/// `RangeError` when `bit_count` is outside 1..=64, when an unsigned field is
/// given a negative value, or when the value does not fit the width.
pub fn encode_var(value: i128, bit_count: u32, signed: bool) -> Result<Vec<bool>> {
    let width = VarWidth::new(bit_count, signed)?;

    if !signed && value < 0 {
        return Err(ProtocolError::RangeError(format!(
            "{}: {value}",
            constants::ERR_NEGATIVE_UNSIGNED
        )));
    }

    let range = width.range();
    if !range.contains(&value) {
        return Err(ProtocolError::RangeError(format!(
            "Value {value} doesn't fit in {bit_count} bits (signed={signed}), allowed range: {}..={}",
            range.start(),
            range.end()
        )));
    }

    let raw = if value < 0 {
        value + (1i128 << bit_count)
    } else {
        value
    };

    Ok((0..bit_count)
        .map(|i| (raw >> (bit_count - 1 - i)) & 1 == 1)
        .collect())
}

/// Decode a variable-width integer whose width is the length of `bits`.
pub fn decode_var(bits: &[bool], signed: bool) -> Result<i128> {
    let bit_count = u32::try_from(bits.len())
        .ok()
        .filter(|n| (MIN_BIT_COUNT..=MAX_BIT_COUNT).contains(n))
        .ok_or_else(|| {
            ProtocolError::RangeError(format!(
                "{}, got {}",
                constants::ERR_BIT_COUNT_RANGE,
                bits.len()
            ))
        })?;

    let raw = bits
        .iter()
        .fold(0i128, |acc, &bit| (acc << 1) | i128::from(bit));

    if signed && raw & (1i128 << (bit_count - 1)) != 0 {
        Ok(raw - (1i128 << bit_count))
    } else {
        Ok(raw)
    }
}

/// A fixed-width primitive that can be written to and read from a [`BitBuffer`].
///
/// Implemented for every type in the table above. Used by the length-prefixed
/// sequence codec to treat all element types uniformly.
pub trait Primitive: Sized + Copy {
    /// Encoded width in bits
    const BITS: usize;

    fn put_into(self, buffer: &mut BitBuffer) -> Result<()>;

    fn get_from(buffer: &mut BitBuffer) -> Result<Self>;
}

macro_rules! impl_primitive {
    ($ty:ty, $bits:expr, $encode:ident, $decode:ident) => {
        impl Primitive for $ty {
            const BITS: usize = $bits;

            #[inline]
            fn put_into(self, buffer: &mut BitBuffer) -> Result<()> {
                buffer.put_bits(&$encode(self))
            }

            #[inline]
            fn get_from(buffer: &mut BitBuffer) -> Result<Self> {
                let mut bits = [false; $bits];
                buffer.get_into(&mut bits)?;
                $decode(&bits)
            }
        }
    };
}

impl_primitive!(bool, 1, encode_bool, decode_bool);
impl_primitive!(i8, 8, encode_i8, decode_i8);
impl_primitive!(u8, 8, encode_u8, decode_u8);
impl_primitive!(u16, 16, encode_char, decode_char);
impl_primitive!(i16, 16, encode_i16, decode_i16);
impl_primitive!(i32, 32, encode_i32, decode_i32);
impl_primitive!(i64, 64, encode_i64, decode_i64);
impl_primitive!(f32, 32, encode_f32, decode_f32);
impl_primitive!(f64, 64, encode_f64, decode_f64);
