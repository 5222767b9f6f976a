//! # Core Codec Components
//!
//! Bit-level buffer, primitive codecs and length-prefixed sequences.
//!
//! This module is the foundation of the wire format: every higher layer reads
//! and writes exclusively through a [`bit_buffer::BitBuffer`].
//!
//! ## Components
//! - **BitBuffer**: fixed-capacity, cursor-addressed bit storage
//! - **Primitive**: fixed-width and variable-width integer/float codecs
//! - **Assigned**: 32-bit length-prefixed sequences, UUIDs and UTF-8 text
//!
//! ## Wire Format
//! ```text
//! All fields big-endian, most significant bit first.
//! Signed integers: two's complement. Floats: IEEE-754.
//! Sequences: [Count(32)] [Elements...]
//! ```

pub mod assigned;
pub mod bit_buffer;
pub mod primitive;
