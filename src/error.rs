//! # Error Types
//!
//! Error handling for the bit codec and the packet envelope.
//!
//! This module defines every failure the codec can raise, from bit-level cursor
//! violations up to envelope dispatch failures.
//!
//! ## Error Categories
//! - **Buffer Errors**: negative capacity, overflow on write, underflow on read
//! - **Range Errors**: values or bit counts a width cannot represent
//! - **Dispatch Errors**: unknown type tags, duplicate registrations, failing factories
//! - **Limit Errors**: envelopes or fields larger than the configured maximums
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use bit_protocol::core::bit_buffer::BitBuffer;
//! use bit_protocol::error::{ProtocolError, Result};
//!
//! fn first_byte(bytes: &[u8]) -> Result<u8> {
//!     let mut buffer = BitBuffer::wrap_bytes(bytes);
//!     buffer.get_u8()
//! }
//!
//! assert_eq!(first_byte(&[0xB2]).ok(), Some(0xB2));
//! assert!(matches!(first_byte(&[]), Err(ProtocolError::Underflow { .. })));
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Buffer errors
    pub const ERR_NEGATIVE_CAPACITY: &str = "Buffer capacity must not be negative";
    pub const ERR_CAPACITY_TOO_LARGE: &str = "Buffer capacity exceeds addressable memory";

    /// Variable-width integer errors
    pub const ERR_BIT_COUNT_RANGE: &str = "Bit count must be between 1 and 64";
    pub const ERR_NEGATIVE_UNSIGNED: &str = "Negative values are not allowed for unsigned numbers";
    pub const ERR_EMPTY_RANGE: &str = "Minimum value must not be greater than maximum value";

    /// Collection errors
    pub const ERR_NEGATIVE_LENGTH: &str = "Length prefix is negative";
    pub const ERR_LENGTH_TOO_LARGE: &str = "Sequence length exceeds 2^31-1 elements";

    /// Registry errors
    pub const ERR_EMPTY_TYPE_TAG: &str = "Type tag must not be empty";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Capacity error: {0}")]
    CapacityError(String),

    #[error("Buffer overflow: {requested} bits requested, {remaining} remaining")]
    Overflow { requested: usize, remaining: usize },

    #[error("Buffer underflow: {requested} bits requested, {remaining} remaining")]
    Underflow { requested: usize, remaining: usize },

    #[error("Range error: {0}")]
    RangeError(String),

    #[error("Invalid UTF-8 text: {0}")]
    InvalidText(String),

    #[error("Unknown packet type: {0}")]
    UnknownType(String),

    #[error("Packet type already registered: {0}")]
    DuplicateType(String),

    #[error("Failed to construct packet '{type_tag}': {reason}")]
    ConstructionFailed { type_tag: String, reason: String },

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
