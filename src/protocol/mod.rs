//! # Packet Protocol
//!
//! Envelope framing and type-tag dispatch for typed packets.
//!
//! ## Components
//! - **Envelope**: `[TagLen][Tag][PayloadLen][Payload]` wire unit
//! - **Registry**: type tag to factory table, built once at startup
//! - **Packets**: the lobby packet variants and their shared registry
//!
//! ## Flow
//! ```text
//! value -> payload bytes -> Envelope -> bytes -> transport
//! bytes -> Envelope tag -> registry lookup -> factory(payload) -> value
//! ```

pub mod envelope;
pub mod packets;
pub mod registry;

#[cfg(test)]
mod tests;
