//! # bit-protocol
//!
//! Bit-precise binary codec and self-describing packet envelope.
//!
//! ## Layers
//! - [`core`]: bit buffer, primitive and variable-width codecs, length-prefixed sequences
//! - [`protocol`]: envelope framing, type registry, lobby packets
//! - [`config`]: codec limits and logging configuration
//! - [`utils`]: logging setup and metrics
//!
//! ## Example
//! ```rust
//! use bit_protocol::protocol::packets::{CreateGame, GamePacket};
//!
//! let packet = GamePacket::CreateGame(CreateGame {
//!     player_name: "Tom".to_string(),
//!     max_players: 4,
//!     private_game: true,
//! });
//!
//! let bytes = packet.encode()?;
//! assert_eq!(GamePacket::decode(&bytes)?, packet);
//! # Ok::<(), bit_protocol::ProtocolError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::bit_buffer::BitBuffer;
pub use crate::core::primitive::{Primitive, VarWidth};
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::envelope::{Encodable, Envelope, Packet};
pub use crate::protocol::registry::TypeRegistry;
