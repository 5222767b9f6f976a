//! Game lobby packets and the process-wide registry that reconstructs them.

use crate::core::assigned::{string_bits, UUID_BITS};
use crate::core::bit_buffer::BitBuffer;
use crate::error::Result;
use crate::protocol::envelope::{self, Encodable, Packet};
use crate::protocol::registry::TypeRegistry;
use once_cell::sync::OnceCell;
use uuid::Uuid;

/// Request to open a new game lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGame {
    pub player_name: String,
    pub max_players: i32,
    pub private_game: bool,
}

impl Packet for CreateGame {
    const TYPE_TAG: &'static str = "CreateGame";

    fn encode_payload(&self) -> Result<Vec<u8>> {
        let mut buffer = BitBuffer::with_capacity(string_bits(&self.player_name) + 32 + 1);
        buffer.put_string(&self.player_name)?;
        buffer.put_i32(self.max_players)?;
        buffer.put_bool(self.private_game)?;
        Ok(buffer.into_bytes())
    }

    fn decode_payload(payload: &[u8]) -> Result<Self> {
        let mut buffer = BitBuffer::wrap_bytes(payload);
        Ok(Self {
            player_name: buffer.get_string()?,
            max_players: buffer.get_i32()?,
            private_game: buffer.get_bool()?,
        })
    }
}

/// Request to join an existing game lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGame {
    pub game_id: Uuid,
    pub player_name: String,
}

impl Packet for JoinGame {
    const TYPE_TAG: &'static str = "JoinGame";

    fn encode_payload(&self) -> Result<Vec<u8>> {
        let mut buffer = BitBuffer::with_capacity(UUID_BITS + string_bits(&self.player_name));
        buffer.put_uuid(self.game_id)?;
        buffer.put_string(&self.player_name)?;
        Ok(buffer.into_bytes())
    }

    fn decode_payload(payload: &[u8]) -> Result<Self> {
        let mut buffer = BitBuffer::wrap_bytes(payload);
        Ok(Self {
            game_id: buffer.get_uuid()?,
            player_name: buffer.get_string()?,
        })
    }
}

/// Every packet the lobby protocol knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePacket {
    CreateGame(CreateGame),
    JoinGame(JoinGame),
}

impl Encodable for GamePacket {
    fn type_tag(&self) -> &str {
        match self {
            GamePacket::CreateGame(_) => CreateGame::TYPE_TAG,
            GamePacket::JoinGame(_) => JoinGame::TYPE_TAG,
        }
    }

    fn payload(&self) -> Result<Vec<u8>> {
        match self {
            GamePacket::CreateGame(packet) => packet.encode_payload(),
            GamePacket::JoinGame(packet) => packet.encode_payload(),
        }
    }
}

impl From<CreateGame> for GamePacket {
    fn from(packet: CreateGame) -> Self {
        GamePacket::CreateGame(packet)
    }
}

impl From<JoinGame> for GamePacket {
    fn from(packet: JoinGame) -> Self {
        GamePacket::JoinGame(packet)
    }
}

static REGISTRY: OnceCell<TypeRegistry<GamePacket>> = OnceCell::new();

fn build_registry() -> Result<TypeRegistry<GamePacket>> {
    let mut registry = TypeRegistry::new();
    registry.register_packet::<CreateGame, _>(GamePacket::CreateGame)?;
    registry.register_packet::<JoinGame, _>(GamePacket::JoinGame)?;
    Ok(registry)
}

impl GamePacket {
    /// Registry of all game packets, built on first use and read-only afterwards.
    pub fn registry() -> Result<&'static TypeRegistry<GamePacket>> {
        REGISTRY.get_or_try_init(build_registry)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        envelope::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        envelope::decode(bytes, Self::registry()?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_create_game_payload_layout() {
        let packet = CreateGame {
            player_name: "Tom".into(),
            max_players: 4,
            private_game: true,
        };
        let payload = packet.encode_payload().unwrap();
        assert_eq!(
            payload,
            vec![0, 0, 0, 3, b'T', b'o', b'm', 0, 0, 0, 4, 0b1000_0000]
        );
        assert_eq!(CreateGame::decode_payload(&payload).unwrap(), packet);
    }

    #[test]
    fn test_join_game_payload_is_symmetric() {
        let packet = JoinGame {
            game_id: Uuid::new_v4(),
            player_name: "Ana".into(),
        };
        let payload = packet.encode_payload().unwrap();
        assert_eq!(payload.len(), 16 + 4 + 3);
        assert_eq!(JoinGame::decode_payload(&payload).unwrap(), packet);
    }

    #[test]
    fn test_registry_holds_every_variant() {
        let registry = GamePacket::registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("CreateGame"));
        assert!(registry.contains("JoinGame"));
        assert!(std::ptr::eq(registry, GamePacket::registry().unwrap()));
    }

    #[test]
    fn test_enum_tags_match_variants() {
        let create: GamePacket = CreateGame {
            player_name: String::new(),
            max_players: 0,
            private_game: false,
        }
        .into();
        assert_eq!(create.type_tag(), "CreateGame");
    }
}
