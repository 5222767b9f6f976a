// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::core::bit_buffer::BitBuffer;
use crate::error::{ProtocolError, Result};
use crate::protocol::envelope::{self, Encodable, Envelope, Packet};
use crate::protocol::packets::{CreateGame, GamePacket, JoinGame};
use crate::protocol::registry::TypeRegistry;
use uuid::Uuid;

#[test]
fn test_create_game_envelope_roundtrip() {
    // =================== Step 1: Sender encodes ===================
    let packet = CreateGame {
        player_name: "Tom".to_string(),
        max_players: 4,
        private_game: true,
    };
    let bytes = envelope::encode(&packet).expect("encode should succeed");

    // =================== Step 2: Receiver registers and decodes ===================
    let mut registry: TypeRegistry<CreateGame> = TypeRegistry::new();
    registry
        .register("CreateGame", |payload| {
            let mut buffer = BitBuffer::wrap_bytes(payload);
            Ok(CreateGame {
                player_name: buffer.get_string()?,
                max_players: buffer.get_i32()?,
                private_game: buffer.get_bool()?,
            })
        })
        .unwrap();

    let decoded = envelope::decode(&bytes, &registry).expect("decode should succeed");
    assert_eq!(decoded, packet);
}

#[test]
fn test_game_packet_dispatch() {
    let packets = vec![
        GamePacket::CreateGame(CreateGame {
            player_name: "Lena".to_string(),
            max_players: 6,
            private_game: false,
        }),
        GamePacket::JoinGame(JoinGame {
            game_id: Uuid::new_v4(),
            player_name: "Bo".to_string(),
        }),
    ];

    for packet in packets {
        let bytes = packet.encode().unwrap();
        let envelope = Envelope::from_bytes(&bytes).unwrap();
        assert_eq!(envelope.type_tag(), packet.type_tag());

        assert_eq!(GamePacket::decode(&bytes).unwrap(), packet);
    }
}

#[test]
fn test_heterogeneous_encode_through_trait_objects() {
    let create = CreateGame {
        player_name: "A".to_string(),
        max_players: 2,
        private_game: true,
    };
    let join = JoinGame {
        game_id: Uuid::nil(),
        player_name: "B".to_string(),
    };
    let values: Vec<&dyn Encodable> = vec![&create, &join];

    let decoded: Vec<GamePacket> = values
        .into_iter()
        .map(|value| envelope::encode(value).unwrap())
        .map(|bytes| GamePacket::decode(&bytes).unwrap())
        .collect();

    assert_eq!(
        decoded,
        vec![GamePacket::CreateGame(create), GamePacket::JoinGame(join)]
    );
}

#[test]
fn test_unregistered_tag_fails_unknown_type() {
    let bytes = Envelope::new("TradeOffer", vec![1, 2, 3]).to_bytes().unwrap();
    match GamePacket::decode(&bytes) {
        Err(ProtocolError::UnknownType(tag)) => assert_eq!(tag, "TradeOffer"),
        other => panic!("Expected UnknownType, got {other:?}"),
    }
}

#[test]
fn test_corrupt_payload_fails_construction() {
    // A CreateGame tag with a payload too short to hold the player name prefix
    let bytes = Envelope::new(CreateGame::TYPE_TAG, vec![0, 0]).to_bytes().unwrap();
    match GamePacket::decode(&bytes) {
        Err(ProtocolError::ConstructionFailed { type_tag, .. }) => {
            assert_eq!(type_tag, "CreateGame")
        }
        other => panic!("Expected ConstructionFailed, got {other:?}"),
    }
}

#[test]
fn test_open_parsed_envelope() {
    let join = JoinGame {
        game_id: Uuid::from_u64_pair(1, 2),
        player_name: "Kim".to_string(),
    };
    let parsed = Envelope::from_bytes(&envelope::encode(&join).unwrap()).unwrap();
    let packet = parsed.open(GamePacket::registry().unwrap()).unwrap();
    assert_eq!(packet, GamePacket::JoinGame(join));
}

struct Score(i64);

impl Packet for Score {
    const TYPE_TAG: &'static str = "Score";

    fn encode_payload(&self) -> Result<Vec<u8>> {
        let mut buffer = BitBuffer::allocate(20)?;
        buffer.put_var_signed(self.0, 20)?;
        Ok(buffer.into_bytes())
    }

    fn decode_payload(payload: &[u8]) -> Result<Self> {
        let mut buffer = BitBuffer::wrap_bytes(payload);
        Ok(Score(buffer.get_var_signed(20)?))
    }
}

#[test]
fn test_custom_packet_with_var_width_payload() {
    let mut registry: TypeRegistry<i64> = TypeRegistry::new();
    registry.register_packet(|score: Score| score.0).unwrap();

    let bytes = envelope::encode(&Score(-500_000)).unwrap();
    assert_eq!(envelope::decode(&bytes, &registry).unwrap(), -500_000);

    // Out of range for a 20-bit field: the sender fails, nothing is produced
    assert!(matches!(
        envelope::encode(&Score(1 << 20)),
        Err(ProtocolError::RangeError(_))
    ));
}
