#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the bit codec and envelope
//! Tests boundary conditions, exact-fit reads/writes and error scenarios

use bit_protocol::config::CodecConfig;
use bit_protocol::core::assigned::{assigned_bits, LENGTH_PREFIX_BITS};
use bit_protocol::core::primitive::{decode_var, encode_var, range};
use bit_protocol::error::ProtocolError;
use bit_protocol::protocol::envelope::{self, Envelope};
use bit_protocol::protocol::packets::{CreateGame, GamePacket, JoinGame};
use bit_protocol::BitBuffer;
use uuid::Uuid;

// ============================================================================
// BIT BUFFER BOUNDARIES
// ============================================================================

#[test]
fn test_exact_fit_write_then_overflow() {
    let mut buffer = BitBuffer::allocate(64).unwrap();
    buffer.put_i32(1).unwrap();
    buffer.put_i32(2).unwrap();
    assert_eq!(buffer.remaining(), 0);
    assert!(matches!(
        buffer.put_bool(true),
        Err(ProtocolError::Overflow { .. })
    ));
}

#[test]
fn test_exact_fit_read_then_underflow() {
    let mut buffer = BitBuffer::wrap_bytes(&[0x12, 0x34, 0x56, 0x78]);
    assert_eq!(buffer.get_i32().unwrap(), 0x1234_5678);
    assert!(matches!(
        buffer.get_i8(),
        Err(ProtocolError::Underflow {
            requested: 8,
            remaining: 0
        })
    ));
}

#[test]
fn test_byte_array_read_ending_at_capacity_succeeds() {
    let mut buffer = BitBuffer::wrap_bytes(&[1, 2, 3, 4]);
    assert_eq!(buffer.get_byte_array(4).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_byte_array_read_one_bit_past_capacity_fails() {
    let mut buffer = BitBuffer::wrap_bytes(&[1, 2, 3, 4]);
    buffer.set_position(1);
    assert!(matches!(
        buffer.get_byte_array(4),
        Err(ProtocolError::Underflow {
            requested: 32,
            remaining: 31
        })
    ));
    assert_eq!(buffer.position(), 1);
}

#[test]
fn test_zero_capacity_buffer() {
    let mut buffer = BitBuffer::allocate(0).unwrap();
    assert!(matches!(buffer.put(false), Err(ProtocolError::Overflow { .. })));
    assert!(matches!(buffer.get(), Err(ProtocolError::Underflow { .. })));
    assert!(buffer.get_bits(0).unwrap().is_empty());
}

#[test]
fn test_negative_capacity() {
    match BitBuffer::allocate(-8) {
        Err(ProtocolError::CapacityError(msg)) => assert!(msg.contains("-8")),
        other => panic!("Expected CapacityError, got {other:?}"),
    }
}

#[test]
fn test_as_bytes_ignores_cursor() {
    let mut buffer = BitBuffer::allocate(16).unwrap();
    buffer.put_i16(-2).unwrap();
    buffer.set_position(3);
    assert_eq!(buffer.as_bytes(), &[0xFF, 0xFE]);
    assert_eq!(buffer.position(), 3);
}

#[test]
fn test_overwrite_after_reposition() {
    let mut buffer = BitBuffer::allocate(8).unwrap();
    buffer.put_u8(0xFF).unwrap();
    buffer.set_position(4);
    buffer.put_bits(&[false; 4]).unwrap();
    assert_eq!(buffer.as_bytes(), &[0xF0]);
}

// ============================================================================
// VARIABLE-WIDTH INTEGERS
// ============================================================================

#[test]
fn test_negative_three_in_four_bits() {
    let bits = encode_var(-3, 4, true).unwrap();
    assert_eq!(bits, vec![true, true, false, true]);
    assert_eq!(decode_var(&bits, true).unwrap(), -3);
}

#[test]
fn test_unsigned_three_bits() {
    assert!(encode_var(5, 3, false).is_ok());
    assert!(matches!(
        encode_var(8, 3, false),
        Err(ProtocolError::RangeError(_))
    ));
}

#[test]
fn test_signed_boundaries_every_width() {
    for bit_count in 1..=64u32 {
        let r = range(bit_count, true).unwrap();
        let (min, max) = (*r.start(), *r.end());
        assert_eq!(decode_var(&encode_var(min, bit_count, true).unwrap(), true).unwrap(), min);
        assert_eq!(decode_var(&encode_var(max, bit_count, true).unwrap(), true).unwrap(), max);
        assert!(encode_var(min - 1, bit_count, true).is_err());
        assert!(encode_var(max + 1, bit_count, true).is_err());
    }
}

#[test]
fn test_unsigned_boundaries_every_width() {
    for bit_count in 1..=64u32 {
        let max = *range(bit_count, false).unwrap().end();
        let bits = encode_var(max, bit_count, false).unwrap();
        assert_eq!(bits.len(), bit_count as usize);
        assert!(bits.iter().all(|&b| b));
        assert_eq!(decode_var(&bits, false).unwrap(), max);
        assert!(encode_var(max + 1, bit_count, false).is_err());
        assert!(encode_var(-1, bit_count, false).is_err());
    }
}

#[test]
fn test_var_read_underflow() {
    let mut buffer = BitBuffer::allocate(10).unwrap();
    assert!(matches!(
        buffer.get_var(11, true),
        Err(ProtocolError::Underflow { .. })
    ));
    assert_eq!(buffer.position(), 0);
}

// ============================================================================
// SEQUENCES
// ============================================================================

#[test]
fn test_sequence_underflow_midway() {
    let mut buffer = BitBuffer::with_capacity(assigned_bits::<i16>(3));
    buffer.put_assigned(&[1i16, 2, 3]).unwrap();
    let truncated = &buffer.as_bytes()[..buffer.as_bytes().len() - 1];

    let mut reader = BitBuffer::wrap_bytes(truncated);
    assert!(matches!(
        reader.get_assigned::<i16>(),
        Err(ProtocolError::Underflow { .. })
    ));
}

#[test]
fn test_sequence_write_overflow() {
    let mut buffer = BitBuffer::with_capacity(LENGTH_PREFIX_BITS + 16);
    assert!(matches!(
        buffer.put_assigned(&[1i32]),
        Err(ProtocolError::Overflow { .. })
    ));
}

#[test]
fn test_bit_sequence_not_byte_aligned() {
    let bits = [true, false, true, true, false];
    let mut buffer = BitBuffer::with_capacity(assigned_bits::<bool>(bits.len()));
    buffer.put_assigned(&bits).unwrap();
    assert_eq!(buffer.capacity(), 37);

    let mut reader = BitBuffer::wrap_bytes(buffer.as_bytes());
    assert_eq!(reader.get_assigned::<bool>().unwrap(), bits);
    assert_eq!(reader.remaining(), 3);
}

#[test]
fn test_empty_string_and_nil_uuid() {
    let mut buffer = BitBuffer::with_capacity(128 + LENGTH_PREFIX_BITS);
    buffer.put_uuid(Uuid::nil()).unwrap();
    buffer.put_string("").unwrap();
    buffer.rewind();
    assert_eq!(buffer.get_uuid().unwrap(), Uuid::nil());
    assert_eq!(buffer.get_string().unwrap(), "");
}

// ============================================================================
// ENVELOPE
// ============================================================================

#[test]
fn test_create_game_scenario() {
    let packet = CreateGame {
        player_name: "Tom".to_string(),
        max_players: 4,
        private_game: true,
    };
    let bytes = envelope::encode(&packet).unwrap();
    let decoded = GamePacket::decode(&bytes).unwrap();
    assert_eq!(decoded, GamePacket::CreateGame(packet));
}

#[test]
fn test_envelope_empty_input() {
    assert!(matches!(
        GamePacket::decode(&[]),
        Err(ProtocolError::Underflow { .. })
    ));
}

#[test]
fn test_envelope_negative_tag_length() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0];
    assert!(matches!(
        Envelope::from_bytes(&bytes),
        Err(ProtocolError::RangeError(_))
    ));
}

#[test]
fn test_envelope_invalid_utf8_tag() {
    let bytes = [0, 0, 0, 1, 0xFF, 0, 0, 0, 0];
    assert!(matches!(
        Envelope::from_bytes(&bytes),
        Err(ProtocolError::InvalidText(_))
    ));
}

#[test]
fn test_envelope_payload_limit() {
    let config = CodecConfig {
        max_payload_size: 8,
        ..CodecConfig::default()
    };
    let join = GamePacket::JoinGame(JoinGame {
        game_id: Uuid::new_v4(),
        player_name: "Player".to_string(),
    });
    let bytes = join.encode().unwrap();
    let registry = GamePacket::registry().unwrap();

    assert!(matches!(
        envelope::decode_with_config(&bytes, registry, &config),
        Err(ProtocolError::OversizedPacket(26))
    ));
    assert_eq!(envelope::decode(&bytes, registry).unwrap(), join);
}

#[test]
fn test_envelope_trailing_bytes_ignored() {
    let packet = GamePacket::CreateGame(CreateGame {
        player_name: "X".to_string(),
        max_players: 1,
        private_game: false,
    });
    let mut bytes = packet.encode().unwrap();
    bytes.extend_from_slice(&[0xAA, 0xBB]);
    assert_eq!(GamePacket::decode(&bytes).unwrap(), packet);
}

#[test]
fn test_large_player_name() {
    let packet = GamePacket::CreateGame(CreateGame {
        player_name: "x".repeat(100_000),
        max_players: i32::MAX,
        private_game: false,
    });
    let bytes = packet.encode().unwrap();
    assert_eq!(GamePacket::decode(&bytes).unwrap(), packet);
}
