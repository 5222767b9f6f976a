#![no_main]

use bit_protocol::protocol::envelope::Envelope;
use bit_protocol::protocol::packets::GamePacket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz envelope parsing and dispatch - test for panics and runaway allocations
    if let Ok(envelope) = Envelope::from_bytes(data) {
        // A parsed envelope must re-encode to a prefix of the input
        if let Ok(bytes) = envelope.to_bytes() {
            assert!(data.starts_with(&bytes));
        }
    }

    if let Ok(packet) = GamePacket::decode(data) {
        // Anything that decodes must survive a roundtrip
        if let Ok(bytes) = packet.encode() {
            assert_eq!(GamePacket::decode(&bytes).ok(), Some(packet));
        }
    }
});
