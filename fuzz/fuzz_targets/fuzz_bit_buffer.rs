#![no_main]

use bit_protocol::BitBuffer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz every reader against arbitrary bytes
    let mut buffer = BitBuffer::wrap_bytes(data);
    let _ = buffer.get_string();
    buffer.rewind();
    let _ = buffer.get_assigned::<i64>();
    buffer.rewind();
    let _ = buffer.get_assigned::<bool>();
    buffer.rewind();

    if let Some((&width, _)) = data.split_first() {
        buffer.set_position(8);
        let _ = buffer.get_var(u32::from(width % 70), width & 1 == 1);
    }
});
