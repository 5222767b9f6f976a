//! # Packet Envelope
//!
//! Self-describing wire unit pairing a type tag with an opaque payload.
//!
//! ## Wire Format
//! ```text
//! [TagLen(32)] [Tag (UTF-8)] [PayloadLen(32)] [Payload]
//! ```
//!
//! The sender only needs the value's [`Encodable`] implementation. The receiver
//! resolves the tag against a [`TypeRegistry`] and hands the payload to the
//! registered factory, so no compile-time schema is shared between the two.
//!
//! ## Decode Order
//! 1. Total size is checked against [`CodecConfig::max_envelope_size`]
//! 2. The tag is read and looked up; unregistered tags fail with `UnknownType`
//!    before the payload is touched
//! 3. The payload is read and passed to the factory; factory errors surface as
//!    `ConstructionFailed`

use crate::config::CodecConfig;
use crate::core::assigned::LENGTH_PREFIX_BITS;
use crate::core::bit_buffer::BitBuffer;
use crate::error::{ProtocolError, Result};
use crate::protocol::registry::TypeRegistry;
use crate::utils::metrics::{global_metrics, Timer};
use tracing::{debug, trace, warn};

/// A value that can be sealed into an envelope.
///
/// Object safe, so heterogeneous values can be encoded through `&dyn Encodable`.
pub trait Encodable {
    fn type_tag(&self) -> &str;

    fn payload(&self) -> Result<Vec<u8>>;
}

/// A concrete packet variant with a fixed tag and a symmetric payload codec.
///
/// Implementations must satisfy `decode_payload(&encode_payload(v)?)? == v`.
pub trait Packet: Sized {
    const TYPE_TAG: &'static str;

    fn encode_payload(&self) -> Result<Vec<u8>>;

    fn decode_payload(payload: &[u8]) -> Result<Self>;
}

impl<P: Packet> Encodable for P {
    fn type_tag(&self) -> &str {
        P::TYPE_TAG
    }

    fn payload(&self) -> Result<Vec<u8>> {
        self.encode_payload()
    }
}

/// A parsed envelope: tag and payload, not yet dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    type_tag: String,
    payload: Vec<u8>,
}

impl Envelope {
    pub fn new(type_tag: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload,
        }
    }

    /// Capture a value's tag and payload.
    pub fn seal<E: Encodable + ?Sized>(value: &E) -> Result<Self> {
        Ok(Self::new(value.type_tag(), value.payload()?))
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        2 * (LENGTH_PREFIX_BITS / 8) + self.type_tag.len() + self.payload.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = BitBuffer::with_capacity(self.encoded_len() * 8);
        buffer.put_assigned_bytes(self.type_tag.as_bytes())?;
        buffer.put_assigned_bytes(&self.payload)?;
        Ok(buffer.into_bytes())
    }

    /// Parse an envelope without dispatching it, using default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_config(bytes, &CodecConfig::default())
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let mut reader = EnvelopeReader::new(bytes, config)?;
        let type_tag = reader.read_type_tag()?;
        let payload = reader.read_payload()?;
        Ok(Self { type_tag, payload })
    }

    /// Dispatch the payload to the factory registered for this envelope's tag.
    pub fn open<T>(self, registry: &TypeRegistry<T>) -> Result<T> {
        registry.construct(&self.type_tag, &self.payload)
    }
}

/// Cursor over an encoded envelope enforcing the configured limits.
struct EnvelopeReader<'a> {
    buffer: BitBuffer,
    config: &'a CodecConfig,
}

impl<'a> EnvelopeReader<'a> {
    fn new(bytes: &[u8], config: &'a CodecConfig) -> Result<Self> {
        if bytes.len() > config.max_envelope_size {
            return Err(ProtocolError::OversizedPacket(bytes.len()));
        }
        Ok(Self {
            buffer: BitBuffer::wrap_bytes(bytes),
            config,
        })
    }

    fn read_limited(&mut self, limit: usize) -> Result<Vec<u8>> {
        let start = self.buffer.position();
        let prefix = self.buffer.get_i32()?;
        if let Ok(len) = usize::try_from(prefix) {
            if len > limit {
                return Err(ProtocolError::OversizedPacket(len));
            }
        }
        self.buffer.set_position(start);
        self.buffer.get_assigned_bytes()
    }

    fn read_type_tag(&mut self) -> Result<String> {
        let raw = self.read_limited(self.config.max_type_tag_len)?;
        String::from_utf8(raw).map_err(|e| ProtocolError::InvalidText(e.to_string()))
    }

    fn read_payload(&mut self) -> Result<Vec<u8>> {
        let payload = self.read_limited(self.config.max_payload_size)?;
        if self.buffer.has_remaining() {
            trace!(
                trailing_bits = self.buffer.remaining(),
                "Ignoring trailing bytes after envelope payload"
            );
        }
        Ok(payload)
    }
}

/// Serialize a value into envelope bytes.
pub fn encode<E: Encodable + ?Sized>(value: &E) -> Result<Vec<u8>> {
    let _timer = Timer::start("envelope_encode");
    let bytes = Envelope::seal(value)?.to_bytes()?;
    debug!(
        type_tag = value.type_tag(),
        size = bytes.len(),
        "Encoded envelope"
    );
    global_metrics().envelope_encoded(bytes.len() as u64);
    Ok(bytes)
}

/// Reconstruct a typed value from envelope bytes, using default limits.
pub fn decode<T>(bytes: &[u8], registry: &TypeRegistry<T>) -> Result<T> {
    decode_with_config(bytes, registry, &CodecConfig::default())
}

pub fn decode_with_config<T>(
    bytes: &[u8],
    registry: &TypeRegistry<T>,
    config: &CodecConfig,
) -> Result<T> {
    let _timer = Timer::start("envelope_decode");
    let metrics = global_metrics();

    let result = decode_inner(bytes, registry, config);
    match &result {
        Ok(_) => metrics.envelope_decoded(bytes.len() as u64),
        Err(ProtocolError::UnknownType(tag)) => {
            warn!(type_tag = %tag, "Rejected envelope with unregistered type tag");
            metrics.unknown_type();
        }
        Err(e @ ProtocolError::ConstructionFailed { .. }) => {
            warn!(error = %e, "Packet factory rejected payload");
            metrics.construction_failed();
        }
        Err(e) => {
            debug!(error = %e, size = bytes.len(), "Malformed envelope");
            metrics.decode_failed();
        }
    }
    result
}

fn decode_inner<T>(bytes: &[u8], registry: &TypeRegistry<T>, config: &CodecConfig) -> Result<T> {
    let mut reader = EnvelopeReader::new(bytes, config)?;
    let type_tag = reader.read_type_tag()?;
    if !registry.contains(&type_tag) {
        return Err(ProtocolError::UnknownType(type_tag));
    }
    let payload = reader.read_payload()?;
    trace!(type_tag = %type_tag, payload_size = payload.len(), "Decoded envelope");
    registry.construct(&type_tag, &payload)
}
