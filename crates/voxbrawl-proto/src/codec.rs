//! Protocol encoding/decoding traits and helpers.
//!
//! All multi-byte fields are little-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtoError;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Fail with `BufferTooShort` unless `needed` bytes remain.
pub fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), ProtoError> {
    if buf.remaining() < needed {
        return Err(ProtoError::BufferTooShort {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

/// Encode a packet body behind its one-byte id.
pub fn encode_packet(id: u8, packet: &impl ProtoEncode) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(id);
    packet.proto_encode(&mut buf);
    buf.freeze()
}
