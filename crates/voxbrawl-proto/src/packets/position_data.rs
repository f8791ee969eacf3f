//! PositionData (0x00) — Server → Client.
//!
//! Forces the receiving client to a server-chosen position.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PositionData {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl ProtoEncode for PositionData {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f32_le(self.x);
        buf.put_f32_le(self.y);
        buf.put_f32_le(self.z);
    }
}

impl ProtoDecode for PositionData {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 12)?;
        Ok(Self {
            x: buf.get_f32_le(),
            y: buf.get_f32_le(),
            z: buf.get_f32_le(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_le_floats() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&99.5f32.to_le_bytes());
        raw.extend_from_slice(&0.0f32.to_le_bytes());
        raw.extend_from_slice(&(-0.5f32).to_le_bytes());
        let pkt = PositionData::proto_decode(&mut raw.as_slice()).unwrap();
        assert_eq!(pkt, PositionData::new(99.5, 0.0, -0.5));
    }
}
