//! BlockLine (0x0E) — both directions.
//!
//! Client → Server: a line-build intent between two voxel endpoints.
//! Server → Client: the accepted line, re-stamped with the builder's id.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// BlockLine packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLine {
    pub player_id: u8,
    pub start: (i32, i32, i32),
    pub end: (i32, i32, i32),
}

impl ProtoEncode for BlockLine {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.player_id);
        for v in [
            self.start.0,
            self.start.1,
            self.start.2,
            self.end.0,
            self.end.1,
            self.end.2,
        ] {
            buf.put_i32_le(v);
        }
    }
}

impl ProtoDecode for BlockLine {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 25)?;
        let player_id = buf.get_u8();
        let start = (buf.get_i32_le(), buf.get_i32_le(), buf.get_i32_le());
        let end = (buf.get_i32_le(), buf.get_i32_le(), buf.get_i32_le());
        Ok(Self {
            player_id,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn decode_client_intent() {
        let mut raw = vec![3u8];
        for v in [10i32, 20, 30, 12, 20, 30] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        let pkt = BlockLine::proto_decode(&mut raw.as_slice()).unwrap();
        assert_eq!(pkt.player_id, 3);
        assert_eq!(pkt.start, (10, 20, 30));
        assert_eq!(pkt.end, (12, 20, 30));
    }

    #[test]
    fn decode_truncated() {
        let raw = [0u8; 24];
        assert!(matches!(
            BlockLine::proto_decode(&mut &raw[..]),
            Err(ProtoError::BufferTooShort { needed: 25, .. })
        ));
    }

    #[test]
    fn encode_length() {
        let pkt = BlockLine {
            player_id: 1,
            start: (-1, 0, 0),
            end: (0, 0, 0),
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert_eq!(buf.len(), 25);
        assert_eq!(&buf[1..5], &(-1i32).to_le_bytes());
    }
}
