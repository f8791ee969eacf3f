//! BlockAction (0x0D) — both directions.
//!
//! Announces a single-point terrain change. Grenade explosions are sent as
//! one `GrenadeDestroy` action centred on the blast; clients expand it to the
//! 3x3x3 neighbourhood themselves.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// What happened at the block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockActionKind {
    Build = 0,
    Destroy = 1,
    SpadeDestroy = 2,
    GrenadeDestroy = 3,
}

impl BlockActionKind {
    fn from_u8(v: u8) -> Result<Self, ProtoError> {
        match v {
            0 => Ok(BlockActionKind::Build),
            1 => Ok(BlockActionKind::Destroy),
            2 => Ok(BlockActionKind::SpadeDestroy),
            3 => Ok(BlockActionKind::GrenadeDestroy),
            _ => Err(ProtoError::InvalidData(format!(
                "unknown block action: {v}"
            ))),
        }
    }
}

/// BlockAction packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAction {
    pub player_id: u8,
    pub kind: BlockActionKind,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ProtoEncode for BlockAction {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.player_id);
        buf.put_u8(self.kind as u8);
        buf.put_i32_le(self.x);
        buf.put_i32_le(self.y);
        buf.put_i32_le(self.z);
    }
}

impl ProtoDecode for BlockAction {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 14)?;
        let player_id = buf.get_u8();
        let kind = BlockActionKind::from_u8(buf.get_u8())?;
        Ok(Self {
            player_id,
            kind,
            x: buf.get_i32_le(),
            y: buf.get_i32_le(),
            z: buf.get_i32_le(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_grenade_destroy() {
        let pkt = BlockAction {
            player_id: 7,
            kind: BlockActionKind::GrenadeDestroy,
            x: 100,
            y: 200,
            z: 10,
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert_eq!(buf.len(), 14);
        assert_eq!(buf[0], 7);
        assert_eq!(buf[1], 3);
        assert_eq!(&buf[2..6], &100i32.to_le_bytes());
        assert_eq!(&buf[10..14], &10i32.to_le_bytes());
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let mut raw = vec![1u8, 9];
        raw.extend_from_slice(&[0; 12]);
        assert!(matches!(
            BlockAction::proto_decode(&mut raw.as_slice()),
            Err(ProtoError::InvalidData(_))
        ));
    }
}
