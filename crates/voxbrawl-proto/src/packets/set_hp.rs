//! SetHp (0x05) — Server → Client.
//!
//! Tells a client its new health and where the damage came from.

use bytes::BufMut;

use crate::codec::ProtoEncode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DamageKind {
    Fall = 0,
    Weapon = 1,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetHp {
    pub hp: u8,
    pub kind: DamageKind,
    /// Position of the damage source.
    pub source: (f32, f32, f32),
}

impl ProtoEncode for SetHp {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.hp);
        buf.put_u8(self.kind as u8);
        buf.put_f32_le(self.source.0);
        buf.put_f32_le(self.source.1);
        buf.put_f32_le(self.source.2);
    }
}
