//! Game packet definitions.

pub mod block_action;
pub mod block_line;
pub mod position_data;
pub mod set_hp;

use bytes::Bytes;

use crate::codec::encode_packet;

pub use block_action::{BlockAction, BlockActionKind};
pub use block_line::BlockLine;
pub use position_data::PositionData;
pub use set_hp::{DamageKind, SetHp};

/// Packet ids.
pub mod id {
    pub const POSITION_DATA: u8 = 0x00;
    pub const SET_HP: u8 = 0x05;
    pub const BLOCK_ACTION: u8 = 0x0D;
    pub const BLOCK_LINE: u8 = 0x0E;
}

/// Any packet the server core hands to the network layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    PositionData(PositionData),
    SetHp(SetHp),
    BlockAction(BlockAction),
    BlockLine(BlockLine),
}

impl Packet {
    pub fn id(&self) -> u8 {
        match self {
            Packet::PositionData(_) => id::POSITION_DATA,
            Packet::SetHp(_) => id::SET_HP,
            Packet::BlockAction(_) => id::BLOCK_ACTION,
            Packet::BlockLine(_) => id::BLOCK_LINE,
        }
    }

    /// Encode the packet with its id prefix.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Packet::PositionData(p) => encode_packet(self.id(), p),
            Packet::SetHp(p) => encode_packet(self.id(), p),
            Packet::BlockAction(p) => encode_packet(self.id(), p),
            Packet::BlockLine(p) => encode_packet(self.id(), p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes_prefixes_id() {
        let pkt = Packet::PositionData(PositionData::new(1.0, 2.0, 3.0));
        let bytes = pkt.to_bytes();
        assert_eq!(bytes[0], id::POSITION_DATA);
        assert_eq!(bytes.len(), 1 + 12);

        let line = Packet::BlockLine(BlockLine {
            player_id: 2,
            start: (0, 0, 0),
            end: (1, 1, 1),
        });
        assert_eq!(line.to_bytes()[0], id::BLOCK_LINE);
    }
}
