//! Notifications produced by the resolvers, consumed by the network and
//! chat layers.

use voxbrawl_proto::packets::Packet;
use voxbrawl_world::map::BlockPos;

use crate::player::PlayerId;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Public chat line for everyone, also relayed to admins.
    Broadcast(String),
    /// Line for the admin relay only.
    AdminRelay(String),
    /// Chat line for a single player.
    Private { player: PlayerId, message: String },
    /// Packet for every connected client.
    BroadcastPacket(Packet),
    /// Packet for a single client.
    SendPacket { player: PlayerId, packet: Packet },
    /// A player took damage.
    Hit {
        attacker: PlayerId,
        victim: PlayerId,
        damage: i32,
        killed: bool,
    },
    /// One voxel was removed on behalf of a player.
    BlockRemoved { player: PlayerId, pos: BlockPos },
    /// The anti-cheat layer flagged a player.
    HackAttempt { player: PlayerId, reason: String },
    /// World entities must be re-evaluated against changed terrain.
    EntitiesChanged,
}

/// Receiver of resolver output.
pub trait EventSink {
    fn notify(&mut self, event: Notification);
}

impl EventSink for Vec<Notification> {
    fn notify(&mut self, event: Notification) {
        self.push(event);
    }
}
