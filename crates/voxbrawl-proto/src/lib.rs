//! Wire types for the packets the game core consumes and emits.

pub mod codec;
pub mod error;
pub mod packets;
