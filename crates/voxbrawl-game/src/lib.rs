//! Game logic: player and team state plus the server-side resolvers for
//! movement commands, grenade explosions, and line building.

pub mod context;
pub mod error;
pub mod events;
pub mod explosion;
pub mod line_build;
pub mod movement;
pub mod player;
pub mod rights;
pub mod roster;
pub mod sender;
pub mod team;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::GameContext;
pub use error::CommandError;
pub use events::{EventSink, Notification};
pub use player::{Connection, PlayerId, Position};
pub use roster::Roster;
pub use sender::CommandSender;
pub use team::{Team, TeamId, Teams};
