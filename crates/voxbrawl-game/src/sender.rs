//! Snapshot of whoever issued a command.

use crate::player::{Connection, PlayerId};
use crate::rights::Rights;
use crate::roster::Roster;

#[derive(Debug, Clone)]
pub struct CommandSender {
    pub name: String,
    pub admin: bool,
    pub rights: Rights,
    pub invisible: bool,
    /// The sender's own connection, if the command came from a client.
    pub player: Option<PlayerId>,
}

impl CommandSender {
    /// The server console: an admin that is not a player.
    pub fn console() -> Self {
        Self {
            name: "Console".to_string(),
            admin: true,
            rights: Rights::new(),
            invisible: false,
            player: None,
        }
    }

    pub fn from_connection(conn: &Connection) -> Self {
        Self {
            name: conn.display_name().to_string(),
            admin: conn.admin,
            rights: conn.rights.clone(),
            invisible: conn.invisible,
            player: Some(conn.id),
        }
    }

    /// Admins implicitly hold every right.
    pub fn may(&self, right: &str) -> bool {
        self.admin || self.rights.allows(right)
    }

    /// The sender's id if it is a connected participant.
    pub fn connected_player(&self, roster: &Roster) -> Option<PlayerId> {
        self.player.filter(|&id| roster.is_participant(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rights::MOVE_OTHERS;
    use crate::team::TeamId;

    #[test]
    fn console_is_admin_without_player() {
        let console = CommandSender::console();
        assert!(console.may(MOVE_OTHERS));
        assert_eq!(console.connected_player(&Roster::new()), None);
    }

    #[test]
    fn connected_player_requires_participant() {
        let mut roster = Roster::new();
        roster.insert(Connection::unnamed(2, TeamId::SPECTATOR));
        let ghost = CommandSender::from_connection(roster.get(2).unwrap());
        assert_eq!(ghost.connected_player(&roster), None);

        roster.insert(Connection::new(2, "Deuce", TeamId::BLUE));
        assert_eq!(ghost.connected_player(&roster), Some(2));

        roster.remove(2);
        assert_eq!(ghost.connected_player(&roster), None);
    }
}
