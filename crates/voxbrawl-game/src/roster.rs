//! Directory of connected players, passed explicitly into the resolvers.

use std::collections::BTreeMap;

use crate::error::CommandError;
use crate::player::{Connection, PlayerId};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: BTreeMap<PlayerId, Connection>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, replacing any previous one with the same id.
    pub fn insert(&mut self, conn: Connection) -> Option<Connection> {
        self.players.insert(conn.id, conn)
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Connection> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Connection> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Connection> {
        self.players.get_mut(&id)
    }

    /// Like [`Roster::get`], failing with `PlayerNotFound`.
    pub fn player(&self, id: PlayerId) -> Result<&Connection, CommandError> {
        self.get(id)
            .ok_or_else(|| CommandError::PlayerNotFound(format!("#{id}")))
    }

    /// Like [`Roster::get_mut`], failing with `PlayerNotFound`.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Connection, CommandError> {
        self.get_mut(id)
            .ok_or_else(|| CommandError::PlayerNotFound(format!("#{id}")))
    }

    /// Whether `id` is a connected, named participant.
    pub fn is_participant(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|c| c.name.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Lowest id not in use.
    pub fn next_free_id(&self) -> Option<PlayerId> {
        (0..=PlayerId::MAX).find(|id| !self.players.contains_key(id))
    }

    /// Resolve a player reference typed by a user.
    ///
    /// `#<id>` selects by id. Otherwise an exact case-insensitive name wins,
    /// then a unique case-insensitive substring match.
    pub fn find(&self, query: &str) -> Result<PlayerId, CommandError> {
        let not_found = || CommandError::PlayerNotFound(query.to_string());

        if let Some(raw_id) = query.strip_prefix('#') {
            let id: PlayerId = raw_id.parse().map_err(|_| not_found())?;
            return if self.is_participant(id) {
                Ok(id)
            } else {
                Err(not_found())
            };
        }

        let wanted = query.to_lowercase();
        let named: Vec<(PlayerId, String)> = self
            .players
            .values()
            .filter_map(|c| c.name.as_ref().map(|n| (c.id, n.to_lowercase())))
            .collect();

        if let Some((id, _)) = named.iter().find(|(_, n)| *n == wanted) {
            return Ok(*id);
        }

        let partial: Vec<PlayerId> = named
            .iter()
            .filter(|(_, n)| n.contains(&wanted))
            .map(|(id, _)| *id)
            .collect();
        match partial.as_slice() {
            [id] => Ok(*id),
            [] => Err(not_found()),
            _ => Err(CommandError::AmbiguousPlayer(query.to_string())),
        }
    }
}
