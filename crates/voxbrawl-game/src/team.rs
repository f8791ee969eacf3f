//! Teams and their opposing-team association.

use std::collections::BTreeSet;

use crate::player::PlayerId;
use crate::roster::Roster;

/// Team identifier. Blue and green fight each other; spectators watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(pub i8);

impl TeamId {
    pub const BLUE: TeamId = TeamId(0);
    pub const GREEN: TeamId = TeamId(1);
    pub const SPECTATOR: TeamId = TeamId(-1);
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub spectator: bool,
    other: Option<TeamId>,
    members: BTreeSet<PlayerId>,
}

impl Team {
    /// The opposing team, if this team takes part in combat.
    pub fn other(&self) -> Option<TeamId> {
        self.other
    }

    pub fn members(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// All teams of a match.
#[derive(Debug, Clone)]
pub struct Teams {
    teams: Vec<Team>,
}

impl Teams {
    /// Two opposing combat teams plus the spectator team.
    pub fn standard(blue: &str, green: &str) -> Self {
        let team = |id, name: &str, spectator, other| Team {
            id,
            name: name.to_string(),
            spectator,
            other,
            members: BTreeSet::new(),
        };
        Self {
            teams: vec![
                team(TeamId::BLUE, blue, false, Some(TeamId::GREEN)),
                team(TeamId::GREEN, green, false, Some(TeamId::BLUE)),
                team(TeamId::SPECTATOR, "Spectator", true, None),
            ],
        }
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// The team opposing `id`.
    pub fn opponents(&self, id: TeamId) -> Option<&Team> {
        self.get(id)?.other.and_then(|other| self.get(other))
    }

    pub fn is_spectator(&self, id: TeamId) -> bool {
        self.get(id).map_or(true, |t| t.spectator)
    }

    /// Move a player onto `team`, leaving whatever team they were on.
    /// Returns `false` if the team or the player does not exist.
    pub fn assign(&mut self, roster: &mut Roster, player: PlayerId, team: TeamId) -> bool {
        if self.get(team).is_none() {
            return false;
        }
        let Some(conn) = roster.get_mut(player) else {
            return false;
        };
        conn.team = team;
        for t in &mut self.teams {
            if t.id == team {
                t.members.insert(player);
            } else {
                t.members.remove(&player);
            }
        }
        true
    }

    /// Forget a player who disconnected.
    pub fn remove_player(&mut self, player: PlayerId) {
        for t in &mut self.teams {
            t.members.remove(&player);
        }
    }
}

impl Default for Teams {
    fn default() -> Self {
        Self::standard("Blue", "Green")
    }
}
