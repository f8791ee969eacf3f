//! Shared fixtures for resolver tests.

use voxbrawl_world::map::{VoxelMap, VoxelSurface};

use crate::context::GameContext;
use crate::events::Notification;
use crate::player::{Connection, PlayerId};
use crate::roster::Roster;
use crate::team::{TeamId, Teams};

/// `VoxelMap` wrapper that counts mutation calls.
#[derive(Default)]
pub(crate) struct CountingMap {
    pub inner: VoxelMap,
    pub destroy_calls: u32,
    pub build_calls: u32,
}

impl VoxelSurface for CountingMap {
    fn height_at(&self, x: i32, y: i32) -> i32 {
        self.inner.height_at(x, y)
    }

    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.inner.is_solid(x, y, z)
    }

    fn build_point(&mut self, x: i32, y: i32, z: i32) -> bool {
        self.build_calls += 1;
        self.inner.build_point(x, y, z)
    }

    fn destroy_point(&mut self, x: i32, y: i32, z: i32) -> u32 {
        self.destroy_calls += 1;
        self.inner.destroy_point(x, y, z)
    }
}

pub(crate) struct Fixture {
    pub map: CountingMap,
    pub roster: Roster,
    pub teams: Teams,
    pub events: Vec<Notification>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            map: CountingMap::default(),
            roster: Roster::new(),
            teams: Teams::default(),
            events: Vec::new(),
        }
    }

    pub fn ctx(&mut self) -> GameContext<'_> {
        GameContext::new(&mut self.map, &mut self.roster, &self.teams, &mut self.events)
    }

    pub fn add_player(&mut self, id: PlayerId, name: &str, team: TeamId) {
        self.roster.insert(Connection::new(id, name, team));
        self.teams.assign(&mut self.roster, id, team);
    }

    pub fn player(&self, id: PlayerId) -> &Connection {
        self.roster.get(id).expect("player in fixture")
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Connection {
        self.roster.get_mut(id).expect("player in fixture")
    }

    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn entity_refreshes(&self) -> usize {
        self.count(|e| matches!(e, Notification::EntitiesChanged))
    }
}
