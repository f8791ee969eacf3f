//! Everything a resolver may read or mutate, borrowed for one call.

use voxbrawl_world::map::VoxelSurface;

use crate::events::EventSink;
use crate::roster::Roster;
use crate::team::Teams;

pub struct GameContext<'a> {
    pub map: &'a mut dyn VoxelSurface,
    pub roster: &'a mut Roster,
    pub teams: &'a Teams,
    pub sink: &'a mut dyn EventSink,
}

impl<'a> GameContext<'a> {
    pub fn new(
        map: &'a mut dyn VoxelSurface,
        roster: &'a mut Roster,
        teams: &'a Teams,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            map,
            roster,
            teams,
            sink,
        }
    }
}
