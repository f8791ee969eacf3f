//! Per-connection player state.

use std::time::Duration;

use voxbrawl_world::anticheat::{RateLimiter, RAPID_WINDOW, RAPID_WINDOW_ENTRIES};
use voxbrawl_world::map::BlockPos;

use crate::rights::Rights;
use crate::team::TeamId;

/// Numeric id assigned to a connection.
pub type PlayerId = u8;

/// Health of a freshly spawned player.
pub const MAX_HP: i32 = 100;

/// Block allowance granted on spawn.
pub const DEFAULT_BLOCKS: u32 = 50;

/// Position in the world (z grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: Position) -> f32 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)
    }

    pub fn as_tuple(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    /// The voxel this position falls in.
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl From<BlockPos> for Position {
    fn from(b: BlockPos) -> Self {
        Self::new(b.x as f32, b.y as f32, b.z as f32)
    }
}

/// Mutable record owned by one network connection.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: PlayerId,
    /// `None` until the client has joined the game as a participant.
    pub name: Option<String>,
    pub team: TeamId,
    pub admin: bool,
    pub rights: Rights,
    pub position: Position,
    /// 0 = dead.
    pub hp: i32,
    pub invisible: bool,
    pub fly: bool,
    /// Remaining block placement allowance.
    pub blocks: u32,
    pub total_blocks_removed: u32,
    pub rapid_hack_detect: bool,
    pub rapids: RateLimiter,
    /// Anchor of the line currently being built, if any.
    pub line_build_start_pos: Option<BlockPos>,
}

impl Connection {
    /// A connected participant at full health.
    pub fn new(id: PlayerId, name: impl Into<String>, team: TeamId) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::unnamed(id, team)
        }
    }

    /// A connection that has not joined as a participant yet.
    pub fn unnamed(id: PlayerId, team: TeamId) -> Self {
        Self {
            id,
            name: None,
            team,
            admin: false,
            rights: Rights::new(),
            position: Position::default(),
            hp: MAX_HP,
            invisible: false,
            fly: false,
            blocks: DEFAULT_BLOCKS,
            total_blocks_removed: 0,
            rapid_hack_detect: true,
            rapids: RateLimiter::new(RAPID_WINDOW_ENTRIES, RAPID_WINDOW),
            line_build_start_pos: None,
        }
    }

    /// Replace the rapid-action limiter with one using a different window.
    pub fn with_rapid_window(mut self, entries: usize, window: Duration) -> Self {
        self.rapids = RateLimiter::new(entries, window);
        self
    }

    /// Name for chat output; empty for non-participants.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract `amount` from health, flooring at 0. Returns the new health.
    /// Dying drops any line in progress.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.hp = self.hp.saturating_sub(amount.max(0)).max(0);
        if self.hp == 0 {
            self.cancel_line_build();
        }
        self.hp
    }

    /// Bring the player back at `position` with full health and allowance.
    pub fn respawn(&mut self, position: Position, blocks: u32) {
        self.hp = MAX_HP;
        self.position = position;
        self.blocks = blocks;
        self.cancel_line_build();
    }

    pub fn begin_line_build(&mut self, at: BlockPos) {
        self.line_build_start_pos = Some(at);
    }

    pub fn cancel_line_build(&mut self) {
        self.line_build_start_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_alive_participant() {
        let p = Connection::new(3, "Deuce", TeamId::BLUE);
        assert!(p.is_alive());
        assert_eq!(p.display_name(), "Deuce");
        assert_eq!(p.blocks, DEFAULT_BLOCKS);
        assert!(p.line_build_start_pos.is_none());
    }

    #[test]
    fn unnamed_has_empty_display_name() {
        let p = Connection::unnamed(1, TeamId::SPECTATOR);
        assert!(p.name.is_none());
        assert_eq!(p.display_name(), "");
    }

    #[test]
    fn damage_floors_at_zero_and_drops_line() {
        let mut p = Connection::new(1, "a", TeamId::BLUE);
        p.begin_line_build(BlockPos::new(1, 2, 3));
        assert_eq!(p.apply_damage(30), 70);
        assert!(p.line_build_start_pos.is_some());
        assert_eq!(p.apply_damage(500), 0);
        assert!(!p.is_alive());
        assert!(p.line_build_start_pos.is_none());
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut p = Connection::new(1, "a", TeamId::BLUE);
        p.hp = 40;
        assert_eq!(p.apply_damage(-20), 40);
    }

    #[test]
    fn respawn_restores() {
        let mut p = Connection::new(1, "a", TeamId::GREEN);
        p.apply_damage(MAX_HP);
        p.blocks = 0;
        p.begin_line_build(BlockPos::new(1, 2, 3));
        p.respawn(Position::new(10.0, 10.0, 30.0), 40);
        assert_eq!(p.hp, MAX_HP);
        assert_eq!(p.blocks, 40);
        assert_eq!(p.position, Position::new(10.0, 10.0, 30.0));
        assert!(p.line_build_start_pos.is_none());
    }

    #[test]
    fn position_block_floors() {
        let p = Position::new(10.7, 0.2, 33.99);
        assert_eq!(p.block(), BlockPos::new(10, 0, 33));
    }
}
