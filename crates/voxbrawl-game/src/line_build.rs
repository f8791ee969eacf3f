//! Server-side validation of line-build requests.

use std::time::Instant;

use tracing::{debug, warn};
use voxbrawl_proto::packets::{BlockLine, Packet};
use voxbrawl_world::anticheat::{within_reach, BUILD_TOLERANCE, MAX_BUILD_DISTANCE};
use voxbrawl_world::line::{cube_line, MAX_LINE_BLOCKS};
use voxbrawl_world::map::BlockPos;

use crate::context::GameContext;
use crate::events::Notification;
use crate::player::{PlayerId, Position};

/// Endpoints of a line as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBuild {
    pub start: BlockPos,
    pub end: BlockPos,
}

impl From<&BlockLine> for LineBuild {
    fn from(packet: &BlockLine) -> Self {
        Self {
            start: packet.start.into(),
            end: packet.end.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildRules {
    /// Per-axis reach from the builder to each endpoint.
    pub max_distance: f32,
}

impl Default for BuildRules {
    fn default() -> Self {
        Self {
            max_distance: MAX_BUILD_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBuildOutcome {
    UnknownActor,
    DeadActor,
    NoActiveSegment,
    RateLimited,
    OutOfRange,
    AllowanceExhausted,
    Built { placed: u32 },
}

/// Validate and apply one line segment for `player`.
///
/// The segment always starts at the marker stored on the connection; the
/// client's own start point is not trusted. A successful build moves the
/// marker to the last rasterized cell so the next one chains from there; a
/// line cut short at [`MAX_LINE_BLOCKS`] ends where the walk stopped.
pub fn resolve_line_build(
    ctx: &mut GameContext,
    player: PlayerId,
    intent: &LineBuild,
    now: Instant,
    rules: &BuildRules,
) -> LineBuildOutcome {
    let Some(conn) = ctx.roster.get_mut(player) else {
        return LineBuildOutcome::UnknownActor;
    };
    if !conn.is_alive() {
        debug!("Line build by #{player} ignored: dead");
        return LineBuildOutcome::DeadActor;
    }
    let Some(start) = conn.line_build_start_pos else {
        debug!("Line build by #{player} ignored: no segment in progress");
        return LineBuildOutcome::NoActiveSegment;
    };

    if conn.rapid_hack_detect {
        conn.rapids.record_event(now);
        if conn.rapids.above_limit() {
            warn!("Rapid hack detected for {} (#{player})", conn.display_name());
            ctx.sink.notify(Notification::HackAttempt {
                player,
                reason: "Rapid hack detected".to_string(),
            });
            return LineBuildOutcome::RateLimited;
        }
    }

    let at = conn.position.as_tuple();
    let reaches = |target: BlockPos| {
        within_reach(at, Position::from(target).as_tuple(), rules.max_distance)
    };
    if !reaches(start) || !reaches(intent.end) {
        debug!("Line build by #{player} ignored: out of range");
        return LineBuildOutcome::OutOfRange;
    }

    let cells = cube_line(start, intent.end);
    let end = cells.last().copied().unwrap_or(start);
    let budget = conn.blocks.saturating_add(BUILD_TOLERANCE) as usize;
    if conn.blocks == 0 || cells.len() > budget {
        debug!(
            "Line build by #{player} ignored: {} cells, {} blocks left",
            cells.len(),
            conn.blocks
        );
        return LineBuildOutcome::AllowanceExhausted;
    }

    let mut remaining = conn.blocks;
    let mut placed = 0u32;
    for cell in &cells {
        if remaining == 0 {
            break;
        }
        let BlockPos { x, y, z } = *cell;
        if ctx.map.is_valid_position(x, y, z)
            && ctx.map.has_neighbors(x, y, z)
            && !ctx.map.is_solid(x, y, z)
            && ctx.map.build_point(x, y, z)
        {
            placed += 1;
            remaining -= 1;
        }
    }

    if placed > 0 {
        if let Some(conn) = ctx.roster.get_mut(player) {
            conn.blocks = remaining;
            conn.line_build_start_pos = Some(end);
        }
        ctx.sink.notify(Notification::EntitiesChanged);
        ctx.sink.notify(Notification::BroadcastPacket(Packet::BlockLine(BlockLine {
            player_id: player,
            start: (start.x, start.y, start.z),
            end: (end.x, end.y, end.z),
        })));
    }
    LineBuildOutcome::Built { placed }
}
