//! Movement commands: `/move`, `/moves`, `/teleport`, `/tpsilent`, `/fly`,
//! `/unstick`, and `/where`.
//!
//! Every resolver runs its guards in a fixed order and returns before the
//! first mutation if one fails, so a failed command leaves no trace.

use std::num::IntErrorKind;

use tracing::info;
use voxbrawl_proto::packets::{Packet, PositionData};
use voxbrawl_world::map::{VoxelSurface, MAX_XY};
use voxbrawl_world::sector::{parse_sector, to_sector, SECTOR_SIZE};

use crate::context::GameContext;
use crate::error::CommandError;
use crate::events::{EventSink, Notification};
use crate::player::{PlayerId, Position};
use crate::rights::{MOVE_OTHERS, TELEPORT_OTHER};
use crate::roster::Roster;
use crate::sender::CommandSender;

/// Players are never placed closer than this to the ground below them.
pub const FLOOR_CLEARANCE: i32 = 2;

/// Offset from a teleport target's position, so the two players don't overlap.
pub const TELEPORT_OFFSET: (f32, f32, f32) = (-0.5, -0.5, 0.5);

/// Reply to a requester without teleport rights. Not an error: the command
/// simply reports it.
pub const NO_RIGHTS_MESSAGE: &str = "No administrator rights!";

/// Resolved target coordinates of a move command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// How the destination is spelled in chat: the sector label or `"x y z"`.
    pub label: String,
}

enum MoveTarget<'a> {
    Requester,
    Named(&'a str),
}

/// Turn the destination tokens of a move command into coordinates.
///
/// One token names a sector; the player lands in its centre, on the ground.
/// Three tokens are explicit `x y z`, clamped into the world and lifted above
/// the ground at that column.
pub fn parse_destination(
    map: &dyn VoxelSurface,
    tokens: &[String],
) -> Result<Destination, CommandError> {
    match tokens {
        [sector] => {
            let (x, y) = parse_sector(sector)?;
            let (x, y) = (x + SECTOR_SIZE / 2, y + SECTOR_SIZE / 2);
            Ok(Destination {
                x,
                y,
                z: map.height_at(x, y) - FLOOR_CLEARANCE,
                label: sector.to_uppercase(),
            })
        }
        [x, y, z] => {
            let x = parse_coordinate(x)?.clamp(0, i64::from(MAX_XY)) as i32;
            let y = parse_coordinate(y)?.clamp(0, i64::from(MAX_XY)) as i32;
            let ceiling = i64::from(map.height_at(x, y) - FLOOR_CLEARANCE);
            // The floor clearance wins over the lower bound of 0.
            let z = parse_coordinate(z)?.max(0).min(ceiling) as i32;
            Ok(Destination {
                x,
                y,
                z,
                label: format!("{x} {y} {z}"),
            })
        }
        _ => Err(CommandError::InvalidParameter(
            "Wrong number of parameters!".into(),
        )),
    }
}

/// Integer coordinate token. Out-of-range magnitudes saturate so they can be
/// clamped like any other value.
fn parse_coordinate(token: &str) -> Result<i64, CommandError> {
    match token.trim().parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(CommandError::InvalidParameter(format!(
                "Invalid coordinate: {token}"
            ))),
        },
    }
}

/// `/move` and `/moves`: `[player] <sector>` or `[player] <x> <y> <z>`.
///
/// One or three tokens move the requester; two or four tokens start with
/// the name of the player to move. An invisible requester always moves
/// silently.
pub fn resolve_move(
    ctx: &mut GameContext,
    sender: &CommandSender,
    args: &[String],
    silent: bool,
) -> Result<(), CommandError> {
    let (target, tokens) = match args.len() {
        1 | 3 => (MoveTarget::Requester, args),
        2 | 4 => (MoveTarget::Named(args[0].as_str()), &args[1..]),
        _ => {
            return Err(CommandError::InvalidParameter(
                "Wrong number of parameters!".into(),
            ))
        }
    };

    let destination = parse_destination(&*ctx.map, tokens)?;

    let target = match target {
        MoveTarget::Requester => sender
            .connected_player(ctx.roster)
            .ok_or(CommandError::RequiredPlayer)?,
        MoveTarget::Named(name) => {
            if !sender.may(MOVE_OTHERS) {
                return Err(CommandError::PermissionDenied(
                    "moving other players requires the move_others right".into(),
                ));
            }
            ctx.roster.find(name)?
        }
    };

    let silent = silent || sender.invisible;
    let position = Position::new(
        destination.x as f32,
        destination.y as f32,
        destination.z as f32,
    );
    let target_name = relocate(ctx, target, position)?;

    let adverb = if silent { "silently " } else { "" };
    let message = if sender.player == Some(target) {
        format!("{target_name} {adverb}teleported to location {}", destination.label)
    } else {
        format!(
            "{} {adverb}teleported {target_name} to location {}",
            sender.name, destination.label
        )
    };
    announce(ctx.sink, message, silent);
    Ok(())
}

/// `/teleport [player] <target>`.
///
/// With two names, moves the first player to the second; this needs admin
/// or `teleport_other`, and lacking it is reported through the returned
/// message rather than as an error. With one name, moves the requester.
pub fn resolve_teleport(
    ctx: &mut GameContext,
    sender: &CommandSender,
    player1: &str,
    player2: Option<&str>,
    silent: bool,
) -> Result<Option<String>, CommandError> {
    let first = ctx.roster.find(player1)?;

    let (mover, target, on_behalf) = match player2 {
        Some(player2) => {
            if !sender.may(TELEPORT_OTHER) {
                return Ok(Some(NO_RIGHTS_MESSAGE.to_string()));
            }
            (first, ctx.roster.find(player2)?, true)
        }
        None => {
            let me = sender
                .connected_player(ctx.roster)
                .ok_or(CommandError::RequiredPlayer)?;
            (me, first, false)
        }
    };

    let silent = silent || ctx.roster.player(mover)?.invisible;
    let target_conn = ctx.roster.player(target)?;
    let target_name = target_conn.display_name().to_string();
    let to = target_conn.position;

    let (dx, dy, dz) = TELEPORT_OFFSET;
    let mover_name = relocate(ctx, mover, Position::new(to.x + dx, to.y + dy, to.z + dz))?;

    let adverb = if silent { "silently " } else { "" };
    let message = if on_behalf {
        format!(
            "{} {adverb}teleported {mover_name} to {target_name}",
            sender.name
        )
    } else {
        format!("{mover_name} {adverb}teleported to {target_name}")
    };
    announce(ctx.sink, message, silent);
    Ok(None)
}

/// `/tpsilent`: `/teleport` that never announces publicly.
pub fn resolve_tpsilent(
    ctx: &mut GameContext,
    sender: &CommandSender,
    player1: &str,
    player2: Option<&str>,
) -> Result<Option<String>, CommandError> {
    resolve_teleport(ctx, sender, player1, player2, true)
}

/// `/fly [player]`: toggle flight.
pub fn resolve_fly(
    ctx: &mut GameContext,
    sender: &CommandSender,
    target: PlayerId,
) -> Result<(), CommandError> {
    let conn = ctx.roster.player_mut(target)?;
    conn.fly = !conn.fly;
    let state = if conn.fly {
        "now flying"
    } else {
        "no longer flying"
    };
    let name = conn.display_name().to_string();

    ctx.sink.notify(Notification::Private {
        player: target,
        message: format!("You're {state}"),
    });
    if let Some(me) = sender.connected_player(ctx.roster) {
        if me != target {
            ctx.sink.notify(Notification::Private {
                player: me,
                message: format!("{name} is {state}"),
            });
        }
    }
    ctx.sink
        .notify(Notification::AdminRelay(format!("* {name} is {state}")));
    Ok(())
}

/// `/unstick [player]`: announce publicly, then re-apply the player's own
/// position so the client and everything downstream re-validate it.
pub fn resolve_unstick(
    ctx: &mut GameContext,
    sender: &CommandSender,
    target: PlayerId,
) -> Result<(), CommandError> {
    let conn = ctx.roster.player(target)?;
    let position = conn.position;
    ctx.sink.notify(Notification::Broadcast(format!(
        "{} unstuck {}",
        sender.name,
        conn.display_name()
    )));
    relocate(ctx, target, position)?;
    Ok(())
}

/// `/where [player]`: sector and truncated coordinates.
pub fn resolve_where(roster: &Roster, target: PlayerId) -> Result<String, CommandError> {
    let conn = roster.player(target)?;
    let Position { x, y, z } = conn.position;
    Ok(format!(
        "{} is in {} ({}, {}, {})",
        conn.display_name(),
        to_sector(x, y),
        x as i32,
        y as i32,
        z as i32
    ))
}

/// Put a player at `position` and tell their client. Returns their name.
fn relocate(
    ctx: &mut GameContext,
    player: PlayerId,
    position: Position,
) -> Result<String, CommandError> {
    let conn = ctx.roster.player_mut(player)?;
    conn.position = position;
    let name = conn.display_name().to_string();
    info!(
        "Relocated {name} to ({:.1}, {:.1}, {:.1})",
        position.x, position.y, position.z
    );
    ctx.sink.notify(Notification::SendPacket {
        player,
        packet: Packet::PositionData(PositionData::new(position.x, position.y, position.z)),
    });
    Ok(name)
}

fn announce(sink: &mut dyn EventSink, message: String, silent: bool) {
    if silent {
        sink.notify(Notification::AdminRelay(format!("* {message}")));
    } else {
        sink.notify(Notification::Broadcast(message));
    }
}
