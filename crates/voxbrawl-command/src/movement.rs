//! `/move`, `/moves`, `/teleport`, `/tpsilent`, `/fly`, `/unstick`, `/where`.

use voxbrawl_game::movement::{
    resolve_fly, resolve_move, resolve_teleport, resolve_tpsilent, resolve_unstick, resolve_where,
};
use voxbrawl_game::{CommandError, GameContext};

use crate::target::target_player;
use crate::{CommandContext, CommandEntry, CommandFn, CommandRegistry, CommandResult};

pub(crate) fn register(registry: &mut CommandRegistry) {
    let mut add = |name: &str,
                   aliases: &[&str],
                   usage: &str,
                   description: &str,
                   admin_only: bool,
                   handler: CommandFn| {
        registry.register(CommandEntry {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            description: description.to_string(),
            usage: usage.to_string(),
            admin_only,
            handler,
        });
    };

    add(
        "move",
        &[],
        "move [player] <sector | x y z>",
        "Move a player to a sector or coordinates",
        false,
        cmd_move,
    );
    add(
        "moves",
        &[],
        "moves [player] <sector | x y z>",
        "Move without announcing it",
        false,
        cmd_moves,
    );
    add(
        "teleport",
        &["tp"],
        "teleport [player] <target>",
        "Teleport to another player",
        false,
        cmd_teleport,
    );
    add(
        "tpsilent",
        &["tps"],
        "tpsilent [player] <target>",
        "Teleport without announcing it",
        false,
        cmd_tpsilent,
    );
    add("fly", &[], "fly [player]", "Toggle flight", true, cmd_fly);
    add(
        "unstick",
        &[],
        "unstick [player]",
        "Re-apply a player's position",
        true,
        cmd_unstick,
    );
    add("where", &[], "where [player]", "Report a player's location", true, cmd_where);
}

fn cmd_move(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    resolve_move(game, ctx.sender, &ctx.args, false)?;
    Ok(CommandResult::done())
}

fn cmd_moves(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    resolve_move(game, ctx.sender, &ctx.args, true)?;
    Ok(CommandResult::done())
}

/// `[player] <target>` split into the two names `resolve_teleport` takes.
fn teleport_args(args: &[String]) -> Result<(&str, Option<&str>), CommandError> {
    match args {
        [target] => Ok((target.as_str(), None)),
        [player, target] => Ok((player.as_str(), Some(target.as_str()))),
        _ => Err(CommandError::InvalidParameter(
            "Wrong number of parameters!".to_string(),
        )),
    }
}

fn teleport_reply(reply: Option<String>) -> CommandResult {
    match reply {
        Some(message) => CommandResult::err(message),
        None => CommandResult::done(),
    }
}

fn cmd_teleport(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    let (player1, player2) = teleport_args(&ctx.args)?;
    let reply = resolve_teleport(game, ctx.sender, player1, player2, false)?;
    Ok(teleport_reply(reply))
}

fn cmd_tpsilent(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    let (player1, player2) = teleport_args(&ctx.args)?;
    let reply = resolve_tpsilent(game, ctx.sender, player1, player2)?;
    Ok(teleport_reply(reply))
}

fn cmd_fly(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    let target = target_player(game.roster, ctx.sender, &ctx.args)?;
    resolve_fly(game, ctx.sender, target)?;
    Ok(CommandResult::done())
}

fn cmd_unstick(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    let target = target_player(game.roster, ctx.sender, &ctx.args)?;
    resolve_unstick(game, ctx.sender, target)?;
    Ok(CommandResult::done())
}

fn cmd_where(game: &mut GameContext, ctx: &CommandContext) -> Result<CommandResult, CommandError> {
    let target = target_player(game.roster, ctx.sender, &ctx.args)?;
    Ok(CommandResult::ok(resolve_where(game.roster, target)?))
}
