//! Resolution of the optional `[player]` argument.

use voxbrawl_game::{CommandError, CommandSender, PlayerId, Roster};

/// Player a command acts on: the named one, or the sender when no name
/// is given.
///
/// Without a name the sender must be a connected participant, otherwise
/// the command fails with `RequiredPlayer`.
pub fn target_player(
    roster: &Roster,
    sender: &CommandSender,
    args: &[String],
) -> Result<PlayerId, CommandError> {
    match args {
        [] => sender
            .connected_player(roster)
            .ok_or(CommandError::RequiredPlayer),
        [name] => roster.find(name),
        _ => Err(CommandError::InvalidParameter(
            "Too many parameters!".to_string(),
        )),
    }
}
