//! Errors surfaced to whoever issued a command.

use thiserror::Error;
use voxbrawl_world::sector::SectorError;

/// A command failed; the message is shown to the requester as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Both player and target player are required")]
    RequiredPlayer,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Invalid player: {0}")]
    PlayerNotFound(String),

    #[error("Ambiguous player: {0}")]
    AmbiguousPlayer(String),
}

impl From<SectorError> for CommandError {
    fn from(e: SectorError) -> Self {
        CommandError::InvalidParameter(e.to_string())
    }
}
