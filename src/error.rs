//! `error` contains the [`Error`] type for this crate and a shorthand [`Result`] type.

use crate::{command::SearchCommand, world::World};

pub type Result<T> = std::result::Result<T, Error>;

/// Show the [`std::fmt::Display`] of the error to display even further context & info
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Mca(#[from] mca::McaError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Simdnbt(#[from] simdnbt::Error),

    #[error("Empty command input")]
    EmptyCommand,
    #[error("Unknown command literal '{0}'")]
    UnknownCommand(String),
    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a valid integer radius")]
    InvalidRadius(String),
    #[error(
        "Radius must be between {min} and {max}, got {radius}",
        min = SearchCommand::RADIUS_MIN,
        max = SearchCommand::RADIUS_MAX
    )]
    RadiusOutOfBounds { radius: i32 },
    #[error("Unexpected trailing argument '{0}'")]
    TrailingArgument(String),
    #[error("'{0}' is not a valid resource identifier")]
    InvalidIdentifier(String),
    #[error("This command must be run by a player")]
    NotAPlayer,

    #[error("Nbt value at '{0}' was the wrong nbt data type")]
    InvalidNbtType(&'static str),
    #[error("Nbt value at '{0}' was the wrong nbt list type")]
    InvalidNbtList(&'static str),
    #[error("No Nbt value named '{0}'")]
    MissingNbtTag(&'static str),
    #[error("Tried to load a chunk that hasn't been fully generated yet: {chunk:?} = {status}")]
    NotFullyGenerated { chunk: (i32, i32), status: String },
    #[error("Tried to load a chunk with a DataVersion({data_version}) that is older than {min} at {chunk:?}", min = World::MIN_DATA_VERSION)]
    UnsupportedVersion {
        chunk: (i32, i32),
        data_version: i32,
    },
}
