//! Error taxonomy for the scorekeeping engine
use thiserror::Error;

/// Bad input rejected at the boundary. The engine never mutates state when it
/// returns one of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least {required} player(s) are needed to start (got {given})")]
    NotEnoughPlayers { required: usize, given: usize },
    #[error("player name '{0}' was entered more than once")]
    DuplicatePlayer(String),
    #[error("no game selected; create a game first")]
    NoGameSelected,
    #[error("no game named '{0}' exists")]
    UnknownGame(String),
    #[error("a game named '{0}' already exists")]
    DuplicateGame(String),
    #[error("game name must not be empty")]
    EmptyGameName,
    #[error("winning score must be greater than zero (got {0})")]
    NonPositiveWinningScore(i64),
    #[error("no game is in progress")]
    NoActiveGame,
    #[error("player #{0} is not part of the current game")]
    UnknownPlayer(u32),
    #[error("that change would push player #{0}'s total out of range")]
    ScoreOutOfRange(u32),
    #[error("the current game already has a winner")]
    GameFinished,
    #[error("no end-of-round check is pending")]
    NoPendingRoundCheck,
    #[error("the lead-hold policy cannot be stopped early")]
    StopNotSupported,
    #[error("resetting session stats requires confirmation")]
    ResetNotConfirmed,
}

/// Storage was unavailable or a write failed. Logged and swallowed by the
/// engine; in-memory state is kept.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored duration label was not of the form `"{m}m {s}s"`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized duration label '{0}'")]
pub struct DurationParseError(pub String);

/// The persisted blob could not be parsed.
#[derive(Debug, Error)]
#[error("persisted state is corrupt: {source}")]
pub struct CorruptStateError {
    #[from]
    source: serde_json::Error,
}
