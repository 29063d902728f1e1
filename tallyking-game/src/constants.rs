//! Fixed values shared by the engine and its storage shells.
//!
//! Keeping them together means the persisted key, the seeded catalog and the
//! default win condition can only change through reviewed code.

/// Key under which the whole persisted state blob is stored.
pub const STORAGE_KEY: &str = "gameCounterState";

// Seeded catalog ----------------------------------------------------------
pub const DEFAULT_GAME_NAME: &str = "Rummikub";
pub const DEFAULT_WINNING_SCORE: u32 = 100;

// Win conditions ----------------------------------------------------------
/// Consecutive confirmed rounds a sole leader must hold under the lead-hold policy.
pub const DEFAULT_ROUNDS_TO_WIN: u32 = 2;
pub const LEAD_HOLD_MIN_PLAYERS: usize = 2;
pub const FIRST_REACH_MIN_PLAYERS: usize = 1;

// Display labels ----------------------------------------------------------
/// Winner reported when a game is decided without any players.
pub const NO_WINNER: &str = "N/A";
pub const INCOMPLETE_LABEL: &str = "Incomplete";
pub const IN_PROGRESS_LABEL: &str = "In Progress";

pub(crate) const MS_PER_MINUTE: i64 = 60_000;
pub(crate) const MS_PER_SECOND: f64 = 1_000.0;
