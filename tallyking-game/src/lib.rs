//! Tallyking Scorekeeping Engine
//!
//! Platform-agnostic core logic for tracking tabletop game scores: game
//! catalog, per-game score ledger, end-of-game policies, session standings and
//! game history. This crate provides all rules without UI or platform-specific
//! dependencies; shells plug in through [`StateStorage`] and [`Clock`].

pub mod catalog;
pub mod clock;
pub mod constants;
pub mod error;
pub mod history;
pub mod keeper;
pub mod ledger;
pub mod round;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod view;

// Re-export commonly used types
pub use catalog::{GameCatalog, GameDefinition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::{DEFAULT_ROUNDS_TO_WIN, NO_WINNER, STORAGE_KEY};
pub use error::{CorruptStateError, DurationParseError, PersistenceError, ValidationError};
pub use history::{GameDuration, HistoryEntry, HistoryStore};
pub use keeper::ScoreKeeper;
pub use ledger::{Leaders, Player, PlayerId, PointLogEntry, ScoreLedger, parse_points};
pub use round::{EndPolicy, RoundEvaluator, RoundOutcome, RoundPhase, RoundState};
pub use session::{ActiveSession, GameResult, RoundReport, ScoreUpdate};
pub use state::{PersistedState, Restored};
pub use stats::{GameRecord, GameStandings, Leadership, PlayerRecord, SessionStats};
pub use storage::{MemoryStorage, StateStorage, read_state, write_state};
pub use view::{HistoryItemView, HistoryView, RankingsView, ScoreboardView};
