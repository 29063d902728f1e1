//! Logical schema of the persisted blob and its tolerant loader
use serde::{Deserialize, Serialize};

use crate::catalog::{GameCatalog, GameDefinition};
use crate::error::{CorruptStateError, PersistenceError};
use crate::history::HistoryStore;
use crate::stats::SessionStats;

/// Everything that survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub games: Vec<GameDefinition>,
    #[serde(default)]
    pub game_history: HistoryStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_stats: Option<SessionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_players: Option<Vec<String>>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            games: GameCatalog::seeded().as_slice().to_vec(),
            game_history: HistoryStore::default(),
            session_stats: None,
            last_players: None,
        }
    }
}

/// A loaded state together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// Parsed as stored.
    Intact(PersistedState),
    /// Nothing stored, or no usable game definitions; the built-in catalog
    /// was seeded and should be written back.
    Reseeded(PersistedState),
    /// The stored blob was unreadable. Defaults are used in memory and the
    /// blob is left as it is.
    Fallback(PersistedState),
}

impl Restored {
    /// Whether the state differs from what is stored and should be saved now.
    #[must_use]
    pub const fn needs_save(&self) -> bool {
        matches!(self, Self::Reseeded(_))
    }

    #[must_use]
    pub fn into_state(self) -> PersistedState {
        match self {
            Self::Intact(state) | Self::Reseeded(state) | Self::Fallback(state) => state,
        }
    }
}

impl PersistedState {
    /// Parse a stored blob. Invalid or repeated game definitions are dropped
    /// and an empty catalog is reseeded with the built-in game.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not valid JSON for this schema.
    pub fn from_json(blob: &str) -> Result<Self, CorruptStateError> {
        let mut state: Self = serde_json::from_str(blob)?;
        state.normalize_catalog();
        Ok(state)
    }

    /// Returns `true` when the catalog had to be reseeded.
    fn normalize_catalog(&mut self) -> bool {
        let catalog = GameCatalog::from_definitions(std::mem::take(&mut self.games));
        let reseeded = catalog.is_empty();
        let catalog = if reseeded { GameCatalog::seeded() } else { catalog };
        self.games = catalog.as_slice().to_vec();
        reseeded
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from whatever the store returned.
    #[must_use]
    pub fn restore(blob: Option<&str>) -> Restored {
        let Some(blob) = blob else {
            return Restored::Reseeded(Self::default());
        };
        match serde_json::from_str::<Self>(blob) {
            Ok(mut state) => {
                if state.normalize_catalog() {
                    Restored::Reseeded(state)
                } else {
                    Restored::Intact(state)
                }
            }
            Err(err) => {
                log::warn!("{}; starting fresh", CorruptStateError::from(err));
                Restored::Fallback(Self::default())
            }
        }
    }

    /// Load from whatever the store returned. Missing data yields the default;
    /// corrupt data is logged and also yields the default.
    #[must_use]
    pub fn load_or_default(blob: Option<&str>) -> Self {
        Self::restore(blob).into_state()
    }
}
