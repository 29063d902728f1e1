//! Per-game score totals with an append-only point log
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Stable identifier of a player within one game (roster position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl PlayerId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A roster member. The name is display-only; identity is the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// One recorded score change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointLogEntry {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    pub player: String,
    pub points_added: i64,
    pub new_score: i64,
    pub timestamp: i64,
}

/// Current maximum score and every player tied at it, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaders {
    pub score: i64,
    pub players: Vec<PlayerId>,
}

impl Leaders {
    /// The single leader, if the lead is not shared.
    #[must_use]
    pub fn sole(&self) -> Option<PlayerId> {
        match self.players.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Score totals for one game. Totals only change through [`ScoreLedger::add`],
/// which always appends to the log, so each total equals the sum of that
/// player's logged points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLedger {
    players: Vec<Player>,
    scores: Vec<i64>,
    log: Vec<PointLogEntry>,
}

impl ScoreLedger {
    /// Fresh ledger with every player at zero.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let players: Vec<Player> = names
            .into_iter()
            .zip(0_u32..)
            .map(|(name, id)| Player {
                id: PlayerId(id),
                name,
            })
            .collect();
        let scores = vec![0; players.len()];
        Self {
            players,
            scores,
            log: Vec::new(),
        }
    }

    /// Apply `points` to a player's total and log the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not on this ledger or the new total
    /// would overflow. The ledger is unchanged in either case.
    pub fn add(
        &mut self,
        player: PlayerId,
        points: i64,
        timestamp: i64,
    ) -> Result<&PointLogEntry, ValidationError> {
        let name = self
            .player(player)
            .map(|p| p.name.clone())
            .ok_or(ValidationError::UnknownPlayer(player.0))?;
        let total = &mut self.scores[player.index()];
        *total = total
            .checked_add(points)
            .ok_or(ValidationError::ScoreOutOfRange(player.0))?;
        self.log.push(PointLogEntry {
            player_id: Some(player),
            player: name,
            points_added: points,
            new_score: *total,
            timestamp,
        });
        Ok(&self.log[self.log.len() - 1])
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Look up a player by display name (first match in roster order).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().find(|p| p.name == name).map(|p| p.id)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    #[must_use]
    pub fn score(&self, id: PlayerId) -> Option<i64> {
        self.scores.get(id.index()).copied()
    }

    /// `(player, total)` pairs in roster order.
    pub fn totals(&self) -> impl Iterator<Item = (&Player, i64)> {
        self.players.iter().zip(self.scores.iter().copied())
    }

    #[must_use]
    pub fn log(&self) -> &[PointLogEntry] {
        &self.log
    }

    /// Whether any total has reached `threshold`.
    #[must_use]
    pub fn any_at_or_above(&self, threshold: i64) -> bool {
        self.scores.iter().any(|s| *s >= threshold)
    }

    /// Highest total and the players tied at it; `None` for an empty roster.
    #[must_use]
    pub fn leaders(&self) -> Option<Leaders> {
        let score = self.scores.iter().copied().max()?;
        let players = self
            .totals()
            .filter(|(_, total)| *total == score)
            .map(|(p, _)| p.id)
            .collect();
        Some(Leaders { score, players })
    }
}

/// Parse raw score input the way the entry form does: an optional sign and
/// digits, surrounding whitespace ignored. Anything else yields `None`.
#[must_use]
pub fn parse_points(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}
