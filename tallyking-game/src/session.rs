//! The game currently being played
use serde::{Deserialize, Serialize};

use crate::catalog::GameDefinition;
use crate::constants::NO_WINNER;
use crate::error::ValidationError;
use crate::history::GameDuration;
use crate::ledger::{PlayerId, PointLogEntry, ScoreLedger};
use crate::round::{EndPolicy, RoundEvaluator, RoundOutcome, RoundPhase};

/// What an `add_score` request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoreUpdate {
    /// Nothing to record (zero under the lead-hold policy, or unparseable input).
    Ignored,
    /// The change was logged; `round_check` is set when it raised the
    /// end-of-round prompt.
    #[serde(rename_all = "camelCase")]
    Recorded {
        entry: PointLogEntry,
        round_check: bool,
    },
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game: String,
    pub winner: String,
    pub winner_id: Option<PlayerId>,
    pub players: Vec<String>,
    pub ended_at: i64,
    pub duration: GameDuration,
}

/// Response to a round confirmation or decline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub result: Option<GameResult>,
}

/// One game in play: its definition snapshot, roster, totals and round state.
/// Exactly one lives inside the keeper between `start_game` and
/// `start_new_game`.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    game: GameDefinition,
    ledger: ScoreLedger,
    round: RoundEvaluator,
    start_time: i64,
    result: Option<GameResult>,
}

impl ActiveSession {
    #[must_use]
    pub fn new(game: GameDefinition, players: Vec<String>, policy: EndPolicy, start_time: i64) -> Self {
        Self {
            game,
            ledger: ScoreLedger::new(players),
            round: RoundEvaluator::new(policy),
            start_time,
            result: None,
        }
    }

    #[must_use]
    pub const fn game(&self) -> &GameDefinition {
        &self.game
    }

    #[must_use]
    pub const fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn round(&self) -> &RoundEvaluator {
        &self.round
    }

    #[must_use]
    pub const fn policy(&self) -> EndPolicy {
        self.round.policy()
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    #[must_use]
    pub const fn start_time(&self) -> i64 {
        self.start_time
    }

    #[must_use]
    pub const fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.round.is_decided()
    }

    /// Log a score change and run the end-of-game check.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is decided or the player is unknown.
    pub fn add_points(
        &mut self,
        player: PlayerId,
        points: i64,
        timestamp: i64,
    ) -> Result<ScoreUpdate, ValidationError> {
        if self.is_decided() {
            return Err(ValidationError::GameFinished);
        }
        if self.ledger.player(player).is_none() {
            return Err(ValidationError::UnknownPlayer(player.0));
        }
        if points == 0 && self.policy().ignores_zero_points() {
            return Ok(ScoreUpdate::Ignored);
        }
        let entry = self.ledger.add(player, points, timestamp)?.clone();
        log::debug!(
            "{} {:+} -> {} in {}",
            entry.player,
            entry.points_added,
            entry.new_score,
            self.game.name
        );
        let round_check = self.round.after_score(&self.ledger, &self.game);
        Ok(ScoreUpdate::Recorded { entry, round_check })
    }

    /// Close the pending round (`finished`) or wave it off.
    ///
    /// # Errors
    ///
    /// Returns an error if no round check is pending.
    pub fn resolve_round(&mut self, finished: bool) -> Result<RoundOutcome, ValidationError> {
        if finished {
            self.round.confirm(&self.ledger)
        } else {
            self.round.decline()
        }
    }

    /// End a first-reach game immediately and return its winner.
    ///
    /// # Errors
    ///
    /// Returns an error under the lead-hold policy or once decided.
    pub fn stop(&mut self) -> Result<Option<PlayerId>, ValidationError> {
        self.round.stop(&self.ledger)
    }

    /// Display name for a decided winner, or the sentinel for an empty roster.
    #[must_use]
    pub fn winner_name(&self, winner: Option<PlayerId>) -> String {
        winner
            .and_then(|id| self.ledger.player(id))
            .map_or_else(|| NO_WINNER.to_string(), |p| p.name.clone())
    }

    /// Record how the decided game ended.
    pub(crate) fn conclude(&mut self, winner: Option<PlayerId>, ended_at: i64) -> GameResult {
        let result = GameResult {
            game: self.game.name.clone(),
            winner: self.winner_name(winner),
            winner_id: winner,
            players: self.ledger.names(),
            ended_at,
            duration: GameDuration::between(self.start_time, ended_at),
        };
        self.result.insert(result).clone()
    }
}
