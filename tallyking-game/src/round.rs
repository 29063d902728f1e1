//! End-of-game detection
//!
//! A game moves `Normal -> AwaitingConfirmation -> (Normal | WinnerDeclared)`.
//! Which transitions are taken depends on the [`EndPolicy`] chosen when the
//! game starts:
//!
//! * [`EndPolicy::LeadHold`]: reaching the winning score only asks whether the
//!   round is over. Each confirmed round with a sole leader extends that
//!   leader's streak; a tie wipes it. The streak reaching `rounds_to_win`
//!   decides the game.
//! * [`EndPolicy::FirstReach`]: the first crossing asks once; confirming (or
//!   stopping early) hands the win to the highest score, earliest seat first.
use serde::{Deserialize, Serialize};

use crate::catalog::GameDefinition;
use crate::constants::{DEFAULT_ROUNDS_TO_WIN, FIRST_REACH_MIN_PLAYERS, LEAD_HOLD_MIN_PLAYERS};
use crate::error::ValidationError;
use crate::ledger::{PlayerId, ScoreLedger};

/// Win condition selected for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EndPolicy {
    /// Sole leader must hold the lead for `rounds_to_win` confirmed rounds.
    LeadHold {
        #[serde(rename = "roundsToWin", default = "default_rounds_to_win")]
        rounds_to_win: u32,
    },
    /// First to the winning score ends the game on confirmation or manual stop.
    FirstReach,
}

const fn default_rounds_to_win() -> u32 {
    DEFAULT_ROUNDS_TO_WIN
}

impl Default for EndPolicy {
    fn default() -> Self {
        Self::LeadHold {
            rounds_to_win: DEFAULT_ROUNDS_TO_WIN,
        }
    }
}

impl EndPolicy {
    #[must_use]
    pub const fn min_players(self) -> usize {
        match self {
            Self::LeadHold { .. } => LEAD_HOLD_MIN_PLAYERS,
            Self::FirstReach => FIRST_REACH_MIN_PLAYERS,
        }
    }

    /// Only first-reach games feed the session standings.
    #[must_use]
    pub const fn tracks_session_stats(self) -> bool {
        matches!(self, Self::FirstReach)
    }

    #[must_use]
    pub const fn allows_early_stop(self) -> bool {
        matches!(self, Self::FirstReach)
    }

    /// Lead-hold games treat a zero entry as "nothing entered".
    #[must_use]
    pub const fn ignores_zero_points(self) -> bool {
        matches!(self, Self::LeadHold { .. })
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeadHold { .. } => "lead-hold",
            Self::FirstReach => "first-reach",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundPhase {
    #[default]
    Normal,
    AwaitingConfirmation,
    WinnerDeclared,
}

/// Streak bookkeeping across confirmation rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub phase: RoundPhase,
    pub potential_winner: Option<PlayerId>,
    pub consecutive_win_rounds: u32,
    /// One-shot guard for first-reach prompts.
    pub threshold_prompted: bool,
}

impl RoundState {
    #[must_use]
    pub fn is_final_round(&self) -> bool {
        self.phase == RoundPhase::AwaitingConfirmation
    }

    fn reset_streak(&mut self) {
        self.potential_winner = None;
        self.consecutive_win_rounds = 0;
    }
}

/// Result of closing a round or stopping a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoundOutcome {
    /// Round ended with a shared lead; nobody's streak survives.
    #[serde(rename_all = "camelCase")]
    Tie { score: i64 },
    /// A sole leader who still has to hold on.
    #[serde(rename_all = "camelCase")]
    Leading {
        leader: PlayerId,
        score: i64,
        rounds_remaining: u32,
    },
    /// The round check was waved off.
    Declined,
    /// Game over. `winner` is `None` only when the roster is empty.
    #[serde(rename_all = "camelCase")]
    Winner { winner: Option<PlayerId> },
}

/// Drives [`RoundState`] for a single game under its [`EndPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEvaluator {
    policy: EndPolicy,
    state: RoundState,
}

impl RoundEvaluator {
    #[must_use]
    pub fn new(policy: EndPolicy) -> Self {
        Self {
            policy,
            state: RoundState::default(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> EndPolicy {
        self.policy
    }

    #[must_use]
    pub const fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.state.phase == RoundPhase::WinnerDeclared
    }

    /// Inspect totals after a score change. Returns `true` when this call
    /// raised the end-of-round prompt.
    pub fn after_score(&mut self, ledger: &ScoreLedger, game: &GameDefinition) -> bool {
        if self.state.phase != RoundPhase::Normal {
            return false;
        }
        if matches!(self.policy, EndPolicy::FirstReach) && self.state.threshold_prompted {
            return false;
        }
        if !ledger.any_at_or_above(i64::from(game.winning_score)) {
            return false;
        }
        self.state.phase = RoundPhase::AwaitingConfirmation;
        self.state.threshold_prompted = true;
        log::debug!(
            "{} threshold {} reached; awaiting round confirmation",
            game.name,
            game.winning_score
        );
        true
    }

    /// The players said the round is over.
    ///
    /// # Errors
    ///
    /// Returns an error if no round check is pending.
    pub fn confirm(&mut self, ledger: &ScoreLedger) -> Result<RoundOutcome, ValidationError> {
        if self.state.phase != RoundPhase::AwaitingConfirmation {
            return Err(ValidationError::NoPendingRoundCheck);
        }
        let outcome = match self.policy {
            EndPolicy::LeadHold { rounds_to_win } => self.close_lead_hold_round(ledger, rounds_to_win),
            EndPolicy::FirstReach => self.declare(first_reach_winner(ledger)),
        };
        Ok(outcome)
    }

    /// The players said the round is not over yet. Streak state is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if no round check is pending.
    pub fn decline(&mut self) -> Result<RoundOutcome, ValidationError> {
        if self.state.phase != RoundPhase::AwaitingConfirmation {
            return Err(ValidationError::NoPendingRoundCheck);
        }
        self.state.phase = RoundPhase::Normal;
        Ok(RoundOutcome::Declined)
    }

    /// End a first-reach game right now and return its winner.
    ///
    /// # Errors
    ///
    /// Returns an error under the lead-hold policy or once the game is decided.
    pub fn stop(&mut self, ledger: &ScoreLedger) -> Result<Option<PlayerId>, ValidationError> {
        if !self.policy.allows_early_stop() {
            return Err(ValidationError::StopNotSupported);
        }
        if self.is_decided() {
            return Err(ValidationError::GameFinished);
        }
        let winner = first_reach_winner(ledger);
        self.state.phase = RoundPhase::WinnerDeclared;
        Ok(winner)
    }

    fn close_lead_hold_round(&mut self, ledger: &ScoreLedger, rounds_to_win: u32) -> RoundOutcome {
        let rounds_to_win = rounds_to_win.max(1);
        let Some(leaders) = ledger.leaders() else {
            self.state.reset_streak();
            self.state.phase = RoundPhase::Normal;
            return RoundOutcome::Tie { score: 0 };
        };
        let Some(leader) = leaders.sole() else {
            self.state.reset_streak();
            self.state.phase = RoundPhase::Normal;
            log::debug!("round tied at {}; streak reset", leaders.score);
            return RoundOutcome::Tie {
                score: leaders.score,
            };
        };

        if self.state.potential_winner == Some(leader) {
            self.state.consecutive_win_rounds += 1;
        } else {
            self.state.potential_winner = Some(leader);
            self.state.consecutive_win_rounds = 1;
        }

        if self.state.consecutive_win_rounds >= rounds_to_win {
            return self.declare(Some(leader));
        }
        self.state.phase = RoundPhase::Normal;
        let rounds_remaining = rounds_to_win - self.state.consecutive_win_rounds;
        log::debug!(
            "player {leader} leads with {}; {rounds_remaining} more round(s) needed",
            leaders.score
        );
        RoundOutcome::Leading {
            leader,
            score: leaders.score,
            rounds_remaining,
        }
    }

    fn declare(&mut self, winner: Option<PlayerId>) -> RoundOutcome {
        self.state.phase = RoundPhase::WinnerDeclared;
        RoundOutcome::Winner { winner }
    }
}

/// Strictly highest total wins; a shared top score goes to the earliest seat.
#[must_use]
pub fn first_reach_winner(ledger: &ScoreLedger) -> Option<PlayerId> {
    ledger.leaders().and_then(|l| l.players.first().copied())
}
