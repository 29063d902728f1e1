//! Scorekeeping engine: owns all state and applies user intents
use crate::catalog::{GameCatalog, GameDefinition};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::ledger::{PlayerId, parse_points};
use crate::round::{EndPolicy, RoundOutcome};
use crate::session::{ActiveSession, GameResult, RoundReport, ScoreUpdate};
use crate::state::PersistedState;
use crate::stats::SessionStats;
use crate::storage::{StateStorage, read_state, write_state};
use crate::view::{HistoryView, RankingsView, ScoreboardView};

/// Main engine. Every operation runs to completion against `&mut self`;
/// mutating operations end with a best-effort save.
pub struct ScoreKeeper<S, C>
where
    S: StateStorage,
    C: Clock,
{
    storage: S,
    clock: C,
    catalog: GameCatalog,
    history: HistoryStore,
    stats: SessionStats,
    last_players: Vec<String>,
    active: Option<ActiveSession>,
}

impl<S, C> ScoreKeeper<S, C>
where
    S: StateStorage,
    C: Clock,
{
    /// Restore from storage. Missing or corrupt data starts from the default
    /// catalog. Only a reseeded catalog is written back immediately; an
    /// unreadable blob stays in storage until the next change is saved.
    pub fn load(storage: S, clock: C) -> Self {
        let restored = read_state(&storage);
        let needs_save = restored.needs_save();
        let PersistedState {
            games,
            game_history,
            session_stats,
            last_players,
        } = restored.into_state();
        let keeper = Self {
            storage,
            clock,
            catalog: GameCatalog::from_definitions(games),
            history: game_history,
            stats: session_stats.unwrap_or_default(),
            last_players: last_players.unwrap_or_default(),
            active: None,
        };
        if needs_save {
            keeper.persist();
        }
        keeper
    }

    /// Logical state as it is persisted.
    #[must_use]
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            games: self.catalog.as_slice().to_vec(),
            game_history: self.history.clone(),
            session_stats: Some(self.stats.clone()),
            last_players: Some(self.last_players.clone()),
        }
    }

    fn persist(&self) {
        if let Err(err) = write_state(&self.storage, &self.snapshot()) {
            log::error!("could not save state: {err}");
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Roster of the most recently started game, for prefilling the setup form.
    #[must_use]
    pub fn last_players(&self) -> &[String] {
        &self.last_players
    }

    #[must_use]
    pub const fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Begin a game. Names are trimmed and blanks dropped. Any previous
    /// session is replaced; an undecided one stays in history as incomplete.
    ///
    /// # Errors
    ///
    /// Returns an error if too few or repeated names remain, or if the game is
    /// not selected or not in the catalog.
    pub fn start_game<N: AsRef<str>>(
        &mut self,
        players: &[N],
        game_name: &str,
        policy: EndPolicy,
    ) -> Result<&ActiveSession, ValidationError> {
        let names: Vec<String> = players
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.len() < policy.min_players() {
            return Err(ValidationError::NotEnoughPlayers {
                required: policy.min_players(),
                given: names.len(),
            });
        }
        if let Some(repeat) = names
            .iter()
            .enumerate()
            .find(|(i, name)| names[..*i].contains(*name))
            .map(|(_, name)| name.clone())
        {
            return Err(ValidationError::DuplicatePlayer(repeat));
        }
        let game_name = game_name.trim();
        if game_name.is_empty() {
            return Err(ValidationError::NoGameSelected);
        }
        let game = self
            .catalog
            .get(game_name)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownGame(game_name.to_string()))?;

        if let Some(previous) = self.active.as_ref().filter(|s| !s.is_decided()) {
            log::info!("abandoning unfinished {} game", previous.game().name);
        }

        let start_time = self.clock.now_ms();
        log::info!(
            "starting {} ({}) with {} player(s)",
            game.name,
            policy.label(),
            names.len()
        );
        self.history
            .append(HistoryEntry::in_progress(&game.name, names.clone(), start_time));
        self.last_players.clone_from(&names);
        self.active = Some(ActiveSession::new(game, names, policy, start_time));
        self.persist();
        self.active.as_ref().ok_or(ValidationError::NoActiveGame)
    }

    /// Add (or with a negative value, subtract) points for a player.
    ///
    /// # Errors
    ///
    /// Returns an error if no game is active, the game is decided, or the
    /// player is not in it.
    pub fn add_score(&mut self, player: PlayerId, points: i64) -> Result<ScoreUpdate, ValidationError> {
        let now = self.clock.now_ms();
        let session = self.active.as_mut().ok_or(ValidationError::NoActiveGame)?;
        let update = session.add_points(player, points, now)?;
        if let ScoreUpdate::Recorded { entry, .. } = &update {
            self.history.log_point(entry.clone());
            self.persist();
        }
        Ok(update)
    }

    /// Add points from raw text input; unparseable input is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`ScoreKeeper::add_score`].
    pub fn add_score_input(&mut self, player: PlayerId, input: &str) -> Result<ScoreUpdate, ValidationError> {
        match parse_points(input) {
            Some(points) => self.add_score(player, points),
            None if self.active.is_none() => Err(ValidationError::NoActiveGame),
            None => Ok(ScoreUpdate::Ignored),
        }
    }

    /// Answer the end-of-round prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if no game is active or no prompt is pending.
    pub fn confirm_round_check(&mut self, finished: bool) -> Result<RoundReport, ValidationError> {
        let now = self.clock.now_ms();
        let session = self.active.as_mut().ok_or(ValidationError::NoActiveGame)?;
        let policy = session.policy();
        let outcome = session.resolve_round(finished)?;
        let result = match outcome {
            RoundOutcome::Winner { winner } => Some(session.conclude(winner, now)),
            _ => None,
        };
        if let Some(result) = &result {
            self.record_finish(result, policy);
        }
        Ok(RoundReport { outcome, result })
    }

    /// Stop a first-reach game now; the current leader wins.
    ///
    /// # Errors
    ///
    /// Returns an error if no game is active, the policy does not allow it,
    /// or the game is already decided.
    pub fn stop_game(&mut self) -> Result<GameResult, ValidationError> {
        let now = self.clock.now_ms();
        let session = self.active.as_mut().ok_or(ValidationError::NoActiveGame)?;
        let winner = session.stop()?;
        let policy = session.policy();
        let result = session.conclude(winner, now);
        self.record_finish(&result, policy);
        Ok(result)
    }

    /// Close the history entry and credit the standings for a decided game.
    fn record_finish(&mut self, result: &GameResult, policy: EndPolicy) {
        let finalized = self.history.finalize(result.ended_at, &result.winner);
        if finalized && result.winner_id.is_some() && policy.tracks_session_stats() {
            self.stats
                .record_result(&result.game, &result.winner, &result.players);
        }
        log::info!(
            "{} won by {} after {}",
            result.game,
            result.winner,
            result.duration
        );
        self.persist();
    }

    /// Leave the finished (or abandoned) game and return the roster to
    /// prefill the setup form with.
    pub fn start_new_game(&mut self) -> Vec<String> {
        if let Some(session) = self.active.take().filter(|s| !s.is_decided()) {
            log::info!("leaving unfinished {} game", session.game().name);
        }
        self.last_players.clone()
    }

    /// Add a game definition to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or taken, or the score is not positive.
    pub fn add_game(&mut self, name: &str, winning_score: i64) -> Result<GameDefinition, ValidationError> {
        let added = self.catalog.add(name, winning_score)?.clone();
        self.persist();
        Ok(added)
    }

    /// Remove a game definition. History and a running game are unaffected.
    pub fn delete_game(&mut self, name: &str) -> Option<GameDefinition> {
        let removed = self.catalog.remove(name)?;
        self.persist();
        Some(removed)
    }

    /// Clear session standings. The caller must pass the user's confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if `confirmed` is false.
    pub fn reset_session(&mut self, confirmed: bool) -> Result<(), ValidationError> {
        if !confirmed {
            return Err(ValidationError::ResetNotConfirmed);
        }
        self.stats.reset();
        log::info!("session standings reset");
        self.persist();
        Ok(())
    }

    #[must_use]
    pub fn scoreboard(&self) -> Option<ScoreboardView> {
        self.active.as_ref().map(ScoreboardView::from_session)
    }

    #[must_use]
    pub fn history_view(&self) -> HistoryView {
        HistoryView::from_store(&self.history)
    }

    #[must_use]
    pub fn rankings(&self) -> RankingsView {
        RankingsView::from_stats(&self.stats)
    }
}
