use tallyking_game::{
    EndPolicy, ManualClock, MemoryStorage, PlayerId, RoundOutcome, RoundPhase, ScoreKeeper,
    ScoreUpdate, ValidationError,
};

const ANA: PlayerId = PlayerId(0);
const BEN: PlayerId = PlayerId(1);

fn keeper(clock: &ManualClock) -> ScoreKeeper<MemoryStorage, &ManualClock> {
    ScoreKeeper::load(MemoryStorage::default(), clock)
}

#[test]
fn lead_hold_game_plays_to_a_winner() {
    let clock = ManualClock::starting_at(10_000);
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["Ana", " Ben ", ""], "Rummikub", EndPolicy::default())
        .unwrap();
    assert_eq!(keeper.history().latest().unwrap().players, ["Ana", "Ben"]);

    let update = keeper.add_score(ANA, 104).unwrap();
    assert!(matches!(update, ScoreUpdate::Recorded { round_check: true, .. }));

    let report = keeper.confirm_round_check(true).unwrap();
    assert_eq!(
        report.outcome,
        RoundOutcome::Leading {
            leader: ANA,
            score: 104,
            rounds_remaining: 1
        }
    );
    assert!(report.result.is_none());

    keeper.add_score(BEN, 30).unwrap();
    clock.advance_ms(185_600);
    let report = keeper.confirm_round_check(true).unwrap();
    let result = report.result.expect("game decided");
    assert_eq!(result.winner, "Ana");
    assert_eq!(result.winner_id, Some(ANA));
    assert_eq!(result.duration.to_string(), "3m 6s");

    let entry = keeper.history().latest().unwrap();
    assert_eq!(entry.winner.as_deref(), Some("Ana"));
    assert_eq!(entry.point_log.len(), 2);

    // Lead-hold games do not feed the session standings.
    assert!(keeper.stats().is_empty());

    let board = keeper.scoreboard().unwrap();
    assert_eq!(board.phase, RoundPhase::WinnerDeclared);
    assert!(board.players[0].is_winner);
    assert_eq!(keeper.add_score(BEN, 5), Err(ValidationError::GameFinished));
}

#[test]
fn tie_round_resets_and_declines_change_nothing() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["Ana", "Ben"], "Rummikub", EndPolicy::default())
        .unwrap();

    keeper.add_score(ANA, 100).unwrap();
    keeper.confirm_round_check(true).unwrap();
    keeper.add_score(BEN, 100).unwrap();
    let tie = keeper.confirm_round_check(true).unwrap();
    assert_eq!(tie.outcome, RoundOutcome::Tie { score: 100 });
    let state = keeper.active().unwrap().round().state().clone();
    assert_eq!(state.consecutive_win_rounds, 0);
    assert_eq!(state.potential_winner, None);

    keeper.add_score(ANA, 10).unwrap();
    let scores_before: Vec<i64> = keeper
        .active()
        .unwrap()
        .ledger()
        .totals()
        .map(|(_, s)| s)
        .collect();
    let declined = keeper.confirm_round_check(false).unwrap();
    assert_eq!(declined.outcome, RoundOutcome::Declined);
    let session = keeper.active().unwrap();
    let scores_after: Vec<i64> = session.ledger().totals().map(|(_, s)| s).collect();
    assert_eq!(scores_before, scores_after);
    assert_eq!(session.round().state().consecutive_win_rounds, 0);
    assert_eq!(
        keeper.confirm_round_check(true),
        Err(ValidationError::NoPendingRoundCheck)
    );

    // A correction re-raises the check while someone is still over the line.
    let update = keeper.add_score(BEN, -1).unwrap();
    assert!(matches!(update, ScoreUpdate::Recorded { round_check: true, .. }));
}

#[test]
fn first_reach_game_records_session_stats() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    let roster = ["Ana", "Ben", "Cy"];

    for (winner, points) in [(ANA, 100), (ANA, 150), (BEN, 101)] {
        keeper
            .start_game(&roster, "Rummikub", EndPolicy::FirstReach)
            .unwrap();
        keeper.add_score(winner, points).unwrap();
        let report = keeper.confirm_round_check(true).unwrap();
        assert!(report.result.is_some());
        keeper.start_new_game();
    }

    let rankings = keeper.rankings();
    assert_eq!(rankings.king.players, vec!["Ana".to_string()]);
    assert_eq!(rankings.king.wins, 2);
    let duke = &rankings.games[0];
    assert_eq!(duke.game, "Rummikub");
    assert_eq!(duke.records[0].player, "Ana");
    assert_eq!(duke.records[0].losses, 1);
    let record = keeper.stats().record("Rummikub").unwrap();
    assert_eq!(record.results_recorded(), 9);
}

#[test]
fn first_reach_tie_goes_to_earliest_seat() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::FirstReach)
        .unwrap();
    keeper.add_score(BEN, 100).unwrap();
    keeper.confirm_round_check(false).unwrap();
    let update = keeper.add_score(ANA, 100).unwrap();
    assert!(matches!(update, ScoreUpdate::Recorded { round_check: false, .. }));
    let result = keeper.stop_game().unwrap();
    assert_eq!(result.winner, "A");
    assert_eq!(keeper.stop_game(), Err(ValidationError::GameFinished));
}

#[test]
fn stop_is_rejected_for_lead_hold() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::default())
        .unwrap();
    assert_eq!(keeper.stop_game(), Err(ValidationError::StopNotSupported));
    assert!(keeper.history().latest().unwrap().is_in_progress());
}

#[test]
fn invalid_starts_leave_state_untouched() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    let before = keeper.snapshot();

    assert_eq!(
        keeper
            .start_game(&["Solo", "  "], "Rummikub", EndPolicy::default())
            .unwrap_err(),
        ValidationError::NotEnoughPlayers {
            required: 2,
            given: 1
        }
    );
    assert_eq!(
        keeper
            .start_game(&["A", "A"], "Rummikub", EndPolicy::default())
            .unwrap_err(),
        ValidationError::DuplicatePlayer("A".to_string())
    );
    assert_eq!(
        keeper
            .start_game(&["A", "B"], " ", EndPolicy::default())
            .unwrap_err(),
        ValidationError::NoGameSelected
    );
    assert_eq!(
        keeper
            .start_game(&["A", "B"], "Chess", EndPolicy::default())
            .unwrap_err(),
        ValidationError::UnknownGame("Chess".to_string())
    );
    assert_eq!(keeper.add_score(ANA, 3), Err(ValidationError::NoActiveGame));
    assert_eq!(keeper.reset_session(false), Err(ValidationError::ResetNotConfirmed));
    assert_eq!(keeper.snapshot(), before);

    // One player is enough for first-reach.
    assert!(
        keeper
            .start_game(&["Solo"], "Rummikub", EndPolicy::FirstReach)
            .is_ok()
    );
}

#[test]
fn text_input_and_zero_points() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    assert_eq!(
        keeper.add_score_input(ANA, "12"),
        Err(ValidationError::NoActiveGame)
    );
    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::default())
        .unwrap();
    assert_eq!(keeper.add_score_input(ANA, "abc").unwrap(), ScoreUpdate::Ignored);
    assert_eq!(keeper.add_score_input(ANA, "0").unwrap(), ScoreUpdate::Ignored);
    assert!(matches!(
        keeper.add_score_input(ANA, " -4 ").unwrap(),
        ScoreUpdate::Recorded { .. }
    ));
    assert_eq!(
        keeper.add_score(PlayerId(7), 4),
        Err(ValidationError::UnknownPlayer(7))
    );
    assert_eq!(keeper.active().unwrap().ledger().score(ANA), Some(-4));
    assert_eq!(keeper.history().latest().unwrap().point_log.len(), 1);
}

#[test]
fn restarting_leaves_previous_game_incomplete() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::default())
        .unwrap();
    keeper.add_score(ANA, 20).unwrap();
    let prefill = keeper.start_new_game();
    assert_eq!(prefill, ["A", "B"]);
    assert!(keeper.active().is_none());

    keeper
        .start_game(&["C", "D"], "Rummikub", EndPolicy::default())
        .unwrap();
    let view = keeper.history_view();
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[1].winner, "Incomplete");
    assert_eq!(view.entries[1].point_log.len(), 1);
    assert!(view.entries[0].point_log.is_empty());
    assert_eq!(keeper.last_players(), ["C", "D"]);
}

#[test]
fn catalog_management_and_deleted_games_keep_history() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    let uno = keeper.add_game(" Uno ", 500).unwrap();
    assert_eq!(uno.name, "Uno");
    assert_eq!(
        keeper.add_game("Uno", 10),
        Err(ValidationError::DuplicateGame("Uno".to_string()))
    );
    assert_eq!(
        keeper.add_game("Hearts", 0),
        Err(ValidationError::NonPositiveWinningScore(0))
    );

    keeper
        .start_game(&["A"], "Uno", EndPolicy::FirstReach)
        .unwrap();
    keeper.add_score(ANA, 500).unwrap();
    keeper.confirm_round_check(true).unwrap();

    assert!(keeper.delete_game("Uno").is_some());
    assert!(keeper.delete_game("Uno").is_none());
    assert!(keeper.catalog().get("Uno").is_none());
    assert_eq!(keeper.history().latest().unwrap().game, "Uno");
    assert_eq!(keeper.rankings().games[0].game, "Uno");

    keeper.reset_session(true).unwrap();
    assert!(keeper.rankings().games.is_empty());
    assert_eq!(keeper.history().len(), 1);
}

#[test]
fn out_of_range_total_is_rejected_and_not_logged() {
    let clock = ManualClock::default();
    let mut keeper = keeper(&clock);
    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::FirstReach)
        .unwrap();
    keeper.add_score(BEN, i64::MIN + 1).unwrap();
    assert_eq!(
        keeper.add_score(BEN, -2),
        Err(ValidationError::ScoreOutOfRange(1))
    );

    let session = keeper.active().unwrap();
    assert_eq!(session.ledger().score(BEN), Some(i64::MIN + 1));
    assert_eq!(session.ledger().log().len(), 1);
    assert_eq!(keeper.history().latest().unwrap().point_log.len(), 1);
}

#[test]
fn stored_games_with_bad_targets_are_not_playable() {
    let storage = MemoryStorage::with_blob(
        r#"{"games":[{"name":"Broken","winningScore":0},{"name":"Rummikub","winningScore":100}]}"#,
    );
    let clock = ManualClock::default();
    let mut keeper = ScoreKeeper::load(storage, &clock);
    assert!(keeper.catalog().get("Broken").is_none());
    assert_eq!(
        keeper
            .start_game(&["A", "B"], "Broken", EndPolicy::default())
            .unwrap_err(),
        ValidationError::UnknownGame("Broken".to_string())
    );

    keeper
        .start_game(&["A", "B"], "Rummikub", EndPolicy::default())
        .unwrap();
    let update = keeper.add_score(ANA, -5).unwrap();
    assert!(matches!(update, ScoreUpdate::Recorded { round_check: false, .. }));
}
