//! Seeded random playthroughs driven through the public `ScoreKeeper` API.
use anyhow::{Context, Result, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tallyking_game::{
    EndPolicy, ManualClock, MemoryStorage, PlayerId, RoundPhase, ScoreKeeper, ScoreUpdate,
};

const START_MS: i64 = 1_700_000_000_000;
const MAX_PLAYERS: usize = 6;
const STOP_CHANCE: f64 = 0.02;
const FINISHED_CHANCE: f64 = 0.75;

#[derive(Debug, Clone, Copy)]
pub struct SimulationPlan {
    pub game: &'static str,
    pub winning_score: i64,
    pub policy: EndPolicy,
    pub max_steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaythroughSummary {
    pub seed: u64,
    pub policy: &'static str,
    pub players: Vec<String>,
    pub steps: usize,
    pub round_checks: usize,
    pub stopped_early: bool,
    pub winner: Option<String>,
    pub final_scores: Vec<(String, i64)>,
}

impl PlaythroughSummary {
    #[must_use]
    pub fn decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// Play one game from `seed`, checking ledger and history invariants after
/// every step.
///
/// # Errors
///
/// Returns the first broken invariant or an unexpected validation error.
pub fn simulate(plan: &SimulationPlan, seed: u64) -> Result<PlaythroughSummary> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let clock = ManualClock::starting_at(START_MS);
    let mut keeper = ScoreKeeper::load(MemoryStorage::default(), &clock);
    if keeper.catalog().get(plan.game).is_none() {
        keeper.add_game(plan.game, plan.winning_score)?;
    }

    let count = rng.gen_range(plan.policy.min_players().max(2)..=MAX_PLAYERS);
    let players: Vec<String> = (0..count).map(|i| format!("Player {}", i + 1)).collect();
    keeper.start_game(&players, plan.game, plan.policy)?;
    let seats = u32::try_from(count)?;

    let mut summary = PlaythroughSummary {
        seed,
        policy: plan.policy.label(),
        players: players.clone(),
        steps: 0,
        round_checks: 0,
        stopped_early: false,
        winner: None,
        final_scores: Vec::new(),
    };

    for step in 0..plan.max_steps {
        clock.advance_ms(rng.gen_range(5_000..90_000));
        let phase = keeper.active().context("session vanished mid-game")?.phase();
        match phase {
            RoundPhase::WinnerDeclared => break,
            RoundPhase::AwaitingConfirmation => {
                summary.round_checks += 1;
                let report = keeper.confirm_round_check(rng.gen_bool(FINISHED_CHANCE))?;
                if let Some(result) = report.result {
                    summary.winner = Some(result.winner);
                }
            }
            RoundPhase::Normal if plan.policy.allows_early_stop() && rng.gen_bool(STOP_CHANCE) => {
                let result = keeper.stop_game()?;
                summary.stopped_early = true;
                summary.winner = Some(result.winner);
            }
            RoundPhase::Normal => {
                let who = PlayerId(rng.gen_range(0..seats));
                let points = rng.gen_range(-10..=40);
                if let ScoreUpdate::Recorded { entry, .. } = keeper.add_score(who, points)? {
                    ensure!(
                        entry.player_id == Some(who),
                        "log entry credited {:?} instead of {who}",
                        entry.player_id
                    );
                }
            }
        }
        summary.steps = step + 1;
        check_ledger(&keeper)?;
    }

    let session = keeper.active().context("session vanished after play")?;
    summary.final_scores = session
        .ledger()
        .totals()
        .map(|(p, s)| (p.name.clone(), s))
        .collect();
    check_outcome(&keeper, plan, &summary)?;
    if summary.decided() {
        log::debug!(
            "seed {seed}: {} won after {} steps and {} round checks",
            summary.winner.as_deref().unwrap_or_default(),
            summary.steps,
            summary.round_checks
        );
    } else {
        log::debug!("seed {seed}: undecided after {} steps", summary.steps);
    }
    Ok(summary)
}

fn check_ledger<S, C>(keeper: &ScoreKeeper<S, C>) -> Result<()>
where
    S: tallyking_game::StateStorage,
    C: tallyking_game::Clock,
{
    let session = keeper.active().context("no active session")?;
    let ledger = session.ledger();
    for (player, total) in ledger.totals() {
        let logged: i64 = ledger
            .log()
            .iter()
            .filter(|e| e.player_id == Some(player.id))
            .map(|e| e.points_added)
            .sum();
        ensure!(
            total == logged,
            "{} shows {total} but the log sums to {logged}",
            player.name
        );
    }
    let latest = keeper.history().latest().context("history is empty")?;
    ensure!(
        latest.point_log.as_slice() == ledger.log(),
        "history point log drifted from the ledger"
    );
    Ok(())
}

fn check_outcome<S, C>(
    keeper: &ScoreKeeper<S, C>,
    plan: &SimulationPlan,
    summary: &PlaythroughSummary,
) -> Result<()>
where
    S: tallyking_game::StateStorage,
    C: tallyking_game::Clock,
{
    let latest = keeper.history().latest().context("history is empty")?;
    let Some(winner) = &summary.winner else {
        ensure!(latest.is_in_progress(), "undecided game has an end time");
        ensure!(keeper.stats().is_empty(), "undecided game touched the standings");
        return Ok(());
    };

    ensure!(
        latest.winner.as_ref() == Some(winner),
        "history winner {:?} does not match {winner}",
        latest.winner
    );
    ensure!(latest.duration.is_some(), "finished game has no duration");

    let top = summary
        .final_scores
        .iter()
        .map(|(_, s)| *s)
        .max()
        .context("no scores")?;
    let winner_score = summary
        .final_scores
        .iter()
        .find(|(name, _)| name == winner)
        .map(|(_, s)| *s)
        .context("winner is not on the roster")?;
    ensure!(
        winner_score == top,
        "{winner} won with {winner_score} but the top score was {top}"
    );
    if !summary.stopped_early {
        ensure!(
            winner_score >= plan.winning_score,
            "{winner} won below the target with {winner_score}"
        );
    }

    if plan.policy.tracks_session_stats() {
        let recorded = keeper
            .stats()
            .record(plan.game)
            .context("first-reach result missing from standings")?
            .results_recorded();
        ensure!(
            recorded as usize == summary.players.len(),
            "standings recorded {recorded} results for {} players",
            summary.players.len()
        );
    } else {
        ensure!(keeper.stats().is_empty(), "lead-hold result reached the standings");
    }
    Ok(())
}
