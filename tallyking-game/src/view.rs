//! Render-ready snapshots handed to the presentation layer
use serde::{Deserialize, Serialize};

use crate::history::{HistoryEntry, HistoryStore};
use crate::ledger::PlayerId;
use crate::round::{EndPolicy, RoundPhase};
use crate::session::ActiveSession;
use crate::stats::{GameStandings, Leadership, SessionStats};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreView {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardView {
    pub game: String,
    pub winning_score: u32,
    pub headline: String,
    pub policy: EndPolicy,
    pub phase: RoundPhase,
    pub players: Vec<PlayerScoreView>,
    pub potential_winner: Option<PlayerId>,
    pub consecutive_win_rounds: u32,
    pub winner: Option<String>,
}

impl ScoreboardView {
    #[must_use]
    pub fn from_session(session: &ActiveSession) -> Self {
        let winner_id = session.result().and_then(|r| r.winner_id);
        let players = session
            .ledger()
            .totals()
            .map(|(player, score)| PlayerScoreView {
                id: player.id,
                name: player.name.clone(),
                score,
                is_winner: winner_id == Some(player.id),
            })
            .collect();
        let round = session.round().state();
        Self {
            game: session.game().name.clone(),
            winning_score: session.game().winning_score,
            headline: format!("First to {} wins!", session.game().winning_score),
            policy: session.policy(),
            phase: session.phase(),
            players,
            potential_winner: round.potential_winner,
            consecutive_win_rounds: round.consecutive_win_rounds,
            winner: session.result().map(|r| r.winner.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointLineView {
    pub player: String,
    pub points_added: i64,
    pub new_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemView {
    pub game: String,
    pub winner: String,
    pub started_on: String,
    pub duration: String,
    pub players: Vec<String>,
    pub point_log: Vec<PointLineView>,
}

impl HistoryItemView {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            game: entry.game.clone(),
            winner: entry.winner_label().to_string(),
            started_on: format_date(entry.start_time),
            duration: entry.duration_label(),
            players: entry.players.clone(),
            point_log: entry
                .point_log
                .iter()
                .map(|line| PointLineView {
                    player: line.player.clone(),
                    points_added: line.points_added,
                    new_score: line.new_score,
                })
                .collect(),
        }
    }
}

/// Past games, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    pub entries: Vec<HistoryItemView>,
}

impl HistoryView {
    #[must_use]
    pub fn from_store(store: &HistoryStore) -> Self {
        Self {
            entries: store.newest_first().map(HistoryItemView::from_entry).collect(),
        }
    }
}

/// Session king plus a duke table per game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingsView {
    pub king: Leadership,
    pub games: Vec<GameStandings>,
}

impl RankingsView {
    #[must_use]
    pub fn from_stats(stats: &SessionStats) -> Self {
        Self {
            king: stats.overall_leader(),
            games: stats.all_game_leaders(),
        }
    }
}

fn format_date(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string())
}
