//! Session-wide win/loss standings ("king of the hill")
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wins and losses per player for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub wins: BTreeMap<String, u32>,
    #[serde(default)]
    pub losses: BTreeMap<String, u32>,
}

impl GameRecord {
    #[must_use]
    pub fn results_recorded(&self) -> u32 {
        self.wins.values().sum::<u32>() + self.losses.values().sum::<u32>()
    }
}

/// One player's line in a standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player: String,
    pub wins: u32,
    pub losses: u32,
}

/// Everyone tied at the top win count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leadership {
    pub players: Vec<String>,
    pub wins: u32,
}

/// Leader(s) of a single game plus every involved player's record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStandings {
    pub game: String,
    pub leaders: Leadership,
    pub records: Vec<PlayerRecord>,
}

/// Results accumulated over a session, keyed by game name then player name.
/// Counts only grow until [`SessionStats::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionStats {
    games: BTreeMap<String, GameRecord>,
}

impl SessionStats {
    /// Credit one finished game: a win for `winner`, a loss for everyone else
    /// in `players`. Call exactly once per finished game.
    pub fn record_result(&mut self, game: &str, winner: &str, players: &[String]) {
        let record = self.games.entry(game.to_string()).or_default();
        *record.wins.entry(winner.to_string()).or_insert(0) += 1;
        for player in players.iter().filter(|p| p.as_str() != winner) {
            *record.losses.entry(player.clone()).or_insert(0) += 1;
        }
    }

    /// The session king(s): most wins summed across all games.
    #[must_use]
    pub fn overall_leader(&self) -> Leadership {
        let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
        for record in self.games.values() {
            for (player, wins) in &record.wins {
                *totals.entry(player.as_str()).or_insert(0) += wins;
            }
        }
        leadership(totals)
    }

    /// The duke(s) of one game and the full table for it.
    #[must_use]
    pub fn game_leader(&self, game: &str) -> GameStandings {
        let Some(record) = self.games.get(game) else {
            return GameStandings {
                game: game.to_string(),
                ..GameStandings::default()
            };
        };

        let leaders = leadership(
            record
                .wins
                .iter()
                .map(|(player, wins)| (player.as_str(), *wins))
                .collect(),
        );

        let mut records: Vec<PlayerRecord> = record
            .wins
            .keys()
            .chain(record.losses.keys())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|player| PlayerRecord {
                player: player.clone(),
                wins: record.wins.get(player).copied().unwrap_or(0),
                losses: record.losses.get(player).copied().unwrap_or(0),
            })
            .collect();
        records.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(a.losses.cmp(&b.losses))
                .then_with(|| a.player.cmp(&b.player))
        });

        GameStandings {
            game: game.to_string(),
            leaders,
            records,
        }
    }

    /// Standings for every game with recorded results, by game name.
    #[must_use]
    pub fn all_game_leaders(&self) -> Vec<GameStandings> {
        self.games.keys().map(|game| self.game_leader(game)).collect()
    }

    #[must_use]
    pub fn record(&self, game: &str) -> Option<&GameRecord> {
        self.games.get(game)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Forget everything. Irreversible.
    pub fn reset(&mut self) {
        self.games.clear();
    }
}

fn leadership(totals: BTreeMap<&str, u32>) -> Leadership {
    let wins = totals.values().copied().max().unwrap_or(0);
    if wins == 0 {
        return Leadership::default();
    }
    let players = totals
        .into_iter()
        .filter(|(_, count)| *count == wins)
        .map(|(player, _)| player.to_string())
        .collect();
    Leadership { players, wins }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn record_result_counts_one_win_and_rest_losses() {
        let mut stats = SessionStats::default();
        stats.record_result("Uno", "A", &roster(&["A", "B", "C"]));
        let record = stats.record("Uno").unwrap();
        assert_eq!(record.wins.values().sum::<u32>(), 1);
        assert_eq!(record.losses.values().sum::<u32>(), 2);
        assert_eq!(record.losses.get("A"), None);
        assert_eq!(record.results_recorded(), 3);
    }

    #[test]
    fn overall_leader_sums_across_games() {
        let mut stats = SessionStats::default();
        let players = roster(&["A", "B"]);
        stats.record_result("G1", "A", &players);
        stats.record_result("G2", "A", &players);
        stats.record_result("G3", "B", &players);
        assert_eq!(
            stats.overall_leader(),
            Leadership {
                players: vec!["A".to_string()],
                wins: 2
            }
        );
    }

    #[test]
    fn overall_leader_reports_ties_and_empty() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.overall_leader(), Leadership::default());
        let players = roster(&["A", "B"]);
        stats.record_result("G1", "A", &players);
        stats.record_result("G1", "B", &players);
        assert_eq!(stats.overall_leader().players, roster(&["A", "B"]));
    }

    #[test]
    fn game_leader_sorts_records_by_wins() {
        let mut stats = SessionStats::default();
        let players = roster(&["A", "B", "C"]);
        stats.record_result("Uno", "B", &players);
        stats.record_result("Uno", "B", &players);
        stats.record_result("Uno", "C", &players);
        stats.record_result("Hearts", "A", &players);

        let standings = stats.game_leader("Uno");
        assert_eq!(standings.leaders.players, roster(&["B"]));
        assert_eq!(standings.leaders.wins, 2);
        let order: Vec<_> = standings.records.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(standings.records[2].losses, 3);

        assert!(stats.game_leader("Skip-Bo").records.is_empty());
        assert_eq!(stats.all_game_leaders().len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = SessionStats::default();
        stats.record_result("Uno", "A", &roster(&["A", "B"]));
        stats.reset();
        assert!(stats.is_empty());
    }

    #[test]
    fn serializes_as_game_keyed_map() {
        let mut stats = SessionStats::default();
        stats.record_result("Uno", "A", &roster(&["A", "B"]));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Uno": {"wins": {"A": 1}, "losses": {"B": 1}}})
        );
    }
}
