//! Append-only record of played games
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{INCOMPLETE_LABEL, IN_PROGRESS_LABEL, MS_PER_MINUTE, MS_PER_SECOND};
use crate::error::DurationParseError;
use crate::ledger::PointLogEntry;

/// Elapsed play time, shown as `"{minutes}m {seconds}s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDuration {
    pub minutes: i64,
    pub seconds: u32,
}

impl GameDuration {
    /// Whole minutes (floored) plus the remainder rounded to the nearest
    /// second. Negative spans count as zero.
    #[must_use]
    pub fn between(start_ms: i64, end_ms: i64) -> Self {
        let elapsed = end_ms.saturating_sub(start_ms).max(0);
        let minutes = elapsed / MS_PER_MINUTE;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let seconds = ((elapsed % MS_PER_MINUTE) as f64 / MS_PER_SECOND).round() as u32;
        Self { minutes, seconds }
    }
}

impl fmt::Display for GameDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

impl FromStr for GameDuration {
    type Err = DurationParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let unrecognized = || DurationParseError(label.to_string());
        let (minutes, seconds) = label
            .trim()
            .strip_suffix('s')
            .and_then(|rest| rest.split_once("m "))
            .ok_or_else(unrecognized)?;
        Ok(Self {
            minutes: minutes.trim().parse().map_err(|_| unrecognized())?,
            seconds: seconds.trim().parse().map_err(|_| unrecognized())?,
        })
    }
}

/// Durations are stored as their display label (`"2m 5s"`, or
/// `"In Progress"` while unfinished). Older `{minutes, seconds}` objects and
/// `null` are still read.
mod duration_label {
    use super::{Deserialize, Deserializer, GameDuration, IN_PROGRESS_LABEL, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Label(String),
        Parts(GameDuration),
    }

    pub fn serialize<S>(duration: &Option<GameDuration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.collect_str(duration),
            None => serializer.serialize_str(IN_PROGRESS_LABEL),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<GameDuration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Stored>::deserialize(deserializer)? {
            Some(Stored::Label(label)) => label.parse().ok(),
            Some(Stored::Parts(parts)) => Some(parts),
            None => None,
        })
    }
}

/// One game as it was played. Mutable only while in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub game: String,
    pub players: Vec<String>,
    pub start_time: i64,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default, with = "duration_label")]
    pub duration: Option<GameDuration>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub point_log: Vec<PointLogEntry>,
}

impl HistoryEntry {
    /// A freshly started game.
    #[must_use]
    pub fn in_progress(game: &str, players: Vec<String>, start_time: i64) -> Self {
        Self {
            game: game.to_string(),
            players,
            start_time,
            end_time: None,
            duration: None,
            winner: None,
            point_log: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    #[must_use]
    pub fn winner_label(&self) -> &str {
        self.winner.as_deref().unwrap_or(INCOMPLETE_LABEL)
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        self.duration
            .map_or_else(|| IN_PROGRESS_LABEL.to_string(), |d| d.to_string())
    }
}

/// Every game ever started, oldest first. Nothing is evicted.
///
/// The stored form lists the newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl Serialize for HistoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.newest_first())
    }
}

impl<'de> Deserialize<'de> for HistoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut entries = Vec::<HistoryEntry>::deserialize(deserializer)?;
        entries.reverse();
        Ok(Self { entries })
    }
}

impl HistoryStore {
    #[must_use]
    pub const fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Mirror a score change into the latest entry. Ignored once that entry
    /// is finalized.
    pub fn log_point(&mut self, point: PointLogEntry) -> bool {
        match self.entries.last_mut() {
            Some(entry) if entry.is_in_progress() => {
                entry.point_log.push(point);
                true
            }
            _ => false,
        }
    }

    /// Close the latest entry. A second call, or a call when the latest entry
    /// is already closed, changes nothing and returns `false`.
    pub fn finalize(&mut self, end_time: i64, winner: &str) -> bool {
        let Some(entry) = self.entries.last_mut() else {
            return false;
        };
        if !entry.is_in_progress() {
            log::debug!("history entry for {} already finalized", entry.game);
            return false;
        }
        entry.end_time = Some(end_time);
        entry.winner = Some(winner.to_string());
        entry.duration = Some(GameDuration::between(entry.start_time, end_time));
        true
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent first, the way the history screen lists them.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
