//! Named game definitions and their winning scores
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GAME_NAME, DEFAULT_WINNING_SCORE};
use crate::error::ValidationError;

/// A playable game and the score that ends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    pub name: String,
    pub winning_score: u32,
}

impl GameDefinition {
    /// Validate and build a definition from raw user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is empty or the score is not positive.
    pub fn new(name: &str, winning_score: i64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGameName);
        }
        let winning_score = u32::try_from(winning_score)
            .ok()
            .filter(|score| *score > 0)
            .ok_or(ValidationError::NonPositiveWinningScore(winning_score))?;
        Ok(Self {
            name: name.to_string(),
            winning_score,
        })
    }

    /// Whether `score` reaches this game's target.
    #[must_use]
    pub fn is_reached_by(&self, score: i64) -> bool {
        score >= i64::from(self.winning_score)
    }
}

/// Ordered collection of game definitions with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCatalog {
    games: Vec<GameDefinition>,
}

impl GameCatalog {
    /// Catalog holding only the built-in definition.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            games: vec![GameDefinition {
                name: DEFAULT_GAME_NAME.to_string(),
                winning_score: DEFAULT_WINNING_SCORE,
            }],
        }
    }

    /// Build from persisted definitions. Entries that would be rejected by
    /// [`GameDefinition::new`] and later duplicates by name are dropped.
    #[must_use]
    pub fn from_definitions(definitions: Vec<GameDefinition>) -> Self {
        let mut catalog = Self::default();
        for stored in definitions {
            let definition =
                match GameDefinition::new(&stored.name, i64::from(stored.winning_score)) {
                    Ok(definition) => definition,
                    Err(err) => {
                        log::warn!("dropping invalid game definition '{}': {err}", stored.name);
                        continue;
                    }
                };
            if catalog.get(&definition.name).is_some() {
                log::warn!("dropping duplicate game definition '{}'", definition.name);
                continue;
            }
            catalog.games.push(definition);
        }
        catalog
    }

    /// Add a new definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the name is already taken.
    pub fn add(&mut self, name: &str, winning_score: i64) -> Result<&GameDefinition, ValidationError> {
        let definition = GameDefinition::new(name, winning_score)?;
        if self.get(&definition.name).is_some() {
            return Err(ValidationError::DuplicateGame(definition.name));
        }
        self.games.push(definition);
        Ok(&self.games[self.games.len() - 1])
    }

    /// Remove a definition by name. History referencing it is untouched.
    pub fn remove(&mut self, name: &str) -> Option<GameDefinition> {
        let index = self.games.iter().position(|g| g.name == name)?;
        Some(self.games.remove(index))
    }

    /// Remove the definition at `index` in display order.
    pub fn remove_at(&mut self, index: usize) -> Option<GameDefinition> {
        (index < self.games.len()).then(|| self.games.remove(index))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GameDefinition> {
        self.games.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameDefinition> {
        self.games.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GameDefinition] {
        &self.games
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_has_rummikub() {
        let catalog = GameCatalog::seeded();
        assert_eq!(catalog.len(), 1);
        let game = catalog.get("Rummikub").unwrap();
        assert_eq!(game.winning_score, 100);
        assert!(game.is_reached_by(100));
        assert!(!game.is_reached_by(99));
    }

    #[test]
    fn add_trims_and_rejects_bad_input() {
        let mut catalog = GameCatalog::seeded();
        let added = catalog.add("  Phase 10 ", 500).unwrap();
        assert_eq!(added.name, "Phase 10");

        assert_eq!(catalog.add("   ", 50), Err(ValidationError::EmptyGameName));
        assert_eq!(
            catalog.add("Skip-Bo", 0),
            Err(ValidationError::NonPositiveWinningScore(0))
        );
        assert_eq!(
            catalog.add("Skip-Bo", -10),
            Err(ValidationError::NonPositiveWinningScore(-10))
        );
        assert_eq!(
            catalog.add("Phase 10", 250),
            Err(ValidationError::DuplicateGame("Phase 10".to_string()))
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn remove_by_name_and_index() {
        let mut catalog = GameCatalog::seeded();
        catalog.add("Uno", 500).unwrap();
        catalog.add("Hearts", 100).unwrap();

        assert_eq!(catalog.remove("Uno").map(|g| g.winning_score), Some(500));
        assert!(catalog.remove("Uno").is_none());
        assert_eq!(catalog.remove_at(1).map(|g| g.name), Some("Hearts".to_string()));
        assert!(catalog.remove_at(7).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn persisted_duplicates_are_dropped() {
        let catalog = GameCatalog::from_definitions(vec![
            GameDefinition::new("Uno", 500).unwrap(),
            GameDefinition::new("Uno", 200).unwrap(),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Uno").unwrap().winning_score, 500);
    }

    #[test]
    fn persisted_invalid_definitions_are_dropped() {
        let stored = |name: &str, winning_score| GameDefinition {
            name: name.to_string(),
            winning_score,
        };
        let catalog = GameCatalog::from_definitions(vec![
            stored("Broken", 0),
            stored("   ", 50),
            stored("", 100),
            stored(" Uno ", 500),
            stored("Uno", 200),
        ]);
        let names: Vec<_> = catalog.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Uno"]);
        assert_eq!(catalog.get("Uno").unwrap().winning_score, 500);
        assert!(GameCatalog::from_definitions(vec![stored("Broken", 0)]).is_empty());
    }
}
