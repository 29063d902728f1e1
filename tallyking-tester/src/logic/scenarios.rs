//! Named QA scenarios selectable from the command line.
use anyhow::{Context, Result, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tallyking_game::{
    EndPolicy, ManualClock, MemoryStorage, PersistedState, PlayerId, STORAGE_KEY, ScoreKeeper,
    StateStorage,
};

use super::simulation::{SimulationPlan, simulate};

#[derive(Debug, Clone, Copy)]
pub enum ScenarioKind {
    /// Random playthrough with invariant checks after every step.
    Playthrough(SimulationPlan),
    /// Targeted check seeded per iteration.
    Check(fn(u64) -> Result<()>),
}

#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub kind: ScenarioKind,
}

impl TestScenario {
    /// # Errors
    ///
    /// Returns the failure reported by the playthrough or check.
    pub fn run(&self, seed: u64) -> Result<()> {
        match self.kind {
            ScenarioKind::Playthrough(plan) => simulate(&plan, seed).map(|_| ()),
            ScenarioKind::Check(check) => check(seed),
        }
    }
}

const SCENARIOS: &[TestScenario] = &[
    TestScenario {
        key: "smoke",
        description: "Start a first-reach game, score once, stop it",
        kind: ScenarioKind::Check(smoke),
    },
    TestScenario {
        key: "lead-hold",
        description: "Random Rummikub playthrough, lead held for two rounds",
        kind: ScenarioKind::Playthrough(SimulationPlan {
            game: "Rummikub",
            winning_score: 100,
            policy: EndPolicy::LeadHold { rounds_to_win: 2 },
            max_steps: 400,
        }),
    },
    TestScenario {
        key: "lead-hold-long",
        description: "Random playthrough to 300 with a three-round hold",
        kind: ScenarioKind::Playthrough(SimulationPlan {
            game: "Phase 10",
            winning_score: 300,
            policy: EndPolicy::LeadHold { rounds_to_win: 3 },
            max_steps: 1_000,
        }),
    },
    TestScenario {
        key: "first-reach",
        description: "Random playthrough where the first to the target wins",
        kind: ScenarioKind::Playthrough(SimulationPlan {
            game: "Rummikub",
            winning_score: 100,
            policy: EndPolicy::FirstReach,
            max_steps: 400,
        }),
    },
    TestScenario {
        key: "catalog",
        description: "Random add/delete churn on the game catalog",
        kind: ScenarioKind::Check(catalog_churn),
    },
    TestScenario {
        key: "persistence",
        description: "Reload after play and recover from corrupt storage",
        kind: ScenarioKind::Check(persistence),
    },
];

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    SCENARIOS.iter().find(|s| s.key == key).copied()
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description)).collect()
}

#[must_use]
pub fn all_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

fn smoke(seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let clock = ManualClock::starting_at(0);
    let mut keeper = ScoreKeeper::load(MemoryStorage::default(), &clock);
    keeper.start_game(&["Ana", "Ben"], "Rummikub", EndPolicy::FirstReach)?;
    let who = PlayerId(rng.gen_range(0..2));
    keeper.add_score(who, rng.gen_range(1..=99))?;
    clock.advance_ms(rng.gen_range(1_000..600_000));
    let result = keeper.stop_game()?;
    ensure!(result.winner_id == Some(who), "stop picked {:?}", result.winner_id);
    ensure!(keeper.history().len() == 1, "expected one history entry");
    ensure!(
        keeper.rankings().king.wins == 1,
        "winner not credited in standings"
    );
    Ok(())
}

fn catalog_churn(seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keeper = ScoreKeeper::load(MemoryStorage::default(), ManualClock::default());
    let mut expected = vec!["Rummikub".to_string()];

    for _ in 0..50 {
        let name = format!("Game {}", rng.gen_range(0..12));
        if rng.gen_bool(0.6) {
            let target = rng.gen_range(-5..=500);
            match keeper.add_game(&name, target) {
                Ok(def) => {
                    ensure!(target > 0, "accepted winning score {target}");
                    ensure!(!expected.contains(&def.name), "accepted duplicate {name}");
                    expected.push(def.name);
                }
                Err(err) => log::debug!("rejected {name}/{target}: {err}"),
            }
        } else {
            let removed = keeper.delete_game(&name).is_some();
            let was_listed = expected.contains(&name);
            ensure!(removed == was_listed, "delete of {name} returned {removed}");
            expected.retain(|g| g != &name);
        }
        let names: Vec<_> = keeper.catalog().iter().map(|g| g.name.clone()).collect();
        ensure!(names == expected, "catalog {names:?} expected {expected:?}");
    }
    Ok(())
}

fn persistence(seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let storage = MemoryStorage::default();
    let clock = ManualClock::starting_at(1_000);
    let mut keeper = ScoreKeeper::load(storage.clone(), &clock);
    for round in 0..rng.gen_range(1..5) {
        keeper.start_game(&["Ana", "Ben", "Cy"], "Rummikub", EndPolicy::FirstReach)?;
        let who = PlayerId(rng.gen_range(0..3));
        keeper.add_score(who, 100 + round)?;
        clock.advance_ms(rng.gen_range(1_000..120_000));
        keeper.confirm_round_check(true)?;
        keeper.start_new_game();
    }
    let before = keeper.snapshot();

    let reloaded = ScoreKeeper::load(storage.clone(), &clock);
    ensure!(reloaded.snapshot() == before, "state changed across reload");

    storage
        .save_blob(STORAGE_KEY, "{\"games\": oops")
        .context("overwrite blob")?;
    let recovered = ScoreKeeper::load(storage.clone(), &clock);
    let defaults = PersistedState::default();
    ensure!(
        recovered.catalog().as_slice() == defaults.games.as_slice(),
        "corrupt storage did not reseed the catalog"
    );
    ensure!(
        recovered.history().is_empty() && recovered.stats().is_empty(),
        "corrupt storage left history or standings behind"
    );
    Ok(())
}
