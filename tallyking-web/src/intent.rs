//! User intents emitted by the page and the responses rendered back
use serde::{Deserialize, Serialize};
use tallyking_game::{
    Clock, EndPolicy, GameDefinition, GameResult, HistoryView, PlayerId, RankingsView,
    RoundReport, ScoreKeeper, ScoreUpdate, ScoreboardView, StateStorage, ValidationError,
};

/// Points as typed by the user: a number, raw field text, or anything else
/// (which is ignored).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointsInput {
    Whole(i64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    #[serde(rename_all = "camelCase")]
    StartGame {
        players: Vec<String>,
        #[serde(default)]
        game: String,
        #[serde(default)]
        policy: EndPolicy,
    },
    #[serde(rename_all = "camelCase")]
    AddScore { player: PlayerId, points: PointsInput },
    #[serde(rename_all = "camelCase")]
    ConfirmRoundCheck { finished: bool },
    StopGame,
    #[serde(rename_all = "camelCase")]
    AddGame { name: String, winning_score: i64 },
    #[serde(rename_all = "camelCase")]
    DeleteGame { name: String },
    ViewHistory,
    ViewRankings,
    ViewScoreboard,
    #[serde(rename_all = "camelCase")]
    ResetSession { confirmed: bool },
    StartNewGame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    Scoreboard {
        scoreboard: Option<ScoreboardView>,
    },
    #[serde(rename_all = "camelCase")]
    Score {
        update: ScoreUpdate,
        scoreboard: Option<ScoreboardView>,
    },
    #[serde(rename_all = "camelCase")]
    Round {
        report: RoundReport,
        scoreboard: Option<ScoreboardView>,
    },
    #[serde(rename_all = "camelCase")]
    Finished {
        result: GameResult,
        scoreboard: Option<ScoreboardView>,
    },
    #[serde(rename_all = "camelCase")]
    Games { games: Vec<GameDefinition> },
    History(HistoryView),
    Rankings(RankingsView),
    #[serde(rename_all = "camelCase")]
    Setup {
        last_players: Vec<String>,
        games: Vec<GameDefinition>,
    },
}

/// Apply one intent to the engine.
///
/// # Errors
///
/// Returns the engine's validation error; nothing is changed in that case.
pub fn dispatch<S, C>(
    keeper: &mut ScoreKeeper<S, C>,
    intent: Intent,
) -> Result<Response, ValidationError>
where
    S: StateStorage,
    C: Clock,
{
    let response = match intent {
        Intent::StartGame {
            players,
            game,
            policy,
        } => {
            keeper.start_game(&players, &game, policy)?;
            Response::Scoreboard {
                scoreboard: keeper.scoreboard(),
            }
        }
        Intent::AddScore { player, points } => {
            let update = match points {
                PointsInput::Whole(points) => keeper.add_score(player, points)?,
                PointsInput::Text(text) => keeper.add_score_input(player, &text)?,
                PointsInput::Other(_) if keeper.active().is_none() => {
                    return Err(ValidationError::NoActiveGame);
                }
                PointsInput::Other(_) => ScoreUpdate::Ignored,
            };
            Response::Score {
                update,
                scoreboard: keeper.scoreboard(),
            }
        }
        Intent::ConfirmRoundCheck { finished } => {
            let report = keeper.confirm_round_check(finished)?;
            Response::Round {
                report,
                scoreboard: keeper.scoreboard(),
            }
        }
        Intent::StopGame => {
            let result = keeper.stop_game()?;
            Response::Finished {
                result,
                scoreboard: keeper.scoreboard(),
            }
        }
        Intent::AddGame { name, winning_score } => {
            keeper.add_game(&name, winning_score)?;
            games(keeper)
        }
        Intent::DeleteGame { name } => {
            if keeper.delete_game(&name).is_none() {
                log::warn!("delete requested for unknown game '{name}'");
            }
            games(keeper)
        }
        Intent::ViewHistory => Response::History(keeper.history_view()),
        Intent::ViewRankings => Response::Rankings(keeper.rankings()),
        Intent::ViewScoreboard => Response::Scoreboard {
            scoreboard: keeper.scoreboard(),
        },
        Intent::ResetSession { confirmed } => {
            keeper.reset_session(confirmed)?;
            Response::Rankings(keeper.rankings())
        }
        Intent::StartNewGame => Response::Setup {
            last_players: keeper.start_new_game(),
            games: keeper.catalog().as_slice().to_vec(),
        },
    };
    Ok(response)
}

fn games<S: StateStorage, C: Clock>(keeper: &ScoreKeeper<S, C>) -> Response {
    Response::Games {
        games: keeper.catalog().as_slice().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallyking_game::{ManualClock, MemoryStorage};

    fn parse(json: &str) -> Intent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn intents_parse_from_page_json() {
        assert_eq!(
            parse(r#"{"type":"startGame","players":["A","B"],"game":"Rummikub"}"#),
            Intent::StartGame {
                players: vec!["A".into(), "B".into()],
                game: "Rummikub".into(),
                policy: EndPolicy::default(),
            }
        );
        assert_eq!(
            parse(r#"{"type":"addScore","player":1,"points":"12"}"#),
            Intent::AddScore {
                player: PlayerId(1),
                points: PointsInput::Text("12".into()),
            }
        );
        assert_eq!(
            parse(r#"{"type":"addScore","player":0,"points":-3}"#),
            Intent::AddScore {
                player: PlayerId(0),
                points: PointsInput::Whole(-3),
            }
        );
        assert!(matches!(
            parse(r#"{"type":"addScore","player":0,"points":2.5}"#),
            Intent::AddScore {
                points: PointsInput::Other(_),
                ..
            }
        ));
        assert_eq!(
            parse(r#"{"type":"addGame","name":"Uno","winningScore":500}"#),
            Intent::AddGame {
                name: "Uno".into(),
                winning_score: 500
            }
        );
        assert_eq!(parse(r#"{"type":"stopGame"}"#), Intent::StopGame);
    }

    #[test]
    fn dispatch_runs_a_first_reach_game() {
        let mut keeper = ScoreKeeper::load(MemoryStorage::default(), ManualClock::default());
        let started = dispatch(
            &mut keeper,
            parse(r#"{"type":"startGame","players":["A","B"],"game":"Rummikub","policy":{"kind":"firstReach"}}"#),
        )
        .unwrap();
        assert!(matches!(started, Response::Scoreboard { scoreboard: Some(_) }));

        let fractional = dispatch(
            &mut keeper,
            parse(r#"{"type":"addScore","player":1,"points":1.5}"#),
        )
        .unwrap();
        assert!(matches!(
            fractional,
            Response::Score {
                update: ScoreUpdate::Ignored,
                ..
            }
        ));

        dispatch(
            &mut keeper,
            parse(r#"{"type":"addScore","player":1,"points":"40"}"#),
        )
        .unwrap();
        let Response::Finished { result, scoreboard } =
            dispatch(&mut keeper, parse(r#"{"type":"stopGame"}"#)).unwrap()
        else {
            panic!("expected finished response");
        };
        assert_eq!(result.winner, "B");
        assert!(scoreboard.unwrap().players[1].is_winner);

        let Response::Setup { last_players, games } =
            dispatch(&mut keeper, parse(r#"{"type":"startNewGame"}"#)).unwrap()
        else {
            panic!("expected setup response");
        };
        assert_eq!(last_players, ["A", "B"]);
        assert_eq!(games.len(), 1);

        let Response::Rankings(rankings) =
            dispatch(&mut keeper, parse(r#"{"type":"viewRankings"}"#)).unwrap()
        else {
            panic!("expected rankings");
        };
        assert_eq!(rankings.king.players, vec!["B".to_string()]);
    }

    #[test]
    fn dispatch_surfaces_validation_errors() {
        let mut keeper = ScoreKeeper::load(MemoryStorage::default(), ManualClock::default());
        assert_eq!(
            dispatch(
                &mut keeper,
                parse(r#"{"type":"startGame","players":["A"],"game":"Rummikub"}"#)
            ),
            Err(ValidationError::NotEnoughPlayers {
                required: 2,
                given: 1
            })
        );
        assert_eq!(
            dispatch(
                &mut keeper,
                parse(r#"{"type":"addScore","player":0,"points":null}"#)
            ),
            Err(ValidationError::NoActiveGame)
        );
        assert_eq!(
            dispatch(&mut keeper, parse(r#"{"type":"resetSession","confirmed":false}"#)),
            Err(ValidationError::ResetNotConfirmed)
        );
        let Response::Games { games } = dispatch(
            &mut keeper,
            parse(r#"{"type":"deleteGame","name":"Rummikub"}"#),
        )
        .unwrap() else {
            panic!("expected games");
        };
        assert!(games.is_empty());
    }

    #[test]
    fn responses_serialize_with_type_tag() {
        let json = serde_json::to_value(Response::Games { games: Vec::new() }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "games", "games": []}));
        let json = serde_json::to_value(Response::History(HistoryView::default())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "history", "entries": []}));
    }
}
