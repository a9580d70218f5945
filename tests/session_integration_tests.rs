//! Integration tests for the session state machine
//!
//! These tests verify:
//! - Session size and uniqueness for any filter combination
//! - The answer count bound across arbitrary operation sequences
//! - Complete play-throughs and their results
//! - Reset returning to the initial shape

use mapquest::catalog::Catalog;
use mapquest::models::{
    Country, Difficulty, DifficultyFilter, GameConfig, GameMode, Region, RegionFilter,
};
use mapquest::{Session, SessionError, SessionManager, SessionPhase};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use tokio_test::{assert_err, assert_ok};

fn catalog_of(specs: &[(Region, Difficulty)]) -> Catalog {
    Catalog::from_countries(specs.iter().enumerate().map(|(i, (region, difficulty))| Country {
        code: format!("K{:03}", i),
        name: format!("Country {}", i),
        full_name: format!("Republic of Country {}", i),
        region: *region,
        difficulty: *difficulty,
    }))
}

fn easy_catalog(size: usize) -> Catalog {
    catalog_of(&vec![(Region::Europe, Difficulty::Easy); size])
}

fn current_code(manager: &SessionManager) -> String {
    manager.session().current_country().unwrap().code.clone()
}

fn region_strategy() -> impl Strategy<Value = Region> {
    prop::sample::select(Region::ALL.to_vec())
}

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(vec![Difficulty::Easy, Difficulty::Medium, Difficulty::High])
}

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    (
        prop::sample::select(vec![GameMode::Classic, GameMode::Timed, GameMode::Regional]),
        prop::option::of(difficulty_strategy()),
        prop::option::of(region_strategy()),
        1usize..30,
    )
        .prop_map(|(mode, difficulty, region, question_count)| GameConfig {
            mode,
            difficulty: difficulty.map_or(DifficultyFilter::All, DifficultyFilter::from),
            region: region.map_or(RegionFilter::All, RegionFilter::from),
            question_count,
        })
}

#[derive(Debug, Clone)]
enum Op {
    Submit { correct: bool, time: f64 },
    Timeout,
    Advance,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 0.0f64..60.0).prop_map(|(correct, time)| Op::Submit { correct, time }),
        Just(Op::Timeout),
        Just(Op::Advance),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn session_size_matches_filters(
        specs in prop::collection::vec((region_strategy(), difficulty_strategy()), 0..40),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let catalog = catalog_of(&specs);
        let matching = catalog
            .iter()
            .filter(|c| config.region.matches(c.region) && config.difficulty.matches(c.difficulty))
            .count();

        let mut manager = SessionManager::default();
        let result = manager.start(config, &catalog, &mut StdRng::seed_from_u64(seed));

        let expected = config.question_count.min(matching);
        if expected == 0 {
            prop_assert!(result.is_err());
            prop_assert_eq!(manager.session().phase, SessionPhase::NotStarted);
        } else {
            prop_assert_eq!(result, Ok(expected));
            let session = manager.session();
            prop_assert_eq!(session.countries.len(), expected);

            let codes: HashSet<&str> = session.countries.iter().map(|c| c.code.as_str()).collect();
            prop_assert_eq!(codes.len(), session.countries.len());
            for country in &session.countries {
                prop_assert!(config.region.matches(country.region));
                prop_assert!(config.difficulty.matches(country.difficulty));
            }
        }
    }

    #[test]
    fn answer_count_stays_bounded(
        questions in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..40),
        seed in any::<u64>(),
    ) {
        let catalog = easy_catalog(10);
        let config = GameConfig { question_count: questions, ..GameConfig::default() };
        let mut manager = SessionManager::default();
        manager.start(config, &catalog, &mut StdRng::seed_from_u64(seed)).unwrap();

        for op in ops {
            match op {
                Op::Submit { correct, time } => {
                    let code = manager
                        .session()
                        .current_country()
                        .map(|c| if correct { c.code.clone() } else { "XX".to_string() });
                    let _ = manager.submit_answer(code, time);
                }
                Op::Timeout => {
                    let _ = manager.submit_answer(None, 30.0);
                }
                Op::Advance => {
                    let _ = manager.advance();
                }
                Op::Reset => manager.reset(),
            }

            let session = manager.session();
            if session.phase != SessionPhase::NotStarted {
                prop_assert!(session.answers.len() <= session.current_index + 1);
                prop_assert!(session.current_index < session.countries.len());
            }
            let earned: u32 = session.answers.iter().map(|a| a.points_earned).sum();
            prop_assert_eq!(session.score, earned);
        }

        manager.reset();
        prop_assert_eq!(manager.session(), &Session::new(config));
    }
}

#[test]
fn test_classic_perfect_game() {
    let catalog = easy_catalog(5);
    let config = GameConfig {
        mode: GameMode::Classic,
        difficulty: DifficultyFilter::Easy,
        region: RegionFilter::All,
        question_count: 3,
    };

    let mut manager = SessionManager::default();
    manager
        .start(config, &catalog, &mut StdRng::seed_from_u64(11))
        .unwrap();

    let codes: HashSet<String> = manager
        .session()
        .countries
        .iter()
        .map(|c| c.code.clone())
        .collect();
    assert_eq!(codes.len(), 3);

    for time in [0.0, 17.0, 400.0] {
        let code = current_code(&manager);
        manager.submit_answer(Some(code), time).unwrap();
        manager.advance().unwrap();
    }

    assert!(manager.session().is_complete());
    let results = manager.results();
    assert_eq!(results.total_score, 300);
    assert_eq!(results.correct_count, 3);
    assert_eq!(results.percentage, 100);
}

#[test]
fn test_timed_single_question_exceeds_hundred_percent() {
    let catalog = easy_catalog(1);
    let config = GameConfig {
        mode: GameMode::Timed,
        question_count: 1,
        ..GameConfig::default()
    };

    let mut manager = SessionManager::default();
    manager
        .start(config, &catalog, &mut StdRng::seed_from_u64(2))
        .unwrap();

    let code = current_code(&manager);
    let outcome = manager.submit_answer(Some(code), 21.0).unwrap();
    manager.advance().unwrap();

    assert_eq!(outcome.points_earned, 130);
    let results = manager.results();
    assert_eq!(results.total_score, 130);
    assert_eq!(results.max_possible_score, 100);
    assert_eq!(results.percentage, 130);
}

#[test]
fn test_timed_answer_at_nine_seconds() {
    let catalog = easy_catalog(1);
    let config = GameConfig {
        mode: GameMode::Timed,
        question_count: 1,
        ..GameConfig::default()
    };

    let mut manager = SessionManager::default();
    manager
        .start(config, &catalog, &mut StdRng::seed_from_u64(2))
        .unwrap();

    let code = current_code(&manager);
    let outcome = manager.submit_answer(Some(code), 9.0).unwrap();

    assert_eq!(outcome.points_earned, 170);
    assert_eq!(manager.results().percentage, 170);
}

#[test]
fn test_classic_percentage_tracks_correct_ratio() {
    let catalog = easy_catalog(6);
    let config = GameConfig {
        question_count: 6,
        ..GameConfig::default()
    };

    let mut manager = SessionManager::default();
    manager
        .start(config, &catalog, &mut StdRng::seed_from_u64(8))
        .unwrap();

    for i in 0..6 {
        let code = if i % 3 == 0 {
            current_code(&manager)
        } else {
            "XX".to_string()
        };
        manager.submit_answer(Some(code), 5.0).unwrap();
        manager.advance().unwrap();
    }

    let results = manager.results();
    let expected = (results.correct_count as f64 / results.total_count as f64 * 100.0).round() as u32;
    assert_eq!(results.correct_count, 2);
    assert_eq!(results.percentage, expected);
    assert_eq!(results.percentage, 33);
    assert_eq!(results.average_time, 5.0);
}

#[test]
fn test_restart_replaces_session() {
    let catalog = catalog_of(&[
        (Region::Africa, Difficulty::Easy),
        (Region::Africa, Difficulty::High),
        (Region::Asia, Difficulty::High),
    ]);
    let mut manager = SessionManager::default();
    let mut rng = StdRng::seed_from_u64(4);

    assert_ok!(manager.start(GameConfig::default(), &catalog, &mut rng));
    assert_ok!(manager.submit_answer(None, 30.0));

    // Oceania has no countries, so the running session is kept
    let empty = GameConfig {
        region: RegionFilter::Oceania,
        ..GameConfig::default()
    };
    assert_err!(manager.start(empty, &catalog, &mut rng));
    assert_eq!(manager.session().answers.len(), 1);

    let high = GameConfig {
        difficulty: DifficultyFilter::High,
        ..GameConfig::default()
    };
    let total = assert_ok!(manager.start(high, &catalog, &mut rng));
    assert_eq!(total, 2);

    let session = manager.session();
    assert_eq!(session.config, high);
    assert!(session.answers.is_empty());
    assert_eq!(session.current_index, 0);
}

#[test]
fn test_zero_question_count_is_not_reported_as_empty() {
    let catalog = easy_catalog(1);
    let config = GameConfig {
        question_count: 0,
        ..GameConfig::default()
    };

    let mut manager = SessionManager::default();
    let result = manager.start(config, &catalog, &mut StdRng::seed_from_u64(1));

    assert_eq!(result, Err(SessionError::NoQuestionsRequested));
    assert_eq!(manager.session().phase, SessionPhase::NotStarted);
}
