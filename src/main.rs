//! MapQuest - terminal driver for the map geography game
//!
//! Plays a session in the terminal instead of on a rendered map. Each input
//! line stands in for a click on a map element:
//!
//! - `#FR` clicks an element whose `id` is `FR`
//! - `.land france` clicks an element whose `class` is `land france`
//! - anything else clicks an element whose `name` is the line
//!
//! `difficulty <easy|medium|high|all>` rebuilds the session and `quit` exits.
//!
//! # Execution Flow
//!
//! 1. Load settings from `MapQuest Data/MapQuest Settings.yaml` and `MAPQUEST__*`
//! 2. Initialize logging → `<log_dir>/mapquest.<date>`
//! 3. Load the country catalog
//! 4. Race stdin lines against the question countdown until the session ends
//! 5. Print results and log the metrics summary

use anyhow::{Context, Result};
use mapquest::metrics::Metrics;
use mapquest::models::{DifficultyFilter, TIME_LIMIT_SECS};
use mapquest::{
    APP_NAME, ClickResult, ClickTarget, ConfigManager, FileCatalogSource, MapGame, QuestionTimer,
    SessionPhase, Settings, TokioTimer, VERSION,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of player input
enum Command {
    Quit,
    Difficulty(DifficultyFilter),
    Click(ClickTarget),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }

    if let Some(level) = line.strip_prefix("difficulty ") {
        let difficulty = match level.trim().to_lowercase().as_str() {
            "easy" => DifficultyFilter::Easy,
            "medium" => DifficultyFilter::Medium,
            "high" => DifficultyFilter::High,
            "all" => DifficultyFilter::All,
            other => {
                println!("Unknown difficulty: {}", other);
                return None;
            }
        };
        return Some(Command::Difficulty(difficulty));
    }

    let target = if let Some(id) = line.strip_prefix('#') {
        ClickTarget::with_id(id)
    } else if let Some(class) = line.strip_prefix('.') {
        ClickTarget::with_class(class)
    } else {
        ClickTarget::with_name(line)
    };
    Some(Command::Click(target))
}

fn prompt<T: QuestionTimer>(game: &MapGame<T>) {
    let session = game.session();
    if let Some(country) = session.current_country() {
        let progress = session.progress();
        println!(
            "[{}/{}] Find: {} (score {})",
            progress.current, progress.total, country.name, session.score
        );
    }
}

/// Move on after a settled question. Returns true once the session is over.
fn advance<T: QuestionTimer>(game: &mut MapGame<T>) -> Result<bool> {
    let phase = game.next()?;
    if phase == SessionPhase::InProgress {
        prompt(game);
    }
    Ok(phase == SessionPhase::Complete)
}

async fn play(settings: &Settings, metrics: Arc<Metrics>) -> Result<()> {
    let source = FileCatalogSource::new(&settings.catalog.countries, &settings.catalog.map_list);
    let (timer, mut timeouts) = TokioTimer::new();
    let mut game = MapGame::load(&source, timer)
        .context("Failed to load the country catalog")?
        .with_metrics(metrics);

    if let Err(e) = game.start(settings.game) {
        println!("Cannot start a game: {}", e);
        return Ok(());
    }
    if settings.game.mode.is_timed() {
        println!("You have {} seconds per country.", TIME_LIMIT_SECS);
    }
    prompt(&game);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut question_started = Instant::now();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };

                match parse_command(&line) {
                    None => {}
                    Some(Command::Quit) => break,
                    Some(Command::Difficulty(difficulty)) => match game.change_difficulty(difficulty) {
                        Ok(true) => {
                            question_started = Instant::now();
                            prompt(&game);
                        }
                        Ok(false) => println!("Already playing on {:?}", difficulty),
                        Err(e) => println!("{}", e),
                    },
                    Some(Command::Click(target)) => {
                        let elapsed = question_started.elapsed().as_secs() as f64;
                        match game.click(&target, elapsed) {
                            ClickResult::Unresolved => {
                                println!("That is not a country on the map, try again.");
                            }
                            ClickResult::Ignored => {}
                            ClickResult::Answered { outcome, clicked_name, .. } => {
                                if outcome.is_correct {
                                    println!("Correct! +{} points", outcome.points_earned);
                                } else {
                                    println!(
                                        "You picked {}. The answer was {}.",
                                        clicked_name, outcome.correct_country.name
                                    );
                                }
                                if advance(&mut game)? {
                                    break;
                                }
                                question_started = Instant::now();
                            }
                        }
                    }
                }
            }
            Some(ticket) = timeouts.recv() => {
                if let Some(outcome) = game.on_timeout(ticket) {
                    println!("Time's up! It was {}.", outcome.correct_country.name);
                    if advance(&mut game)? {
                        break;
                    }
                    question_started = Instant::now();
                }
            }
        }
    }

    if game.session().is_complete() {
        let results = game.results();
        println!(
            "Final score: {} ({}%), {}/{} correct, {:.1}s average",
            results.total_score,
            results.percentage,
            results.correct_count,
            results.total_count,
            results.average_time
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("MapQuest Data")?;
    let settings = config_manager.load_settings()?;

    let _guard =
        mapquest::logging::setup_logging(&settings.log_dir, "mapquest", settings.debug_mode)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Single-threaded: every state change runs to completion on one event loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let metrics = Arc::new(Metrics::new());
    let result = runtime.block_on(play(&settings, Arc::clone(&metrics)));

    metrics.log_summary();
    tracing::info!("Application shutdown complete");

    result
}
