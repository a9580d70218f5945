//! Map game controller.
//!
//! [`MapGame`] is what a presentation layer drives. It owns the session state
//! machine and the question timer and enforces the at-most-one-answer rule
//! between a click and a timeout:
//!
//! - a resolved click cancels the pending timer before the answer is recorded
//! - a timeout is honored only if its ticket is the one currently pending
//! - `next`, `change_difficulty` and `reset` cancel whatever is pending
//!
//! Unresolvable clicks change nothing; the timer keeps running.

use crate::catalog::{Catalog, CatalogSource, LoadError, shared_catalog};
use crate::metrics::Metrics;
use crate::models::{
    AnswerOutcome, Country, DifficultyFilter, GameConfig, Results, TIME_LIMIT_SECS,
};
use crate::services::{ClickTarget, Resolver};
use crate::state::{Session, SessionError, SessionEvent, SessionManager, SessionPhase};
use crate::timer::{QuestionTimer, TimerTicket};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Countdown per question in timed mode. The time bonus is scored against
/// the same limit.
const COUNTDOWN: Duration = Duration::from_secs(TIME_LIMIT_SECS);

/// What happened to a map click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickResult {
    /// No question is waiting for an answer (not started, already answered
    /// or complete).
    Ignored,

    /// The clicked element could not be matched to a country.
    Unresolved,

    /// An answer was recorded.
    Answered {
        outcome: AnswerOutcome,
        clicked_code: String,
        /// Catalog name of the clicked country, or the raw code if unknown.
        clicked_name: String,
    },
}

/// A map game bound to a loaded catalog and a timer.
pub struct MapGame<T: QuestionTimer> {
    catalog: Arc<Catalog>,
    resolver: Resolver,
    sessions: SessionManager,
    timer: T,
    pending_timer: Option<TimerTicket>,
    next_ticket: u64,
    rng: StdRng,
    metrics: Arc<Metrics>,
}

impl<T: QuestionTimer> MapGame<T> {
    pub fn new(catalog: Arc<Catalog>, timer: T) -> Self {
        Self {
            resolver: Resolver::new(&catalog),
            catalog,
            sessions: SessionManager::default(),
            timer,
            pending_timer: None,
            next_ticket: 0,
            rng: StdRng::from_entropy(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create a game on the process-wide catalog, loading it if needed.
    pub fn load(source: &dyn CatalogSource, timer: T) -> Result<Self, LoadError> {
        Ok(Self::new(shared_catalog(source)?, timer))
    }

    /// Use a seeded generator for question order.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sessions.subscribe()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Ticket of the countdown currently running, if any.
    pub fn pending_timer(&self) -> Option<TimerTicket> {
        self.pending_timer
    }

    pub fn country_by_code(&self, code: &str) -> Option<&Country> {
        self.catalog.get(code)
    }

    /// Start a new session with `config`.
    ///
    /// On failure the previous session, and its countdown, carry on.
    pub fn start(&mut self, config: GameConfig) -> Result<usize, SessionError> {
        let total = self.sessions.start(config, &self.catalog, &mut self.rng)?;
        self.metrics.record_session_started();

        self.cancel_timer();
        self.arm_timer();

        Ok(total)
    }

    /// Switch difficulty mid-game by rebuilding the session.
    ///
    /// # Returns
    /// `false` when `difficulty` is already the current one
    pub fn change_difficulty(&mut self, difficulty: DifficultyFilter) -> Result<bool, SessionError> {
        let current = self.session().config;
        if current.difficulty == difficulty {
            return Ok(false);
        }

        tracing::info!("Changing difficulty from {:?} to {:?}", current.difficulty, difficulty);
        self.start(GameConfig {
            difficulty,
            ..current
        })?;

        Ok(true)
    }

    /// Handle a click on a map element after `time_spent_secs` seconds.
    pub fn click(&mut self, target: &ClickTarget, time_spent_secs: f64) -> ClickResult {
        if !self.session().awaiting_answer() {
            tracing::debug!("Click ignored, no question awaiting an answer");
            return ClickResult::Ignored;
        }

        let Some(clicked_code) = self.resolver.identify(target) else {
            tracing::warn!(
                "Could not identify clicked country: id={:?}, name={:?}, class={:?}",
                target.id,
                target.name,
                target.class
            );
            self.metrics.record_unresolved_click();
            return ClickResult::Unresolved;
        };

        tracing::debug!("Identified country code: {}", clicked_code);
        self.cancel_timer();

        match self
            .sessions
            .submit_answer(Some(clicked_code.clone()), time_spent_secs)
        {
            Ok(outcome) => {
                self.metrics.record_answer(outcome.is_correct);
                let clicked_name = self
                    .catalog
                    .get(&clicked_code)
                    .map(|country| country.name.clone())
                    .unwrap_or_else(|| clicked_code.clone());

                ClickResult::Answered {
                    outcome,
                    clicked_code,
                    clicked_name,
                }
            }
            Err(e) => {
                tracing::warn!("Click not recorded: {}", e);
                ClickResult::Ignored
            }
        }
    }

    /// Handle a fired countdown.
    ///
    /// Records an unanswered question if `ticket` is the pending countdown;
    /// anything else is a late firing and is dropped.
    pub fn on_timeout(&mut self, ticket: TimerTicket) -> Option<AnswerOutcome> {
        if self.pending_timer != Some(ticket) {
            tracing::debug!("Ignoring stale timeout {:?}", ticket);
            self.metrics.record_stale_timeout();
            return None;
        }
        self.pending_timer = None;

        let time_spent = COUNTDOWN.as_secs_f64();
        match self.sessions.submit_answer(None, time_spent) {
            Ok(outcome) => {
                tracing::info!("Time's up for {}", outcome.correct_country.code);
                self.metrics.record_timeout();
                self.metrics.record_answer(false);
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!("Timeout not recorded: {}", e);
                None
            }
        }
    }

    /// Move to the next question, or finish after the last one.
    pub fn next(&mut self) -> Result<SessionPhase, SessionError> {
        self.cancel_timer();

        let phase = self.sessions.advance()?;
        match phase {
            SessionPhase::InProgress => self.arm_timer(),
            SessionPhase::Complete => self.metrics.record_session_completed(),
            SessionPhase::NotStarted => {}
        }

        Ok(phase)
    }

    pub fn reset(&mut self) {
        self.cancel_timer();
        self.sessions.reset();
    }

    pub fn results(&self) -> Results {
        self.sessions.results()
    }

    /// Indices of `targets` to highlight as `code`.
    pub fn highlight(&self, code: &str, targets: &[ClickTarget]) -> Vec<usize> {
        self.resolver.locate(code, targets)
    }

    fn arm_timer(&mut self) {
        let session = self.sessions.session();
        if !session.config.mode.is_timed() || !session.awaiting_answer() {
            return;
        }

        let ticket = TimerTicket(self.next_ticket);
        self.next_ticket += 1;
        self.timer.schedule(ticket, COUNTDOWN);
        self.pending_timer = Some(ticket);
    }

    fn cancel_timer(&mut self) {
        if let Some(ticket) = self.pending_timer.take() {
            self.timer.cancel(ticket);
        }
    }
}
