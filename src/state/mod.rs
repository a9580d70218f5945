// Session state machine
//
// This module provides the SessionManager which owns the single Session of a
// game and emits change events for presentation layers.

use crate::catalog::Catalog;
use crate::models::{
    Answer, AnswerOutcome, Country, DifficultyFilter, GameConfig, Progress, RegionFilter, Results,
};
use crate::services::{check_answer, select_countries, summarize};
use rand::Rng;
use std::time::SystemTime;
use thiserror::Error;
use tokio::sync::broadcast;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

/// Errors returned by session operations. The session is unchanged when one
/// is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Question count must be at least 1")]
    NoQuestionsRequested,

    #[error("No countries match region {region:?} and difficulty {difficulty:?}")]
    EmptySession {
        region: RegionFilter,
        difficulty: DifficultyFilter,
    },

    #[error("Session is not in progress (phase: {0:?})")]
    NotInProgress(SessionPhase),

    #[error("Question {0} has already been answered")]
    AlreadyAnswered(usize),
}

/// Change events emitted when the session is modified
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A new question sequence has been built
    Started { total: usize },

    /// An answer has been recorded for the current question
    AnswerRecorded {
        index: usize,
        is_correct: bool,
        points_earned: u32,
        score: u32,
    },

    /// Moved on to the next question
    Advanced { current: usize, total: usize },

    /// The last question has been passed
    Completed { score: u32 },

    /// Session has been reset
    Reset,
}

/// State of one map game.
///
/// Only [`SessionManager`] mutates a session; everything else reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub config: GameConfig,
    /// Question sequence, no repeated codes
    pub countries: Vec<Country>,
    pub current_index: usize,
    pub score: u32,
    pub answers: Vec<Answer>,
    pub phase: SessionPhase,
    pub started_at: Option<SystemTime>,

    // Whether the question at current_index already has an answer
    current_answered: bool,
}

impl Session {
    /// An empty, not-yet-started session.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            countries: Vec::new(),
            current_index: 0,
            score: 0,
            answers: Vec::new(),
            phase: SessionPhase::NotStarted,
            started_at: None,
            current_answered: false,
        }
    }

    pub fn current_country(&self) -> Option<&Country> {
        self.countries.get(self.current_index)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.current_index + 1,
            total: self.countries.len(),
        }
    }

    pub fn is_last_country(&self) -> bool {
        !self.countries.is_empty() && self.current_index == self.countries.len() - 1
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// True while the current question still accepts an answer.
    pub fn awaiting_answer(&self) -> bool {
        self.phase == SessionPhase::InProgress && !self.current_answered
    }

    pub fn current_question_answered(&self) -> bool {
        self.current_answered
    }

    pub fn results(&self) -> Results {
        summarize(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Owner of the game session with event emission
///
/// All mutation goes through [`start`](Self::start),
/// [`submit_answer`](Self::submit_answer), [`advance`](Self::advance) and
/// [`reset`](Self::reset). Readers get a shared reference via
/// [`session`](Self::session) or listen with [`subscribe`](Self::subscribe).
pub struct SessionManager {
    session: Session,

    /// Broadcast channel for session events
    /// Multiple subscribers can listen for changes
    events_tx: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager holding a not-started session
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new(config: GameConfig) -> Self {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            session: Session::new(config),
            events_tx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Clone of the current session
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    /// Execute a function with read access to the session
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.session)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.events_tx.send(event);
    }

    /// Build a fresh question sequence and start playing it
    ///
    /// # Returns
    /// The number of questions in the new session
    ///
    /// # Errors
    /// [`SessionError::NoQuestionsRequested`] for a zero question count and
    /// [`SessionError::EmptySession`] when no country matches the filters;
    /// the current session is left untouched.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        config: GameConfig,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<usize, SessionError> {
        if config.question_count == 0 {
            tracing::warn!("Refusing to start a session with zero questions");
            return Err(SessionError::NoQuestionsRequested);
        }

        let countries = select_countries(&config, catalog, rng);
        if countries.is_empty() {
            tracing::warn!(
                "No playable countries for region={:?}, difficulty={:?}",
                config.region,
                config.difficulty
            );
            return Err(SessionError::EmptySession {
                region: config.region,
                difficulty: config.difficulty,
            });
        }

        let total = countries.len();
        self.session = Session {
            countries,
            phase: SessionPhase::InProgress,
            started_at: Some(SystemTime::now()),
            ..Session::new(config)
        };

        tracing::info!(
            "Session started: mode={:?}, {} questions",
            config.mode,
            total
        );
        self.emit(SessionEvent::Started { total });

        Ok(total)
    }

    /// Record the answer for the current question
    ///
    /// # Arguments
    /// * `submitted_code` - The identified code, or `None` on timeout
    /// * `time_spent_secs` - Seconds taken on this question
    ///
    /// # Errors
    /// [`SessionError::NotInProgress`] outside a running session and
    /// [`SessionError::AlreadyAnswered`] for a second answer to one question.
    pub fn submit_answer(
        &mut self,
        submitted_code: Option<String>,
        time_spent_secs: f64,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.session.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress(self.session.phase));
        }
        if self.session.current_answered {
            return Err(SessionError::AlreadyAnswered(self.session.current_index));
        }

        let Some(expected) = self.session.current_country() else {
            return Err(SessionError::NotInProgress(self.session.phase));
        };

        let time_spent_secs = time_spent_secs.max(0.0);
        let outcome = check_answer(
            submitted_code.as_deref(),
            expected,
            time_spent_secs,
            self.session.config.mode,
        );

        let answer = Answer {
            country: outcome.correct_country.clone(),
            submitted_code,
            is_correct: outcome.is_correct,
            time_spent_secs,
            points_earned: outcome.points_earned,
        };

        self.session.score += outcome.points_earned;
        self.session.answers.push(answer);
        self.session.current_answered = true;

        tracing::debug!(
            "Answer recorded for {}: correct={}, points={}",
            outcome.correct_country.code,
            outcome.is_correct,
            outcome.points_earned
        );
        self.emit(SessionEvent::AnswerRecorded {
            index: self.session.current_index,
            is_correct: outcome.is_correct,
            points_earned: outcome.points_earned,
            score: self.session.score,
        });

        Ok(outcome)
    }

    /// Move to the next question, or complete the session after the last one
    ///
    /// Advancing past an unanswered question is allowed.
    ///
    /// # Returns
    /// The session phase after advancing
    pub fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        if self.session.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress(self.session.phase));
        }

        if self.session.is_last_country() {
            self.session.phase = SessionPhase::Complete;
            tracing::info!("Session complete with score {}", self.session.score);
            self.emit(SessionEvent::Completed {
                score: self.session.score,
            });
        } else {
            self.session.current_index += 1;
            self.session.current_answered = false;
            let progress = self.session.progress();
            self.emit(SessionEvent::Advanced {
                current: progress.current,
                total: progress.total,
            });
        }

        Ok(self.session.phase)
    }

    /// Discard the question sequence and answers
    ///
    /// The configuration is kept for the next start.
    pub fn reset(&mut self) {
        self.session = Session::new(self.session.config);
        tracing::info!("Session reset");
        self.emit(SessionEvent::Reset);
    }

    pub fn results(&self) -> Results {
        summarize(&self.session)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, GameMode, Region};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog(size: usize) -> Catalog {
        Catalog::from_countries((0..size).map(|i| Country {
            code: format!("C{}", i),
            name: format!("Country {}", i),
            full_name: format!("Republic of Country {}", i),
            region: Region::Europe,
            difficulty: Difficulty::Easy,
        }))
    }

    fn started(mode: GameMode, questions: usize) -> SessionManager {
        let mut manager = SessionManager::default();
        let config = GameConfig {
            mode,
            question_count: questions,
            ..GameConfig::default()
        };
        manager
            .start(config, &catalog(5), &mut StdRng::seed_from_u64(42))
            .unwrap();
        manager
    }

    fn current_code(manager: &SessionManager) -> String {
        manager.session().current_country().unwrap().code.clone()
    }

    #[test]
    fn test_new_session_manager() {
        let manager = SessionManager::default();
        let session = manager.snapshot();

        assert_eq!(session.phase, SessionPhase::NotStarted);
        assert_eq!(session.current_index, 0);
        assert_eq!(session.score, 0);
        assert!(session.answers.is_empty());
        assert!(session.current_country().is_none());
    }

    #[test]
    fn test_start() {
        let manager = started(GameMode::Classic, 3);
        let session = manager.session();

        assert_eq!(session.phase, SessionPhase::InProgress);
        assert_eq!(session.countries.len(), 3);
        assert!(session.started_at.is_some());
        assert_eq!(session.progress(), Progress { current: 1, total: 3 });
    }

    #[test]
    fn test_start_empty_is_noop() {
        let mut manager = SessionManager::default();
        let config = GameConfig {
            region: RegionFilter::Asia,
            ..GameConfig::default()
        };

        let result = manager.start(config, &catalog(5), &mut StdRng::seed_from_u64(1));

        assert!(matches!(result, Err(SessionError::EmptySession { .. })));
        assert_eq!(manager.session().phase, SessionPhase::NotStarted);
        assert_eq!(*manager.session(), Session::default());
    }

    #[test]
    fn test_start_zero_questions_rejected() {
        let mut manager = SessionManager::default();
        let config = GameConfig {
            question_count: 0,
            ..GameConfig::default()
        };

        let result = manager.start(config, &catalog(5), &mut StdRng::seed_from_u64(1));

        assert_eq!(result, Err(SessionError::NoQuestionsRequested));
        assert_eq!(*manager.session(), Session::default());
    }

    #[test]
    fn test_submit_does_not_advance() {
        let mut manager = started(GameMode::Classic, 3);
        let code = current_code(&manager);

        let outcome = manager.submit_answer(Some(code), 12.0).unwrap();

        assert!(outcome.is_correct);
        assert_eq!(outcome.points_earned, 100);
        let session = manager.session();
        assert_eq!(session.current_index, 0);
        assert_eq!(session.score, 100);
        assert_eq!(session.answers.len(), 1);
        assert!(!session.awaiting_answer());
    }

    #[test]
    fn test_second_answer_rejected() {
        let mut manager = started(GameMode::Classic, 3);
        manager.submit_answer(None, 30.0).unwrap();

        let code = current_code(&manager);
        assert_eq!(
            manager.submit_answer(Some(code), 1.0),
            Err(SessionError::AlreadyAnswered(0))
        );
        assert_eq!(manager.session().answers.len(), 1);
        assert_eq!(manager.session().score, 0);
    }

    #[test]
    fn test_submit_requires_in_progress() {
        let mut manager = SessionManager::default();
        assert_eq!(
            manager.submit_answer(Some("C0".to_string()), 1.0),
            Err(SessionError::NotInProgress(SessionPhase::NotStarted))
        );
    }

    #[test]
    fn test_advance_through_to_completion() {
        let mut manager = started(GameMode::Classic, 2);

        assert_eq!(manager.advance(), Ok(SessionPhase::InProgress));
        assert_eq!(manager.session().current_index, 1);
        assert!(manager.session().is_last_country());

        assert_eq!(manager.advance(), Ok(SessionPhase::Complete));
        assert!(manager.session().is_complete());
        // Index stays on the last question
        assert_eq!(manager.session().current_index, 1);

        assert_eq!(
            manager.advance(),
            Err(SessionError::NotInProgress(SessionPhase::Complete))
        );
        assert_eq!(
            manager.submit_answer(None, 0.0),
            Err(SessionError::NotInProgress(SessionPhase::Complete))
        );
    }

    #[test]
    fn test_advance_without_answer_allowed() {
        let mut manager = started(GameMode::Classic, 3);
        manager.advance().unwrap();
        manager.advance().unwrap();

        let session = manager.session();
        assert_eq!(session.current_index, 2);
        assert!(session.answers.is_empty());
        assert!(session.awaiting_answer());
    }

    #[test]
    fn test_timed_points() {
        let mut manager = started(GameMode::Timed, 1);
        let code = current_code(&manager);

        let outcome = manager.submit_answer(Some(code), 9.0).unwrap();
        assert_eq!(outcome.points_earned, 170);
        assert_eq!(manager.session().score, 170);
    }

    #[test]
    fn test_negative_time_recorded_as_zero() {
        let mut manager = started(GameMode::Classic, 1);
        manager.submit_answer(None, -3.0).unwrap();
        assert_eq!(manager.session().answers[0].time_spent_secs, 0.0);
    }

    #[test]
    fn test_reset_restores_initial_shape() {
        let mut manager = started(GameMode::Timed, 3);
        let code = current_code(&manager);
        manager.submit_answer(Some(code), 2.0).unwrap();
        manager.advance().unwrap();

        manager.reset();

        let config = manager.session().config;
        assert_eq!(*manager.session(), Session::new(config));
        assert_eq!(config.mode, GameMode::Timed);

        manager.reset();
        assert_eq!(*manager.session(), Session::new(config));
    }

    #[test]
    fn test_subscribe_to_events() {
        let mut manager = SessionManager::default();
        let mut rx = manager.subscribe();

        let config = GameConfig {
            question_count: 1,
            ..GameConfig::default()
        };
        manager
            .start(config, &catalog(2), &mut StdRng::seed_from_u64(9))
            .unwrap();
        manager.submit_answer(None, 30.0).unwrap();
        manager.advance().unwrap();
        manager.reset();

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Started { total: 1 });
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::AnswerRecorded {
                index: 0,
                is_correct: false,
                points_earned: 0,
                score: 0,
            }
        );
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Completed { score: 0 });
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Reset);
    }

    #[test]
    fn test_read_with_closure() {
        let manager = started(GameMode::Classic, 4);
        let total = manager.read(|session| session.countries.len());
        assert_eq!(total, 4);
    }
}
