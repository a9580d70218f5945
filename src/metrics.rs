// Gameplay metrics module
//
// Lightweight counters describing how sessions are played

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Gameplay counters
///
/// Uses atomic operations so a shared handle can be read from any view
/// without locks. Logged on shutdown for a quick picture of a play session.
#[derive(Debug)]
pub struct Metrics {
    /// Sessions successfully started
    pub sessions_started: AtomicU64,

    /// Sessions played through to the end
    pub sessions_completed: AtomicU64,

    /// Answers recorded, including timeouts
    pub answers_recorded: AtomicU64,

    /// Answers that matched the expected country
    pub correct_answers: AtomicU64,

    /// Clicks that could not be matched to any country
    pub unresolved_clicks: AtomicU64,

    /// Questions that ran out of time
    pub timeouts: AtomicU64,

    /// Timeouts that fired after their question was settled and were dropped
    pub stale_timeouts: AtomicU64,

    /// Application start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            sessions_started: AtomicU64::new(0),
            sessions_completed: AtomicU64::new(0),
            answers_recorded: AtomicU64::new(0),
            correct_answers: AtomicU64::new(0),
            unresolved_clicks: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            stale_timeouts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an answer and whether it was correct
    pub fn record_answer(&self, is_correct: bool) {
        self.answers_recorded.fetch_add(1, Ordering::Relaxed);
        if is_correct {
            self.correct_answers.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_unresolved_click(&self) {
        self.unresolved_clicks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_timeout(&self) {
        self.stale_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of recorded answers that were correct, 0.0 to 1.0
    pub fn accuracy(&self) -> f64 {
        let answers = self.answers_recorded.load(Ordering::Relaxed);
        let correct = self.correct_answers.load(Ordering::Relaxed);
        if answers > 0 {
            correct as f64 / answers as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Gameplay Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Sessions: {} started, {} completed",
            self.sessions_started.load(Ordering::Relaxed),
            self.sessions_completed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Answers: {} recorded, {} correct ({:.0}%)",
            self.answers_recorded.load(Ordering::Relaxed),
            self.correct_answers.load(Ordering::Relaxed),
            self.accuracy() * 100.0
        );
        tracing::info!(
            "Timeouts: {} recorded, {} stale ignored; unresolved clicks: {}",
            self.timeouts.load(Ordering::Relaxed),
            self.stale_timeouts.load(Ordering::Relaxed),
            self.unresolved_clicks.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
