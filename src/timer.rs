//! Question countdown port.
//!
//! The game schedules one cancellable timeout per question. Every schedule
//! gets a fresh [`TimerTicket`]; when a timeout fires, the ticket is handed
//! back to [`MapGame::on_timeout`](crate::game::MapGame::on_timeout), which
//! only honors the ticket it is currently waiting for. A late firing for a
//! cancelled ticket therefore records nothing.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerTicket(pub u64);

/// Something that can fire a single timeout per ticket.
#[cfg_attr(test, mockall::automock)]
pub trait QuestionTimer {
    /// Arrange for `ticket` to fire once `after` has elapsed.
    fn schedule(&mut self, ticket: TimerTicket, after: Duration);

    /// Stop `ticket` from firing. Unknown tickets are ignored.
    fn cancel(&mut self, ticket: TimerTicket);
}

/// Timer backed by tokio tasks.
///
/// Fired tickets are delivered on the receiver returned by
/// [`TokioTimer::new`]. `schedule` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTimer {
    fired_tx: mpsc::UnboundedSender<TimerTicket>,
    tasks: HashMap<TimerTicket, JoinHandle<()>>,
}

impl TokioTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerTicket>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let timer = Self {
            fired_tx,
            tasks: HashMap::new(),
        };
        (timer, fired_rx)
    }

    /// Number of tickets scheduled and not yet cancelled or fired.
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl QuestionTimer for TokioTimer {
    fn schedule(&mut self, ticket: TimerTicket, after: Duration) {
        self.tasks.retain(|_, task| !task.is_finished());

        let fired_tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Receiver gone means the game is shutting down
            let _ = fired_tx.send(ticket);
        });

        if let Some(previous) = self.tasks.insert(ticket, task) {
            previous.abort();
        }
    }

    fn cancel(&mut self, ticket: TimerTicket) {
        if let Some(task) = self.tasks.remove(&ticket) {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Timer driven by the caller.
///
/// Keeps the scheduled tickets so a poller (or a test) can decide when they
/// fire.
#[derive(Debug, Default)]
pub struct ManualTimer {
    pending: Vec<(TimerTicket, Duration)>,
    cancelled: Vec<TimerTicket>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduled tickets that have been neither fired nor cancelled.
    pub fn pending(&self) -> &[(TimerTicket, Duration)] {
        &self.pending
    }

    /// Every ticket that has been cancelled, oldest first.
    pub fn cancelled(&self) -> &[TimerTicket] {
        &self.cancelled
    }

    /// Fire the oldest pending ticket.
    pub fn fire_next(&mut self) -> Option<TimerTicket> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0).0)
        }
    }
}

impl QuestionTimer for ManualTimer {
    fn schedule(&mut self, ticket: TimerTicket, after: Duration) {
        self.pending.push((ticket, after));
    }

    fn cancel(&mut self, ticket: TimerTicket) {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != ticket);
        if self.pending.len() != before {
            self.cancelled.push(ticket);
        }
    }
}
