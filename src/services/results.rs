//! Session summaries.

use crate::models::Results;
use crate::services::scoring::BASE_POINTS;
use crate::state::Session;

/// Reduce a session's answer log into [`Results`].
///
/// The maximum score counts 100 points per question and ignores timed-mode
/// bonuses, so timed sessions can report more than 100 percent.
pub fn summarize(session: &Session) -> Results {
    let correct_count = session.answers.iter().filter(|a| a.is_correct).count();
    let total_count = session.countries.len();
    let max_possible_score = total_count as u32 * BASE_POINTS;

    let percentage = if max_possible_score > 0 {
        (session.score as f64 / max_possible_score as f64 * 100.0).round() as u32
    } else {
        0
    };

    let average_time = if session.answers.is_empty() {
        0.0
    } else {
        let total: f64 = session.answers.iter().map(|a| a.time_spent_secs).sum();
        round_to_tenth(total / session.answers.len() as f64)
    };

    Results {
        total_score: session.score,
        max_possible_score,
        correct_count,
        total_count,
        percentage,
        answers: session.answers.clone(),
        average_time,
        config: session.config,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
