//! Point calculations.
//!
//! Map game: 100 base points per correct answer. Timed mode adds 10 points
//! for every full 3 seconds left on the 30 second clock.
//!
//! Logo game: starts at 100 and loses 10 points for every full 5 seconds
//! taken, never below zero.

use crate::models::{GameMode, TIME_LIMIT_SECS};

/// Points for any correct map answer before bonuses.
pub const BASE_POINTS: u32 = 100;

const TIME_BONUS_BUCKET_SECS: f64 = 3.0;
const TIME_BONUS_STEP: u32 = 10;

const LOGO_DECAY_BUCKET_SECS: f64 = 5.0;
const LOGO_DECAY_STEP: u32 = 10;

/// Points earned by a correct map answer given after `time_spent_secs`.
///
/// Negative or NaN times count as zero.
pub fn score(time_spent_secs: f64, mode: GameMode) -> u32 {
    match mode {
        GameMode::Timed => {
            let time_spent = time_spent_secs.max(0.0);
            let remaining = (TIME_LIMIT_SECS as f64 - time_spent).max(0.0);
            let buckets = (remaining / TIME_BONUS_BUCKET_SECS).floor() as u32;
            BASE_POINTS + buckets * TIME_BONUS_STEP
        }
        GameMode::Classic | GameMode::Regional => BASE_POINTS,
    }
}

/// Points earned by a correct logo answer given after `elapsed_secs`.
pub fn logo_score(elapsed_secs: f64) -> u32 {
    let elapsed = elapsed_secs.max(0.0);
    let buckets = (elapsed / LOGO_DECAY_BUCKET_SECS).floor();
    let deduction = buckets * LOGO_DECAY_STEP as f64;
    (100.0 - deduction).max(0.0) as u32
}
