//! Data models for the MapQuest engine.
//!
//! - [`Country`]: immutable catalog record, identified by its code
//! - [`GameConfig`]: mode, difficulty, region and question count of a session
//! - [`Answer`] / [`AnswerOutcome`]: what a submission records and reports
//! - [`Results`]: read-only summary derived from the answer log
//! - [`Settings`]: application settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod country;
pub mod game;
pub mod settings;

pub use country::{Country, Difficulty, Region};
pub use game::{
    Answer, AnswerOutcome, DifficultyFilter, GameConfig, GameMode, Progress, RegionFilter, Results,
    TIME_LIMIT_SECS,
};
pub use settings::{CatalogPaths, Settings};
