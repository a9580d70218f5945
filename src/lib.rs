// MapQuest - answer resolution and scoring engine for the map geography game
//
// This is the library crate containing the game logic and data structures.
// The binary crate (main.rs) provides a terminal driver.

pub mod catalog;
pub mod config;
pub mod game;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod timer;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogSource, FileCatalogSource, LoadError};
pub use config::ConfigManager;
pub use game::{ClickResult, MapGame};
pub use models::{Country, GameConfig, GameMode, Results, Settings};
pub use services::ClickTarget;
pub use state::{Session, SessionError, SessionEvent, SessionManager, SessionPhase};
pub use timer::{ManualTimer, QuestionTimer, TimerTicket, TokioTimer};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
