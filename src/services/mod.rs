//! Services module - pure game logic.
//!
//! Nothing here touches rendering, timers or global state; every function
//! takes its inputs explicitly, so the map game can be exercised without a
//! browser.
//!
//! # Components
//!
//! - [`selection`]: filters and shuffles the catalog into a question sequence
//! - [`resolution`]: turns click-target attributes into a country code
//!   ([`Resolver`]) and checks a submission ([`check_answer`])
//! - [`scoring`]: map points (flat or time-bonus) and logo points (time decay)
//! - [`results`]: reduces a finished session into [`Results`](crate::models::Results)
//! - [`brand`]: typed-answer matching for the logo game

pub mod brand;
pub mod resolution;
pub mod results;
pub mod scoring;
pub mod selection;

pub use brand::{Brand, is_brand_answer_correct};
pub use resolution::{ClickTarget, Resolver, check_answer, normalize};
pub use results::summarize;
pub use scoring::{BASE_POINTS, logo_score, score};
pub use selection::select_countries;
