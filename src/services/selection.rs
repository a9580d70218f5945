//! Question selection for a new session.

use crate::catalog::Catalog;
use crate::models::{Country, GameConfig};
use rand::Rng;
use rand::seq::SliceRandom;

/// Pick the ordered question sequence for `config`.
///
/// Countries are filtered by region and difficulty, shuffled uniformly and
/// cut to `config.question_count`. An empty result means there is nothing
/// playable for this combination.
pub fn select_countries<R: Rng + ?Sized>(
    config: &GameConfig,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<Country> {
    let mut pool: Vec<Country> = catalog
        .iter()
        .filter(|country| config.region.matches(country.region))
        .filter(|country| config.difficulty.matches(country.difficulty))
        .cloned()
        .collect();

    pool.shuffle(rng);
    pool.truncate(config.question_count);

    tracing::debug!(
        "Selected {} countries (region={:?}, difficulty={:?}, requested={})",
        pool.len(),
        config.region,
        config.difficulty,
        config.question_count
    );

    pool
}
