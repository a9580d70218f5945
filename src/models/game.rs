use super::country::{Country, Difficulty, Region};
use serde::{Deserialize, Serialize};

/// Seconds allowed per question in timed mode.
pub const TIME_LIMIT_SECS: u64 = 30;

/// How a session is played and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Find countries at your own pace, flat points.
    #[default]
    Classic,
    /// 30 seconds per country, faster answers earn a bonus.
    Timed,
    /// Focus on one continent, scored like classic.
    Regional,
}

impl GameMode {
    /// Whether questions in this mode run against a countdown.
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::Timed)
    }
}

/// Difficulty selection for a session. `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    #[default]
    Easy,
    Medium,
    High,
    All,
}

impl DifficultyFilter {
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::High => difficulty == Difficulty::High,
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => DifficultyFilter::Easy,
            Difficulty::Medium => DifficultyFilter::Medium,
            Difficulty::High => DifficultyFilter::High,
        }
    }
}

/// Region selection for a session. `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl RegionFilter {
    pub fn matches(&self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Africa => region == Region::Africa,
            RegionFilter::Americas => region == Region::Americas,
            RegionFilter::Asia => region == Region::Asia,
            RegionFilter::Europe => region == Region::Europe,
            RegionFilter::Oceania => region == Region::Oceania,
        }
    }
}

impl From<Region> for RegionFilter {
    fn from(region: Region) -> Self {
        match region {
            Region::Africa => RegionFilter::Africa,
            Region::Americas => RegionFilter::Americas,
            Region::Asia => RegionFilter::Asia,
            Region::Europe => RegionFilter::Europe,
            Region::Oceania => RegionFilter::Oceania,
        }
    }
}

/// Parameters of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub mode: GameMode,

    #[serde(default)]
    pub difficulty: DifficultyFilter,

    #[serde(default)]
    pub region: RegionFilter,

    #[serde(default = "default_question_count")]
    pub question_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            difficulty: DifficultyFilter::Easy,
            region: RegionFilter::All,
            question_count: default_question_count(),
        }
    }
}

fn default_question_count() -> usize {
    15
}

/// One recorded answer. Appended once per question and never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub country: Country,
    /// `None` when the question timed out.
    pub submitted_code: Option<String>,
    pub is_correct: bool,
    pub time_spent_secs: f64,
    pub points_earned: u32,
}

/// What `check_answer` reports back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub points_earned: u32,
    /// Always the expected country, so feedback can highlight it on a miss.
    pub correct_country: Country,
}

/// Position within the session, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Summary of a session, recomputed from the answer log on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Results {
    pub total_score: u32,
    pub max_possible_score: u32,
    pub correct_count: usize,
    pub total_count: usize,
    /// May exceed 100 in timed mode; bonuses are not part of the maximum.
    pub percentage: u32,
    pub answers: Vec<Answer>,
    /// Mean seconds per answer, one decimal place.
    pub average_time: f64,
    pub config: GameConfig,
}
