//! Trivia Core - state and persistence for a single-user trivia quiz app
//!
//! Core modules:
//! - `quiz`: Quiz attempt state machine (Idle -> Active -> Completed)
//! - `stats`: Append-only result history and aggregate statistics
//! - `favorites`: Saved questions, deduplicated by id
//! - `settings`: User preferences with defaults and theme side-effect
//! - `persistence`: Best-effort JSON persistence with diagnostics
//! - `platform`: Browser/native storage, theme, and clock
//! - `source`: Question source boundary and Open Trivia DB mapping

pub mod app;
pub mod favorites;
pub mod model;
pub mod observe;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod settings;
pub mod source;
pub mod stats;

pub use app::{QuizRequest, TriviaApp};
pub use favorites::FavoritesStore;
pub use model::{Category, Difficulty, Question, QuestionType, QuizResult, UserStats};
pub use quiz::{QuizPhase, QuizSession, SessionError};
pub use settings::{AppSettings, SettingsPatch, SettingsStore};
pub use stats::StatsStore;

/// Configuration constants
pub mod consts {
    /// Storage key for the favorites document
    pub const FAVORITES_KEY: &str = "trivia_favorites";
    /// Storage key for the settings document
    pub const SETTINGS_KEY: &str = "trivia_settings";
    /// Storage key for the result history document
    pub const STATS_KEY: &str = "trivia_stats";

    /// Questions per quiz unless the player changes it
    pub const DEFAULT_QUESTION_COUNT: u32 = 10;
    /// Favorite category shown when there is no history
    pub const NO_CATEGORY: &str = "N/A";
    /// Category label when the chosen category is unknown
    pub const FALLBACK_CATEGORY: &str = "General";
    /// How many results count as "recent"
    pub const RECENT_RESULTS: usize = 10;

    pub const OPENTDB_BASE_URL: &str = "https://opentdb.com";

    /// Native data directory override
    pub const DATA_DIR_ENV: &str = "TRIVIA_DATA_DIR";
    pub const DEFAULT_DATA_DIR: &str = ".trivia-data";
}
