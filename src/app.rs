//! Application context
//!
//! Owns one instance of every store. Build it once per process and hand it
//! (or its fields) to whatever needs them.

use std::rc::Rc;

use crate::consts::FALLBACK_CATEGORY;
use crate::favorites::FavoritesStore;
use crate::model::QuizResult;
use crate::persistence::SharedStorage;
use crate::platform::{Clock, ThemeSink};
use crate::quiz::{QuizSession, SessionError};
use crate::settings::{AppSettings, DefaultDifficulty, SettingsStore};
use crate::source::{QuestionQuery, QuestionSource};
use crate::stats::StatsStore;

/// What the player asked for when setting up a quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub amount: u32,
    pub category_id: Option<u32>,
    pub difficulty: DefaultDifficulty,
}

impl QuizRequest {
    /// Request prefilled from the player's defaults
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            amount: settings.default_question_count,
            category_id: None,
            difficulty: settings.default_difficulty,
        }
    }

    pub fn query(&self) -> QuestionQuery {
        QuestionQuery {
            amount: self.amount,
            category_id: self.category_id,
            difficulty: self.difficulty.filter(),
            kind: None,
        }
    }
}

pub struct TriviaApp {
    pub settings: SettingsStore,
    pub favorites: FavoritesStore,
    pub stats: StatsStore,
    pub session: QuizSession,
}

impl TriviaApp {
    /// Load every store from `storage`
    pub fn new(storage: SharedStorage, theme: Box<dyn ThemeSink>, clock: Rc<dyn Clock>) -> Self {
        Self {
            settings: SettingsStore::load(storage.clone(), theme),
            favorites: FavoritesStore::load(storage.clone()),
            stats: StatsStore::load(storage),
            session: QuizSession::new(clock),
        }
    }

    pub fn default_request(&self) -> QuizRequest {
        QuizRequest::from_settings(self.settings.get_all())
    }

    /// Fetch questions and start a session. Returns false, leaving the
    /// session alone, when the source has nothing to offer.
    pub fn start_quiz(&mut self, source: &dyn QuestionSource, request: &QuizRequest) -> bool {
        let category = request
            .category_id
            .and_then(|id| {
                source
                    .fetch_categories()
                    .into_iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name)
            })
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

        let questions = source.fetch_questions(&request.query());
        if questions.is_empty() {
            log::warn!("No questions available for {:?}", request);
            return false;
        }

        self.session
            .start(questions, category, request.difficulty.as_str())
            .is_ok()
    }

    /// Finish the running session into the history
    pub fn finish_quiz(&mut self) -> Result<QuizResult, SessionError> {
        self.session.finish(&mut self.stats)
    }
}

impl std::fmt::Debug for TriviaApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriviaApp")
            .field("settings", &self.settings)
            .field("favorites", &self.favorites.count())
            .field("stats", &self.stats.len())
            .field("session", &self.session)
            .finish()
    }
}
