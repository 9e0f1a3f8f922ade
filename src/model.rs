//! Core trivia data types
//!
//! Everything here is plain data and round-trips through JSON unchanged.
//! Field names are camelCase on disk.

use serde::{Deserialize, Deserializer, Serialize};

/// Question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Exact, case-sensitive parse of a stored label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Answer layout of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Multiple,
    Boolean,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

/// A single trivia item. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    /// Correct answer plus distractors, shuffled once at fetch time
    pub all_answers: Vec<String>,
}

impl Question {
    /// Exact, case-sensitive comparison against the stored correct answer
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// A selectable question category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Outcome of one question inside a finished quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Immutable record of a finished quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    /// Unix timestamp (ms) when the quiz was finished. Older documents store
    /// this as an RFC 3339 `date` string instead.
    #[serde(alias = "date", deserialize_with = "timestamp_ms")]
    pub timestamp: u64,
    pub category: String,
    /// Free-form label; values outside easy/medium/hard are kept as-is
    pub difficulty: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Integer percentage, rounded half-up
    pub score: u32,
    pub questions: Vec<QuestionOutcome>,
}

/// Accept either epoch milliseconds or an RFC 3339 date string
fn timestamp_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Date(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Millis(ms) => Ok(ms),
        Raw::Date(text) => {
            let date = chrono::DateTime::parse_from_rfc3339(&text).map_err(D::Error::custom)?;
            u64::try_from(date.timestamp_millis())
                .map_err(|_| D::Error::custom(format!("date before 1970: {text}")))
        }
    }
}

/// Per-difficulty quiz counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyCounts {
    /// Bump the bucket for `label`. Returns false for labels outside the three buckets.
    pub fn record(&mut self, label: &str) -> bool {
        match Difficulty::parse(label) {
            Some(Difficulty::Easy) => self.easy += 1,
            Some(Difficulty::Medium) => self.medium += 1,
            Some(Difficulty::Hard) => self.hard += 1,
            None => return false,
        }
        true
    }
}

/// Aggregate statistics, derived fresh from the history on every query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_quizzes: u32,
    pub total_questions: u64,
    pub total_correct: u64,
    /// Percentage rounded to 2 decimals
    pub average_score: f64,
    pub best_score: u32,
    pub favorite_category: String,
    pub quizzes_by_difficulty: DifficultyCounts,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_quizzes: 0,
            total_questions: 0,
            total_correct: 0,
            average_score: 0.0,
            best_score: 0,
            favorite_category: crate::consts::NO_CATEGORY.to_string(),
            quizzes_by_difficulty: DifficultyCounts::default(),
        }
    }
}

/// Coarse grading of a percentage score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 50 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

/// Integer percentage of `part / whole`, rounded half-up. 0 when `whole` is 0.
pub fn percent_half_up(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u32
}
