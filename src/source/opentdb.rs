//! Open Trivia DB wire format
//!
//! Maps raw API payloads to [`Question`]s: HTML entities are decoded and the
//! answer list is shuffled exactly once, here. Transport is left to callers.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Deserialize;

use crate::model::{Category, Difficulty, Question, QuestionType};

/// `api.php` response body
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub response_code: u32,
    pub results: Vec<ApiQuestion>,
}

/// One question as sent by the API (HTML-encoded)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// `api_category.php` response body
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    pub trivia_categories: Vec<Category>,
}

impl ApiResponse {
    /// Convert to questions. A non-zero response code yields nothing.
    /// Ids are `q-<fetched_at_ms>-<index>`; `seed` drives the answer shuffle.
    pub fn into_questions(self, fetched_at_ms: u64, seed: u64) -> Vec<Question> {
        if self.response_code != 0 {
            log::warn!("Question API returned response code {}", self.response_code);
            return Vec::new();
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        self.results
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let correct_answer = decode_html(&raw.correct_answer);
                let incorrect_answers: Vec<String> =
                    raw.incorrect_answers.iter().map(|a| decode_html(a)).collect();

                let mut all_answers = Vec::with_capacity(incorrect_answers.len() + 1);
                all_answers.push(correct_answer.clone());
                all_answers.extend(incorrect_answers.iter().cloned());
                all_answers.shuffle(&mut rng);

                Question {
                    id: format!("q-{}-{}", fetched_at_ms, index),
                    category: decode_html(&raw.category),
                    kind: raw.kind,
                    difficulty: raw.difficulty,
                    question: decode_html(&raw.question),
                    correct_answer,
                    incorrect_answers,
                    all_answers,
                }
            })
            .collect()
    }
}

/// Parse an `api.php` body, empty on malformed input
pub fn parse_questions(body: &str, fetched_at_ms: u64, seed: u64) -> Vec<Question> {
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(response) => response.into_questions(fetched_at_ms, seed),
        Err(err) => {
            log::error!("Error parsing questions: {}", err);
            Vec::new()
        }
    }
}

/// Parse an `api_category.php` body, empty on malformed input
pub fn parse_categories(body: &str) -> Vec<Category> {
    match serde_json::from_str::<CategoriesResponse>(body) {
        Ok(response) => response.trivia_categories,
        Err(err) => {
            log::error!("Error parsing categories: {}", err);
            Vec::new()
        }
    }
}

/// Decode the HTML entities the API emits, named and numeric
pub fn decode_html(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
