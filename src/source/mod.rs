//! Question source boundary
//!
//! Sources never fail loudly: any transport, parse, or upstream status problem
//! yields an empty list. Callers treat an empty question list as "quiz cannot
//! start".

pub mod opentdb;

use crate::model::{Category, Difficulty, Question, QuestionType};

pub use opentdb::{ApiQuestion, ApiResponse, CategoriesResponse, decode_html};

/// Parameters for one question fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub amount: u32,
    pub category_id: Option<u32>,
    /// `None` means any difficulty
    pub difficulty: Option<Difficulty>,
    pub kind: Option<QuestionType>,
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            amount: crate::consts::DEFAULT_QUESTION_COUNT,
            category_id: None,
            difficulty: None,
            kind: None,
        }
    }
}

impl QuestionQuery {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    /// Request URL against an Open Trivia DB style endpoint
    pub fn to_url(&self, base_url: &str) -> String {
        let mut url = format!("{}/api.php?amount={}", base_url, self.amount);
        if let Some(category) = self.category_id.filter(|id| *id != 0) {
            url.push_str(&format!("&category={}", category));
        }
        if let Some(difficulty) = self.difficulty {
            url.push_str(&format!("&difficulty={}", difficulty.as_str()));
        }
        if let Some(kind) = self.kind {
            url.push_str(&format!("&type={}", kind.as_str()));
        }
        url
    }
}

/// Supplier of questions and categories
pub trait QuestionSource {
    /// Ordered questions, empty on any failure
    fn fetch_questions(&self, query: &QuestionQuery) -> Vec<Question>;
    /// Ordered categories, empty on any failure
    fn fetch_categories(&self) -> Vec<Category>;
}

/// Fixed in-memory source, filtered by the query
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    pub questions: Vec<Question>,
    pub categories: Vec<Category>,
}

impl StaticQuestionSource {
    pub fn new(questions: Vec<Question>, categories: Vec<Category>) -> Self {
        Self {
            questions,
            categories,
        }
    }
}

impl QuestionSource for StaticQuestionSource {
    fn fetch_questions(&self, query: &QuestionQuery) -> Vec<Question> {
        let category_name = query
            .category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str());

        self.questions
            .iter()
            .filter(|q| category_name.is_none_or(|name| q.category == name))
            .filter(|q| query.difficulty.is_none_or(|d| q.difficulty == d))
            .filter(|q| query.kind.is_none_or(|k| q.kind == k))
            .take(query.amount as usize)
            .cloned()
            .collect()
    }

    fn fetch_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let base = crate::consts::OPENTDB_BASE_URL;
        assert_eq!(
            QuestionQuery::new(10).to_url(base),
            "https://opentdb.com/api.php?amount=10"
        );
        let query = QuestionQuery {
            amount: 5,
            category_id: Some(9),
            difficulty: Some(Difficulty::Hard),
            kind: Some(QuestionType::Boolean),
        };
        assert_eq!(
            query.to_url(base),
            "https://opentdb.com/api.php?amount=5&category=9&difficulty=hard&type=boolean"
        );
    }

    #[test]
    fn test_static_source_filters() {
        let q = |id: &str, category: &str, difficulty| Question {
            id: id.into(),
            category: category.into(),
            kind: QuestionType::Multiple,
            difficulty,
            question: id.into(),
            correct_answer: "a".into(),
            incorrect_answers: vec!["b".into()],
            all_answers: vec!["a".into(), "b".into()],
        };
        let source = StaticQuestionSource::new(
            vec![
                q("1", "Art", Difficulty::Easy),
                q("2", "Art", Difficulty::Hard),
                q("3", "Film", Difficulty::Easy),
            ],
            vec![
                Category {
                    id: 1,
                    name: "Art".into(),
                },
                Category {
                    id: 2,
                    name: "Film".into(),
                },
            ],
        );

        let all = source.fetch_questions(&QuestionQuery::new(10));
        assert_eq!(all.len(), 3);

        let query = QuestionQuery {
            category_id: Some(1),
            difficulty: Some(Difficulty::Easy),
            ..QuestionQuery::new(10)
        };
        let ids: Vec<_> = source
            .fetch_questions(&query)
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, ["1"]);
        assert_eq!(source.fetch_questions(&QuestionQuery::new(1)).len(), 1);
    }
}
