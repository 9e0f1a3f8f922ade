//! Quiz attempt state
//!
//! Plain snapshot broadcast to observers after every change.

use std::collections::HashMap;

use crate::model::{Question, percent_half_up};

/// Current phase of a quiz attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    /// No attempt in progress
    #[default]
    Idle,
    /// Accepting answers; index is within bounds
    Active,
    /// Finished; exactly one result was produced
    Completed,
}

/// Position within the attempt, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    /// Rounded half-up, 0 when there are no questions
    pub percentage: u32,
}

/// Complete attempt state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    /// Fixed snapshot of the questions for this attempt
    pub questions: Vec<Question>,
    pub current_index: usize,
    /// Question id -> submitted answer
    pub answers: HashMap<String, String>,
    pub phase: QuizPhase,
    pub category: String,
    pub difficulty: String,
}

impl QuizState {
    /// Fresh active attempt over `questions`
    pub fn active(questions: Vec<Question>, category: String, difficulty: String) -> Self {
        Self {
            questions,
            current_index: 0,
            answers: HashMap::new(),
            phase: QuizPhase::Active,
            category,
            difficulty,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == QuizPhase::Active
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == QuizPhase::Idle {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Answer count equals question count (ids are unique)
    pub fn all_answered(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn progress(&self) -> Progress {
        let total = self.questions.len();
        let current = self.current_index + 1;
        let percentage = if total > 0 {
            percent_half_up(current as u32, total as u32)
        } else {
            0
        };
        Progress {
            current,
            total,
            percentage,
        }
    }
}
