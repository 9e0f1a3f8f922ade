//! One quiz attempt over a fixed question list

use std::rc::Rc;

use super::state::{Progress, QuizPhase, QuizState};
use crate::model::{Question, QuestionOutcome, QuizResult, percent_half_up};
use crate::observe::{Observable, ObserverId};
use crate::platform::Clock;
use crate::stats::StatsStore;

/// Invalid use of the quiz state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot start a quiz without questions")]
    EmptyQuestionSet,
    #[error("no active quiz (phase: {0:?})")]
    NotActive(QuizPhase),
}

pub struct QuizSession {
    state: Observable<QuizState>,
    clock: Rc<dyn Clock>,
}

impl QuizSession {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Observable::new(QuizState::default()),
            clock,
        }
    }

    pub fn state(&self) -> &QuizState {
        self.state.get()
    }

    pub fn phase(&self) -> QuizPhase {
        self.state.get().phase
    }

    /// Begin a new attempt, replacing any current one. An empty list leaves
    /// the session untouched.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<(), SessionError> {
        if questions.is_empty() {
            log::warn!("Refusing to start a quiz with no questions");
            return Err(SessionError::EmptyQuestionSet);
        }
        if self.phase() == QuizPhase::Active {
            log::debug!("Replacing an unfinished quiz");
        }

        let state = QuizState::active(questions, category.into(), difficulty.into());
        log::info!(
            "Quiz started: {} questions, category {:?}, difficulty {:?}",
            state.questions.len(),
            state.category,
            state.difficulty
        );
        self.state.set(state);
        Ok(())
    }

    /// Question at the current index, `None` when idle
    pub fn current_question(&self) -> Option<&Question> {
        self.state.get().current_question()
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.state.get().answer_for(question_id)
    }

    /// Record (or overwrite) the answer to the current question.
    /// Returns false and does nothing unless a quiz is active.
    pub fn submit_answer(&mut self, answer: impl Into<String>) -> bool {
        let state = self.state.get();
        if !state.is_active() {
            return false;
        }
        let Some(id) = state.current_question().map(|q| q.id.clone()) else {
            return false;
        };
        let answer = answer.into();
        self.state.update(|s| {
            s.answers.insert(id, answer);
        });
        true
    }

    /// Move to the next question. False at the last question or when not active.
    pub fn advance(&mut self) -> bool {
        let state = self.state.get();
        if !state.is_active() || state.current_index + 1 >= state.questions.len() {
            return false;
        }
        self.state.update(|s| s.current_index += 1);
        true
    }

    /// Move to the previous question. False at the first question or when not active.
    pub fn retreat(&mut self) -> bool {
        let state = self.state.get();
        if !state.is_active() || state.current_index == 0 {
            return false;
        }
        self.state.update(|s| s.current_index -= 1);
        true
    }

    pub fn all_answered(&self) -> bool {
        self.state.get().all_answered()
    }

    pub fn progress(&self) -> Progress {
        self.state.get().progress()
    }

    /// Score the attempt, append the result to `stats`, and complete the session.
    ///
    /// Unanswered questions count as an empty (wrong) answer. The result is in
    /// `stats` before this returns.
    pub fn finish(&mut self, stats: &mut StatsStore) -> Result<QuizResult, SessionError> {
        let state = self.state.get();
        if !state.is_active() {
            log::warn!("finish() called with no active quiz ({:?})", state.phase);
            return Err(SessionError::NotActive(state.phase));
        }

        let outcomes: Vec<QuestionOutcome> = state
            .questions
            .iter()
            .map(|q| {
                let user_answer = state.answer_for(&q.id).unwrap_or("").to_string();
                QuestionOutcome {
                    question: q.question.clone(),
                    is_correct: q.is_correct(&user_answer),
                    user_answer,
                    correct_answer: q.correct_answer.clone(),
                }
            })
            .collect();

        let total = outcomes.len() as u32;
        let correct = outcomes.iter().filter(|o| o.is_correct).count() as u32;
        let timestamp = self.clock.now_ms();

        let result = QuizResult {
            id: format!("result-{}", timestamp),
            timestamp,
            category: state.category.clone(),
            difficulty: state.difficulty.clone(),
            total_questions: total,
            correct_answers: correct,
            score: percent_half_up(correct, total),
            questions: outcomes,
        };

        stats.append(result.clone());
        self.state.update(|s| s.phase = QuizPhase::Completed);
        log::info!("Quiz finished: {}/{} ({}%)", correct, total, result.score);

        Ok(result)
    }

    /// Back to idle. Only in-memory attempt data is discarded.
    pub fn reset(&mut self) {
        self.state.set(QuizState::default());
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&QuizState) + 'static) -> ObserverId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.state.unsubscribe(id)
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", self.state.get())
            .finish_non_exhaustive()
    }
}
