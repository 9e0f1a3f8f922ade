//! Quiz history and aggregate statistics
//!
//! History is append-only, newest first, and persisted in full on every
//! change. [`UserStats`] is never stored; it is recomputed from the history
//! on each call to [`StatsStore::aggregate`].

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta};

use crate::consts::{NO_CATEGORY, STATS_KEY};
use crate::model::{DifficultyCounts, QuizResult, UserStats};
use crate::observe::ObserverId;
use crate::persistence::{Diagnostic, Persisted, SharedStorage};

#[derive(Debug)]
pub struct StatsStore {
    cell: Persisted<Vec<QuizResult>>,
}

impl StatsStore {
    /// Load history from storage; missing or corrupt data starts empty
    pub fn load(storage: SharedStorage) -> Self {
        let (cell, _) = Persisted::load_or(STATS_KEY, storage, Vec::new);
        log::info!("Loaded {} quiz results", cell.get().len());
        Self { cell }
    }

    /// Full history, newest first
    pub fn results(&self) -> &[QuizResult] {
        self.cell.get()
    }

    /// The `limit` most recent results
    pub fn recent(&self, limit: usize) -> &[QuizResult] {
        let results = self.cell.get();
        &results[..limit.min(results.len())]
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }

    /// Record a finished quiz at the front of the history
    pub fn append(&mut self, result: QuizResult) {
        log::info!(
            "Recording result {} ({}/{}, {}%)",
            result.id,
            result.correct_answers,
            result.total_questions,
            result.score
        );
        self.cell.update(|results| results.insert(0, result));
    }

    pub fn get_by_id(&self, id: &str) -> Option<&QuizResult> {
        self.cell.get().iter().find(|r| r.id == id)
    }

    /// Summary over the current history
    pub fn aggregate(&self) -> UserStats {
        aggregate(self.cell.get())
    }

    /// Drop all history and persist the empty state
    pub fn clear(&mut self) {
        self.cell.set(Vec::new());
        log::info!("Quiz history cleared");
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Vec<QuizResult>) + 'static) -> ObserverId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.cell.diagnostics()
    }
}

/// Compute [`UserStats`] over `results` (newest first)
///
/// The favorite category is the first one to reach the highest count when
/// scanning in stored order. Difficulty labels outside easy/medium/hard are
/// not counted in any bucket.
pub fn aggregate(results: &[QuizResult]) -> UserStats {
    if results.is_empty() {
        return UserStats::default();
    }

    let mut total_questions = 0u64;
    let mut total_correct = 0u64;
    let mut best_score = 0u32;
    let mut by_difficulty = DifficultyCounts::default();
    let mut category_counts: HashMap<&str, u32> = HashMap::new();
    let mut favorite: Option<(&str, u32)> = None;

    for result in results {
        total_questions += u64::from(result.total_questions);
        total_correct += u64::from(result.correct_answers);
        best_score = best_score.max(result.score);
        by_difficulty.record(&result.difficulty);

        let count = category_counts.entry(result.category.as_str()).or_insert(0);
        *count += 1;
        if favorite.is_none_or(|(_, best)| *count > best) {
            favorite = Some((result.category.as_str(), *count));
        }
    }

    let average_score = if total_questions > 0 {
        let raw = total_correct as f64 * 100.0 / total_questions as f64;
        (raw * 100.0).round() / 100.0
    } else {
        0.0
    };

    UserStats {
        total_quizzes: results.len() as u32,
        total_questions,
        total_correct,
        average_score,
        best_score,
        favorite_category: favorite
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| NO_CATEGORY.to_string()),
        quizzes_by_difficulty: by_difficulty,
    }
}

/// Format a result timestamp relative to `now_ms`
///
/// Anything a week old or more is shown as a short UTC date (`m/d/yy`).
/// Timestamps in the future count as "Just now".
pub fn format_relative(timestamp_ms: u64, now_ms: u64) -> String {
    let elapsed = i64::try_from(now_ms.saturating_sub(timestamp_ms))
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .unwrap_or(TimeDelta::MAX);

    match (elapsed.num_days(), elapsed.num_hours(), elapsed.num_minutes()) {
        (0, 0, 0) => "Just now".to_string(),
        (0, 0, 1) => "1 min ago".to_string(),
        (0, 0, mins) => format!("{mins} mins ago"),
        (0, 1, _) => "1 hour ago".to_string(),
        (0, hours, _) => format!("{hours} hours ago"),
        (1, _, _) => "Yesterday".to_string(),
        (days @ 2..7, _, _) => format!("{days} days ago"),
        _ => short_date(timestamp_ms),
    }
}

fn short_date(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|date| date.format("%-m/%-d/%y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistOp;
    use crate::platform::MemoryStorage;
    use std::rc::Rc;

    fn result(id: &str, category: &str, difficulty: &str, correct: u32, total: u32) -> QuizResult {
        QuizResult {
            id: id.to_string(),
            timestamp: 1_700_000_000_000,
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            total_questions: total,
            correct_answers: correct,
            score: crate::model::percent_half_up(correct, total),
            questions: Vec::new(),
        }
    }

    #[test]
    fn test_empty_aggregate() {
        let store = StatsStore::load(Rc::new(MemoryStorage::new()));
        let stats = store.aggregate();
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.best_score, 0);
        assert_eq!(stats.favorite_category, "N/A");
        assert_eq!(stats.quizzes_by_difficulty, DifficultyCounts::default());
    }

    #[test]
    fn test_average_is_question_weighted() {
        let mut store = StatsStore::load(Rc::new(MemoryStorage::new()));
        store.append(result("r1", "Science", "easy", 8, 10));
        store.append(result("r2", "Science", "hard", 5, 10));
        let stats = store.aggregate();
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.total_questions, 20);
        assert_eq!(stats.total_correct, 13);
        assert_eq!(stats.average_score, 65.0);
        assert_eq!(stats.best_score, 80);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let stats = aggregate(&[result("r1", "Art", "easy", 1, 3)]);
        assert_eq!(stats.average_score, 33.33);
        let stats = aggregate(&[result("r1", "Art", "easy", 2, 3)]);
        assert_eq!(stats.average_score, 66.67);
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut store = StatsStore::load(Rc::new(MemoryStorage::new()));
        store.append(result("old", "A", "easy", 1, 1));
        store.append(result("new", "B", "easy", 1, 1));
        assert_eq!(store.results()[0].id, "new");
        assert_eq!(store.recent(1).len(), 1);
        assert_eq!(store.recent(10).len(), 2);
        assert_eq!(store.get_by_id("old").map(|r| r.category.as_str()), Some("A"));
        assert!(store.get_by_id("missing").is_none());
    }

    #[test]
    fn test_favorite_category_first_to_reach_max() {
        // Stored order (newest first): A, B, B, A. B reaches 2 first.
        let history = [
            result("1", "A", "easy", 1, 1),
            result("2", "B", "easy", 1, 1),
            result("3", "B", "easy", 1, 1),
            result("4", "A", "easy", 1, 1),
        ];
        assert_eq!(aggregate(&history).favorite_category, "B");

        let history = [
            result("1", "Music", "easy", 1, 1),
            result("2", "Film", "easy", 1, 1),
        ];
        assert_eq!(aggregate(&history).favorite_category, "Music");
    }

    #[test]
    fn test_unknown_difficulty_excluded_from_buckets() {
        let history = [
            result("1", "A", "easy", 1, 2),
            result("2", "A", "any", 1, 2),
            result("3", "A", "medium", 1, 2),
            result("4", "A", "", 1, 2),
        ];
        let stats = aggregate(&history);
        assert_eq!(stats.total_quizzes, 4);
        assert_eq!(
            stats.quizzes_by_difficulty,
            DifficultyCounts {
                easy: 1,
                medium: 1,
                hard: 0,
            }
        );
    }

    #[test]
    fn test_clear_persists_empty_history() {
        let storage = MemoryStorage::new();
        let mut store = StatsStore::load(Rc::new(storage.clone()));
        store.append(result("r1", "A", "easy", 1, 1));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(storage.raw(STATS_KEY).as_deref(), Some("[]"));
        assert!(StatsStore::load(Rc::new(storage)).is_empty());
    }

    #[test]
    fn test_history_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let mut store = StatsStore::load(Rc::new(storage.clone()));
        store.append(result("r1", "A", "weird", 3, 4));
        store.append(result("r2", "B", "hard", 0, 4));
        let reloaded = StatsStore::load(Rc::new(storage));
        assert_eq!(reloaded.results(), store.results());
    }

    #[test]
    fn test_format_relative() {
        let now = 1_700_000_000_000;
        assert_eq!(format_relative(now - 5_000, now), "Just now");
        assert_eq!(format_relative(now - 60_000, now), "1 min ago");
        assert_eq!(format_relative(now - 5 * 60_000, now), "5 mins ago");
        assert_eq!(format_relative(now - 3_600_000, now), "1 hour ago");
        assert_eq!(format_relative(now - 86_400_000, now), "Yesterday");
        assert_eq!(format_relative(now - 3 * 86_400_000, now), "3 days ago");
        // 2023-11-14T22:13:20Z
        assert_eq!(format_relative(now, now + 30 * 86_400_000), "11/14/23");
        assert_eq!(format_relative(now + 1_000, now), "Just now");
        assert_eq!(format_relative(now - 6 * 86_400_000, now), "6 days ago");
        // 2023-11-07T22:13:20Z
        assert_eq!(format_relative(now - 7 * 86_400_000, now), "11/7/23");
    }

    #[test]
    fn test_aggregate_totals_beyond_u32() {
        let storage = MemoryStorage::new();
        let history = vec![
            result("big", "A", "easy", 4_294_967_295, 4_294_967_295),
            result("small", "A", "easy", 1, 1),
        ];
        let json = serde_json::to_string(&history).unwrap();
        storage.put_raw(STATS_KEY, &json);

        let store = StatsStore::load(Rc::new(storage));
        assert_eq!(store.len(), 2);
        let stats = store.aggregate();
        assert_eq!(stats.total_questions, 4_294_967_296);
        assert_eq!(stats.total_correct, 4_294_967_296);
        assert_eq!(stats.average_score, 100.0);
    }

    #[test]
    fn test_append_survives_write_failure() {
        let storage = MemoryStorage::new();
        let mut store = StatsStore::load(Rc::new(storage.clone()));
        storage.set_fail_writes(true);
        store.append(result("r1", "A", "easy", 1, 2));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id("r1").map(|r| r.score), Some(50));
        assert!(storage.raw(STATS_KEY).is_none());
        assert_eq!(store.diagnostics().len(), 1);
        assert_eq!(store.diagnostics()[0].op, PersistOp::Save);
        assert_eq!(store.diagnostics()[0].key, STATS_KEY);
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let storage = MemoryStorage::new();
        storage.put_raw(STATS_KEY, "[]");
        storage.set_fail_reads(true);
        let store = StatsStore::load(Rc::new(storage));
        assert!(store.is_empty());
        assert_eq!(store.diagnostics()[0].op, PersistOp::Load);
    }
}
