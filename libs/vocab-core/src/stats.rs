//! Session tallies and aggregate statistics.

use crate::types::{Session, TrainingMode, UserStats, Word};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Counters for one training run.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    id: Uuid,
    mode: TrainingMode,
    started_at: DateTime<Utc>,
    correct: u32,
    incorrect: u32,
    learned: Vec<Uuid>,
}

impl SessionTracker {
    pub fn start(mode: TrainingMode, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            started_at: now,
            correct: 0,
            incorrect: 0,
            learned: Vec::new(),
        }
    }

    pub fn record_answer(&mut self, correct: bool) {
        if correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    pub fn record_learned(&mut self, word_id: Uuid) {
        if !self.learned.contains(&word_id) {
            self.learned.push(word_id);
        }
    }

    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    pub fn learned(&self) -> &[Uuid] {
        &self.learned
    }

    /// Close the run into a session record.
    pub fn finish(self, now: DateTime<Utc>) -> Session {
        Session {
            id: self.id,
            mode: self.mode,
            started_at: self.started_at,
            ended_at: now.max(self.started_at),
            correct: self.correct,
            incorrect: self.incorrect,
            learned_word_ids: self.learned,
        }
    }
}

/// Statistics derived from the word collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySummary {
    pub total_words: usize,
    pub learned_words: usize,
    pub due_words: usize,
    pub total_correct: u64,
    pub total_attempts: u64,
    /// Percentage in 0..=100.
    pub accuracy_percent: u32,
    pub streak_days: u32,
}

/// Recompute summary statistics from the current collection.
pub fn compute_summary(words: &[Word], now: DateTime<Utc>) -> StudySummary {
    let total_correct: u64 = words.iter().map(|w| u64::from(w.correct_answers)).sum();
    let total_attempts: u64 = words
        .iter()
        .map(|w| u64::from(w.correct_answers) + u64::from(w.incorrect_answers))
        .sum();

    StudySummary {
        total_words: words.len(),
        learned_words: words.iter().filter(|w| w.is_learned).count(),
        due_words: words.iter().filter(|w| w.is_learned && w.is_due(now)).count(),
        total_correct,
        total_attempts,
        accuracy_percent: accuracy_percent(total_correct, total_attempts),
        streak_days: review_streak(words, now.date_naive()),
    }
}

/// `round(100 * correct / attempts)`, 0 without attempts.
pub fn accuracy_percent(correct: u64, attempts: u64) -> u32 {
    if attempts == 0 {
        return 0;
    }
    (100.0 * correct as f64 / attempts as f64).round() as u32
}

/// Consecutive days with at least one review, counting back from `today`.
///
/// A day without reviews so far does not break a streak that ended
/// yesterday.
pub fn review_streak(words: &[Word], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = words
        .iter()
        .filter_map(|w| w.last_reviewed)
        .map(|at| at.date_naive())
        .collect();

    let mut streak = 0;
    let mut current = today;
    if !days.contains(&current) {
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => return 0,
        }
    }

    while days.contains(&current) {
        streak += 1;
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
    }
    streak
}

impl UserStats {
    /// Fold a finished session into the aggregate counters.
    pub fn record_session(&mut self, session: &Session, words: &[Word]) {
        let session_day = session.ended_at.date_naive();

        self.streak_days = match self.last_session_date.map(|at| at.date_naive()) {
            Some(last) if last == session_day => self.streak_days.max(1),
            Some(last) if last.succ_opt() == Some(session_day) => self.streak_days.saturating_add(1),
            _ => 1,
        };

        let summary = compute_summary(words, session.ended_at);
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.total_time_spent = self.total_time_spent.saturating_add(session.duration_secs());
        self.last_session_date = Some(session.ended_at);
        self.total_words_learned = summary.learned_words;
        self.average_accuracy = summary.accuracy_percent;
    }
}
