//! Difficulty and review-time adaptation.
//!
//! A deliberately simple heuristic: each answer nudges the word's difficulty
//! and pushes its next review out in proportion to the word's accuracy.

use crate::types::{Word, MAX_DIFFICULTY, MIN_DIFFICULTY};
use chrono::{DateTime, Duration, Utc};

/// Performance model with configurable parameters.
#[derive(Debug, Clone)]
pub struct PerformanceModel {
    /// Difficulty removed by a correct answer.
    pub correct_step: f64,
    /// Difficulty added by an incorrect answer.
    pub incorrect_step: f64,
    pub min_difficulty: f64,
    pub max_difficulty: f64,
    pub base_interval: Duration,
    /// Upper bound of the interval multiplier after a correct answer.
    pub max_multiplier: f64,
    /// Interval multiplier after an incorrect answer.
    pub incorrect_multiplier: f64,
    /// Delay before a freshly memorized word is first reviewed.
    pub first_review_delay: Duration,
}

impl Default for PerformanceModel {
    fn default() -> Self {
        Self {
            correct_step: 0.1,
            incorrect_step: 0.2,
            min_difficulty: MIN_DIFFICULTY,
            max_difficulty: MAX_DIFFICULTY,
            base_interval: Duration::days(1),
            max_multiplier: 7.0,
            incorrect_multiplier: 0.5,
            first_review_delay: Duration::hours(24),
        }
    }
}

impl PerformanceModel {
    /// State of a word after the learner acknowledged memorizing it.
    pub fn mark_learned(&self, word: &Word, now: DateTime<Utc>) -> Word {
        Word {
            is_learned: true,
            last_reviewed: Some(now),
            next_review: Some(now + self.first_review_delay),
            ..word.clone()
        }
    }

    /// State of a word after one answer.
    pub fn apply_answer(&self, word: &Word, correct: bool, now: DateTime<Utc>) -> Word {
        let (correct_answers, incorrect_answers) = if correct {
            (word.correct_answers.saturating_add(1), word.incorrect_answers)
        } else {
            (word.correct_answers, word.incorrect_answers.saturating_add(1))
        };

        let difficulty = self.next_difficulty(word.difficulty, correct);
        let accuracy = accuracy(correct_answers, incorrect_answers);
        let next_review = now + self.interval(correct, accuracy);

        Word {
            correct_answers,
            incorrect_answers,
            difficulty,
            last_reviewed: Some(now),
            next_review: Some(next_review),
            ..word.clone()
        }
    }

    /// Difficulty after an answer, kept inside the model's bounds.
    pub fn next_difficulty(&self, difficulty: f64, correct: bool) -> f64 {
        let moved = if correct {
            difficulty - self.correct_step
        } else {
            difficulty + self.incorrect_step
        };
        moved.clamp(self.min_difficulty, self.max_difficulty)
    }

    /// Interval multiplier for an answer given the post-answer accuracy.
    pub fn multiplier(&self, correct: bool, accuracy: f64) -> f64 {
        if correct {
            (1.0 + accuracy * 6.0).min(self.max_multiplier)
        } else {
            self.incorrect_multiplier
        }
    }

    /// Time until the next review.
    pub fn interval(&self, correct: bool, accuracy: f64) -> Duration {
        let millis = self.base_interval.num_milliseconds() as f64 * self.multiplier(correct, accuracy);
        Duration::milliseconds(millis.round() as i64)
    }
}

fn accuracy(correct: u32, incorrect: u32) -> f64 {
    let total = f64::from(correct) + f64::from(incorrect);
    if total == 0.0 {
        0.0
    } else {
        f64::from(correct) / total
    }
}
