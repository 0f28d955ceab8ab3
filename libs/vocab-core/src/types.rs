//! Core types for the vocabulary trainer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest difficulty a word can reach.
pub const MIN_DIFFICULTY: f64 = 0.1;

/// Highest difficulty a word can reach; also the difficulty of a new word.
pub const MAX_DIFFICULTY: f64 = 1.0;

/// An English/Russian translation pair with its learning state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub english: String,
    pub russian: String,
    pub is_learned: bool,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub difficulty: f64,
    pub next_review: Option<DateTime<Utc>>,
}

impl Word {
    /// Create a fresh, unlearned word.
    pub fn new(english: impl Into<String>, russian: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            english: english.into(),
            russian: russian.into(),
            is_learned: false,
            correct_answers: 0,
            incorrect_answers: 0,
            last_reviewed: None,
            difficulty: MAX_DIFFICULTY,
            next_review: None,
        }
    }

    /// Total number of answers given for this word.
    pub fn attempts(&self) -> u32 {
        self.correct_answers.saturating_add(self.incorrect_answers)
    }

    /// Share of correct answers, 0.0 when the word was never answered.
    pub fn accuracy(&self) -> f64 {
        let correct = f64::from(self.correct_answers);
        let total = correct + f64::from(self.incorrect_answers);
        if total == 0.0 {
            0.0
        } else {
            correct / total
        }
    }

    /// Whether the word's review time has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.is_some_and(|at| at <= now)
    }

    /// The text shown as an answer option in the given mode.
    pub fn answer_text(&self, mode: TrainingMode) -> &str {
        match mode {
            TrainingMode::Translation => &self.russian,
            TrainingMode::Pronunciation => &self.english,
        }
    }

    /// The word's text in one of its two languages.
    pub fn text_in(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Russian => &self.russian,
        }
    }
}

/// Multiple-choice training modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Show the English word, pick the Russian translation.
    Translation,
    /// Hear the English word, pick its spelling.
    Pronunciation,
}

impl Default for TrainingMode {
    fn default() -> Self {
        Self::Translation
    }
}

impl TrainingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Pronunciation => "pronunciation",
        }
    }
}

/// Language tag handed to the speech collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "ru-RU")]
    Russian,
}

impl Language {
    /// BCP 47 tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Russian => "ru-RU",
        }
    }
}

/// Aggregate counters kept across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_words_learned: usize,
    pub total_sessions: u32,
    /// Percentage in 0..=100.
    pub average_accuracy: u32,
    pub streak_days: u32,
    pub last_session_date: Option<DateTime<Utc>>,
    /// Seconds spent in finished sessions.
    pub total_time_spent: i64,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_words_learned: 0,
            total_sessions: 0,
            average_accuracy: 0,
            streak_days: 0,
            last_session_date: None,
            total_time_spent: 0,
        }
    }
}

/// One finished training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub mode: TrainingMode,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub correct: u32,
    pub incorrect: u32,
    pub learned_word_ids: Vec<Uuid>,
}

impl Session {
    pub fn total_answers(&self) -> u32 {
        self.correct.saturating_add(self.incorrect)
    }

    /// Whole seconds between start and end, never negative.
    pub fn duration_secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds().max(0)
    }
}

/// Trainer configuration, persisted next to the words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    /// Learned words required before reviews are offered.
    pub min_review_pool: usize,
    /// Wrong options shown next to the correct answer.
    pub distractor_count: usize,
    /// Speak words aloud in pronunciation mode.
    pub speech_enabled: bool,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            min_review_pool: 4,
            distractor_count: 3,
            speech_enabled: true,
        }
    }
}

impl TrainerSettings {
    /// Words needed in the store before a choice-based session can start.
    pub fn min_choice_words(&self) -> usize {
        self.distractor_count.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_word_starts_unlearned() {
        let word = Word::new("Apple", "Яблоко");
        assert!(!word.is_learned);
        assert_eq!(word.difficulty, MAX_DIFFICULTY);
        assert_eq!(word.attempts(), 0);
        assert!(word.last_reviewed.is_none());
        assert!(word.next_review.is_none());
    }

    #[test]
    fn accuracy_without_attempts_is_zero() {
        let word = Word::new("Cat", "Кошка");
        assert_eq!(word.accuracy(), 0.0);
    }

    #[test]
    fn accuracy_counts_correct_share() {
        let word = Word {
            correct_answers: 3,
            incorrect_answers: 1,
            ..Word::new("Dog", "Собака")
        };
        assert_eq!(word.accuracy(), 0.75);
    }

    #[test]
    fn due_only_after_next_review() {
        let now = Utc::now();
        let mut word = Word::new("House", "Дом");
        assert!(!word.is_due(now));

        word.next_review = Some(now + Duration::hours(1));
        assert!(!word.is_due(now));

        word.next_review = Some(now);
        assert!(word.is_due(now));
    }

    #[test]
    fn answer_text_follows_mode() {
        let word = Word::new("Water", "Вода");
        assert_eq!(word.answer_text(TrainingMode::Translation), "Вода");
        assert_eq!(word.answer_text(TrainingMode::Pronunciation), "Water");
        assert_eq!(word.text_in(Language::English), "Water");
        assert_eq!(word.text_in(Language::Russian), "Вода");
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings: TrainerSettings = serde_json::from_str(r#"{"speech_enabled":false}"#).unwrap();
        assert_eq!(settings.min_review_pool, 4);
        assert_eq!(settings.distractor_count, 3);
        assert!(!settings.speech_enabled);
    }

    #[test]
    fn language_tags() {
        assert_eq!(Language::English.tag(), "en-US");
        assert_eq!(serde_json::to_string(&Language::Russian).unwrap(), "\"ru-RU\"");
    }
}
