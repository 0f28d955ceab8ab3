//! The word store: single owner of words, stats and settings.

use super::storage::KeyValueStorage;
use crate::error::{Result, StorageError, TrainerError};
use crate::performance::PerformanceModel;
use crate::types::{Session, TrainerSettings, UserStats, Word};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub const WORDS_KEY: &str = "vocab.words";
pub const STATS_KEY: &str = "vocab.stats";
pub const SETTINGS_KEY: &str = "vocab.settings";

/// In-memory word collection mirrored to a storage provider.
///
/// Every mutation computes a new collection, persists it, and only then
/// replaces the in-memory copy.
#[derive(Debug)]
pub struct WordStore<S> {
    storage: S,
    words: Vec<Word>,
    stats: UserStats,
    settings: TrainerSettings,
    model: PerformanceModel,
}

impl<S: KeyValueStorage> WordStore<S> {
    /// Load persisted state; missing or malformed records fall back to
    /// defaults.
    pub fn load(storage: S) -> Self {
        let mut words: Vec<Word> = read_record(&storage, WORDS_KEY).unwrap_or_default();
        for word in &mut words {
            word.difficulty = word.difficulty.clamp(
                crate::types::MIN_DIFFICULTY,
                crate::types::MAX_DIFFICULTY,
            );
        }
        let stats = read_record(&storage, STATS_KEY).unwrap_or_default();
        let settings = read_record(&storage, SETTINGS_KEY).unwrap_or_default();

        tracing::debug!(words = words.len(), "loaded word store");

        Self {
            storage,
            words,
            stats,
            settings,
            model: PerformanceModel::default(),
        }
    }

    /// Replace the performance model used for answers.
    pub fn with_model(mut self, model: PerformanceModel) -> Self {
        self.model = model;
        self
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, id: Uuid) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn settings(&self) -> &TrainerSettings {
        &self.settings
    }

    pub fn model(&self) -> &PerformanceModel {
        &self.model
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Persist a full replacement word collection.
    pub fn save_words(&mut self, words: Vec<Word>) -> Result<()> {
        write_record(&mut self.storage, WORDS_KEY, &words)?;
        self.words = words;
        Ok(())
    }

    /// Persist a replacement stats record.
    pub fn save_stats(&mut self, stats: UserStats) -> Result<()> {
        write_record(&mut self.storage, STATS_KEY, &stats)?;
        self.stats = stats;
        Ok(())
    }

    /// Persist replacement settings.
    pub fn save_settings(&mut self, settings: TrainerSettings) -> Result<()> {
        write_record(&mut self.storage, SETTINGS_KEY, &settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Add a new unlearned word.
    pub fn add_word(&mut self, english: &str, russian: &str) -> Result<Word> {
        let (english, russian) = validate(english, russian)?;
        let word = Word::new(english, russian);

        let mut words = self.words.clone();
        words.push(word.clone());
        self.save_words(words)?;

        tracing::debug!(word = %word.id, "added word");
        Ok(word)
    }

    /// Change a word's texts, keeping its learning state.
    pub fn edit_word(&mut self, id: Uuid, english: &str, russian: &str) -> Result<Word> {
        let (english, russian) = validate(english, russian)?;
        self.replace_word(id, |word| Word {
            english,
            russian,
            ..word.clone()
        })
    }

    /// Remove a word; returns the removed record.
    pub fn delete_word(&mut self, id: Uuid) -> Result<Word> {
        let index = self.index_of(id)?;
        let mut words = self.words.clone();
        let removed = words.remove(index);
        self.save_words(words)?;

        tracing::debug!(word = %id, "deleted word");
        Ok(removed)
    }

    /// Mark a word as memorized and schedule its first review.
    pub fn mark_word_as_learned(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Word> {
        let model = self.model.clone();
        self.replace_word(id, |word| model.mark_learned(word, now))
    }

    /// Record an answer and reschedule the word.
    pub fn update_word_performance(
        &mut self,
        id: Uuid,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<Word> {
        let model = self.model.clone();
        self.replace_word(id, |word| model.apply_answer(word, correct, now))
    }

    /// Up to `count` random words whose ids are not in `exclude`.
    pub fn get_random_words<R: Rng + ?Sized>(
        &self,
        exclude: &[Uuid],
        count: usize,
        rng: &mut R,
    ) -> Vec<Word> {
        crate::selector::random_words(&self.words, exclude, count, rng)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fold a finished session into the stats record and persist it.
    pub fn record_session(&mut self, session: &Session) -> Result<UserStats> {
        let mut stats = self.stats.clone();
        stats.record_session(session, &self.words);
        self.save_stats(stats.clone())?;
        Ok(stats)
    }

    fn index_of(&self, id: Uuid) -> Result<usize> {
        self.words
            .iter()
            .position(|w| w.id == id)
            .ok_or(TrainerError::WordNotFound(id))
    }

    fn replace_word<F>(&mut self, id: Uuid, update: F) -> Result<Word>
    where
        F: FnOnce(&Word) -> Word,
    {
        let index = self.index_of(id)?;
        let updated = update(&self.words[index]);

        let mut words = self.words.clone();
        words[index] = updated.clone();
        self.save_words(words)?;
        Ok(updated)
    }
}

fn validate(english: &str, russian: &str) -> Result<(String, String)> {
    let english = english.trim();
    let russian = russian.trim();
    if english.is_empty() {
        return Err(TrainerError::EmptyField { field: "english" });
    }
    if russian.is_empty() {
        return Err(TrainerError::EmptyField { field: "russian" });
    }
    Ok((english.to_string(), russian.to_string()))
}

fn read_record<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: KeyValueStorage + ?Sized,
    T: DeserializeOwned,
{
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding malformed stored record");
            None
        }
    }
}

fn write_record<S, T>(storage: &mut S, key: &str, value: &T) -> std::result::Result<(), StorageError>
where
    S: KeyValueStorage + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}
