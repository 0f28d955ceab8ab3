//! Training flow: mode selection, memorizing, testing and the result screen.

use crate::error::{Result, TrainerError};
use crate::selector::{self, build_options, select_next, ChoiceSet, Selection};
use crate::stats::{compute_summary, SessionTracker, StudySummary};
use crate::store::{KeyValueStorage, WordStore};
use crate::types::{Language, Session, TrainingMode, UserStats, Word};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use uuid::Uuid;

/// Fire-and-forget speech output.
pub trait SpeechOutput {
    fn speak(&self, text: &str, language: Language);
}

/// Where the learner currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingState {
    ModeSelect,
    /// A new word is shown; acknowledging it marks it learned.
    Memorizing { word: Word },
    /// A learned word is tested with multiple choices.
    Testing { word: Word, choices: ChoiceSet },
    Finished { session: Session },
}

impl TrainingState {
    fn describe(&self) -> &'static str {
        match self {
            Self::ModeSelect => "selecting a mode",
            Self::Memorizing { .. } => "memorizing",
            Self::Testing { .. } => "testing",
            Self::Finished { .. } => "showing results",
        }
    }

    /// The word on screen, if any.
    pub fn current_word(&self) -> Option<&Word> {
        match self {
            Self::Memorizing { word } | Self::Testing { word, .. } => Some(word),
            _ => None,
        }
    }
}

/// Result of answering a test question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    /// Word state after the answer was applied.
    pub word: Word,
}

/// Entry point for the presentation layer.
pub struct Trainer<S> {
    store: WordStore<S>,
    state: TrainingState,
    tracker: Option<SessionTracker>,
    rng: StdRng,
    speech: Option<Box<dyn SpeechOutput>>,
}

impl<S: KeyValueStorage> Trainer<S> {
    pub fn new(store: WordStore<S>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Deterministic selection, for tests and replays.
    pub fn with_seed(store: WordStore<S>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: WordStore<S>, rng: StdRng) -> Self {
        Self {
            store,
            state: TrainingState::ModeSelect,
            tracker: None,
            rng,
            speech: None,
        }
    }

    pub fn with_speech(mut self, speech: Box<dyn SpeechOutput>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn store(&self) -> &WordStore<S> {
        &self.store
    }

    pub fn words(&self) -> &[Word] {
        self.store.words()
    }

    pub fn stats(&self) -> &UserStats {
        self.store.stats()
    }

    /// Statistics recomputed from the current collection.
    pub fn summary(&self) -> StudySummary {
        compute_summary(self.store.words(), Utc::now())
    }

    /// Tallies of the running session as (correct, incorrect, learned).
    pub fn session_progress(&self) -> Option<(u32, u32, usize)> {
        self.tracker
            .as_ref()
            .map(|t| (t.correct(), t.incorrect(), t.learned().len()))
    }

    pub fn add_word(&mut self, english: &str, russian: &str) -> Result<Word> {
        self.store.add_word(english, russian)
    }

    /// Edit a word; the screen and its options follow the new texts.
    ///
    /// The edit is committed even when the running session cannot continue
    /// afterwards; the session is then finished and `state()` says so.
    pub fn edit_word(&mut self, id: Uuid, english: &str, russian: &str) -> Result<Word> {
        let word = self.store.edit_word(id, english, russian)?;
        self.refresh_screen(Utc::now());
        Ok(word)
    }

    /// Delete a word; if it is on screen the session moves on.
    ///
    /// Like [`Trainer::edit_word`], a deletion that leaves too few words to
    /// continue still returns the removed word and finishes the session.
    pub fn delete_word(&mut self, id: Uuid) -> Result<Word> {
        let removed = self.store.delete_word(id)?;
        self.refresh_screen(Utc::now());
        Ok(removed)
    }

    /// Speak the word on screen in `language`. Returns whether anything was
    /// handed to the speech output.
    pub fn speak_current(&self, language: Language) -> bool {
        match (&self.speech, self.state.current_word()) {
            (Some(speech), Some(word)) => {
                speech.speak(word.text_in(language), language);
                true
            }
            _ => false,
        }
    }

    pub fn mark_word_as_learned(&mut self, id: Uuid) -> Result<Word> {
        self.store.mark_word_as_learned(id, Utc::now())
    }

    pub fn update_word_performance(&mut self, id: Uuid, correct: bool) -> Result<Word> {
        self.store.update_word_performance(id, correct, Utc::now())
    }

    pub fn get_random_words(&mut self, exclude: &[Uuid], count: usize) -> Vec<Word> {
        self.store.get_random_words(exclude, count, &mut self.rng)
    }

    pub fn next_word_to_learn(&mut self) -> Option<Word> {
        selector::next_word_to_learn(self.store.words(), &mut self.rng).cloned()
    }

    pub fn word_for_review(&mut self) -> Option<Word> {
        let min_pool = self.store.settings().min_review_pool;
        selector::word_for_review(self.store.words(), Utc::now(), min_pool, &mut self.rng).cloned()
    }

    /// Open a session in `mode` and present the first word.
    pub fn start(&mut self, mode: TrainingMode) -> Result<&TrainingState> {
        if !matches!(
            self.state,
            TrainingState::ModeSelect | TrainingState::Finished { .. }
        ) {
            return Err(self.invalid("start a session"));
        }

        let required = self.store.settings().min_choice_words();
        let available = self.store.words().len();
        if available < required {
            return Err(TrainerError::InsufficientWords {
                required,
                available,
            });
        }

        let now = Utc::now();
        tracing::debug!(mode = mode.as_str(), words = available, "starting session");
        self.tracker = Some(SessionTracker::start(mode, now));
        self.advance(now)?;
        Ok(&self.state)
    }

    /// Confirm the word being memorized.
    pub fn acknowledge(&mut self) -> Result<&TrainingState> {
        let id = match &self.state {
            TrainingState::Memorizing { word } => word.id,
            _ => return Err(self.invalid("acknowledge a word")),
        };

        let now = Utc::now();
        self.store.mark_word_as_learned(id, now)?;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.record_learned(id);
        }
        self.advance(now)?;
        Ok(&self.state)
    }

    /// Answer the current test question with one of its options.
    pub fn answer(&mut self, choice: &str) -> Result<AnswerOutcome> {
        let (id, correct, correct_answer) = match &self.state {
            TrainingState::Testing { word, choices } => {
                (word.id, choices.is_correct(choice), choices.correct.clone())
            }
            _ => return Err(self.invalid("answer")),
        };

        let now = Utc::now();
        let word = self.store.update_word_performance(id, correct, now)?;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.record_answer(correct);
        }
        self.advance(now)?;

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            word,
        })
    }

    /// End the running session early.
    pub fn finish(&mut self) -> Result<Session> {
        if self.tracker.is_none() {
            return Err(self.invalid("finish a session"));
        }
        self.finalize(Utc::now())
    }

    /// Leave the current flow, dropping an unfinished session.
    pub fn back_to_menu(&mut self) {
        if self.tracker.take().is_some() {
            tracing::debug!("abandoned unfinished session");
        }
        self.state = TrainingState::ModeSelect;
    }

    fn advance(&mut self, now: DateTime<Utc>) -> Result<()> {
        let Some(mode) = self.tracker.as_ref().map(SessionTracker::mode) else {
            self.state = TrainingState::ModeSelect;
            return Ok(());
        };
        let settings = self.store.settings().clone();
        let words = self.store.words();

        let next = match select_next(words, now, settings.min_review_pool, &mut self.rng) {
            Selection::Memorize(word) => TrainingState::Memorizing { word: word.clone() },
            Selection::Review(word) => {
                match build_options(word, words, mode, settings.distractor_count, &mut self.rng) {
                    Ok(choices) => TrainingState::Testing {
                        word: word.clone(),
                        choices,
                    },
                    Err(err) => {
                        tracing::warn!(error = %err, "cannot build options, ending session");
                        self.finalize(now)?;
                        return Err(err);
                    }
                }
            }
            Selection::Exhausted => {
                self.finalize(now)?;
                return Ok(());
            }
        };

        if mode == TrainingMode::Pronunciation && settings.speech_enabled {
            if let (Some(speech), Some(word)) = (&self.speech, next.current_word()) {
                speech.speak(word.text_in(Language::English), Language::English);
            }
        }
        self.state = next;
        Ok(())
    }

    fn finalize(&mut self, now: DateTime<Utc>) -> Result<Session> {
        let tracker = self
            .tracker
            .take()
            .ok_or_else(|| self.invalid("finish a session"))?;
        let session = tracker.finish(now);
        self.state = TrainingState::Finished {
            session: session.clone(),
        };

        self.store.record_session(&session)?;
        tracing::info!(
            correct = session.correct,
            incorrect = session.incorrect,
            learned = session.learned_word_ids.len(),
            "session finished"
        );
        Ok(session)
    }

    /// Re-sync the word on screen, and its options, with the store.
    fn refresh_screen(&mut self, now: DateTime<Utc>) {
        let Some(id) = self.state.current_word().map(|w| w.id) else {
            return;
        };
        let Some(word) = self.store.word(id).cloned() else {
            if let Err(err) = self.advance(now) {
                tracing::warn!(error = %err, "session ended after deleting the current word");
            }
            return;
        };

        if let TrainingState::Memorizing { .. } = self.state {
            self.state = TrainingState::Memorizing { word };
            return;
        }
        let Some(mode) = self.tracker.as_ref().map(SessionTracker::mode) else {
            return;
        };
        let distractors = self.store.settings().distractor_count;
        match build_options(&word, self.store.words(), mode, distractors, &mut self.rng) {
            Ok(choices) => self.state = TrainingState::Testing { word, choices },
            Err(err) => {
                tracing::warn!(error = %err, "cannot rebuild options, ending session");
                if let Err(err) = self.finalize(now) {
                    tracing::warn!(error = %err, "failed to record session");
                }
            }
        }
    }

    fn invalid(&self, action: &'static str) -> TrainerError {
        TrainerError::InvalidTransition {
            state: self.state.describe(),
            action,
        }
    }
}
