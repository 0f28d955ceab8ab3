//! Word selection for memorizing and review, and multiple-choice options.

use crate::error::{Result, TrainerError};
use crate::types::{TrainingMode, Word};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// What to present next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// An unlearned word to memorize; no options are shown.
    Memorize(&'a Word),
    /// A learned word to test.
    Review(&'a Word),
    /// Nothing left to present; the session should end.
    Exhausted,
}

/// Options for one multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSet {
    pub correct: String,
    /// Correct answer plus distractors, shuffled.
    pub options: Vec<String>,
}

impl ChoiceSet {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct
    }
}

/// Pick the next word: unlearned words first, then reviews.
pub fn select_next<'a, R: Rng + ?Sized>(
    words: &'a [Word],
    now: DateTime<Utc>,
    min_review_pool: usize,
    rng: &mut R,
) -> Selection<'a> {
    if let Some(word) = next_word_to_learn(words, rng) {
        tracing::debug!(word = %word.id, "selected word to memorize");
        return Selection::Memorize(word);
    }
    match word_for_review(words, now, min_review_pool, rng) {
        Some(word) => {
            tracing::debug!(word = %word.id, difficulty = word.difficulty, "selected word to review");
            Selection::Review(word)
        }
        None => Selection::Exhausted,
    }
}

/// Uniform random pick among unlearned words.
pub fn next_word_to_learn<'a, R: Rng + ?Sized>(words: &'a [Word], rng: &mut R) -> Option<&'a Word> {
    let unlearned: Vec<&Word> = words.iter().filter(|w| !w.is_learned).collect();
    unlearned.choose(rng).copied()
}

/// Pick a learned word to review.
///
/// Requires at least `min_pool` learned words. Due words win, chosen
/// uniformly; otherwise every learned word competes with weight
/// `ceil(difficulty * 10)`.
pub fn word_for_review<'a, R: Rng + ?Sized>(
    words: &'a [Word],
    now: DateTime<Utc>,
    min_pool: usize,
    rng: &mut R,
) -> Option<&'a Word> {
    let learned: Vec<&Word> = words.iter().filter(|w| w.is_learned).collect();
    if learned.is_empty() || learned.len() < min_pool {
        return None;
    }

    let due: Vec<&Word> = learned.iter().copied().filter(|w| w.is_due(now)).collect();
    if let Some(word) = due.choose(rng) {
        return Some(*word);
    }

    weighted_choice(&learned, |w| f64::from(difficulty_weight(w)), rng).copied()
}

/// Integer review weight derived from difficulty, 1..=10.
///
/// This is `ceil(difficulty * 10)` computed with a `1e-9` tolerance, so a
/// difficulty that drifted just above a tenth through repeated steps keeps
/// the weight of that tenth: `0.8 - 0.1` (0.7000000000000001) weighs 7,
/// where the bare formula would give 8.
pub fn difficulty_weight(word: &Word) -> u32 {
    let scaled = (word.difficulty * 10.0 - 1e-9).ceil();
    scaled.clamp(1.0, 10.0) as u32
}

/// Weight favouring poorly answered words; untested words weigh 1.
pub fn accuracy_weight(word: &Word) -> f64 {
    if word.attempts() == 0 {
        1.0
    } else {
        (1.0 - word.accuracy()).max(0.1)
    }
}

/// Weighted pick by accuracy: the lower a word's accuracy, the likelier.
pub fn pick_by_accuracy<'a, R: Rng + ?Sized>(words: &'a [Word], rng: &mut R) -> Option<&'a Word> {
    weighted_choice(words, accuracy_weight, rng)
}

/// Cumulative-weight draw: subtract each weight from `random * total`
/// until the remainder is no longer positive.
pub fn weighted_choice<'a, T, R, F>(items: &'a [T], weight: F, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    let total: f64 = items.iter().map(&weight).sum();
    if items.is_empty() || total <= 0.0 {
        return items.first();
    }

    let mut remaining = rng.gen::<f64>() * total;
    for item in items {
        remaining -= weight(item);
        if remaining <= 0.0 {
            return Some(item);
        }
    }
    items.last()
}

/// Build the option set for `target`.
///
/// Distractors come from learned words first, topped up with the other
/// words when too few are learned. Option texts are unique.
pub fn build_options<R: Rng + ?Sized>(
    target: &Word,
    words: &[Word],
    mode: TrainingMode,
    distractor_count: usize,
    rng: &mut R,
) -> Result<ChoiceSet> {
    let correct = target.answer_text(mode);

    let mut learned: Vec<&Word> = words
        .iter()
        .filter(|w| w.is_learned && w.id != target.id)
        .collect();
    let mut others: Vec<&Word> = words
        .iter()
        .filter(|w| !w.is_learned && w.id != target.id)
        .collect();
    learned.shuffle(rng);
    others.shuffle(rng);

    let mut seen: HashSet<&str> = HashSet::from([correct]);
    let distractors: Vec<&str> = learned
        .into_iter()
        .chain(others)
        .map(|w| w.answer_text(mode))
        .filter(|text| seen.insert(*text))
        .take(distractor_count)
        .collect();

    if distractors.len() < distractor_count {
        return Err(TrainerError::InsufficientWords {
            required: distractor_count.saturating_add(1),
            available: distractors.len() + 1,
        });
    }

    let mut options: Vec<String> = std::iter::once(correct)
        .chain(distractors)
        .map(str::to_string)
        .collect();
    options.shuffle(rng);

    Ok(ChoiceSet {
        correct: correct.to_string(),
        options,
    })
}

/// Up to `count` distinct words outside `exclude`, in random order.
pub fn random_words<'a, R: Rng + ?Sized>(
    words: &'a [Word],
    exclude: &[Uuid],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Word> {
    let candidates: Vec<&Word> = words.iter().filter(|w| !exclude.contains(&w.id)).collect();
    candidates.choose_multiple(rng, count).copied().collect()
}
