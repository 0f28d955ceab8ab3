//! Word fixtures.

use chrono::{DateTime, Duration, Utc};
use vocab_core::Word;

const PAIRS: [(&str, &str); 10] = [
    ("Apple", "Яблоко"),
    ("Cat", "Кошка"),
    ("Dog", "Собака"),
    ("House", "Дом"),
    ("Water", "Вода"),
    ("Sun", "Солнце"),
    ("Book", "Книга"),
    ("Tree", "Дерево"),
    ("Bread", "Хлеб"),
    ("Friend", "Друг"),
];

/// The first `count` fixture pairs; numbered beyond the built-in list.
pub fn pairs(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| match PAIRS.get(i) {
            Some((english, russian)) => (english.to_string(), russian.to_string()),
            None => (format!("Word {}", i + 1), format!("Слово {}", i + 1)),
        })
        .collect()
}

/// A learned word with the given history, due at `next_review`.
pub fn learned_word(
    english: &str,
    russian: &str,
    correct: u32,
    incorrect: u32,
    difficulty: f64,
    next_review: DateTime<Utc>,
) -> Word {
    Word {
        is_learned: true,
        correct_answers: correct,
        incorrect_answers: incorrect,
        difficulty,
        last_reviewed: Some(next_review - Duration::days(1)),
        next_review: Some(next_review),
        ..Word::new(english, russian)
    }
}
