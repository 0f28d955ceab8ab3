#![allow(dead_code)]

//! Common test utilities for integration tests.
//!
//! Provides fixed clocks, seeded randomness and word fixtures.

pub mod fixtures;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocab_core::{MemoryStorage, Trainer, WordStore};

/// Fixed reference time used across tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Store holding `count` unlearned fixture words.
pub fn store_with_words(count: usize) -> WordStore<MemoryStorage> {
    let mut store = WordStore::load(MemoryStorage::new());
    for (english, russian) in fixtures::pairs(count) {
        store.add_word(&english, &russian).expect("add fixture word");
    }
    store
}

pub fn trainer_with_words(count: usize, seed: u64) -> Trainer<MemoryStorage> {
    Trainer::with_seed(store_with_words(count), seed)
}
