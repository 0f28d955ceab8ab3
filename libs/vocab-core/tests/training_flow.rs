//! End-to-end training flow tests.

mod common;

use chrono::Duration;
use std::collections::HashSet;
use vocab_core::selector::{build_options, select_next, word_for_review};
use vocab_core::{
    PerformanceModel, Selection, TrainerError, TrainingMode, TrainingState, Word,
};

use common::{fixtures, now, rng};

#[test]
fn three_words_cannot_start_choice_training() {
    let mut trainer = common::trainer_with_words(3, 1);
    for mode in [TrainingMode::Translation, TrainingMode::Pronunciation] {
        let result = trainer.start(mode);
        assert!(matches!(
            result,
            Err(TrainerError::InsufficientWords { required: 4, available: 3 })
        ));
    }
    assert_eq!(trainer.state(), &TrainingState::ModeSelect);
}

#[test]
fn full_session_runs_to_review() {
    let mut trainer = common::trainer_with_words(6, 3);
    trainer.start(TrainingMode::Translation).unwrap();

    let mut memorized = HashSet::new();
    while let TrainingState::Memorizing { word } = trainer.state() {
        assert!(memorized.insert(word.id), "word presented twice for memorizing");
        trainer.acknowledge().unwrap();
    }
    assert_eq!(memorized.len(), 6);

    for round in 0..30 {
        let correct = match trainer.state() {
            TrainingState::Testing { word, choices } => {
                assert!(word.is_learned);
                assert_eq!(choices.options.len(), 4);
                let unique: HashSet<&String> = choices.options.iter().collect();
                assert_eq!(unique.len(), 4);
                choices.correct.clone()
            }
            other => panic!("expected testing, got {:?}", other),
        };
        let choice = if round % 3 == 0 { "wrong" } else { correct.as_str() };
        trainer.answer(choice).unwrap();
    }

    assert_eq!(trainer.session_progress(), Some((20, 10, 6)));
    let session = trainer.finish().unwrap();
    assert_eq!(session.total_answers(), 30);

    let words = trainer.words();
    let answered: u32 = words.iter().map(Word::attempts).sum();
    assert_eq!(answered, 30);
    for word in words {
        assert!((0.1..=1.0).contains(&word.difficulty));
    }
    assert_eq!(trainer.stats().total_sessions, 1);
    assert_eq!(trainer.stats().total_words_learned, 6);
    assert_eq!(trainer.summary().accuracy_percent, 67);
}

#[test]
fn pronunciation_options_are_english() {
    let mut trainer = common::trainer_with_words(4, 5);
    trainer.start(TrainingMode::Pronunciation).unwrap();
    while matches!(trainer.state(), TrainingState::Memorizing { .. }) {
        trainer.acknowledge().unwrap();
    }

    match trainer.state() {
        TrainingState::Testing { word, choices } => {
            assert_eq!(choices.correct, word.english);
            let english: HashSet<String> = fixtures::pairs(4).into_iter().map(|(e, _)| e).collect();
            assert!(choices.options.iter().all(|o| english.contains(o)));
        }
        other => panic!("expected testing, got {:?}", other),
    }
}

#[test]
fn restart_after_results() {
    let mut trainer = common::trainer_with_words(4, 9);
    trainer.start(TrainingMode::Translation).unwrap();
    trainer.finish().unwrap();

    trainer.start(TrainingMode::Translation).unwrap();
    assert!(matches!(trainer.state(), TrainingState::Memorizing { .. }));
}

#[test]
fn memorized_apple_is_due_next_day() {
    let mut store = common::store_with_words(1);
    let apple = store.words()[0].clone();
    assert_eq!(apple.english, "Apple");
    assert_eq!(apple.difficulty, 1.0);

    let learned = store.mark_word_as_learned(apple.id, now()).unwrap();
    assert!(learned.is_learned);
    assert_eq!(learned.next_review, Some(now() + Duration::hours(24)));
}

#[test]
fn selection_never_reviews_while_words_are_unlearned() {
    let mut words: Vec<Word> = (0..8)
        .map(|i| {
            fixtures::learned_word(
                &format!("w{i}"),
                &format!("с{i}"),
                i,
                1,
                0.5,
                now() - Duration::hours(1),
            )
        })
        .collect();
    words.push(Word::new("New", "Новое"));

    let mut rng = rng(21);
    for _ in 0..200 {
        assert!(matches!(
            select_next(&words, now(), 4, &mut rng),
            Selection::Memorize(w) if !w.is_learned
        ));
    }
}

#[test]
fn random_answers_keep_invariants() {
    let model = PerformanceModel::default();
    let mut rng = rng(99);
    let mut word = fixtures::learned_word("Bread", "Хлеб", 0, 0, 1.0, now());

    for n in 1..=200u32 {
        let correct = rand::Rng::gen_bool(&mut rng, 0.6);
        let before = word.difficulty;
        word = model.apply_answer(&word, correct, now());

        assert!((0.1..=1.0).contains(&word.difficulty));
        if correct {
            assert!(word.difficulty <= before);
            let next = word.next_review.unwrap();
            assert!(next >= now() + Duration::days(1) && next <= now() + Duration::days(7));
        } else {
            assert!(word.difficulty >= before);
            assert_eq!(word.next_review, Some(now() + Duration::hours(12)));
        }
        assert_eq!(word.attempts(), n);
    }
}

#[test]
fn review_example_with_three_of_four_correct() {
    let model = PerformanceModel::default();
    let word = fixtures::learned_word("Book", "Книга", 2, 1, 0.15, now());
    let answered = model.apply_answer(&word, true, now());

    assert_eq!(answered.accuracy(), 0.75);
    assert_eq!(answered.next_review, Some(now() + Duration::hours(132)));
    assert_eq!(answered.difficulty, 0.1);
}

#[test]
fn options_fail_below_four_words() {
    let words = vec![
        fixtures::learned_word("Cat", "Кошка", 1, 0, 0.5, now()),
        fixtures::learned_word("Dog", "Собака", 1, 0, 0.5, now()),
        Word::new("Sun", "Солнце"),
    ];
    for target in &words {
        let result = build_options(target, &words, TrainingMode::Translation, 3, &mut rng(4));
        assert!(matches!(result, Err(TrainerError::InsufficientWords { .. })));
    }
}

#[test]
fn review_fallback_uses_whole_learned_pool() {
    let words: Vec<Word> = fixtures::pairs(5)
        .into_iter()
        .map(|(e, r)| fixtures::learned_word(&e, &r, 1, 0, 0.3, now() + Duration::days(2)))
        .collect();

    let mut rng = rng(8);
    let seen: HashSet<_> = (0..300)
        .filter_map(|_| word_for_review(&words, now(), 4, &mut rng))
        .map(|w| w.id)
        .collect();
    assert_eq!(seen.len(), 5);
}
