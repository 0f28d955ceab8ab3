//! Core of the English/Russian vocabulary trainer.
//!
//! Provides:
//! - Word store mirrored to pluggable key-value storage
//! - Performance model adapting difficulty and review time per answer
//! - Word selection and multiple-choice option generation
//! - Session tallies and aggregate statistics
//! - The training state machine driven by the presentation layer

pub mod error;
pub mod performance;
pub mod selector;
pub mod stats;
pub mod store;
pub mod trainer;
pub mod types;

pub use error::{Result, StorageError, TrainerError};
pub use performance::PerformanceModel;
pub use selector::{build_options, select_next, ChoiceSet, Selection};
pub use stats::{compute_summary, SessionTracker, StudySummary};
pub use store::{FileStorage, KeyValueStorage, MemoryStorage, WordStore};
pub use trainer::{AnswerOutcome, SpeechOutput, Trainer, TrainingState};
pub use types::{Language, Session, TrainerSettings, TrainingMode, UserStats, Word};
