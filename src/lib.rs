//! Multiple-choice quiz widget: one question at a time, a countdown per
//! question, scoring, and a persisted best score.

pub mod config;
pub mod error;
pub mod quiz;
pub mod runtime;
pub mod store;
pub mod timer;

pub use config::QuizConfig;
pub use error::{ConfigError, QuizError, QuizResult, StoreError};
pub use quiz::controller::{Phase, QuizController, Session};
pub use quiz::view::{QuizView, TranscriptView};
pub use quiz::{Question, QuestionSet};
pub use runtime::{Event, QuizHandle, QuizRuntime};
pub use store::{HighScoreStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use timer::{CountdownId, Scheduler, TokioScheduler};
