use thiserror::Error;

use crate::quiz::controller::Phase;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("question set must contain at least one question")]
    EmptyQuestionSet,

    #[error("question #{index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },

    #[error("`{operation}` is not allowed while the quiz is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: Phase,
    },

    #[error("could not parse question set: {0}")]
    QuestionSource(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("quiz runtime has stopped")]
    RuntimeStopped,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    NotPositive { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not a JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type QuizResult<T> = Result<T, QuizError>;
