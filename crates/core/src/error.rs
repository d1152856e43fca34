use thiserror::Error;

use crate::model::{QuestionError, TagError};

/// Precondition failures of the quiz operations.
///
/// Each is detected before any state changes, so the caller can re-prompt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question count must be at least 1 (got {requested})")]
    InvalidSelection { requested: usize },

    #[error("requested {requested} questions but only {available} match the selected tags")]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("question needs at least {required} choices but has {available}")]
    InsufficientChoices { required: usize, available: usize },

    #[error("run is not complete: {remaining} question(s) unanswered")]
    IncompleteRun { remaining: usize },

    #[error("problem set has no entries")]
    EmptySet,
}

/// Umbrella error for callers that mix record validation with quiz operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Tag(#[from] TagError),
}
