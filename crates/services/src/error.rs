//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use quiz_core::model::{QuestionError, SequenceNumber};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `GeneratorService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("problem set generation is locked")]
    AccessDenied,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while stepping through a quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions in problem set")]
    Empty,
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("{0} was already answered")]
    AlreadyAnswered(SequenceNumber),
    #[error("choice is not one of the displayed options: {0}")]
    UnknownChoice(String),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("saving results requires authorization")]
    Unauthorized,
    #[error("results for this session were already saved")]
    AlreadySaved,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuestionFormService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionFormError {
    #[error("adding questions requires authorization")]
    Unauthorized,
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the remote results sheet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    #[error("results sheet request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<SheetError> for StorageError {
    fn from(err: SheetError) -> Self {
        StorageError::Connection(err.to_string())
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
