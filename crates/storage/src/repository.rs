use async_trait::async_trait;
use quiz_core::model::{
    QuestionBank, QuestionId, QuestionRecord, RawQuestionRow, RunRecord, ValidatedQuestion,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted run result with its storage row id.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub id: i64,
    pub record: RunRecord,
}

impl RunRow {
    #[must_use]
    pub fn new(id: i64, record: RunRecord) -> Self {
        Self { id, record }
    }
}

/// Read side of the tabular question bank.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every raw row of the source, unnormalized.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read.
    async fn load_rows(&self) -> Result<Vec<RawQuestionRow>, StorageError>;

    /// Fetch and normalize the source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let rows = self.load_rows().await?;
        let bank = QuestionBank::from_rows(rows);
        for rejected in bank.rejected() {
            tracing::warn!(
                row = rejected.row,
                id = ?rejected.id.map(|id| id.value()),
                error = %rejected.error,
                "rejected question row"
            );
        }
        tracing::debug!(
            records = bank.len(),
            dropped = bank.dropped(),
            rejected = bank.rejected().len(),
            "loaded question bank"
        );
        Ok(bank)
    }
}

/// Question source that also accepts new questions.
#[async_trait]
pub trait QuestionRepository: QuestionSource {
    /// Append a validated question, assigning the next id after the highest existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn append_question(
        &self,
        question: ValidatedQuestion,
    ) -> Result<QuestionRecord, StorageError>;
}

/// Append-only destination for completed run results.
#[async_trait]
pub trait RunResultSink: Send + Sync {
    /// Append one run record and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_run(&self, record: &RunRecord) -> Result<i64, StorageError>;
}

/// Read access to previously saved runs.
#[async_trait]
pub trait RunHistory: Send + Sync {
    /// Most recent runs first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the runs cannot be read.
    async fn list_runs(&self, limit: u32) -> Result<Vec<RunRow>, StorageError>;
}

/// Id that follows the highest id among `rows` (1 for an empty source).
#[must_use]
pub fn next_question_id(rows: &[RawQuestionRow]) -> QuestionId {
    rows.iter()
        .filter_map(|r| r.id.map(QuestionId::new))
        .max()
        .map_or_else(|| QuestionId::new(1), |max| max.next())
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<RawQuestionRow>>>,
    runs: Arc<Mutex<Vec<RunRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with raw question rows.
    #[must_use]
    pub fn with_rows(rows: Vec<RawQuestionRow>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(rows)),
            runs: Arc::default(),
        }
    }

    /// Repository pre-loaded with normalized records.
    #[must_use]
    pub fn with_records<'a>(records: impl IntoIterator<Item = &'a QuestionRecord>) -> Self {
        Self::with_rows(records.into_iter().map(QuestionRecord::to_row).collect())
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn load_rows(&self) -> Result<Vec<RawQuestionRow>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn append_question(
        &self,
        question: ValidatedQuestion,
    ) -> Result<QuestionRecord, StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let record = question.assign_id(next_question_id(&guard));
        guard.push(record.to_row());
        Ok(record)
    }
}

#[async_trait]
impl RunResultSink for InMemoryRepository {
    async fn append_run(&self, record: &RunRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .runs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("run id overflow".into()))?
            + 1;
        guard.push(RunRow::new(id, record.clone()));
        Ok(id)
    }
}

#[async_trait]
impl RunHistory for InMemoryRepository {
    async fn list_runs(&self, limit: u32) -> Result<Vec<RunRow>, StorageError> {
        let guard = self
            .runs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Aggregates the question and run repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub question_source: Arc<dyn QuestionSource>,
    pub questions: Arc<dyn QuestionRepository>,
    pub runs: Arc<dyn RunResultSink>,
    pub run_history: Arc<dyn RunHistory>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repo(InMemoryRepository::new())
    }

    /// Wire every role to one repository value.
    #[must_use]
    pub fn from_repo<R>(repo: R) -> Self
    where
        R: QuestionRepository + RunResultSink + RunHistory + Clone + 'static,
    {
        Self {
            question_source: Arc::new(repo.clone()),
            questions: Arc::new(repo.clone()),
            runs: Arc::new(repo.clone()),
            run_history: Arc::new(repo),
        }
    }

    /// Replace the question bank while keeping the run storage.
    #[must_use]
    pub fn with_questions<Q>(mut self, questions: Q) -> Self
    where
        Q: QuestionRepository + Clone + 'static,
    {
        self.question_source = Arc::new(questions.clone());
        self.questions = Arc::new(questions);
        self
    }
}
