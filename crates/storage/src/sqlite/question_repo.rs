use quiz_core::model::{QuestionRecord, RawQuestionRow, ValidatedQuestion};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_question_row, question_id_from_i64, u64_to_i64};
use crate::repository::{QuestionRepository, QuestionSource, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    /// Insert or replace raw rows keyed by their id, returning how many were written.
    ///
    /// Rows are stored as given; normalization happens when the bank is loaded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a row has no id, an id does not fit the column,
    /// or a write fails.
    pub async fn import_rows(&self, rows: &[RawQuestionRow]) -> Result<usize, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for row in rows {
            let id = row
                .id
                .ok_or_else(|| StorageError::Serialization("question row has no id".into()))?;
            sqlx::query(
                r"
                INSERT INTO questions (id, question, choices, answer, tags)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                    question = excluded.question,
                    choices = excluded.choices,
                    answer = excluded.answer,
                    tags = excluded.tags
                ",
            )
            .bind(u64_to_i64("question id", id)?)
            .bind(row.question.as_deref())
            .bind(row.choices.as_deref())
            .bind(row.answer.as_deref())
            .bind(row.tags.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        tracing::info!(rows = rows.len(), "imported question rows");
        Ok(rows.len())
    }
}

#[async_trait::async_trait]
impl QuestionSource for SqliteRepository {
    async fn load_rows(&self) -> Result<Vec<RawQuestionRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question, choices, answer, tags
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn append_question(
        &self,
        question: ValidatedQuestion,
    ) -> Result<QuestionRecord, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let next: i64 = sqlx::query("SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM questions")
            .fetch_one(&mut *tx)
            .await
            .map_err(conn)?
            .try_get("next_id")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let record = question.assign_id(question_id_from_i64(next)?);
        let row = record.to_row();

        sqlx::query(
            r"
            INSERT INTO questions (id, question, choices, answer, tags)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(next)
        .bind(row.question)
        .bind(row.choices)
        .bind(row.answer)
        .bind(row.tags)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            other => conn(other),
        })?;

        tx.commit().await.map_err(conn)?;
        tracing::info!(id = next, "appended question");
        Ok(record)
    }
}
