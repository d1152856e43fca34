use quiz_core::model::RunRecord;

use super::SqliteRepository;
use super::mapping::{map_run_row, u64_to_i64};
use crate::repository::{RunHistory, RunResultSink, RunRow, StorageError};

#[async_trait::async_trait]
impl RunResultSink for SqliteRepository {
    async fn append_run(&self, record: &RunRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO run_results (
                date, score, total, duration_seconds, accuracy, smoothed_accuracy,
                max_streak, run_tags, missed_ids, missed_tags
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(record.date)
        .bind(i64::from(record.score))
        .bind(i64::from(record.total))
        .bind(u64_to_i64("duration_seconds", record.duration_seconds)?)
        .bind(record.accuracy)
        .bind(record.smoothed_accuracy)
        .bind(i64::from(record.max_streak))
        .bind(record.run_tags.as_str())
        .bind(record.missed_ids.as_str())
        .bind(record.missed_tags.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }
}

#[async_trait::async_trait]
impl RunHistory for SqliteRepository {
    async fn list_runs(&self, limit: u32) -> Result<Vec<RunRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, date, score, total, duration_seconds, accuracy, smoothed_accuracy,
                   max_streak, run_tags, missed_ids, missed_tags
            FROM run_results
            ORDER BY id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut runs = Vec::with_capacity(rows.len());
        for row in &rows {
            runs.push(map_run_row(row)?);
        }
        Ok(runs)
    }
}
