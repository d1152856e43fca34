use quiz_core::model::{QuestionId, RawQuestionRow, RunRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{RunRow, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question id", v)?))
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<RawQuestionRow, StorageError> {
    Ok(RawQuestionRow {
        id: Some(question_id_from_i64(row.try_get("id").map_err(ser)?)?.value()),
        question: row.try_get("question").map_err(ser)?,
        choices: row.try_get("choices").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        tags: row.try_get("tags").map_err(ser)?,
    })
}

pub(crate) fn map_run_row(row: &SqliteRow) -> Result<RunRow, StorageError> {
    let record = RunRecord {
        date: row.try_get("date").map_err(ser)?,
        score: i64_to_u32("score", row.try_get("score").map_err(ser)?)?,
        total: i64_to_u32("total", row.try_get("total").map_err(ser)?)?,
        duration_seconds: i64_to_u64(
            "duration_seconds",
            row.try_get("duration_seconds").map_err(ser)?,
        )?,
        accuracy: row.try_get("accuracy").map_err(ser)?,
        smoothed_accuracy: row.try_get("smoothed_accuracy").map_err(ser)?,
        max_streak: i64_to_u32("max_streak", row.try_get("max_streak").map_err(ser)?)?,
        run_tags: row.try_get("run_tags").map_err(ser)?,
        missed_ids: row.try_get("missed_ids").map_err(ser)?,
        missed_tags: row.try_get("missed_tags").map_err(ser)?,
    };
    Ok(RunRow::new(row.try_get("id").map_err(ser)?, record))
}
