//! Question bank stored as a CSV file with `ID,Question,Choices,Answer,Tags` columns.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{QuestionRecord, RawQuestionRow, ValidatedQuestion};

use crate::repository::{QuestionRepository, QuestionSource, StorageError, next_question_id};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn io<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[derive(Clone)]
pub struct CsvQuestionSource {
    path: PathBuf,
    // Serializes appends made through clones of this source.
    write_lock: Arc<Mutex<()>>,
}

impl CsvQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<RawQuestionRow>, StorageError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_path(&self.path)
            .map_err(io)?;
        let mut rows = Vec::new();
        for result in reader.deserialize::<RawQuestionRow>() {
            rows.push(result.map_err(ser)?);
        }
        Ok(rows)
    }

    fn write_row(&self, row: &RawQuestionRow) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(io)?;

        let len = file.metadata().map_err(io)?.len();
        if len > 0 && !ends_with_newline(&mut file, len)? {
            file.write_all(b"\n").map_err(io)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(len == 0)
            .from_writer(file);
        writer.serialize(row).map_err(ser)?;
        writer.flush().map_err(io)?;
        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> Result<bool, StorageError> {
    let mut last = [0_u8; 1];
    file.seek(SeekFrom::Start(len - 1)).map_err(io)?;
    file.read_exact(&mut last).map_err(io)?;
    Ok(last[0] == b'\n')
}

#[async_trait]
impl QuestionSource for CsvQuestionSource {
    async fn load_rows(&self) -> Result<Vec<RawQuestionRow>, StorageError> {
        self.read_rows()
    }
}

#[async_trait]
impl QuestionRepository for CsvQuestionSource {
    async fn append_question(
        &self,
        question: ValidatedQuestion,
    ) -> Result<QuestionRecord, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let rows = if self.path.exists() {
            self.read_rows()?
        } else {
            Vec::new()
        };
        let record = question.assign_id(next_question_id(&rows));
        self.write_row(&record.to_row())?;
        tracing::info!(id = %record.id(), path = %self.path.display(), "appended question");
        Ok(record)
    }
}
