use std::env;
use std::path::PathBuf;

use quiz_core::DEFAULT_CHOICES;

use crate::error::AppServicesError;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3?mode=rwc";

/// Remote endpoint that receives saved run rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    pub url: String,
    pub token: Option<String>,
}

/// Runtime settings, read from `QUIZ_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub db_url: String,
    pub qna_csv: Option<PathBuf>,
    pub access_key: Option<String>,
    pub password: Option<String>,
    pub sheet: Option<SheetConfig>,
    pub choices_per_question: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            qna_csv: None,
            access_key: None,
            password: None,
            sheet: None,
            choices_per_question: DEFAULT_CHOICES,
        }
    }
}

impl QuizConfig {
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` if `QUIZ_CHOICES_PER_QUESTION` is not a positive integer.
    pub fn from_env() -> Result<Self, AppServicesError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup. Blank values count as unset.
    ///
    /// Secrets are kept verbatim; every other value is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` if `QUIZ_CHOICES_PER_QUESTION` is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppServicesError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let choices_per_question = match var("QUIZ_CHOICES_PER_QUESTION") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|k| *k > 0)
                .ok_or_else(|| {
                    AppServicesError::Config(format!(
                        "QUIZ_CHOICES_PER_QUESTION must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_CHOICES,
        };

        Ok(Self {
            db_url: var("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()),
            qna_csv: var("QUIZ_QNA_CSV").map(PathBuf::from),
            access_key: secret("QUIZ_ACCESS_KEY"),
            password: secret("QUIZ_PASSWORD"),
            sheet: var("QUIZ_SHEET_URL").map(|url| SheetConfig {
                url,
                token: var("QUIZ_SHEET_TOKEN"),
            }),
            choices_per_question,
        })
    }
}
