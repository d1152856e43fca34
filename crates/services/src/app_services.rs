use std::sync::Arc;

use storage::csv_source::CsvQuestionSource;
use storage::repository::{RunResultSink, Storage};

use crate::Clock;
use crate::access::AccessGate;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::generator_service::GeneratorService;
use crate::question_form_service::QuestionFormService;
use crate::results_service::ResultsService;
use crate::sheet_sink::RemoteSheetSink;

/// Assembles app-facing services over the configured storage.
#[derive(Clone)]
pub struct AppServices {
    gate: Arc<AccessGate>,
    generator: Arc<GeneratorService>,
    results: Arc<ResultsService>,
    question_form: Arc<QuestionFormService>,
}

impl AppServices {
    /// Build services from `config`.
    ///
    /// Questions come from `qna_csv` when set, otherwise from the database.
    /// Runs go to the results sheet when configured, otherwise to the database;
    /// history always reads the database.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn from_config(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let mut storage = Storage::sqlite(&config.db_url).await?;
        if let Some(path) = &config.qna_csv {
            tracing::info!(path = %path.display(), "reading questions from csv");
            storage = storage.with_questions(CsvQuestionSource::new(path));
        }
        if let Some(sheet) = &config.sheet {
            let sink: Arc<dyn RunResultSink> = Arc::new(RemoteSheetSink::new(sheet.clone()));
            storage.runs = sink;
        }
        Ok(Self::new(storage, AccessGate::from_config(config), config, clock))
    }

    /// Build services over an existing `Storage`, e.g. `Storage::in_memory()`.
    #[must_use]
    pub fn new(storage: Storage, gate: AccessGate, config: &QuizConfig, clock: Clock) -> Self {
        let generator = GeneratorService::new(clock, Arc::clone(&storage.question_source))
            .with_choices_per_question(config.choices_per_question);
        let results = ResultsService::new(
            clock,
            Arc::clone(&storage.runs),
            Arc::clone(&storage.run_history),
        );
        let question_form = QuestionFormService::new(Arc::clone(&storage.questions));

        Self {
            gate: Arc::new(gate),
            generator: Arc::new(generator),
            results: Arc::new(results),
            question_form: Arc::new(question_form),
        }
    }

    #[must_use]
    pub fn gate(&self) -> Arc<AccessGate> {
        Arc::clone(&self.gate)
    }

    #[must_use]
    pub fn generator(&self) -> Arc<GeneratorService> {
        Arc::clone(&self.generator)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn question_form(&self) -> Arc<QuestionFormService> {
        Arc::clone(&self.question_form)
    }
}
