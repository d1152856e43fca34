#![forbid(unsafe_code)]

pub mod access;
pub mod app_services;
pub mod config;
pub mod error;
pub mod generator_service;
pub mod question_form_service;
pub mod results_service;
pub mod sessions;
pub mod sheet_sink;

pub use quiz_core::Clock;
pub use sessions as session;

pub use access::{Access, AccessGate};
pub use app_services::AppServices;
pub use config::{QuizConfig, SheetConfig};
pub use error::{
    AppServicesError, GeneratorError, QuestionFormError, ResultsError, SessionError, SheetError,
};
pub use generator_service::GeneratorService;
pub use question_form_service::QuestionFormService;
pub use results_service::{HistorySummary, ResultsService, RunOutcome};
pub use sessions::{AnswerOutcome, Celebration, QuizSession, SessionProgress};
pub use sheet_sink::RemoteSheetSink;
