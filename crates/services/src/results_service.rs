use std::sync::Arc;

use quiz_core::model::{ChartPoint, RunRecord, RunResult};
use quiz_core::{Clock, IncorrectReport, build_report, run_record, summarize};
use storage::repository::{RunHistory, RunResultSink, RunRow};

use crate::access::Access;
use crate::error::ResultsError;
use crate::sessions::QuizSession;

/// Everything the results view shows for one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub result: RunResult,
    pub report: IncorrectReport,
    pub chart: Vec<ChartPoint>,
}

/// Totals across saved runs for the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySummary {
    pub runs: usize,
    pub questions: u64,
    pub correct: u64,
    pub best_streak: u32,
}

impl HistorySummary {
    #[must_use]
    pub fn from_rows(rows: &[RunRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            runs: acc.runs + 1,
            questions: acc.questions + u64::from(row.record.total),
            correct: acc.correct + u64::from(row.record.score),
            best_streak: acc.best_streak.max(row.record.max_streak),
        })
    }

    /// Pooled accuracy over every saved question, `None` before any run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> Option<f64> {
        (self.questions > 0).then(|| self.correct as f64 / self.questions as f64)
    }
}

/// Scores completed sessions and appends them to the results sink.
#[derive(Clone)]
pub struct ResultsService {
    clock: Clock,
    sink: Arc<dyn RunResultSink>,
    history: Arc<dyn RunHistory>,
}

impl ResultsService {
    #[must_use]
    pub fn new(clock: Clock, sink: Arc<dyn RunResultSink>, history: Arc<dyn RunHistory>) -> Self {
        Self {
            clock,
            sink,
            history,
        }
    }

    /// Score, streaks, run chart and incorrect-answer report for `session`.
    ///
    /// Question ids appear in the report only for authorized sessions.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Quiz` if the session is not complete.
    pub fn results(&self, session: &QuizSession) -> Result<RunOutcome, ResultsError> {
        let result = summarize(session.problem_set())?;
        let report = build_report(session.problem_set(), session.access().authorized);
        let chart = result.chart_points();
        Ok(RunOutcome {
            result,
            report,
            chart,
        })
    }

    /// The sink row for `session`, dated today.
    ///
    /// Without `duration_override` the duration is measured from the session start
    /// to its completion.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Quiz` if the session is not complete.
    pub fn record(
        &self,
        session: &QuizSession,
        duration_override: Option<u64>,
    ) -> Result<RunRecord, ResultsError> {
        let outcome = self.results(session)?;
        let duration = duration_override.unwrap_or_else(|| self.measured_duration(session));
        Ok(run_record(
            &outcome.result,
            &outcome.report,
            self.clock.today(),
            duration,
        ))
    }

    fn measured_duration(&self, session: &QuizSession) -> u64 {
        let end = session.completed_at().unwrap_or_else(|| self.clock.now());
        u64::try_from((end - session.started_at()).num_seconds()).unwrap_or(0)
    }

    /// Append the run to the sink, once per session.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Unauthorized` for unauthorized sessions,
    /// `ResultsError::AlreadySaved` on a repeat save, `ResultsError::Quiz` if the
    /// session is not complete, and `ResultsError::Storage` if the append fails.
    #[tracing::instrument(skip_all, fields(session = %session.id()))]
    pub async fn save(
        &self,
        session: &mut QuizSession,
        duration_override: Option<u64>,
    ) -> Result<i64, ResultsError> {
        if !session.access().authorized {
            return Err(ResultsError::Unauthorized);
        }
        if session.saved_run().is_some() {
            return Err(ResultsError::AlreadySaved);
        }
        let record = self.record(session, duration_override)?;
        let id = self.sink.append_run(&record).await?;
        session.set_saved_run(id);
        tracing::info!(
            run = id,
            score = record.score,
            total = record.total,
            "saved run results"
        );
        Ok(id)
    }

    /// Most recent saved runs.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Unauthorized` without authorization, or
    /// `ResultsError::Storage` if the history cannot be read.
    pub async fn history(&self, access: Access, limit: u32) -> Result<Vec<RunRow>, ResultsError> {
        if !access.authorized {
            return Err(ResultsError::Unauthorized);
        }
        Ok(self.history.list_runs(limit).await?)
    }
}
