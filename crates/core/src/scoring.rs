//! Scoring a completed problem set.

use chrono::NaiveDate;

use crate::error::QuizError;
use crate::model::{ProblemSet, RunRecord, RunResult};
use crate::report::{IncorrectReport, run_tags};
use crate::streak::{compute_streaks, max_streak};

/// Score a completed problem set.
///
/// # Errors
///
/// Returns `QuizError::EmptySet` if the set has no entries, or
/// `QuizError::IncompleteRun` if any entry has not been answered.
pub fn summarize(entries: &ProblemSet) -> Result<RunResult, QuizError> {
    if entries.is_empty() {
        return Err(QuizError::EmptySet);
    }
    let remaining = entries.len() - entries.done_count();
    if remaining > 0 {
        return Err(QuizError::IncompleteRun { remaining });
    }

    let streaks = compute_streaks(&entries.outcomes());
    let best = max_streak(&streaks);
    Ok(RunResult::new(
        entries.clone(),
        streaks,
        entries.correct_count(),
        best,
    ))
}

/// Build the results-sink row for a scored run.
///
/// `duration_seconds` is clamped to at least one second.
#[must_use]
pub fn run_record(
    result: &RunResult,
    report: &IncorrectReport,
    date: NaiveDate,
    duration_seconds: u64,
) -> RunRecord {
    RunRecord {
        date,
        score: u32::try_from(result.score()).unwrap_or(u32::MAX),
        total: u32::try_from(result.total()).unwrap_or(u32::MAX),
        duration_seconds: duration_seconds.max(1),
        accuracy: result.accuracy(),
        smoothed_accuracy: result.smoothed_accuracy(),
        max_streak: result.max_streak(),
        run_tags: run_tags(result.entries()),
        missed_ids: report.missed_ids.clone(),
        missed_tags: report.missed_tags.clone(),
    }
}
