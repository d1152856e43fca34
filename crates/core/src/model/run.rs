use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::problem_set::{ProblemSet, SequenceNumber};

/// Scored view of a completed problem set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    entries: ProblemSet,
    streak_per_entry: Vec<u32>,
    score: usize,
    max_streak: u32,
}

impl RunResult {
    pub(crate) fn new(
        entries: ProblemSet,
        streak_per_entry: Vec<u32>,
        score: usize,
        max_streak: u32,
    ) -> Self {
        Self {
            entries,
            streak_per_entry,
            score,
            max_streak,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &ProblemSet {
        &self.entries
    }

    /// Streak value for each entry, aligned with `entries()`.
    #[must_use]
    pub fn streak_per_entry(&self) -> &[u32] {
        &self.streak_per_entry
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.total() - self.score
    }

    #[must_use]
    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    /// `score / total`, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        self.score as f64 / self.total() as f64
    }

    /// Laplace-smoothed accuracy, `(score + 1) / (total + 2)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn smoothed_accuracy(&self) -> f64 {
        (self.score as f64 + 1.0) / (self.total() as f64 + 2.0)
    }

    /// Accuracy as a percentage rounded to two decimals.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        (self.accuracy() * 10_000.0).round() / 100.0
    }

    /// One point per entry for the results run chart.
    #[must_use]
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.entries
            .entries()
            .iter()
            .zip(&self.streak_per_entry)
            .map(|(entry, streak)| ChartPoint {
                number: entry.sequence_number().number(),
                sequence_number: entry.sequence_number(),
                outcome: Outcome::from_correct(entry.correct()),
                streak: *streak,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    #[must_use]
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Correct => "Correct",
            Outcome::Incorrect => "Incorrect",
        }
    }
}

/// A run-chart point: question number against outcome and streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub number: usize,
    pub sequence_number: SequenceNumber,
    pub outcome: Outcome,
    pub streak: u32,
}

/// The row appended to the results sink for one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub date: NaiveDate,
    pub score: u32,
    pub total: u32,
    pub duration_seconds: u64,
    pub accuracy: f64,
    pub smoothed_accuracy: f64,
    pub max_streak: u32,
    pub run_tags: String,
    pub missed_ids: String,
    pub missed_tags: String,
}
