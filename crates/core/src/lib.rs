#![forbid(unsafe_code)]
//! Domain model and pure operations for tag-filtered multiple-choice quizzes.

pub mod error;
pub mod model;
pub mod report;
pub mod sampler;
pub mod scoring;
pub mod shuffle;
pub mod streak;
pub mod time;

pub use error::{Error, QuizError};
pub use report::{IncorrectReport, ReportItem, build_report, run_tags};
pub use sampler::{matching_records, sample_problem_set, sample_problem_set_with};
pub use scoring::{run_record, summarize};
pub use shuffle::{DEFAULT_CHOICES, shuffle_choices, shuffle_choices_with, shuffle_problem_set_with};
pub use streak::{compute_streaks, max_streak};
pub use time::Clock;
