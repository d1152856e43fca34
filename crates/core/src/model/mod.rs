mod ids;
mod problem_set;
mod question;
mod run;
mod tag;

pub use ids::{QuestionId, SessionId};
pub use problem_set::{ParseSequenceError, ProblemSet, ProblemSetEntry, SequenceNumber};
pub use question::{
    DRAFT_CHOICES, QuestionBank, QuestionDraft, QuestionError, QuestionRecord, RawQuestionRow,
    RejectedRow, ValidatedQuestion,
};
pub use run::{ChartPoint, Outcome, RunRecord, RunResult};
pub use tag::{
    LIST_DELIMITER, LIST_SEPARATOR, TagError, TagName, TagSet, intersects, join_tags,
    parse_tag_list,
};
