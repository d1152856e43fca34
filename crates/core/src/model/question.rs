use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::tag::{LIST_DELIMITER, LIST_SEPARATOR, TagName, TagSet, intersects, parse_tag_list};
use crate::shuffle::DEFAULT_CHOICES;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("question has no choices")]
    NoChoices,

    #[error("question needs at least {required} choices but has {available}")]
    TooFewChoices { required: usize, available: usize },

    #[error("choice {0:?} appears more than once")]
    DuplicateChoice(String),

    #[error("answer {0:?} is not one of the choices")]
    AnswerNotInChoices(String),

    #[error("question must carry at least one tag")]
    NoTags,

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),

    #[error("question row has no valid id")]
    MissingId,
}

//
// ─── RAW ROW ───────────────────────────────────────────────────────────────────
//

/// One row of the tabular question source, before normalization.
///
/// `Choices` and `Tags` are `;`-delimited cells. An empty or non-numeric `ID`
/// cell reads as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawQuestionRow {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(rename = "Question", default)]
    pub question: Option<String>,
    #[serde(rename = "Choices", default)]
    pub choices: Option<String>,
    #[serde(rename = "Answer", default)]
    pub answer: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<String>,
}

impl RawQuestionRow {
    /// Rows without question text or answer are dropped before use.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        is_blank(self.question.as_deref()) || is_blank(self.answer.as_deref())
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// A normalized multiple-choice question.
///
/// Invariants: the answer is exactly one of the (pairwise distinct) choices,
/// and the tag set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    question: String,
    choices: Vec<String>,
    answer: String,
    tags: TagSet,
}

impl QuestionRecord {
    /// Build a validated record.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when any record invariant does not hold.
    pub fn new(
        id: QuestionId,
        question: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
        tags: TagSet,
    ) -> Result<Self, QuestionError> {
        let question = question.into().trim().to_owned();
        if question.is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }

        let choices: Vec<String> = choices
            .into_iter()
            .map(|c| c.into().trim().to_owned())
            .filter(|c| !c.is_empty())
            .collect();
        if choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }
        let mut seen = HashSet::with_capacity(choices.len());
        for choice in &choices {
            if !seen.insert(choice.as_str()) {
                return Err(QuestionError::DuplicateChoice(choice.clone()));
            }
        }

        let answer = answer.into().trim().to_owned();
        if answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if !seen.contains(answer.as_str()) {
            return Err(QuestionError::AnswerNotInChoices(answer));
        }

        if tags.is_empty() {
            return Err(QuestionError::NoTags);
        }

        Ok(Self {
            id,
            question,
            choices,
            answer,
            tags,
        })
    }

    /// Normalize a raw source row.
    ///
    /// Source rows must offer at least [`DEFAULT_CHOICES`] options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the row has no id, too few choices, or the
    /// split row violates a record invariant.
    pub fn from_row(row: &RawQuestionRow) -> Result<Self, QuestionError> {
        let id = row.id.map(QuestionId::new).ok_or(QuestionError::MissingId)?;
        let record = Self::new(
            id,
            row.question.clone().unwrap_or_default(),
            split_list(row.choices.as_deref().unwrap_or_default()),
            row.answer.clone().unwrap_or_default(),
            parse_tag_list(row.tags.as_deref().unwrap_or_default()),
        )?;
        if record.choices.len() < DEFAULT_CHOICES {
            return Err(QuestionError::TooFewChoices {
                required: DEFAULT_CHOICES,
                available: record.choices.len(),
            });
        }
        Ok(record)
    }

    /// Render the record back into the tabular row shape.
    #[must_use]
    pub fn to_row(&self) -> RawQuestionRow {
        RawQuestionRow {
            id: Some(self.id.value()),
            question: Some(self.question.clone()),
            choices: Some(self.choices.join(LIST_SEPARATOR)),
            answer: Some(self.answer.clone()),
            tags: Some(
                self.tags
                    .iter()
                    .map(TagName::as_str)
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR),
            ),
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// True when this record carries any of the given tags.
    #[must_use]
    pub fn matches_any(&self, tags: &TagSet) -> bool {
        intersects(&self.tags, tags)
    }
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// A source row that failed normalization.
///
/// `row` is the 1-based position among the source's data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row: usize,
    pub id: Option<QuestionId>,
    pub error: QuestionError,
}

/// Normalized question records plus an account of what was left out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
    dropped: usize,
    rejected: Vec<RejectedRow>,
}

impl QuestionBank {
    /// Normalize raw rows into a bank ordered by ascending id.
    ///
    /// Blank rows (no question or no answer) are counted in `dropped`; rows that
    /// break a record invariant are kept in `rejected` with the reason.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = RawQuestionRow>) -> Self {
        let mut records: Vec<QuestionRecord> = Vec::new();
        let mut dropped = 0;
        let mut rejected = Vec::new();
        let mut ids = HashSet::new();

        for (index, row) in rows.into_iter().enumerate() {
            if row.is_blank() {
                dropped += 1;
                continue;
            }
            let id = row.id.map(QuestionId::new);
            let reject = |error| RejectedRow {
                row: index + 1,
                id,
                error,
            };
            if let Some(id) = id.filter(|id| !ids.insert(*id)) {
                rejected.push(reject(QuestionError::DuplicateId(id)));
                continue;
            }
            match QuestionRecord::from_row(&row) {
                Ok(record) => records.push(record),
                Err(error) => rejected.push(reject(error)),
            }
        }

        records.sort_by_key(QuestionRecord::id);

        Self {
            records,
            dropped,
            rejected,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct tags across all records.
    #[must_use]
    pub fn tag_catalog(&self) -> Vec<TagName> {
        let tags: BTreeSet<&TagName> = self.records.iter().flat_map(|r| r.tags().iter()).collect();
        tags.into_iter().cloned().collect()
    }

    /// Number of records carrying any of the given tags.
    #[must_use]
    pub fn matching_count(&self, tags: &TagSet) -> usize {
        self.records.iter().filter(|r| r.matches_any(tags)).count()
    }

    /// Highest id in the bank, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<QuestionId> {
        self.records.last().map(QuestionRecord::id)
    }
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Number of options captured by the question form.
pub const DRAFT_CHOICES: usize = 4;

/// A new question as entered by an author, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionDraft {
    pub question: String,
    pub choices: [String; DRAFT_CHOICES],
    pub answer: String,
    pub tags: Vec<String>,
}

impl QuestionDraft {
    /// Validate every field of the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a field is blank, choices repeat, the answer is
    /// not among the choices, or no tag was selected.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        if self.choices.iter().any(|c| c.trim().is_empty()) {
            return Err(QuestionError::NoChoices);
        }
        let tags: TagSet = self
            .tags
            .iter()
            .filter_map(|t| TagName::new(t.as_str()).ok())
            .collect();

        // Id 0 is a placeholder; `assign_id` replaces it.
        let record = QuestionRecord::new(
            QuestionId::new(0),
            self.question,
            self.choices,
            self.answer,
            tags,
        )?;
        Ok(ValidatedQuestion { record })
    }
}

/// A draft that passed validation and is waiting for a source-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    record: QuestionRecord,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn question(&self) -> &str {
        self.record.question()
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        self.record.choices()
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        self.record.answer()
    }

    #[must_use]
    pub fn tags(&self) -> &TagSet {
        self.record.tags()
    }

    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> QuestionRecord {
        QuestionRecord { id, ..self.record }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, question: &str, choices: &str, answer: &str, tags: &str) -> RawQuestionRow {
        RawQuestionRow {
            id: Some(id),
            question: Some(question.into()),
            choices: Some(choices.into()),
            answer: Some(answer.into()),
            tags: Some(tags.into()),
        }
    }

    fn draft() -> QuestionDraft {
        QuestionDraft {
            question: "What is 2 + 2?".into(),
            choices: ["3".into(), "4".into(), "5".into(), "22".into()],
            answer: "4".into(),
            tags: vec!["Pre-Calculus".into()],
        }
    }

    #[test]
    fn from_row_splits_and_trims_cells() {
        let record =
            QuestionRecord::from_row(&row(7, "Q?", " a ; b;c ;d ", " b ", "PCP ; GEN")).unwrap();
        assert_eq!(record.id(), QuestionId::new(7));
        assert_eq!(record.choices(), ["a", "b", "c", "d"]);
        assert_eq!(record.answer(), "b");
        let tags: Vec<_> = record.tags().iter().map(TagName::as_str).collect();
        assert_eq!(tags, vec!["GEN", "PCP"]);
    }

    #[test]
    fn answer_must_be_a_choice() {
        let err = QuestionRecord::from_row(&row(1, "Q?", "a;b;c;d", "e", "PCP")).unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotInChoices("e".into()));
    }

    #[test]
    fn duplicate_choices_are_rejected() {
        let err = QuestionRecord::from_row(&row(1, "Q?", "a;b;a;d", "a", "PCP")).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateChoice("a".into()));
    }

    #[test]
    fn tags_are_required() {
        let err = QuestionRecord::from_row(&row(1, "Q?", "a;b;c;d", "a", " ; ")).unwrap_err();
        assert_eq!(err, QuestionError::NoTags);
    }

    #[test]
    fn bank_drops_blank_rows_and_keeps_rejections() {
        let mut blank = row(3, "", "a;b;c;d", "a", "PCP");
        blank.question = None;
        let rows = vec![
            row(5, "Q5", "a;b;c;d", "a", "PCP"),
            blank,
            row(4, "Q4", "a;b;c;d", "z", "PCP"),
            row(1, "Q1", "a;b;c;d", "d", "GEN"),
            row(5, "Q5 again", "a;b;c;d", "a", "PCP"),
            row(6, "Q6", "a;b;c;d", "   ", "PCP"),
        ];

        let bank = QuestionBank::from_rows(rows);

        let ids: Vec<_> = bank.records().iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(bank.dropped(), 2);
        assert_eq!(bank.rejected().len(), 2);
        assert_eq!(
            bank.rejected()[1].error,
            QuestionError::DuplicateId(QuestionId::new(5))
        );
        assert_eq!(bank.max_id(), Some(QuestionId::new(5)));
        assert_eq!(bank.rejected()[0].row, 3);
    }

    #[test]
    fn rows_without_id_are_dropped_when_blank_and_rejected_otherwise() {
        let empty = RawQuestionRow::default();
        let mut unnumbered = row(0, "Q?", "a;b;c;d", "a", "PCP");
        unnumbered.id = None;

        let bank = QuestionBank::from_rows(vec![row(1, "Q1", "a;b;c;d", "a", "PCP"), unnumbered, empty]);

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.dropped(), 1);
        assert_eq!(bank.rejected().len(), 1);
        assert_eq!(bank.rejected()[0].id, None);
        assert_eq!(bank.rejected()[0].row, 2);
        assert_eq!(bank.rejected()[0].error, QuestionError::MissingId);
    }

    #[test]
    fn short_choice_lists_are_rejected() {
        let bank = QuestionBank::from_rows(vec![
            row(1, "Q1", "a;b;c;d", "a", "PCP"),
            row(2, "Q2", "a;b", "a", "PCP"),
            row(3, "Q3", "a;b;c; ;", "a", "PCP"),
        ]);

        let ids: Vec<_> = bank.records().iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(
            bank.rejected()[0].error,
            QuestionError::TooFewChoices {
                required: 4,
                available: 2
            }
        );
        assert_eq!(bank.rejected()[1].id, Some(QuestionId::new(3)));
        assert_eq!(bank.matching_count(&parse_tag_list("PCP")), 1);
    }

    #[test]
    fn bank_lists_tags_and_counts_matches() {
        let bank = QuestionBank::from_rows(vec![
            row(1, "Q1", "a;b;c;d", "a", "PCP; Distillation"),
            row(2, "Q2", "a;b;c;d", "a", "GEN"),
            row(3, "Q3", "a;b;c;d", "a", "PCP"),
        ]);

        let catalog: Vec<_> = bank.tag_catalog().iter().map(ToString::to_string).collect();
        assert_eq!(catalog, vec!["Distillation", "GEN", "PCP"]);
        assert_eq!(bank.matching_count(&parse_tag_list("PCP")), 2);
        assert_eq!(bank.matching_count(&parse_tag_list("PCP; GEN")), 3);
        assert_eq!(bank.matching_count(&TagSet::new()), 0);
    }

    #[test]
    fn record_round_trips_through_row_shape() {
        let record = QuestionRecord::from_row(&row(9, "Q9", "w;x;y;z", "y", "CHE; GEN")).unwrap();
        let again = QuestionRecord::from_row(&record.to_row()).unwrap();
        assert_eq!(record, again);
    }

    #[test]
    fn draft_validates_and_assigns_id() {
        let validated = draft().validate().unwrap();
        let record = validated.assign_id(QuestionId::new(101));
        assert_eq!(record.id(), QuestionId::new(101));
        assert_eq!(record.answer(), "4");
        assert_eq!(record.choices().len(), DRAFT_CHOICES);
    }

    #[test]
    fn draft_requires_every_choice() {
        let mut d = draft();
        d.choices[2] = "  ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::NoChoices);
    }

    #[test]
    fn draft_requires_tags_and_question() {
        let mut d = draft();
        d.tags.clear();
        assert_eq!(d.validate().unwrap_err(), QuestionError::NoTags);

        let mut d = draft();
        d.question = "\n".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyQuestion);
    }
}
