use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::QuestionRecord;
use crate::model::tag::TagSet;

//
// ─── SEQUENCE NUMBER ───────────────────────────────────────────────────────────
//

/// The stable `Q-{n}` label of an entry within one problem set (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SequenceNumber(usize);

impl SequenceNumber {
    /// Label for the entry at zero-based position `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// The 1-indexed number.
    #[must_use]
    pub fn number(&self) -> usize {
        self.0
    }

    /// Zero-based position within the set.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 - 1
    }

    /// Heading form, e.g. `Question #3`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Question #{}", self.0)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sequence number: {0:?}")]
pub struct ParseSequenceError(String);

impl FromStr for SequenceNumber {
    type Err = ParseSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix("Q-")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .map(Self)
            .ok_or_else(|| ParseSequenceError(s.to_owned()))
    }
}

impl From<SequenceNumber> for String {
    fn from(value: SequenceNumber) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SequenceNumber {
    type Error = ParseSequenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// A question record plus the state of the current quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSetEntry {
    id: QuestionId,
    sequence_number: SequenceNumber,
    correct: bool,
    done: bool,
    question: String,
    choices: Vec<String>,
    answer: String,
    tags: TagSet,
}

impl ProblemSetEntry {
    /// Fresh, unanswered entry for `record` at position `index`.
    #[must_use]
    pub fn from_record(record: &QuestionRecord, index: usize) -> Self {
        Self {
            id: record.id(),
            sequence_number: SequenceNumber::from_index(index),
            correct: false,
            done: false,
            question: record.question().to_owned(),
            choices: record.choices().to_vec(),
            answer: record.answer().to_owned(),
            tags: record.tags().clone(),
        }
    }

    /// Same entry with a different displayed choice list.
    pub(crate) fn with_choices(&self, choices: Vec<String>) -> Self {
        Self {
            choices,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    /// Meaningful only once `done()` is true.
    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn done(&self) -> bool {
        self.done
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

    /// Whether `choice` (trimmed) is the correct answer.
    #[must_use]
    pub fn is_correct_choice(&self, choice: &str) -> bool {
        choice.trim() == self.answer.trim()
    }

    /// Mark the entry answered with the given outcome.
    pub fn record(&mut self, correct: bool) {
        self.correct = correct;
        self.done = true;
    }
}

//
// ─── PROBLEM SET ───────────────────────────────────────────────────────────────
//

/// Ordered, fixed-membership collection of entries for one quiz run.
///
/// Sequence numbers are dense (`Q-1..Q-N`) and follow entry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProblemSet {
    entries: Vec<ProblemSetEntry>,
}

impl ProblemSet {
    /// Build a set from records already in final order, numbering them `Q-1..`.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a QuestionRecord>) -> Self {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| ProblemSetEntry::from_record(record, index))
            .collect();
        Self { entries }
    }

    pub(crate) fn from_entries(entries: Vec<ProblemSetEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ProblemSetEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProblemSetEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ProblemSetEntry> {
        self.entries.get_mut(index)
    }

    /// Position of the entry labelled `seq`, if it belongs to this set.
    #[must_use]
    pub fn position(&self, seq: SequenceNumber) -> Option<usize> {
        let index = seq.index();
        (index < self.entries.len()).then_some(index)
    }

    #[must_use]
    pub fn done_count(&self) -> usize {
        self.entries.iter().filter(|e| e.done()).count()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|e| e.done() && e.correct()).count()
    }

    /// True when every entry has been answered (vacuously true when empty).
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.entries.iter().all(ProblemSetEntry::done)
    }

    /// `correct` flags in sequence order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<bool> {
        self.entries.iter().map(ProblemSetEntry::correct).collect()
    }
}
