use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::model::{ProblemSet, ProblemSetEntry, SequenceNumber, SessionId, TagSet};

use super::progress::SessionProgress;
use crate::access::Access;
use crate::error::SessionError;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub sequence_number: SequenceNumber,
    pub correct: bool,
    pub correct_answer: String,
    pub is_complete: bool,
    pub is_perfect: bool,
}

/// Cue shown when the set is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Celebration {
    None,
    Standard,
    /// Every answer correct.
    Fanfare,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One operator's run through a generated problem set.
///
/// Owns the set, the navigation cursor and the access flags that used to live in
/// ambient page state.
pub struct QuizSession {
    id: SessionId,
    entries: ProblemSet,
    cursor: usize,
    access: Access,
    audio_cues: bool,
    selected_tags: TagSet,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    saved_run: Option<i64>,
}

impl QuizSession {
    /// Start a session on `entries` at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the set has no entries.
    pub fn new(
        entries: ProblemSet,
        access: Access,
        selected_tags: TagSet,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if entries.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            id: SessionId::generate(),
            entries,
            cursor: 0,
            access,
            audio_cues: true,
            selected_tags,
            started_at,
            completed_at: None,
            saved_run: None,
        })
    }

    #[must_use]
    pub fn with_audio_cues(mut self, enabled: bool) -> Self {
        self.audio_cues = enabled;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn problem_set(&self) -> &ProblemSet {
        &self.entries
    }

    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    /// Mutable flags, for re-authenticating mid-session.
    pub fn access_mut(&mut self) -> &mut Access {
        &mut self.access
    }

    #[must_use]
    pub fn audio_cues(&self) -> bool {
        self.audio_cues
    }

    pub fn set_audio_cues(&mut self, enabled: bool) {
        self.audio_cues = enabled;
    }

    /// Tags the operator selected when generating the set.
    #[must_use]
    pub fn selected_tags(&self) -> &TagSet {
        &self.selected_tags
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the last unanswered question was answered.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn saved_run(&self) -> Option<i64> {
        self.saved_run
    }

    pub(crate) fn set_saved_run(&mut self, id: i64) {
        self.saved_run = Some(id);
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current(&self) -> Option<&ProblemSetEntry> {
        self.entries.get(self.cursor)
    }

    /// Move to the next question, wrapping to the first.
    pub fn next(&mut self) -> Option<&ProblemSetEntry> {
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.current()
    }

    /// Move to the previous question, wrapping to the last.
    pub fn prev(&mut self) -> Option<&ProblemSetEntry> {
        let len = self.entries.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.current()
    }

    /// Move to the question labelled `label` (e.g. `"Q-3"`).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if no entry carries that label.
    pub fn jump_to(&mut self, label: &str) -> Result<&ProblemSetEntry, SessionError> {
        let position = label
            .trim()
            .parse::<SequenceNumber>()
            .ok()
            .and_then(|seq| self.entries.position(seq))
            .ok_or_else(|| SessionError::UnknownQuestion(label.to_owned()))?;
        self.cursor = position;
        self.current()
            .ok_or_else(|| SessionError::UnknownQuestion(label.to_owned()))
    }

    /// Answer the current question with `choice` and move to the next one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` if the current question is done, or
    /// `SessionError::UnknownChoice` if `choice` is not one of its displayed options.
    pub fn submit_answer(
        &mut self,
        choice: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let entry = self
            .entries
            .get_mut(self.cursor)
            .ok_or(SessionError::Empty)?;
        if entry.done() {
            return Err(SessionError::AlreadyAnswered(entry.sequence_number()));
        }
        if !entry.choices().iter().any(|c| c.trim() == choice.trim()) {
            return Err(SessionError::UnknownChoice(choice.to_owned()));
        }

        let correct = entry.is_correct_choice(choice);
        entry.record(correct);
        let sequence_number = entry.sequence_number();
        let correct_answer = entry.answer().to_owned();

        if self.completed_at.is_none() && self.entries.all_done() {
            self.completed_at = Some(answered_at);
        }
        tracing::debug!(session = %self.id, question = %sequence_number, correct, "answer recorded");

        self.next();
        Ok(AnswerOutcome {
            sequence_number,
            correct,
            correct_answer,
            is_complete: self.is_complete(),
            is_perfect: self.is_perfect(),
        })
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.entries.len();
        let answered = self.entries.done_count();
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.all_done()
    }

    /// Every question answered, and answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.is_complete() && self.entries.correct_count() == self.entries.len()
    }

    #[must_use]
    pub fn celebration(&self) -> Celebration {
        if self.is_perfect() {
            Celebration::Fanfare
        } else if self.is_complete() {
            Celebration::Standard
        } else {
            Celebration::None
        }
    }

    /// The celebration to play aloud, if audio cues are on.
    #[must_use]
    pub fn audio_cue(&self) -> Option<Celebration> {
        match self.celebration() {
            Celebration::None => None,
            cue if self.audio_cues => Some(cue),
            _ => None,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("entries_len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("access", &self.access)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("saved_run", &self.saved_run)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
