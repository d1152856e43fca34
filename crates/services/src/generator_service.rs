use std::sync::Arc;

use rand::Rng;

use quiz_core::model::{QuestionBank, TagName, TagSet, join_tags};
use quiz_core::{Clock, DEFAULT_CHOICES, sample_problem_set_with, shuffle_problem_set_with};
use storage::repository::QuestionSource;

use crate::access::Access;
use crate::error::GeneratorError;
use crate::sessions::QuizSession;

/// Builds problem sets from the question bank and starts sessions on them.
#[derive(Clone)]
pub struct GeneratorService {
    clock: Clock,
    questions: Arc<dyn QuestionSource>,
    choices_per_question: usize,
}

impl GeneratorService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            questions,
            choices_per_question: DEFAULT_CHOICES,
        }
    }

    #[must_use]
    pub fn with_choices_per_question(mut self, k: usize) -> Self {
        self.choices_per_question = k;
        self
    }

    #[must_use]
    pub fn choices_per_question(&self) -> usize {
        self.choices_per_question
    }

    /// Load and normalize the bank.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Storage` if the source cannot be read.
    pub async fn load_bank(&self) -> Result<QuestionBank, GeneratorError> {
        Ok(self.questions.load_bank().await?)
    }

    /// Every distinct tag in the bank, sorted.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Storage` if the source cannot be read.
    pub async fn tag_catalog(&self) -> Result<Vec<TagName>, GeneratorError> {
        Ok(self.load_bank().await?.tag_catalog())
    }

    /// How many questions carry any of `tags`; the upper bound for `count`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Storage` if the source cannot be read.
    pub async fn matching_count(&self, tags: &TagSet) -> Result<usize, GeneratorError> {
        Ok(self.load_bank().await?.matching_count(tags))
    }

    /// Sample `count` questions tagged with any of `tags` and start a session on them.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::AccessDenied` without generator access,
    /// `GeneratorError::Quiz` for an invalid selection or too few choices, and
    /// `GeneratorError::Session` when the selection is empty.
    #[tracing::instrument(skip_all, fields(tags = %join_tags(tags.iter()), count = count))]
    pub async fn generate(
        &self,
        access: Access,
        tags: &TagSet,
        count: usize,
    ) -> Result<QuizSession, GeneratorError> {
        if !access.generator {
            tracing::warn!("generate attempted without generator access");
            return Err(GeneratorError::AccessDenied);
        }
        let bank = self.load_bank().await?;
        self.start_session_with(&mut rand::rng(), &bank, access, tags, count)
    }

    /// Synchronous core of [`Self::generate`] with an explicit RNG.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn start_session_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bank: &QuestionBank,
        access: Access,
        tags: &TagSet,
        count: usize,
    ) -> Result<QuizSession, GeneratorError> {
        if !access.generator {
            return Err(GeneratorError::AccessDenied);
        }
        let drawn = sample_problem_set_with(rng, bank.records(), tags, count)?;
        let shuffled = shuffle_problem_set_with(rng, &drawn, self.choices_per_question)?;
        let session = QuizSession::new(shuffled, access, tags.clone(), self.clock.now())?;
        tracing::info!(session = %session.id(), questions = session.problem_set().len(), "problem set ready");
        Ok(session)
    }
}
