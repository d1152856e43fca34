use std::sync::Arc;

use quiz_core::model::{QuestionDraft, QuestionRecord, TagName};
use storage::repository::QuestionRepository;

use crate::access::Access;
use crate::error::QuestionFormError;

/// Validates question drafts and appends them to the bank.
#[derive(Clone)]
pub struct QuestionFormService {
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionFormService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Tags already used in the bank, offered as suggestions by the form.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFormError::Storage` if the bank cannot be read.
    pub async fn known_tags(&self) -> Result<Vec<TagName>, QuestionFormError> {
        Ok(self.questions.load_bank().await?.tag_catalog())
    }

    /// Validate `draft` and append it with the next free id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFormError::Unauthorized` without authorization,
    /// `QuestionFormError::Question` if the draft is invalid, and
    /// `QuestionFormError::Storage` if the append fails.
    #[tracing::instrument(skip_all)]
    pub async fn submit(
        &self,
        access: Access,
        draft: QuestionDraft,
    ) -> Result<QuestionRecord, QuestionFormError> {
        if !access.authorized {
            return Err(QuestionFormError::Unauthorized);
        }
        let validated = draft.validate()?;
        let record = self.questions.append_question(validated).await?;
        tracing::info!(id = %record.id(), "question added");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::model::{QuestionError, QuestionId};
    use storage::repository::{InMemoryRepository, QuestionSource};

    use super::*;

    fn draft(answer: &str) -> QuestionDraft {
        QuestionDraft {
            question: "  What separates by volatility?  ".into(),
            choices: [
                "Distillation".into(),
                "Filtration".into(),
                "Drying".into(),
                "Screening".into(),
            ],
            answer: answer.into(),
            tags: vec!["Distillation".into(), " PCP ".into()],
        }
    }

    #[tokio::test]
    async fn authorized_submit_appends_with_next_id() {
        let repo = InMemoryRepository::new();
        let svc = QuestionFormService::new(Arc::new(repo.clone()));

        let first = svc.submit(Access::full(), draft("Distillation")).await.unwrap();
        let second = svc.submit(Access::full(), draft("Drying")).await.unwrap();
        assert_eq!(first.id(), QuestionId::new(1));
        assert_eq!(second.id(), QuestionId::new(2));
        assert_eq!(first.question(), "What separates by volatility?");

        let bank = repo.load_bank().await.unwrap();
        assert_eq!(bank.len(), 2);
        let tags: Vec<String> = svc
            .known_tags()
            .await
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, vec!["Distillation", "PCP"]);
    }

    #[tokio::test]
    async fn unauthorized_submit_is_rejected() {
        let repo = InMemoryRepository::new();
        let svc = QuestionFormService::new(Arc::new(repo.clone()));
        let err = svc
            .submit(Access::default(), draft("Distillation"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionFormError::Unauthorized));
        assert!(repo.load_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_is_not_stored() {
        let repo = InMemoryRepository::new();
        let svc = QuestionFormService::new(Arc::new(repo.clone()));
        let err = svc
            .submit(Access::full(), draft("Evaporation"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionFormError::Question(QuestionError::AnswerNotInChoices(_))
        ));
        assert!(repo.load_rows().await.unwrap().is_empty());
    }
}
