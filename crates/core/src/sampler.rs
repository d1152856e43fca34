//! Tag-filtered sampling of question records into a problem set.

use rand::Rng;
use rand::seq::index;

use crate::error::QuizError;
use crate::model::{ProblemSet, QuestionRecord, TagSet};

/// Records carrying any of `tags`, in input order.
///
/// An empty tag selection matches nothing.
#[must_use]
pub fn matching_records<'a>(records: &'a [QuestionRecord], tags: &TagSet) -> Vec<&'a QuestionRecord> {
    records.iter().filter(|r| r.matches_any(tags)).collect()
}

/// Draw `count` distinct records matching `tags` using the thread RNG.
///
/// # Errors
///
/// See [`sample_problem_set_with`].
pub fn sample_problem_set(
    records: &[QuestionRecord],
    tags: &TagSet,
    count: usize,
) -> Result<ProblemSet, QuizError> {
    sample_problem_set_with(&mut rand::rng(), records, tags, count)
}

/// Draw `count` distinct records matching `tags` uniformly without replacement.
///
/// The result is ordered by ascending source id and numbered `Q-1..Q-count`.
/// An empty `tags` selection yields an empty set without error.
///
/// # Errors
///
/// Returns `QuizError::InvalidSelection` if `count` is zero, or
/// `QuizError::InsufficientCandidates` if fewer than `count` records match.
pub fn sample_problem_set_with<R: Rng + ?Sized>(
    rng: &mut R,
    records: &[QuestionRecord],
    tags: &TagSet,
    count: usize,
) -> Result<ProblemSet, QuizError> {
    if tags.is_empty() {
        return Ok(ProblemSet::default());
    }
    if count < 1 {
        return Err(QuizError::InvalidSelection { requested: count });
    }

    let candidates = matching_records(records, tags);
    if count > candidates.len() {
        return Err(QuizError::InsufficientCandidates {
            requested: count,
            available: candidates.len(),
        });
    }

    let mut drawn: Vec<&QuestionRecord> = index::sample(rng, candidates.len(), count)
        .into_iter()
        .map(|i| candidates[i])
        .collect();
    drawn.sort_by_key(|r| r.id());

    Ok(ProblemSet::from_records(drawn))
}
