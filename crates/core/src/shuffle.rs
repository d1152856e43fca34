//! Per-question selection and ordering of the displayed answer choices.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::QuizError;
use crate::model::{ProblemSet, ProblemSetEntry};

/// Number of options shown per question.
pub const DEFAULT_CHOICES: usize = 4;

/// Pick and order `k` choices for `entry` using the thread RNG.
///
/// # Errors
///
/// See [`shuffle_choices_with`].
pub fn shuffle_choices(entry: &ProblemSetEntry, k: usize) -> Result<ProblemSetEntry, QuizError> {
    shuffle_choices_with(&mut rand::rng(), entry, k)
}

/// Return a copy of `entry` showing exactly `k` choices in random order.
///
/// The answer is always one of them; the other `k - 1` are drawn uniformly
/// from the remaining options. `done` and `correct` are left unchanged.
///
/// # Errors
///
/// Returns `QuizError::InvalidSelection` if `k` is zero, or
/// `QuizError::InsufficientChoices` if the entry has fewer than `k` choices.
pub fn shuffle_choices_with<R: Rng + ?Sized>(
    rng: &mut R,
    entry: &ProblemSetEntry,
    k: usize,
) -> Result<ProblemSetEntry, QuizError> {
    if k == 0 {
        return Err(QuizError::InvalidSelection { requested: k });
    }
    let available = entry.choices().len();
    if available < k {
        return Err(QuizError::InsufficientChoices {
            required: k,
            available,
        });
    }

    let answer = entry.answer();
    let others: Vec<&String> = entry.choices().iter().filter(|c| *c != answer).collect();

    let mut shown: Vec<String> = Vec::with_capacity(k);
    shown.push(answer.to_owned());
    shown.extend(others.choose_multiple(rng, k - 1).map(|c| (*c).clone()));
    shown.shuffle(rng);

    Ok(entry.with_choices(shown))
}

/// Shuffle every entry of `set`, leaving it untouched if any entry is short of choices.
///
/// # Errors
///
/// Returns the first error from [`shuffle_choices_with`].
pub fn shuffle_problem_set_with<R: Rng + ?Sized>(
    rng: &mut R,
    set: &ProblemSet,
    k: usize,
) -> Result<ProblemSet, QuizError> {
    let entries = set
        .entries()
        .iter()
        .map(|entry| shuffle_choices_with(rng, entry, k))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProblemSet::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::{QuestionId, QuestionRecord, parse_tag_list};

    fn entry(choices: &[&str], answer: &str) -> ProblemSetEntry {
        let record = QuestionRecord::new(
            QuestionId::new(1),
            "Which one?",
            choices.iter().copied(),
            answer,
            parse_tag_list("PCP"),
        )
        .unwrap();
        ProblemSetEntry::from_record(&record, 0)
    }

    #[test]
    fn returns_k_choices_including_answer() {
        let original = entry(&["a", "b", "c", "d", "e", "f"], "e");
        let pool: HashSet<&str> = original.choices().iter().map(String::as_str).collect();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let shuffled = shuffle_choices_with(&mut rng, &original, DEFAULT_CHOICES).unwrap();
            assert_eq!(shuffled.choices().len(), DEFAULT_CHOICES);
            assert!(shuffled.choices().iter().any(|c| c == "e"));
            assert_eq!(shuffled.answer(), "e");

            let shown: HashSet<&str> = shuffled.choices().iter().map(String::as_str).collect();
            assert_eq!(shown.len(), DEFAULT_CHOICES);
            assert!(shown.is_subset(&pool));
        }
    }

    #[test]
    fn answer_position_varies() {
        let original = entry(&["a", "b", "c", "d"], "a");
        let mut rng = StdRng::seed_from_u64(3);
        let mut positions: HashMap<usize, usize> = HashMap::new();
        for _ in 0..200 {
            let shuffled = shuffle_choices_with(&mut rng, &original, 4).unwrap();
            let pos = shuffled.choices().iter().position(|c| c == "a").unwrap();
            *positions.entry(pos).or_default() += 1;
        }
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn state_flags_are_preserved() {
        let mut original = entry(&["a", "b", "c", "d"], "b");
        original.record(true);
        let shuffled = shuffle_choices(&original, 4).unwrap();
        assert!(shuffled.done());
        assert!(shuffled.correct());
        assert_eq!(shuffled.sequence_number(), original.sequence_number());
        assert_eq!(shuffled.id(), original.id());
    }

    #[test]
    fn too_few_choices_fails() {
        let original = entry(&["a", "b", "c"], "a");
        let err = shuffle_choices(&original, 4).unwrap_err();
        assert_eq!(
            err,
            QuizError::InsufficientChoices {
                required: 4,
                available: 3
            }
        );
    }

    #[test]
    fn zero_choices_requested_fails() {
        let original = entry(&["a", "b", "c", "d"], "a");
        let err = shuffle_choices(&original, 0).unwrap_err();
        assert_eq!(err, QuizError::InvalidSelection { requested: 0 });
    }

    #[test]
    fn set_shuffle_is_all_or_nothing() {
        let good = QuestionRecord::new(
            QuestionId::new(1),
            "Q1",
            ["a", "b", "c", "d"],
            "a",
            parse_tag_list("PCP"),
        )
        .unwrap();
        let short = QuestionRecord::new(
            QuestionId::new(2),
            "Q2",
            ["a", "b"],
            "a",
            parse_tag_list("PCP"),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let ok = ProblemSet::from_records([&good]);
        let shuffled = shuffle_problem_set_with(&mut rng, &ok, 4).unwrap();
        assert_eq!(shuffled.len(), 1);

        let mixed = ProblemSet::from_records([&good, &short]);
        let err = shuffle_problem_set_with(&mut rng, &mixed, 4).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientChoices { .. }));
    }
}
