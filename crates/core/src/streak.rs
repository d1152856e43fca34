//! Run lengths of consecutive correct answers.

/// Streak value at each position of `outcomes`.
///
/// A `false` outcome resets the streak to 0; a `true` outcome extends the
/// streak ending at the previous position by one.
#[must_use]
pub fn compute_streaks(outcomes: &[bool]) -> Vec<u32> {
    let mut streaks = Vec::with_capacity(outcomes.len());
    let mut current = 0_u32;
    for &correct in outcomes {
        current = if correct { current.saturating_add(1) } else { 0 };
        streaks.push(current);
    }
    streaks
}

/// Longest streak in `streaks`, or 0 when empty.
#[must_use]
pub fn max_streak(streaks: &[u32]) -> u32 {
    streaks.iter().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(compute_streaks(&[]).is_empty());
        assert_eq!(max_streak(&[]), 0);
    }

    #[test]
    fn known_sequences() {
        assert_eq!(compute_streaks(&[true]), vec![1]);
        assert_eq!(compute_streaks(&[true, true, false, true]), vec![1, 2, 0, 1]);
        assert_eq!(compute_streaks(&[false, false]), vec![0, 0]);
        assert_eq!(
            compute_streaks(&[false, true, true, true, false, true, true]),
            vec![0, 1, 2, 3, 0, 1, 2]
        );
    }

    #[test]
    fn all_true_counts_up() {
        let streaks = compute_streaks(&[true; 6]);
        assert_eq!(streaks, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(max_streak(&streaks), 6);
    }

    #[test]
    fn output_length_matches_input() {
        let outcomes: Vec<bool> = (0..37).map(|i| i % 3 != 0).collect();
        let streaks = compute_streaks(&outcomes);
        assert_eq!(streaks.len(), outcomes.len());
        for (i, s) in streaks.iter().enumerate() {
            if outcomes[i] {
                let prev = if i == 0 { 0 } else { streaks[i - 1] };
                assert_eq!(*s, prev + 1);
            } else {
                assert_eq!(*s, 0);
            }
        }
    }
}
