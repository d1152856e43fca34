//! Report of the questions a run got wrong.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{LIST_SEPARATOR, ProblemSet, QuestionId, SequenceNumber, TagSet, join_tags};

/// One missed question as shown to the reviewer.
///
/// `id` is only present for authorized viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    pub sequence_number: SequenceNumber,
    pub question: String,
    pub answer: String,
    pub tags: TagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuestionId>,
}

/// Missed questions plus their aggregate id and tag lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncorrectReport {
    pub items: Vec<ReportItem>,
    /// Distinct missed ids, ascending, joined with `"; "`.
    pub missed_ids: String,
    /// Distinct tags of missed questions, sorted, joined with `"; "`.
    pub missed_tags: String,
}

impl IncorrectReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collect the entries with `correct = false`, in set order.
#[must_use]
pub fn build_report(entries: &ProblemSet, authorized: bool) -> IncorrectReport {
    let missed: Vec<_> = entries.entries().iter().filter(|e| !e.correct()).collect();

    let items = missed
        .iter()
        .map(|entry| ReportItem {
            sequence_number: entry.sequence_number(),
            question: entry.question().to_owned(),
            answer: entry.answer().to_owned(),
            tags: entry.tags().clone(),
            id: authorized.then(|| entry.id()),
        })
        .collect();

    let ids: BTreeSet<QuestionId> = missed.iter().map(|e| e.id()).collect();
    let missed_ids = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);
    let missed_tags = join_tags(missed.iter().flat_map(|e| e.tags().iter()));

    IncorrectReport {
        items,
        missed_ids,
        missed_tags,
    }
}

/// Distinct tags across every entry of the set, sorted and joined with `"; "`.
#[must_use]
pub fn run_tags(entries: &ProblemSet) -> String {
    join_tags(entries.entries().iter().flat_map(|e| e.tags().iter()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::{LIST_DELIMITER, QuestionRecord, parse_tag_list};

    fn record(id: u64, tags: &str) -> QuestionRecord {
        QuestionRecord::new(
            QuestionId::new(id),
            format!("Question {id}"),
            ["a", "b", "c", "d"],
            "c",
            parse_tag_list(tags),
        )
        .unwrap()
    }

    fn answered(records: &[QuestionRecord], outcomes: &[bool]) -> ProblemSet {
        let mut set = ProblemSet::from_records(records);
        for (i, correct) in outcomes.iter().enumerate() {
            set.get_mut(i).unwrap().record(*correct);
        }
        set
    }

    fn split(joined: &str) -> Vec<String> {
        joined
            .split(LIST_DELIMITER)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[test]
    fn report_contains_only_missed_entries() {
        let records = [record(1, "PCP"), record(2, "GEN"), record(3, "PCP"), record(4, "CHE")];
        let set = answered(&records, &[true, false, true, true]);

        let report = build_report(&set, false);
        assert_eq!(report.len(), 1);
        let item = &report.items[0];
        assert_eq!(item.sequence_number.to_string(), "Q-2");
        assert_eq!(item.question, "Question 2");
        assert_eq!(item.answer, "c");
        assert_eq!(item.id, None);
    }

    #[test]
    fn authorization_controls_the_id_field() {
        let records = [record(1, "PCP"), record(2, "GEN")];
        let set = answered(&records, &[true, false]);

        let public = build_report(&set, false);
        let private = build_report(&set, true);
        assert_eq!(private.items[0].id, Some(QuestionId::new(2)));

        let public_json = serde_json::to_value(&public.items[0]).unwrap();
        assert!(public_json.get("id").is_none());
        let private_json = serde_json::to_value(&private.items[0]).unwrap();
        assert_eq!(private_json["id"], 2);
        assert_eq!(private_json["sequence_number"], "Q-2");
    }

    #[test]
    fn aggregates_are_sorted_and_distinct() {
        let records = [
            record(12, "PCP; Distillation"),
            record(3, "Distillation"),
            record(40, "GEN"),
            record(100, "PCP"),
        ];
        let set = answered(&records, &[false, false, true, false]);
        let report = build_report(&set, true);

        assert_eq!(report.missed_ids, "3; 12; 100");
        assert_eq!(report.missed_tags, "Distillation; PCP");
    }

    #[test]
    fn aggregates_round_trip_through_naive_split() {
        let records = [record(5, "A; B"), record(6, "B; C"), record(7, "C")];
        let set = answered(&records, &[false, false, false]);
        let report = build_report(&set, true);

        let ids: BTreeSet<String> = split(&report.missed_ids).into_iter().collect();
        let expected_ids: BTreeSet<String> = ["5", "6", "7"].map(String::from).into();
        assert_eq!(ids, expected_ids);
        assert_eq!(split(&report.missed_ids).len(), ids.len());

        let tags = split(&report.missed_tags);
        let distinct: BTreeSet<&String> = tags.iter().collect();
        assert_eq!(tags.len(), distinct.len());
        assert_eq!(tags, vec!["A", "B", "C"]);
    }

    #[test]
    fn perfect_run_has_empty_report() {
        let records = [record(1, "PCP"), record(2, "GEN")];
        let set = answered(&records, &[true, true]);
        let report = build_report(&set, true);
        assert!(report.is_empty());
        assert_eq!(report.missed_ids, "");
        assert_eq!(report.missed_tags, "");
        assert_eq!(run_tags(&set), "GEN; PCP");
    }
}
