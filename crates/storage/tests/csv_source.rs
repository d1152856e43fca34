use std::fs;

use quiz_core::model::{QuestionDraft, QuestionError, QuestionId, TagName};
use storage::csv_source::CsvQuestionSource;
use storage::repository::{QuestionRepository, QuestionSource};

const BANK: &str = "\
ID,Question,Choices,Answer,Tags
1,What is 2 + 2?,3; 4; 5; 6,4,GEN
2,Which column separates by volatility?, Distillation ;Absorption; Extraction; Drying ,Distillation,PCP; Distillation
3,,,,
4,Unanswerable?,a; b; c; d,e,GEN
x,Unnumbered?,a; b; c; d,a,GEN
6,Too short?,yes; no,yes,GEN
,,,,
";

fn draft() -> QuestionDraft {
    QuestionDraft {
        question: "Boiling point of water at 1 atm?".into(),
        choices: ["90 C".into(), "100 C".into(), "110 C".into(), "120 C".into()],
        answer: "100 C".into(),
        tags: vec!["GEN".into()],
    }
}

#[tokio::test]
async fn loads_and_normalizes_a_csv_bank() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qna.csv");
    fs::write(&path, BANK).unwrap();

    let source = CsvQuestionSource::new(&path);
    let bank = source.load_bank().await.unwrap();

    assert_eq!(bank.len(), 2);
    assert_eq!(bank.dropped(), 2);
    assert_eq!(bank.rejected().len(), 3);
    assert_eq!(bank.rejected()[0].id, Some(QuestionId::new(4)));
    assert_eq!(bank.rejected()[1].id, None);
    assert_eq!(bank.rejected()[1].error, QuestionError::MissingId);
    assert_eq!(
        bank.rejected()[2].error,
        QuestionError::TooFewChoices {
            required: 4,
            available: 2
        }
    );

    let second = &bank.records()[1];
    assert_eq!(
        second.choices(),
        ["Distillation", "Absorption", "Extraction", "Drying"]
    );
    let catalog: Vec<String> = bank.tag_catalog().iter().map(TagName::to_string).collect();
    assert_eq!(catalog, vec!["Distillation", "GEN", "PCP"]);
}

#[tokio::test]
async fn append_continues_after_highest_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qna.csv");
    // No trailing newline on purpose.
    fs::write(&path, BANK.trim_end()).unwrap();

    let source = CsvQuestionSource::new(&path);
    let record = source
        .append_question(draft().validate().unwrap())
        .await
        .unwrap();
    assert_eq!(record.id(), QuestionId::new(5));

    let bank = source.load_bank().await.unwrap();
    assert_eq!(bank.len(), 3);
    let appended = bank.records().last().unwrap();
    assert_eq!(appended.question(), "Boiling point of water at 1 atm?");
    assert_eq!(appended.answer(), "100 C");
}

#[tokio::test]
async fn append_creates_a_missing_file_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.csv");

    let source = CsvQuestionSource::new(&path);
    let record = source
        .append_question(draft().validate().unwrap())
        .await
        .unwrap();
    assert_eq!(record.id(), QuestionId::new(1));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ID,Question,Choices,Answer,Tags\n"));
    assert_eq!(source.load_bank().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_file_is_a_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvQuestionSource::new(dir.path().join("absent.csv"));
    assert!(source.load_rows().await.is_err());
}
