use pretty_assertions::assert_eq;
use quiz_export_core::{dedupe_by_fingerprint, QuestionRecord};

fn record(question: &str, options: &[&str], correct: &str) -> QuestionRecord {
    QuestionRecord::new(
        question,
        options.iter().map(|o| o.to_string()).collect(),
        correct,
        "",
    )
}

#[test]
fn first_occurrence_wins_and_order_is_kept() {
    let records = vec![
        record("Capital of France?", &["Paris", "Rome"], "Paris"),
        record("2+2?", &["3", "4"], "4"),
        record("Capital of France?", &["Paris", "Rome"], "Rome (later copy)"),
        record("Largest planet?", &["Jupiter", "Mars"], "Jupiter"),
        record("2+2?", &["3", "4"], "4"),
    ];

    let unique = dedupe_by_fingerprint(records);

    let summary: Vec<_> = unique
        .iter()
        .map(|r| (r.question_text(), r.correct_answer()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Capital of France?", "Paris"),
            ("2+2?", "4"),
            ("Largest planet?", "Jupiter"),
        ]
    );
}

#[test]
fn same_prompt_with_different_options_is_kept() {
    let records = vec![
        record("Pick one", &["red", "blue"], "red"),
        record("Pick one", &["green", "blue"], "green"),
    ];
    assert_eq!(dedupe_by_fingerprint(records).len(), 2);
}

#[test]
fn prompts_differing_after_the_truncation_point_collide() {
    let shared = "x".repeat(50);
    let records = vec![
        record(&format!("{shared} first"), &["a"], "a"),
        record(&format!("{shared} second"), &["a"], "a"),
    ];
    let unique = dedupe_by_fingerprint(records);
    assert_eq!(unique.len(), 1);
    assert!(unique[0].question_text().ends_with("first"));
}

#[test]
fn output_never_grows() {
    let records: Vec<_> = (0..10)
        .map(|i| record(&format!("Q{}", i % 4), &["a", "b"], "a"))
        .collect();
    let unique = dedupe_by_fingerprint(records.clone());
    assert!(unique.len() <= records.len());
    assert_eq!(unique.len(), 4);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(dedupe_by_fingerprint(Vec::new()).is_empty());
}
