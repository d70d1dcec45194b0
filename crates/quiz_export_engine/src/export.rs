use std::borrow::Cow;

use quiz_export_core::{dedupe_by_fingerprint, QuestionRecord};

pub const FIELD_DELIMITER: char = ';';
pub const ROW_TERMINATOR: &str = "\r\n";
/// Forces spreadsheet and flashcard importers to read the file as UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{feff}';
pub const NO_EXPLANATION_PLACEHOLDER: &str = "No further explanation provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub text: String,
    pub rows: usize,
}

/// Deduplicates the records by fingerprint and encodes the survivors.
pub fn finalize(records: Vec<QuestionRecord>) -> CsvExport {
    let unique = dedupe_by_fingerprint(records);
    encode_rows(&unique)
}

/// Two-column flashcard CSV: front (prompt + numbered options) and back
/// (correct answer + explanation). BOM-prefixed, CRLF between rows.
pub fn encode_rows(records: &[QuestionRecord]) -> CsvExport {
    let mut text = String::new();
    text.push(BYTE_ORDER_MARK);
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            text.push_str(ROW_TERMINATOR);
        }
        text.push_str(&quote_field(&front_field(record)));
        text.push(FIELD_DELIMITER);
        text.push_str(&quote_field(&back_field(record)));
    }
    CsvExport {
        text,
        rows: records.len(),
    }
}

pub fn front_field(record: &QuestionRecord) -> String {
    let items: String = record
        .options()
        .iter()
        .map(|option| format!("<li>{option}</li>"))
        .collect();
    format!("{}<ol>{items}</ol>", record.question_text())
}

pub fn back_field(record: &QuestionRecord) -> String {
    let explanation = match record.explanation() {
        "" => NO_EXPLANATION_PLACEHOLDER,
        text => text,
    };
    format!(
        "<b>Correct Answer:</b> {}<br>{explanation}",
        record.correct_answer()
    )
}

fn quote_field(value: &str) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|c| matches!(c, FIELD_DELIMITER | '"' | '\r' | '\n'));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
