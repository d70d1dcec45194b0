use std::collections::HashSet;

use crate::QuestionRecord;

/// Keeps the first record of every fingerprint, preserving fetch order.
pub fn dedupe_by_fingerprint(records: Vec<QuestionRecord>) -> Vec<QuestionRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.fingerprint().clone()))
        .collect()
}
