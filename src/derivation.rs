//! Score coercion, per-record totals and batch ranking.

use crate::student::{StudentRecord, SubjectScore};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.]").unwrap();
    static ref LEADING_NUMBER: Regex = Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)").unwrap();
}

/// Parse the longest numeric prefix of `text`, e.g. `"92分"` → 92.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Coerce a subject cell to a number.
///
/// Everything except ASCII digits and `.` is discarded first, then the leading
/// number is read. Text with no digits coerces to 0. Signs are discarded with
/// the other characters, so `"-5"` reads as 5.
///
/// # Examples
/// ```
/// use report_card::derivation::coerce_score;
///
/// assert_eq!(coerce_score("92分"), 92.0);
/// assert_eq!(coerce_score("8.5.1"), 8.5);
/// assert_eq!(coerce_score("优秀"), 0.0);
/// ```
pub fn coerce_score(text: &str) -> f64 {
    let digits = NON_NUMERIC.replace_all(text.trim(), "");
    parse_leading_number(&digits).unwrap_or(0.0)
}

/// Round half away from zero at one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fixed one-decimal text, e.g. `85` → `"85.0"`.
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", round_one_decimal(value))
}

/// Average text for a record: one decimal, or the bare `"0"` when nothing counted.
pub fn format_average(total: f64, valid_count: usize) -> String {
    if valid_count == 0 {
        "0".to_string()
    } else {
        format_one_decimal(total / valid_count as f64)
    }
}

/// Fill scores, total, valid count and average from the record's fields.
///
/// A score of exactly 0 is indistinguishable from a missing score: it neither
/// adds to the total nor counts toward the average.
pub fn derive(record: &mut StudentRecord) {
    let scores: Vec<SubjectScore> = record
        .subjects
        .iter()
        .map(|subject| {
            let raw = record.fields.get(subject).unwrap_or_default().to_string();
            let score = coerce_score(&raw);
            SubjectScore {
                subject: subject.clone(),
                raw,
                score,
            }
        })
        .collect();

    let (total, valid) = scores
        .iter()
        .filter(|s| s.is_valid())
        .fold((0.0, 0usize), |(total, count), s| (total + s.score, count + 1));

    record.scores = scores;
    record.total_score = total;
    record.valid_score_count = valid;
    record.average_score = format_average(total, valid);
}

/// Sort by total score, highest first, and number the records from 1.
///
/// The sort is stable: equal totals keep their encounter order and still get
/// distinct, consecutive ranks.
pub fn assign_ranks(records: &mut [StudentRecord]) {
    records.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    for (index, record) in records.iter_mut().enumerate() {
        record.rank = index + 1;
    }
}
