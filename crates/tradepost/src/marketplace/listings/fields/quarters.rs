use chrono::{Datelike, NaiveDate};

/// Sentinel meaning the development is already delivered.
pub const DELIVERED_LABEL: &str = "Delivered";

/// Valid values for the `yearly_quarter_hint` field type, derived from
/// `today`. The list opens with the delivered sentinel, runs from the current
/// quarter through the end of next year, and closes with an open-ended
/// "year+2 or later" entry.
///
/// The set changes at quarter boundaries, so callers must derive it from the
/// current date on every validation run rather than caching it.
pub fn quarterly_labels(today: NaiveDate) -> Vec<String> {
    let year = today.year();
    let quarter = today.month().div_ceil(3);

    let mut labels = Vec::with_capacity(11);
    labels.push(DELIVERED_LABEL.to_string());
    for q in quarter..=4 {
        labels.push(format!("quarter {q}, {year}"));
    }
    for q in 1..=4 {
        labels.push(format!("quarter {q}, {}", year + 1));
    }
    labels.push(format!("{} or later", year + 2));
    labels
}
