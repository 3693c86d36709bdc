//! Pitch attributes carried by a session.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::foundation::ValidationError;

/// Key of the free-text pitch.
pub const PITCH_TEXT: &str = "pitch_text";
/// Key of the requested investment amount, in dollars.
pub const AMOUNT_INVESTED: &str = "amount_invested";
/// Key of the equity percentage offered in exchange.
pub const PERCENTAGE_EQUITY: &str = "percentage_equity";

/// Mapping of pitch attributes.
///
/// The well-known keys are [`PITCH_TEXT`], [`AMOUNT_INVESTED`] and
/// [`PERCENTAGE_EQUITY`]; any additional field supplied by a caller is kept
/// verbatim. Merging is shallow and later keys win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchData(BTreeMap<String, Value>);

impl PitchData {
    /// Creates empty pitch data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates pitch data holding the three well-known fields.
    pub fn from_pitch(text: impl Into<String>, amount_invested: i64, percentage_equity: i64) -> Self {
        Self::new()
            .with(PITCH_TEXT, text.into())
            .with(AMOUNT_INVESTED, amount_invested)
            .with(PERCENTAGE_EQUITY, percentage_equity)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or overwrites a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merges `updates` into this map; keys in `updates` overwrite.
    pub fn merge(&mut self, updates: PitchData) {
        self.0.extend(updates.0);
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The pitch text, if it is a string.
    pub fn pitch_text(&self) -> Option<&str> {
        self.get(PITCH_TEXT).and_then(Value::as_str)
    }

    /// The requested amount in whole dollars.
    ///
    /// Fractional amounts are rounded; numeric strings are accepted.
    pub fn amount_invested(&self) -> Option<i64> {
        self.get(AMOUNT_INVESTED).and_then(value_as_i64)
    }

    /// The offered equity percentage, as given.
    pub fn percentage_equity(&self) -> Option<&Value> {
        self.get(PERCENTAGE_EQUITY)
    }

    /// Investment request line used by every transcript.
    pub fn investment_request(&self) -> String {
        let amount = format_dollars(self.amount_invested().unwrap_or(0));
        let equity = self
            .percentage_equity()
            .map(display_value)
            .unwrap_or_else(|| "0".to_string());
        format!("Investment Request: ${} for {}% equity", amount, equity)
    }

    /// Extracts the fields required to persist a pitch record.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the pitch text is missing or blank
    /// - `OutOfRange` if the equity is outside 0..=100
    pub fn to_submission(&self) -> Result<PitchSubmission, ValidationError> {
        let pitch_text = self
            .pitch_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ValidationError::empty_field(PITCH_TEXT))?
            .to_string();

        let percentage_equity = self
            .percentage_equity()
            .and_then(value_as_i64)
            .unwrap_or(0);
        if !(0..=100).contains(&percentage_equity) {
            return Err(ValidationError::out_of_range(
                PERCENTAGE_EQUITY,
                0,
                100,
                percentage_equity,
            ));
        }

        Ok(PitchSubmission {
            pitch_text,
            amount_invested: self.amount_invested().unwrap_or(0),
            percentage_equity: percentage_equity as i32,
        })
    }
}

impl FromIterator<(String, Value)> for PitchData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The persisted shape of a pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchSubmission {
    pub pitch_text: String,
    pub amount_invested: i64,
    pub percentage_equity: i32,
}

/// Formats whole dollars with thousands separators.
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().replace(',', "").parse::<i64>().ok(),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_pitch_sets_well_known_fields() {
        let data = PitchData::from_pitch("Solar backpacks", 100_000, 10);
        assert_eq!(data.pitch_text(), Some("Solar backpacks"));
        assert_eq!(data.amount_invested(), Some(100_000));
        assert_eq!(data.percentage_equity(), Some(&json!(10)));
    }

    #[test]
    fn merge_overwrites_and_keeps_extra_fields() {
        let mut data = PitchData::from_pitch("Old", 50_000, 5).with("company", "Acme");
        data.merge(PitchData::new().with(PITCH_TEXT, "New").with("stage", "seed"));

        assert_eq!(data.pitch_text(), Some("New"));
        assert_eq!(data.amount_invested(), Some(50_000));
        assert_eq!(data.get("company"), Some(&json!("Acme")));
        assert_eq!(data.get("stage"), Some(&json!("seed")));
    }

    #[test]
    fn investment_request_formats_amount_and_equity() {
        let data = PitchData::from_pitch("X", 1_250_000, 15);
        assert_eq!(
            data.investment_request(),
            "Investment Request: $1,250,000 for 15% equity"
        );
    }

    #[test]
    fn investment_request_defaults_to_zero() {
        assert_eq!(
            PitchData::new().investment_request(),
            "Investment Request: $0 for 0% equity"
        );
    }

    #[test]
    fn fractional_equity_is_displayed_as_given() {
        let data = PitchData::new().with(PERCENTAGE_EQUITY, 12.5);
        assert!(data.investment_request().ends_with("for 12.5% equity"));
    }

    #[test]
    fn amount_accepts_numeric_strings() {
        let data = PitchData::new().with(AMOUNT_INVESTED, "250,000");
        assert_eq!(data.amount_invested(), Some(250_000));
    }

    #[test]
    fn format_dollars_groups_thousands() {
        assert_eq!(format_dollars(0), "0");
        assert_eq!(format_dollars(999), "999");
        assert_eq!(format_dollars(1000), "1,000");
        assert_eq!(format_dollars(100_000), "100,000");
        assert_eq!(format_dollars(-1_234_567), "-1,234,567");
    }

    #[test]
    fn to_submission_requires_pitch_text() {
        let err = PitchData::new().with(AMOUNT_INVESTED, 10).to_submission().unwrap_err();
        assert_eq!(err, ValidationError::empty_field(PITCH_TEXT));
    }

    #[test]
    fn to_submission_rejects_equity_over_100() {
        let err = PitchData::from_pitch("X", 10, 120).to_submission().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { actual: 120, .. }));
    }

    #[test]
    fn to_submission_extracts_fields() {
        let submission = PitchData::from_pitch("  Pet rocks ", 20_000, 25)
            .to_submission()
            .unwrap();
        assert_eq!(submission.pitch_text, "Pet rocks");
        assert_eq!(submission.amount_invested, 20_000);
        assert_eq!(submission.percentage_equity, 25);
    }

    #[test]
    fn serializes_as_plain_object() {
        let data = PitchData::from_pitch("X", 1, 2);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({"amount_invested": 1, "percentage_equity": 2, "pitch_text": "X"}));
    }
}
