use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, decimal_to_f64, epoch_millis_to_datetime};
use crate::error::ChartResult;

/// Raw cell value stored in a data point.
///
/// JSON numbers load as `Number`, RFC 3339 strings as `Date`, any other string
/// as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

/// Hashable identity of a [`Value`] after date normalization.
///
/// Dates collapse onto their epoch-millisecond number so a date and the
/// equivalent timestamp deduplicate to one domain entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Numeric(OrderedFloat<f64>),
    Text(String),
}

impl Value {
    pub fn from_decimal(value: Decimal) -> ChartResult<Self> {
        Ok(Self::Number(decimal_to_f64(value, "value")?))
    }

    /// Rebuilds a date value from its canonical epoch-millisecond form.
    #[must_use]
    pub fn from_epoch_millis(millis: f64) -> Option<Self> {
        epoch_millis_to_datetime(millis).map(Self::Date)
    }

    /// Numeric view used for ranges and continuous scales.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Date(time) => Some(datetime_to_epoch_millis(*time)),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    #[must_use]
    pub fn canonical_key(&self) -> ValueKey {
        match self {
            Self::Number(_) | Self::Date(_) => {
                ValueKey::Numeric(OrderedFloat(self.as_number().unwrap_or(f64::NAN)))
            }
            Self::Text(text) => ValueKey::Text(text.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Date(time) => f.write_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// Total order used for every discrete domain.
///
/// When both sides are numeric (numbers or dates) they compare by epoch/number
/// value; any comparison involving text compares display strings.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        _ => left.to_string().cmp(&right.to_string()),
    }
}

/// Deduplicates by canonical key (first occurrence wins) and sorts.
///
/// A domain made only of numeric values sorts numerically; a domain with any
/// text sorts every entry lexically by its display string, so mixed domains
/// stay deterministic.
#[must_use]
pub fn unique_sorted(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut seen = IndexSet::new();
    let mut unique = Vec::new();
    for value in values {
        if seen.insert(value.canonical_key()) {
            unique.push(value);
        }
    }

    if unique.iter().all(Value::is_numeric) {
        unique.sort_by(compare_values);
    } else {
        unique.sort_by_cached_key(ToString::to_string);
    }
    unique
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{Value, compare_values, unique_sorted};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn json_strings_resolve_to_dates_or_text() {
        let date: Value = serde_json::from_str("\"2024-01-15T00:00:00Z\"").expect("date");
        let text: Value = serde_json::from_str("\"north\"").expect("text");
        let number: Value = serde_json::from_str("4.5").expect("number");
        assert!(matches!(date, Value::Date(_)));
        assert_eq!(text, Value::Text("north".to_owned()));
        assert_eq!(number, Value::Number(4.5));
    }

    #[test]
    fn dates_and_equal_timestamps_deduplicate() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let millis = time.timestamp_millis() as f64;
        let values = unique_sorted([Value::Date(time), Value::Number(millis)]);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], Value::Date(time));
    }

    #[test]
    fn numeric_domain_sorts_numerically() {
        let values = unique_sorted([10.0, 2.0, 33.0, 2.0].map(Value::from));
        assert_eq!(values, [2.0, 10.0, 33.0].map(Value::from).to_vec());
    }

    #[test]
    fn mixed_domain_sorts_lexically() {
        let values = unique_sorted([Value::from(10.0), Value::from("b"), Value::from(9.0)]);
        assert_eq!(
            values,
            vec![Value::from(10.0), Value::from(9.0), Value::from("b")]
        );
    }

    #[test]
    fn numbers_and_dates_compare_by_epoch_value() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Value::Number(time.timestamp_millis() as f64 + 1.0);
        assert_eq!(compare_values(&Value::Date(time), &later), Ordering::Less);
        assert_eq!(
            compare_values(&Value::from(10.0), &Value::from("9")),
            Ordering::Less
        );
    }

    #[test]
    fn decimal_values_load_as_numbers() {
        let value = Value::from_decimal(Decimal::new(1_250, 2)).expect("decimal");
        assert_eq!(value, Value::Number(12.5));
        assert_eq!(value.as_number(), Some(12.5));
    }

    #[test]
    fn epoch_millis_round_trip_to_date_value() {
        let time = Utc.with_ymd_and_hms(2023, 6, 30, 8, 0, 0).unwrap();
        let millis = Value::Date(time).as_number().expect("numeric");
        assert_eq!(Value::from_epoch_millis(millis), Some(Value::Date(time)));
    }
}
