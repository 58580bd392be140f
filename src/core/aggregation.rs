use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::domain::{Range, extent_of};
use crate::core::{DataKeys, Series, ValueKey};
use crate::error::ChartError;

/// Layout of bar-like marks that share one key position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarVariant {
    #[default]
    Grouped,
    Stacked,
    Overlapped,
}

impl BarVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grouped => "grouped",
            Self::Stacked => "stacked",
            Self::Overlapped => "overlapped",
        }
    }
}

impl fmt::Display for BarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarVariant {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(Self::Grouped),
            "stacked" => Ok(Self::Stacked),
            "overlapped" => Ok(Self::Overlapped),
            other => Err(ChartError::InvalidConfig(format!(
                "unknown bar variant `{other}`"
            ))),
        }
    }
}

type PositionKey = SmallVec<[ValueKey; 2]>;

#[derive(Debug, Clone, Copy, Default)]
struct StackTotals {
    positive: f64,
    negative: f64,
    has_negative: bool,
}

/// Value-axis range of one panel, aware of the panel's bar variant.
///
/// Points are grouped by their position on `key_axes`. Non-stacked variants
/// take the pointwise min/max of raw values. `Stacked` sums non-negative and
/// negative values separately per position: the range spans from the most
/// negative total to the largest positive total, so a cumulative stack always
/// fits. When no position holds a negative value the lower bound is the
/// smallest positive total.
///
/// Points lacking a key or a finite numeric value are skipped. Returns `None`
/// when the panel holds no usable value.
#[must_use]
pub fn aggregate_value_range(
    series: &[Series],
    keys: &DataKeys,
    key_axes: &[String],
    value_axis: &str,
    variant: BarVariant,
) -> Option<Range> {
    match variant {
        BarVariant::Grouped | BarVariant::Overlapped => {
            numeric_extent(series, keys, value_axis)
        }
        BarVariant::Stacked => stacked_range(series, keys, key_axes, value_axis),
    }
}

fn stacked_range(
    series: &[Series],
    keys: &DataKeys,
    key_axes: &[String],
    value_axis: &str,
) -> Option<Range> {
    let mut totals: IndexMap<PositionKey, StackTotals> = IndexMap::new();
    for entry in series {
        for point in keys.points(entry) {
            let Some(value) = keys
                .axis_value(point, value_axis)
                .and_then(|value| value.as_number())
                .filter(|value| value.is_finite())
            else {
                continue;
            };
            let position: Option<PositionKey> = key_axes
                .iter()
                .map(|axis| keys.axis_value(point, axis).map(|value| value.canonical_key()))
                .collect();
            let Some(position) = position else {
                continue;
            };

            let slot = totals.entry(position).or_default();
            if value >= 0.0 {
                slot.positive += value;
            } else {
                slot.negative += value;
                slot.has_negative = true;
            }
        }
    }

    if totals.is_empty() {
        return None;
    }
    trace!(positions = totals.len(), value_axis, "aggregated stacked totals");

    let max = totals
        .values()
        .map(|slot| slot.positive)
        .fold(f64::NEG_INFINITY, f64::max);
    let min = if totals.values().any(|slot| slot.has_negative) {
        totals
            .values()
            .filter(|slot| slot.has_negative)
            .map(|slot| slot.negative)
            .fold(f64::INFINITY, f64::min)
    } else {
        totals
            .values()
            .map(|slot| slot.positive)
            .fold(f64::INFINITY, f64::min)
    };
    Some((min, max))
}

/// Plain min/max of one axis over every point of every series.
#[must_use]
pub fn numeric_extent(series: &[Series], keys: &DataKeys, axis: &str) -> Option<Range> {
    extent_of(series.iter().flat_map(|entry| {
        keys.points(entry)
            .iter()
            .filter_map(|point| keys.axis_value(point, axis).and_then(|value| value.as_number()))
    }))
}

#[cfg(test)]
mod tests {
    use super::{BarVariant, aggregate_value_range};
    use crate::core::{DataKeys, DataPoint, Series};

    fn keys() -> DataKeys {
        DataKeys::with_axes("name", "data", ["x", "y"])
    }

    fn series(name: &str, rows: &[(f64, f64)]) -> Series {
        let points = rows
            .iter()
            .map(|(x, y)| DataPoint::new().with("x", *x).with("y", *y))
            .collect();
        Series::for_keys(&keys(), name, points)
    }

    fn x_axis() -> Vec<String> {
        vec!["x".to_owned()]
    }

    #[test]
    fn grouped_range_is_raw_extent() {
        let panel = [
            series("a", &[(1.0, 5.0), (2.0, -3.0)]),
            series("b", &[(1.0, 2.0), (2.0, 4.0)]),
        ];
        let range = aggregate_value_range(&panel, &keys(), &x_axis(), "y", BarVariant::Grouped);
        assert_eq!(range, Some((-3.0, 5.0)));
    }

    #[test]
    fn stacked_range_sums_signs_separately() {
        let panel = [
            series("a", &[(1.0, 5.0), (2.0, -3.0)]),
            series("b", &[(1.0, 2.0), (2.0, -4.0)]),
            series("c", &[(1.0, -1.0), (2.0, 6.0)]),
        ];
        let range = aggregate_value_range(&panel, &keys(), &x_axis(), "y", BarVariant::Stacked);
        assert_eq!(range, Some((-7.0, 7.0)));
    }

    #[test]
    fn stacked_range_without_negatives_starts_at_smallest_total() {
        let panel = [
            series("a", &[(1.0, 1.0), (2.0, 3.0)]),
            series("b", &[(1.0, 2.0), (2.0, 4.0)]),
        ];
        let range = aggregate_value_range(&panel, &keys(), &x_axis(), "y", BarVariant::Stacked);
        assert_eq!(range, Some((3.0, 7.0)));
    }

    #[test]
    fn points_without_keys_or_numbers_are_skipped() {
        let points = vec![
            DataPoint::new().with("x", 1.0).with("y", "n/a"),
            DataPoint::new().with("y", 9.0),
            DataPoint::new().with("x", 2.0).with("y", 2.0),
        ];
        let panel = [Series::for_keys(&keys(), "a", points)];
        let stacked = aggregate_value_range(&panel, &keys(), &x_axis(), "y", BarVariant::Stacked);
        assert_eq!(stacked, Some((2.0, 2.0)));
    }

    #[test]
    fn empty_panel_has_no_range() {
        let range = aggregate_value_range(&[], &keys(), &x_axis(), "y", BarVariant::Overlapped);
        assert_eq!(range, None);
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Stacked".parse::<BarVariant>().ok(), Some(BarVariant::Stacked));
        assert!("layered".parse::<BarVariant>().is_err());
    }
}
