use serde::{Deserialize, Serialize};

use crate::core::Value;

/// Closed numeric interval `[min, max]`.
pub type Range = (f64, f64);

/// Fallback interval for axes with no usable numeric data.
pub const DEFAULT_RANGE: Range = (0.0, 1.0);

/// Resolved domain of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Unique values in canonical sort order.
    Discrete(Vec<Value>),
    Continuous { min: f64, max: f64 },
}

/// Whether value ranges are widened to contain zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZeroPolicy {
    #[default]
    Include,
    /// Used by transformed (logarithmic) ranges where zero has no image.
    Exclude,
}

impl ZeroPolicy {
    #[must_use]
    pub fn apply(self, (min, max): Range) -> Range {
        match self {
            Self::Include => (min.min(0.0), max.max(0.0)),
            Self::Exclude => (min, max),
        }
    }
}

impl Domain {
    #[must_use]
    pub fn default_discrete() -> Self {
        Self::Discrete(vec![Value::Number(0.0), Value::Number(1.0)])
    }

    #[must_use]
    pub fn default_continuous() -> Self {
        Self::Continuous {
            min: DEFAULT_RANGE.0,
            max: DEFAULT_RANGE.1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Discrete(values) => values.is_empty(),
            Self::Continuous { min, max } => !min.is_finite() || !max.is_finite(),
        }
    }

    /// Numeric extent of the domain; `None` for text-only or empty domains.
    #[must_use]
    pub fn extent(&self) -> Option<Range> {
        match self {
            Self::Continuous { min, max } => {
                (min.is_finite() && max.is_finite()).then_some((*min, *max))
            }
            Self::Discrete(values) => extent_of(values.iter().filter_map(Value::as_number)),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Discrete(values) => values,
            Self::Continuous { .. } => &[],
        }
    }
}

/// Min/max over finite samples; `None` when there are none.
#[must_use]
pub fn extent_of(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Widens `acc` to cover `range`.
#[must_use]
pub fn union_range(acc: Option<Range>, range: Range) -> Option<Range> {
    Some(match acc {
        None => range,
        Some((min, max)) => (min.min(range.0), max.max(range.1)),
    })
}
