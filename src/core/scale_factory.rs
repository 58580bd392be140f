use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::domain::{DEFAULT_RANGE, Domain, Range};
use crate::core::scale::widen_degenerate;
use crate::core::{BandScale, LinearScale, TimeScale, Value, Viewport};
use crate::error::{ChartError, ChartResult};

/// Declared value type of the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XValueType {
    Number,
    Date,
    /// Categorical axis drawn with a band scale.
    #[default]
    String,
}

impl XValueType {
    #[must_use]
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Number | Self::Date)
    }
}

/// Horizontal scale chosen by [`XValueType`].
#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    Linear(LinearScale),
    Time(TimeScale),
    Band(BandScale),
}

impl XScale {
    /// Pixel position of `value`: the band start for band scales.
    pub fn position(&self, value: &Value) -> ChartResult<f64> {
        match self {
            Self::Linear(scale) => {
                let number = value.as_number().ok_or_else(|| {
                    ChartError::InvalidData(format!("`{value}` is not numeric"))
                })?;
                scale.domain_to_pixel(number)
            }
            Self::Time(scale) => scale.value_to_pixel(value),
            Self::Band(scale) => scale.position(value).ok_or_else(|| {
                ChartError::InvalidData(format!("`{value}` is outside the band domain"))
            }),
        }
    }

    /// Pixel position of the centre of `value`'s slot.
    pub fn center(&self, value: &Value) -> ChartResult<f64> {
        Ok(self.position(value)? + self.bandwidth() / 2.0)
    }

    /// Band width, or zero for continuous scales.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(scale) => scale.bandwidth(),
            Self::Linear(_) | Self::Time(_) => 0.0,
        }
    }

    #[must_use]
    pub fn is_band(&self) -> bool {
        matches!(self, Self::Band(_))
    }

    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Time(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }
}

/// Transform applied to raw values before the vertical scale sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTransform {
    #[default]
    Identity,
    Log10,
}

impl ValueTransform {
    pub fn apply(self, value: f64) -> ChartResult<f64> {
        match self {
            Self::Identity => Ok(value),
            Self::Log10 if value > 0.0 => Ok(value.log10()),
            Self::Log10 => Err(ChartError::InvalidData(format!(
                "logarithmic value must be > 0 (got {value})"
            ))),
        }
    }
}

/// Resolved scales of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: XScale,
    pub y: LinearScale,
    pub y_transform: ValueTransform,
}

impl Scales {
    #[must_use]
    pub fn with_y_transform(mut self, transform: ValueTransform) -> Self {
        self.y_transform = transform;
        self
    }

    /// Maps a raw value-axis value to a vertical pixel.
    pub fn y_to_pixel(&self, value: f64) -> ChartResult<f64> {
        self.y.domain_to_pixel(self.y_transform.apply(value)?)
    }

    /// Vertical pixel bars and areas grow from: zero, clamped into the
    /// domain, or the bottom of the axis for transformed scales.
    #[must_use]
    pub fn baseline_pixel(&self) -> f64 {
        let (min, max) = self.y.domain();
        let base = match self.y_transform {
            ValueTransform::Identity => 0.0_f64.clamp(min.min(max), min.max(max)),
            ValueTransform::Log10 => min,
        };
        self.y.domain_to_pixel(base).unwrap_or(self.y.range().0)
    }
}

/// Builds the horizontal and vertical scales for one panel.
///
/// - `Date` → time scale over the x extent, `Number` → linear scale over it;
///   both map onto `[0, width]`.
/// - `String` → band scale over the discrete values (inner padding 0.1).
/// - `y` is always linear from `[min, max]` onto `[height, 0]`.
///
/// Zero-span extents widen by ±0.5; an x domain without a numeric extent falls
/// back to `[0, 1]` for continuous types.
pub fn create_scales(
    x_domain: &Domain,
    y_range: Range,
    viewport: Viewport,
    x_value_type: XValueType,
) -> ChartResult<Scales> {
    let viewport = viewport.validate()?;
    let horizontal = (0.0, viewport.width);

    let x = match x_value_type {
        XValueType::Date => XScale::Time(TimeScale::new(
            x_domain.extent().unwrap_or(DEFAULT_RANGE),
            horizontal,
        )?),
        XValueType::Number => XScale::Linear(LinearScale::new(
            widen_degenerate(x_domain.extent().unwrap_or(DEFAULT_RANGE)),
            horizontal,
        )?),
        XValueType::String => {
            let values = match x_domain {
                Domain::Discrete(values) => values.clone(),
                Domain::Continuous { min, max } => vec![Value::Number(*min), Value::Number(*max)],
            };
            XScale::Band(BandScale::new(values, horizontal)?)
        }
    };
    let y = LinearScale::new(widen_degenerate(y_range), (viewport.height, 0.0))?;

    trace!(
        ?x_value_type,
        width = viewport.width,
        height = viewport.height,
        y_min = y.domain().0,
        y_max = y.domain().1,
        "created panel scales"
    );
    Ok(Scales {
        x,
        y,
        y_transform: ValueTransform::Identity,
    })
}

#[cfg(test)]
mod tests {
    use super::{ValueTransform, XScale, XValueType, create_scales};
    use crate::core::{Domain, Value, Viewport};
    use chrono::{TimeZone, Utc};

    #[test]
    fn date_axis_maps_extent_to_full_width() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let domain = Domain::Discrete(vec![Value::Date(early), Value::Date(late)]);
        let scales = create_scales(&domain, (0.0, 10.0), Viewport::new(500.0, 300.0), XValueType::Date)
            .expect("scales");

        assert!(matches!(scales.x, XScale::Time(_)));
        assert_eq!(scales.x.position(&Value::Date(early)).expect("early"), 0.0);
        assert_eq!(scales.x.position(&Value::Date(late)).expect("late"), 500.0);
        assert_eq!(scales.x.bandwidth(), 0.0);
    }

    #[test]
    fn string_axis_uses_bands() {
        let domain = Domain::Discrete(["q1", "q2"].map(Value::from).to_vec());
        let scales = create_scales(&domain, (0.0, 1.0), Viewport::new(190.0, 100.0), XValueType::String)
            .expect("scales");
        assert!(scales.x.is_band());
        assert!((scales.x.bandwidth() - 90.0).abs() <= 1e-9);
    }

    #[test]
    fn y_axis_is_inverted() {
        let domain = Domain::Continuous { min: 0.0, max: 4.0 };
        let scales = create_scales(&domain, (-3.0, 5.0), Viewport::new(100.0, 80.0), XValueType::Number)
            .expect("scales");
        assert_eq!(scales.y.domain_to_pixel(5.0).expect("top"), 0.0);
        assert_eq!(scales.y.domain_to_pixel(-3.0).expect("bottom"), 80.0);
    }

    #[test]
    fn log_transform_maps_raw_values() {
        let domain = Domain::Continuous { min: 0.0, max: 1.0 };
        let scales = create_scales(&domain, (0.0, 2.0), Viewport::new(100.0, 200.0), XValueType::Number)
            .expect("scales")
            .with_y_transform(ValueTransform::Log10);
        assert_eq!(scales.y_to_pixel(10.0).expect("ten"), 100.0);
        assert_eq!(scales.baseline_pixel(), 200.0);
        assert!(scales.y_to_pixel(0.0).is_err());
    }

    #[test]
    fn identity_baseline_sits_at_zero() {
        let domain = Domain::Continuous { min: 0.0, max: 1.0 };
        let scales = create_scales(&domain, (-5.0, 5.0), Viewport::new(100.0, 200.0), XValueType::Number)
            .expect("scales");
        assert_eq!(scales.baseline_pixel(), 100.0);
    }

    #[test]
    fn invalid_viewport_is_rejected() {
        let domain = Domain::default_continuous();
        let result = create_scales(&domain, (0.0, 1.0), Viewport::new(0.0, 10.0), XValueType::Number);
        assert!(result.is_err());
    }
}
