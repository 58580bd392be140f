use serde::Deserialize;

use crate::api::CreateParams;
use crate::core::DataPoint;
use crate::error::{ChartError, ChartResult};
use crate::extensions::features::{DrawOutcome, FeatureRenderer, parse_config};
use crate::render::{CirclePrimitive, Layer, Mark, MarkKey, MarkShape};

/// Radius of the largest bubble.
pub const MAX_BUBBLE_RADIUS_PX: f64 = 20.0;
const MIN_BUBBLE_RADIUS_PX: f64 = 2.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct PointConfig {
    radius: f64,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self { radius: 4.0 }
    }
}

/// Fixed-radius circles, reconciled by (series, point) key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointRenderer;

impl FeatureRenderer for PointRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: PointConfig = parse_config(config)?;
        if !config.radius.is_finite() || config.radius < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "point radius must be finite and >= 0 (got {})",
                config.radius
            )));
        }

        let mut marks = Vec::new();
        for (series_index, series, name) in params.series_entries() {
            let color = params.colors.color(series_index);
            for (point_index, point) in params.points(series).iter().enumerate() {
                let Some((x_value, value)) = params.key_value(point) else {
                    continue;
                };
                let (Some(cx), Some(cy)) = (params.x_center(x_value), params.y_pixel(value)) else {
                    continue;
                };
                marks.push(Mark {
                    key: MarkKey {
                        series: series_index,
                        point: point_index,
                    },
                    shape: MarkShape::Circle(CirclePrimitive::new(cx, cy, config.radius, color)),
                    point: point.clone(),
                    series_name: name.map(str::to_owned),
                });
            }
        }
        Ok(DrawOutcome {
            primitives: 0,
            marks: layer.join_marks(marks),
        })
    }
}

/// Circles whose area tracks the magnitude field.
///
/// Radius is `sqrt(|m| / max|m|)` of [`MAX_BUBBLE_RADIUS_PX`], with a small
/// floor so zero-magnitude bubbles stay hoverable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleRenderer;

impl FeatureRenderer for BubbleRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        _config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        if params.data_keys.magnitude.is_none() {
            return Err(ChartError::InvalidConfig(
                "bubble feature requires a magnitude key".to_owned(),
            ));
        }
        let magnitude = |point: &DataPoint| {
            params
                .data_keys
                .magnitude_value(point)
                .and_then(|value| value.as_number())
                .filter(|value| value.is_finite())
                .map(f64::abs)
        };
        let largest = params
            .series
            .iter()
            .flat_map(|series| params.points(series))
            .filter_map(magnitude)
            .fold(0.0_f64, f64::max);

        let mut marks = Vec::new();
        for (series_index, series, name) in params.series_entries() {
            let color = params.colors.color(series_index).with_alpha(0.7);
            for (point_index, point) in params.points(series).iter().enumerate() {
                let Some(size) = magnitude(point) else {
                    continue;
                };
                let Some((x_value, value)) = params.key_value(point) else {
                    continue;
                };
                let (Some(cx), Some(cy)) = (params.x_center(x_value), params.y_pixel(value)) else {
                    continue;
                };
                let radius = if largest > 0.0 {
                    (MAX_BUBBLE_RADIUS_PX * (size / largest).sqrt()).max(MIN_BUBBLE_RADIUS_PX)
                } else {
                    MIN_BUBBLE_RADIUS_PX
                };
                marks.push(Mark {
                    key: MarkKey {
                        series: series_index,
                        point: point_index,
                    },
                    shape: MarkShape::Circle(CirclePrimitive::new(cx, cy, radius, color)),
                    point: point.clone(),
                    series_name: name.map(str::to_owned),
                });
            }
        }
        Ok(DrawOutcome {
            primitives: 0,
            marks: layer.join_marks(marks),
        })
    }
}
