use indexmap::IndexMap;
use serde::Deserialize;
use tracing::trace;

use crate::api::CreateParams;
use crate::core::{BarVariant, ValueKey};
use crate::error::ChartResult;
use crate::extensions::features::{DrawOutcome, FeatureRenderer, parse_config};
use crate::render::{Layer, LinePrimitive, Mark, MarkKey, MarkShape, Primitive, RectPrimitive};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BarConfig {
    variant: Option<BarVariant>,
}

/// Bars growing from the baseline, placed by sub-band slot.
///
/// Grouped bars take one slot per series, stacked bars pile positive and
/// negative values separately per x position, overlapped bars share a slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarRenderer;

impl FeatureRenderer for BarRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: BarConfig = parse_config(config)?;
        let variant = config.variant.unwrap_or(params.variant);
        let sub_band = params.sub_band_for(variant);
        let mut stacks: IndexMap<ValueKey, (f64, f64)> = IndexMap::new();
        let mut marks = Vec::new();

        for (series_index, series, name) in params.series_entries() {
            let color = params.colors.color(series_index);
            let left_offset = sub_band.offset(params.slot_for(variant, series_index));
            for (point_index, point) in params.points(series).iter().enumerate() {
                let Some((x_value, value)) = params.key_value(point) else {
                    continue;
                };
                let (from, to) = match variant {
                    BarVariant::Stacked => {
                        let totals = stacks.entry(x_value.canonical_key()).or_default();
                        let top = if value >= 0.0 {
                            &mut totals.0
                        } else {
                            &mut totals.1
                        };
                        let start = *top;
                        *top += value;
                        (start, *top)
                    }
                    BarVariant::Grouped | BarVariant::Overlapped => (0.0, value),
                };
                let (Some(x), Some(y_from), Some(y_to)) = (
                    params.x_start(x_value),
                    params.bar_pixel(from),
                    params.bar_pixel(to),
                ) else {
                    trace!(panel = params.panel, series_index, point_index, "bar point not projectable");
                    continue;
                };
                marks.push(Mark {
                    key: MarkKey {
                        series: series_index,
                        point: point_index,
                    },
                    shape: MarkShape::Rect(RectPrimitive::spanning(
                        x + left_offset,
                        sub_band.bandwidth(),
                        y_from,
                        y_to,
                        color,
                    )),
                    point: point.clone(),
                    series_name: name.map(str::to_owned),
                });
            }
        }

        Ok(DrawOutcome {
            primitives: 0,
            marks: layer.replace_marks(marks),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ErrorBarConfig {
    /// Point field holding the error magnitude.
    error: String,
    cap_width: f64,
    stroke_width: f64,
    variant: Option<BarVariant>,
}

impl Default for ErrorBarConfig {
    fn default() -> Self {
        Self {
            error: "error".to_owned(),
            cap_width: 8.0,
            stroke_width: 1.5,
            variant: None,
        }
    }
}

/// Whiskers spanning `value ± error`, centred on the series' sub-band slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBarRenderer;

impl FeatureRenderer for ErrorBarRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: ErrorBarConfig = parse_config(config)?;
        let variant = config.variant.unwrap_or(params.variant);
        let sub_band = params.sub_band_for(variant);
        let cap_width = config.cap_width.min(sub_band.bandwidth().max(1.0));
        let mut primitives = Vec::new();
        let mut marks = Vec::new();

        for (series_index, series, name) in params.series_entries() {
            let color = params.colors.color(series_index);
            let center_offset =
                sub_band.offset(params.slot_for(variant, series_index)) + sub_band.bandwidth() / 2.0;
            for (point_index, point) in params.points(series).iter().enumerate() {
                let Some((x_value, value)) = params.key_value(point) else {
                    continue;
                };
                let Some(error) = point.get(&config.error).and_then(|error| error.as_number()) else {
                    continue;
                };
                let error = error.abs();
                let (Some(x), Some(low), Some(high)) = (
                    params.x_start(x_value),
                    params.y_pixel(value - error),
                    params.y_pixel(value + error),
                ) else {
                    continue;
                };
                let cx = x + center_offset;
                let half = cap_width / 2.0;
                primitives.extend([
                    LinePrimitive::new(cx, low, cx, high, config.stroke_width, color),
                    LinePrimitive::new(cx - half, low, cx + half, low, config.stroke_width, color),
                    LinePrimitive::new(cx - half, high, cx + half, high, config.stroke_width, color),
                ]);
                marks.push(Mark {
                    key: MarkKey {
                        series: series_index,
                        point: point_index,
                    },
                    shape: MarkShape::Rect(RectPrimitive::spanning(
                        cx - half,
                        cap_width,
                        low,
                        high,
                        color.with_alpha(0.0),
                    )),
                    point: point.clone(),
                    series_name: name.map(str::to_owned),
                });
            }
        }

        let count = primitives.len();
        for line in primitives {
            layer.push(Primitive::Line(line));
        }
        Ok(DrawOutcome {
            primitives: count,
            marks: layer.replace_marks(marks),
        })
    }
}
