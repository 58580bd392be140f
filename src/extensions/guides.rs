use serde::Deserialize;

use crate::api::CreateParams;
use crate::core::{ValueTransform, XScale};
use crate::error::ChartResult;
use crate::extensions::features::{DrawOutcome, FeatureRenderer, parse_config};
use crate::render::{Color, Layer, LinePrimitive, Primitive, TextHAlign, TextPrimitive};

const GUIDE_COLOR: Color = Color::from_hex(0x6b6b6b);
const TICK_LENGTH_PX: f64 = 5.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct GuideConfig {
    ticks: usize,
    font_size: f64,
    opacity: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            ticks: 5,
            font_size: 10.0,
            opacity: 0.25,
        }
    }
}

/// Compact tick label: integers without decimals, others with at most two.
#[must_use]
pub fn format_number(value: f64) -> String {
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    if (value - value.round()).abs() < 1e-9 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Horizontal tick pixels with labels.
fn x_ticks(params: &CreateParams<'_>, count: usize) -> Vec<(f64, String)> {
    match &params.scales.x {
        XScale::Linear(scale) => scale
            .ticks(count)
            .into_iter()
            .filter_map(|tick| Some((scale.domain_to_pixel(tick).ok()?, format_number(tick))))
            .collect(),
        XScale::Time(scale) => scale
            .ticks(count)
            .into_iter()
            .filter_map(|tick| {
                Some((
                    scale.time_to_pixel(tick).ok()?,
                    tick.format("%Y-%m-%d").to_string(),
                ))
            })
            .collect(),
        XScale::Band(scale) => scale
            .domain()
            .iter()
            .filter_map(|value| {
                Some((
                    scale.position(value)? + scale.bandwidth() / 2.0,
                    value.to_string(),
                ))
            })
            .collect(),
    }
}

/// Vertical tick pixels with labels in raw (untransformed) units.
fn y_ticks(params: &CreateParams<'_>, count: usize) -> Vec<(f64, String)> {
    let scale = params.scales.y;
    scale
        .ticks(count)
        .into_iter()
        .filter_map(|tick| {
            let label = match params.scales.y_transform {
                ValueTransform::Identity => format_number(tick),
                ValueTransform::Log10 => format_number(10_f64.powf(tick)),
            };
            Some((scale.domain_to_pixel(tick).ok()?, label))
        })
        .collect()
}

fn push_lines(layer: &mut Layer, lines: impl IntoIterator<Item = LinePrimitive>) -> usize {
    lines.into_iter().fold(0, |count, line| {
        layer.push(Primitive::Line(line));
        count + 1
    })
}

fn push_labels(layer: &mut Layer, labels: impl IntoIterator<Item = TextPrimitive>) -> usize {
    labels
        .into_iter()
        .filter(|label| !label.text.is_empty())
        .fold(0, |count, label| {
            layer.push(Primitive::Text(label));
            count + 1
        })
}

/// Light lines across the plot area at every x and y tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRenderer;

impl FeatureRenderer for GridRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: GuideConfig = parse_config(config)?;
        let inner = params.geometry.inner;
        let color = GUIDE_COLOR.with_alpha(config.opacity.clamp(0.0, 1.0));

        let horizontal = y_ticks(params, config.ticks)
            .into_iter()
            .map(|(y, _)| LinePrimitive::new(0.0, y, inner.width, y, 1.0, color));
        let vertical = x_ticks(params, config.ticks)
            .into_iter()
            .map(|(x, _)| LinePrimitive::new(x, 0.0, x, inner.height, 1.0, color));

        let primitives = push_lines(layer, horizontal.chain(vertical));
        Ok(DrawOutcome {
            primitives,
            ..DrawOutcome::default()
        })
    }
}

/// Axis line along the bottom of the plot area with tick marks and labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct XAxisRenderer;

impl FeatureRenderer for XAxisRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: GuideConfig = parse_config(config)?;
        let inner = params.geometry.inner;
        let ticks = x_ticks(params, config.ticks);
        let baseline = inner.height;

        let lines = std::iter::once(LinePrimitive::new(0.0, baseline, inner.width, baseline, 1.0, GUIDE_COLOR))
            .chain(ticks.iter().map(|(x, _)| {
                LinePrimitive::new(*x, baseline, *x, baseline + TICK_LENGTH_PX, 1.0, GUIDE_COLOR)
            }));
        let mut primitives = push_lines(layer, lines);
        primitives += push_labels(
            layer,
            ticks.into_iter().map(|(x, label)| {
                TextPrimitive::new(
                    label,
                    x,
                    baseline + TICK_LENGTH_PX + config.font_size + 2.0,
                    config.font_size,
                    GUIDE_COLOR,
                    TextHAlign::Center,
                )
            }),
        );
        Ok(DrawOutcome {
            primitives,
            ..DrawOutcome::default()
        })
    }
}

/// Axis line along the left of the plot area with tick marks and labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct YAxisRenderer;

impl FeatureRenderer for YAxisRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: GuideConfig = parse_config(config)?;
        let inner = params.geometry.inner;
        let ticks = y_ticks(params, config.ticks);

        let lines = std::iter::once(LinePrimitive::new(0.0, 0.0, 0.0, inner.height, 1.0, GUIDE_COLOR))
            .chain(ticks.iter().map(|(y, _)| {
                LinePrimitive::new(-TICK_LENGTH_PX, *y, 0.0, *y, 1.0, GUIDE_COLOR)
            }));
        let mut primitives = push_lines(layer, lines);
        primitives += push_labels(
            layer,
            ticks.into_iter().map(|(y, label)| {
                TextPrimitive::new(
                    label,
                    -TICK_LENGTH_PX - 3.0,
                    y + config.font_size / 3.0,
                    config.font_size,
                    GUIDE_COLOR,
                    TextHAlign::Right,
                )
            }),
        );
        Ok(DrawOutcome {
            primitives,
            ..DrawOutcome::default()
        })
    }
}

/// Value text just above every plotted point.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRenderer;

impl FeatureRenderer for LabelRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: GuideConfig = parse_config(config)?;
        let font_size = config.font_size;
        let labels = params
            .series_entries()
            .flat_map(|(series_index, series, _)| {
                let color = params.colors.color(series_index);
                params.points(series).iter().filter_map(move |point| {
                    let (x_value, value) = params.key_value(point)?;
                    Some(TextPrimitive::new(
                        format_number(value),
                        params.x_center(x_value)?,
                        params.y_pixel(value)? - 6.0,
                        font_size,
                        color,
                        TextHAlign::Center,
                    ))
                })
            })
            .collect::<Vec<_>>();
        let primitives = push_labels(layer, labels);
        Ok(DrawOutcome {
            primitives,
            ..DrawOutcome::default()
        })
    }
}

/// Tooltip container. The tooltip itself is driven by bus events, so this
/// feature only marks the panel as tooltip-bearing and draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TooltipRenderer;

impl FeatureRenderer for TooltipRenderer {
    fn draw(
        &self,
        _params: &CreateParams<'_>,
        _layer: &mut Layer,
        _config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        Ok(DrawOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_number(-3.0), "-3");
    }
}
