use serde::Deserialize;

use crate::api::CreateParams;
use crate::error::ChartResult;
use crate::extensions::features::{DrawOutcome, FeatureRenderer, parse_config};
use crate::render::{Layer, LinePrimitive, PolygonPrimitive, Primitive};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct LineConfig {
    stroke_width: f64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self { stroke_width: 2.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct AreaConfig {
    opacity: f64,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self { opacity: 0.3 }
    }
}

/// Pixel vertices of one series, skipping points the scales cannot place.
fn series_path(params: &CreateParams<'_>, series: &crate::core::Series) -> Vec<(f64, f64)> {
    params
        .points(series)
        .iter()
        .filter_map(|point| {
            let (x_value, value) = params.key_value(point)?;
            Some((params.x_center(x_value)?, params.y_pixel(value)?))
        })
        .collect()
}

/// Polyline through each series' points in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRenderer;

impl FeatureRenderer for LineRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: LineConfig = parse_config(config)?;
        let mut count = 0;
        for (series_index, series, _) in params.series_entries() {
            let color = params.colors.color(series_index);
            let path = series_path(params, series);
            for pair in path.windows(2) {
                let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                layer.push(Primitive::Line(LinePrimitive::new(
                    x1,
                    y1,
                    x2,
                    y2,
                    config.stroke_width,
                    color,
                )));
                count += 1;
            }
        }
        Ok(DrawOutcome {
            primitives: count,
            ..DrawOutcome::default()
        })
    }
}

/// Filled region between each series' path and the baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaRenderer;

impl FeatureRenderer for AreaRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        let config: AreaConfig = parse_config(config)?;
        let baseline = params.scales.baseline_pixel();
        let mut count = 0;
        for (series_index, series, _) in params.series_entries() {
            let mut points = series_path(params, series);
            let (Some(&(first_x, _)), Some(&(last_x, _))) = (points.first(), points.last()) else {
                continue;
            };
            if points.len() < 2 {
                continue;
            }
            points.extend([(last_x, baseline), (first_x, baseline)]);
            layer.push(Primitive::Polygon(PolygonPrimitive {
                points,
                fill: params
                    .colors
                    .color(series_index)
                    .with_alpha(config.opacity.clamp(0.0, 1.0)),
            }));
            count += 1;
        }
        Ok(DrawOutcome {
            primitives: count,
            ..DrawOutcome::default()
        })
    }
}
