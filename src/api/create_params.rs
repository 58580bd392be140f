use crate::core::{
    AxisRoles, BarVariant, CoordinateSystemType, DataKeys, DataPoint, Margin, Scales, Series,
    SubBandScale, Value, Viewport, XScale,
};
use crate::interaction::{EventBus, TooltipHandle};
use crate::render::{ColorScale, GroupRef};

/// Pixel layout of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// Panel size including margins.
    pub outer: Viewport,
    /// Plot area once margins are removed.
    pub inner: Viewport,
    pub margin: Margin,
    /// Vertical offset of the panel on a merged, squashed surface.
    pub offset_y: f64,
}

/// Everything a feature renderer needs for one panel, rebuilt every render.
#[derive(Debug, Clone)]
pub struct CreateParams<'a> {
    pub panel: usize,
    pub series: &'a [Series],
    pub data_keys: &'a DataKeys,
    pub system: CoordinateSystemType,
    pub roles: AxisRoles,
    pub scales: Scales,
    pub colors: ColorScale,
    pub group: GroupRef,
    pub tooltip: TooltipHandle,
    pub geometry: PanelGeometry,
    pub variant: BarVariant,
    /// Lateral slots for the panel variant; `None` without visible bars.
    pub sub_band: Option<SubBandScale>,
    /// Distinct horizontal positions, counted for continuous x scales only.
    pub distinct_x: usize,
    pub events: EventBus,
}

impl CreateParams<'_> {
    /// Series with their index and display name, in input order.
    pub fn series_entries(&self) -> impl Iterator<Item = (usize, &Series, Option<&str>)> {
        self.series
            .iter()
            .enumerate()
            .map(|(index, series)| (index, series, self.data_keys.series_name(series)))
    }

    #[must_use]
    pub fn points<'s>(&self, series: &'s Series) -> &'s [DataPoint] {
        self.data_keys.points(series)
    }

    /// Horizontal-role value and numeric vertical-role value of a point.
    #[must_use]
    pub fn key_value<'p>(&self, point: &'p DataPoint) -> Option<(&'p Value, f64)> {
        let x = self.data_keys.axis_value(point, &self.roles.x_axis)?;
        let y = self
            .data_keys
            .axis_value(point, self.roles.y_axis.as_deref()?)?
            .as_number()?;
        Some((x, y))
    }

    /// Start of the slot holding `value`: the band start, or the position
    /// itself on continuous scales.
    #[must_use]
    pub fn x_start(&self, value: &Value) -> Option<f64> {
        self.scales.x.position(value).ok()
    }

    #[must_use]
    pub fn x_center(&self, value: &Value) -> Option<f64> {
        self.scales.x.center(value).ok()
    }

    /// Vertical pixel of a raw value; `None` when the scale cannot place it.
    #[must_use]
    pub fn y_pixel(&self, value: f64) -> Option<f64> {
        self.scales.y_to_pixel(value).ok()
    }

    /// Like [`CreateParams::y_pixel`], with zero pinned to the baseline so
    /// bars and areas grow from it under every value transform.
    #[must_use]
    pub fn bar_pixel(&self, value: f64) -> Option<f64> {
        if value == 0.0 {
            Some(self.scales.baseline_pixel())
        } else {
            self.y_pixel(value)
        }
    }

    /// Sub-band slot of a series for the given stacking variant.
    #[must_use]
    pub fn slot_for(&self, variant: BarVariant, series_index: usize) -> usize {
        match variant {
            BarVariant::Grouped => series_index,
            BarVariant::Stacked | BarVariant::Overlapped => 0,
        }
    }

    /// Lateral slots for bars drawn with `variant`: one per series when
    /// grouped, a single shared slot otherwise.
    #[must_use]
    pub fn sub_band_for(&self, variant: BarVariant) -> SubBandScale {
        let slots = match variant {
            BarVariant::Grouped => self.series.len(),
            BarVariant::Stacked | BarVariant::Overlapped => 1,
        };
        match &self.scales.x {
            XScale::Band(band) => SubBandScale::within_band(slots, band.bandwidth()),
            XScale::Linear(_) | XScale::Time(_) => {
                SubBandScale::around_position(slots, self.geometry.inner.width, self.distinct_x)
            }
        }
    }
}
