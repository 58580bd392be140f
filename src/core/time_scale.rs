use chrono::{DateTime, Utc};

use crate::core::domain::Range;
use crate::core::primitives::{datetime_to_epoch_millis, epoch_millis_to_datetime};
use crate::core::scale::widen_degenerate;
use crate::core::{LinearScale, Value};
use crate::error::{ChartError, ChartResult};

/// Continuous time axis over epoch-millisecond extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    /// Builds a time scale from an epoch-millisecond extent.
    ///
    /// A single-instant extent is widened by half a millisecond each way.
    pub fn new(extent_millis: Range, range: Range) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::new(widen_degenerate(extent_millis), range)?,
        })
    }

    pub fn from_dates(start: DateTime<Utc>, end: DateTime<Utc>, range: Range) -> ChartResult<Self> {
        Self::new(
            (datetime_to_epoch_millis(start), datetime_to_epoch_millis(end)),
            range,
        )
    }

    #[must_use]
    pub fn extent_millis(self) -> Range {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> Range {
        self.linear.range()
    }

    #[must_use]
    pub fn extent(self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = self.linear.domain();
        Some((epoch_millis_to_datetime(start)?, epoch_millis_to_datetime(end)?))
    }

    pub fn time_to_pixel(self, time: DateTime<Utc>) -> ChartResult<f64> {
        self.linear.domain_to_pixel(datetime_to_epoch_millis(time))
    }

    pub fn pixel_to_time(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        let millis = self.linear.pixel_to_domain(pixel)?;
        epoch_millis_to_datetime(millis).ok_or_else(|| {
            ChartError::InvalidData(format!("pixel {pixel} maps outside the date range"))
        })
    }

    /// Maps dates and raw epoch-millisecond numbers; text has no position.
    pub fn value_to_pixel(self, value: &Value) -> ChartResult<f64> {
        let millis = value.as_number().ok_or_else(|| {
            ChartError::InvalidData(format!("`{value}` is not a date or timestamp"))
        })?;
        self.linear.domain_to_pixel(millis)
    }

    /// Evenly spaced instants for axis labels, snapped to round millisecond steps.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<DateTime<Utc>> {
        self.linear
            .ticks(count)
            .into_iter()
            .filter_map(epoch_millis_to_datetime)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimeScale;
    use chrono::{TimeZone, Utc};

    #[test]
    fn dates_map_to_range_edges() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let scale = TimeScale::from_dates(start, end, (0.0, 640.0)).expect("scale");

        assert_eq!(scale.time_to_pixel(start).expect("start"), 0.0);
        assert_eq!(scale.time_to_pixel(end).expect("end"), 640.0);
        assert_eq!(scale.pixel_to_time(640.0).expect("invert"), end);
    }

    #[test]
    fn single_instant_extent_still_maps() {
        let at = Utc.with_ymd_and_hms(2024, 5, 5, 5, 5, 5).unwrap();
        let scale = TimeScale::from_dates(at, at, (0.0, 100.0)).expect("scale");
        assert_eq!(scale.time_to_pixel(at).expect("center"), 50.0);
    }
}
