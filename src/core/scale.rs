use crate::core::domain::Range;
use crate::error::{ChartError, ChartResult};

/// Continuous affine mapping from a numeric domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// vertical axis draws larger values higher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: Range, range: Range) -> ChartResult<Self> {
        let (domain_start, domain_end) = domain;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        let (range_start, range_end) = range;
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> Range {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> Range {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Ok(self.domain_start);
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Round-valued ticks (1, 2 or 5 times a power of ten) inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        if count == 0 {
            return Vec::new();
        }

        let raw_step = (hi - lo) / count as f64;
        let power = 10f64.powf(raw_step.log10().floor());
        let error = raw_step / power;
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };
        let step = factor * power;
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|index| index as f64 * step).collect()
    }
}

/// Widens a zero-span range by half a unit each way so it can back a scale.
#[must_use]
pub fn widen_degenerate(range: Range) -> Range {
    if range.0 == range.1 {
        (range.0 - 0.5, range.1 + 0.5)
    } else {
        range
    }
}
