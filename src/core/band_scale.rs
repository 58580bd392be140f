use indexmap::IndexMap;

use crate::core::domain::Range;
use crate::core::{Value, ValueKey};
use crate::error::{ChartError, ChartResult};

pub const BAND_PADDING_INNER: f64 = 0.1;

/// Upper bound on the lateral space bars may claim around one continuous
/// x position.
pub const MAX_SUB_BAND_WIDTH_PX: f64 = 40.0;

/// Share of the per-position step a sub-band may use on a continuous axis.
const SUB_BAND_STEP_RATIO: f64 = 0.8;

/// Discrete positional scale: each category owns an equal-width slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<Value>,
    index: IndexMap<ValueKey, usize>,
    range: Range,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(domain: Vec<Value>, range: Range) -> ChartResult<Self> {
        Self::with_padding(domain, range, BAND_PADDING_INNER)
    }

    pub fn with_padding(domain: Vec<Value>, range: Range, padding_inner: f64) -> ChartResult<Self> {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }
        if !padding_inner.is_finite() || !(0.0..1.0).contains(&padding_inner) {
            return Err(ChartError::InvalidData(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }

        let count = domain.len() as f64;
        let step = (range.1 - range.0) / (count - padding_inner).max(1.0);
        let bandwidth = step * (1.0 - padding_inner);
        let index = domain
            .iter()
            .enumerate()
            .map(|(position, value)| (value.canonical_key(), position))
            .collect();

        Ok(Self {
            domain,
            index,
            range,
            step,
            bandwidth,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start of the band holding `value`; `None` for values outside the domain.
    #[must_use]
    pub fn position(&self, value: &Value) -> Option<f64> {
        self.index
            .get(&value.canonical_key())
            .map(|position| self.range.0 + self.step * *position as f64)
    }
}

/// Lateral slots for several series sharing one x position.
///
/// `origin` is the offset of the first slot relative to the x position the
/// x scale returns: zero inside a band, minus half the total width when the
/// x scale is continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct SubBandScale {
    slots: usize,
    origin: f64,
    width: f64,
}

impl SubBandScale {
    /// Sub-bands filling one band of a discrete x scale.
    #[must_use]
    pub fn within_band(slots: usize, bandwidth: f64) -> Self {
        Self {
            slots: slots.max(1),
            origin: 0.0,
            width: bandwidth.max(0.0),
        }
    }

    /// Sub-bands centred on a continuous x position.
    ///
    /// The total width is the per-position step scaled by 0.8 and capped at
    /// [`MAX_SUB_BAND_WIDTH_PX`], so sparse x values never produce overlapping
    /// bars that fill the plot.
    #[must_use]
    pub fn around_position(slots: usize, plot_width: f64, distinct_positions: usize) -> Self {
        let step = plot_width.max(0.0) / distinct_positions.max(1) as f64;
        let width = (step * SUB_BAND_STEP_RATIO).min(MAX_SUB_BAND_WIDTH_PX);
        Self {
            slots: slots.max(1),
            origin: -width / 2.0,
            width,
        }
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.width / self.slots as f64
    }

    /// Offset of slot `index` relative to the x position.
    #[must_use]
    pub fn offset(&self, index: usize) -> f64 {
        self.origin + self.bandwidth() * index.min(self.slots - 1) as f64
    }
}
