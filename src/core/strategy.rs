use indexmap::IndexMap;
use tracing::debug;

use crate::core::aggregation::{aggregate_value_range, numeric_extent};
use crate::core::domain::{Domain, Range, ZeroPolicy};
use crate::core::{
    AxisRoles, BarVariant, CoordinateSystemType, DataKeys, Series, ValueTransform, XValueType,
};
use crate::core::value::unique_sorted;
use crate::error::{ChartError, ChartResult};

/// Unique values per declared axis of one panel.
pub type AxisDomains = IndexMap<String, Domain>;

/// One interval per panel for every axis declared by any panel.
///
/// `None` marks a panel without usable numeric data on that axis.
pub type MergedDomains = IndexMap<String, Vec<Option<Range>>>;

/// Domains of one panel before cross-panel synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDomains {
    pub x: Option<Domain>,
    pub y: Option<Range>,
}

/// Domain computation for one coordinate system.
///
/// Every strategy shares the same aggregation routine; implementations only
/// name their system and, where the system transforms its value axis,
/// override [`DomainStrategy::zero_policy`] and
/// [`DomainStrategy::transform_range`].
pub trait DomainStrategy {
    fn system(&self) -> CoordinateSystemType;

    fn zero_policy(&self) -> ZeroPolicy {
        ZeroPolicy::Include
    }

    fn roles(&self, keys: &DataKeys) -> AxisRoles {
        self.system().roles(keys)
    }

    /// Per-value counterpart of [`DomainStrategy::transform_range`].
    fn value_transform(&self) -> ValueTransform {
        ValueTransform::Identity
    }

    /// Maps a raw value-axis range into the space handed to the scale factory.
    fn transform_range(&self, _axis: &str, range: Range) -> ChartResult<Range> {
        Ok(range)
    }

    /// Unique values per declared axis, in canonical order.
    fn calculate_axes_domains(&self, series: &[Series], keys: &DataKeys) -> AxisDomains {
        keys.coordinates
            .keys()
            .map(|axis| {
                let values = series.iter().flat_map(|entry| {
                    keys.points(entry)
                        .iter()
                        .filter_map(|point| keys.axis_value(point, axis).cloned())
                });
                (axis.clone(), Domain::Discrete(unique_sorted(values)))
            })
            .collect()
    }

    /// Numeric interval per panel for every declared axis.
    ///
    /// The value axis goes through the stacking-aware aggregation for the
    /// panel's variant, then the zero policy, then the strategy transform. The
    /// vertical-role axis of systems without a value axis gets the zero
    /// policy as well; every other axis keeps its plain extent.
    fn calculate_merged_domains(
        &self,
        panels: &[Vec<Series>],
        keys: &[DataKeys],
        variants: &[BarVariant],
    ) -> ChartResult<MergedDomains> {
        let mut merged = MergedDomains::new();
        for panel_keys in keys {
            for axis in panel_keys.coordinates.keys() {
                merged
                    .entry(axis.clone())
                    .or_insert_with(|| vec![None; panels.len()]);
            }
        }

        for (index, (series, panel_keys)) in panels.iter().zip(keys).enumerate() {
            let roles = self.roles(panel_keys);
            let variant = variants.get(index).copied().unwrap_or_default();
            for axis in panel_keys.coordinates.keys() {
                let range = if roles.value_axis.as_deref() == Some(axis.as_str()) {
                    aggregate_value_range(series, panel_keys, &roles.key_axes, axis, variant)
                        .map(|range| self.zero_policy().apply(range))
                        .map(|range| self.transform_range(axis, range))
                        .transpose()?
                } else if roles.value_axis.is_none()
                    && roles.y_axis.as_deref() == Some(axis.as_str())
                {
                    numeric_extent(series, panel_keys, axis)
                        .map(|range| self.zero_policy().apply(range))
                } else {
                    numeric_extent(series, panel_keys, axis)
                };
                if let Some(slots) = merged.get_mut(axis) {
                    slots[index] = range;
                }
            }
        }

        debug!(
            system = %self.system(),
            panels = panels.len(),
            axes = merged.len(),
            "calculated merged domains"
        );
        Ok(merged)
    }

    /// Horizontal and vertical domains of every panel, unsynchronized.
    ///
    /// Continuous x value types take the numeric extent of the key axis;
    /// band axes take its unique values.
    fn resolve_panel_domains(
        &self,
        panels: &[Vec<Series>],
        keys: &[DataKeys],
        variants: &[BarVariant],
        x_value_type: XValueType,
    ) -> ChartResult<Vec<PanelDomains>> {
        let merged = self.calculate_merged_domains(panels, keys, variants)?;
        let resolved = panels
            .iter()
            .zip(keys)
            .enumerate()
            .map(|(index, (series, panel_keys))| {
                let roles = self.roles(panel_keys);
                let slot = |axis: &str| {
                    merged
                        .get(axis)
                        .and_then(|slots| slots.get(index).copied().flatten())
                };

                let x = if x_value_type.is_continuous() {
                    slot(roles.x_axis.as_str()).map(|(min, max)| Domain::Continuous { min, max })
                } else {
                    self.calculate_axes_domains(series, panel_keys)
                        .shift_remove(&roles.x_axis)
                        .filter(|domain| !domain.is_empty())
                };
                let y = roles.y_axis.as_deref().and_then(slot);
                PanelDomains { x, y }
            })
            .collect();
        Ok(resolved)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CartesianStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct PolarStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct CylindricalStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct TernaryStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct HexagonalStrategy;

/// Cartesian aggregation with both value-axis bounds mapped through `log10`.
///
/// Zero has no logarithm, so the zero policy is `Exclude` and any
/// non-positive bound is rejected with [`ChartError::NonPositiveLogValue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogarithmicStrategy;

impl DomainStrategy for CartesianStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Cartesian
    }
}

impl DomainStrategy for PolarStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Polar
    }
}

impl DomainStrategy for SphericalStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Spherical
    }
}

impl DomainStrategy for CylindricalStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Cylindrical
    }
}

impl DomainStrategy for GeographicStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Geographic
    }
}

impl DomainStrategy for ParallelStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Parallel
    }
}

impl DomainStrategy for TernaryStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Ternary
    }
}

impl DomainStrategy for HexagonalStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Hexagonal
    }
}

impl DomainStrategy for LogarithmicStrategy {
    fn system(&self) -> CoordinateSystemType {
        CoordinateSystemType::Logarithmic
    }

    fn zero_policy(&self) -> ZeroPolicy {
        ZeroPolicy::Exclude
    }

    fn value_transform(&self) -> ValueTransform {
        ValueTransform::Log10
    }

    fn transform_range(&self, axis: &str, (min, max): Range) -> ChartResult<Range> {
        if min <= 0.0 {
            return Err(ChartError::NonPositiveLogValue {
                axis: axis.to_owned(),
                value: min,
            });
        }
        Ok((min.log10(), max.log10()))
    }
}

#[must_use]
pub fn strategy_for(system: CoordinateSystemType) -> Box<dyn DomainStrategy> {
    match system {
        CoordinateSystemType::Cartesian => Box::new(CartesianStrategy),
        CoordinateSystemType::Polar => Box::new(PolarStrategy),
        CoordinateSystemType::Spherical => Box::new(SphericalStrategy),
        CoordinateSystemType::Cylindrical => Box::new(CylindricalStrategy),
        CoordinateSystemType::Geographic => Box::new(GeographicStrategy),
        CoordinateSystemType::Logarithmic => Box::new(LogarithmicStrategy),
        CoordinateSystemType::Parallel => Box::new(ParallelStrategy),
        CoordinateSystemType::Ternary => Box::new(TernaryStrategy),
        CoordinateSystemType::Hexagonal => Box::new(HexagonalStrategy),
    }
}

/// Selects a strategy by its declared name; unknown names fail fast.
pub fn strategy_from_name(name: &str) -> ChartResult<Box<dyn DomainStrategy>> {
    Ok(strategy_for(name.parse()?))
}
