pub mod aggregation;
pub mod band_scale;
pub mod coordinate;
pub mod domain;
pub mod primitives;
pub mod scale;
pub mod scale_factory;
pub mod strategy;
pub mod synchronizer;
pub mod time_scale;
pub mod types;
pub mod value;

pub use aggregation::{BarVariant, aggregate_value_range, numeric_extent};
pub use band_scale::{BandScale, MAX_SUB_BAND_WIDTH_PX, SubBandScale};
pub use coordinate::{AxisRoles, CoordinateSystemType};
pub use domain::{DEFAULT_RANGE, Domain, Range, ZeroPolicy};
pub use scale::LinearScale;
pub use scale_factory::{Scales, ValueTransform, XScale, XValueType, create_scales};
pub use strategy::{
    AxisDomains, DomainStrategy, MergedDomains, PanelDomains, strategy_for, strategy_from_name,
};
pub use synchronizer::{ResolvedDomains, SyncedDomains, synchronize};
pub use time_scale::TimeScale;
pub use types::{DataKeys, DataPoint, Margin, Series, SeriesField, Viewport};
pub use value::{Value, ValueKey, compare_values, unique_sorted};
