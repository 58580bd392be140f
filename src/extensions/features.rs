use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::CreateParams;
use crate::core::BarVariant;
use crate::error::ChartResult;
use crate::render::{JoinStats, Layer};

/// Visual feature a panel can request, resolved from its name at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeatureKind {
    Bar,
    ErrorBar,
    Line,
    Area,
    Point,
    Bubble,
    Grid,
    XAxis,
    YAxis,
    Label,
    Tooltip,
    Unknown(String),
}

impl FeatureKind {
    pub const KNOWN: [Self; 11] = [
        Self::Bar,
        Self::ErrorBar,
        Self::Line,
        Self::Area,
        Self::Point,
        Self::Bubble,
        Self::Grid,
        Self::XAxis,
        Self::YAxis,
        Self::Label,
        Self::Tooltip,
    ];

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bar => "bar",
            Self::ErrorBar => "error-bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Point => "point",
            Self::Bubble => "bubble",
            Self::Grid => "grid",
            Self::XAxis => "x-axis",
            Self::YAxis => "y-axis",
            Self::Label => "label",
            Self::Tooltip => "tooltip",
            Self::Unknown(name) => name,
        }
    }

    /// Kinds whose marks receive hover/move/leave handling.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Point | Self::Bubble | Self::Bar | Self::ErrorBar)
    }

    /// Kinds that take lateral sub-band slots and a stacking variant.
    #[must_use]
    pub fn is_bar_like(&self) -> bool {
        matches!(self, Self::Bar | Self::ErrorBar)
    }

    /// Kinds whose marks reconcile with the previous marks of their layer.
    #[must_use]
    pub fn reconciles_marks(&self) -> bool {
        matches!(self, Self::Point | Self::Bubble)
    }
}

impl From<&str> for FeatureKind {
    fn from(name: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.name() == name)
            .unwrap_or_else(|| Self::Unknown(name.to_owned()))
    }
}

impl From<String> for FeatureKind {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Unknown(_) => Self::Unknown(name),
            known => known,
        }
    }
}

impl From<FeatureKind> for String {
    fn from(kind: FeatureKind) -> Self {
        kind.name().to_owned()
    }
}

impl FromStr for FeatureKind {
    type Err = std::convert::Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(name))
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One requested feature of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFeature {
    pub feature: FeatureKind,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

impl ChartFeature {
    #[must_use]
    pub fn new(feature: impl Into<FeatureKind>) -> Self {
        Self {
            feature: feature.into(),
            hide: false,
            config: None,
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Stacking variant named by `config.variant`, when present and valid.
    #[must_use]
    pub fn variant(&self) -> Option<BarVariant> {
        self.config
            .as_ref()?
            .get("variant")?
            .as_str()?
            .parse()
            .ok()
    }
}

/// Variant of a panel: that of its first visible bar-like feature.
#[must_use]
pub fn panel_variant(features: &[ChartFeature]) -> BarVariant {
    features
        .iter()
        .find(|feature| !feature.hide && feature.feature.is_bar_like())
        .and_then(ChartFeature::variant)
        .unwrap_or_default()
}

/// What a feature renderer left in its layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub primitives: usize,
    pub marks: JoinStats,
}

/// Draws one feature kind into a panel layer.
///
/// The layer's primitives are cleared before `draw` runs; its marks are left
/// for the renderer to join or replace. Coordinates are group-local, with the
/// plot area spanning `params.geometry.inner`.
pub trait FeatureRenderer {
    fn draw(
        &self,
        params: &CreateParams<'_>,
        layer: &mut Layer,
        config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome>;
}

/// Deserializes a feature config, falling back to defaults when absent.
pub fn parse_config<T: DeserializeOwned + Default>(
    config: Option<&serde_json::Value>,
) -> ChartResult<T> {
    match config {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => Ok(T::deserialize(value)?),
    }
}
