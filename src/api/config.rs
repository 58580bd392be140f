use serde::{Deserialize, Serialize};

use crate::core::{CoordinateSystemType, DataKeys, Margin, Series, Viewport, XValueType};
use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartFeature;

/// Layout and synchronization settings of one chart.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
    /// Divide the height evenly between panels.
    #[serde(default)]
    pub squash: bool,
    #[serde(default)]
    pub sync_x: bool,
    #[serde(default)]
    pub sync_y: bool,
    /// Draw every panel onto one shared surface.
    #[serde(default)]
    pub merge: bool,
    #[serde(default)]
    pub coordinate_system: CoordinateSystemType,
    #[serde(default)]
    pub x_value_type: XValueType,
    /// Per-panel margin overrides, by panel index.
    #[serde(default)]
    pub panel_margins: Vec<Option<Margin>>,
}

const FLAG_FIELDS: [&str; 4] = ["squash", "sync_x", "sync_y", "merge"];

impl ChartConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
            squash: false,
            sync_x: false,
            sync_y: false,
            merge: false,
            coordinate_system: CoordinateSystemType::default(),
            x_value_type: XValueType::default(),
            panel_margins: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_squash(mut self, squash: bool) -> Self {
        self.squash = squash;
        self
    }

    #[must_use]
    pub fn with_sync(mut self, sync_x: bool, sync_y: bool) -> Self {
        self.sync_x = sync_x;
        self.sync_y = sync_y;
        self
    }

    #[must_use]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_coordinate_system(mut self, system: CoordinateSystemType) -> Self {
        self.coordinate_system = system;
        self
    }

    #[must_use]
    pub fn with_x_value_type(mut self, x_value_type: XValueType) -> Self {
        self.x_value_type = x_value_type;
        self
    }

    #[must_use]
    pub fn with_panel_margin(mut self, panel: usize, margin: Margin) -> Self {
        if self.panel_margins.len() <= panel {
            self.panel_margins.resize(panel + 1, None);
        }
        self.panel_margins[panel] = Some(margin);
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Margin of panel `index`: its override, or the chart margin.
    #[must_use]
    pub fn margin_for(&self, index: usize) -> Margin {
        self.panel_margins
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.margin)
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Parses a config object, reporting bad flags and unknown coordinate
    /// systems as configuration errors rather than JSON errors.
    pub fn from_value(value: serde_json::Value) -> ChartResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ChartError::InvalidConfig("chart config must be an object".to_owned()))?;
        for flag in FLAG_FIELDS {
            if let Some(entry) = object.get(flag) {
                if !entry.is_boolean() {
                    return Err(ChartError::InvalidConfig(format!(
                        "`{flag}` must be a boolean (got {entry})"
                    )));
                }
            }
        }
        if let Some(system) = object.get("coordinate_system") {
            let name = system.as_str().ok_or_else(|| {
                ChartError::InvalidConfig("`coordinate_system` must be a string".to_owned())
            })?;
            name.parse::<CoordinateSystemType>()?;
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Complete input of one render: per-panel data, schemas and features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub data: Vec<Vec<Series>>,
    pub data_keys: Vec<DataKeys>,
    pub features: Vec<Vec<ChartFeature>>,
    pub config: ChartConfig,
}

#[derive(Deserialize)]
struct RawChartRequest {
    data: Vec<Vec<Series>>,
    data_keys: Vec<DataKeys>,
    features: Vec<Vec<ChartFeature>>,
    config: serde_json::Value,
}

impl ChartRequest {
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            data: Vec::new(),
            data_keys: Vec::new(),
            features: Vec::new(),
            config,
        }
    }

    /// Appends one panel.
    #[must_use]
    pub fn with_panel(
        mut self,
        series: Vec<Series>,
        keys: DataKeys,
        features: Vec<ChartFeature>,
    ) -> Self {
        self.data.push(series);
        self.data_keys.push(keys);
        self.features.push(features);
        self
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.data.len()
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        let raw: RawChartRequest = serde_json::from_str(input)?;
        Ok(Self {
            data: raw.data,
            data_keys: raw.data_keys,
            features: raw.features,
            config: ChartConfig::from_value(raw.config)?,
        })
    }
}
