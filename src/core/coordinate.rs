use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::DataKeys;
use crate::error::ChartError;

/// Coordinate system a chart is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoordinateSystemType {
    #[default]
    Cartesian,
    Polar,
    Spherical,
    Cylindrical,
    Geographic,
    Logarithmic,
    Parallel,
    Ternary,
    Hexagonal,
}

pub type AxisList = SmallVec<[String; 3]>;

/// How the declared axes of a panel map onto scale roles.
///
/// `x_axis` feeds the horizontal scale; `y_axis` feeds the vertical one. The
/// `value_axis`, when present, is the axis that stacking aggregates over
/// `key_axes` positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisRoles {
    pub key_axes: AxisList,
    pub value_axis: Option<String>,
    pub x_axis: String,
    pub y_axis: Option<String>,
}

impl CoordinateSystemType {
    pub const ALL: [Self; 9] = [
        Self::Cartesian,
        Self::Polar,
        Self::Spherical,
        Self::Cylindrical,
        Self::Geographic,
        Self::Logarithmic,
        Self::Parallel,
        Self::Ternary,
        Self::Hexagonal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cartesian => "cartesian",
            Self::Polar => "polar",
            Self::Spherical => "spherical",
            Self::Cylindrical => "cylindrical",
            Self::Geographic => "geographic",
            Self::Logarithmic => "logarithmic",
            Self::Parallel => "parallel",
            Self::Ternary => "ternary",
            Self::Hexagonal => "hexagonal",
        }
    }

    /// Axes a panel schema must declare. Parallel coordinates accept any set.
    #[must_use]
    pub const fn required_axes(self) -> &'static [&'static str] {
        match self {
            Self::Cartesian | Self::Logarithmic | Self::Hexagonal => &["x", "y"],
            Self::Polar => &["angle", "radius"],
            Self::Spherical => &["longitude", "latitude", "radius"],
            Self::Cylindrical => &["angle", "height", "radius"],
            Self::Geographic => &["longitude", "latitude"],
            Self::Ternary => &["a", "b", "c"],
            Self::Parallel => &[],
        }
    }

    const fn fixed_roles(self) -> Option<(&'static [&'static str], Option<&'static str>, &'static str)> {
        match self {
            Self::Cartesian | Self::Logarithmic | Self::Hexagonal => Some((&["x"], Some("y"), "y")),
            Self::Polar => Some((&["angle"], Some("radius"), "radius")),
            Self::Spherical => Some((&["longitude", "latitude"], Some("radius"), "radius")),
            Self::Cylindrical => Some((&["angle", "height"], Some("radius"), "radius")),
            Self::Geographic => Some((&["longitude"], None, "latitude")),
            Self::Ternary => Some((&["a"], None, "b")),
            Self::Parallel => None,
        }
    }

    /// Resolves axis roles for a panel schema.
    #[must_use]
    pub fn roles(self, keys: &DataKeys) -> AxisRoles {
        match self.fixed_roles() {
            Some((key_axes, value_axis, y_axis)) => AxisRoles {
                key_axes: key_axes.iter().map(|axis| (*axis).to_owned()).collect(),
                value_axis: value_axis.map(str::to_owned),
                x_axis: key_axes[0].to_owned(),
                y_axis: Some(y_axis.to_owned()),
            },
            None => {
                let mut declared = keys.coordinates.keys();
                let x_axis = declared.next().cloned().unwrap_or_default();
                let y_axis = declared.next().cloned();
                AxisRoles {
                    key_axes: SmallVec::from_iter([x_axis.clone()]),
                    value_axis: None,
                    x_axis,
                    y_axis,
                }
            }
        }
    }

    /// Returns the first required axis missing from `keys`, if any.
    #[must_use]
    pub fn missing_axis(self, keys: &DataKeys) -> Option<&'static str> {
        self.required_axes()
            .iter()
            .copied()
            .find(|axis| !keys.coordinates.contains_key(*axis))
    }
}

impl fmt::Display for CoordinateSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystemType {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == normalized)
            .ok_or_else(|| ChartError::UnknownCoordinateSystem(raw.to_owned()))
    }
}

impl TryFrom<String> for CoordinateSystemType {
    type Error = ChartError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<CoordinateSystemType> for String {
    fn from(system: CoordinateSystemType) -> Self {
        system.as_str().to_owned()
    }
}
