use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Value;
use crate::error::{ChartError, ChartResult};

/// Pixel extent of a drawing region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidMargin { side, value });
            }
        }
        Ok(self)
    }

    /// Area left for marks once the margin is removed, clamped at zero.
    #[must_use]
    pub fn inner(self, outer: Viewport) -> Viewport {
        Viewport::new(
            (outer.width - self.left - self.right).max(0.0),
            (outer.height - self.top - self.bottom).max(0.0),
        )
    }
}

/// One record of a series, keyed by point field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPoint(IndexMap<String, Value>);

impl DataPoint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Stores a decimal amount as a number; fails when `f64` cannot hold it.
    pub fn with_decimal(self, field: impl Into<String>, value: Decimal) -> ChartResult<Self> {
        Ok(self.with(field, Value::from_decimal(value)?))
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesField {
    Text(String),
    Points(Vec<DataPoint>),
}

/// Named bag of ordered points; field names are defined by [`DataKeys`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    fields: IndexMap<String, SeriesField>,
}

impl Series {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series laid out for `keys`.
    #[must_use]
    pub fn for_keys(keys: &DataKeys, name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self::new()
            .with_text(keys.name.clone(), name)
            .with_points(keys.data.clone(), points)
    }

    #[must_use]
    pub fn with_text(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields
            .insert(field.into(), SeriesField::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_points(mut self, field: impl Into<String>, points: Vec<DataPoint>) -> Self {
        self.fields.insert(field.into(), SeriesField::Points(points));
        self
    }

    #[must_use]
    pub fn field(&self, field: &str) -> Option<&SeriesField> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(SeriesField::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn points(&self, field: &str) -> Option<&[DataPoint]> {
        match self.fields.get(field) {
            Some(SeriesField::Points(points)) => Some(points),
            _ => None,
        }
    }
}

/// Schema mapping logical axes onto point fields for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataKeys {
    pub name: String,
    pub data: String,
    pub coordinates: IndexMap<String, String>,
    #[serde(default)]
    pub magnitude: Option<String>,
}

impl DataKeys {
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            coordinates: IndexMap::new(),
            magnitude: None,
        }
    }

    /// Convenience schema where each axis reads the point field of the same name.
    #[must_use]
    pub fn with_axes<'a>(
        name: impl Into<String>,
        data: impl Into<String>,
        axes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        axes.into_iter()
            .fold(Self::new(name, data), |keys, axis| keys.with_axis(axis, axis))
    }

    #[must_use]
    pub fn with_axis(mut self, axis: impl Into<String>, field: impl Into<String>) -> Self {
        self.coordinates.insert(axis.into(), field.into());
        self
    }

    #[must_use]
    pub fn with_magnitude(mut self, field: impl Into<String>) -> Self {
        self.magnitude = Some(field.into());
        self
    }

    #[must_use]
    pub fn field_for(&self, axis: &str) -> Option<&str> {
        self.coordinates.get(axis).map(String::as_str)
    }

    /// Reads the value a point holds for a logical axis.
    #[must_use]
    pub fn axis_value<'p>(&self, point: &'p DataPoint, axis: &str) -> Option<&'p Value> {
        self.field_for(axis).and_then(|field| point.get(field))
    }

    #[must_use]
    pub fn magnitude_value<'p>(&self, point: &'p DataPoint) -> Option<&'p Value> {
        self.magnitude.as_deref().and_then(|field| point.get(field))
    }

    #[must_use]
    pub fn series_name<'s>(&self, series: &'s Series) -> Option<&'s str> {
        series.text(&self.name)
    }

    /// Points of `series`, or an empty slice when the data field is absent.
    #[must_use]
    pub fn points<'s>(&self, series: &'s Series) -> &'s [DataPoint] {
        series.points(&self.data).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{DataKeys, DataPoint, Margin, Series, Viewport};
    use crate::core::Value;

    #[test]
    fn series_loads_from_json_with_dynamic_keys() {
        let json = r#"{"label":"s1","rows":[{"t":1,"v":5},{"t":2,"v":-3}]}"#;
        let series: Series = serde_json::from_str(json).expect("series json");
        let keys = DataKeys::new("label", "rows")
            .with_axis("x", "t")
            .with_axis("y", "v");

        assert_eq!(keys.series_name(&series), Some("s1"));
        let points = keys.points(&series);
        assert_eq!(points.len(), 2);
        assert_eq!(keys.axis_value(&points[1], "y"), Some(&Value::Number(-3.0)));
    }

    #[test]
    fn margin_rejects_negative_and_non_finite_sides() {
        assert!(Margin::new(1.0, 2.0, 3.0, 4.0).validate().is_ok());
        assert!(Margin::new(-1.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(Margin::new(0.0, f64::NAN, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn margin_inner_area_never_goes_negative() {
        let inner = Margin::uniform(80.0).inner(Viewport::new(100.0, 400.0));
        assert_eq!(inner, Viewport::new(0.0, 240.0));
    }

    #[test]
    fn data_point_builder_keeps_field_order() {
        let point = DataPoint::new().with("b", 1.0).with("a", "x");
        let fields: Vec<&str> = point.fields().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["b", "a"]);
    }
}
