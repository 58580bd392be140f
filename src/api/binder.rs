use thiserror::Error;

use crate::core::{DataKeys, Series, SeriesField};
use crate::render::ColorScale;

/// Why a panel was dropped from a render. Siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingFailure {
    #[error("panel has no series")]
    EmptySeries,

    #[error("first series has no point list under data key `{key}`")]
    MissingDataKey { key: String },

    #[error("first point lacks coordinate field `{field}` for axis `{axis}`")]
    MissingCoordinate { axis: String, field: String },

    #[error("panel margin `{side}` must be finite and >= 0 (got {value})")]
    InvalidMargin { side: &'static str, value: f64 },

    #[error("panel plot area is degenerate: {reason}")]
    DegenerateGeometry { reason: String },
}

/// Series and schema of a panel that passed binding checks.
#[derive(Debug, Clone)]
pub struct BoundPanel<'a> {
    pub series: &'a [Series],
    pub data_keys: &'a DataKeys,
    pub colors: ColorScale,
}

/// Structural checks on the first series and first point only.
///
/// An empty point list passes: the panel renders empty.
pub fn validate_panel(series: &[Series], keys: &DataKeys) -> Result<(), BindingFailure> {
    let first = series.first().ok_or(BindingFailure::EmptySeries)?;
    let points = match first.field(&keys.data) {
        Some(SeriesField::Points(points)) => points,
        Some(SeriesField::Text(_)) | None => {
            return Err(BindingFailure::MissingDataKey {
                key: keys.data.clone(),
            });
        }
    };
    let Some(point) = points.first() else {
        return Ok(());
    };
    match keys
        .coordinates
        .iter()
        .find(|(_, field)| !point.contains(field))
    {
        Some((axis, field)) => Err(BindingFailure::MissingCoordinate {
            axis: axis.clone(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

/// Validates a panel and assigns one colour per series in input order.
pub fn bind_panel<'a>(
    series: &'a [Series],
    keys: &'a DataKeys,
) -> Result<BoundPanel<'a>, BindingFailure> {
    validate_panel(series, keys)?;
    let names = series
        .iter()
        .map(|entry| keys.series_name(entry).map(str::to_owned))
        .collect();
    Ok(BoundPanel {
        series,
        data_keys: keys,
        colors: ColorScale::new(names),
    })
}

#[cfg(test)]
mod tests {
    use super::{BindingFailure, bind_panel, validate_panel};
    use crate::core::{DataKeys, DataPoint, Series};

    fn keys() -> DataKeys {
        DataKeys::with_axes("name", "data", ["x", "y"])
    }

    #[test]
    fn empty_series_list_fails() {
        assert_eq!(validate_panel(&[], &keys()), Err(BindingFailure::EmptySeries));
    }

    #[test]
    fn missing_data_field_fails() {
        let series = vec![Series::new().with_text("name", "s1")];
        assert_eq!(
            validate_panel(&series, &keys()),
            Err(BindingFailure::MissingDataKey {
                key: "data".to_owned()
            })
        );

        let text_data = vec![Series::new().with_text("data", "not points")];
        assert!(matches!(
            validate_panel(&text_data, &keys()),
            Err(BindingFailure::MissingDataKey { .. })
        ));
    }

    #[test]
    fn only_first_point_is_checked() {
        let points = vec![
            DataPoint::new().with("x", 1.0).with("y", 2.0),
            DataPoint::new().with("x", 2.0),
        ];
        let series = vec![Series::for_keys(&keys(), "s1", points)];
        assert!(validate_panel(&series, &keys()).is_ok());

        let broken = vec![Series::for_keys(&keys(), "s1", vec![DataPoint::new().with("x", 1.0)])];
        assert_eq!(
            validate_panel(&broken, &keys()),
            Err(BindingFailure::MissingCoordinate {
                axis: "y".to_owned(),
                field: "y".to_owned()
            })
        );
    }

    #[test]
    fn empty_point_list_binds() {
        let keys = keys();
        let series = vec![Series::for_keys(&keys, "s1", Vec::new())];
        let bound = bind_panel(&series, &keys).expect("bind");
        assert_eq!(bound.colors.len(), 1);
        assert_eq!(bound.colors.color_for("s1"), Some(bound.colors.color(0)));
    }
}
