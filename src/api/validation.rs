use crate::error::{ChartError, ChartResult};

use super::ChartRequest;

/// Fatal checks run before any domain work or drawing.
///
/// Panel-level data problems are not checked here; they drop single panels
/// during binding.
pub(super) fn validate_request(request: &ChartRequest) -> ChartResult<()> {
    let panels = request.data.len();
    if request.data_keys.len() != panels || request.features.len() != panels {
        return Err(ChartError::InvalidConfig(format!(
            "data, data_keys and features must have equal lengths (got {}, {}, {})",
            panels,
            request.data_keys.len(),
            request.features.len()
        )));
    }

    let config = &request.config;
    config.viewport().validate()?;
    config.margin.validate()?;
    if config.panel_margins.len() > panels {
        return Err(ChartError::InvalidConfig(format!(
            "panel_margins has {} entries for {panels} panels",
            config.panel_margins.len()
        )));
    }

    let system = config.coordinate_system;
    for (index, keys) in request.data_keys.iter().enumerate() {
        if keys.coordinates.is_empty() {
            return Err(ChartError::InvalidConfig(format!(
                "panel {index} declares no coordinate axes"
            )));
        }
        if let Some(axis) = system.missing_axis(keys) {
            return Err(ChartError::InvalidConfig(format!(
                "panel {index} is missing axis `{axis}` required by the {system} coordinate system"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_request;
    use crate::api::{ChartConfig, ChartRequest};
    use crate::core::{CoordinateSystemType, DataKeys, Margin};
    use crate::error::ChartError;

    fn request(config: ChartConfig) -> ChartRequest {
        ChartRequest::new(config).with_panel(
            Vec::new(),
            DataKeys::with_axes("name", "data", ["x", "y"]),
            Vec::new(),
        )
    }

    #[test]
    fn mismatched_lengths_are_fatal() {
        let mut request = request(ChartConfig::new(100.0, 100.0));
        request.features.clear();
        assert!(matches!(
            validate_request(&request),
            Err(ChartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn size_and_global_margin_are_checked() {
        assert!(matches!(
            validate_request(&request(ChartConfig::new(0.0, 100.0))),
            Err(ChartError::InvalidViewport { .. })
        ));
        let config = ChartConfig::new(100.0, 100.0).with_margin(Margin::new(-1.0, 0.0, 0.0, 0.0));
        assert!(matches!(
            validate_request(&request(config)),
            Err(ChartError::InvalidMargin { side: "top", .. })
        ));
    }

    #[test]
    fn schema_must_cover_required_axes() {
        let config = ChartConfig::new(100.0, 100.0).with_coordinate_system(CoordinateSystemType::Polar);
        assert!(validate_request(&request(config)).is_err());
        assert!(validate_request(&request(ChartConfig::new(100.0, 100.0))).is_ok());
    }

    #[test]
    fn too_many_panel_margins_are_rejected() {
        let config = ChartConfig::new(100.0, 100.0).with_panel_margin(3, Margin::uniform(1.0));
        assert!(validate_request(&request(config)).is_err());
    }
}
