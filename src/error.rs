use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown coordinate system `{0}`")]
    UnknownCoordinateSystem(String),

    #[error("invalid margin: `{side}` must be finite and >= 0 (got {value})")]
    InvalidMargin { side: &'static str, value: f64 },

    #[error("logarithmic axis `{axis}` requires values > 0 (got {value})")]
    NonPositiveLogValue { axis: String, value: f64 },

    #[error("malformed chart json: {0}")]
    Json(#[from] serde_json::Error),
}
