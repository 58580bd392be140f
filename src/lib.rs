//! multichart: multi-panel chart engine.
//!
//! A chart is a list of panels, each holding several series. The engine
//! resolves each panel's axis domains under a coordinate system, optionally
//! synchronizes them across panels, lays the panels out on drawing surfaces
//! and dispatches configured features (bars, lines, axes, tooltips) to
//! pluggable renderers.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Chart, ChartConfig, ChartRequest, RenderReport};
pub use error::{ChartError, ChartResult};
