mod color_scale;
mod container;
mod null_renderer;
mod primitives;
mod surface;
mod svg_renderer;

pub use color_scale::{ColorScale, TABLEAU_10};
pub use container::{init_container, init_group, panel_group_key};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, Primitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use surface::{
    DrawingGroup, DrawingSurface, GroupRef, Host, JoinStats, Layer, Mark, MarkKey, MarkShape,
    SurfaceId,
};
pub use svg_renderer::SvgRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the fully materialized `Host` so drawing code remains
/// isolated from domain resolution and interaction logic.
pub trait Renderer {
    fn render(&mut self, host: &Host) -> ChartResult<()>;
}
