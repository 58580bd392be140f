//! Feature kinds and the built-in renderers that draw them.
//!
//! Renderers only see a panel's `CreateParams` and one layer; registration
//! and ordering live in the api's feature registry.

mod bars;
mod features;
mod guides;
mod lines;
mod marks;

pub use bars::{BarRenderer, ErrorBarRenderer};
pub use features::{
    ChartFeature, DrawOutcome, FeatureKind, FeatureRenderer, panel_variant, parse_config,
};
pub use guides::{
    GridRenderer, LabelRenderer, TooltipRenderer, XAxisRenderer, YAxisRenderer, format_number,
};
pub use lines::{AreaRenderer, LineRenderer};
pub use marks::{BubbleRenderer, MAX_BUBBLE_RADIUS_PX, PointRenderer};

/// Built-in renderer for a known kind; `None` for unknown kinds.
#[must_use]
pub fn builtin_renderer(kind: &FeatureKind) -> Option<Box<dyn FeatureRenderer>> {
    let renderer: Box<dyn FeatureRenderer> = match kind {
        FeatureKind::Bar => Box::new(BarRenderer),
        FeatureKind::ErrorBar => Box::new(ErrorBarRenderer),
        FeatureKind::Line => Box::new(LineRenderer),
        FeatureKind::Area => Box::new(AreaRenderer),
        FeatureKind::Point => Box::new(PointRenderer),
        FeatureKind::Bubble => Box::new(BubbleRenderer),
        FeatureKind::Grid => Box::new(GridRenderer),
        FeatureKind::XAxis => Box::new(XAxisRenderer),
        FeatureKind::YAxis => Box::new(YAxisRenderer),
        FeatureKind::Label => Box::new(LabelRenderer),
        FeatureKind::Tooltip => Box::new(TooltipRenderer),
        FeatureKind::Unknown(_) => return None,
    };
    Some(renderer)
}
