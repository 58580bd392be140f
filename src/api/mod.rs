mod binder;
mod config;
mod create_params;
mod feature_dispatch;
mod feature_registry;
mod interactivity;
mod orchestrator;
mod validation;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ChartResult;
use crate::interaction::{EventBus, HoverState, Selection, Tooltip};
use crate::render::{Host, Renderer};

pub use binder::{BindingFailure, BoundPanel, bind_panel, validate_panel};
pub use config::{ChartConfig, ChartRequest};
pub use create_params::{CreateParams, PanelGeometry};
pub use feature_dispatch::{FeatureDrawStats, feature_layer_key};
pub use feature_registry::FeatureRegistry;
pub use orchestrator::{DroppedPanel, RenderReport};

/// A chart instance: the drawing host it owns, its private event bus, the
/// feature renderers it dispatches to and the optional tooltip.
///
/// Each instance has its own bus, so events never cross charts.
pub struct Chart {
    host: Host,
    events: EventBus,
    registry: FeatureRegistry,
    tooltip: Option<Rc<RefCell<dyn Tooltip>>>,
    hit_targets: Vec<Selection>,
    hover: HoverState,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("host", &self.host)
            .field("events", &self.events)
            .field("registry", &self.registry)
            .field("tooltip", &self.tooltip.is_some())
            .field("hit_targets", &self.hit_targets.len())
            .field("hover", &self.hover)
            .finish()
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(FeatureRegistry::with_defaults())
    }

    #[must_use]
    pub fn with_registry(registry: FeatureRegistry) -> Self {
        Self {
            host: Host::new(),
            events: EventBus::new(),
            registry,
            tooltip: None,
            hit_targets: Vec::new(),
            hover: HoverState::default(),
        }
    }

    #[must_use]
    pub fn with_tooltip<T: Tooltip + 'static>(mut self, tooltip: Rc<RefCell<T>>) -> Self {
        self.set_tooltip(tooltip);
        self
    }

    /// Attaches a tooltip. Takes effect on the next render.
    pub fn set_tooltip<T: Tooltip + 'static>(&mut self, tooltip: Rc<RefCell<T>>) {
        self.tooltip = Some(tooltip);
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Interactive layers of the last render, in draw order.
    #[must_use]
    pub fn hit_targets(&self) -> &[Selection] {
        &self.hit_targets
    }

    #[must_use]
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Hands the drawing host to a backend.
    pub fn render_with<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.host)
    }
}
