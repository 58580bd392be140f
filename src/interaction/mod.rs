//! Pointer interactivity: the per-chart event bus, the tooltip seam and the
//! hover state machine driving show/move/hide.

mod selection;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{DataKeys, DataPoint};
use crate::render::{GroupRef, MarkKey, SurfaceId};

pub use selection::Selection;

/// Pointer position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub surface: SurfaceId,
    pub x: f64,
    pub y: f64,
}

/// Identifies the tooltip slot of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipHandle {
    pub surface: SurfaceId,
    pub panel: usize,
}

/// Tooltip widget driven by bus events; never called by renderers directly.
pub trait Tooltip {
    fn show(&mut self, handle: TooltipHandle, point: &DataPoint, keys: &DataKeys);
    fn move_to(&mut self, handle: TooltipHandle, event: PointerEvent);
    fn hide(&mut self, handle: TooltipHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusEventKind {
    Show,
    Move,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    Show {
        handle: TooltipHandle,
        point: DataPoint,
        keys: DataKeys,
    },
    Move {
        handle: TooltipHandle,
        event: PointerEvent,
    },
    Hide {
        handle: TooltipHandle,
    },
}

impl BusEvent {
    #[must_use]
    pub fn kind(&self) -> BusEventKind {
        match self {
            Self::Show { .. } => BusEventKind::Show,
            Self::Move { .. } => BusEventKind::Move,
            Self::Hide { .. } => BusEventKind::Hide,
        }
    }
}

type Handler = Box<dyn FnMut(&BusEvent)>;

/// Single-channel pub/sub owned by one chart.
///
/// Clones share the same handler table, so a chart and the `CreateParams` it
/// hands out publish into one bus while separate charts stay isolated. At
/// most one handler exists per event kind.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<IndexMap<BusEventKind, Handler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribed", &self.handlers.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for `kind`, replacing any previous one.
    pub fn subscribe(&self, kind: BusEventKind, handler: impl FnMut(&BusEvent) + 'static) {
        self.handlers.borrow_mut().insert(kind, Box::new(handler));
    }

    pub fn unsubscribe(&self, kind: BusEventKind) -> bool {
        self.handlers.borrow_mut().shift_remove(&kind).is_some()
    }

    #[must_use]
    pub fn is_subscribed(&self, kind: BusEventKind) -> bool {
        self.handlers.borrow().contains_key(&kind)
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Delivers `event` to the handler of its kind. Returns `false` when
    /// nothing is subscribed.
    ///
    /// The handler is taken out of the table while it runs, so it may
    /// publish or subscribe on the same bus.
    pub fn publish(&self, event: &BusEvent) -> bool {
        let kind = event.kind();
        let Some(mut handler) = self.handlers.borrow_mut().shift_remove(&kind) else {
            trace!(?kind, "no subscriber for bus event");
            return false;
        };
        handler(event);
        self.handlers.borrow_mut().entry(kind).or_insert(handler);
        true
    }
}

/// The mark currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub handle: TooltipHandle,
    pub group: GroupRef,
    pub layer: String,
    pub mark: MarkKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTransition {
    /// Pointer reached a new mark: show, then move.
    Entered,
    /// Pointer moved within the hovered mark.
    Moved,
    /// Pointer left the hovered mark.
    Left,
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    current: Option<HoverTarget>,
}

impl HoverState {
    #[must_use]
    pub fn current(&self) -> Option<&HoverTarget> {
        self.current.as_ref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn transition(&mut self, hit: Option<HoverTarget>) -> HoverTransition {
        let transition = match (&self.current, &hit) {
            (_, Some(next)) if self.current.as_ref() == Some(next) => HoverTransition::Moved,
            (_, Some(_)) => HoverTransition::Entered,
            (Some(_), None) => HoverTransition::Left,
            (None, None) => HoverTransition::Idle,
        };
        self.current = hit;
        transition
    }
}
