use std::cell::RefCell;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::interaction::{
    BusEvent, BusEventKind, HoverTransition, PointerEvent, Tooltip, TooltipHandle,
};

use super::Chart;

impl Chart {
    /// Subscribes tooltip handlers on this chart's bus.
    ///
    /// Runs after every render so the handlers always target the current
    /// tooltip; without a tooltip the bus is left empty.
    pub(super) fn wire_interactivity(&mut self) {
        for kind in [BusEventKind::Show, BusEventKind::Move, BusEventKind::Hide] {
            self.events.unsubscribe(kind);
        }
        let Some(tooltip) = self.tooltip.as_ref() else {
            trace!("no tooltip attached; interactivity not wired");
            return;
        };

        let show = Rc::clone(tooltip);
        self.events.subscribe(BusEventKind::Show, move |event| {
            if let BusEvent::Show { handle, point, keys } = event {
                with_tooltip(&show, *handle, |tooltip| tooltip.show(*handle, point, keys));
            }
        });
        let moved = Rc::clone(tooltip);
        self.events.subscribe(BusEventKind::Move, move |event| {
            if let BusEvent::Move { handle, event } = event {
                with_tooltip(&moved, *handle, |tooltip| tooltip.move_to(*handle, *event));
            }
        });
        let hide = Rc::clone(tooltip);
        self.events.subscribe(BusEventKind::Hide, move |event| {
            if let BusEvent::Hide { handle } = event {
                with_tooltip(&hide, *handle, |tooltip| tooltip.hide(*handle));
            }
        });
    }

    /// Feeds a pointer position through hit-testing and publishes the
    /// resulting tooltip events.
    ///
    /// Entering a mark shows the tooltip and moves it to the pointer, moving
    /// within it only moves, leaving it hides. Later features sit on top, so
    /// they are tested first.
    pub fn pointer_event(&mut self, event: PointerEvent) -> HoverTransition {
        let hit = self
            .hit_targets
            .iter()
            .rev()
            .filter(|selection| selection.group.surface == event.surface)
            .find_map(|selection| {
                selection
                    .hit_test(&self.host, event.x, event.y)
                    .map(|(target, mark)| (target, mark.point.clone(), selection.keys.clone()))
            });

        let previous = self.hover.current().map(|target| target.handle);
        let transition = self
            .hover
            .transition(hit.as_ref().map(|(target, _, _)| target.clone()));

        match (transition, hit, previous) {
            (HoverTransition::Entered, Some((target, point, keys)), previous) => {
                if let Some(previous) = previous.filter(|handle| *handle != target.handle) {
                    self.events.publish(&BusEvent::Hide { handle: previous });
                }
                let handle = target.handle;
                self.events.publish(&BusEvent::Show { handle, point, keys });
                self.events.publish(&BusEvent::Move { handle, event });
            }
            (HoverTransition::Moved, Some((target, _, _)), _) => {
                self.events.publish(&BusEvent::Move {
                    handle: target.handle,
                    event,
                });
            }
            (HoverTransition::Left, _, Some(handle)) => {
                self.events.publish(&BusEvent::Hide { handle });
            }
            _ => {}
        }
        transition
    }
}

fn with_tooltip(
    tooltip: &Rc<RefCell<dyn Tooltip>>,
    handle: TooltipHandle,
    action: impl FnOnce(&mut dyn Tooltip),
) {
    match tooltip.try_borrow_mut() {
        Ok(mut tooltip) => action(&mut *tooltip),
        Err(_) => warn!(panel = handle.panel, "tooltip busy; dropping event"),
    }
}
