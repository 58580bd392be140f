use tracing::trace;

use crate::core::{Margin, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::surface::{DrawingGroup, GroupRef, Host, SurfaceId};

/// Key of the drawing group holding panel `index`.
#[must_use]
pub fn panel_group_key(index: usize) -> String {
    format!("panel-{index}")
}

/// Returns the surface a panel draws into.
///
/// With `merge`, the host's first surface is reused (and resized) so every
/// panel shares it, and any other surface left by an earlier non-merged
/// render is dropped. Otherwise a fresh surface is appended. Callers clear
/// the host themselves before a non-merged render.
pub fn init_container(host: &mut Host, viewport: Viewport, merge: bool) -> ChartResult<SurfaceId> {
    let viewport = viewport.validate()?;
    if merge {
        if let Some(id) = host.surfaces().first().map(|surface| surface.id()) {
            host.retain_surfaces(|surface| surface.id() == id);
            if let Some(surface) = host.surface_mut(id) {
                surface.resize(viewport);
            }
            trace!(surface = id.get(), "reusing merged surface");
            return Ok(id);
        }
    }
    let id = host.add_surface(viewport);
    trace!(surface = id.get(), merge, "created drawing surface");
    Ok(id)
}

/// Creates or reuses the group `key` on `surface`.
///
/// The group sits at `(margin.left, margin.top + offset_y)` and its inner
/// plot area is the surface width by `panel_height`, minus the margin. Reused
/// groups (merge mode) keep their layers so marks can be reconciled.
#[allow(clippy::too_many_arguments)]
pub fn init_group(
    host: &mut Host,
    surface: SurfaceId,
    key: &str,
    margin: Margin,
    offset_y: f64,
    panel_height: f64,
    merge: bool,
) -> ChartResult<GroupRef> {
    let margin = margin.validate()?;
    let surface_ref = host.surface_mut(surface).ok_or_else(|| {
        ChartError::InvalidData(format!("drawing surface {} does not exist", surface.get()))
    })?;

    let outer = Viewport::new(surface_ref.viewport().width, panel_height);
    let inner = margin.inner(outer);
    let offset = (margin.left, margin.top + offset_y);

    match surface_ref.group_mut(key).filter(|_| merge) {
        Some(group) => group.reposition(offset, inner),
        None => surface_ref.insert_group(DrawingGroup::new(key, offset, inner)),
    }

    trace!(
        surface = surface.get(),
        key,
        offset_x = offset.0,
        offset_y = offset.1,
        "initialized drawing group"
    );
    Ok(GroupRef {
        surface,
        key: key.to_owned(),
    })
}
