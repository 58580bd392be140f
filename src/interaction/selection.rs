use crate::core::DataKeys;
use crate::extensions::FeatureKind;
use crate::interaction::{HoverTarget, TooltipHandle};
use crate::render::{GroupRef, Host, JoinStats, Mark};

/// Live handle to the marks one interactive feature drew.
///
/// It names a layer rather than copying marks, so hit-testing always sees the
/// layer's current content.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub panel: usize,
    pub kind: FeatureKind,
    pub group: GroupRef,
    pub layer: String,
    pub keys: DataKeys,
    pub join: JoinStats,
}

impl Selection {
    #[must_use]
    pub fn tooltip_handle(&self) -> TooltipHandle {
        TooltipHandle {
            surface: self.group.surface,
            panel: self.panel,
        }
    }

    /// Marks currently held by the selected layer.
    #[must_use]
    pub fn marks<'h>(&self, host: &'h Host) -> &'h [Mark] {
        host.group(&self.group)
            .and_then(|group| group.layer(&self.layer))
            .map(|layer| layer.marks())
            .unwrap_or_default()
    }

    /// Topmost mark under a surface-space point.
    #[must_use]
    pub fn hit_test<'h>(&self, host: &'h Host, x: f64, y: f64) -> Option<(HoverTarget, &'h Mark)> {
        let group = host.group(&self.group)?;
        let (local_x, local_y) = group.to_local(x, y);
        let mark = group.layer(&self.layer)?.hit_test(local_x, local_y)?;
        Some((
            HoverTarget {
                handle: self.tooltip_handle(),
                group: self.group.clone(),
                layer: self.layer.clone(),
                mark: mark.key,
            },
            mark,
        ))
    }
}
