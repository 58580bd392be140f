use tracing::{debug, warn};

use crate::core::domain::{DEFAULT_RANGE, Domain, Range, ZeroPolicy, union_range};
use crate::core::strategy::PanelDomains;
use crate::core::value::unique_sorted;

/// Final domains of one panel after synchronization and fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDomains {
    pub x: Domain,
    pub y: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncedDomains {
    pub shared_x: Option<Domain>,
    pub shared_y: Option<Range>,
    pub per_panel: Vec<ResolvedDomains>,
}

/// Combines per-panel domains into shared or independent ones.
///
/// - `sync_x`: discrete x values of every panel are unioned, deduplicated by
///   canonical key and sorted; continuous x extents are unioned.
/// - `sync_y`: min of minima and max of maxima, with the zero policy
///   re-applied.
///
/// Panels without data never leak infinities: a missing y range becomes
/// `[0, 1]`, a missing x domain becomes the discrete `[0, 1]` (or the
/// continuous `[0, 1]` when the other panels are continuous). The function is
/// pure, so repeated calls with equal input yield identical output.
#[must_use]
pub fn synchronize(
    sync_x: bool,
    sync_y: bool,
    per_panel: &[PanelDomains],
    zero_policy: ZeroPolicy,
) -> SyncedDomains {
    let continuous_x = per_panel
        .iter()
        .any(|panel| matches!(panel.x, Some(Domain::Continuous { .. })));

    let shared_x = sync_x.then(|| {
        let shared = if continuous_x {
            per_panel
                .iter()
                .filter_map(|panel| panel.x.as_ref().and_then(Domain::extent))
                .fold(None, union_range)
                .map(|(min, max)| Domain::Continuous { min, max })
        } else {
            let values = unique_sorted(
                per_panel
                    .iter()
                    .filter_map(|panel| panel.x.as_ref())
                    .flat_map(|domain| domain.values().iter().cloned()),
            );
            (!values.is_empty()).then_some(Domain::Discrete(values))
        };
        shared.unwrap_or_else(|| {
            warn!("no x values across panels; using default domain [0, 1]");
            fallback_x(continuous_x)
        })
    });

    let shared_y = sync_y.then(|| {
        per_panel
            .iter()
            .filter_map(|panel| panel.y)
            .fold(None, union_range)
            .map(|range| zero_policy.apply(range))
            .unwrap_or_else(|| {
                warn!("no numeric values across panels; using default range [0, 1]");
                DEFAULT_RANGE
            })
    });

    let resolved = per_panel
        .iter()
        .enumerate()
        .map(|(index, panel)| ResolvedDomains {
            x: match &shared_x {
                Some(shared) => shared.clone(),
                None => panel.x.clone().unwrap_or_else(|| {
                    warn!(panel = index, "panel has no x values; using default domain [0, 1]");
                    fallback_x(continuous_x)
                }),
            },
            y: match shared_y {
                Some(shared) => shared,
                None => panel.y.unwrap_or_else(|| {
                    warn!(panel = index, "panel has no numeric values; using default range [0, 1]");
                    DEFAULT_RANGE
                }),
            },
        })
        .collect();

    debug!(
        sync_x,
        sync_y,
        panels = per_panel.len(),
        "synchronized panel domains"
    );
    SyncedDomains {
        shared_x,
        shared_y,
        per_panel: resolved,
    }
}

fn fallback_x(continuous: bool) -> Domain {
    if continuous {
        Domain::default_continuous()
    } else {
        Domain::default_discrete()
    }
}

#[cfg(test)]
mod tests {
    use super::synchronize;
    use crate::core::strategy::PanelDomains;
    use crate::core::{Domain, Value, ZeroPolicy};

    fn discrete(values: &[f64]) -> Option<Domain> {
        Some(Domain::Discrete(values.iter().copied().map(Value::from).collect()))
    }

    #[test]
    fn unsynced_panels_keep_their_own_domains() {
        let panels = [
            PanelDomains { x: discrete(&[1.0, 2.0]), y: Some((-3.0, 5.0)) },
            PanelDomains { x: discrete(&[3.0]), y: Some((0.0, 4.0)) },
        ];
        let synced = synchronize(false, false, &panels, ZeroPolicy::Include);
        assert_eq!(synced.shared_x, None);
        assert_eq!(synced.per_panel[1].y, (0.0, 4.0));
        assert_eq!(synced.per_panel[1].x, discrete(&[3.0]).expect("x"));
    }

    #[test]
    fn synced_x_unions_and_sorts_values() {
        let panels = [
            PanelDomains { x: discrete(&[3.0, 1.0]), y: None },
            PanelDomains { x: discrete(&[2.0, 3.0]), y: None },
        ];
        let synced = synchronize(true, false, &panels, ZeroPolicy::Include);
        let expected = discrete(&[1.0, 2.0, 3.0]).expect("x");
        assert_eq!(synced.shared_x, Some(expected.clone()));
        assert!(synced.per_panel.iter().all(|panel| panel.x == expected));
    }

    #[test]
    fn synced_continuous_x_unions_extents() {
        let panels = [
            PanelDomains { x: Some(Domain::Continuous { min: 5.0, max: 9.0 }), y: None },
            PanelDomains { x: Some(Domain::Continuous { min: 1.0, max: 6.0 }), y: None },
            PanelDomains { x: None, y: None },
        ];
        let synced = synchronize(true, false, &panels, ZeroPolicy::Include);
        assert_eq!(synced.shared_x, Some(Domain::Continuous { min: 1.0, max: 9.0 }));
    }

    #[test]
    fn synced_y_reapplies_zero_inclusion() {
        let panels = [
            PanelDomains { x: None, y: Some((2.0, 5.0)) },
            PanelDomains { x: None, y: Some((3.0, 8.0)) },
        ];
        let synced = synchronize(false, true, &panels, ZeroPolicy::Include);
        assert_eq!(synced.shared_y, Some((0.0, 8.0)));

        let synced = synchronize(false, true, &panels, ZeroPolicy::Exclude);
        assert_eq!(synced.shared_y, Some((2.0, 8.0)));
    }

    #[test]
    fn empty_panels_fall_back_to_unit_domains() {
        let panels = [PanelDomains { x: None, y: None }];
        for (sync_x, sync_y) in [(false, false), (true, true)] {
            let synced = synchronize(sync_x, sync_y, &panels, ZeroPolicy::Include);
            assert_eq!(synced.per_panel[0].y, (0.0, 1.0));
            assert_eq!(synced.per_panel[0].x, Domain::default_discrete());
        }
    }
}
