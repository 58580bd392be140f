use serde::Serialize;
use tracing::{debug, error, trace, warn};

use crate::extensions::{ChartFeature, DrawOutcome, FeatureKind};
use crate::interaction::Selection;

use super::{Chart, CreateParams};

/// What one feature drew in one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDrawStats {
    pub panel: usize,
    pub feature: FeatureKind,
    pub layer: String,
    pub outcome: DrawOutcome,
}

/// Layer key of the feature at `position` in a panel's feature list.
#[must_use]
pub fn feature_layer_key(kind: &FeatureKind, position: usize) -> String {
    format!("{}-{position}", kind.name())
}

impl Chart {
    /// Draws a panel's features in caller order.
    ///
    /// Hidden features are skipped silently; unknown or unregistered kinds
    /// and failing renderers are logged and skipped without touching the
    /// other features. Interactive kinds yield a selection for hit-testing.
    ///
    /// Layers of a reused group that no dispatched feature owns are dropped,
    /// so hidden or removed features leave nothing behind.
    pub(super) fn apply_features(
        &mut self,
        params: &CreateParams<'_>,
        features: &[ChartFeature],
    ) -> (Vec<FeatureDrawStats>, Vec<Selection>) {
        let mut stats = Vec::new();
        let mut selections = Vec::new();
        let mut dispatched = Vec::new();

        for (position, feature) in features.iter().enumerate() {
            let kind = &feature.feature;
            if feature.hide {
                trace!(panel = params.panel, feature = %kind, "skipping hidden feature");
                continue;
            }
            if let FeatureKind::Unknown(name) = kind {
                warn!(panel = params.panel, feature = %name, "unknown feature; skipping");
                continue;
            }
            let Some(renderer) = self.registry.get(kind) else {
                warn!(panel = params.panel, feature = %kind, "no renderer registered; skipping");
                continue;
            };
            let Some(group) = self.host.group_mut(&params.group) else {
                warn!(panel = params.panel, group = %params.group.key, "drawing group missing; skipping feature");
                continue;
            };

            let layer_key = feature_layer_key(kind, position);
            dispatched.push(layer_key.clone());
            let layer = group.layer_mut(&layer_key);
            layer.clear_primitives();
            match renderer.draw(params, layer, feature.config.as_ref()) {
                Ok(outcome) => {
                    if kind.is_interactive() {
                        selections.push(Selection {
                            panel: params.panel,
                            kind: kind.clone(),
                            group: params.group.clone(),
                            layer: layer_key.clone(),
                            keys: params.data_keys.clone(),
                            join: outcome.marks,
                        });
                    }
                    stats.push(FeatureDrawStats {
                        panel: params.panel,
                        feature: kind.clone(),
                        layer: layer_key,
                        outcome,
                    });
                }
                Err(err) => {
                    layer.clear_primitives();
                    layer.replace_marks(Vec::new());
                    error!(
                        panel = params.panel,
                        feature = %kind,
                        error = %err,
                        "feature renderer failed; skipping"
                    );
                }
            }
        }

        if let Some(group) = self.host.group_mut(&params.group) {
            group.retain_layers(|key| dispatched.iter().any(|live| live == key));
        }

        debug!(
            panel = params.panel,
            requested = features.len(),
            drawn = stats.len(),
            interactive = selections.len(),
            "applied panel features"
        );
        (stats, selections)
    }
}
