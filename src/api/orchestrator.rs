use tracing::{debug, error, info};

use crate::core::{
    BarVariant, DataKeys, DomainStrategy, ResolvedDomains, Series, Viewport, create_scales,
    strategy_for, synchronize, unique_sorted,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartFeature, panel_variant};
use crate::interaction::{BusEvent, TooltipHandle};
use crate::render::{init_container, init_group, panel_group_key};

use super::binder::{BindingFailure, bind_panel};
use super::validation::validate_request;
use super::{Chart, ChartConfig, ChartRequest, CreateParams, FeatureDrawStats, PanelGeometry};

/// A panel left out of a render, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedPanel {
    pub panel: usize,
    pub reason: BindingFailure,
}

/// Outcome of one render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderReport<'a> {
    /// Parameters of every panel that rendered, in panel order.
    pub panels: Vec<CreateParams<'a>>,
    pub dropped: Vec<DroppedPanel>,
    pub stats: Vec<FeatureDrawStats>,
}

impl RenderReport<'_> {
    #[must_use]
    pub fn rendered_panels(&self) -> Vec<usize> {
        self.panels.iter().map(|params| params.panel).collect()
    }

    #[must_use]
    pub fn is_dropped(&self, panel: usize) -> bool {
        self.dropped.iter().any(|dropped| dropped.panel == panel)
    }

    #[must_use]
    pub fn panel(&self, panel: usize) -> Option<&CreateParams<'_>> {
        self.panels.iter().find(|params| params.panel == panel)
    }
}

struct PanelLayout {
    panel_height: f64,
    surface_height: f64,
}

impl Chart {
    /// Runs the full render pipeline for `request`.
    ///
    /// 1. validate the request (fatal on error, host untouched);
    /// 2. resolve per-panel domains and synchronize them;
    /// 3. bind each panel, then set up its surface, group and scales;
    /// 4. dispatch its features;
    /// 5. rewire tooltip subscriptions on this chart's bus.
    ///
    /// Panels that fail binding or layout are dropped and reported; their
    /// siblings render normally. Non-merged charts get one surface per panel,
    /// merged charts share one, and squashed charts split the height evenly.
    pub fn initialize_chart<'a>(&mut self, request: &'a ChartRequest) -> ChartResult<RenderReport<'a>> {
        validate_request(request)?;
        let config = &request.config;
        let strategy = strategy_for(config.coordinate_system);

        let variants: Vec<BarVariant> = request
            .features
            .iter()
            .map(|features| panel_variant(features))
            .collect();
        let per_panel = strategy.resolve_panel_domains(
            &request.data,
            &request.data_keys,
            &variants,
            config.x_value_type,
        )?;
        let synced = synchronize(config.sync_x, config.sync_y, &per_panel, strategy.zero_policy());

        let panel_count = request.panel_count();
        let panel_height = if config.squash && panel_count > 0 {
            config.height / panel_count as f64
        } else {
            config.height
        };
        let layout = PanelLayout {
            panel_height,
            surface_height: if config.merge { config.height } else { panel_height },
        };

        if !config.merge {
            self.host.clear();
        }
        self.hit_targets.clear();
        if let Some(handle) = self.hover.current().map(|target| target.handle) {
            self.events.publish(&BusEvent::Hide { handle });
        }
        self.hover.reset();

        let mut report = RenderReport::default();
        for (index, resolved) in synced.per_panel.iter().enumerate() {
            let prepared = self.prepare_panel(
                index,
                &request.data[index],
                &request.data_keys[index],
                &request.features[index],
                resolved,
                config,
                strategy.as_ref(),
                variants[index],
                &layout,
            );
            let params = match prepared {
                Ok(params) => params,
                Err(reason) => {
                    error!(panel = index, error = %reason, "dropping panel");
                    report.dropped.push(DroppedPanel {
                        panel: index,
                        reason,
                    });
                    continue;
                }
            };
            let (stats, selections) = self.apply_features(&params, &request.features[index]);
            report.stats.extend(stats);
            self.hit_targets.extend(selections);
            report.panels.push(params);
        }

        if config.merge {
            self.prune_merged_groups(&report);
        }
        self.wire_interactivity();

        info!(
            system = %config.coordinate_system,
            panels = panel_count,
            rendered = report.panels.len(),
            dropped = report.dropped.len(),
            merge = config.merge,
            squash = config.squash,
            "chart rendered"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn prepare_panel<'a>(
        &mut self,
        index: usize,
        series: &'a [Series],
        keys: &'a DataKeys,
        features: &[ChartFeature],
        resolved: &ResolvedDomains,
        config: &ChartConfig,
        strategy: &dyn DomainStrategy,
        variant: BarVariant,
        layout: &PanelLayout,
    ) -> Result<CreateParams<'a>, BindingFailure> {
        let bound = bind_panel(series, keys)?;
        let margin = config
            .margin_for(index)
            .validate()
            .map_err(geometry_failure)?;

        let outer = Viewport::new(config.width, layout.panel_height);
        let inner = margin.inner(outer);
        let scales = create_scales(&resolved.x, resolved.y, inner, config.x_value_type)
            .map_err(geometry_failure)?
            .with_y_transform(strategy.value_transform());

        let offset_y = if config.merge && config.squash {
            index as f64 * layout.panel_height
        } else {
            0.0
        };
        let surface = init_container(
            &mut self.host,
            Viewport::new(config.width, layout.surface_height),
            config.merge,
        )
        .map_err(geometry_failure)?;
        let group = init_group(
            &mut self.host,
            surface,
            &panel_group_key(index),
            margin,
            offset_y,
            layout.panel_height,
            config.merge,
        )
        .map_err(geometry_failure)?;

        let roles = strategy.roles(keys);
        let has_bars = features
            .iter()
            .any(|feature| !feature.hide && feature.feature.is_bar_like());
        let distinct_x = if has_bars && !scales.x.is_band() {
            let x_axis = roles.x_axis.as_str();
            unique_sorted(series.iter().flat_map(|entry| {
                keys.points(entry)
                    .iter()
                    .filter_map(move |point| keys.axis_value(point, x_axis).cloned())
            }))
            .len()
        } else {
            0
        };

        debug!(
            panel = index,
            series = series.len(),
            inner_width = inner.width,
            inner_height = inner.height,
            offset_y,
            "prepared panel"
        );
        let mut params = CreateParams {
            panel: index,
            series,
            data_keys: keys,
            system: strategy.system(),
            roles,
            scales,
            colors: bound.colors,
            group,
            tooltip: TooltipHandle {
                surface,
                panel: index,
            },
            geometry: PanelGeometry {
                outer,
                inner,
                margin,
                offset_y,
            },
            variant,
            sub_band: None,
            distinct_x,
            events: self.events.clone(),
        };
        let sub_band = has_bars.then(|| params.sub_band_for(variant));
        params.sub_band = sub_band;
        Ok(params)
    }

    /// Drops groups of the shared surface that this render did not draw.
    fn prune_merged_groups(&mut self, report: &RenderReport<'_>) {
        let Some(surface_id) = self.host.surfaces().first().map(|surface| surface.id()) else {
            return;
        };
        let live: Vec<String> = report
            .panels
            .iter()
            .map(|params| params.group.key.clone())
            .collect();
        if let Some(surface) = self.host.surface_mut(surface_id) {
            surface.retain_groups(|key| live.iter().any(|live_key| live_key == key));
        }
    }
}

fn geometry_failure(err: ChartError) -> BindingFailure {
    match err {
        ChartError::InvalidMargin { side, value } => BindingFailure::InvalidMargin { side, value },
        other => BindingFailure::DegenerateGeometry {
            reason: other.to_string(),
        },
    }
}
