use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use multichart::api::{
    BindingFailure, Chart, ChartConfig, ChartRequest, CreateParams, FeatureRegistry,
};
use multichart::core::{
    CoordinateSystemType, DataKeys, DataPoint, Margin, Series, Value, XValueType,
};
use multichart::error::{ChartError, ChartResult};
use multichart::extensions::{ChartFeature, DrawOutcome, FeatureKind, FeatureRenderer};
use multichart::render::{Layer, LinePrimitive, MarkShape, Primitive, panel_group_key};
use rust_decimal::Decimal;

fn keys() -> DataKeys {
    DataKeys::with_axes("name", "data", ["x", "y"])
}

fn series(name: &str, rows: &[(f64, f64)]) -> Series {
    let points = rows
        .iter()
        .map(|(x, y)| DataPoint::new().with("x", *x).with("y", *y))
        .collect();
    Series::for_keys(&keys(), name, points)
}

fn features(kinds: &[&str]) -> Vec<ChartFeature> {
    kinds.iter().map(|kind| ChartFeature::new(*kind)).collect()
}

fn stacked_bar() -> ChartFeature {
    ChartFeature::new(FeatureKind::Bar).with_config(serde_json::json!({ "variant": "stacked" }))
}

#[test]
fn two_panel_sync_y_unions_grouped_and_stacked_ranges() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0).with_sync(false, true))
        .with_panel(
            vec![series("s1", &[(1.0, 5.0), (2.0, -3.0)])],
            keys(),
            features(&["bar"]),
        )
        .with_panel(
            vec![series("s2", &[(1.0, 2.0), (2.0, 4.0)])],
            keys(),
            vec![stacked_bar()],
        );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.rendered_panels(), vec![0, 1]);
    for params in &report.panels {
        assert_eq!(params.scales.y.domain(), (-3.0, 5.0));
    }
}

#[test]
fn unsynced_panels_include_zero_independently() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0))
        .with_panel(vec![series("s1", &[(1.0, 5.0), (2.0, 10.0)])], keys(), features(&["bar"]))
        .with_panel(
            vec![series("s2", &[(1.0, -8.0), (2.0, -2.0)])],
            keys(),
            features(&["bar"]),
        );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.panels[0].scales.y.domain(), (0.0, 10.0));
    assert_eq!(report.panels[1].scales.y.domain(), (-8.0, 0.0));
}

#[test]
fn stacked_panel_domain_covers_cumulative_totals() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![
            series("a", &[(1.0, 3.0), (2.0, 1.0)]),
            series("b", &[(1.0, 4.0), (2.0, -2.0)]),
        ],
        keys(),
        vec![stacked_bar()],
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.panels[0].scales.y.domain(), (-2.0, 7.0));
}

#[test]
fn date_axis_maps_first_and_last_dates_to_plot_edges() {
    let keys = keys();
    let early = Value::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"));
    let late = Value::Date(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().expect("date"));
    let points = vec![
        DataPoint::new().with("x", early.clone()).with("y", 3.0),
        DataPoint::new().with("x", late.clone()).with("y", 6.0),
    ];
    let config = ChartConfig::new(400.0, 300.0).with_x_value_type(XValueType::Date);
    let request = ChartRequest::new(config).with_panel(
        vec![Series::for_keys(&keys, "s1", points)],
        keys,
        features(&["line", "x-axis"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    let params = &report.panels[0];

    assert!(!params.scales.x.is_band());
    let width = params.geometry.inner.width;
    assert_relative_eq!(params.scales.x.position(&early).expect("early"), 0.0);
    assert_relative_eq!(params.scales.x.position(&late).expect("late"), width);
}

#[test]
fn unknown_feature_is_skipped_without_affecting_others() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![series("s1", &[(1.0, 2.0), (2.0, 4.0)])],
        keys(),
        features(&["point", "heatmap", "line"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    let drawn: Vec<&str> = report.stats.iter().map(|stats| stats.layer.as_str()).collect();
    assert_eq!(drawn, vec!["point-0", "line-2"]);

    let group = chart
        .host()
        .group(&report.panels[0].group)
        .expect("panel group");
    assert_eq!(group.layer("point-0").expect("points").marks().len(), 2);
    assert_eq!(group.layer("line-2").expect("line").primitives().len(), 1);
    assert!(group.layer("heatmap-1").is_none());
}

#[test]
fn hidden_features_are_not_drawn() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![series("s1", &[(1.0, 2.0)])],
        keys(),
        vec![ChartFeature::new("point").hidden(), ChartFeature::new("grid")],
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.stats.len(), 1);
    assert_eq!(report.stats[0].feature, FeatureKind::Grid);
    assert!(chart.hit_targets().is_empty());
}

#[test]
fn failing_panel_does_not_affect_siblings() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0))
        .with_panel(vec![series("s1", &[(1.0, 2.0)])], keys(), features(&["bar"]))
        .with_panel(Vec::new(), keys(), features(&["bar"]))
        .with_panel(vec![series("s3", &[(1.0, 7.0)])], keys(), features(&["bar"]));

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.rendered_panels(), vec![0, 2]);
    assert!(report.is_dropped(1));
    assert_eq!(report.dropped[0].reason, BindingFailure::EmptySeries);
    assert_eq!(chart.host().surfaces().len(), 2);
    assert_eq!(chart.host().mark_count(), 2);
}

#[test]
fn missing_coordinate_in_first_point_drops_panel() {
    let broken = Series::for_keys(&keys(), "s1", vec![DataPoint::new().with("x", 1.0)]);
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0))
        .with_panel(vec![broken], keys(), features(&["point"]))
        .with_panel(vec![series("s2", &[(1.0, 1.0)])], keys(), features(&["point"]));

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(
        report.dropped[0].reason,
        BindingFailure::MissingCoordinate {
            axis: "y".to_owned(),
            field: "y".to_owned(),
        }
    );
    assert_eq!(report.rendered_panels(), vec![1]);
}

#[test]
fn invalid_panel_margin_drops_only_that_panel() {
    let config = ChartConfig::new(400.0, 300.0)
        .with_panel_margin(1, Margin::new(-5.0, 10.0, 10.0, 10.0));
    let request = ChartRequest::new(config)
        .with_panel(vec![series("s1", &[(1.0, 2.0)])], keys(), features(&["point"]))
        .with_panel(vec![series("s2", &[(1.0, 3.0)])], keys(), features(&["point"]));

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.rendered_panels(), vec![0]);
    assert!(matches!(
        report.dropped[0].reason,
        BindingFailure::InvalidMargin { side: "top", .. }
    ));
}

#[test]
fn panel_without_points_falls_back_to_unit_domains() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![Series::for_keys(&keys(), "empty", Vec::new())],
        keys(),
        features(&["bar", "y-axis"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    let params = &report.panels[0];

    assert_eq!(params.scales.y.domain(), (0.0, 1.0));
    let (min, max) = params.scales.x.range();
    assert!(min.is_finite() && max.is_finite());
    assert_eq!(chart.host().mark_count(), 0);
}

#[test]
fn invalid_request_is_fatal_and_leaves_host_untouched() {
    let good = ChartRequest::new(ChartConfig::new(400.0, 300.0))
        .with_panel(vec![series("s1", &[(1.0, 2.0)])], keys(), features(&["point"]));
    let mut chart = Chart::new();
    chart.initialize_chart(&good).expect("first render");

    let mut mismatched = good.clone();
    mismatched.features.clear();
    assert!(matches!(
        chart.initialize_chart(&mismatched),
        Err(ChartError::InvalidConfig(_))
    ));

    let bad_margin = ChartRequest::new(
        ChartConfig::new(400.0, 300.0).with_margin(Margin::new(10.0, f64::NAN, 10.0, 10.0)),
    )
    .with_panel(vec![series("s1", &[(1.0, 2.0)])], keys(), features(&["point"]));
    assert!(matches!(
        chart.initialize_chart(&bad_margin),
        Err(ChartError::InvalidMargin { side: "right", .. })
    ));

    assert_eq!(chart.host().surfaces().len(), 1);
    assert_eq!(chart.host().mark_count(), 1);
}

#[test]
fn missing_required_axis_is_fatal() {
    let polar_config =
        ChartConfig::new(400.0, 300.0).with_coordinate_system(CoordinateSystemType::Polar);
    let request = ChartRequest::new(polar_config).with_panel(
        vec![series("s1", &[(1.0, 2.0)])],
        keys(),
        features(&["point"]),
    );

    let mut chart = Chart::new();
    assert!(matches!(
        chart.initialize_chart(&request),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn logarithmic_system_rejects_non_positive_values() {
    let config =
        ChartConfig::new(400.0, 300.0).with_coordinate_system(CoordinateSystemType::Logarithmic);
    let request = ChartRequest::new(config).with_panel(
        vec![series("s1", &[(1.0, 0.0), (2.0, 100.0)])],
        keys(),
        features(&["point"]),
    );

    let mut chart = Chart::new();
    assert!(matches!(
        chart.initialize_chart(&request),
        Err(ChartError::NonPositiveLogValue { axis, value }) if axis == "y" && value == 0.0
    ));
}

#[test]
fn logarithmic_system_scales_decades_evenly() {
    let config =
        ChartConfig::new(400.0, 300.0).with_coordinate_system(CoordinateSystemType::Logarithmic);
    let request = ChartRequest::new(config).with_panel(
        vec![series("s1", &[(1.0, 1.0), (2.0, 10.0), (3.0, 100.0)])],
        keys(),
        features(&["point"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    let params = &report.panels[0];

    assert_eq!(params.scales.y.domain(), (0.0, 2.0));
    let bottom = params.y_pixel(1.0).expect("1");
    let middle = params.y_pixel(10.0).expect("10");
    let top = params.y_pixel(100.0).expect("100");
    assert_relative_eq!(bottom - middle, middle - top, epsilon = 1e-9);
}

#[test]
fn zero_panels_render_nothing() {
    let mut chart = Chart::new();
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0).with_squash(true));
    let report = chart.initialize_chart(&request).expect("render");

    assert!(report.panels.is_empty());
    assert!(report.dropped.is_empty());
    assert!(chart.host().surfaces().is_empty());
}

#[test]
fn rendering_twice_yields_identical_domains() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0).with_sync(true, true))
        .with_panel(vec![series("s1", &[(1.0, 2.0), (3.0, 6.0)])], keys(), features(&["bar"]))
        .with_panel(vec![series("s2", &[(2.0, -1.0)])], keys(), features(&["bar"]));

    let mut chart = Chart::new();
    let first: Vec<_> = chart
        .initialize_chart(&request)
        .expect("first")
        .panels
        .iter()
        .map(|params| params.scales.clone())
        .collect();
    let second: Vec<_> = chart
        .initialize_chart(&request)
        .expect("second")
        .panels
        .iter()
        .map(|params| params.scales.clone())
        .collect();

    assert_eq!(first, second);
    assert_eq!(chart.host().surfaces().len(), 2);
}

#[test]
fn synced_x_shares_sorted_union_of_values() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0).with_sync(true, false))
        .with_panel(vec![series("s1", &[(3.0, 1.0), (1.0, 1.0)])], keys(), features(&["bar"]))
        .with_panel(vec![series("s2", &[(2.0, 1.0), (3.0, 1.0)])], keys(), features(&["bar"]));

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");

    for params in &report.panels {
        let multichart::core::XScale::Band(band) = &params.scales.x else {
            panic!("expected band scale");
        };
        assert_eq!(
            band.domain(),
            &[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
        );
    }
}

#[test]
fn grouped_bars_split_band_between_series() {
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![
            series("a", &[(1.0, 2.0), (2.0, 3.0)]),
            series("b", &[(1.0, 4.0), (2.0, 1.0)]),
        ],
        keys(),
        features(&["bar"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    let params = &report.panels[0];
    let sub_band = params.sub_band.clone().expect("bars get a sub-band");

    assert_relative_eq!(sub_band.bandwidth() * 2.0, params.scales.x.bandwidth());
    assert_eq!(report.stats[0].outcome.marks.entered, 4);
}

#[test]
fn bar_variant_override_gets_its_own_slots() {
    let grouped_bar =
        ChartFeature::new(FeatureKind::Bar).with_config(serde_json::json!({ "variant": "grouped" }));
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![
            series("a", &[(1.0, 2.0), (2.0, 3.0)]),
            series("b", &[(1.0, 4.0), (2.0, 1.0)]),
        ],
        keys(),
        vec![stacked_bar(), grouped_bar],
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    let params = &report.panels[0];
    let band = params.scales.x.bandwidth();
    let panel_slots = params.sub_band.clone().expect("bars get a sub-band");
    assert_relative_eq!(panel_slots.bandwidth(), band);

    let group = chart.host().group(&params.group).expect("group");
    let grouped = group.layer("bar-1").expect("grouped layer").marks();
    let rects: Vec<_> = grouped
        .iter()
        .filter(|mark| mark.key.point == 0)
        .map(|mark| match mark.shape {
            MarkShape::Rect(rect) => rect,
            MarkShape::Circle(_) => panic!("bars draw rects"),
        })
        .collect();
    assert_eq!(rects.len(), 2);
    for rect in &rects {
        assert_relative_eq!(rect.width, band / 2.0);
    }
    assert_relative_eq!(rects[1].x - rects[0].x, band / 2.0);
}

#[test]
fn decimal_points_feed_the_value_domain() {
    let points = vec![
        DataPoint::new()
            .with("x", 1.0)
            .with_decimal("y", Decimal::new(1_250, 2))
            .expect("decimal"),
        DataPoint::new()
            .with("x", 2.0)
            .with_decimal("y", Decimal::new(-75, 1))
            .expect("decimal"),
    ];
    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![Series::for_keys(&keys(), "amounts", points)],
        keys(),
        features(&["bar"]),
    );

    let mut chart = Chart::new();
    let report = chart.initialize_chart(&request).expect("render");
    assert_eq!(report.panels[0].scales.y.domain(), (-7.5, 12.5));
}

struct FailingRenderer;

impl FeatureRenderer for FailingRenderer {
    fn draw(
        &self,
        _params: &CreateParams<'_>,
        layer: &mut Layer,
        _config: Option<&serde_json::Value>,
    ) -> ChartResult<DrawOutcome> {
        layer.push(Primitive::Line(LinePrimitive::new(
            0.0,
            0.0,
            1.0,
            1.0,
            1.0,
            multichart::render::Color::rgb(0.0, 0.0, 0.0),
        )));
        Err(ChartError::InvalidData("renderer exploded".to_owned()))
    }
}

#[test]
fn failing_renderer_is_isolated_and_its_layer_cleared() {
    let mut registry = FeatureRegistry::with_defaults();
    registry
        .register(FeatureKind::Line, Box::new(FailingRenderer))
        .expect("register");
    let mut chart = Chart::with_registry(registry);

    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![series("s1", &[(1.0, 2.0), (2.0, 5.0)])],
        keys(),
        features(&["line", "point"]),
    );
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.stats.len(), 1);
    assert_eq!(report.stats[0].feature, FeatureKind::Point);
    let group = chart
        .host()
        .group(&report.panels[0].group)
        .expect("group");
    assert!(group.layer("line-0").expect("line layer").primitives().is_empty());
    assert_eq!(group.layer("point-1").expect("points").marks().len(), 2);
}

#[test]
fn unregistered_kind_is_skipped() {
    let mut chart = Chart::new();
    assert!(chart.unregister_feature(&FeatureKind::Grid));
    assert!(!chart.has_feature(&FeatureKind::Grid));

    let request = ChartRequest::new(ChartConfig::new(400.0, 300.0)).with_panel(
        vec![series("s1", &[(1.0, 2.0)])],
        keys(),
        features(&["grid", "point"]),
    );
    let report = chart.initialize_chart(&request).expect("render");

    assert_eq!(report.stats.len(), 1);
    assert_eq!(report.panels[0].group.key, panel_group_key(0));
}
