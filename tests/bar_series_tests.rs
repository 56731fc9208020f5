use approx::assert_abs_diff_eq;
use chart_geom::api::Capabilities;
use chart_geom::core::{
    AxisConfig, BarSettings, CoordinateMapper, Corners, DataPoint, PixelPoint, Serie, Viewport,
    VisibleRange,
};
use chart_geom::interaction::{HoverFade, HoverState};
use chart_geom::labels::{LabelAnchor, LabelStyle};
use chart_geom::render::RenderFrame;
use chart_geom::series::SeriesFrame;
use chart_geom::series::bar::{
    BarLayout, BarSerie, bar_labels, build_bar_geometry, category_hover_bars, draw_bars,
    hit_test_bars, stack_bars,
};

fn two_category_mapper(y_min: f64, y_max: f64) -> CoordinateMapper {
    CoordinateMapper::new(
        &AxisConfig::category(["A", "B"]),
        &AxisConfig::value(),
        VisibleRange::new(0.0, 1.0, y_min, y_max),
        Viewport::new(200.0, 100.0),
    )
}

#[test]
fn positive_values_in_one_stack_group_accumulate() {
    let settings = BarSettings::stacked("total");
    let series: Vec<Serie> = [1.0, 2.0, 3.0]
        .iter()
        .map(|v| Serie::bar("s", vec![DataPoint::category(0.0, *v)], settings.clone()))
        .collect();
    let bars: Vec<BarSerie<'_>> = series
        .iter()
        .enumerate()
        .map(|(index, serie)| BarSerie {
            index,
            serie,
            settings: &settings,
        })
        .collect();

    let stacked = stack_bars(&bars, 1.0);
    let tops: Vec<f64> = stacked.iter().map(|bar| bar.top).collect();
    let bases: Vec<f64> = stacked.iter().map(|bar| bar.base).collect();

    assert_eq!(tops, vec![1.0, 3.0, 6.0]);
    assert_eq!(bases, vec![0.0, 1.0, 3.0]);
    assert!(stacked.iter().all(|bar| bar.group_index == 0));
    assert!(stacked[2].is_outer);
    assert!(!stacked[0].is_outer);
}

#[test]
fn negative_values_stack_away_from_the_baseline_separately() {
    let settings = BarSettings::stacked("mixed");
    let series = [
        Serie::bar("a", vec![DataPoint::category(0.0, 4.0)], settings.clone()),
        Serie::bar("b", vec![DataPoint::category(0.0, -2.0)], settings.clone()),
        Serie::bar("c", vec![DataPoint::category(0.0, -1.0)], settings.clone()),
    ];
    let bars: Vec<BarSerie<'_>> = series
        .iter()
        .enumerate()
        .map(|(index, serie)| BarSerie {
            index,
            serie,
            settings: &settings,
        })
        .collect();

    let stacked = stack_bars(&bars, 1.0);

    assert_eq!((stacked[0].base, stacked[0].top), (0.0, 4.0));
    assert_eq!((stacked[1].base, stacked[1].top), (0.0, -2.0));
    assert_eq!((stacked[2].base, stacked[2].top), (-2.0, -3.0));
}

#[test]
fn progress_scales_stacked_values() {
    let settings = BarSettings::default();
    let serie = Serie::bar("a", vec![DataPoint::category(0.0, 8.0)], settings.clone());
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];

    let stacked = stack_bars(&bars, 0.25);
    assert_abs_diff_eq!(stacked[0].top, 2.0);

    let geometry = build_bar_geometry(
        &bars,
        &two_category_mapper(0.0, 10.0),
        &BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, None),
        0.25,
    );
    assert_abs_diff_eq!(geometry[0].value, 8.0);
}

#[test]
fn ungrouped_series_form_side_by_side_groups() {
    let layout = BarLayout::resolve(24.0, 4.0, 2, 2.0, 200.0, None);

    assert_abs_diff_eq!(layout.bar_width, 24.0);
    assert_abs_diff_eq!(layout.total_group_width, 52.0);
    assert_abs_diff_eq!(layout.group_offset(0), -14.0);
    assert_abs_diff_eq!(layout.group_offset(1), 14.0);
}

#[test]
fn crowded_slots_shrink_bars_below_the_configured_width() {
    let layout = BarLayout::resolve(24.0, 0.0, 2, 20.0, 200.0, None);
    assert_abs_diff_eq!(layout.bar_width, 4.0, epsilon = 1e-12);
}

#[test]
fn bars_project_to_rectangles_from_the_baseline() {
    let settings = BarSettings::default();
    let serie = Serie::bar(
        "sales",
        vec![DataPoint::category(0.0, 5.0), DataPoint::category(1.0, -3.0)],
        settings.clone(),
    );
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, mapper.category_window());

    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);

    assert_eq!(geometry.len(), 2);
    let up = &geometry[0];
    assert_abs_diff_eq!(up.rect.x, 38.0, epsilon = 1e-9);
    assert_abs_diff_eq!(up.rect.width, 24.0, epsilon = 1e-9);
    assert_abs_diff_eq!(up.rect.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(up.rect.bottom(), 50.0, epsilon = 1e-9);
    assert_eq!(up.corners, Corners::NONE);

    let down = &geometry[1];
    assert!(!down.is_positive());
    assert_abs_diff_eq!(down.rect.center().x, 150.0, epsilon = 1e-9);
    assert_abs_diff_eq!(down.rect.y, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(down.rect.bottom(), 80.0, epsilon = 1e-9);
}

#[test]
fn only_the_outer_end_of_a_bar_is_rounded() {
    let settings = BarSettings {
        corner_radius: 6.0,
        ..BarSettings::default()
    };
    let serie = Serie::bar(
        "rounded",
        vec![DataPoint::category(0.0, 5.0), DataPoint::category(1.0, -3.0)],
        settings.clone(),
    );
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, mapper.category_window());

    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);

    assert_eq!(geometry[0].corners, Corners::TOP);
    assert_eq!(geometry[1].corners, Corners::BOTTOM);
    assert_abs_diff_eq!(geometry[0].corner_radius, 6.0);
}

#[test]
fn transposed_bars_grow_horizontally() {
    let settings = BarSettings {
        corner_radius: 4.0,
        ..BarSettings::default()
    };
    let serie = Serie::bar("h", vec![DataPoint::category(0.0, 5.0)], settings.clone());
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0).transposed(true);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 100.0, mapper.category_window());

    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);
    let bar = &geometry[0];

    assert_abs_diff_eq!(bar.rect.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bar.rect.right(), 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bar.rect.center().y, 75.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bar.rect.height, 24.0, epsilon = 1e-9);
    assert_eq!(bar.corners, Corners::RIGHT);
}

#[test]
fn hit_testing_and_category_hover() {
    let settings = BarSettings::default();
    let serie = Serie::bar(
        "sales",
        vec![DataPoint::category(0.0, 5.0), DataPoint::category(1.0, -3.0)],
        settings.clone(),
    );
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, mapper.category_window());
    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);

    assert_eq!(hit_test_bars(&geometry, PixelPoint::new(50.0, 25.0)), Some(0));
    assert_eq!(hit_test_bars(&geometry, PixelPoint::new(150.0, 60.0)), Some(1));
    assert_eq!(hit_test_bars(&geometry, PixelPoint::new(100.0, 25.0)), None);
    assert_eq!(category_hover_bars(&geometry, 1, 2), vec![1]);
}

#[test]
fn bars_outside_the_category_window_are_dropped() {
    let settings = BarSettings::default();
    let data = (0..10).map(|i| DataPoint::category(i as f64, 1.0)).collect();
    let serie = Serie::bar("long", data, settings.clone());
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let labels: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
    let mapper = CoordinateMapper::new(
        &AxisConfig::category(labels),
        &AxisConfig::value(),
        VisibleRange::new(2.0, 4.0, 0.0, 1.0),
        Viewport::new(300.0, 100.0),
    );
    let layout = BarLayout::resolve(24.0, 4.0, 1, 3.0, 300.0, mapper.category_window());

    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);
    let indices: Vec<i64> = geometry.iter().map(|bar| bar.category_index).collect();

    assert_eq!(indices, vec![2, 3, 4, 5]);

    let settings_with_labels = BarSettings {
        show_labels: true,
        ..settings.clone()
    };
    let labelled = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings_with_labels,
    }];
    let labels = bar_labels(
        &geometry,
        &labelled,
        mapper.category_window(),
        false,
        LabelStyle::default(),
    );
    assert_eq!(labels.len(), 3, "the preloaded category is not labelled");
}

#[test]
fn value_labels_sit_at_the_outer_end() {
    let settings = BarSettings {
        show_labels: true,
        ..BarSettings::default()
    };
    let serie = Serie::bar(
        "sales",
        vec![DataPoint::category(0.0, 5.0), DataPoint::category(1.0, -3.0).with_id("b")],
        settings.clone(),
    );
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, mapper.category_window());
    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);

    let labels = bar_labels(&geometry, &bars, None, false, LabelStyle::default());

    assert_eq!(labels[0].key, "bar:0:0");
    assert_eq!(labels[0].text, "5");
    assert_eq!(labels[0].anchor_mode, LabelAnchor::Bottom);
    assert_abs_diff_eq!(labels[0].position().y, -4.0, epsilon = 1e-9);
    assert_eq!(labels[1].key, "bar:0:b");
    assert_eq!(labels[1].text, "-3");
    assert_eq!(labels[1].anchor_mode, LabelAnchor::Top);
    assert_abs_diff_eq!(labels[1].position().y, 84.0, epsilon = 1e-9);
}

#[test]
fn drawing_fills_each_bar_and_strokes_borders() {
    let settings = BarSettings {
        border: Some(chart_geom::render::StrokeStyle::new(
            1.0,
            chart_geom::render::Color::BLACK,
        )),
        ..BarSettings::default()
    };
    let serie = Serie::bar(
        "sales",
        vec![DataPoint::category(0.0, 5.0), DataPoint::category(1.0, 0.0)],
        settings.clone(),
    );
    let bars = [BarSerie {
        index: 0,
        serie: &serie,
        settings: &settings,
    }];
    let mapper = two_category_mapper(-5.0, 5.0);
    let layout = BarLayout::resolve(24.0, 4.0, 1, 2.0, 200.0, mapper.category_window());
    let geometry = build_bar_geometry(&bars, &mapper, &layout, 1.0);
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let frame_state = SeriesFrame {
        progress: 1.0,
        capabilities: Capabilities::default(),
        hover: &hover,
        fade: &fade,
        label_style: LabelStyle::default(),
    };
    let mut frame = RenderFrame::new(Viewport::new(200.0, 100.0));

    draw_bars(&mut frame, &geometry, &frame_state);

    assert_eq!(frame.fills().count(), 1, "zero-height bar is skipped");
    assert_eq!(frame.strokes().count(), 1);
    frame.validate().expect("bar geometry must be finite");
}
