use approx::assert_abs_diff_eq;
use chart_geom::api::Capabilities;
use chart_geom::core::{
    AreaStyle, AxisConfig, CoordinateMapper, DataPoint, LineInterpolation, LineSettings,
    PixelPoint, Serie, Viewport, VisibleRange,
};
use chart_geom::interaction::{HoverFade, HoverState};
use chart_geom::labels::LabelStyle;
use chart_geom::render::{DashPattern, Path, PathCommand, RenderFrame, TextureId};
use chart_geom::series::SeriesFrame;
use chart_geom::series::line::{
    build_area_path, build_line_path, build_ribbon_mesh, draw_line, hit_test_line, line_clip_x,
    line_labels, project_line_points, smooth_clip_parameter,
};

const A: PixelPoint = PixelPoint::new(0.0, 80.0);
const B: PixelPoint = PixelPoint::new(100.0, 20.0);

fn value_mapper(width: f64, height: f64) -> CoordinateMapper {
    CoordinateMapper::new(
        &AxisConfig::value(),
        &AxisConfig::value(),
        VisibleRange::new(0.0, 100.0, 0.0, 100.0),
        Viewport::new(width, height),
    )
}

fn frame_state<'a>(
    hover: &'a HoverState,
    fade: &'a HoverFade,
    capabilities: Capabilities,
) -> SeriesFrame<'a> {
    SeriesFrame {
        progress: 1.0,
        capabilities,
        hover,
        fade,
        label_style: LabelStyle::default(),
    }
}

#[test]
fn clip_x_follows_progress_unless_preloading() {
    assert_abs_diff_eq!(line_clip_x(0.5, 200.0, false), 100.0);
    assert_abs_diff_eq!(line_clip_x(1.7, 200.0, false), 200.0);
    assert_abs_diff_eq!(line_clip_x(f64::NAN, 200.0, false), 0.0);
    assert_abs_diff_eq!(line_clip_x(0.1, 200.0, true), 400.0);
}

#[test]
fn straight_segment_is_cut_exactly_at_the_clip() {
    let path = build_line_path(&[A, B], LineInterpolation::Straight, 50.0);

    let max_x = path.max_x().expect("path has points");
    assert!(max_x <= 50.0 + 1e-9);
    let end = path.current_point().expect("path has an end");
    assert_abs_diff_eq!(end.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, 50.0, epsilon = 1e-9);
}

#[test]
fn step_segment_is_cut_on_its_horizontal_leg() {
    let path = build_line_path(&[A, B], LineInterpolation::Step, 50.0);

    assert_eq!(
        path.commands(),
        &[PathCommand::MoveTo(A), PathCommand::LineTo(PixelPoint::new(50.0, 80.0))]
    );
}

#[test]
fn smooth_segment_is_split_where_the_curve_reaches_the_clip() {
    let path = build_line_path(&[A, B], LineInterpolation::Smooth, 50.0);

    let end = path.current_point().expect("path has an end");
    assert_abs_diff_eq!(end.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, 50.0, epsilon = 1e-9);
    assert!(path.max_x().expect("path has points") <= 50.0 + 1e-6);
}

#[test]
fn smooth_clip_parameter_hits_the_endpoints_and_midpoint() {
    assert_abs_diff_eq!(smooth_clip_parameter(0.0), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(smooth_clip_parameter(0.5), 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(smooth_clip_parameter(1.0), 1.0, epsilon = 1e-9);

    // x(t)/dx = 1.5·t·(1−t) + t³ must reproduce s.
    for s in [0.1, 0.25, 0.8, 0.95] {
        let t = smooth_clip_parameter(s);
        assert_abs_diff_eq!(1.5 * t * (1.0 - t) + t * t * t, s, epsilon = 1e-9);
    }
}

#[test]
fn full_progress_keeps_every_vertex() {
    let points = [A, PixelPoint::new(50.0, 10.0), B];
    let path = build_line_path(&points, LineInterpolation::Straight, 100.0);

    assert_eq!(path.len(), 3);
    assert!(build_line_path(&points, LineInterpolation::Straight, -1.0).is_empty());
    assert!(build_line_path(&[], LineInterpolation::Smooth, 100.0).is_empty());
}

#[test]
fn area_closes_down_to_the_baseline() {
    let path = build_area_path(&[A, B], LineInterpolation::Straight, 100.0, 100.0);
    let commands = path.commands();
    let n = commands.len();

    assert_eq!(commands[n - 3], PathCommand::LineTo(PixelPoint::new(100.0, 100.0)));
    assert_eq!(commands[n - 2], PathCommand::LineTo(PixelPoint::new(0.0, 100.0)));
    assert_eq!(commands[n - 1], PathCommand::Close);
    assert!(build_area_path(&[A], LineInterpolation::Straight, 100.0, 100.0).is_empty());
}

#[test]
fn projection_reorders_points_across_the_wrap() {
    let labels: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
    let mapper = CoordinateMapper::new(
        &AxisConfig::category(labels),
        &AxisConfig::value(),
        VisibleRange::new(8.0, 9.0, 0.0, 10.0),
        Viewport::new(200.0, 100.0),
    );
    let serie = Serie::line(
        "wrap",
        [0.0, 5.0, 8.0, 9.0]
            .iter()
            .map(|x| DataPoint::xy(*x, 1.0))
            .collect(),
        LineSettings::default(),
    );

    let points = project_line_points(&serie, &mapper);
    let order: Vec<usize> = points.iter().map(|p| p.point_index).collect();

    assert_eq!(order, vec![2, 3, 0]);
    assert_abs_diff_eq!(points[2].x, 10.0);
    assert!(points.windows(2).all(|w| w[0].pixel.x < w[1].pixel.x));
}

#[test]
fn value_axis_hit_uses_the_range_threshold() {
    let mapper = CoordinateMapper::new(
        &AxisConfig::value(),
        &AxisConfig::value(),
        VisibleRange::new(0.0, 100.0, 0.0, 10.0),
        Viewport::new(200.0, 100.0),
    );
    let serie = Serie::line(
        "v",
        vec![DataPoint::xy(0.0, 1.0), DataPoint::xy(50.0, 2.0), DataPoint::xy(100.0, 3.0)],
        LineSettings::default(),
    );
    let points = project_line_points(&serie, &mapper);

    let hit = hit_test_line(&points, &mapper, PixelPoint::new(102.0, 0.0), 0.05)
        .expect("pointer is within threshold of x=50");
    assert_eq!(hit.point_index, 1);
    assert_eq!(hit.category, None);
    assert!(hit_test_line(&points, &mapper, PixelPoint::new(150.0, 0.0), 0.05).is_none());
}

#[test]
fn category_axis_hit_picks_the_point_on_the_hovered_category() {
    let mapper = CoordinateMapper::new(
        &AxisConfig::category(["A", "B", "C"]),
        &AxisConfig::value(),
        VisibleRange::new(0.0, 2.0, 0.0, 10.0),
        Viewport::new(300.0, 100.0),
    );
    let serie = Serie::line(
        "c",
        (0..3).map(|i| DataPoint::xy(i as f64, 4.0)).collect(),
        LineSettings::default(),
    );
    let points = project_line_points(&serie, &mapper);

    let hit = hit_test_line(&points, &mapper, PixelPoint::new(160.0, 90.0), 0.05)
        .expect("category B is hovered");
    assert_eq!(hit.point_index, 1);
    assert_eq!(hit.category, Some(1));
    assert_abs_diff_eq!(hit.pixel.x, 150.0, epsilon = 1e-9);
}

#[test]
fn dashed_line_strokes_one_multi_segment_path() {
    let serie = Serie::line(
        "d",
        vec![DataPoint::xy(0.0, 50.0), DataPoint::xy(100.0, 50.0)],
        LineSettings::default(),
    );
    let settings = LineSettings {
        dash: Some(DashPattern::dashed(5.0, 5.0).expect("valid dash")),
        ..LineSettings::default()
    };
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let mut frame = RenderFrame::new(Viewport::new(100.0, 100.0));

    draw_line(
        &mut frame,
        0,
        &serie,
        &settings,
        &value_mapper(100.0, 100.0),
        &frame_state(&hover, &fade, Capabilities::default()),
    );

    let strokes: Vec<_> = frame.strokes().collect();
    assert_eq!(strokes.len(), 1);
    let moves = strokes[0]
        .0
        .commands()
        .iter()
        .filter(|c| matches!(c, PathCommand::MoveTo(_)))
        .count();
    assert_eq!(moves, 10);
}

#[test]
fn textured_line_needs_extended_rendering() {
    let serie = Serie::line(
        "t",
        vec![DataPoint::xy(0.0, 20.0), DataPoint::xy(100.0, 80.0)],
        LineSettings::default(),
    );
    let settings = LineSettings {
        texture: Some(TextureId(3)),
        ..LineSettings::default()
    };
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let mapper = value_mapper(100.0, 100.0);

    let mut plain = RenderFrame::new(Viewport::new(100.0, 100.0));
    draw_line(
        &mut plain,
        0,
        &serie,
        &settings,
        &mapper,
        &frame_state(&hover, &fade, Capabilities::default()),
    );
    assert_eq!(plain.strokes().count(), 1);
    assert!(plain.meshes.is_empty());

    let mut extended = RenderFrame::new(Viewport::new(100.0, 100.0));
    draw_line(
        &mut extended,
        0,
        &serie,
        &settings,
        &mapper,
        &frame_state(&hover, &fade, Capabilities::extended()),
    );
    assert_eq!(extended.strokes().count(), 0);
    assert_eq!(extended.meshes.len(), 1);
    assert_eq!(extended.meshes[0].texture, Some(TextureId(3)));
    extended.validate().expect("ribbon indices must be in bounds");
}

#[test]
fn area_fill_and_hover_symbol_are_drawn() {
    let serie = Serie::line(
        "a",
        vec![DataPoint::xy(0.0, 20.0), DataPoint::xy(100.0, 80.0)],
        LineSettings::default(),
    );
    let settings = LineSettings {
        area: Some(AreaStyle::default()),
        ..LineSettings::default()
    };
    let hover = HoverState::default();
    let mut fade = HoverFade::new(10.0);
    fade.advance(1.0, &[(0, 1)]);
    let mut frame = RenderFrame::new(Viewport::new(100.0, 100.0));

    draw_line(
        &mut frame,
        0,
        &serie,
        &settings,
        &value_mapper(100.0, 100.0),
        &frame_state(&hover, &fade, Capabilities::default()),
    );

    assert_eq!(frame.fills().count(), 2, "area plus one hover symbol");
    assert_eq!(frame.strokes().count(), 1);
}

#[test]
fn ribbon_over_a_single_segment_is_one_quad() {
    let path = build_line_path(&[A, B], LineInterpolation::Straight, 100.0);
    let mesh = build_ribbon_mesh(&path, 4.0, 16.0, chart_geom::render::Color::WHITE);

    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.indices.len(), 6);
}

#[test]
fn labels_follow_the_reveal_clip() {
    let serie = Serie::line(
        "l",
        vec![DataPoint::xy(0.0, 20.0), DataPoint::xy(100.0, 80.0).with_name("peak")],
        LineSettings::default(),
    );
    let settings = LineSettings {
        show_labels: true,
        ..LineSettings::default()
    };
    let mapper = value_mapper(100.0, 100.0);

    let half = line_labels(0, &serie, &settings, &mapper, 0.5, LabelStyle::default());
    assert_eq!(half.len(), 1);
    assert_eq!(half[0].key, "line:0:0");

    let full = line_labels(0, &serie, &settings, &mapper, 1.0, LabelStyle::default());
    assert_eq!(full.len(), 2);
    assert_eq!(full[1].key, "line:0:peak");
    assert_eq!(full[1].text, "80");
}

#[test]
fn transposed_reveal_clips_along_the_x_data_axis() {
    let serie = Serie::line(
        "t",
        vec![
            DataPoint::xy(0.0, 50.0),
            DataPoint::xy(50.0, 50.0),
            DataPoint::xy(100.0, 50.0),
        ],
        LineSettings::default(),
    );
    let settings = LineSettings::default();
    let mapper = value_mapper(200.0, 100.0).transposed(true);
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let state = SeriesFrame {
        progress: 0.25,
        ..frame_state(&hover, &fade, Capabilities::default())
    };
    let mut frame = RenderFrame::new(Viewport::new(200.0, 100.0));

    draw_line(&mut frame, 0, &serie, &settings, &mapper, &state);

    let strokes: Vec<_> = frame.strokes().collect();
    assert_eq!(strokes.len(), 1);
    let path = strokes[0].0;
    assert_eq!(path.commands()[0], PathCommand::MoveTo(PixelPoint::new(100.0, 100.0)));
    let end = path.current_point().expect("revealed part");
    assert_abs_diff_eq!(end.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, 75.0, epsilon = 1e-9);
}

#[test]
fn mapped_paths_flatten_arcs() {
    let mut path = Path::new();
    path.move_to(PixelPoint::new(10.0, 0.0));
    path.arc(PixelPoint::new(0.0, 0.0), 10.0, 0.0, std::f64::consts::PI);
    path.close();

    let swapped = path.map_points(|p| PixelPoint::new(p.y, p.x));
    assert!(swapped
        .commands()
        .iter()
        .all(|c| !matches!(c, PathCommand::Arc { .. })));
    assert_eq!(swapped.commands()[0], PathCommand::MoveTo(PixelPoint::new(0.0, 10.0)));
    let end = swapped.current_point().expect("mapped end");
    assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, -10.0, epsilon = 1e-9);
}
