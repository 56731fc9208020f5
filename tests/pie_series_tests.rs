use approx::assert_abs_diff_eq;
use chart_geom::api::Capabilities;
use chart_geom::core::polar::{math_direction, polar_point};
use chart_geom::core::{
    DataPoint, ExplodeMode, PieLabelPlacement, PieSettings, PixelPoint, Serie, SliceGapMode,
    Viewport,
};
use chart_geom::interaction::{HoverFade, HoverState};
use chart_geom::labels::{LabelAnchor, LabelStyle};
use chart_geom::render::{RenderFrame, TextureId};
use chart_geom::series::SeriesFrame;
use chart_geom::series::pie::{
    PieLayout, build_pie_slices, draw_pie, hit_test_pie, pie_labels, slice_outline, slice_shape,
};
use chart_geom::series::pie_fillet::{clamp_fillet_radius, rounded_wedge};

fn pie(values: &[f64]) -> Serie {
    Serie::pie(
        "share",
        values.iter().map(|v| DataPoint::from_value(*v)).collect(),
        PieSettings::default(),
    )
}

fn quarter_settings() -> PieSettings {
    PieSettings {
        start_angle_deg: -90.0,
        ..PieSettings::default()
    }
}

fn square() -> Viewport {
    Viewport::new(200.0, 200.0)
}

#[test]
fn clockwise_slices_sweep_negative_and_fill_the_range() {
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &quarter_settings());

    let sweeps: Vec<f64> = slices.iter().map(|s| s.sweep).collect();
    assert_eq!(sweeps, vec![-90.0, -90.0, -180.0]);
    let starts: Vec<f64> = slices.iter().map(|s| s.start_angle).collect();
    assert_eq!(starts, vec![-90.0, -180.0, -270.0]);
    assert_abs_diff_eq!(slices.iter().map(|s| s.sweep.abs()).sum::<f64>(), 360.0);
    assert_abs_diff_eq!(slices[2].percent, 50.0);
}

#[test]
fn counter_clockwise_partial_range() {
    let settings = PieSettings {
        clockwise: false,
        start_angle_deg: 180.0,
        angle_range_deg: 180.0,
        ..PieSettings::default()
    };
    let slices = build_pie_slices(&pie(&[1.0, 3.0]), &settings);

    assert_abs_diff_eq!(slices[0].sweep, 45.0);
    assert_abs_diff_eq!(slices[1].start_angle, 225.0);
    assert_abs_diff_eq!(slices[1].end_angle(), 360.0);
}

#[test]
fn non_positive_and_non_finite_values_are_skipped() {
    let slices = build_pie_slices(&pie(&[0.0, -2.0, f64::NAN, 4.0]), &PieSettings::default());

    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].point_index, Some(3));
    assert!(build_pie_slices(&pie(&[0.0]), &PieSettings::default()).is_empty());
}

#[test]
fn top_n_merges_the_tail_into_others() {
    let settings = PieSettings {
        top_n: Some(2),
        ..PieSettings::default()
    };
    let slices = build_pie_slices(&pie(&[1.0, 5.0, 3.0, 4.0, 2.0]), &settings);

    assert_eq!(slices.len(), 3);
    assert_abs_diff_eq!(slices[0].value, 5.0);
    assert_abs_diff_eq!(slices[1].value, 4.0);
    assert!(slices[2].is_others);
    assert_abs_diff_eq!(slices[2].value, 6.0);
    assert_eq!(slices[2].name.as_deref(), Some("Others"));
    assert_eq!(slices[2].point_index, None);
}

#[test]
fn hidden_ids_remove_points_and_the_others_slice() {
    let hide_others = PieSettings {
        top_n: Some(2),
        hidden_ids: vec!["others".to_owned()],
        ..PieSettings::default()
    };
    assert_eq!(
        build_pie_slices(&pie(&[5.0, 4.0, 3.0, 2.0, 1.0]), &hide_others).len(),
        2
    );

    let serie = Serie::pie(
        "named",
        vec![
            DataPoint::from_value(5.0).with_id("a"),
            DataPoint::from_value(4.0).with_id("b"),
        ],
        PieSettings::default(),
    );
    let hide_a = PieSettings {
        hidden_ids: vec!["a".to_owned()],
        ..PieSettings::default()
    };
    let slices = build_pie_slices(&serie, &hide_a);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].id, "b");
    assert_abs_diff_eq!(slices[0].sweep.abs(), 360.0);
}

#[test]
fn layout_derives_radii_from_the_short_side() {
    let layout = PieLayout::resolve(Viewport::new(300.0, 200.0), &PieSettings::default())
        .expect("valid viewport");
    assert_eq!(layout.center, PixelPoint::new(150.0, 100.0));
    assert_abs_diff_eq!(layout.outer_radius, 80.0);
    assert_abs_diff_eq!(layout.inner_radius, 0.0);

    let pull = PieSettings {
        explode_mode: ExplodeMode::Pull,
        ..PieSettings::default()
    };
    let reserved = PieLayout::resolve(square(), &pull).expect("valid viewport");
    assert_abs_diff_eq!(reserved.outer_radius, 70.0);

    assert!(PieLayout::resolve(Viewport::new(0.0, 100.0), &PieSettings::default()).is_none());
}

#[test]
fn pointer_east_at_mid_radius_hits_the_half_slice() {
    let settings = quarter_settings();
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    assert_eq!(
        hit_test_pie(&slices, &layout, &settings, PixelPoint::new(140.0, 100.0)),
        Some(2)
    );
    assert_eq!(
        hit_test_pie(&slices, &layout, &settings, PixelPoint::new(181.0, 100.0)),
        None
    );
}

#[test]
fn every_slice_contains_its_mid_angle() {
    let settings = quarter_settings();
    let slices = build_pie_slices(&pie(&[3.0, 1.0, 2.0, 5.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    for slice in &slices {
        let mid_point = polar_point(layout.center, math_direction(slice.mid_angle()), 40.0);
        assert_eq!(hit_test_pie(&slices, &layout, &settings, mid_point), Some(slice.index));
    }
}

#[test]
fn donut_hole_is_not_hit() {
    let settings = PieSettings {
        inner_radius_ratio: 0.5,
        ..PieSettings::default()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    assert_abs_diff_eq!(layout.inner_radius, 50.0);
    assert_eq!(hit_test_pie(&slices, &layout, &settings, layout.center), None);
    assert_eq!(
        hit_test_pie(&slices, &layout, &settings, PixelPoint::new(130.0, 100.0)),
        None
    );
    assert_eq!(
        hit_test_pie(&slices, &layout, &settings, PixelPoint::new(165.0, 100.0)),
        Some(0)
    );
}

#[test]
fn radial_gap_shrinks_the_sweep_by_the_arc_angle() {
    let settings = PieSettings {
        gap_mode: SliceGapMode::Radial,
        gap_px: 10.0,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[0], &layout, &settings, false).expect("slice survives gap");

    let gap_deg = (10.0_f64 / 80.0).to_degrees();
    assert_abs_diff_eq!(shape.sweep, -(90.0 - gap_deg), epsilon = 1e-9);
    assert_abs_diff_eq!(shape.start_angle, -90.0 - gap_deg * 0.5, epsilon = 1e-9);

    let huge_gap = PieSettings {
        gap_px: 500.0,
        ..settings
    };
    assert!(slice_shape(&slices[0], &layout, &huge_gap, false).is_none());
}

#[test]
fn translate_gap_moves_the_slice_without_resizing() {
    let settings = PieSettings {
        gap_mode: SliceGapMode::Translate,
        gap_px: 8.0,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[2], &layout, &settings, false).expect("slice exists");

    assert_abs_diff_eq!(shape.outer_radius, layout.outer_radius);
    assert_abs_diff_eq!(shape.center.distance(layout.center), 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(layout.outer_radius, 76.0);
}

#[test]
fn uniform_gap_keeps_parallel_edges_and_the_outer_circle() {
    let settings = PieSettings {
        gap_mode: SliceGapMode::Uniform,
        gap_px: 8.0,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    for slice in &slices {
        let shape = slice_shape(slice, &layout, &settings, false).expect("slice survives gap");
        let shift = shape.center.distance(layout.center);
        let half = (slice.sweep.abs() * 0.5).min(90.0).to_radians();

        assert_abs_diff_eq!(shift, 4.0 / half.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(shape.outer_radius + shift, layout.outer_radius, epsilon = 1e-9);

        // Each moved edge sits half the gap away from the shared boundary ray.
        for boundary in [slice.start_angle, slice.start_angle + slice.sweep] {
            let dir = math_direction(boundary);
            let dx = shape.center.x - layout.center.x;
            let dy = shape.center.y - layout.center.y;
            assert_abs_diff_eq!((dx * dir.y - dy * dir.x).abs(), 4.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn pull_explode_extends_only_the_outer_radius() {
    let settings = PieSettings {
        explode_mode: ExplodeMode::Pull,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    let exploded = slice_shape(&slices[0], &layout, &settings, true).expect("slice exists");
    assert_abs_diff_eq!(exploded.outer_radius, 80.0);
    assert_eq!(exploded.center, layout.center);
}

#[test]
fn oversized_fillet_falls_back_to_a_sharp_wedge() {
    let settings = PieSettings {
        corner_radius: 1000.0,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[0], &layout, &settings, false).expect("slice exists");

    assert_abs_diff_eq!(clamp_fillet_radius(0.0, 80.0, 1000.0), 40.0);
    assert!(rounded_wedge(&shape, 1000.0).is_none());

    let outline = slice_outline(&shape, 1000.0, true);
    assert!(!outline.rounded);
    assert!(outline.rings[0].len() >= 4);
    assert!(outline.rings[0].iter().all(|p| p.is_finite()));
}

#[test]
fn fitting_fillet_stays_inside_the_outer_arc() {
    let settings = quarter_settings();
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[0], &layout, &settings, false).expect("slice exists");

    let outline = slice_outline(&shape, 8.0, true);
    assert!(outline.rounded);
    for point in &outline.rings[0] {
        assert!(point.is_finite());
        assert!(point.distance(layout.center) <= 80.0 + 1e-6);
    }
    assert_eq!(outline.rings[0][0], layout.center, "pie wedges keep a sharp apex");
}

#[test]
fn donut_fillet_rounds_inner_corners_too() {
    let settings = PieSettings {
        inner_radius_ratio: 0.4,
        ..quarter_settings()
    };
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[2], &layout, &settings, false).expect("slice exists");

    let points = rounded_wedge(&shape, 6.0).expect("fillet fits a 180 degree annulus");
    for point in &points {
        let distance = point.distance(layout.center);
        assert!(distance >= 40.0 - 1e-6 && distance <= 80.0 + 1e-6);
    }
}

#[test]
fn full_sweep_draws_disk_or_annulus() {
    let settings = PieSettings::default();
    let slices = build_pie_slices(&pie(&[3.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");
    let shape = slice_shape(&slices[0], &layout, &settings, false).expect("slice exists");

    assert!(shape.full_ring);
    assert_eq!(slice_outline(&shape, 5.0, true).rings.len(), 1);

    let donut = PieSettings {
        inner_radius_ratio: 0.3,
        ..PieSettings::default()
    };
    let layout = PieLayout::resolve(square(), &donut).expect("valid viewport");
    let shape = slice_shape(&slices[0], &layout, &donut, false).expect("slice exists");
    assert_eq!(slice_outline(&shape, 0.0, false).rings.len(), 2);
}

#[test]
fn outside_labels_carry_three_point_leaders() {
    let settings = quarter_settings();
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    let labels = pie_labels(&slices, &layout, &settings, None, LabelStyle::default());

    assert_eq!(labels.len(), 3);
    assert_eq!(labels[0].key, "pie:0:1");
    assert_eq!(labels[0].text, "25%");
    assert_eq!(labels[2].text, "50%");
    assert!(!labels[0].clip_to_plot);
    let leader = labels[0].leader.as_ref().expect("outside labels have leaders");
    assert_eq!(leader.points.len(), 3);
    // Slice 0 spans south-west, so its label runs left.
    assert_eq!(labels[0].anchor_mode, LabelAnchor::Right);
}

#[test]
fn center_labels_sit_at_mid_radius() {
    let mut settings = quarter_settings();
    settings.label.placement = PieLabelPlacement::Center;
    let slices = build_pie_slices(&pie(&[1.0, 1.0, 2.0]), &settings);
    let layout = PieLayout::resolve(square(), &settings).expect("valid viewport");

    let labels = pie_labels(&slices, &layout, &settings, None, LabelStyle::default());
    assert_abs_diff_eq!(labels[2].anchor.x, 140.0, epsilon = 1e-9);
    assert_abs_diff_eq!(labels[2].anchor.y, 100.0, epsilon = 1e-9);
    assert!(labels.iter().all(|label| label.leader.is_none()));
}

#[test]
fn drawing_fills_slices_and_strokes_leaders() {
    let settings = quarter_settings();
    let serie = pie(&[1.0, 1.0, 2.0]);
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let state = SeriesFrame {
        progress: 1.0,
        capabilities: Capabilities::default(),
        hover: &hover,
        fade: &fade,
        label_style: LabelStyle::default(),
    };
    let mut frame = RenderFrame::new(square());

    draw_pie(&mut frame, 0, &serie, &settings, square(), &state);

    assert_eq!(frame.fills().count(), 3);
    assert_eq!(frame.strokes().count(), 3);
    frame.validate().expect("pie geometry must be finite");
}

#[test]
fn textured_pie_uploads_fans_when_extended() {
    let settings = PieSettings {
        texture: Some(TextureId(7)),
        ..quarter_settings()
    };
    let mut hidden_labels = settings.clone();
    hidden_labels.label.placement = PieLabelPlacement::Hidden;
    let serie = pie(&[1.0, 1.0, 2.0]);
    let hover = HoverState::default();
    let fade = HoverFade::default();
    let state = SeriesFrame {
        progress: 1.0,
        capabilities: Capabilities::extended(),
        hover: &hover,
        fade: &fade,
        label_style: LabelStyle::default(),
    };
    let mut frame = RenderFrame::new(square());

    draw_pie(&mut frame, 0, &serie, &hidden_labels, square(), &state);

    assert_eq!(frame.meshes.len(), 3);
    assert_eq!(frame.fills().count(), 0);
    frame.validate().expect("fan indices must be in bounds");
}
