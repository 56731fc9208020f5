use approx::assert_abs_diff_eq;
use chart_geom::core::{
    AxisConfig, AxisPosition, AxisRole, CoordinateMapper, LabelPlacement, PixelPoint, Viewport,
    VisibleRange,
};

fn value_mapper(range: VisibleRange, viewport: Viewport) -> CoordinateMapper {
    CoordinateMapper::new(&AxisConfig::value(), &AxisConfig::value(), range, viewport)
}

#[test]
fn value_axes_map_corners_with_vertical_inversion() {
    let mapper = value_mapper(
        VisibleRange::new(0.0, 100.0, 0.0, 50.0),
        Viewport::new(200.0, 100.0),
    );

    assert_eq!(mapper.to_pixel(0.0, 0.0), PixelPoint::new(0.0, 100.0));
    assert_eq!(mapper.to_pixel(100.0, 50.0), PixelPoint::new(200.0, 0.0));
    let mid = mapper.to_pixel(50.0, 25.0);
    assert_abs_diff_eq!(mid.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mid.y, 50.0, epsilon = 1e-9);
}

#[test]
fn top_positioned_horizontal_axis_disables_inversion() {
    let x_axis = AxisConfig::value().with_position(AxisPosition::Top);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 100.0, 0.0, 50.0),
        Viewport::new(200.0, 100.0),
    );

    assert_abs_diff_eq!(mapper.to_pixel(0.0, 0.0).y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.to_pixel(0.0, 50.0).y, 100.0, epsilon = 1e-9);
}

#[test]
fn degenerate_viewport_collapses_to_bottom_left() {
    let range = VisibleRange::new(0.0, 10.0, 0.0, 10.0);

    let zero_width = value_mapper(range, Viewport::new(0.0, 100.0));
    assert_eq!(zero_width.to_pixel(5.0, 5.0), PixelPoint::new(0.0, 100.0));

    let negative = value_mapper(range, Viewport::new(-5.0, -3.0));
    assert_eq!(negative.to_pixel(5.0, 5.0), PixelPoint::new(0.0, 0.0));

    let nan = value_mapper(range, Viewport::new(f64::NAN, 80.0));
    assert!(nan.to_pixel(5.0, 5.0).is_finite());
}

#[test]
fn equal_min_max_range_yields_finite_safe_point() {
    let mapper = value_mapper(
        VisibleRange::new(5.0, 5.0, 3.0, 3.0),
        Viewport::new(200.0, 100.0),
    );
    let point = mapper.to_pixel(5.0, 3.0);

    assert!(point.is_finite());
    assert_eq!(point, PixelPoint::new(0.0, 100.0));
}

#[test]
fn transposed_mapper_swaps_axis_roles() {
    let x_axis = AxisConfig::category(["A", "B"]);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 1.0, 0.0, 10.0),
        Viewport::new(200.0, 100.0),
    )
    .transposed(true);

    assert!(mapper.is_transposed());
    assert_abs_diff_eq!(mapper.x_length(), 100.0);
    assert_abs_diff_eq!(mapper.y_length(), 200.0);

    let point = mapper.to_pixel(0.0, 5.0);
    assert_abs_diff_eq!(point.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(point.y, 75.0, epsilon = 1e-9);
}

#[test]
fn cell_center_category_axis_places_points_mid_slot() {
    let x_axis = AxisConfig::category(["A", "B", "C", "D"]);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 3.0, 0.0, 1.0),
        Viewport::new(200.0, 100.0),
    );

    assert_abs_diff_eq!(mapper.to_pixel(0.0, 0.0).x, 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.to_pixel(3.0, 0.0).x, 175.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.axis_ratio(AxisRole::X, 1.0), 0.375, epsilon = 1e-12);
}

#[test]
fn pixel_to_category_floors_cells_and_clamps_to_range() {
    let x_axis = AxisConfig::category(["A", "B", "C", "D"]);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 3.0, 0.0, 1.0),
        Viewport::new(200.0, 100.0),
    );

    assert_eq!(mapper.pixel_to_category(PixelPoint::new(10.0, 50.0)), Some(0));
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(120.0, 50.0)), Some(2));
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(200.0, 50.0)), Some(3));
}

#[test]
fn pixel_to_category_on_tick_axis_rounds_to_nearest_tick() {
    let x_axis = AxisConfig::category(["A", "B", "C"]).with_placement(LabelPlacement::Tick);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 2.0, 0.0, 1.0),
        Viewport::new(200.0, 100.0),
    );

    assert_eq!(mapper.pixel_to_category(PixelPoint::new(40.0, 0.0)), Some(0));
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(60.0, 0.0)), Some(1));
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(190.0, 0.0)), Some(2));
}

#[test]
fn pixel_to_category_is_none_on_value_axis() {
    let mapper = value_mapper(
        VisibleRange::new(0.0, 10.0, 0.0, 10.0),
        Viewport::new(100.0, 100.0),
    );
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(50.0, 50.0)), None);
}

#[test]
fn pixel_to_value_x_inverts_value_mapping() {
    let mapper = value_mapper(
        VisibleRange::new(0.0, 100.0, 0.0, 1.0),
        Viewport::new(200.0, 100.0),
    );
    assert_abs_diff_eq!(
        mapper.pixel_to_value_x(PixelPoint::new(50.0, 10.0)),
        25.0,
        epsilon = 1e-9
    );
}

#[test]
fn edge_padding_shrinks_category_axis_only() {
    let x_axis = AxisConfig::category(["A", "B", "C"]).with_placement(LabelPlacement::Tick);
    let mapper = CoordinateMapper::new(
        &x_axis,
        &AxisConfig::value(),
        VisibleRange::new(0.0, 2.0, 0.0, 10.0),
        Viewport::new(200.0, 100.0),
    )
    .with_edge_padding(20.0);

    assert_abs_diff_eq!(mapper.to_pixel(0.0, 0.0).x, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.to_pixel(2.0, 0.0).x, 180.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.to_pixel(0.0, 10.0).y, 0.0, epsilon = 1e-9);
    assert_eq!(mapper.pixel_to_category(PixelPoint::new(21.0, 0.0)), Some(0));
}

#[test]
fn reveal_frame_runs_along_the_x_data_axis() {
    let plain = CoordinateMapper::new(
        &AxisConfig::value(),
        &AxisConfig::value(),
        VisibleRange::new(0.0, 10.0, 0.0, 10.0),
        Viewport::new(200.0, 100.0),
    );
    let point = PixelPoint::new(30.0, 40.0);
    assert_eq!(plain.to_reveal_frame(point), point);

    let transposed = plain.transposed(true);
    let low = transposed.to_pixel(2.0, 5.0);
    let high = transposed.to_pixel(8.0, 5.0);
    let (low_r, high_r) = (transposed.to_reveal_frame(low), transposed.to_reveal_frame(high));
    assert_abs_diff_eq!(low_r.x, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(high_r.x, 80.0, epsilon = 1e-9);
    assert_abs_diff_eq!(low_r.y, low.x, epsilon = 1e-9);

    let back = transposed.from_reveal_frame(high_r);
    assert_abs_diff_eq!(back.x, high.x, epsilon = 1e-9);
    assert_abs_diff_eq!(back.y, high.y, epsilon = 1e-9);
}
