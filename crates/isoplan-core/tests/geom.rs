use approx::assert_relative_eq;
use isoplan_core::geom::{
    compose, isometric_matrix, rotation_matrix, scale_matrix, BBox2, Interval, Segment2, Vec2,
};

fn assert_point(p: Vec2, x: f64, y: f64) {
    assert_relative_eq!(p.x, x, epsilon = 1e-9);
    assert_relative_eq!(p.y, y, epsilon = 1e-9);
}

#[test]
fn rotation_turns_counter_clockwise_in_math_axes() {
    let p = Vec2::new(1.0, 0.0).transform(&rotation_matrix(90.0));
    assert_point(p, 0.0, 1.0);
}

#[test]
fn isometric_tilt_is_clamped() {
    assert_eq!(isometric_matrix(120.0), isometric_matrix(90.0));
    assert_eq!(isometric_matrix(-5.0), isometric_matrix(0.0));

    let flat = isometric_matrix(0.0);
    assert_point(Vec2::new(1.0, 0.0).transform(&flat), 1.0, 0.0);
    assert_point(Vec2::new(0.0, 1.0).transform(&flat), -1.0, 0.0);
}

#[test]
fn compose_applies_right_matrix_first() {
    let m = compose(&rotation_matrix(90.0), &scale_matrix(2.0));
    assert_point(Vec2::new(1.0, 0.0).transform(&m), 0.0, 2.0);

    let shear_after_rotation = compose(&isometric_matrix(45.0), &rotation_matrix(90.0));
    let expected = Vec2::new(1.0, 0.0)
        .transform(&rotation_matrix(90.0))
        .transform(&isometric_matrix(45.0));
    let got = Vec2::new(1.0, 0.0).transform(&shear_after_rotation);
    assert_point(got, expected.x, expected.y);
}

#[test]
fn segments_intersect_only_within_both_spans() {
    let wall = Segment2::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));

    let crossing = Segment2::new(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));
    assert_point(wall.intersect(&crossing).expect("crossing"), 5.0, 0.0);

    let short = Segment2::new(Vec2::new(5.0, 1.0), Vec2::new(5.0, 5.0));
    assert!(wall.intersect(&short).is_none());

    let beyond = Segment2::new(Vec2::new(12.0, -1.0), Vec2::new(12.0, 1.0));
    assert!(wall.intersect(&beyond).is_none());
}

#[test]
fn parallel_segments_never_intersect() {
    let a = Segment2::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let above = Segment2::new(Vec2::new(0.0, 1.0), Vec2::new(10.0, 1.0));
    let collinear = Segment2::new(Vec2::new(2.0, 0.0), Vec2::new(8.0, 0.0));
    assert!(a.intersect(&above).is_none());
    assert!(a.intersect(&collinear).is_none());
}

#[test]
fn interval_overlap_and_midpoint() {
    let a = Interval::new(10.0, 0.0);
    assert_eq!(a, Interval { lo: 0.0, hi: 10.0 });

    let o = a.overlap(&Interval::new(4.0, 20.0)).expect("overlap");
    assert_relative_eq!(o.width(), 6.0);
    assert_relative_eq!(o.midpoint(), 7.0);

    let touching = a.overlap(&Interval::new(10.0, 12.0)).expect("touching");
    assert_relative_eq!(touching.width(), 0.0);

    assert!(a.overlap(&Interval::new(11.0, 12.0)).is_none());
}

#[test]
fn bbox_union_skips_empty_boxes() {
    let pts = [Vec2::new(-2.0, 1.0), Vec2::new(4.0, 5.0)];
    let bbox = BBox2::from_points(&pts);
    assert!(!bbox.is_empty());
    assert_point(bbox.center(), 1.0, 3.0);
    assert_relative_eq!(bbox.width(), 6.0);
    assert_relative_eq!(bbox.height(), 4.0);

    assert!(BBox2::empty().is_empty());
    assert_eq!(BBox2::empty().union(&bbox), bbox);
    assert_eq!(bbox.union(&BBox2::empty()), bbox);
}
