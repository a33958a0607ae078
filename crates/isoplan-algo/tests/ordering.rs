use isoplan_algo::{Error, RenderOrder, SurfaceId, SurfaceSet};
use isoplan_core::geom::{rotation_matrix, Vec2};

fn wall(set: &mut SurfaceSet, a: (f64, f64), b: (f64, f64)) -> SurfaceId {
    set.add("wall", Vec2::new(a.0, a.1), Vec2::new(b.0, b.1))
}

#[test]
fn disjoint_y_ranges_use_the_fast_path() {
    let mut set = SurfaceSet::new();
    let far = wall(&mut set, (0.0, 0.0), (10.0, 10.0));
    let near = wall(&mut set, (100.0, 20.0), (110.0, 30.0));

    assert_eq!(set.is_rendered_before(far, near).expect("known surfaces"), RenderOrder::Before);
    assert_eq!(set.is_rendered_before(near, far).expect("known surfaces"), RenderOrder::After);
    assert!(set.cache().is_empty());
    assert_eq!(set.stats().fast_rejections, 2);
    assert_eq!(set.stats().evaluations, 0);
}

#[test]
fn disabled_shortcut_falls_back_to_x_overlap() {
    let mut set = SurfaceSet::new().with_y_range_shortcut(false);
    let a = wall(&mut set, (0.0, 0.0), (10.0, 10.0));
    let b = wall(&mut set, (100.0, 20.0), (110.0, 30.0));

    assert_eq!(set.is_rendered_before(a, b).expect("known surfaces"), RenderOrder::Undetermined);
    assert_eq!(set.cache().len(), 1);
}

#[test]
fn lower_edge_on_screen_paints_later() {
    let mut set = SurfaceSet::new();
    let rising = wall(&mut set, (0.0, 0.0), (10.0, 4.0));
    let falling = wall(&mut set, (2.0, 3.0), (12.0, 1.0));

    // Overlap [2, 10], sampled at x = 6: rising y = 2.4, falling y = 2.2.
    assert_eq!(set.is_rendered_before(rising, falling).expect("known surfaces"), RenderOrder::After);
    assert_eq!(set.is_rendered_before(falling, rising).expect("known surfaces"), RenderOrder::Before);
    assert_eq!(set.stats().evaluations, 1);
    assert_eq!(set.stats().cache_hits, 1);
}

#[test]
fn relation_is_antisymmetric() {
    let mut set = SurfaceSet::new();
    let ids = [
        wall(&mut set, (0.0, 0.0), (10.0, 5.0)),
        wall(&mut set, (0.0, 0.0), (10.0, -5.0)),
        wall(&mut set, (0.0, 6.0), (10.0, 1.0)),
        wall(&mut set, (3.0, 2.0), (3.0, 8.0)),
        wall(&mut set, (20.0, 1.0), (30.0, 2.0)),
    ];
    for &a in &ids {
        for &b in &ids {
            if a == b {
                continue;
            }
            let ab = set.is_rendered_before(a, b).expect("known surfaces");
            let ba = set.is_rendered_before(b, a).expect("known surfaces");
            assert_eq!(ab, ba.inverse(), "{a} vs {b}");
        }
    }
}

#[test]
fn vertical_segments_are_undetermined() {
    let mut set = SurfaceSet::new();
    let vertical = wall(&mut set, (0.0, 0.0), (0.05, 10.0));
    let across = wall(&mut set, (-5.0, 5.0), (5.0, 5.0));

    assert!(set.get(vertical).expect("surface").slope().is_none());
    assert_eq!(set.get(vertical).expect("surface").low_y(), 0.0);
    assert_eq!(set.get(vertical).expect("surface").high_y(), 10.0);
    assert_eq!(set.is_rendered_before(vertical, across).expect("known surfaces"), RenderOrder::Undetermined);
    assert_eq!(set.is_rendered_before(across, vertical).expect("known surfaces"), RenderOrder::Undetermined);
}

#[test]
fn x_disjoint_and_touching_corners_are_undetermined() {
    let mut set = SurfaceSet::new();
    let a = wall(&mut set, (0.0, 0.0), (5.0, 5.0));
    let apart = wall(&mut set, (10.0, 2.0), (20.0, 3.0));
    let left = wall(&mut set, (0.0, 10.0), (10.0, 15.0));
    let right = wall(&mut set, (10.0, 15.0), (20.0, 10.0));

    assert_eq!(set.is_rendered_before(a, apart).expect("known surfaces"), RenderOrder::Undetermined);
    assert_eq!(set.is_rendered_before(left, right).expect("known surfaces"), RenderOrder::Undetermined);
}

#[test]
fn equal_samples_resolve_to_before() {
    let mut set = SurfaceSet::new();
    let a = wall(&mut set, (0.0, 0.0), (10.0, 0.0));
    let b = wall(&mut set, (2.0, 0.0), (8.0, 0.0));

    assert_eq!(set.is_rendered_before(a, b).expect("known surfaces"), RenderOrder::Before);
    // Served from the cache, inverted.
    assert_eq!(set.is_rendered_before(b, a).expect("known surfaces"), RenderOrder::After);
    assert_eq!(set.stats().cache_hits, 1);
}

#[test]
fn reset_restores_points_and_evicts_relations() {
    let mut set = SurfaceSet::new();
    let a = wall(&mut set, (0.0, 0.0), (10.0, 1.0));
    let b = wall(&mut set, (0.0, 0.5), (10.0, 0.5));
    let c = wall(&mut set, (5.0, 0.2), (15.0, 0.8));

    set.transform_all(&rotation_matrix(30.0));
    set.is_rendered_before(a, b).expect("known surfaces");
    set.is_rendered_before(b, c).expect("known surfaces");
    assert_eq!(set.cache().len(), 2);

    set.reset(a).expect("reset");
    let surface = set.get(a).expect("surface");
    assert_eq!(surface.point1, surface.initial().a);
    assert_eq!(surface.point2, surface.initial().b);
    assert_eq!(set.cache().len(), 1);
    assert!(set.cache().get(b, c).is_some());

    set.reset(a).expect("reset is idempotent");
    assert_eq!(set.get(a).expect("surface").point1, Vec2::new(0.0, 0.0));

    assert_eq!(
        set.reset(SurfaceId(42)),
        Err(Error::UnknownSurface(SurfaceId(42)))
    );
}

#[test]
fn reset_all_clears_cache_and_transform_flips_relation() {
    let mut set = SurfaceSet::new().with_y_range_shortcut(false);
    let a = wall(&mut set, (0.0, 0.0), (10.0, 0.0));
    let b = wall(&mut set, (0.0, 5.0), (10.0, 5.0));
    assert_eq!(set.is_rendered_before(a, b).expect("known surfaces"), RenderOrder::Before);

    set.reset_all();
    assert!(set.cache().is_empty());
    set.transform_all(&rotation_matrix(180.0));
    assert_eq!(set.is_rendered_before(a, b).expect("known surfaces"), RenderOrder::After);
}

#[test]
fn reset_then_transform_is_repeatable() {
    let mut set = SurfaceSet::new();
    let a = wall(&mut set, (0.0, 0.0), (10.0, 3.0));
    let b = wall(&mut set, (4.0, 1.0), (14.0, 2.0));
    let m = rotation_matrix(-37.5);

    set.transform_all(&m);
    let first_order = set.is_rendered_before(a, b).expect("known surfaces");
    let first_points = (set.get(a).expect("a").point1, set.get(b).expect("b").point2);
    let first_cache = set.cache().clone();

    set.reset_all();
    set.transform_all(&m);
    let second_order = set.is_rendered_before(a, b).expect("known surfaces");

    assert_eq!(first_order, second_order);
    assert_eq!(
        first_points,
        (set.get(a).expect("a").point1, set.get(b).expect("b").point2)
    );
    assert_eq!(&first_cache, set.cache());
}

#[test]
fn foreign_ids_are_an_error() {
    let mut set = SurfaceSet::new();
    let a = wall(&mut set, (0.0, 0.0), (10.0, 0.0));

    assert_eq!(
        set.is_rendered_before(a, SurfaceId(5)),
        Err(Error::UnknownSurface(SurfaceId(5)))
    );
    assert_eq!(
        set.is_rendered_before(SurfaceId(9), a),
        Err(Error::UnknownSurface(SurfaceId(9)))
    );
    assert!(set.cache().is_empty());
}
