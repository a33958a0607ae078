use isoplan_algo::error::Error;
use isoplan_algo::feature::{Door, DoorOpening, Feature, JambCorners, WallHeights};
use isoplan_algo::walls::{DoorLinks, Walls};
use isoplan_algo::{SurfaceId, SurfaceSet};
use isoplan_core::geom::{Segment2, Vec2};

const HEIGHTS: WallHeights = WallHeights {
    wall: 100.0,
    door_header: 10.0,
};

fn pts(coords: &[(f64, f64)]) -> Vec<Vec2> {
    coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

fn opening(r1: f64, r2: f64) -> DoorOpening {
    DoorOpening::new(r1, r2).expect("valid opening")
}

fn marker(coords: &[(f64, f64)]) -> Vec<Segment2> {
    pts(coords)
        .windows(2)
        .map(|w| Segment2::new(w[0], w[1]))
        .collect()
}

#[test]
fn single_opening_is_cut_from_the_bottom_edge() {
    let door = Door::new(vec![opening(0.3, 0.6)]);
    let (shapes, corners) = door.render(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), HEIGHTS, None);

    assert_eq!(
        shapes.outline,
        pts(&[
            (0.0, 0.0),
            (0.0, 100.0),
            (3.0, 100.0),
            (3.0, 10.0),
            (6.0, 10.0),
            (6.0, 100.0),
            (10.0, 100.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ])
    );
    assert!(shapes.jambs.is_empty());
    assert_eq!(shapes.shape_count(), 1);
    assert_eq!(
        corners,
        Some(JambCorners {
            d1: Vec2::new(3.0, 0.0),
            d2: Vec2::new(6.0, 0.0),
        })
    );
}

#[test]
fn openings_are_walked_from_point1() {
    let mut door = Door::new(vec![opening(0.6, 0.8)]);
    door.add_opening(opening(0.1, 0.3));
    let (shapes, corners) = door.render(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), HEIGHTS, None);

    assert_eq!(
        shapes.outline,
        pts(&[
            (0.0, 0.0),
            (0.0, 100.0),
            (1.0, 100.0),
            (1.0, 10.0),
            (3.0, 10.0),
            (3.0, 100.0),
            (6.0, 100.0),
            (6.0, 10.0),
            (8.0, 10.0),
            (8.0, 100.0),
            (10.0, 100.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ])
    );
    // Jamb corners always come from the first opening added.
    assert_eq!(corners.map(|c| c.d1), Some(Vec2::new(6.0, 0.0)));
}

#[test]
fn reversed_wall_starts_at_its_own_point1() {
    let door = Door::new(vec![opening(0.3, 0.6)]);
    let (shapes, _) = door.render(Vec2::new(10.0, 0.0), Vec2::new(0.0, 0.0), HEIGHTS, None);

    assert_eq!(
        shapes.outline,
        pts(&[
            (10.0, 0.0),
            (10.0, 100.0),
            (7.0, 100.0),
            (7.0, 10.0),
            (4.0, 10.0),
            (4.0, 100.0),
            (0.0, 100.0),
            (0.0, 0.0),
            (10.0, 0.0),
        ])
    );
}

#[test]
fn linked_door_draws_the_shared_jamb_first() {
    let door = Feature::Door(Door::new(vec![opening(0.3, 0.6)]));
    let linked = JambCorners {
        d1: Vec2::new(0.0, 2.0),
        d2: Vec2::new(0.0, 5.0),
    };
    let (shapes, _) = door.render(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        HEIGHTS,
        Some(linked),
    );
    assert_eq!(shapes.shape_count(), 2);

    let painted = shapes.into_paint_order();
    assert_eq!(
        painted[0],
        pts(&[(3.0, 0.0), (3.0, 100.0), (0.0, 102.0), (0.0, 2.0), (3.0, 0.0)])
    );
    assert_eq!(painted[1].len(), 9);
}

#[test]
fn opening_ratios_are_validated() {
    assert!(matches!(
        DoorOpening::new(0.6, 0.3),
        Err(Error::InvalidDoorRatio { .. })
    ));
    assert!(DoorOpening::new(-0.5, 0.2).is_err());
    assert!(DoorOpening::new(0.4, 0.4).is_err());

    let clamped = DoorOpening::new(0.0, 1.0005).expect("within tolerance");
    assert_eq!(clamped.r2, 1.0);
}

#[test]
fn door_links_replace_earlier_partners() {
    let mut links = DoorLinks::default();
    links.link(SurfaceId(1), SurfaceId(2));
    links.link(SurfaceId(2), SurfaceId(3));

    assert_eq!(links.partner(SurfaceId(1)), None);
    assert_eq!(links.partner(SurfaceId(3)), Some(SurfaceId(2)));
    assert_eq!(links.partner(SurfaceId(2)), Some(SurfaceId(3)));
    assert_eq!(links.pairs().len(), 1);
}

#[test]
fn marker_turns_crossed_wall_into_door() {
    let mut walls = Walls::new(SurfaceSet::new());
    let ids = walls.add_ring(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]), "hall");
    assert_eq!(ids.len(), 4);

    let doors = walls
        .assign_doors(&marker(&[(3.0, -1.0), (3.0, 1.0), (6.0, 1.0), (6.0, -1.0)]))
        .expect("assign");
    assert_eq!(doors, vec![ids[0]]);

    let feature = walls.surfaces().get(ids[0]).and_then(|s| s.feature.clone());
    match feature {
        Some(Feature::Door(door)) => {
            assert_eq!(door.openings().len(), 1);
            let o = door.openings()[0];
            assert!((o.r1 - 0.3).abs() < 1e-9);
            assert!((o.r2 - 0.6).abs() < 1e-9);
        }
        other => panic!("expected a door, got {other:?}"),
    }
    assert!(walls.links().pairs().is_empty());

    let none = walls
        .assign_doors(&marker(&[(20.0, 20.0), (30.0, 30.0)]))
        .expect("assign");
    assert!(none.is_empty());
}

#[test]
fn doors_from_one_marker_are_linked_and_share_a_jamb() {
    let mut walls = Walls::new(SurfaceSet::new());
    let a = walls.add_ring(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]), "a");
    let b = walls.add_ring(&pts(&[(10.0, 0.0), (20.0, 0.0), (20.0, 10.0), (10.0, 10.0)]), "b");

    let doors = walls
        .assign_doors(&marker(&[(9.0, 3.0), (11.0, 3.0), (11.0, 6.0), (9.0, 6.0)]))
        .expect("assign");
    assert_eq!(doors, vec![a[1], b[3]]);
    assert_eq!(walls.links().partner(a[1]), Some(b[3]));

    walls.begin_frame();
    let offset = Vec2::new(0.0, 0.0);
    let plain = walls.shapes(a[0], offset, HEIGHTS).expect("plain wall");
    assert_eq!(plain.len(), 1);
    assert_eq!(plain[0].len(), 5);

    let first = walls.shapes(a[1], offset, HEIGHTS).expect("first door");
    assert_eq!(first.len(), 1);
    let second = walls.shapes(b[3], offset, HEIGHTS).expect("second door");
    assert_eq!(second.len(), 2);

    // A new frame forgets which door rendered.
    walls.begin_frame();
    let again = walls.shapes(b[3], offset, HEIGHTS).expect("second door");
    assert_eq!(again.len(), 1);

    assert_eq!(
        walls.shapes(SurfaceId(99), offset, HEIGHTS),
        Err(Error::UnknownSurface(SurfaceId(99)))
    );
}

#[test]
fn second_marker_adds_an_opening_to_the_same_door() {
    let mut walls = Walls::new(SurfaceSet::new());
    let ids = walls.add_ring(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]), "hall");

    walls
        .assign_doors(&marker(&[(1.0, -1.0), (1.0, 1.0), (2.0, 1.0), (2.0, -1.0)]))
        .expect("first marker");
    walls
        .assign_doors(&marker(&[(7.0, -1.0), (7.0, 1.0), (8.0, 1.0), (8.0, -1.0)]))
        .expect("second marker");

    let surface = walls.surfaces().get(ids[0]).expect("wall");
    let Some(Feature::Door(door)) = &surface.feature else {
        panic!("expected a door");
    };
    assert_eq!(door.openings().len(), 2);

    walls.begin_frame();
    let shapes = walls
        .shapes(ids[0], Vec2::new(0.0, 0.0), HEIGHTS)
        .expect("shapes");
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].len(), 13);
}
