use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use isoplan_core::geom::Vec2;

// Outer contour followed by its holes.
type Shape = Vec<Vec<[f64; 2]>>;

/// Fold `polygons` left to right into their union.
///
/// Returns only the outer contour of every resulting shape, open (no repeated
/// closing point); holes are dropped. Any input ring with fewer than 3
/// distinct points fails the whole union.
pub fn union_all(polygons: &[Vec<Vec2>]) -> Result<Vec<Vec<Vec2>>> {
    let rings = polygons
        .iter()
        .enumerate()
        .map(|(index, ring)| open_ring(ring, index))
        .collect::<Result<Vec<_>>>()?;

    let Some((first, rest)) = rings.split_first() else {
        return Ok(Vec::new());
    };

    let mut running: Vec<Shape> = vec![vec![to_path(first)]];
    for ring in rest {
        let subject: Vec<Vec<[f64; 2]>> = running.iter().flatten().cloned().collect();
        let clip = vec![to_path(ring)];
        running = subject.overlay(&clip, OverlayRule::Union, FillRule::EvenOdd);
    }

    Ok(running
        .iter()
        .filter_map(|shape| shape.first())
        .map(|outer| outer.iter().map(|p| Vec2::new(p[0], p[1])).collect())
        .collect())
}

fn open_ring(ring: &[Vec2], index: usize) -> Result<Vec<Vec2>> {
    let mut points = ring.to_vec();
    points.dedup_by(|b, a| a.approx_eq(*b));
    if points.len() > 1 && points[0].approx_eq(points[points.len() - 1]) {
        points.pop();
    }
    if points.len() < 3 {
        return Err(Error::DegenerateRing {
            index,
            len: points.len(),
        });
    }
    Ok(points)
}

fn to_path(ring: &[Vec2]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x, p.y]).collect()
}
