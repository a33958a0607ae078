use crate::geom::{Vec2, POINT_EPSILON};
use crate::model::{close_ring, FloorPlan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub min_point_distance: f64,
    pub close_rings: bool,
    pub drop_degenerate_rings: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_point_distance: POINT_EPSILON,
            close_rings: true,
            drop_degenerate_rings: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    pub closed_rings: usize,
    pub removed_duplicate_points: usize,
    pub removed_degenerate_rings: usize,
}

pub fn normalize_in_place(plan: &mut FloorPlan, cfg: &NormalizeConfig) -> NormalizeStats {
    let mut stats = NormalizeStats::default();

    let tidy_ring = |points: &mut Vec<Vec2>, stats: &mut NormalizeStats| -> bool {
        stats.removed_duplicate_points += dedup_points(points, cfg.min_point_distance);
        if cfg.close_rings && close_ring(points) {
            stats.closed_rings += 1;
        }
        !(cfg.drop_degenerate_rings && is_degenerate(points, cfg.min_point_distance))
    };

    if let Some(mut outline) = plan.outline.take() {
        if tidy_ring(&mut outline, &mut stats) {
            plan.outline = Some(outline);
        } else {
            stats.removed_degenerate_rings += 1;
        }
    }

    if let Some(mut interior) = plan.interior.take() {
        stats.removed_duplicate_points += dedup_points(&mut interior, cfg.min_point_distance);
        if interior.len() >= 2 {
            plan.interior = Some(interior);
        }
    }

    let before = plan.rooms.len();
    plan.rooms.retain_mut(|room| tidy_ring(&mut room.points, &mut stats));
    stats.removed_degenerate_rings += before - plan.rooms.len();

    // Markers stay open; only their duplicates go.
    for marker in &mut plan.door_markers {
        stats.removed_duplicate_points += dedup_points(&mut marker.points, cfg.min_point_distance);
    }
    plan.door_markers.retain(|m| m.points.len() >= 2);

    stats
}

fn dedup_points(points: &mut Vec<Vec2>, min_distance: f64) -> usize {
    let before = points.len();
    points.dedup_by(|b, a| a.distance(*b) < min_distance);
    before - points.len()
}

fn is_degenerate(points: &[Vec2], min_distance: f64) -> bool {
    let mut distinct: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.iter().any(|d| d.distance(*p) < min_distance) {
            distinct.push(*p);
        }
    }
    distinct.len() < 3
}
