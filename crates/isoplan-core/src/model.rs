use crate::geom::{BBox2, Segment2, Vec2};
use serde::{Deserialize, Serialize};

/// Wall id given to the surfaces generated from the plan outline.
pub const OUTLINE_WALL_ID: &str = "outline-wall";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Preview pass: no ordering, no outline extrusion.
    Fast,
    /// Painter's-algorithm pass with full visibility ordering.
    Quality,
}

impl RenderMode {
    pub fn is_fast(self) -> bool {
        matches!(self, RenderMode::Fast)
    }
}

/// A closed room outline. Every edge becomes a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub points: Vec<Vec2>,
}

/// An open or closed polyline whose edges mark a door where they cross a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorMarker {
    pub id: String,
    pub points: Vec<Vec2>,
}

impl DoorMarker {
    pub fn segments(&self) -> Vec<Segment2> {
        self.points
            .windows(2)
            .map(|w| Segment2::new(w[0], w[1]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorPlan {
    pub outline: Option<Vec<Vec2>>,
    pub interior: Option<Vec<Vec2>>,
    pub rooms: Vec<Room>,
    pub door_markers: Vec<DoorMarker>,
}

impl FloorPlan {
    pub fn extents(&self) -> Option<BBox2> {
        let mut bbox = BBox2::empty();
        if let Some(outline) = &self.outline {
            bbox = bbox.union(&BBox2::from_points(outline));
        }
        for room in &self.rooms {
            bbox = bbox.union(&BBox2::from_points(&room.points));
        }
        if bbox.is_empty() { None } else { Some(bbox) }
    }

    /// Every ring that produces walls, outline first, as `(wall id, points)`.
    pub fn wall_rings(&self) -> Vec<(&str, &[Vec2])> {
        let mut rings = Vec::with_capacity(self.rooms.len() + 1);
        if let Some(outline) = &self.outline {
            rings.push((OUTLINE_WALL_ID, outline.as_slice()));
        }
        for room in &self.rooms {
            rings.push((room.id.as_str(), room.points.as_slice()));
        }
        rings
    }
}

/// Append the first point when the ring is not already closed.
pub fn close_ring(points: &mut Vec<Vec2>) -> bool {
    match (points.first().copied(), points.last().copied()) {
        (Some(first), Some(last)) if points.len() > 1 && first != last => {
            points.push(first);
            true
        }
        _ => false,
    }
}
