use crate::error::{Error, Result};
use isoplan_core::geom::{interpolate, Vec2, POINT_EPSILON};
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorOpening {
    pub r1: f64,
    pub r2: f64,
}

impl DoorOpening {
    pub fn new(r1: f64, r2: f64) -> Result<Self> {
        let in_range = |r: f64| (-POINT_EPSILON..=1.0 + POINT_EPSILON).contains(&r);
        if !(in_range(r1) && in_range(r2) && r1 < r2) {
            return Err(Error::InvalidDoorRatio { r1, r2 });
        }
        Ok(Self {
            r1: r1.clamp(0.0, 1.0),
            r2: r2.clamp(0.0, 1.0),
        })
    }

    pub fn reference_ratio(&self) -> f64 {
        self.r1.min(self.r2)
    }

    fn jambs(&self, point1: Vec2, point2: Vec2) -> (Vec2, Vec2) {
        (
            interpolate(point1, point2, self.r1),
            interpolate(point1, point2, self.r2),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHeights {
    pub wall: f64,
    pub door_header: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JambCorners {
    pub d1: Vec2,
    pub d2: Vec2,
}

impl JambCorners {
    /// The corner higher on screen; its jamb face is the one left uncovered.
    pub fn visible(&self) -> Vec2 {
        if self.d1.y > self.d2.y {
            self.d2
        } else {
            self.d1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Door {
    openings: Vec<DoorOpening>,
}

impl Door {
    pub fn new(openings: Vec<DoorOpening>) -> Self {
        Self { openings }
    }

    pub fn openings(&self) -> &[DoorOpening] {
        &self.openings
    }

    pub fn add_opening(&mut self, opening: DoorOpening) {
        self.openings.push(opening);
    }

    /// The outline runs `p1`, down, along the bottom edge through each opening
    /// (nearest `p1` first), up at `p2` and back to `p1`.
    pub fn render(
        &self,
        point1: Vec2,
        point2: Vec2,
        heights: WallHeights,
        linked: Option<JambCorners>,
    ) -> (FeatureShapes, Option<JambCorners>) {
        let corners = self.openings.first().map(|o| {
            let (d1, d2) = o.jambs(point1, point2);
            JambCorners { d1, d2 }
        });

        let cores = self
            .openings
            .iter()
            .sorted_by(|a, b| a.reference_ratio().total_cmp(&b.reference_ratio()))
            .flat_map(|o| {
                let (d1, d2) = o.jambs(point1, point2);
                let (near, far) = if (d1.x - point1.x).abs() < (d2.x - point1.x).abs() {
                    (d1, d2)
                } else {
                    (d2, d1)
                };
                [
                    near.drop_by(heights.wall),
                    near.drop_by(heights.door_header),
                    far.drop_by(heights.door_header),
                    far.drop_by(heights.wall),
                ]
            });

        let mut outline = vec![point1, point1.drop_by(heights.wall)];
        outline.extend(cores);
        outline.extend([point2.drop_by(heights.wall), point2, point1]);

        let jambs = match (corners, linked) {
            (Some(own), Some(other)) => {
                let d = own.visible();
                let l = other.visible();
                vec![vec![d, d.drop_by(heights.wall), l.drop_by(heights.wall), l, d]]
            }
            _ => Vec::new(),
        };

        (FeatureShapes { outline, jambs }, corners)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureShapes {
    pub outline: Vec<Vec2>,
    pub jambs: Vec<Vec<Vec2>>,
}

impl FeatureShapes {
    pub fn shape_count(&self) -> usize {
        1 + self.jambs.len()
    }

    /// Jambs first so the wall face paints over their hidden edges.
    pub fn into_paint_order(self) -> Vec<Vec<Vec2>> {
        let mut shapes = self.jambs;
        shapes.push(self.outline);
        shapes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Door(Door),
}

impl Feature {
    pub fn render(
        &self,
        point1: Vec2,
        point2: Vec2,
        heights: WallHeights,
        linked: Option<JambCorners>,
    ) -> (FeatureShapes, Option<JambCorners>) {
        match self {
            Feature::Door(door) => door.render(point1, point2, heights, linked),
        }
    }

    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match self {
            Feature::Door(door) => Some(door),
        }
    }
}
