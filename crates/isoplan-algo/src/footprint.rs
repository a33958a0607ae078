use crate::error::Result;
use crate::union::union_all;
use isoplan_core::geom::{transform_points, BBox2, Matrix2, Vec2, POINT_EPSILON};
use isoplan_core::model::close_ring;

const FACE_NUDGE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct Footprint {
    pub id: String,
    initial: Vec<Vec2>,
    points: Vec<Vec2>,
}

impl Footprint {
    pub fn new(id: &str, points: &[Vec2]) -> Self {
        Self {
            id: id.to_string(),
            initial: points.to_vec(),
            points: points.to_vec(),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn initial_bbox(&self) -> BBox2 {
        BBox2::from_points(&self.initial)
    }

    pub fn rebase(&mut self, translate: Vec2, scale: f64) {
        for p in &mut self.initial {
            *p = p.translate(translate).scale(scale);
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.points.clone_from(&self.initial);
    }

    pub fn transform(&mut self, m: &Matrix2) {
        transform_points(&mut self.points, m);
    }

    pub fn translated(&self, offset: Vec2) -> Vec<Vec2> {
        self.points.iter().map(|p| p.translate(offset)).collect()
    }

    /// Silhouette of the ring extruded `height` down the screen. Open rings
    /// are closed first so the last edge gets a face too.
    pub fn extrude(&self, offset: Vec2, height: f64) -> Result<Vec<Vec<Vec2>>> {
        let mut top = self.translated(offset);
        close_ring(&mut top);
        if height <= POINT_EPSILON {
            return union_all(&[top]);
        }

        let faces: Vec<Vec<Vec2>> = top
            .windows(2)
            .map(|w| {
                let (trailing, point) = (w[0], w[1]);
                let head = Vec2::new(point.x - FACE_NUDGE, point.y - FACE_NUDGE);
                let tail = Vec2::new(trailing.x + FACE_NUDGE, trailing.y);
                vec![
                    head,
                    tail,
                    tail.drop_by(height + FACE_NUDGE),
                    Vec2::new(head.x, point.y + height + FACE_NUDGE),
                    head,
                ]
            })
            .collect();
        let bottom: Vec<Vec2> = top.iter().map(|p| p.drop_by(height)).collect();

        let mut merged = union_all(&faces)?;
        merged.push(top);
        let mut merged = union_all(&merged)?;
        merged.push(bottom);
        union_all(&merged)
    }
}
