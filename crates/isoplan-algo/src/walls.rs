use crate::error::{Error, Result};
use crate::feature::{Door, DoorOpening, Feature, JambCorners, WallHeights};
use crate::surface::{SurfaceId, SurfaceSet};
use isoplan_core::geom::{BBox2, Segment2, Vec2};
use itertools::Itertools;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoorLinks {
    pairs: Vec<(SurfaceId, SurfaceId)>,
}

impl DoorLinks {
    pub fn link(&mut self, a: SurfaceId, b: SurfaceId) {
        self.pairs.retain(|&(x, y)| x != a && y != a && x != b && y != b);
        self.pairs.push((a, b));
    }

    pub fn partner(&self, id: SurfaceId) -> Option<SurfaceId> {
        self.pairs.iter().find_map(|&(a, b)| {
            if a == id {
                Some(b)
            } else if b == id {
                Some(a)
            } else {
                None
            }
        })
    }

    pub fn pairs(&self) -> &[(SurfaceId, SurfaceId)] {
        &self.pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct Walls {
    surfaces: SurfaceSet,
    links: DoorLinks,
    rendered_doors: HashMap<SurfaceId, JambCorners>,
}

impl Walls {
    pub fn new(surfaces: SurfaceSet) -> Self {
        Self {
            surfaces,
            links: DoorLinks::default(),
            rendered_doors: HashMap::new(),
        }
    }

    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut SurfaceSet {
        &mut self.surfaces
    }

    pub fn links(&self) -> &DoorLinks {
        &self.links
    }

    pub fn add_ring(&mut self, points: &[Vec2], wall: &str) -> Vec<SurfaceId> {
        let closing = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first != last => Some(*first),
            _ => None,
        };
        points
            .iter()
            .copied()
            .chain(closing)
            .tuple_windows()
            .map(|(a, b)| self.surfaces.add(wall, a, b))
            .collect()
    }

    /// Crossings are sorted along the wall and paired into openings; an odd
    /// crossing left over is ignored. Doors created by one marker are linked
    /// two by two in creation order. Returns the walls that gained openings.
    pub fn assign_doors(&mut self, marker: &[Segment2]) -> Result<Vec<SurfaceId>> {
        let mut doors = Vec::new();

        for id in self.surfaces.ids() {
            let Some(surface) = self.surfaces.get(id) else {
                continue;
            };
            let wall = surface.initial();
            let length = wall.length();
            if length <= 0.0 {
                continue;
            }

            let ratios: Vec<f64> = marker
                .iter()
                .filter_map(|segment| wall.intersect(segment))
                .map(|p| wall.a.distance(p) / length)
                .sorted_by(f64::total_cmp)
                .collect();
            if ratios.len() < 2 {
                continue;
            }
            if ratios.len() % 2 == 1 {
                tracing::warn!(surface = %id, crossings = ratios.len(), "odd number of door crossings; last one ignored");
            }

            let openings = ratios
                .chunks_exact(2)
                .map(|pair| DoorOpening::new(pair[0], pair[1]))
                .filter_map(|opening| match opening {
                    Ok(o) => Some(o),
                    Err(err) => {
                        tracing::warn!(surface = %id, %err, "skipping door opening");
                        None
                    }
                })
                .collect::<Vec<_>>();
            if openings.is_empty() {
                continue;
            }

            self.attach_openings(id, openings)?;
            doors.push(id);
        }

        for pair in doors.chunks_exact(2) {
            self.links.link(pair[0], pair[1]);
        }
        tracing::debug!(doors = doors.len(), "assigned door marker");
        Ok(doors)
    }

    fn attach_openings(&mut self, id: SurfaceId, openings: Vec<DoorOpening>) -> Result<()> {
        let surface = self
            .surfaces
            .get_mut(id)
            .ok_or(Error::UnknownSurface(id))?;
        match surface.feature.as_mut().and_then(Feature::as_door_mut) {
            Some(door) => {
                for opening in openings {
                    door.add_opening(opening);
                }
            }
            None => surface.feature = Some(Feature::Door(Door::new(openings))),
        }
        Ok(())
    }

    pub fn initial_bbox(&self) -> BBox2 {
        let mut bbox = BBox2::empty();
        for surface in self.surfaces.iter() {
            let seg = surface.initial();
            bbox.include_point(seg.a);
            bbox.include_point(seg.b);
        }
        bbox
    }

    pub fn begin_frame(&mut self) {
        self.rendered_doors.clear();
    }

    /// Polygons for one surface in its current projection, in paint order.
    ///
    /// Must be called in the frame's paint order: a door only draws the jamb
    /// shared with its linked door when that door has already been drawn.
    pub fn shapes(&mut self, id: SurfaceId, offset: Vec2, heights: WallHeights) -> Result<Vec<Vec<Vec2>>> {
        let surface = self
            .surfaces
            .get(id)
            .ok_or(Error::UnknownSurface(id))?;

        let Some(feature) = &surface.feature else {
            return Ok(vec![surface.quad(offset, heights.wall)]);
        };

        let linked = self
            .links
            .partner(id)
            .and_then(|partner| self.rendered_doors.get(&partner))
            .copied();
        let (shapes, corners) = feature.render(
            surface.point1.translate(offset),
            surface.point2.translate(offset),
            heights,
            linked,
        );
        if let Some(corners) = corners {
            self.rendered_doors.insert(id, corners);
        }
        Ok(shapes.into_paint_order())
    }
}
