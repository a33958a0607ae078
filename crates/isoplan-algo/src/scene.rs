use crate::error::Result;
use crate::feature::WallHeights;
use crate::footprint::Footprint;
use crate::order::{draw_order, DrawOrder};
use crate::surface::{SurfaceId, SurfaceSet};
use crate::walls::Walls;
use isoplan_core::geom::{compose, isometric_matrix, rotation_matrix, scale_matrix, Matrix2, Vec2};
use isoplan_core::model::{FloorPlan, RenderMode};
use isoplan_core::report::{
    FootprintReport, FrameReport, OrderingStats, SurfaceDrawReport, Warning,
};

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub canvas: Vec2,
    pub layout_scale: f64,
    pub wall_height: f64,
    pub door_header: f64,
    pub y_range_shortcut: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(1000.0, 800.0),
            layout_scale: 0.5,
            wall_height: 100.0,
            door_header: 10.0,
            y_range_shortcut: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub rotation_deg: f64,
    /// Clamped to `[0, 90]` when the matrix is built.
    pub tilt_deg: f64,
    pub scale: f64,
    pub height: f64,
    pub mode: RenderMode,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            rotation_deg: -90.0,
            tilt_deg: 33.75,
            scale: 1.0,
            height: 0.25,
            mode: RenderMode::Quality,
        }
    }
}

impl Camera {
    /// `isometric(tilt) · rotation · scale`.
    pub fn matrix(&self) -> Matrix2 {
        let scale_rotation = compose(&rotation_matrix(self.rotation_deg), &scale_matrix(self.scale));
        compose(&isometric_matrix(self.tilt_deg), &scale_rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSummary {
    pub surfaces: usize,
    pub doors: usize,
    pub door_links: usize,
    pub rooms: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub surface: SurfaceId,
    pub wall: String,
    pub shapes: Vec<Vec<Vec2>>,
}

impl DrawCommand {
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub mode: RenderMode,
    pub surfaces: Vec<DrawCommand>,
    pub rooms: Vec<(String, Vec<Vec2>)>,
    pub interior: Option<Vec<Vec2>>,
    pub outline: Vec<Vec<Vec2>>,
    pub unresolved: Vec<SurfaceId>,
    pub ordering: OrderingStats,
    pub warnings: Vec<Warning>,
}

impl Frame {
    pub fn paint_order(&self) -> Vec<SurfaceId> {
        self.surfaces.iter().map(|c| c.surface).collect()
    }

    pub fn to_report(&self) -> FrameReport {
        FrameReport {
            mode: self.mode,
            surfaces: self
                .surfaces
                .iter()
                .map(|c| SurfaceDrawReport {
                    surface: c.surface.0,
                    wall: c.wall.clone(),
                    shapes: c.shapes.clone(),
                })
                .collect(),
            rooms: self
                .rooms
                .iter()
                .map(|(id, points)| FootprintReport {
                    id: id.clone(),
                    points: points.clone(),
                })
                .collect(),
            interior: self.interior.clone(),
            outline: self.outline.clone(),
            ordering: self.ordering,
            unresolved: self.unresolved.iter().map(|id| id.0).collect(),
            warnings: self.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    cfg: SceneConfig,
    walls: Walls,
    rooms: Vec<Footprint>,
    interior: Option<Footprint>,
    outline: Option<Footprint>,
    center: Vec2,
}

impl Scene {
    pub fn from_plan(plan: &FloorPlan, cfg: SceneConfig) -> Result<Self> {
        let mut walls =
            Walls::new(SurfaceSet::new().with_y_range_shortcut(cfg.y_range_shortcut));
        for (wall, ring) in plan.wall_rings() {
            let ids = walls.add_ring(ring, wall);
            tracing::debug!(wall, surfaces = ids.len(), "added wall ring");
        }
        for marker in &plan.door_markers {
            let doors = walls.assign_doors(&marker.segments())?;
            if doors.is_empty() {
                tracing::warn!(marker = %marker.id, "door marker crosses no wall twice");
            }
        }

        let mut scene = Self {
            walls,
            rooms: plan
                .rooms
                .iter()
                .map(|room| Footprint::new(&room.id, &room.points))
                .collect(),
            interior: plan.interior.as_deref().map(|p| Footprint::new("interior", p)),
            outline: plan.outline.as_deref().map(|p| Footprint::new("outline", p)),
            center: Vec2::new(cfg.canvas.x * 0.5, cfg.canvas.y * 0.5),
            cfg,
        };
        scene.center_and_scale();
        Ok(scene)
    }

    fn center_and_scale(&mut self) {
        let bbox = match &self.outline {
            Some(outline) => outline.initial_bbox(),
            None => self.walls.initial_bbox(),
        };
        let translate = if bbox.is_empty() {
            Vec2::new(0.0, 0.0)
        } else {
            bbox.center().scale(-1.0)
        };
        let scale = self.cfg.layout_scale;

        self.walls.surfaces_mut().rebase(translate, scale);
        for footprint in self.footprints_mut() {
            footprint.rebase(translate, scale);
        }
    }

    fn footprints_mut(&mut self) -> impl Iterator<Item = &mut Footprint> {
        self.rooms
            .iter_mut()
            .chain(self.interior.as_mut())
            .chain(self.outline.as_mut())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.cfg
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            surfaces: self.walls.surfaces().len(),
            doors: self
                .walls
                .surfaces()
                .iter()
                .filter(|s| s.feature.is_some())
                .count(),
            door_links: self.walls.links().pairs().len(),
            rooms: self.rooms.len(),
        }
    }

    pub fn render_frame(&mut self, camera: &Camera) -> Result<Frame> {
        let m = camera.matrix();
        let surfaces = self.walls.surfaces_mut();
        surfaces.reset_all();
        surfaces.transform_all(&m);
        for footprint in self.footprints_mut() {
            footprint.reset();
            footprint.transform(&m);
        }

        let mut warnings = Vec::new();
        let ids = self.walls.surfaces().ids();
        let DrawOrder { order, unresolved } = draw_order(self.walls.surfaces_mut(), &ids, camera.mode)?;
        if !unresolved.is_empty() {
            warnings.push(Warning::new(
                "ordering_deadlock",
                format!(
                    "{} surface(s) could not be ordered and were painted in input order",
                    unresolved.len()
                ),
            ));
        }

        let heights = WallHeights {
            wall: self.cfg.wall_height * camera.scale * camera.height,
            door_header: self.cfg.door_header * camera.scale * camera.height,
        };

        self.walls.begin_frame();
        let mut commands = Vec::with_capacity(order.len());
        for id in order {
            let shapes = self.walls.shapes(id, self.center, heights)?;
            let wall = self
                .walls
                .surfaces()
                .get(id)
                .map(|s| s.wall().to_string())
                .unwrap_or_default();
            commands.push(DrawCommand {
                surface: id,
                wall,
                shapes,
            });
        }

        let outline = match (&self.outline, camera.mode) {
            (Some(outline), RenderMode::Quality) => match outline.extrude(self.center, heights.wall) {
                Ok(polygons) => polygons,
                Err(err) => {
                    tracing::warn!(%err, "outline extrusion failed; drawing it empty");
                    warnings.push(Warning::new("outline_union_failed", err.to_string()));
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        Ok(Frame {
            mode: camera.mode,
            surfaces: commands,
            rooms: self
                .rooms
                .iter()
                .map(|r| (r.id.clone(), r.translated(self.center)))
                .collect(),
            interior: self.interior.as_ref().map(|i| i.translated(self.center)),
            outline,
            unresolved,
            ordering: self.walls.surfaces().stats(),
            warnings,
        })
    }
}
