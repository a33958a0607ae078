use crate::geom::{BBox2, Vec2};
use crate::model::RenderMode;
use crate::normalize::NormalizeStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// One wall surface, in paint order. `shapes` are painted first to last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDrawReport {
    pub surface: usize,
    pub wall: String,
    pub shapes: Vec<Vec<Vec2>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintReport {
    pub id: String,
    pub points: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingStats {
    pub fast_rejections: usize,
    pub cache_hits: usize,
    pub evaluations: usize,
    pub rounds: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub mode: RenderMode,
    pub surfaces: Vec<SurfaceDrawReport>,
    pub rooms: Vec<FootprintReport>,
    pub interior: Option<Vec<Vec2>>,
    pub outline: Vec<Vec<Vec2>>,
    pub ordering: OrderingStats,
    pub unresolved: Vec<usize>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub input_format: String,
    pub rooms: usize,
    pub door_markers: usize,
    pub outline_points: usize,
    pub wall_segments: usize,
    pub extents: Option<BBox2>,
    pub normalize: NormalizeStats,
    pub warnings: Vec<Warning>,
}
