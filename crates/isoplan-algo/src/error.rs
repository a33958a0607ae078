use crate::surface::SurfaceId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("ordering deadlock after {} surface(s): {} remain unordered ({})", .ordered.len(), .remaining.len(), format_ids(.remaining))]
    OrderingDeadlock {
        ordered: Vec<SurfaceId>,
        remaining: Vec<SurfaceId>,
    },

    #[error("polygon {index} has {len} distinct point(s); a ring needs at least 3")]
    DegenerateRing { index: usize, len: usize },

    #[error("door ratios must satisfy 0 <= r1 < r2 <= 1, got r1={r1}, r2={r2}")]
    InvalidDoorRatio { r1: f64, r2: f64 },

    #[error("unknown surface {0}")]
    UnknownSurface(SurfaceId),
}

fn format_ids(ids: &[SurfaceId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
