pub mod geom;
pub mod model;
pub mod normalize;
pub mod report;
