pub mod error;
pub mod feature;
pub mod footprint;
pub mod order;
pub mod scene;
pub mod surface;
pub mod union;
pub mod walls;

pub use error::{Error, Result};
pub use order::{draw_order, sort_surfaces, DrawOrder};
pub use scene::{Camera, DrawCommand, Frame, Scene, SceneConfig};
pub use surface::{RenderOrder, Surface, SurfaceId, SurfaceSet};
