pub mod bounds;
pub mod geometry_id;
pub mod surface;

pub use bounds::VolumeBounds;
pub use geometry_id::GeometryId;
pub use surface::{Intersection, NavigationDirection, Surface, SurfaceShape};
