use crate::geometry::{GeometryId, SurfaceShape};

use super::layer::LayerId;

slotmap::new_key_type! {
    /// Unique identifier for a surface in the tracking geometry.
    pub struct SurfaceId;
}

/// Data associated with a detector surface.
///
/// Sensitive surfaces are owned by a layer and point back to it; boundary
/// surfaces and free-standing surfaces (e.g. a perigee) have no layer.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// The geometric shape and placement of the surface.
    pub shape: SurfaceShape,
    /// Non-owning back-reference to the layer carrying this surface.
    pub layer: Option<LayerId>,
    /// Hierarchical identifier, assigned when the geometry is closed.
    pub geometry_id: GeometryId,
}

impl SurfaceData {
    /// Creates surface data that is not (yet) attached to a layer.
    #[must_use]
    pub fn new(shape: impl Into<SurfaceShape>) -> Self {
        Self {
            shape: shape.into(),
            layer: None,
            geometry_id: GeometryId::default(),
        }
    }

    /// The layer this surface is permanently associated with, if any.
    #[must_use]
    pub fn associated_layer(&self) -> Option<LayerId> {
        self.layer
    }
}
