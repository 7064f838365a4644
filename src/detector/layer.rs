use crate::geometry::{GeometryId, VolumeBounds};
use crate::math::{Isometry3, Point3};

use super::surface::SurfaceId;
use super::volume::VolumeId;

slotmap::new_key_type! {
    /// Unique identifier for a layer in the tracking geometry.
    pub struct LayerId;
}

/// Data associated with a detector layer.
///
/// A layer groups the sensitive surfaces at one radius (barrel) or one
/// z position (end-cap). Its envelope is used for point location.
#[derive(Debug, Clone)]
pub struct LayerData {
    /// Placement of the envelope.
    pub transform: Isometry3,
    /// Envelope of the layer, in the local frame of `transform`.
    pub envelope: VolumeBounds,
    /// Non-owning reference to the volume this layer belongs to.
    pub volume: VolumeId,
    /// Surfaces owned by this layer.
    pub surfaces: Vec<SurfaceId>,
    /// Hierarchical identifier, assigned when the geometry is closed.
    pub geometry_id: GeometryId,
}

impl LayerData {
    /// Whether a global position lies within the layer envelope.
    #[must_use]
    pub fn contains(&self, position: &Point3, tolerance: f64) -> bool {
        let local = self.transform.inverse_transform_point(position);
        self.envelope.contains(&local, tolerance)
    }
}
