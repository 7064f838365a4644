use crate::geometry::{GeometryId, VolumeBounds};
use crate::math::{Isometry3, Point3};

use super::boundary::BoundaryId;
use super::layer::LayerId;

slotmap::new_key_type! {
    /// Unique identifier for a volume in the tracking geometry.
    pub struct VolumeId;
}

/// Data associated with a tracking volume.
///
/// A volume owns its boundary surfaces, its layers and any volumes
/// confined within it. The world volume is the one without a mother.
#[derive(Debug, Clone)]
pub struct VolumeData {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Placement of the volume.
    pub transform: Isometry3,
    /// Shape of the volume, in the local frame of `transform`.
    pub bounds: VolumeBounds,
    /// Non-owning reference to the enclosing volume.
    pub mother: Option<VolumeId>,
    /// Volumes confined within this one.
    pub confined_volumes: Vec<VolumeId>,
    /// Layers owned by this volume.
    pub layers: Vec<LayerId>,
    /// Boundary surfaces derived from `bounds`, in construction order.
    pub boundaries: Vec<BoundaryId>,
    /// Hierarchical identifier, assigned when the geometry is closed.
    pub geometry_id: GeometryId,
}

impl VolumeData {
    /// Whether a global position lies inside the volume.
    #[must_use]
    pub fn contains(&self, position: &Point3, tolerance: f64) -> bool {
        let local = self.transform.inverse_transform_point(position);
        self.bounds.contains(&local, tolerance)
    }
}
