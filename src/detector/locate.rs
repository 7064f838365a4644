//! Point location within the detector hierarchy.

use crate::error::Result;
use crate::geometry::{NavigationDirection, Surface};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{BoundaryId, LayerId, TrackingGeometry, VolumeId};

impl TrackingGeometry {
    /// Finds the innermost volume containing `position`, starting from
    /// `world` and descending through confined volumes.
    ///
    /// Returns `None` when `world` does not contain the point (or is not
    /// in the store); callers treat that as "not found", not as a failure.
    #[must_use]
    pub fn locate_volume(&self, world: VolumeId, position: &Point3) -> Option<VolumeId> {
        let mut current = world;
        if !self.volumes.get(current)?.contains(position, TOLERANCE) {
            return None;
        }
        while let Some(child) = self.volumes.get(current)?.confined_volumes.iter().copied().find(|&child| {
            self.volumes
                .get(child)
                .is_some_and(|v| v.contains(position, TOLERANCE))
        }) {
            current = child;
        }
        Some(current)
    }

    /// Finds the layer of `volume` whose envelope contains `position`.
    #[must_use]
    pub fn associated_layer(&self, volume: VolumeId, position: &Point3) -> Option<LayerId> {
        self.volumes.get(volume)?.layers.iter().copied().find(|&layer| {
            self.layers
                .get(layer)
                .is_some_and(|l| l.contains(position, TOLERANCE))
        })
    }

    /// Volume entered when crossing `boundary` at `position` along
    /// `direction`.
    ///
    /// Moving along the surface normal leads to the outside volume,
    /// against it to the inside volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary or its surface is not in the store.
    pub fn attached_volume(
        &self,
        boundary: BoundaryId,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Result<Option<VolumeId>> {
        let data = self.boundary(boundary)?;
        let normal = self.surface(data.surface)?.shape.normal(position);
        if normal.dot(direction) * navigation.sign() > 0.0 {
            Ok(data.outside)
        } else {
            Ok(data.inside)
        }
    }
}
