pub mod boundary;
pub mod identify;
pub mod layer;
pub mod locate;
pub mod surface;
pub mod volume;

pub use boundary::{BoundaryData, BoundaryId, BoundarySide};
pub use layer::{LayerData, LayerId};
pub use surface::{SurfaceData, SurfaceId};
pub use volume::{VolumeData, VolumeId};

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::error::{DetectorError, Result};
use crate::geometry::{GeometryId, SurfaceShape, VolumeBounds};
use crate::math::Isometry3;

/// Central arena that owns the detector hierarchy.
///
/// Volumes own layers, boundary surfaces and confined volumes; layers own
/// surfaces. Back-references (surface to layer, layer to volume, volume to
/// mother, boundary to volumes) are plain keys and never own anything.
/// The store is built once and is read-only while tracks are fitted, so
/// a shared reference can be handed to any number of concurrent fits.
#[derive(Debug, Default)]
pub struct TrackingGeometry {
    volumes: SlotMap<VolumeId, VolumeData>,
    layers: SlotMap<LayerId, LayerData>,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    boundaries: SlotMap<BoundaryId, BoundaryData>,
    /// Top-level volumes, in insertion order.
    roots: Vec<VolumeId>,
    /// Surface lookup by identifier, rebuilt by `assign_geometry_ids`.
    surface_lookup: BTreeMap<GeometryId, SurfaceId>,
}

impl TrackingGeometry {
    /// Creates a new, empty tracking geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Volume operations ---

    /// Inserts a top-level volume and decomposes its bounds into boundary
    /// surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary surfaces cannot be constructed.
    pub fn add_volume(
        &mut self,
        name: impl Into<String>,
        transform: Isometry3,
        bounds: VolumeBounds,
    ) -> Result<VolumeId> {
        let id = self.insert_volume(name.into(), transform, bounds, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Inserts a volume confined within `mother`.
    ///
    /// # Errors
    ///
    /// Returns an error if `mother` is not in the store or the boundary
    /// surfaces cannot be constructed.
    pub fn add_confined_volume(
        &mut self,
        mother: VolumeId,
        name: impl Into<String>,
        transform: Isometry3,
        bounds: VolumeBounds,
    ) -> Result<VolumeId> {
        self.volume(mother)?;
        let id = self.insert_volume(name.into(), transform, bounds, Some(mother))?;
        self.volume_mut(mother)?.confined_volumes.push(id);
        Ok(id)
    }

    fn insert_volume(
        &mut self,
        name: String,
        transform: Isometry3,
        bounds: VolumeBounds,
        mother: Option<VolumeId>,
    ) -> Result<VolumeId> {
        let shapes = bounds.decompose_to_surfaces(&transform)?;
        let id = self.volumes.insert(VolumeData {
            name,
            transform,
            bounds,
            mother,
            confined_volumes: Vec::new(),
            layers: Vec::new(),
            boundaries: Vec::with_capacity(shapes.len()),
            geometry_id: GeometryId::default(),
        });

        let count = shapes.len();
        let mut boundaries = Vec::with_capacity(count);
        for (index, shape) in shapes.into_iter().enumerate() {
            let surface = self.surfaces.insert(SurfaceData::new(shape));
            let side = BoundarySide::for_position(index, count, bounds.is_cylinder());
            boundaries.push(self.boundaries.insert(BoundaryData::new(surface, id, side)));
        }
        self.volume_mut(id)?.boundaries = boundaries;
        Ok(id)
    }

    /// Returns a reference to the volume data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn volume(&self, id: VolumeId) -> Result<&VolumeData> {
        self.volumes
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("volume".into()).into())
    }

    fn volume_mut(&mut self, id: VolumeId) -> Result<&mut VolumeData> {
        self.volumes
            .get_mut(id)
            .ok_or_else(|| DetectorError::EntityNotFound("volume".into()).into())
    }

    /// Top-level volumes, in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[VolumeId] {
        &self.roots
    }

    // --- Layer operations ---

    /// Inserts a layer into `volume`.
    ///
    /// # Errors
    ///
    /// Returns an error if `volume` is not in the store.
    pub fn add_layer(
        &mut self,
        volume: VolumeId,
        transform: Isometry3,
        envelope: VolumeBounds,
    ) -> Result<LayerId> {
        self.volume(volume)?;
        let id = self.layers.insert(LayerData {
            transform,
            envelope,
            volume,
            surfaces: Vec::new(),
            geometry_id: GeometryId::default(),
        });
        self.volume_mut(volume)?.layers.push(id);
        Ok(id)
    }

    /// Returns a reference to the layer data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn layer(&self, id: LayerId) -> Result<&LayerData> {
        self.layers
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("layer".into()).into())
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut LayerData> {
        self.layers
            .get_mut(id)
            .ok_or_else(|| DetectorError::EntityNotFound("layer".into()).into())
    }

    // --- Surface operations ---

    /// Inserts a surface owned by `layer`, with a back-reference to it.
    ///
    /// # Errors
    ///
    /// Returns an error if `layer` is not in the store.
    pub fn add_surface(
        &mut self,
        layer: LayerId,
        shape: impl Into<SurfaceShape>,
    ) -> Result<SurfaceId> {
        self.layer(layer)?;
        let mut data = SurfaceData::new(shape);
        data.layer = Some(layer);
        let id = self.surfaces.insert(data);
        self.layer_mut(layer)?.surfaces.push(id);
        Ok(id)
    }

    /// Inserts a surface that belongs to no layer.
    ///
    /// Fits can still use it when its layer is found by intersection
    /// search at fit time.
    pub fn add_free_surface(&mut self, shape: impl Into<SurfaceShape>) -> SurfaceId {
        self.surfaces.insert(SurfaceData::new(shape))
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData> {
        self.surfaces
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("surface".into()).into())
    }

    /// Looks up a surface by its hierarchical identifier.
    ///
    /// Only identifiers assigned by [`TrackingGeometry::assign_geometry_ids`]
    /// are indexed.
    #[must_use]
    pub fn find_surface(&self, geometry_id: GeometryId) -> Option<SurfaceId> {
        self.surface_lookup.get(&geometry_id).copied()
    }

    // --- Boundary operations ---

    /// Returns a reference to the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn boundary(&self, id: BoundaryId) -> Result<&BoundaryData> {
        self.boundaries
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("boundary".into()).into())
    }

    /// Attaches `neighbour` to the free side of a boundary surface, so
    /// that crossing it leads from one volume into the other.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is missing, or if both sides of
    /// the boundary are already taken.
    pub fn glue_boundary(&mut self, boundary: BoundaryId, neighbour: VolumeId) -> Result<()> {
        self.volume(neighbour)?;
        let data = self
            .boundaries
            .get_mut(boundary)
            .ok_or_else(|| DetectorError::EntityNotFound("boundary".into()))?;
        match (data.inside, data.outside) {
            (Some(_), None) => data.outside = Some(neighbour),
            (None, Some(_)) => data.inside = Some(neighbour),
            _ => {
                return Err(DetectorError::InvalidHierarchy(
                    "boundary surface already has volumes on both sides".into(),
                )
                .into())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Cylinder;

    fn barrel() -> (TrackingGeometry, VolumeId) {
        let mut geo = TrackingGeometry::new();
        let world = geo
            .add_volume("world", Isometry3::identity(), VolumeBounds::cylinder(0.0, 100.0, 200.0).unwrap())
            .unwrap();
        (geo, world)
    }

    #[test]
    fn volume_owns_its_boundaries() {
        let (geo, world) = barrel();
        let volume = geo.volume(world).unwrap();
        assert_eq!(volume.boundaries.len(), 3);
        for &b in &volume.boundaries {
            let boundary = geo.boundary(b).unwrap();
            assert_eq!(boundary.inside, Some(world));
            assert!(boundary.outside.is_none());
            assert!(geo.surface(boundary.surface).unwrap().layer.is_none());
        }
    }

    #[test]
    fn tube_volume_attaches_inner_wall_from_outside() {
        let mut geo = TrackingGeometry::new();
        let tube = geo
            .add_volume("tube", Isometry3::identity(), VolumeBounds::cylinder(20.0, 40.0, 100.0).unwrap())
            .unwrap();
        let boundaries = &geo.volume(tube).unwrap().boundaries;
        assert_eq!(boundaries.len(), 4);
        let inner = geo.boundary(boundaries[3]).unwrap();
        assert_eq!(inner.side, BoundarySide::Inner);
        assert_eq!(inner.outside, Some(tube));
        assert!(inner.inside.is_none());
        for &b in &boundaries[..3] {
            assert_eq!(geo.boundary(b).unwrap().side, BoundarySide::Outer);
        }
    }

    #[test]
    fn sectored_volume_flags_exactly_index_three() {
        let mut geo = TrackingGeometry::new();
        let bounds = VolumeBounds::cylinder_sector(0.0, 40.0, 100.0, 1.0).unwrap();
        let id = geo.add_volume("sector", Isometry3::identity(), bounds).unwrap();
        let sides: Vec<_> = geo
            .volume(id)
            .unwrap()
            .boundaries
            .iter()
            .map(|&b| geo.boundary(b).unwrap().side)
            .collect();
        assert_eq!(sides.len(), 5);
        for (i, side) in sides.iter().enumerate() {
            let expected = if i == 3 { BoundarySide::Inner } else { BoundarySide::Outer };
            assert_eq!(*side, expected, "boundary {i}");
        }
    }

    #[test]
    fn surfaces_point_back_to_their_layer() {
        let (mut geo, world) = barrel();
        let layer = geo
            .add_layer(world, Isometry3::identity(), VolumeBounds::cylinder(29.0, 31.0, 150.0).unwrap())
            .unwrap();
        let surface = geo.add_surface(layer, Cylinder::around_z(30.0).unwrap()).unwrap();
        assert_eq!(geo.surface(surface).unwrap().associated_layer(), Some(layer));
        assert_eq!(geo.layer(layer).unwrap().surfaces, vec![surface]);
        assert_eq!(geo.layer(layer).unwrap().volume, world);
        assert_eq!(geo.volume(world).unwrap().layers, vec![layer]);
    }

    #[test]
    fn confined_volume_records_mother() {
        let (mut geo, world) = barrel();
        let inner = geo
            .add_confined_volume(world, "pixel", Isometry3::identity(), VolumeBounds::cylinder(0.0, 50.0, 100.0).unwrap())
            .unwrap();
        assert_eq!(geo.volume(inner).unwrap().mother, Some(world));
        assert_eq!(geo.volume(world).unwrap().confined_volumes, vec![inner]);
        assert_eq!(geo.roots(), &[world]);
    }

    #[test]
    fn glue_fills_the_free_side_once() {
        let (mut geo, world) = barrel();
        let other = geo
            .add_volume("other", Isometry3::translation(0.0, 0.0, 400.0), VolumeBounds::cylinder(0.0, 100.0, 200.0).unwrap())
            .unwrap();
        let cap = geo.volume(world).unwrap().boundaries[1];
        geo.glue_boundary(cap, other).unwrap();
        assert_eq!(geo.boundary(cap).unwrap().outside, Some(other));
        assert!(geo.glue_boundary(cap, other).is_err());
    }

    #[test]
    fn stale_keys_are_reported() {
        let (mut geo, world) = barrel();
        let other = TrackingGeometry::new();
        let layer = geo
            .add_layer(world, Isometry3::identity(), VolumeBounds::cylinder(1.0, 2.0, 3.0).unwrap())
            .unwrap();
        assert!(other.layer(layer).is_err());
    }
}
