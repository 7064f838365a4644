//! Hierarchical identifier assignment.

use std::collections::BTreeMap;

use crate::error::{DetectorError, Result};
use crate::geometry::GeometryId;

use super::{LayerId, SurfaceId, TrackingGeometry, VolumeId};

/// Identifiers computed for the whole hierarchy, not yet written back.
#[derive(Default)]
struct Numbering {
    volumes: Vec<(VolumeId, GeometryId)>,
    layers: Vec<(LayerId, GeometryId)>,
    surfaces: BTreeMap<GeometryId, SurfaceId>,
}

impl TrackingGeometry {
    /// Assigns a [`GeometryId`] to every volume, boundary, layer and
    /// layer surface, and rebuilds the identifier lookup.
    ///
    /// Volumes are numbered from 1 in depth-first order over the roots;
    /// boundaries and layers from 1 within their volume; sensitive
    /// surfaces from 1 within their layer. Each child identifier is the
    /// parent identifier plus the child's field offset.
    ///
    /// Identifiers are written only once the whole hierarchy has been
    /// numbered, so on error the geometry keeps its previous identifiers
    /// and lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a counter overflows its identifier field.
    pub fn assign_geometry_ids(&mut self) -> Result<()> {
        let numbering = self.number_hierarchy()?;

        for (volume_id, gid) in numbering.volumes {
            if let Some(volume) = self.volumes.get_mut(volume_id) {
                volume.geometry_id = gid;
            }
        }
        for (layer_id, gid) in numbering.layers {
            if let Some(layer) = self.layers.get_mut(layer_id) {
                layer.geometry_id = gid;
            }
        }
        for (&gid, &surface_id) in &numbering.surfaces {
            if let Some(surface) = self.surfaces.get_mut(surface_id) {
                surface.geometry_id = gid;
            }
        }
        self.surface_lookup = numbering.surfaces;
        Ok(())
    }

    fn number_hierarchy(&self) -> Result<Numbering> {
        let mut order = Vec::with_capacity(self.volumes.len());
        let mut stack: Vec<VolumeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.volume(id)?.confined_volumes.iter().rev().copied());
        }

        let mut numbering = Numbering::default();
        for (index, &volume_id) in order.iter().enumerate() {
            let volume_gid = GeometryId::default()
                .with_volume(checked_field(index + 1, GeometryId::VOLUME_MASK, GeometryId::VOLUME_SHIFT, "volume")?);
            let volume = self.volume(volume_id)?;
            numbering.volumes.push((volume_id, volume_gid));

            for (b, &boundary_id) in volume.boundaries.iter().enumerate() {
                let offset = checked_field(b + 1, GeometryId::BOUNDARY_MASK, GeometryId::BOUNDARY_SHIFT, "boundary")?;
                let surface_id = self.boundary(boundary_id)?.surface;
                self.surface(surface_id)?;
                numbering
                    .surfaces
                    .insert(volume_gid + (offset << GeometryId::BOUNDARY_SHIFT), surface_id);
            }

            for (l, &layer_id) in volume.layers.iter().enumerate() {
                let offset = checked_field(l + 1, GeometryId::LAYER_MASK, GeometryId::LAYER_SHIFT, "layer")?;
                let layer_gid = volume_gid + (offset << GeometryId::LAYER_SHIFT);
                numbering.layers.push((layer_id, layer_gid));

                for (s, &surface_id) in self.layer(layer_id)?.surfaces.iter().enumerate() {
                    let offset = checked_field(s + 1, GeometryId::SENSITIVE_MASK, GeometryId::SENSITIVE_SHIFT, "sensitive")?;
                    self.surface(surface_id)?;
                    numbering
                        .surfaces
                        .insert(layer_gid + (offset << GeometryId::SENSITIVE_SHIFT), surface_id);
                }
            }
        }
        Ok(numbering)
    }
}

/// Converts a 1-based counter into a field value, failing when it does
/// not fit the field.
fn checked_field(counter: usize, mask: u64, shift: u32, field: &str) -> Result<u64> {
    let max = mask >> shift;
    match u64::try_from(counter) {
        Ok(value) if value <= max => Ok(value),
        _ => Err(DetectorError::InvalidHierarchy(format!(
            "{field} counter {counter} exceeds the identifier field maximum {max}"
        ))
        .into()),
    }
}
