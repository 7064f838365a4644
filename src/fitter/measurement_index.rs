use std::collections::BTreeMap;

use tracing::warn;

use crate::detector::{LayerId, SurfaceId, TrackingGeometry};
use crate::error::{FitError, Result};
use crate::event_data::TrackState;
use crate::geometry::Surface;

use super::{DuplicateSurfacePolicy, KalmanOptions, PropagatorState};

/// Surfaces awaiting a measurement, grouped by the layer they belong to.
///
/// Handed to the navigator so it can restrict its search to layers that
/// carry a measurement of the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementSurfaceIndex {
    entries: BTreeMap<LayerId, Vec<SurfaceId>>,
}

impl MeasurementSurfaceIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `surface` under `layer`. Registering the same pair twice
    /// has no effect.
    pub fn insert(&mut self, layer: LayerId, surface: SurfaceId) {
        let surfaces = self.entries.entry(layer).or_default();
        if !surfaces.contains(&surface) {
            surfaces.push(surface);
        }
    }

    /// Surfaces registered under `layer`, in registration order.
    #[must_use]
    pub fn surfaces_on(&self, layer: LayerId) -> &[SurfaceId] {
        self.entries.get(&layer).map_or(&[], Vec::as_slice)
    }

    /// Layers with at least one registered surface.
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.entries.keys().copied()
    }

    /// Whether `surface` is registered under any layer.
    #[must_use]
    pub fn contains_surface(&self, surface: SurfaceId) -> bool {
        self.entries.values().any(|s| s.contains(&surface))
    }

    /// Total number of (layer, surface) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of resolving the track states of one fit against the geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementIndex {
    /// Layer to surfaces, for the navigator.
    pub surfaces: MeasurementSurfaceIndex,
    /// Surface to position in the track state sequence.
    pub access: BTreeMap<SurfaceId, usize>,
    /// Sequence positions that can never be reached by an update, in
    /// ascending order.
    pub excluded: Vec<usize>,
}

/// Builds the per-fit [`MeasurementIndex`] from the ordered track states.
///
/// Each state's surface is resolved to a layer, either through the
/// surface's own layer association or, failing that, by intersecting the
/// surface from the current propagator position and locating the hit in
/// the world volume. States whose surface cannot be resolved are kept in
/// the sequence but excluded from the access map.
pub struct MeasurementIndexBuilder {
    options: KalmanOptions,
}

impl MeasurementIndexBuilder {
    /// Creates a new `MeasurementIndexBuilder` operation.
    #[must_use]
    pub fn new(options: KalmanOptions) -> Self {
        Self { options }
    }

    /// Resolves every track state, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if a track state refers to a surface that is not
    /// in `geometry`, or if two states share a surface and duplicates are
    /// rejected.
    pub fn execute<S: PropagatorState + ?Sized>(
        &self,
        geometry: &TrackingGeometry,
        state: &S,
        track_states: &[TrackState],
    ) -> Result<MeasurementIndex> {
        let mut index = MeasurementIndex::default();
        for (position, track_state) in track_states.iter().enumerate() {
            let surface = track_state.surface;
            let Some(layer) = self.resolve_layer(geometry, state, surface)? else {
                warn!(
                    target: "trackfit::kalman",
                    index = position,
                    surface = ?surface,
                    "no layer found for track state surface, state excluded"
                );
                index.excluded.push(position);
                continue;
            };

            if let Some(previous) = index.access.insert(surface, position) {
                match self.options.duplicate_surfaces {
                    DuplicateSurfacePolicy::Reject => {
                        return Err(FitError::DuplicateSurface {
                            surface,
                            first: previous,
                            second: position,
                        }
                        .into());
                    }
                    DuplicateSurfacePolicy::KeepLast => {
                        warn!(
                            target: "trackfit::kalman",
                            index = previous,
                            replaced_by = position,
                            surface = ?surface,
                            "track state shares its surface with a later one, state excluded"
                        );
                        index.excluded.push(previous);
                    }
                }
            }
            index.surfaces.insert(layer, surface);
        }
        index.excluded.sort_unstable();
        Ok(index)
    }

    /// Finds the layer carrying `surface`.
    ///
    /// Returns `Ok(None)` when the surface has no layer of its own and
    /// none can be found by intersection.
    ///
    /// # Errors
    ///
    /// Returns an error if `surface` is not in `geometry`.
    pub fn resolve_layer<S: PropagatorState + ?Sized>(
        &self,
        geometry: &TrackingGeometry,
        state: &S,
        surface: SurfaceId,
    ) -> Result<Option<LayerId>> {
        let data = geometry.surface(surface)?;
        if let Some(layer) = data.associated_layer() {
            return Ok(Some(layer));
        }
        if !self.options.resolve_by_intersection {
            return Ok(None);
        }
        let Some(world) = state.world_volume() else {
            return Ok(None);
        };
        let Some(hit) = data.shape.intersection_estimate(
            &state.position(),
            &state.direction(),
            state.navigation_direction(),
        ) else {
            return Ok(None);
        };
        Ok(geometry
            .locate_volume(world, &hit.position)
            .and_then(|volume| geometry.associated_layer(volume, &hit.position)))
    }
}
