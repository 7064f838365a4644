//! Shared fixtures for fitter tests: a small barrel detector and a
//! scripted navigator state that moves on straight lines.

#![allow(clippy::unwrap_used)]

use crate::detector::{LayerId, SurfaceId, TrackingGeometry, VolumeId};
use crate::event_data::{BoundParameters, BoundState, Measurement, TrackState};
use crate::geometry::surface::Cylinder;
use crate::geometry::{NavigationDirection, Surface, SurfaceShape, VolumeBounds};
use crate::math::{angles_from_direction, BoundMatrix, BoundVector, Isometry3, Point3, Vector3};

use super::{MeasurementSurfaceIndex, PropagatorState};

/// Installs a test log writer once per process; `RUST_LOG` selects the
/// level.
pub(crate) fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

pub(crate) struct Barrel {
    pub geometry: TrackingGeometry,
    pub world: VolumeId,
    pub layers: [LayerId; 3],
    pub surfaces: [SurfaceId; 3],
}

pub(crate) const LAYER_RADII: [f64; 3] = [30.0, 60.0, 90.0];

/// One world volume with three cylinder layers at r = 30, 60, 90, each
/// carrying one sensitive cylinder surface.
pub(crate) fn barrel() -> Barrel {
    let mut geometry = TrackingGeometry::new();
    let world = geometry
        .add_volume("world", Isometry3::identity(), VolumeBounds::cylinder(0.0, 200.0, 500.0).unwrap())
        .unwrap();
    let mut layers = Vec::new();
    let mut surfaces = Vec::new();
    for r in LAYER_RADII {
        let layer = geometry
            .add_layer(world, Isometry3::identity(), VolumeBounds::cylinder(r - 2.0, r + 2.0, 400.0).unwrap())
            .unwrap();
        surfaces.push(geometry.add_surface(layer, Cylinder::around_z(r).unwrap()).unwrap());
        layers.push(layer);
    }
    Barrel {
        geometry,
        world,
        layers: layers.try_into().unwrap(),
        surfaces: surfaces.try_into().unwrap(),
    }
}

/// One local position measurement per surface, at the point where a
/// track along +x from the origin crosses a barrel cylinder.
pub(crate) fn measured_states(surfaces: &[SurfaceId]) -> Vec<TrackState> {
    surfaces
        .iter()
        .map(|&s| TrackState::new(Measurement::local_2d(s, 0.0, 0.0, 0.1, 0.1)))
        .collect()
}

/// Navigator state driven by the test: the test decides which surface is
/// visited next, the state moves there in a straight line.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedState {
    pub position: Point3,
    pub direction: Vector3,
    pub momentum: f64,
    pub charge: f64,
    pub covariance: BoundMatrix,
    pub navigation: NavigationDirection,
    pub current: Option<SurfaceId>,
    pub world: Option<VolumeId>,
    pub path_length: f64,
    pub external: Option<MeasurementSurfaceIndex>,
    pub stops: usize,
}

impl ScriptedState {
    pub(crate) fn new(position: Point3, direction: Vector3, world: Option<VolumeId>) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            momentum: 1.0,
            charge: 1.0,
            covariance: BoundMatrix::identity(),
            navigation: NavigationDirection::Forward,
            current: None,
            world,
            path_length: 0.0,
            external: None,
            stops: 0,
        }
    }

    /// Moves onto `surface`, preferring a forward intersection.
    pub(crate) fn visit(&mut self, geometry: &TrackingGeometry, surface: SurfaceId) {
        let shape = &geometry.surface(surface).unwrap().shape;
        let hit = shape
            .intersection_estimate(&self.position, &self.direction, NavigationDirection::Forward)
            .or_else(|| shape.intersection_estimate(&self.position, &self.direction, NavigationDirection::Any));
        if let Some(hit) = hit {
            self.position = hit.position;
            self.path_length += hit.path_length;
        }
        self.current = Some(surface);
    }

    /// Leaves the current surface.
    pub(crate) fn leave(&mut self) {
        self.current = None;
    }
}

impl PropagatorState for ScriptedState {
    fn position(&self) -> Point3 {
        self.position
    }

    fn direction(&self) -> Vector3 {
        self.direction
    }

    fn navigation_direction(&self) -> NavigationDirection {
        self.navigation
    }

    fn current_surface(&self) -> Option<SurfaceId> {
        self.current
    }

    fn world_volume(&self) -> Option<VolumeId> {
        self.world
    }

    fn bind(&mut self, surface: SurfaceId, shape: &SurfaceShape) -> BoundState {
        let local = shape.global_to_local(&self.position, &self.direction);
        let (phi, theta) = angles_from_direction(&self.direction);
        let vector = BoundVector::new(local.x, local.y, phi, theta, self.charge / self.momentum);
        BoundState {
            parameters: BoundParameters::new(surface, vector, Some(self.covariance), self.charge),
            path_length: self.path_length,
        }
    }

    fn update(&mut self, position: Point3, direction: Vector3, momentum: f64) {
        self.position = position;
        self.direction = direction;
        self.momentum = momentum;
    }

    fn set_covariance(&mut self, covariance: BoundMatrix) {
        self.covariance = covariance;
    }

    fn set_external_surfaces(&mut self, surfaces: MeasurementSurfaceIndex) {
        self.external = Some(surfaces);
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}
