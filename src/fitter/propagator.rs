use crate::detector::{SurfaceId, VolumeId};
use crate::event_data::BoundState;
use crate::geometry::{NavigationDirection, SurfaceShape};
use crate::math::{BoundMatrix, Point3, Vector3};

use super::MeasurementSurfaceIndex;

/// The navigator/stepper state the Kalman actor is driven with.
///
/// Propagation itself (stepping through field and material, choosing the
/// next surface) happens elsewhere; the actor only reads the current
/// kinematics, asks for a transport onto the current surface, and writes
/// back the updated state.
pub trait PropagatorState {
    /// Current global position.
    fn position(&self) -> Point3;

    /// Current unit direction of motion.
    fn direction(&self) -> Vector3;

    /// Direction the navigator is propagating in.
    fn navigation_direction(&self) -> NavigationDirection;

    /// Surface the navigator is currently on, if any.
    fn current_surface(&self) -> Option<SurfaceId>;

    /// World volume used for point location, if available.
    fn world_volume(&self) -> Option<VolumeId>;

    /// Transports the current state onto `surface` and expresses it in the
    /// surface's local frame.
    fn bind(&mut self, surface: SurfaceId, shape: &SurfaceShape) -> BoundState;

    /// Overwrites position, unit direction and momentum magnitude.
    fn update(&mut self, position: Point3, direction: Vector3, momentum: f64);

    /// Overwrites the covariance of the propagated state.
    fn set_covariance(&mut self, covariance: BoundMatrix);

    /// Hands the surfaces awaiting a measurement to the navigator.
    fn set_external_surfaces(&mut self, surfaces: MeasurementSurfaceIndex);

    /// Asks the navigator to stop propagating. Advisory; may be called
    /// more than once.
    fn stop(&mut self);
}
