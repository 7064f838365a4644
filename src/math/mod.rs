pub mod intersect_3d;

use std::f64::consts::{PI, TAU};

/// 2D point type, used for local surface coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rigid placement of a volume or layer in the global frame.
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Bound track parameters: `(loc0, loc1, phi, theta, q/p)`.
pub type BoundVector = nalgebra::Vector5<f64>;

/// Covariance of [`BoundVector`].
pub type BoundMatrix = nalgebra::Matrix5<f64>;

/// Number of bound track parameters.
pub const BOUND_SIZE: usize = 5;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Wraps an azimuthal angle into `(-pi, pi]`.
#[must_use]
pub fn wrap_phi(phi: f64) -> f64 {
    let wrapped = (phi + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Unit direction from azimuthal and polar angles.
#[must_use]
pub fn direction_from_angles(phi: f64, theta: f64) -> Vector3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vector3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Azimuthal and polar angles `(phi, theta)` of a direction.
///
/// The direction does not need to be normalized.
#[must_use]
pub fn angles_from_direction(direction: &Vector3) -> (f64, f64) {
    let phi = direction.y.atan2(direction.x);
    let theta = direction.x.hypot(direction.y).atan2(direction.z);
    (phi, theta)
}

/// Any unit vector perpendicular to `axis`.
#[must_use]
pub fn perpendicular_dir(axis: &Vector3) -> Vector3 {
    let reference = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    axis.cross(&reference).normalize()
}
