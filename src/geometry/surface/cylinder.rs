use crate::error::{GeometryError, Result};
use crate::math::intersect_3d::line_cylinder_roots;
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

use super::{Intersection, NavigationDirection, Surface};

/// A cylindrical barrel surface in 3D space.
///
/// Defined by a center point on the axis, radius, axis direction, and
/// a reference direction for `phi = 0`.
///
/// `P(phi, z) = center + radius * cos(phi) * ref_dir + radius * sin(phi) * binormal + z * axis`
/// where `binormal = axis x ref_dir`. Local coordinates are `(radius * phi, z)`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Arguments
    ///
    /// * `center` - A point on the cylinder axis
    /// * `radius` - Radius (must be positive)
    /// * `axis` - Axis direction (will be normalized)
    /// * `ref_dir` - Reference direction for `phi = 0` (must be perpendicular to axis)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, axis is zero-length,
    /// or the reference direction is not perpendicular to the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }

        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
    }

    /// Creates a cylinder of `radius` around the global z axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn around_z(radius: f64) -> Result<Self> {
        Self::new(Point3::origin(), radius, Vector3::z(), Vector3::x())
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Computes `(phi, z)` for a point, projecting it onto the cylinder.
    ///
    /// - `phi` = angle in `(-pi, pi]` (atan2-based)
    /// - `z` = signed distance along the axis from the center
    #[must_use]
    pub fn inverse(&self, point: &Point3) -> (f64, f64) {
        let dp = point - self.center;
        let z = dp.dot(&self.axis);
        let phi = dp.dot(&self.binormal()).atan2(dp.dot(&self.ref_dir));
        (phi, z)
    }

    /// Evaluates the surface point at `(phi, z)`.
    #[must_use]
    pub fn evaluate(&self, phi: f64, z: f64) -> Point3 {
        let (sin_phi, cos_phi) = phi.sin_cos();
        self.center
            + self.ref_dir * (self.radius * cos_phi)
            + self.binormal() * (self.radius * sin_phi)
            + self.axis * z
    }
}

impl Surface for Cylinder {
    fn center(&self) -> Point3 {
        self.center
    }

    fn normal(&self, position: &Point3) -> Vector3 {
        let (phi, _) = self.inverse(position);
        let (sin_phi, cos_phi) = phi.sin_cos();
        self.ref_dir * cos_phi + self.binormal() * sin_phi
    }

    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection> {
        let roots = line_cylinder_roots(position, direction, &self.center, &self.axis, self.radius);
        navigation.nearest(roots).map(|t| Intersection {
            position: position + direction * t,
            path_length: t,
        })
    }

    fn global_to_local(&self, position: &Point3, _direction: &Vector3) -> Point2 {
        let (phi, z) = self.inverse(position);
        Point2::new(self.radius * phi, z)
    }

    fn local_to_global(&self, local: &Point2, _direction: &Vector3) -> Point3 {
        self.evaluate(local.x / self.radius, local.y)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn evaluate_at_quarter_turn() {
        let c = Cylinder::around_z(2.0).unwrap();
        let p = c.evaluate(FRAC_PI_2, 1.0);
        assert!((p - Point3::new(0.0, 2.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn normal_points_outward() {
        let c = Cylinder::around_z(1.0).unwrap();
        let n = c.normal(&Point3::new(0.0, 1.0, 4.0));
        assert!((n - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn invalid_radius() {
        assert!(Cylinder::around_z(0.0).is_err());
        assert!(Cylinder::new(Point3::origin(), 1.0, Vector3::z(), Vector3::z()).is_err());
    }

    #[test]
    fn from_inside_forward_hits_far_wall_only() {
        let c = Cylinder::around_z(30.0).unwrap();
        let hit = c
            .intersection_estimate(&Point3::origin(), &Vector3::x(), NavigationDirection::Forward)
            .unwrap();
        assert!((hit.path_length - 30.0).abs() < 1e-9);
        assert!((hit.position - Point3::new(30.0, 0.0, 0.0)).norm() < 1e-9);

        let back = c
            .intersection_estimate(&Point3::origin(), &Vector3::x(), NavigationDirection::Backward)
            .unwrap();
        assert!((back.path_length + 30.0).abs() < 1e-9);
    }

    #[test]
    fn from_outside_takes_nearest_crossing() {
        let c = Cylinder::around_z(10.0).unwrap();
        let hit = c
            .intersection_estimate(
                &Point3::new(-50.0, 0.0, 0.0),
                &Vector3::x(),
                NavigationDirection::Forward,
            )
            .unwrap();
        assert!((hit.path_length - 40.0).abs() < 1e-9);
    }

    #[test]
    fn axial_track_never_intersects() {
        let c = Cylinder::around_z(10.0).unwrap();
        assert!(c
            .intersection_estimate(&Point3::origin(), &Vector3::z(), NavigationDirection::Any)
            .is_none());
    }

    #[test]
    fn local_frame_roundtrip() {
        let c = Cylinder::around_z(5.0).unwrap();
        let local = Point2::new(5.0 * 0.4, -12.0);
        let global = c.local_to_global(&local, &Vector3::x());
        let back = c.global_to_local(&global, &Vector3::x());
        assert!((back - local).norm() < 1e-9);
    }
}
