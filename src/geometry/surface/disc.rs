use crate::error::Result;
use crate::math::{Point2, Point3, Vector3};

use super::{Intersection, NavigationDirection, Plane, Surface};

/// A planar disc, as used for end-cap modules.
///
/// Shares the plane's intersection behaviour but expresses local
/// positions in polar coordinates `(r, phi)` around the origin, with
/// `phi = 0` along the plane's U direction.
#[derive(Debug, Clone)]
pub struct Disc {
    plane: Plane,
}

impl Disc {
    /// Creates a disc centered at `center` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn new(center: Point3, normal: Vector3) -> Result<Self> {
        Ok(Self {
            plane: Plane::from_normal(center, normal)?,
        })
    }

    /// Creates a disc from an existing plane frame.
    #[must_use]
    pub fn from_plane(plane: Plane) -> Self {
        Self { plane }
    }

    /// Returns the supporting plane.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }
}

impl Surface for Disc {
    fn center(&self) -> Point3 {
        *self.plane.origin()
    }

    fn normal(&self, position: &Point3) -> Vector3 {
        self.plane.normal(position)
    }

    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection> {
        self.plane
            .intersection_estimate(position, direction, navigation)
    }

    fn global_to_local(&self, position: &Point3, direction: &Vector3) -> Point2 {
        let cartesian = self.plane.global_to_local(position, direction);
        Point2::new(cartesian.x.hypot(cartesian.y), cartesian.y.atan2(cartesian.x))
    }

    fn local_to_global(&self, local: &Point2, direction: &Vector3) -> Point3 {
        let (sin_phi, cos_phi) = local.y.sin_cos();
        let cartesian = Point2::new(local.x * cos_phi, local.x * sin_phi);
        self.plane.local_to_global(&cartesian, direction)
    }
}
