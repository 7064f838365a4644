use crate::error::{GeometryError, Result};
use crate::math::intersect_3d::{line_plane_intersect, LinePlaneRelation};
use crate::math::{perpendicular_dir, Point2, Point3, Vector3, TOLERANCE};

use super::{Intersection, NavigationDirection, Surface};

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir x v_dir`; local coordinates
/// are the projections onto `u_dir` and `v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let v_len = v_dir.norm();
        if v_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }

        let u_dir = u_dir / u_len;
        let normal = u_dir.cross(&(v_dir / v_len));
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;
        // Re-orthogonalize so the local frame is exact
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        let u_dir = perpendicular_dir(&normal);
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }
}

impl Surface for Plane {
    fn center(&self) -> Point3 {
        self.origin
    }

    fn normal(&self, _position: &Point3) -> Vector3 {
        self.normal
    }

    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection> {
        match line_plane_intersect(position, direction, &self.origin, &self.normal) {
            LinePlaneRelation::Point { point, t } if navigation.admits(t) => Some(Intersection {
                position: point,
                path_length: t,
            }),
            LinePlaneRelation::OnPlane => Some(Intersection {
                position: *position,
                path_length: 0.0,
            }),
            _ => None,
        }
    }

    fn global_to_local(&self, position: &Point3, _direction: &Vector3) -> Point2 {
        let dp = position - self.origin;
        Point2::new(dp.dot(&self.u_dir), dp.dot(&self.v_dir))
    }

    fn local_to_global(&self, local: &Point2, _direction: &Vector3) -> Point3 {
        self.origin + self.u_dir * local.x + self.v_dir * local.y
    }
}
