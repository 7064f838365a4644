use crate::error::{GeometryError, Result};
use crate::math::intersect_3d::line_line_closest_approach;
use crate::math::{perpendicular_dir, Point2, Point3, Vector3, TOLERANCE};

use super::{Intersection, NavigationDirection, Surface};

/// A perigee surface: the line through `position` along `axis`
/// (the beam line by default).
///
/// A track "intersects" it at its point of closest approach. Local
/// coordinates are the signed transverse distance `d0` and the
/// longitudinal position `z0` along the axis. The sign of `d0` follows
/// `(axis x direction) . (point - position)`, so the frame depends on
/// the track direction.
#[derive(Debug, Clone)]
pub struct Perigee {
    position: Point3,
    axis: Vector3,
}

impl Perigee {
    /// Creates a perigee surface around a line parallel to global z.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            axis: Vector3::z(),
        }
    }

    /// Creates a perigee surface around an arbitrary line.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is zero-length.
    pub fn with_axis(position: Point3, axis: Vector3) -> Result<Self> {
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            position,
            axis: axis / len,
        })
    }

    /// Returns the line direction.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Unit vector along which positive `d0` is measured for `direction`.
    fn radial_dir(&self, direction: &Vector3) -> Vector3 {
        let cross = self.axis.cross(direction);
        let len = cross.norm();
        if len < TOLERANCE {
            perpendicular_dir(&self.axis)
        } else {
            cross / len
        }
    }
}

impl Surface for Perigee {
    fn center(&self) -> Point3 {
        self.position
    }

    fn normal(&self, position: &Point3) -> Vector3 {
        let dp = position - self.position;
        let radial = dp - self.axis * dp.dot(&self.axis);
        let len = radial.norm();
        if len < TOLERANCE {
            perpendicular_dir(&self.axis)
        } else {
            radial / len
        }
    }

    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection> {
        let t = line_line_closest_approach(position, direction, &self.position, &self.axis)?;
        navigation.admits(t).then(|| Intersection {
            position: position + direction * t,
            path_length: t,
        })
    }

    fn global_to_local(&self, position: &Point3, direction: &Vector3) -> Point2 {
        let dp = position - self.position;
        let z0 = dp.dot(&self.axis);
        let radial = dp - self.axis * z0;
        let sign = if self.axis.cross(direction).dot(&radial) < 0.0 {
            -1.0
        } else {
            1.0
        };
        Point2::new(sign * radial.norm(), z0)
    }

    fn local_to_global(&self, local: &Point2, direction: &Vector3) -> Point3 {
        self.position + self.axis * local.y + self.radial_dir(direction) * local.x
    }
}
