use crate::detector::SurfaceId;
use crate::error::{GeometryError, Result};
use crate::geometry::{Surface, SurfaceShape};
use crate::math::{
    angles_from_direction, direction_from_angles, wrap_phi, BoundMatrix, BoundVector, Point2,
    Point3, Vector3, TOLERANCE,
};

/// Track parameters expressed in the local frame of a surface:
/// `(loc0, loc1, phi, theta, q/p)`, optionally with covariance.
///
/// For neutral tracks the last component is `1/p`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameters {
    surface: SurfaceId,
    vector: BoundVector,
    covariance: Option<BoundMatrix>,
    charge: f64,
}

impl BoundParameters {
    /// Creates bound parameters from their components.
    #[must_use]
    pub fn new(
        surface: SurfaceId,
        vector: BoundVector,
        covariance: Option<BoundMatrix>,
        charge: f64,
    ) -> Self {
        Self {
            surface,
            vector,
            covariance,
            charge,
        }
    }

    /// Binds a free state (global position and momentum) to the frame of
    /// `shape`.
    ///
    /// The position is taken as is; it is the caller's job to have
    /// transported it onto the surface first.
    ///
    /// # Errors
    ///
    /// Returns an error if the momentum is zero.
    pub fn from_global(
        surface: SurfaceId,
        shape: &SurfaceShape,
        position: &Point3,
        momentum: &Vector3,
        charge: f64,
        covariance: Option<BoundMatrix>,
    ) -> Result<Self> {
        let p = momentum.norm();
        if p < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let direction = momentum / p;
        let local = shape.global_to_local(position, &direction);
        let (phi, theta) = angles_from_direction(&direction);
        let q_over_p = if charge.abs() < TOLERANCE {
            1.0 / p
        } else {
            charge / p
        };
        Ok(Self {
            surface,
            vector: BoundVector::new(local.x, local.y, phi, theta, q_over_p),
            covariance,
            charge,
        })
    }

    /// Returns the surface these parameters are bound to.
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Returns the parameter vector.
    #[must_use]
    pub fn vector(&self) -> &BoundVector {
        &self.vector
    }

    /// Returns the covariance, if any.
    #[must_use]
    pub fn covariance(&self) -> Option<&BoundMatrix> {
        self.covariance.as_ref()
    }

    /// Returns the charge.
    #[must_use]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Local position on the surface.
    #[must_use]
    pub fn local_position(&self) -> Point2 {
        Point2::new(self.vector[0], self.vector[1])
    }

    /// Unit direction of motion.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        direction_from_angles(wrap_phi(self.vector[2]), self.vector[3])
    }

    /// Momentum magnitude; infinite for `q/p = 0`.
    #[must_use]
    pub fn absolute_momentum(&self) -> f64 {
        let q_over_p = self.vector[4].abs();
        if q_over_p < f64::MIN_POSITIVE {
            return f64::INFINITY;
        }
        if self.charge.abs() < TOLERANCE {
            1.0 / q_over_p
        } else {
            self.charge.abs() / q_over_p
        }
    }

    /// Momentum vector.
    #[must_use]
    pub fn momentum(&self) -> Vector3 {
        self.direction() * self.absolute_momentum()
    }

    /// Global position, given the shape of the surface these parameters
    /// are bound to.
    #[must_use]
    pub fn position(&self, shape: &SurfaceShape) -> Point3 {
        shape.local_to_global(&self.local_position(), &self.direction())
    }
}

/// The propagated state bound to a surface, as returned by the
/// navigator's transport.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundState {
    /// Predicted parameters on the surface.
    pub parameters: BoundParameters,
    /// Path length accumulated by the propagation so far.
    pub path_length: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cylinder, Perigee, Plane};

    #[test]
    fn bind_to_cylinder_and_back() {
        let shape: SurfaceShape = Cylinder::around_z(30.0).unwrap().into();
        let position = Point3::new(0.0, 30.0, 12.0);
        let momentum = Vector3::new(0.5, 2.0, 1.0);
        let bound =
            BoundParameters::from_global(SurfaceId::default(), &shape, &position, &momentum, -1.0, None).unwrap();

        assert!((bound.vector()[0] - 30.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((bound.vector()[1] - 12.0).abs() < 1e-12);
        assert!(bound.vector()[4] < 0.0);
        assert!((bound.position(&shape) - position).norm() < 1e-9);
        assert!((bound.momentum() - momentum).norm() < 1e-9);
        assert!((bound.absolute_momentum() - momentum.norm()).abs() < 1e-12);
    }

    #[test]
    fn neutral_parameters_store_inverse_momentum() {
        let shape: SurfaceShape = Plane::from_normal(Point3::origin(), Vector3::x()).unwrap().into();
        let bound = BoundParameters::from_global(
            SurfaceId::default(),
            &shape,
            &Point3::origin(),
            &Vector3::new(4.0, 0.0, 0.0),
            0.0,
            None,
        )
        .unwrap();
        assert!((bound.vector()[4] - 0.25).abs() < 1e-15);
        assert!((bound.absolute_momentum() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn perigee_binding_uses_direction() {
        let shape: SurfaceShape = Perigee::new(Point3::origin()).into();
        let position = Point3::new(-0.5, 0.0, 3.0);
        let momentum = Vector3::new(0.0, 10.0, 0.0);
        let bound = BoundParameters::from_global(SurfaceId::default(), &shape, &position, &momentum, 1.0, None).unwrap();
        assert!((bound.vector()[0] - 0.5).abs() < 1e-12);
        assert!((bound.vector()[1] - 3.0).abs() < 1e-12);
        assert!((bound.position(&shape) - position).norm() < 1e-12);
    }

    #[test]
    fn zero_momentum_cannot_be_bound() {
        let shape: SurfaceShape = Perigee::new(Point3::origin()).into();
        let r = BoundParameters::from_global(SurfaceId::default(), &shape, &Point3::origin(), &Vector3::zeros(), 1.0, None);
        assert!(r.is_err());
    }
}
