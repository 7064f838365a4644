mod cylinder;
mod disc;
mod perigee;
mod plane;

pub use cylinder::Cylinder;
pub use disc::Disc;
pub use perigee::Perigee;
pub use plane::Plane;

use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// Direction in which the navigator is propagating along the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationDirection {
    /// Along the momentum.
    #[default]
    Forward,
    /// Against the momentum.
    Backward,
    /// Either way; the nearest solution wins.
    Any,
}

impl NavigationDirection {
    /// Sign applied to the direction of motion (`Any` counts as forward).
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward | Self::Any => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// Whether a signed path length lies in this navigation direction.
    #[must_use]
    pub fn admits(self, path_length: f64) -> bool {
        match self {
            Self::Forward => path_length >= -TOLERANCE,
            Self::Backward => path_length <= TOLERANCE,
            Self::Any => true,
        }
    }

    /// Picks the nearest admissible path length among `candidates`.
    pub fn nearest(self, candidates: impl IntoIterator<Item = f64>) -> Option<f64> {
        candidates
            .into_iter()
            .filter(|&t| t.is_finite() && self.admits(t))
            .min_by(|a, b| a.abs().total_cmp(&b.abs()))
    }
}

/// Straight-line estimate of where a track meets a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Global intersection point.
    pub position: Point3,
    /// Signed path length from the start position, along the unit direction.
    pub path_length: f64,
}

/// A detector surface: something a track can cross and a measurement
/// can be expressed on.
pub trait Surface {
    /// Reference point of the surface.
    fn center(&self) -> Point3;

    /// Unit normal of the surface at (or nearest to) `position`.
    fn normal(&self, position: &Point3) -> Vector3;

    /// Estimates the straight-line intersection of the track through
    /// `position` along unit `direction`, restricted to `navigation`.
    ///
    /// Surface bounds are not checked.
    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection>;

    /// Expresses a global position in the local 2D frame of the surface.
    ///
    /// `direction` is only consulted by surfaces whose frame depends on it.
    fn global_to_local(&self, position: &Point3, direction: &Vector3) -> Point2;

    /// Inverse of [`Surface::global_to_local`].
    fn local_to_global(&self, local: &Point2, direction: &Vector3) -> Point3;
}

/// The concrete shape of a detector surface.
#[derive(Debug, Clone)]
pub enum SurfaceShape {
    /// A planar module, local `(u, v)`.
    Plane(Plane),
    /// A planar disc, local `(r, phi)`.
    Disc(Disc),
    /// A cylinder barrel, local `(r * phi, z)`.
    Cylinder(Cylinder),
    /// A perigee (line) surface, local `(d0, z0)`.
    Perigee(Perigee),
}

impl SurfaceShape {
    fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(s) => s,
            Self::Disc(s) => s,
            Self::Cylinder(s) => s,
            Self::Perigee(s) => s,
        }
    }
}

impl Surface for SurfaceShape {
    fn center(&self) -> Point3 {
        self.as_surface().center()
    }

    fn normal(&self, position: &Point3) -> Vector3 {
        self.as_surface().normal(position)
    }

    fn intersection_estimate(
        &self,
        position: &Point3,
        direction: &Vector3,
        navigation: NavigationDirection,
    ) -> Option<Intersection> {
        self.as_surface()
            .intersection_estimate(position, direction, navigation)
    }

    fn global_to_local(&self, position: &Point3, direction: &Vector3) -> Point2 {
        self.as_surface().global_to_local(position, direction)
    }

    fn local_to_global(&self, local: &Point2, direction: &Vector3) -> Point3 {
        self.as_surface().local_to_global(local, direction)
    }
}

impl From<Plane> for SurfaceShape {
    fn from(s: Plane) -> Self {
        Self::Plane(s)
    }
}

impl From<Disc> for SurfaceShape {
    fn from(s: Disc) -> Self {
        Self::Disc(s)
    }
}

impl From<Cylinder> for SurfaceShape {
    fn from(s: Cylinder) -> Self {
        Self::Cylinder(s)
    }
}

impl From<Perigee> for SurfaceShape {
    fn from(s: Perigee) -> Self {
        Self::Perigee(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_admits_only_positive_paths() {
        let nav = NavigationDirection::Forward;
        assert!(nav.admits(2.0));
        assert!(nav.admits(0.0));
        assert!(!nav.admits(-2.0));
        assert_eq!(nav.nearest([-1.0, 3.0, 2.0]), Some(2.0));
    }

    #[test]
    fn backward_admits_only_negative_paths() {
        let nav = NavigationDirection::Backward;
        assert_eq!(nav.nearest([-4.0, 1.0, -3.0]), Some(-3.0));
        assert_eq!(nav.nearest([1.0, 2.0]), None);
    }

    #[test]
    fn any_picks_the_closest() {
        assert_eq!(NavigationDirection::Any.nearest([-1.5, 3.0]), Some(-1.5));
        assert_eq!(NavigationDirection::Any.nearest([f64::NAN]), None);
    }
}
