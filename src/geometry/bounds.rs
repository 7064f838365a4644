use std::f64::consts::PI;

use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point3, Vector3, TOLERANCE};

use super::surface::{Cylinder, Disc, Plane, SurfaceShape};

/// Shape of a detector volume (or of a layer's envelope), expressed in
/// the local frame of its placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeBounds {
    /// An axis-aligned box given by its half lengths.
    Cuboid {
        half_x: f64,
        half_y: f64,
        half_z: f64,
    },
    /// A (possibly hollow, possibly phi-sectored) cylinder around local z.
    Cylinder {
        r_min: f64,
        r_max: f64,
        half_z: f64,
        half_phi: f64,
    },
}

impl VolumeBounds {
    /// Creates cuboid bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if any half length is non-positive.
    pub fn cuboid(half_x: f64, half_y: f64, half_z: f64) -> Result<Self> {
        for (parameter, value) in [("half_x", half_x), ("half_y", half_y), ("half_z", half_z)] {
            if value < TOLERANCE {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: TOLERANCE,
                    max: f64::INFINITY,
                }
                .into());
            }
        }
        Ok(Self::Cuboid {
            half_x,
            half_y,
            half_z,
        })
    }

    /// Creates full-azimuth cylinder bounds. `r_min = 0` gives a solid cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radii are not ordered or `half_z` is non-positive.
    pub fn cylinder(r_min: f64, r_max: f64, half_z: f64) -> Result<Self> {
        Self::cylinder_sector(r_min, r_max, half_z, PI)
    }

    /// Creates cylinder bounds restricted to `|phi| <= half_phi`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radii are not ordered, `half_z` is
    /// non-positive, or `half_phi` is outside `(0, pi]`.
    pub fn cylinder_sector(r_min: f64, r_max: f64, half_z: f64, half_phi: f64) -> Result<Self> {
        if r_min < 0.0 || r_max <= r_min + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "r_max",
                value: r_max,
                min: r_min.max(0.0),
                max: f64::INFINITY,
            }
            .into());
        }
        if half_z < TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "half_z",
                value: half_z,
                min: TOLERANCE,
                max: f64::INFINITY,
            }
            .into());
        }
        if half_phi < TOLERANCE || half_phi > PI + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "half_phi",
                value: half_phi,
                min: 0.0,
                max: PI,
            }
            .into());
        }
        Ok(Self::Cylinder {
            r_min,
            r_max,
            half_z,
            half_phi: half_phi.min(PI),
        })
    }

    /// Whether these are cylinder bounds.
    #[must_use]
    pub fn is_cylinder(&self) -> bool {
        matches!(self, Self::Cylinder { .. })
    }

    /// Whether a point given in the local frame lies inside the bounds,
    /// with `tolerance` applied on every face.
    #[must_use]
    pub fn contains(&self, local: &Point3, tolerance: f64) -> bool {
        match *self {
            Self::Cuboid {
                half_x,
                half_y,
                half_z,
            } => {
                local.x.abs() <= half_x + tolerance
                    && local.y.abs() <= half_y + tolerance
                    && local.z.abs() <= half_z + tolerance
            }
            Self::Cylinder {
                r_min,
                r_max,
                half_z,
                half_phi,
            } => {
                let r = local.x.hypot(local.y);
                if r < r_min - tolerance || r > r_max + tolerance {
                    return false;
                }
                if local.z.abs() > half_z + tolerance {
                    return false;
                }
                // The axis itself belongs to every sector of a solid cylinder
                half_phi >= PI || r < tolerance || local.y.atan2(local.x).abs() <= half_phi + tolerance
            }
        }
    }

    /// Decomposes the bounds into their boundary surfaces, placed by
    /// `transform`.
    ///
    /// Cylinder order: negative disc, positive disc, outer tube, inner
    /// tube (only when `r_min > 0`), then the two sector planes at
    /// `-half_phi` and `+half_phi` (only when `half_phi < pi`).
    /// Cuboid order: `-x`, `+x`, `-y`, `+y`, `-z`, `+z`.
    ///
    /// # Errors
    ///
    /// Returns an error if a surface cannot be constructed (degenerate transform).
    pub fn decompose_to_surfaces(&self, transform: &Isometry3) -> Result<Vec<SurfaceShape>> {
        let center = transform * Point3::origin();
        let ex = transform * Vector3::x();
        let ey = transform * Vector3::y();
        let ez = transform * Vector3::z();

        let mut surfaces = Vec::new();
        match *self {
            Self::Cuboid {
                half_x,
                half_y,
                half_z,
            } => {
                // Each face gets an outward normal
                surfaces.push(Plane::new(center - ex * half_x, ez, ey)?.into());
                surfaces.push(Plane::new(center + ex * half_x, ey, ez)?.into());
                surfaces.push(Plane::new(center - ey * half_y, ex, ez)?.into());
                surfaces.push(Plane::new(center + ey * half_y, ez, ex)?.into());
                surfaces.push(Plane::new(center - ez * half_z, ey, ex)?.into());
                surfaces.push(Plane::new(center + ez * half_z, ex, ey)?.into());
            }
            Self::Cylinder {
                r_min,
                r_max,
                half_z,
                half_phi,
            } => {
                surfaces.push(Disc::from_plane(Plane::new(center - ez * half_z, ex, -ey)?).into());
                surfaces.push(Disc::from_plane(Plane::new(center + ez * half_z, ex, ey)?).into());
                surfaces.push(Cylinder::new(center, r_max, ez, ex)?.into());
                if r_min > TOLERANCE {
                    surfaces.push(Cylinder::new(center, r_min, ez, ex)?.into());
                }
                if half_phi < PI - TOLERANCE {
                    // Normals point away from the sector: -e_phi at -half_phi, +e_phi at +half_phi
                    let (sin_phi, cos_phi) = half_phi.sin_cos();
                    let lower = ex * cos_phi - ey * sin_phi;
                    let upper = ex * cos_phi + ey * sin_phi;
                    surfaces.push(Plane::new(center, lower, ez)?.into());
                    surfaces.push(Plane::new(center, ez, upper)?.into());
                }
            }
        }
        Ok(surfaces)
    }
}
