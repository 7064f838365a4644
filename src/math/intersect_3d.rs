use super::{Point3, Vector3, TOLERANCE};

/// Relationship of a straight line with a plane.
#[derive(Debug)]
pub enum LinePlaneRelation {
    /// Line intersects the plane at a single point, `t` along the line.
    Point { point: Point3, t: f64 },
    /// Line is parallel to the plane (does not intersect).
    Parallel,
    /// Line lies entirely on the plane.
    OnPlane,
}

/// Computes the intersection of a line `origin + t * dir` with the plane
/// through `plane_origin` with unit `normal`.
#[must_use]
pub fn line_plane_intersect(
    origin: &Point3,
    dir: &Vector3,
    plane_origin: &Point3,
    normal: &Vector3,
) -> LinePlaneRelation {
    let denom = normal.dot(dir);
    let numer = normal.dot(&(plane_origin - origin));

    if denom.abs() < TOLERANCE {
        if numer.abs() < TOLERANCE {
            LinePlaneRelation::OnPlane
        } else {
            LinePlaneRelation::Parallel
        }
    } else {
        let t = numer / denom;
        LinePlaneRelation::Point {
            point: origin + dir * t,
            t,
        }
    }
}

/// Line parameters at which `origin + t * dir` crosses an infinite
/// cylinder of `radius` around the line `center + s * axis`.
///
/// `axis` must be a unit vector. Roots are returned in ascending order;
/// a tangent line yields a single root.
#[must_use]
pub fn line_cylinder_roots(
    origin: &Point3,
    dir: &Vector3,
    center: &Point3,
    axis: &Vector3,
    radius: f64,
) -> Vec<f64> {
    // Project onto the plane perpendicular to the cylinder axis
    let dp = origin - center;
    let dp_perp = dp - axis * dp.dot(axis);
    let dir_perp = dir - axis * dir.dot(axis);

    // |dp_perp + t * dir_perp|^2 = r^2
    let a = dir_perp.dot(&dir_perp);
    let b = 2.0 * dp_perp.dot(&dir_perp);
    let c = dp_perp.dot(&dp_perp) - radius * radius;

    if a < TOLERANCE {
        // Moving parallel to the axis never crosses the mantle
        return Vec::new();
    }

    let disc = b * b - 4.0 * a * c;
    if disc < -TOLERANCE {
        return Vec::new();
    }
    let disc = disc.max(0.0).sqrt();
    let t1 = (-b - disc) / (2.0 * a);
    let t2 = (-b + disc) / (2.0 * a);
    if (t2 - t1).abs() < TOLERANCE {
        vec![t1]
    } else {
        vec![t1, t2]
    }
}

/// Line parameter `t` of the point on `origin + t * dir` closest to the
/// line `line_point + s * line_axis`.
///
/// Returns `None` when the two lines are parallel. `line_axis` must be a
/// unit vector.
#[must_use]
pub fn line_line_closest_approach(
    origin: &Point3,
    dir: &Vector3,
    line_point: &Point3,
    line_axis: &Vector3,
) -> Option<f64> {
    let d_dot_a = dir.dot(line_axis);
    let denom = dir.dot(dir) - d_dot_a * d_dot_a;
    if denom < TOLERANCE {
        return None;
    }
    let w = line_point - origin;
    Some((w.dot(dir) - d_dot_a * w.dot(line_axis)) / denom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_hits_plane() {
        let rel = line_plane_intersect(
            &Point3::new(0.0, 0.0, 5.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &Point3::origin(),
            &Vector3::z(),
        );
        match rel {
            LinePlaneRelation::Point { point, t } => {
                assert!((t - 5.0).abs() < TOLERANCE);
                assert!(point.coords.norm() < TOLERANCE);
            }
            other => panic!("expected Point, got {other:?}"),
        }
    }

    #[test]
    fn line_parallel_to_plane() {
        let rel = line_plane_intersect(
            &Point3::new(0.0, 0.0, 1.0),
            &Vector3::x(),
            &Point3::origin(),
            &Vector3::z(),
        );
        assert!(matches!(rel, LinePlaneRelation::Parallel));
    }

    #[test]
    fn line_on_plane() {
        let rel = line_plane_intersect(&Point3::origin(), &Vector3::x(), &Point3::origin(), &Vector3::z());
        assert!(matches!(rel, LinePlaneRelation::OnPlane));
    }

    #[test]
    fn radial_line_crosses_cylinder_twice() {
        let roots = line_cylinder_roots(
            &Point3::origin(),
            &Vector3::x(),
            &Point3::origin(),
            &Vector3::z(),
            3.0,
        );
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 3.0).abs() < 1e-9);
        assert!((roots[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn axial_line_misses_cylinder() {
        let roots = line_cylinder_roots(
            &Point3::new(1.0, 0.0, 0.0),
            &Vector3::z(),
            &Point3::origin(),
            &Vector3::z(),
            3.0,
        );
        assert!(roots.is_empty());
    }

    #[test]
    fn tangent_line_has_single_root() {
        let roots = line_cylinder_roots(
            &Point3::new(-5.0, 2.0, 0.0),
            &Vector3::x(),
            &Point3::origin(),
            &Vector3::z(),
            2.0,
        );
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn closest_approach_to_beam_line() {
        // Track passing x = 2 parallel to y; beam line along z
        let t = line_line_closest_approach(
            &Point3::new(2.0, -4.0, 1.0),
            &Vector3::y(),
            &Point3::origin(),
            &Vector3::z(),
        )
        .unwrap();
        assert!((t - 4.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_lines_have_no_closest_approach() {
        let t = line_line_closest_approach(&Point3::new(1.0, 0.0, 0.0), &Vector3::z(), &Point3::origin(), &Vector3::z());
        assert!(t.is_none());
    }
}
