use nalgebra::{DMatrix, DVector};

use crate::detector::SurfaceId;
use crate::error::{FitError, Result};
use crate::math::BOUND_SIZE;

/// Index of a component of the bound track parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundIndex {
    Loc0 = 0,
    Loc1 = 1,
    Phi = 2,
    Theta = 3,
    QOverP = 4,
}

impl BoundIndex {
    /// Position of this component in a bound parameter vector.
    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }
}

/// A measurement on a detector surface.
///
/// Measures a subset of the bound parameters, given by `indices`, with
/// values and covariance in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    surface: SurfaceId,
    indices: Vec<BoundIndex>,
    values: DVector<f64>,
    covariance: DMatrix<f64>,
}

impl Measurement {
    /// Creates a new measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no indices, an index repeats, or the
    /// values and covariance do not match the number of indices.
    pub fn new(
        surface: SurfaceId,
        indices: Vec<BoundIndex>,
        values: DVector<f64>,
        covariance: DMatrix<f64>,
    ) -> Result<Self> {
        let m = indices.len();
        if m == 0 || m > BOUND_SIZE {
            return Err(FitError::InvalidMeasurement(format!("{m} measured components")).into());
        }
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != m {
            return Err(FitError::InvalidMeasurement("repeated parameter index".into()).into());
        }
        if values.len() != m || covariance.nrows() != m || covariance.ncols() != m {
            return Err(FitError::InvalidMeasurement(format!(
                "{m} indices but {} values and a {}x{} covariance",
                values.len(),
                covariance.nrows(),
                covariance.ncols()
            ))
            .into());
        }
        Ok(Self {
            surface,
            indices,
            values,
            covariance,
        })
    }

    /// A two-dimensional local position measurement with uncorrelated
    /// resolutions.
    #[must_use]
    pub fn local_2d(surface: SurfaceId, loc0: f64, loc1: f64, sigma0: f64, sigma1: f64) -> Self {
        Self {
            surface,
            indices: vec![BoundIndex::Loc0, BoundIndex::Loc1],
            values: DVector::from_vec(vec![loc0, loc1]),
            covariance: DMatrix::from_diagonal(&DVector::from_vec(vec![sigma0 * sigma0, sigma1 * sigma1])),
        }
    }

    /// Returns the surface the measurement was recorded on.
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Returns the measured parameter indices.
    #[must_use]
    pub fn indices(&self) -> &[BoundIndex] {
        &self.indices
    }

    /// Returns the measured values.
    #[must_use]
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Returns the measurement covariance.
    #[must_use]
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Number of measured components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.indices.len()
    }

    /// Returns a copy with a different covariance of the same shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance shape does not match.
    pub fn with_covariance(&self, covariance: DMatrix<f64>) -> Result<Self> {
        Self::new(self.surface, self.indices.clone(), self.values.clone(), covariance)
    }

    /// Projection matrix `H` (`dimension x 5`) from bound parameters onto
    /// the measured components.
    #[must_use]
    pub fn projector(&self) -> DMatrix<f64> {
        let mut h = DMatrix::zeros(self.dimension(), BOUND_SIZE);
        for (row, index) in self.indices.iter().enumerate() {
            h[(row, index.position())] = 1.0;
        }
        h
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn projector_selects_measured_components() {
        let m = Measurement::new(
            SurfaceId::default(),
            vec![BoundIndex::Loc1, BoundIndex::Phi],
            DVector::from_vec(vec![1.0, 0.5]),
            DMatrix::identity(2, 2),
        )
        .unwrap();
        let h = m.projector();
        assert_eq!(h.shape(), (2, 5));
        assert!((h[(0, 1)] - 1.0).abs() < f64::EPSILON);
        assert!((h[(1, 2)] - 1.0).abs() < f64::EPSILON);
        assert!((h.sum() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let bad = Measurement::new(
            SurfaceId::default(),
            vec![BoundIndex::Loc0],
            DVector::from_vec(vec![1.0, 2.0]),
            DMatrix::identity(1, 1),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn repeated_index_is_rejected() {
        let bad = Measurement::new(
            SurfaceId::default(),
            vec![BoundIndex::Loc0, BoundIndex::Loc0],
            DVector::zeros(2),
            DMatrix::identity(2, 2),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn local_2d_uses_variances() {
        let m = Measurement::local_2d(SurfaceId::default(), 1.0, 2.0, 0.1, 0.2);
        assert_eq!(m.dimension(), 2);
        assert!((m.covariance()[(0, 0)] - 0.01).abs() < 1e-15);
        assert!((m.covariance()[(1, 1)] - 0.04).abs() < 1e-15);
        assert!(m.covariance()[(0, 1)].abs() < f64::EPSILON);
    }
}
