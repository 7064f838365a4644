use nalgebra::{DMatrix, DVector};

use crate::event_data::{BoundIndex, BoundParameters, BoundState, TrackState};
use crate::math::{wrap_phi, BoundMatrix, BoundVector, BOUND_SIZE};

use super::Updator;

/// Kalman update in gain-matrix form.
///
/// With prediction `x`, `P`, projector `H` and measurement `m`, `V`:
///
/// ```text
/// r = m - H x            S = H P H^T + V
/// K = P H^T S^-1         x' = x + K r       P' = (1 - K H) P
/// ```
///
/// `S` is inverted through its Cholesky factor; a prediction without
/// covariance or a non positive-definite `S` yields no update. An
/// optional chi-square cut rejects outliers the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainMatrixUpdator {
    max_chi2: Option<f64>,
}

impl GainMatrixUpdator {
    /// Creates an updator without outlier rejection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects updates whose chi-square exceeds `max_chi2`.
    #[must_use]
    pub fn with_max_chi2(mut self, max_chi2: f64) -> Self {
        self.max_chi2 = Some(max_chi2);
        self
    }
}

impl Updator for GainMatrixUpdator {
    fn update(&self, track_state: &mut TrackState, predicted: &BoundState) -> Option<BoundParameters> {
        let measurement = track_state
            .calibrated
            .as_ref()
            .unwrap_or(&track_state.measurement);
        let parameters = &predicted.parameters;
        let covariance = parameters.covariance()?;

        let h = measurement.projector();
        let x = DVector::from_column_slice(parameters.vector().as_slice());
        let p = DMatrix::from_column_slice(BOUND_SIZE, BOUND_SIZE, covariance.as_slice());

        let mut residual = measurement.values() - &h * &x;
        for (row, index) in measurement.indices().iter().enumerate() {
            if *index == BoundIndex::Phi {
                residual[row] = wrap_phi(residual[row]);
            }
        }

        let hp = &h * &p;
        let s = &hp * h.transpose() + measurement.covariance();
        let cholesky = s.cholesky()?;

        let chi2 = residual.dot(&cholesky.solve(&residual));
        if !chi2.is_finite() || self.max_chi2.is_some_and(|max| chi2 > max) {
            return None;
        }

        // P and S are symmetric, so K^T = S^-1 H P
        let gain = cholesky.solve(&hp).transpose();
        let x_new = &x + &gain * &residual;
        let p_new = (DMatrix::identity(BOUND_SIZE, BOUND_SIZE) - &gain * &h) * &p;
        let p_new = (&p_new + p_new.transpose()) * 0.5;

        let mut vector = BoundVector::from_column_slice(x_new.as_slice());
        vector[BoundIndex::Phi.position()] = wrap_phi(vector[BoundIndex::Phi.position()]);
        let filtered = BoundParameters::new(
            parameters.surface(),
            vector,
            Some(BoundMatrix::from_column_slice(p_new.as_slice())),
            parameters.charge(),
        );

        track_state.filtered = Some(filtered.clone());
        track_state.chi2 = Some(chi2);
        Some(filtered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detector::SurfaceId;
    use crate::event_data::Measurement;

    fn predicted(variance: f64) -> BoundState {
        BoundState {
            parameters: BoundParameters::new(
                SurfaceId::default(),
                BoundVector::new(0.0, 1.0, 0.2, 1.0, 0.5),
                Some(BoundMatrix::identity() * variance),
                1.0,
            ),
            path_length: 10.0,
        }
    }

    #[test]
    fn update_pulls_towards_measurement() {
        let mut ts = TrackState::new(Measurement::local_2d(SurfaceId::default(), 0.3, 1.0, 0.1, 0.1));
        let filtered = GainMatrixUpdator::new().update(&mut ts, &predicted(1.0)).unwrap();

        // Weight of the measurement: 1 / (1 + 0.01)
        let expected = 0.3 / 1.01;
        assert!((filtered.vector()[0] - expected).abs() < 1e-12);
        assert!((filtered.vector()[1] - 1.0).abs() < 1e-12);
        // Unmeasured components are untouched by an uncorrelated update
        assert!((filtered.vector()[2] - 0.2).abs() < 1e-12);

        let cov = filtered.covariance().unwrap();
        assert!((cov[(0, 0)] - 0.01 / 1.01).abs() < 1e-12);
        assert!((cov[(2, 2)] - 1.0).abs() < 1e-12);
        assert!((cov - cov.transpose()).norm() < 1e-15);

        let chi2 = ts.chi2.unwrap();
        assert!((chi2 - 0.09 / 1.01).abs() < 1e-12);
        assert_eq!(ts.filtered.as_ref(), Some(&filtered));
    }

    #[test]
    fn calibrated_measurement_takes_precedence() {
        let mut ts = TrackState::new(Measurement::local_2d(SurfaceId::default(), 5.0, 5.0, 0.1, 0.1));
        ts.calibrated = Some(Measurement::local_2d(SurfaceId::default(), 0.0, 1.0, 0.1, 0.1));
        let filtered = GainMatrixUpdator::new().update(&mut ts, &predicted(1.0)).unwrap();
        assert!(filtered.vector()[0].abs() < 1e-12);
    }

    #[test]
    fn indefinite_innovation_gives_no_update() {
        let broken = Measurement::new(
            SurfaceId::default(),
            vec![BoundIndex::Loc0],
            DVector::from_vec(vec![0.3]),
            DMatrix::from_element(1, 1, -2.0),
        )
        .unwrap();
        let mut ts = TrackState::new(broken);
        assert!(GainMatrixUpdator::new().update(&mut ts, &predicted(1.0)).is_none());
        assert!(ts.filtered.is_none());
    }

    #[test]
    fn prediction_without_covariance_gives_no_update() {
        let mut state = predicted(1.0);
        state.parameters = BoundParameters::new(SurfaceId::default(), BoundVector::zeros(), None, 1.0);
        let mut ts = TrackState::new(Measurement::local_2d(SurfaceId::default(), 0.3, 1.0, 0.1, 0.1));
        assert!(GainMatrixUpdator::new().update(&mut ts, &state).is_none());
    }

    #[test]
    fn chi2_cut_rejects_outliers() {
        let mut ts = TrackState::new(Measurement::local_2d(SurfaceId::default(), 50.0, 1.0, 0.1, 0.1));
        let updator = GainMatrixUpdator::new().with_max_chi2(25.0);
        assert!(updator.update(&mut ts, &predicted(1.0)).is_none());
        assert!(ts.filtered.is_none());
    }

    #[test]
    fn phi_residual_wraps_around() {
        let near_pi = Measurement::new(
            SurfaceId::default(),
            vec![BoundIndex::Phi],
            DVector::from_vec(vec![-3.0]),
            DMatrix::identity(1, 1),
        )
        .unwrap();
        let mut state = predicted(1.0);
        let mut v = *state.parameters.vector();
        v[2] = 3.1;
        state.parameters = BoundParameters::new(SurfaceId::default(), v, Some(BoundMatrix::identity()), 1.0);

        let mut ts = TrackState::new(near_pi);
        let filtered = GainMatrixUpdator::new().update(&mut ts, &state).unwrap();
        let phi = filtered.vector()[2];
        // Moves across the +-pi seam instead of swinging through zero
        assert!(phi < -3.0, "phi = {phi}");
    }
}
