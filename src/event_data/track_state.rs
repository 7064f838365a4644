use crate::detector::SurfaceId;

use super::{BoundParameters, Measurement};

/// One measurement slot of a track fit.
///
/// Created from a raw measurement before the fit; the forward pass fills
/// in the calibrated measurement, the predicted parameters and, when the
/// update succeeds, the filtered parameters. A later smoothing pass reads
/// them back in sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Surface the measurement lies on.
    pub surface: SurfaceId,
    /// The raw measurement.
    pub measurement: Measurement,
    /// Measurement after calibration against the prediction.
    pub calibrated: Option<Measurement>,
    /// Parameters transported onto the surface, before the update.
    pub predicted: Option<BoundParameters>,
    /// Parameters after combining the prediction with the measurement.
    pub filtered: Option<BoundParameters>,
    /// Chi-square contribution of the filtered state.
    pub chi2: Option<f64>,
}

impl TrackState {
    /// Creates an unprocessed track state for a measurement.
    #[must_use]
    pub fn new(measurement: Measurement) -> Self {
        Self {
            surface: measurement.surface(),
            measurement,
            calibrated: None,
            predicted: None,
            filtered: None,
            chi2: None,
        }
    }

    /// Whether an update has produced filtered parameters for this state.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filtered.is_some()
    }
}
