use std::sync::Arc;

use crate::event_data::{BoundParameters, BoundState, Measurement, TrackState};

/// Combines a prediction with the measurement of a track state.
///
/// Returns the updated parameters, or `None` when no update can be made
/// (e.g. a singular innovation covariance). Implementations may record
/// their result on the track state but must not depend on any other
/// mutable state, so one updator can serve many fits at once.
pub trait Updator {
    fn update(&self, track_state: &mut TrackState, predicted: &BoundState) -> Option<BoundParameters>;
}

/// Turns a raw measurement into one the updator can use, given the
/// predicted state on the measurement surface.
pub trait Calibrator {
    fn calibrate(&self, measurement: &Measurement, predicted: &BoundState) -> Measurement;
}

/// Updator that accepts the prediction unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidUpdator;

impl Updator for VoidUpdator {
    fn update(&self, track_state: &mut TrackState, predicted: &BoundState) -> Option<BoundParameters> {
        track_state.filtered = Some(predicted.parameters.clone());
        Some(predicted.parameters.clone())
    }
}

/// Calibrator that passes the raw measurement through.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidCalibrator;

impl Calibrator for VoidCalibrator {
    fn calibrate(&self, measurement: &Measurement, _predicted: &BoundState) -> Measurement {
        measurement.clone()
    }
}

impl<T: Updator + ?Sized> Updator for &T {
    fn update(&self, track_state: &mut TrackState, predicted: &BoundState) -> Option<BoundParameters> {
        (**self).update(track_state, predicted)
    }
}

impl<T: Updator + ?Sized> Updator for Arc<T> {
    fn update(&self, track_state: &mut TrackState, predicted: &BoundState) -> Option<BoundParameters> {
        (**self).update(track_state, predicted)
    }
}

impl<T: Calibrator + ?Sized> Calibrator for &T {
    fn calibrate(&self, measurement: &Measurement, predicted: &BoundState) -> Measurement {
        (**self).calibrate(measurement, predicted)
    }
}

impl<T: Calibrator + ?Sized> Calibrator for Arc<T> {
    fn calibrate(&self, measurement: &Measurement, predicted: &BoundState) -> Measurement {
        (**self).calibrate(measurement, predicted)
    }
}
