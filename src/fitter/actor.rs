use tracing::{debug, trace, warn};

use crate::detector::TrackingGeometry;
use crate::error::Result;
use crate::event_data::BoundParameters;
use crate::geometry::{NavigationDirection, SurfaceShape};

use super::{
    Calibrator, FitResult, FitStatus, KalmanOptions, MeasurementIndexBuilder, PropagatorState,
    Updator, VoidCalibrator, VoidUpdator,
};

/// Forward Kalman filter step, invoked by the navigator once per surface
/// it visits.
///
/// The actor itself holds no per-fit state: everything that changes
/// during a fit lives in the [`FitResult`] and the navigator state passed
/// to [`KalmanActor::act`], so one actor can drive any number of fits,
/// including concurrent ones.
///
/// On its first call for a given result, the actor resolves every track
/// state to its layer and hands the resulting index to the navigator. On
/// every call where the navigator sits on a surface with a pending
/// measurement, the propagated state is bound to that surface, the
/// measurement is calibrated and the updator combines both. A produced
/// update overwrites the propagated state; either way the state counts
/// as processed. Once every track state has been processed at least once
/// the navigator is asked to stop. A surface revisited before that point
/// is updated again and counts as another visit, but it never stands in
/// for a state that has not been reached yet.
#[derive(Debug, Clone, Default)]
pub struct KalmanActor<U = VoidUpdator, C = VoidCalibrator> {
    updator: U,
    calibrator: C,
    options: KalmanOptions,
}

impl<U: Updator, C: Calibrator> KalmanActor<U, C> {
    /// Creates an actor with default options.
    #[must_use]
    pub fn new(updator: U, calibrator: C) -> Self {
        Self {
            updator,
            calibrator,
            options: KalmanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: KalmanOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &KalmanOptions {
        &self.options
    }

    /// Runs one step of the fit for the navigator's current position.
    ///
    /// # Errors
    ///
    /// Returns an error if a track state refers to a surface missing from
    /// `geometry`, or if two track states share a surface and duplicates
    /// are rejected. Unresolvable surfaces and rejected updates are not
    /// errors; they are recorded on `result`.
    pub fn act<S: PropagatorState + ?Sized>(
        &self,
        geometry: &TrackingGeometry,
        state: &mut S,
        result: &mut FitResult,
    ) -> Result<()> {
        if result.status() == FitStatus::Uninitialized {
            self.initialize(geometry, state, result)?;
        }
        self.update(geometry, state, result)?;
        self.check_completion(state, result);
        Ok(())
    }

    fn initialize<S: PropagatorState + ?Sized>(
        &self,
        geometry: &TrackingGeometry,
        state: &mut S,
        result: &mut FitResult,
    ) -> Result<()> {
        let mut index = MeasurementIndexBuilder::new(self.options).execute(
            geometry,
            &*state,
            result.pending_states(),
        )?;
        debug!(
            target: "trackfit::kalman",
            nav = nav_tag(state.navigation_direction()),
            total = result.total(),
            reachable = index.access.len(),
            excluded = index.excluded.len(),
            layers = index.surfaces.layers().count(),
            "fit initialized"
        );
        state.set_external_surfaces(std::mem::take(&mut index.surfaces));
        result.initialize(index);
        Ok(())
    }

    fn update<S: PropagatorState + ?Sized>(
        &self,
        geometry: &TrackingGeometry,
        state: &mut S,
        result: &mut FitResult,
    ) -> Result<()> {
        let Some(surface) = state.current_surface() else {
            return Ok(());
        };
        let nav = nav_tag(state.navigation_direction());
        let Some(index) = result.index_of(surface) else {
            trace!(target: "trackfit::kalman", nav, surface = ?surface, "no measurement on surface");
            return Ok(());
        };
        if result.status().is_terminal() {
            debug!(target: "trackfit::kalman", nav, index, "fit already finished, surface ignored");
            return Ok(());
        }

        let shape = &geometry.surface(surface)?.shape;
        let predicted = state.bind(surface, shape);
        if let Some(track_state) = result.state_mut(index) {
            track_state.predicted = Some(predicted.parameters.clone());
            track_state.calibrated = Some(self.calibrator.calibrate(&track_state.measurement, &predicted));
            match self.updator.update(track_state, &predicted) {
                Some(filtered) => {
                    apply_update(state, shape, &filtered);
                    debug!(
                        target: "trackfit::kalman",
                        nav,
                        index,
                        chi2 = ?track_state.chi2,
                        path_length = predicted.path_length,
                        "track state filtered"
                    );
                }
                None => {
                    debug!(target: "trackfit::kalman", nav, index, "update rejected, propagated state kept");
                }
            }
        }
        result.mark_processed(index);
        trace!(
            target: "trackfit::kalman",
            nav,
            visits = result.processed_states(),
            processed = result.distinct_processed(),
            total = result.total(),
            "track state processed"
        );
        Ok(())
    }

    fn check_completion<S: PropagatorState + ?Sized>(&self, state: &mut S, result: &mut FitResult) {
        let processed = result.distinct_processed();
        let total = result.total();
        match result.status() {
            FitStatus::Complete => state.stop(),
            FitStatus::Exhausted => {
                if self.options.stop_on_exhaustion {
                    state.stop();
                }
            }
            _ if processed == total && result.excluded().is_empty() => {
                debug!(
                    target: "trackfit::kalman",
                    nav = nav_tag(state.navigation_direction()),
                    processed,
                    "all track states processed, stopping"
                );
                result.set_status(FitStatus::Complete);
                state.stop();
            }
            _ if !result.excluded().is_empty() && processed >= result.reachable() => {
                warn!(
                    target: "trackfit::kalman",
                    processed,
                    total,
                    excluded = ?result.excluded(),
                    "every reachable track state processed, fit cannot complete"
                );
                result.set_status(FitStatus::Exhausted);
                if self.options.stop_on_exhaustion {
                    state.stop();
                }
            }
            _ => {}
        }
    }
}

fn apply_update<S: PropagatorState + ?Sized>(
    state: &mut S,
    shape: &SurfaceShape,
    filtered: &BoundParameters,
) {
    let direction = filtered.direction();
    state.update(
        filtered.position(shape),
        direction.normalize(),
        filtered.absolute_momentum(),
    );
    if let Some(covariance) = filtered.covariance() {
        state.set_covariance(*covariance);
    }
}

fn nav_tag(direction: NavigationDirection) -> &'static str {
    match direction {
        NavigationDirection::Backward => "<-K",
        NavigationDirection::Forward | NavigationDirection::Any => "K->",
    }
}
