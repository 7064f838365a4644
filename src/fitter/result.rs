use std::collections::{BTreeMap, BTreeSet};

use crate::detector::SurfaceId;
use crate::error::{FitError, Result};
use crate::event_data::TrackState;

use super::MeasurementIndex;

/// Progress of one forward fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitStatus {
    /// The actor has not seen this result yet.
    #[default]
    Uninitialized,
    /// Track states are being processed as their surfaces are visited.
    Accumulating,
    /// Every track state has been processed.
    Complete,
    /// Every reachable track state has been processed, but some states
    /// were excluded when the fit was initialized, so the fit can never
    /// complete.
    Exhausted,
}

impl FitStatus {
    /// Whether no further updates will be applied.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Exhausted)
    }
}

/// Mutable context of one track fit.
///
/// Created by the caller from the ordered track states, driven by the
/// [`KalmanActor`](super::KalmanActor) during propagation and read back
/// once the navigator has finished.
#[derive(Debug, Clone, Default)]
pub struct FitResult {
    /// Input states, moved into `fitted_states` on initialization.
    pending: Vec<TrackState>,
    fitted_states: Vec<TrackState>,
    processed_states: usize,
    /// Positions that received at least one update attempt.
    processed_positions: BTreeSet<usize>,
    access_index: BTreeMap<SurfaceId, usize>,
    excluded: Vec<usize>,
    status: FitStatus,
}

impl FitResult {
    /// Creates a fit result for the given track states, in measurement
    /// order.
    #[must_use]
    pub fn new(track_states: Vec<TrackState>) -> Self {
        Self {
            pending: track_states,
            ..Self::default()
        }
    }

    /// Track states in their original order. Empty until the fit has been
    /// initialized.
    #[must_use]
    pub fn fitted_states(&self) -> &[TrackState] {
        &self.fitted_states
    }

    /// Number of surface visits that led to an update attempt. A surface
    /// visited twice before the fit finished counts twice.
    #[must_use]
    pub fn processed_states(&self) -> usize {
        self.processed_states
    }

    /// Number of distinct track states that received an update attempt.
    #[must_use]
    pub fn distinct_processed(&self) -> usize {
        self.processed_positions.len()
    }

    /// Whether the track state at `index` received an update attempt.
    #[must_use]
    pub fn is_processed(&self, index: usize) -> bool {
        self.processed_positions.contains(&index)
    }

    /// Surface to position in [`FitResult::fitted_states`].
    #[must_use]
    pub fn access_index(&self) -> &BTreeMap<SurfaceId, usize> {
        &self.access_index
    }

    /// Position of the track state measured on `surface`, if it is
    /// reachable.
    #[must_use]
    pub fn index_of(&self, surface: SurfaceId) -> Option<usize> {
        self.access_index.get(&surface).copied()
    }

    /// Positions of the track states that no update can reach.
    #[must_use]
    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    #[must_use]
    pub fn status(&self) -> FitStatus {
        self.status
    }

    /// Total number of track states in the fit.
    #[must_use]
    pub fn total(&self) -> usize {
        match self.status {
            FitStatus::Uninitialized => self.pending.len(),
            _ => self.fitted_states.len(),
        }
    }

    /// Number of track states that can be reached by an update.
    #[must_use]
    pub fn reachable(&self) -> usize {
        self.access_index.len()
    }

    /// Checks that every track state has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::IncompleteFit`] if any submitted state never
    /// received an update attempt, however often other states were
    /// visited.
    pub fn ensure_complete(&self) -> Result<()> {
        let total = self.total();
        if self.status == FitStatus::Complete && self.distinct_processed() == total {
            return Ok(());
        }
        Err(FitError::IncompleteFit {
            processed: self.distinct_processed(),
            total,
            excluded: self.excluded.len(),
        }
        .into())
    }

    /// Consumes the result, returning the track states in their original
    /// order.
    #[must_use]
    pub fn into_track_states(self) -> Vec<TrackState> {
        match self.status {
            FitStatus::Uninitialized => self.pending,
            _ => self.fitted_states,
        }
    }

    /// Takes ownership of the pending states and installs the index built
    /// for them.
    pub(crate) fn initialize(&mut self, index: MeasurementIndex) {
        self.fitted_states = std::mem::take(&mut self.pending);
        self.access_index = index.access;
        self.excluded = index.excluded;
        self.status = FitStatus::Accumulating;
    }

    pub(crate) fn pending_states(&self) -> &[TrackState] {
        &self.pending
    }

    pub(crate) fn state_mut(&mut self, index: usize) -> Option<&mut TrackState> {
        self.fitted_states.get_mut(index)
    }

    pub(crate) fn mark_processed(&mut self, index: usize) {
        self.processed_states += 1;
        self.processed_positions.insert(index);
    }

    pub(crate) fn set_status(&mut self, status: FitStatus) {
        self.status = status;
    }
}
