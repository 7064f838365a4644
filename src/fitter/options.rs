/// What to do when two track states sit on the same surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSurfacePolicy {
    /// Fail the initialization with [`FitError::DuplicateSurface`](crate::error::FitError::DuplicateSurface).
    #[default]
    Reject,
    /// Keep the later state reachable; the earlier one is excluded.
    KeepLast,
}

/// Configuration of a [`KalmanActor`](super::KalmanActor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KalmanOptions {
    /// Handling of track states sharing a surface.
    pub duplicate_surfaces: DuplicateSurfacePolicy,
    /// Whether surfaces without a layer may be resolved by intersecting
    /// them from the start position and locating the hit.
    pub resolve_by_intersection: bool,
    /// Whether to signal stop once every reachable state is processed,
    /// even though some states were excluded.
    pub stop_on_exhaustion: bool,
}

impl Default for KalmanOptions {
    fn default() -> Self {
        Self {
            duplicate_surfaces: DuplicateSurfacePolicy::Reject,
            resolve_by_intersection: true,
            stop_on_exhaustion: false,
        }
    }
}

impl KalmanOptions {
    #[must_use]
    pub fn with_duplicate_surfaces(mut self, policy: DuplicateSurfacePolicy) -> Self {
        self.duplicate_surfaces = policy;
        self
    }

    #[must_use]
    pub fn with_resolve_by_intersection(mut self, enabled: bool) -> Self {
        self.resolve_by_intersection = enabled;
        self
    }

    #[must_use]
    pub fn with_stop_on_exhaustion(mut self, enabled: bool) -> Self {
        self.stop_on_exhaustion = enabled;
        self
    }
}
