use thiserror::Error;

use crate::detector::SurfaceId;

/// Top-level error type for the track fitter.
#[derive(Debug, Error)]
pub enum TrackFitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Errors related to geometric construction and computation.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the detector hierarchy store.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),
}

/// Errors raised by the Kalman fit itself.
///
/// Soft failures (an unresolvable surface, a rejected update) are not
/// represented here; they are recorded on the fit result instead.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("track states {first} and {second} share surface {surface:?}")]
    DuplicateSurface {
        surface: SurfaceId,
        first: usize,
        second: usize,
    },

    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("fit incomplete: {processed} of {total} track states processed ({excluded} excluded)")]
    IncompleteFit {
        processed: usize,
        total: usize,
        excluded: usize,
    },
}

/// Convenience type alias for results using [`TrackFitError`].
pub type Result<T> = std::result::Result<T, TrackFitError>;
