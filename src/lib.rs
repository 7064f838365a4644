pub mod detector;
pub mod error;
pub mod event_data;
pub mod fitter;
pub mod geometry;
pub mod math;

pub use error::{Result, TrackFitError};
