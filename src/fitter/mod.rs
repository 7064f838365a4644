mod actor;
mod components;
mod gain_matrix;
mod measurement_index;
mod options;
mod propagator;
mod result;

#[cfg(test)]
pub(crate) mod test_support;

pub use actor::KalmanActor;
pub use components::{Calibrator, Updator, VoidCalibrator, VoidUpdator};
pub use gain_matrix::GainMatrixUpdator;
pub use measurement_index::{MeasurementIndex, MeasurementIndexBuilder, MeasurementSurfaceIndex};
pub use options::{DuplicateSurfacePolicy, KalmanOptions};
pub use propagator::PropagatorState;
pub use result::{FitResult, FitStatus};
