pub mod measurement;
pub mod parameters;
pub mod track_state;

pub use measurement::{BoundIndex, Measurement};
pub use parameters::{BoundParameters, BoundState};
pub use track_state::TrackState;
