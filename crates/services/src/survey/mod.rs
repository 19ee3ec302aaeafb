mod controller;
mod snapshot;

// Public API of the survey subsystem.
pub use crate::error::SubmitError;
pub use controller::{SubmitOutcome, SurveyController};
pub use snapshot::SurveySnapshot;
