//! Pitch estimation and labelling

pub mod estimator;
pub mod note;
pub mod portal;

pub use estimator::{PitchEstimator, SILENCE_HZ};
pub use note::{NoteLabel, NoteMapper, PitchClass};
pub use portal::{PortalFrequency, PortalScore, PortalScorer};
