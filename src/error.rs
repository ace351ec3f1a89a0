//! Error types for the report wizard and its collaborators.

use crate::wizard::{Requirement, Step};

/// Failures of a wizard operation. None of these change wizard state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// A required field of the current step is missing.
    #[error("please complete this step before continuing: {0} is required")]
    Incomplete(Requirement),

    /// The field is not edited at the current step.
    #[error("{field} is not editable at step {step}")]
    NotEditable { field: &'static str, step: Step },

    #[error("already at the first step")]
    NoPreviousStep,

    #[error("the details step has no next step; submit the report instead")]
    NoNextStep,

    /// `submit` was called before the details step.
    #[error("report can only be submitted from the details step (currently at step {0})")]
    NotAtDetails(Step),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// A photo read or location lookup has not landed in the draft yet.
    #[error("wait for the {0} to finish before submitting")]
    Pending(&'static str),

    #[error("report has already been submitted; reset to start another")]
    AlreadySubmitted,
}

/// Failures while turning a photo into a preview.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("reading image {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is not an accepted image type")]
    Unsupported { name: String },

    #[error("{name} is {bytes} bytes, above the {limit} byte limit")]
    TooLarge { name: String, bytes: u64, limit: u64 },

    #[error("{name} is empty")]
    Empty { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("report intake rejected the report: {0}")]
    Rejected(String),

    #[error("encoding report: {0}")]
    Encode(String),
}

/// Failures of the erosion prediction pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// A climate record is outside the accepted ranges.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("start year {start} is after end year {end}")]
    YearRange { start: i32, end: i32 },

    #[error("unknown model type: {0}")]
    UnknownModel(String),

    #[error("need at least {needed} labelled rows to train, got {got}")]
    NotEnoughData { needed: usize, got: usize },

    /// The regressor failed to fit or predict.
    #[error("model: {0}")]
    Model(String),
}
