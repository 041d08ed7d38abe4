pub mod backend;
pub mod common;
pub mod models;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use backend::{BackendConfig, BackendError, BackendFactory, BackendRegistry, PensionBackend};
pub use models::*;
pub use submission::{
    Applied, DEFAULT_SUBMISSION_TIMEOUT, PendingSubmission, SubmissionError, SubmissionOutcome,
    SubmissionResult, SubmissionTicket, build_request, submit,
};
pub use validation::{ValidationError, ValidationErrors};
pub use wizard::{StepDefinition, StepKind, Wizard};
