//! Submission of the finished wizard to the pension backend.
//!
//! Submitting is split into three parts so that late responses can be told
//! apart from current ones:
//!
//! 1. [`Wizard::begin_submission`] validates the answers, builds the request
//!    and hands out a [`SubmissionTicket`]. Only one ticket is live at a time.
//! 2. [`submit`] awaits the backend, bounded by a client-side timeout, and
//!    returns a [`SubmissionOutcome`] carrying the same ticket.
//! 3. [`Wizard::complete_submission`] applies the outcome only if its ticket
//!    is still the live one. Leaving the summary step or resetting the wizard
//!    retires the ticket, so a response that arrives afterwards is dropped.
//!
//! Failures never leave the session without results: errors and timeouts
//! store [`PensionResults::placeholder`], flagged as demo data.

mod request;

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use request::{build_request, format_wire_date};

use crate::backend::{BackendError, PensionBackend};
use crate::models::{CalculationRequest, CalculationResponse, PensionResults};
use crate::validation::ValidationErrors;
use crate::wizard::{StepKind, Wizard};

pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Correlation token tying a backend response to the submission that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket(u64);

impl SubmissionTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubmissionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request ready to send, with the ticket that must accompany its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub request: CalculationRequest,
}

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Completed(CalculationResponse),
    Failed(BackendError),
    TimedOut(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub ticket: SubmissionTicket,
    pub result: SubmissionResult,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission is only possible from the summary step")]
    NotAtSummary,

    #[error("submission {0} is still in flight")]
    AlreadyPending(SubmissionTicket),

    #[error("answers are incomplete: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// How [`Wizard::complete_submission`] handled an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Backend figures stored.
    Results,
    /// Placeholder demo figures stored after a failure or timeout.
    Fallback,
    /// Outcome belonged to an abandoned submission and was dropped.
    Stale,
}

/// Sends `pending` to `backend`, giving up after `timeout`.
pub async fn submit(
    backend: &dyn PensionBackend,
    pending: &PendingSubmission,
    timeout: Duration,
) -> SubmissionOutcome {
    let result = match tokio::time::timeout(timeout, backend.submit_calculation(&pending.request))
        .await
    {
        Ok(Ok(response)) => SubmissionResult::Completed(response),
        Ok(Err(error)) => SubmissionResult::Failed(error),
        Err(_) => SubmissionResult::TimedOut(timeout),
    };

    SubmissionOutcome {
        ticket: pending.ticket,
        result,
    }
}

impl Wizard {
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<SubmissionTicket> {
        self.pending
    }

    /// Starts a submission from the summary step.
    ///
    /// # Errors
    /// * [`SubmissionError::NotAtSummary`] when called from any other step.
    /// * [`SubmissionError::AlreadyPending`] while an earlier ticket is live.
    /// * [`SubmissionError::Invalid`] when any active step fails validation.
    pub fn begin_submission(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<PendingSubmission, SubmissionError> {
        if self.current != StepKind::Summary {
            return Err(SubmissionError::NotAtSummary);
        }
        if let Some(ticket) = self.pending {
            return Err(SubmissionError::AlreadyPending(ticket));
        }

        let request = build_request(&self.answers, now)?;

        self.last_ticket += 1;
        let ticket = SubmissionTicket(self.last_ticket);
        self.pending = Some(ticket);
        info!(%ticket, "calculation submission started");

        Ok(PendingSubmission { ticket, request })
    }

    /// Applies `outcome` if it belongs to the live submission.
    pub fn complete_submission(&mut self, outcome: SubmissionOutcome) -> Applied {
        if self.pending != Some(outcome.ticket) {
            debug!(ticket = %outcome.ticket, "discarding outcome of abandoned submission");
            return Applied::Stale;
        }
        self.pending = None;

        match outcome.result {
            SubmissionResult::Completed(response) => {
                info!(
                    ticket = %outcome.ticket,
                    calculation_id = %response.calculation_id,
                    "calculation submission completed"
                );
                self.results = Some(PensionResults::from(response));
                Applied::Results
            }
            SubmissionResult::Failed(error) => {
                warn!(ticket = %outcome.ticket, %error, "submission failed, showing demo results");
                self.results = Some(PensionResults::placeholder());
                Applied::Fallback
            }
            SubmissionResult::TimedOut(after) => {
                warn!(ticket = %outcome.ticket, ?after, "submission timed out, showing demo results");
                self.results = Some(PensionResults::placeholder());
                Applied::Fallback
            }
        }
    }

    /// Begins, sends and completes a submission in one call.
    pub async fn submit_to(
        &mut self,
        backend: &dyn PensionBackend,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> Result<&PensionResults, SubmissionError> {
        let pending = self.begin_submission(now)?;
        let outcome = submit(backend, &pending, timeout).await;
        self.complete_submission(outcome);
        // The ticket cannot be retired while we hold `&mut self`, so results are set.
        Ok(self.results.get_or_insert_with(PensionResults::placeholder))
    }

    pub(crate) fn abandon_submission(&mut self) {
        if let Some(ticket) = self.pending.take() {
            debug!(%ticket, "left summary step, abandoning submission");
        }
    }
}
