//! Non-interactive wizard run: apply answers, walk every step, submit.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use pension_core::validation::validate_step;
use pension_core::{
    AnswerSet, AnswerUpdate, CalculationRequest, JobHistorySummary, PensionBackend,
    PensionResults, StepDefinition, StepKind, SubmissionError, ValidationErrors, Wizard,
    build_request,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("step {step} ({label}) is incomplete: {errors}")]
    Incomplete {
        step: usize,
        label: &'static str,
        errors: ValidationErrors,
    },

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// What a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub steps: Vec<StepDefinition>,
    pub answers: AnswerSet,
    pub job_summary: Option<JobHistorySummary>,
    pub results: PensionResults,
}

/// Applies `update` to a fresh [`Wizard`] and walks it to the summary,
/// validating each step on the way. A missing retirement year is filled with
/// the suggestion for the user's age.
fn walk_to_summary(update: AnswerUpdate, now: DateTime<Utc>) -> Result<Wizard, SessionError> {
    let mut wizard = Wizard::new();
    wizard.update_data(update);

    loop {
        let step = wizard.current_definition();
        debug!(step = step.id, label = step.label, "visiting step");

        if step.kind == StepKind::Retirement && wizard.answers().year_desired_retirement.is_none() {
            if let Some(year) = wizard.answers().suggested_retirement_year(now.year()) {
                info!(year, "using suggested retirement year");
                wizard.update_data(AnswerUpdate {
                    year_desired_retirement: Some(year),
                    ..Default::default()
                });
            }
        }

        validate_step(step.kind, wizard.answers(), now.year()).map_err(|errors| {
            SessionError::Incomplete {
                step: step.id,
                label: step.label,
                errors,
            }
        })?;

        if wizard.is_at_summary() {
            return Ok(wizard);
        }
        wizard.next_step();
    }
}

/// Walks every step with `update` and submits from the summary.
pub async fn run_session(
    update: AnswerUpdate,
    backend: &dyn PensionBackend,
    timeout: Duration,
    now: DateTime<Utc>,
) -> Result<SessionReport, SessionError> {
    let mut wizard = walk_to_summary(update, now)?;
    let results = wizard.submit_to(backend, timeout, now).await?.clone();

    let answers = wizard.answers().clone();
    let job_summary = answers
        .includes_job_history()
        .then(|| answers.job_history_summary(now.date_naive()));

    Ok(SessionReport {
        steps: wizard.steps(),
        answers,
        job_summary,
        results,
    })
}

/// The request `run_session` would submit, for the analysis endpoint.
pub fn prepare_request(
    update: AnswerUpdate,
    now: DateTime<Utc>,
) -> Result<CalculationRequest, SessionError> {
    let wizard = walk_to_summary(update, now)?;
    build_request(wizard.answers(), now)
        .map_err(|errors| SessionError::Submission(SubmissionError::Invalid(errors)))
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<_> = self.steps.iter().map(|s| s.kind.short_label()).collect();
        writeln!(f, "Steps: {}", labels.join(" > "))?;

        if let Some(summary) = &self.job_summary {
            writeln!(
                f,
                "Job history: {} job(s), {} years, average salary {}",
                summary.count,
                summary.total_years.round_dp(1),
                pension_core::common::format_amount(summary.average_salary)
            )?;
        }

        let results = &self.results;
        if results.is_demo {
            writeln!(f, "Backend unavailable, showing demo figures.")?;
        }
        if let Some(id) = &results.calculation_id {
            writeln!(f, "Calculation: {id}")?;
        }
        writeln!(
            f,
            "Nominal pension: {} PLN",
            pension_core::common::format_amount(results.nominal_pension)
        )?;
        writeln!(
            f,
            "Real pension:    {} PLN",
            pension_core::common::format_amount(results.real_pension)
        )?;
        write!(f, "Replacement rate: {}%", results.replacement_rate.normalize())
    }
}
