//! Field validation for wizard answers.
//!
//! Each step view validates its own fields before calling
//! [`Wizard::next_step`](crate::wizard::Wizard::next_step); submission
//! re-validates every step so that nothing malformed reaches the backend.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AnswerSet, JobRecord, SickLeaveOption};
use crate::wizard::StepKind;

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 66;
pub const EARLIEST_WORK_START: i32 = 1950;
pub const EARLIEST_RETIREMENT: i32 = 2025;
pub const MAX_SICK_LEAVE_DAYS: u16 = 365;

/// Upper bound for any monthly salary figure.
pub fn max_salary() -> Decimal {
    Decimal::from(1_000_000)
}

/// A single problem with one answer field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every problem found in one validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Errors attached to one field, for inline display next to the input.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}-\d{3}$").expect("postal code pattern is valid"))
}

/// Checks the invariants of a single job record.
pub fn validate_job(job: &JobRecord) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if job.base_salary() <= Decimal::ZERO {
        errors.push(ValidationError::new("base_salary", "base salary must be greater than 0"));
    } else if job.base_salary() > max_salary() {
        errors.push(ValidationError::new("base_salary", "base salary is too high"));
    }

    if let Some(end) = job.end_date() {
        if end <= job.start_date() {
            errors.push(ValidationError::new(
                "end_date",
                "end date must be later than start date",
            ));
        }
    }

    errors.into_result()
}

/// Validates the fields owned by one step.
///
/// `current_year` bounds the career start year; callers pass it in so the
/// result does not depend on the wall clock.
pub fn validate_step(
    kind: StepKind,
    answers: &AnswerSet,
    current_year: i32,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match kind {
        StepKind::Sex => {
            if answers.sex.is_none() {
                errors.push(ValidationError::new("sex", "choose a sex"));
            }
        }
        StepKind::Age => match answers.age {
            Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {}
            _ => errors.push(ValidationError::new(
                "age",
                format!("age must be between {MIN_AGE} and {MAX_AGE}"),
            )),
        },
        StepKind::Salary => match answers.salary {
            Some(salary) if salary > Decimal::ZERO && salary <= max_salary() => {}
            _ => errors.push(ValidationError::new(
                "salary",
                "salary must be between 1 and 1 000 000",
            )),
        },
        StepKind::CareerStart => match answers.year_work_start {
            None => errors.push(ValidationError::new("year_work_start", "choose a career start year")),
            Some(year) if year < EARLIEST_WORK_START => {
                errors.push(ValidationError::new("year_work_start", "career start year is too early"))
            }
            Some(year) if year > current_year => errors.push(ValidationError::new(
                "year_work_start",
                "career start year cannot be in the future",
            )),
            Some(_) => {}
        },
        StepKind::JobHistoryChoice => {
            if answers.include_job_history.is_none() {
                errors.push(ValidationError::new(
                    "include_job_history",
                    "choose whether to include job history",
                ));
            }
        }
        StepKind::JobsManager => {
            if answers.includes_job_history() {
                if answers.jobs.is_empty() {
                    errors.push(ValidationError::new("jobs", "add at least one job"));
                }
                for job in &answers.jobs {
                    if let Err(job_errors) = validate_job(job) {
                        errors.extend(job_errors);
                    }
                }
            }
        }
        StepKind::SickLeave => match answers.sick_leave {
            None => errors.push(ValidationError::new("sick_leave", "choose a sick leave option")),
            Some(leave) if leave.option == SickLeaveOption::Custom => match leave.custom_days {
                Some(days) if days > 0 && days <= MAX_SICK_LEAVE_DAYS => {}
                _ => errors.push(ValidationError::new(
                    "custom_days",
                    format!("enter between 1 and {MAX_SICK_LEAVE_DAYS} sick leave days"),
                )),
            },
            Some(_) => {}
        },
        StepKind::Retirement => match answers.year_desired_retirement {
            None => errors.push(ValidationError::new(
                "year_desired_retirement",
                "choose a retirement year",
            )),
            Some(year) => {
                if year < EARLIEST_RETIREMENT {
                    errors.push(ValidationError::new(
                        "year_desired_retirement",
                        "retirement year is too early",
                    ));
                }
                if let Some(start) = answers.year_work_start {
                    if year <= start {
                        errors.push(ValidationError::new(
                            "year_desired_retirement",
                            "retirement year must be later than career start year",
                        ));
                    }
                }
            }
        },
        StepKind::Summary => {
            if let Some(code) = answers.postal_code.as_deref() {
                if !postal_code_pattern().is_match(code) {
                    errors.push(ValidationError::new(
                        "postal_code",
                        "postal code must look like 00-000",
                    ));
                }
            }
        }
    }

    errors.into_result()
}

/// Validates every step that the current answers activate.
pub fn validate_answers(answers: &AnswerSet, current_year: i32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for step in crate::wizard::derive_steps(answers) {
        if let Err(step_errors) = validate_step(step.kind, answers, current_year) {
            errors.extend(step_errors);
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{AnswerUpdate, Sex, SickLeave};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete_answers() -> AnswerSet {
        let mut answers = AnswerSet::default();
        answers.merge(AnswerUpdate {
            sex: Some(Sex::Female),
            age: Some(30),
            salary: Some(dec!(6000)),
            year_work_start: Some(2015),
            include_job_history: Some(false),
            sick_leave: Some(SickLeave::none()),
            year_desired_retirement: Some(2060),
            ..Default::default()
        });
        answers
    }

    #[test]
    fn complete_answers_pass() {
        assert_eq!(validate_answers(&complete_answers(), 2025), Ok(()));
    }

    #[test]
    fn empty_answers_report_each_step() {
        let errors = validate_answers(&AnswerSet::default(), 2025).unwrap_err();

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "sex",
                "age",
                "salary",
                "year_work_start",
                "include_job_history",
                "sick_leave",
                "year_desired_retirement",
            ]
        );
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let mut answers = complete_answers();
        answers.age = Some(18);
        assert!(validate_step(StepKind::Age, &answers, 2025).is_ok());
        answers.age = Some(66);
        assert!(validate_step(StepKind::Age, &answers, 2025).is_ok());
        answers.age = Some(67);
        assert!(validate_step(StepKind::Age, &answers, 2025).is_err());
        answers.age = Some(17);
        assert!(validate_step(StepKind::Age, &answers, 2025).is_err());
    }

    #[test]
    fn salary_must_be_positive_and_bounded() {
        let mut answers = complete_answers();
        answers.salary = Some(dec!(0));
        assert!(validate_step(StepKind::Salary, &answers, 2025).is_err());
        answers.salary = Some(dec!(1000000.01));
        assert!(validate_step(StepKind::Salary, &answers, 2025).is_err());
        answers.salary = Some(dec!(1000000));
        assert!(validate_step(StepKind::Salary, &answers, 2025).is_ok());
    }

    #[test]
    fn career_start_cannot_be_in_the_future() {
        let mut answers = complete_answers();
        answers.year_work_start = Some(2026);
        let errors = validate_step(StepKind::CareerStart, &answers, 2025).unwrap_err();
        assert_eq!(errors.len(), 1);
        answers.year_work_start = Some(1949);
        assert!(validate_step(StepKind::CareerStart, &answers, 2025).is_err());
    }

    #[test]
    fn retirement_must_follow_career_start() {
        let mut answers = complete_answers();
        answers.year_work_start = Some(2030);
        answers.year_desired_retirement = Some(2030);

        let errors = validate_step(StepKind::Retirement, &answers, 2035).unwrap_err();
        assert_eq!(errors.for_field("year_desired_retirement").count(), 1);
    }

    #[test]
    fn custom_sick_leave_requires_days() {
        let mut answers = complete_answers();
        answers.sick_leave = Some(SickLeave {
            option: SickLeaveOption::Custom,
            custom_days: None,
        });
        assert!(validate_step(StepKind::SickLeave, &answers, 2025).is_err());
        answers.sick_leave = Some(SickLeave::custom(400));
        assert!(validate_step(StepKind::SickLeave, &answers, 2025).is_err());
        answers.sick_leave = Some(SickLeave::custom(14));
        assert!(validate_step(StepKind::SickLeave, &answers, 2025).is_ok());
    }

    #[test]
    fn included_job_history_requires_jobs() {
        let mut answers = complete_answers();
        answers.include_job_history = Some(true);

        let errors = validate_answers(&answers, 2025).unwrap_err();
        assert_eq!(errors.errors()[0].field, "jobs");

        answers
            .add_job(JobRecord::new(date(2015, 1, 1), None, dec!(5000)).unwrap());
        assert!(validate_answers(&answers, 2025).is_ok());
    }

    #[test]
    fn postal_code_format_is_checked_when_present() {
        let mut answers = complete_answers();
        answers.postal_code = Some("00-950".to_string());
        assert!(validate_step(StepKind::Summary, &answers, 2025).is_ok());
        answers.postal_code = Some("00950".to_string());
        assert!(validate_step(StepKind::Summary, &answers, 2025).is_err());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::new("age", "too young"));
        errors.push(ValidationError::new("salary", "missing"));

        assert_eq!(errors.to_string(), "age: too young; salary: missing");
    }
}
