//! Assembly of the calculation request from collected answers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::common::format_amount;
use crate::models::{AnswerSet, CalculationRequest, JobPayload, JobRecord};
use crate::validation::{ValidationError, ValidationErrors, validate_answers};

/// Date pattern of job and leave periods on the wire.
const WIRE_DATE_FORMAT: &str = "%d-%m-%Y";

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationError::new(field, "missing").into())
}

fn job_payload(job: &JobRecord) -> Result<JobPayload, ValidationErrors> {
    let base_salary = job
        .base_salary()
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ValidationError::new("base_salary", "base salary is out of range"))?;

    Ok(JobPayload {
        start_date: format_wire_date(job.start_date()),
        end_date: job.end_date().map(format_wire_date),
        base_salary,
    })
}

/// Builds the request for `POST /calculations`, stamped with `now`.
///
/// Validates every active step first. Jobs are only sent when the user opted
/// into a detailed job history.
pub fn build_request(
    answers: &AnswerSet,
    now: DateTime<Utc>,
) -> Result<CalculationRequest, ValidationErrors> {
    validate_answers(answers, now.year())?;

    let jobs = if answers.includes_job_history() {
        answers
            .jobs
            .iter()
            .map(job_payload)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    Ok(CalculationRequest {
        calculation_date: now.format("%Y-%m-%d").to_string(),
        calculation_time: now.format("%H:%M:%S").to_string(),
        expected_pension: format_amount(answers.expected_pension.unwrap_or(Decimal::ZERO)),
        age: required("age", answers.age)?,
        sex: required("sex", answers.sex)?,
        salary: format_amount(required("salary", answers.salary)?),
        is_sick_leave_included: answers.is_sick_leave_included(),
        total_accumulated_funds: format_amount(
            answers.total_accumulated_funds.unwrap_or(Decimal::ZERO),
        ),
        year_work_start: required("year_work_start", answers.year_work_start)?,
        year_desired_retirement: required(
            "year_desired_retirement",
            answers.year_desired_retirement,
        )?,
        postal_code: answers.postal_code.clone(),
        jobs,
        // Sick leave is sent as the aggregate flag; no dated periods are collected.
        leaves: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{AnswerUpdate, Sex, SickLeave};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 4, 14, 30, 5).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_answers() -> AnswerSet {
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
    fn scenario_without_history_or_sick_leave() {
        let request = build_request(&scenario_answers(), now()).unwrap();

        assert!(!request.is_sick_leave_included);
        assert!(request.jobs.is_empty());
        assert!(request.leaves.is_empty());
        assert_eq!(request.sex, Sex::Female);
        assert_eq!(request.age, 30);
        assert_eq!(request.salary, "6000.00");
        assert_eq!(request.expected_pension, "0.00");
        assert_eq!(request.total_accumulated_funds, "0.00");
        assert_eq!(request.year_work_start, 2015);
        assert_eq!(request.year_desired_retirement, 2060);
    }

    #[test]
    fn request_is_stamped_with_utc_date_and_time() {
        let request = build_request(&scenario_answers(), now()).unwrap();

        assert_eq!(request.calculation_date, "2025-10-04");
        assert_eq!(request.calculation_time, "14:30:05");
    }

    #[test]
    fn jobs_are_sent_only_with_history_included() {
        let mut answers = scenario_answers();
        answers.add_job(JobRecord::new(date(2020, 1, 1), None, dec!(7000.50)).unwrap());
        answers.add_job(
            JobRecord::new(date(2015, 1, 1), Some(date(2019, 12, 31)), dec!(5000)).unwrap(),
        );

        assert!(build_request(&answers, now()).unwrap().jobs.is_empty());

        answers.include_job_history = Some(true);
        let request = build_request(&answers, now()).unwrap();

        assert_eq!(
            request.jobs,
            vec![
                JobPayload {
                    start_date: "01-01-2015".to_string(),
                    end_date: Some("31-12-2019".to_string()),
                    base_salary: 5000,
                },
                JobPayload {
                    start_date: "01-01-2020".to_string(),
                    end_date: None,
                    base_salary: 7001,
                },
            ]
        );
    }

    #[test]
    fn sick_leave_flag_follows_option() {
        let mut answers = scenario_answers();
        answers.sick_leave = Some(SickLeave::average());

        assert!(build_request(&answers, now()).unwrap().is_sick_leave_included);
    }

    #[test]
    fn incomplete_answers_are_rejected() {
        let mut answers = scenario_answers();
        answers.age = None;

        let errors = build_request(&answers, now()).unwrap_err();
        assert_eq!(errors.errors()[0].field, "age");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut answers = scenario_answers();
        answers.postal_code = Some("00-950".to_string());
        let json = serde_json::to_value(build_request(&answers, now()).unwrap()).unwrap();

        assert_eq!(json["isSickLeaveIncluded"], false);
        assert_eq!(json["yearDesiredRetirement"], 2060);
        assert_eq!(json["sex"], "female");
        assert_eq!(json["salary"], "6000.00");
        assert_eq!(json["postalCode"], "00-950");
        assert_eq!(json["jobs"], serde_json::json!([]));
    }

    #[test]
    fn postal_code_is_omitted_when_absent() {
        let json = serde_json::to_value(build_request(&scenario_answers(), now()).unwrap()).unwrap();

        assert!(json.get("postalCode").is_none());
    }
}
