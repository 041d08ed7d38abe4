use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::job::{JobHistorySummary, JobId, JobRecord, sort_jobs};
use super::sex::Sex;
use super::sick_leave::SickLeave;

/// Retirement age used when suggesting a default retirement year.
pub const DEFAULT_RETIREMENT_AGE: i32 = 67;

/// Everything the user has answered so far. Every field stays `None` until
/// the step that owns it is filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSet {
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    /// Gross monthly salary.
    pub salary: Option<Decimal>,
    pub year_work_start: Option<i32>,
    pub year_desired_retirement: Option<i32>,
    /// Gates the jobs-manager step.
    pub include_job_history: Option<bool>,
    /// Kept sorted by start date.
    pub jobs: Vec<JobRecord>,
    pub sick_leave: Option<SickLeave>,

    // Optional request fields with no dedicated step
    pub expected_pension: Option<Decimal>,
    pub total_accumulated_funds: Option<Decimal>,
    pub postal_code: Option<String>,
}

/// A partial answer set. `Some` fields overwrite, `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerUpdate {
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub salary: Option<Decimal>,
    pub year_work_start: Option<i32>,
    pub year_desired_retirement: Option<i32>,
    pub include_job_history: Option<bool>,
    pub jobs: Option<Vec<JobRecord>>,
    pub sick_leave: Option<SickLeave>,
    pub expected_pension: Option<Decimal>,
    pub total_accumulated_funds: Option<Decimal>,
    pub postal_code: Option<String>,
}

impl AnswerSet {
    /// Shallow merge; the last write wins per field.
    pub fn merge(&mut self, update: AnswerUpdate) {
        if update.sex.is_some() {
            self.sex = update.sex;
        }
        if update.age.is_some() {
            self.age = update.age;
        }
        if update.salary.is_some() {
            self.salary = update.salary;
        }
        if update.year_work_start.is_some() {
            self.year_work_start = update.year_work_start;
        }
        if update.year_desired_retirement.is_some() {
            self.year_desired_retirement = update.year_desired_retirement;
        }
        if update.include_job_history.is_some() {
            self.include_job_history = update.include_job_history;
        }
        if update.sick_leave.is_some() {
            self.sick_leave = update.sick_leave;
        }
        if update.expected_pension.is_some() {
            self.expected_pension = update.expected_pension;
        }
        if update.total_accumulated_funds.is_some() {
            self.total_accumulated_funds = update.total_accumulated_funds;
        }
        if update.postal_code.is_some() {
            self.postal_code = update.postal_code;
        }

        if let Some(mut jobs) = update.jobs {
            sort_jobs(&mut jobs);
            self.jobs = jobs;
        }
    }

    pub fn includes_job_history(&self) -> bool {
        self.include_job_history == Some(true)
    }

    pub fn is_sick_leave_included(&self) -> bool {
        self.sick_leave.is_some_and(|leave| leave.is_included())
    }

    pub fn job(&self, id: JobId) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id() == id)
    }

    pub fn add_job(&mut self, job: JobRecord) {
        self.jobs.push(job);
        sort_jobs(&mut self.jobs);
    }

    /// Replaces the job with the same id. Returns `false` if no such job exists.
    pub fn replace_job(&mut self, job: JobRecord) -> bool {
        let Some(slot) = self.jobs.iter_mut().find(|existing| existing.id() == job.id()) else {
            return false;
        };
        *slot = job;
        sort_jobs(&mut self.jobs);
        true
    }

    pub fn remove_job(&mut self, id: JobId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.id() != id);
        self.jobs.len() != before
    }

    pub fn job_history_summary(&self, today: NaiveDate) -> JobHistorySummary {
        JobHistorySummary::from_jobs(&self.jobs, today)
    }

    /// Default for the retirement step: the year the user turns 67.
    pub fn suggested_retirement_year(&self, current_year: i32) -> Option<i32> {
        self.year_desired_retirement
            .or_else(|| self.age.map(|age| current_year + (DEFAULT_RETIREMENT_AGE - age)))
    }
}
