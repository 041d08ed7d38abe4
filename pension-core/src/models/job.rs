use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{ValidationErrors, validate_job};

/// Opaque identifier of a job record within one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One employment period.
///
/// Construction validates that the salary is positive and that an end date,
/// when present, falls after the start date. Deserialization goes through the
/// same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JobRecordFields", into = "JobRecordFields")]
pub struct JobRecord {
    id: JobId,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    base_salary: Decimal,
    company_name: Option<String>,
    position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JobRecordFields {
    #[serde(default)]
    id: Option<JobId>,
    start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
    base_salary: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<String>,
}

impl TryFrom<JobRecordFields> for JobRecord {
    type Error = ValidationErrors;

    fn try_from(fields: JobRecordFields) -> Result<Self, Self::Error> {
        let mut job = JobRecord::new(fields.start_date, fields.end_date, fields.base_salary)?;
        if let Some(id) = fields.id {
            job.id = id;
        }
        job.company_name = fields.company_name;
        job.position = fields.position;
        Ok(job)
    }
}

impl From<JobRecord> for JobRecordFields {
    fn from(job: JobRecord) -> Self {
        Self {
            id: Some(job.id),
            start_date: job.start_date,
            end_date: job.end_date,
            base_salary: job.base_salary,
            company_name: job.company_name,
            position: job.position,
        }
    }
}

impl JobRecord {
    /// Creates a job with a fresh identifier.
    pub fn new(
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        base_salary: Decimal,
    ) -> Result<Self, ValidationErrors> {
        let job = Self {
            id: JobId::new(),
            start_date,
            end_date,
            base_salary,
            company_name: None,
            position: None,
        };
        validate_job(&job)?;
        Ok(job)
    }

    /// Returns an edited copy that keeps this record's identifier.
    pub fn edited(
        &self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        base_salary: Decimal,
    ) -> Result<Self, ValidationErrors> {
        let mut job = Self::new(start_date, end_date, base_salary)?;
        job.id = self.id;
        job.company_name = self.company_name.clone();
        job.position = self.position.clone();
        Ok(job)
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn base_salary(&self) -> Decimal {
        self.base_salary
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }

    /// Length of the employment in years (365.25-day years); ongoing jobs run until `today`.
    pub fn years_worked(&self, today: NaiveDate) -> Decimal {
        let end = self.end_date.unwrap_or(today);
        let days = (end - self.start_date).num_days().max(0);
        Decimal::from(days) / Decimal::new(36525, 2)
    }
}

/// Sorts jobs chronologically by start date. Stable, so equal start dates
/// keep their insertion order.
pub fn sort_jobs(jobs: &mut [JobRecord]) {
    jobs.sort_by_key(|job| job.start_date);
}

/// Aggregate figures shown above the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHistorySummary {
    pub count: usize,
    pub total_years: Decimal,
    pub average_salary: Decimal,
}

impl JobHistorySummary {
    pub fn from_jobs(jobs: &[JobRecord], today: NaiveDate) -> Self {
        if jobs.is_empty() {
            return Self {
                count: 0,
                total_years: Decimal::ZERO,
                average_salary: Decimal::ZERO,
            };
        }

        let total_years = jobs.iter().map(|job| job.years_worked(today)).sum();
        let total_salary: Decimal = jobs.iter().map(JobRecord::base_salary).sum();

        Self {
            count: jobs.len(),
            total_years,
            average_salary: total_salary / Decimal::from(jobs.len()),
        }
    }
}
