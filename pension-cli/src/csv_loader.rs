//! CSV import of a job history.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column         | Required | Type    | Notes                                      |
//! |----------------|----------|---------|--------------------------------------------|
//! | `start_date`   | yes      | date    | `2015-01-31` or `31-01-2015`               |
//! | `end_date`     | no       | date    | Leave empty for the current job            |
//! | `base_salary`  | yes      | decimal | Gross monthly salary, e.g. `7200.50`       |
//! | `company_name` | no       | string  |                                            |
//! | `position`     | no       | string  |                                            |
//!
//! ```csv
//! start_date,end_date,base_salary,company_name
//! 2010-09-01,2015-06-30,4200.00,Huta Katowice
//! 2015-07-01,,6800.00,
//! ```
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pension_core::common::parse_amount;
use pension_core::{JobRecord, ValidationErrors};
use serde::Deserialize;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    start_date: String,
    end_date: Option<String>,
    base_salary: String,
    company_name: Option<String>,
    position: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing column, wrong column count.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("row {row}: unrecognised date '{value}' in {column}")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: invalid base salary '{value}'")]
    InvalidSalary { row: usize, value: String },

    #[error("row {row}: {source}")]
    InvalidJob {
        row: usize,
        #[source]
        source: ValidationErrors,
    },
}

fn parse_date(value: &str, column: &'static str, row: usize) -> Result<NaiveDate, CsvLoadError> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| CsvLoadError::InvalidDate {
            row,
            column,
            value: value.to_string(),
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `row` is 1-based, header excluded.
fn convert_row(row: CsvRow, row_number: usize) -> Result<JobRecord, CsvLoadError> {
    let start = parse_date(&row.start_date, "start_date", row_number)?;
    let end = non_empty(row.end_date)
        .map(|value| parse_date(&value, "end_date", row_number))
        .transpose()?;
    let salary = parse_amount(&row.base_salary).map_err(|_| CsvLoadError::InvalidSalary {
        row: row_number,
        value: row.base_salary.clone(),
    })?;

    let mut job = JobRecord::new(start, end, salary).map_err(|source| CsvLoadError::InvalidJob {
        row: row_number,
        source,
    })?;
    if let Some(company) = non_empty(row.company_name) {
        job = job.with_company(company);
    }
    if let Some(position) = non_empty(row.position) {
        job = job.with_position(position);
    }
    Ok(job)
}

/// Parses CSV text into job records, in file order.
///
/// # Errors
///
/// The first failing row aborts the import; see [`CsvLoadError`].
pub fn load_from_str(input: &str) -> Result<Vec<JobRecord>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

pub fn load_from_file(path: &Path) -> Result<Vec<JobRecord>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let jobs = load_from_str(&contents)?;
    tracing::debug!(path = %path.display(), count = jobs.len(), "imported job history");
    Ok(jobs)
}
