//! Answer files: the wizard's inputs written down as TOML.
//!
//! ```toml
//! sex = "female"
//! age = 30
//! salary = "6 000"               # number or text; spaces and commas allowed
//! year_work_start = 2015
//! include_job_history = true
//! jobs_csv = "jobs.csv"          # resolved relative to this file
//! # year_desired_retirement = 2062  (suggested from age when omitted)
//!
//! [sick_leave]
//! option = "custom"
//! custom_days = 14
//!
//! [[jobs]]
//! start_date = "2015-01-01"
//! end_date = "2019-12-31"
//! base_salary = "5000"
//! ```
use std::path::{Path, PathBuf};

use pension_core::common::parse_amount;
use pension_core::{AnswerUpdate, JobRecord, Sex, SickLeave};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::csv_loader::{self, CsvLoadError};

#[derive(Debug, Error)]
pub enum AnswersFileError {
    #[error("cannot read answers file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid answers file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("job history import failed: {0}")]
    Jobs(#[from] CsvLoadError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnswersFile {
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    #[serde(deserialize_with = "amount")]
    pub salary: Option<Decimal>,
    pub year_work_start: Option<i32>,
    pub year_desired_retirement: Option<i32>,
    pub include_job_history: Option<bool>,
    pub sick_leave: Option<SickLeave>,
    #[serde(deserialize_with = "amount")]
    pub expected_pension: Option<Decimal>,
    #[serde(deserialize_with = "amount")]
    pub total_accumulated_funds: Option<Decimal>,
    pub postal_code: Option<String>,
    pub jobs: Vec<JobRecord>,
    /// CSV job history appended after any inline `[[jobs]]`.
    pub jobs_csv: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Money as a TOML number or as text in the CSV import's format.
fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match AmountInput::deserialize(deserializer)? {
        AmountInput::Integer(value) => Ok(Some(Decimal::from(value))),
        AmountInput::Float(value) => Decimal::try_from(value).map(Some).map_err(D::Error::custom),
        AmountInput::Text(text) => parse_amount(&text).map(Some).map_err(D::Error::custom),
    }
}

impl AnswersFile {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, AnswersFileError> {
        toml::from_str(text).map_err(|source| AnswersFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, AnswersFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| AnswersFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Resolves `jobs_csv` against `base_dir` and produces a wizard update.
    pub fn into_update(self, base_dir: &Path) -> Result<AnswerUpdate, AnswersFileError> {
        let mut jobs = self.jobs;
        if let Some(csv) = &self.jobs_csv {
            let csv = if csv.is_absolute() {
                csv.clone()
            } else {
                base_dir.join(csv)
            };
            jobs.extend(csv_loader::load_from_file(&csv)?);
        }

        Ok(AnswerUpdate {
            sex: self.sex,
            age: self.age,
            salary: self.salary,
            year_work_start: self.year_work_start,
            year_desired_retirement: self.year_desired_retirement,
            include_job_history: self.include_job_history,
            jobs: (!jobs.is_empty()).then_some(jobs),
            sick_leave: self.sick_leave,
            expected_pension: self.expected_pension,
            total_accumulated_funds: self.total_accumulated_funds,
            postal_code: self.postal_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use pension_core::SickLeaveOption;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(text: &str) -> AnswersFile {
        AnswersFile::from_toml(text, Path::new("answers.toml")).unwrap()
    }

    #[test]
    fn scalar_answers_parse() {
        let file = parse(
            r#"
            sex = "male"
            age = 45
            salary = "8500.50"
            year_work_start = 2002
            include_job_history = false
            postal_code = "00-950"

            [sick_leave]
            option = "average"
            "#,
        );

        assert_eq!(file.sex, Some(Sex::Male));
        assert_eq!(file.salary, Some(dec!(8500.50)));
        assert_eq!(file.sick_leave.map(|s| s.option), Some(SickLeaveOption::Average));
        assert_eq!(file.postal_code.as_deref(), Some("00-950"));
    }

    #[test]
    fn numeric_salary_is_accepted() {
        let file = parse("salary = 6000\n");
        assert_eq!(file.salary, Some(dec!(6000)));
    }

    #[test]
    fn text_amounts_tolerate_separators() {
        let file = parse(
            r#"
            salary = "6 000"
            expected_pension = "1,234.56"
            total_accumulated_funds = 250000.5
            "#,
        );

        assert_eq!(file.salary, Some(dec!(6000)));
        assert_eq!(file.expected_pension, Some(dec!(1234.56)));
        assert_eq!(file.total_accumulated_funds, Some(dec!(250000.5)));
    }

    #[test]
    fn unparseable_amount_names_the_input() {
        let err = AnswersFile::from_toml("salary = \"six grand\"\n", Path::new("answers.toml"))
            .unwrap_err();

        assert!(err.to_string().contains("six grand"), "{err}");
    }

    #[test]
    fn inline_jobs_become_job_records() {
        let update = parse(
            r#"
            include_job_history = true

            [[jobs]]
            start_date = "2015-01-01"
            end_date = "2019-12-31"
            base_salary = "5000"
            "#,
        )
        .into_update(Path::new("."))
        .unwrap();

        let jobs = update.jobs.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].base_salary(), dec!(5000));
    }

    #[test]
    fn no_jobs_leaves_update_untouched() {
        let update = parse("age = 30\n").into_update(Path::new(".")).unwrap();

        assert_eq!(update.jobs, None);
        assert_eq!(update.age, Some(30));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AnswersFile::from_toml("pesel = \"123\"\n", Path::new("answers.toml"))
            .unwrap_err();

        assert!(err.to_string().contains("answers.toml"));
    }

    #[test]
    fn invalid_inline_job_is_rejected() {
        let result = AnswersFile::from_toml(
            r#"
            [[jobs]]
            start_date = "2015-01-01"
            end_date = "2014-01-01"
            base_salary = "5000"
            "#,
            Path::new("answers.toml"),
        );

        assert!(matches!(result, Err(AnswersFileError::Parse { .. })));
    }

    #[test]
    fn missing_jobs_csv_is_reported() {
        let err = parse("jobs_csv = \"nope.csv\"\n")
            .into_update(Path::new("/nonexistent"))
            .unwrap_err();

        assert!(matches!(err, AnswersFileError::Jobs(CsvLoadError::Io { .. })));
    }
}
