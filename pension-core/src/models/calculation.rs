use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sex::Sex;

/// Body of `POST /calculations`.
///
/// Currency values travel as `digits.digits` strings with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// `YYYY-MM-DD`
    pub calculation_date: String,
    /// `HH:MM:SS`, UTC
    pub calculation_time: String,
    pub expected_pension: String,
    pub age: i32,
    pub sex: Sex,
    pub salary: String,
    pub is_sick_leave_included: bool,
    pub total_accumulated_funds: String,
    pub year_work_start: i32,
    pub year_desired_retirement: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub jobs: Vec<JobPayload>,
    pub leaves: Vec<LeavePayload>,
}

/// Dates use the backend's `DD-MM-YYYY` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub base_salary: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Successful response of `POST /calculations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub calculation_id: String,
    pub nominal_pension: Decimal,
    pub real_pension: Decimal,
    /// Percentage of the reference wage.
    #[serde(alias = "percentageToAverage")]
    pub replacement_rate: Decimal,
}

/// Stored calculation returned by `GET /calculations/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetail {
    pub calculation_id: String,
    pub calculation_date: String,
    pub calculation_time: String,
    pub expected_pension: String,
    pub age: i32,
    pub sex: Sex,
    pub salary: String,
    pub is_sick_leave_included: bool,
    pub total_accumulated_funds: String,
    #[serde(default)]
    pub nominal_pension: Option<String>,
    #[serde(default)]
    pub real_pension: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Present in list responses only.
    #[serde(default)]
    pub year_work_start: Option<i32>,
    #[serde(default)]
    pub year_desired_retirement: Option<i32>,
}

/// Page size the service uses when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of `GET /calculations`. Missing fields decode as zero/empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationPage {
    pub submissions: Vec<CalculationDetail>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl CalculationPage {
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Successful reply of `POST /calculations/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub basic_summary: String,
    pub detailed_analysis: String,
}

/// The analysis endpoint answers 200 either way; failures carry `error`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisReply {
    Report(AnalysisReport),
    Failed { error: String },
}

/// Export formats offered for finished calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Single calculation report.
    Pdf,
    /// Spreadsheet of all stored calculations.
    Xls,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xls => "xls",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn page_fields_default_when_absent() {
        let page: CalculationPage = serde_json::from_str(r#"{"submissions":[]}"#).unwrap();

        assert_eq!(page, CalculationPage::default());
        assert!(page.is_last());
    }

    #[test]
    fn analysis_reply_distinguishes_error_form() {
        let ok: AnalysisReply = serde_json::from_str(
            r#"{"basic_summary":"ok","detailed_analysis":"long","calculation_data":{"x":1}}"#,
        )
        .unwrap();
        let failed: AnalysisReply = serde_json::from_str(r#"{"error":"quota"}"#).unwrap();

        assert_eq!(
            ok,
            AnalysisReply::Report(AnalysisReport {
                basic_summary: "ok".to_string(),
                detailed_analysis: "long".to_string(),
            })
        );
        assert_eq!(
            failed,
            AnalysisReply::Failed {
                error: "quota".to_string()
            }
        );
    }
}
