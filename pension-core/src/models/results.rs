use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculation::CalculationResponse;

/// Projection shown on the summary step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionResults {
    /// `None` for placeholder results that never reached the backend.
    pub calculation_id: Option<String>,
    /// Monthly amount, unadjusted for inflation.
    pub nominal_pension: Decimal,
    /// Monthly amount in today's money.
    pub real_pension: Decimal,
    /// Percentage of the average wage.
    pub replacement_rate: Decimal,
    /// Set when these figures are demo data shown because the backend was unreachable.
    pub is_demo: bool,
}

impl PensionResults {
    /// Fixed demo figures used when submission fails or times out.
    pub fn placeholder() -> Self {
        Self {
            calculation_id: None,
            nominal_pension: Decimal::new(485000, 2),
            real_pension: Decimal::new(342000, 2),
            replacement_rate: Decimal::from(89),
            is_demo: true,
        }
    }
}

impl From<CalculationResponse> for PensionResults {
    fn from(response: CalculationResponse) -> Self {
        Self {
            calculation_id: Some(response.calculation_id),
            nominal_pension: response.nominal_pension,
            real_pension: response.real_pension,
            replacement_rate: response.replacement_rate,
            is_demo: false,
        }
    }
}
