use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One yearly data point of a statistics series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeExpectancy {
    pub male: Vec<YearValue>,
    pub female: Vec<YearValue>,
}

/// Response of `GET /statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub growth_rate: Vec<YearValue>,
    pub average_wage: Vec<YearValue>,
    pub valorization: Vec<YearValue>,
    pub inflation: Vec<YearValue>,
    pub life_expectancy: LifeExpectancy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, String>>,
}

impl Statistics {
    /// Value of a series for one year, if the backend reported it.
    pub fn value_for(series: &[YearValue], year: i32) -> Option<f64> {
        series.iter().find(|point| point.year == year).map(|point| point.value)
    }

    /// Most recent point of a series.
    pub fn latest(series: &[YearValue]) -> Option<YearValue> {
        series.iter().copied().max_by_key(|point| point.year)
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
