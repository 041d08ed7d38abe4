use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SickLeaveOption {
    /// No sick leave assumed.
    None,
    /// National average absence.
    Average,
    /// User-supplied number of days per year.
    Custom,
}

/// Sick-leave assumption chosen on the sick-leave step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickLeave {
    pub option: SickLeaveOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_days: Option<u16>,
}

impl SickLeave {
    pub fn none() -> Self {
        Self {
            option: SickLeaveOption::None,
            custom_days: None,
        }
    }

    pub fn average() -> Self {
        Self {
            option: SickLeaveOption::Average,
            custom_days: None,
        }
    }

    pub fn custom(days: u16) -> Self {
        Self {
            option: SickLeaveOption::Custom,
            custom_days: Some(days),
        }
    }

    /// Whether the backend should factor sick leave into the projection.
    pub fn is_included(&self) -> bool {
        self.option != SickLeaveOption::None
    }
}
