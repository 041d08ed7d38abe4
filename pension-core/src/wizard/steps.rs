//! Step-list derivation.
//!
//! The list of wizard steps is never stored. It is recomputed from the
//! answers whenever it is needed, because the jobs-manager step only exists
//! while the user has opted into a detailed job history.
//!
//! | #  | without job history | with job history |
//! |----|---------------------|------------------|
//! | 1  | Sex                 | Sex              |
//! | 2  | Age                 | Age              |
//! | 3  | Salary              | Salary           |
//! | 4  | Career start        | Career start     |
//! | 5  | Job history choice  | Job history choice |
//! | 6  | Sick leave          | Jobs manager     |
//! | 7  | Retirement year     | Sick leave       |
//! | 8  | Summary             | Retirement year  |
//! | 9  |                     | Summary          |

use serde::{Deserialize, Serialize};

use crate::models::AnswerSet;

/// Identity of a step, independent of its position in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepKind {
    Sex,
    Age,
    Salary,
    CareerStart,
    JobHistoryChoice,
    JobsManager,
    SickLeave,
    Retirement,
    Summary,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sex => "Your sex",
            Self::Age => "How old are you?",
            Self::Salary => "Your gross salary",
            Self::CareerStart => "When did you start working?",
            Self::JobHistoryChoice => "Do you want to add your job history?",
            Self::JobsManager => "Your job history",
            Self::SickLeave => "Sick leave",
            Self::Retirement => "When do you want to retire?",
            Self::Summary => "Summary",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Sex => "Sex",
            Self::Age => "Age",
            Self::Salary => "Salary",
            Self::CareerStart => "Career start",
            Self::JobHistoryChoice => "Job history",
            Self::JobsManager => "Jobs",
            Self::SickLeave => "Sick leave",
            Self::Retirement => "Retirement",
            Self::Summary => "Summary",
        }
    }
}

/// One entry of the derived step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    /// 1-based position in the list it was derived into.
    pub id: usize,
    pub kind: StepKind,
    pub label: &'static str,
}

const PREFIX: [StepKind; 5] = [
    StepKind::Sex,
    StepKind::Age,
    StepKind::Salary,
    StepKind::CareerStart,
    StepKind::JobHistoryChoice,
];

const SUFFIX: [StepKind; 3] = [StepKind::SickLeave, StepKind::Retirement, StepKind::Summary];

/// Ordered step kinds active for `answers`.
pub fn step_kinds(answers: &AnswerSet) -> Vec<StepKind> {
    let mut kinds = Vec::with_capacity(PREFIX.len() + 1 + SUFFIX.len());
    kinds.extend_from_slice(&PREFIX);
    if answers.includes_job_history() {
        kinds.push(StepKind::JobsManager);
    }
    kinds.extend_from_slice(&SUFFIX);
    kinds
}

/// Derives the ordered step list for `answers`. Pure and deterministic:
/// only `include_job_history` affects the result.
pub fn derive_steps(answers: &AnswerSet) -> Vec<StepDefinition> {
    step_kinds(answers)
        .into_iter()
        .enumerate()
        .map(|(i, kind)| StepDefinition {
            id: i + 1,
            kind,
            label: kind.label(),
        })
        .collect()
}

/// 1-based position of `kind` in the list derived from `answers`.
pub fn position_of(kind: StepKind, answers: &AnswerSet) -> Option<usize> {
    step_kinds(answers)
        .iter()
        .position(|k| *k == kind)
        .map(|i| i + 1)
}
