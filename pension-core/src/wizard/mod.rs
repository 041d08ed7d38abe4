//! The step wizard: derived step list plus the navigation controller.

mod navigation;
mod steps;

pub use navigation::Wizard;
pub use steps::{StepDefinition, StepKind, derive_steps, position_of, step_kinds};
