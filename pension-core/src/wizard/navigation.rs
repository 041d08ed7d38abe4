//! Navigation controller for the pension wizard.
//!
//! The controller tracks the current step and completed steps by
//! [`StepKind`] rather than by index. Every index it hands out is computed
//! against the list derived from the live answers, so toggling the job
//! history choice (which inserts or removes a step) never leaves a stale
//! position behind.

use std::collections::BTreeSet;

use tracing::debug;

use super::steps::{StepDefinition, StepKind, derive_steps, position_of, step_kinds};
use crate::models::{AnswerSet, AnswerUpdate, JobId, JobRecord, PensionResults};
use crate::submission::SubmissionTicket;

/// One wizard session: the user's answers plus navigation state.
///
/// Invariant: `1 <= current_step() <= total_steps()`.
#[derive(Debug, Clone)]
pub struct Wizard {
    pub(crate) answers: AnswerSet,
    pub(crate) current: StepKind,
    pub(crate) completed: BTreeSet<StepKind>,
    pub(crate) results: Option<PensionResults>,
    pub(crate) pending: Option<SubmissionTicket>,
    pub(crate) last_ticket: u64,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Starts a fresh session on step 1 with no answers.
    pub fn new() -> Self {
        Self {
            answers: AnswerSet::default(),
            current: StepKind::Sex,
            completed: BTreeSet::new(),
            results: None,
            pending: None,
            last_ticket: 0,
        }
    }

    /// Resumes a session with answers collected elsewhere (e.g. a saved file).
    /// Navigation starts from step 1 with nothing completed.
    pub fn with_answers(answers: AnswerSet) -> Self {
        Self {
            answers,
            ..Self::new()
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn results(&self) -> Option<&PensionResults> {
        self.results.as_ref()
    }

    pub fn steps(&self) -> Vec<StepDefinition> {
        derive_steps(&self.answers)
    }

    pub fn total_steps(&self) -> usize {
        step_kinds(&self.answers).len()
    }

    /// 1-based index of the current step in the live step list.
    pub fn current_step(&self) -> usize {
        self.index_of(self.current).unwrap_or(1)
    }

    pub fn current_kind(&self) -> StepKind {
        self.current
    }

    pub fn current_definition(&self) -> StepDefinition {
        let kind = self.current;
        StepDefinition {
            id: self.current_step(),
            kind,
            label: kind.label(),
        }
    }

    pub fn is_at_summary(&self) -> bool {
        self.current == StepKind::Summary
    }

    /// Indices of completed steps in the live list.
    pub fn completed_steps(&self) -> BTreeSet<usize> {
        step_kinds(&self.answers)
            .iter()
            .enumerate()
            .filter(|(_, kind)| self.completed.contains(kind))
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn is_completed(&self, step: usize) -> bool {
        self.kind_at(step)
            .is_some_and(|kind| self.completed.contains(&kind))
    }

    /// End of the contiguous run of completed steps starting at step 1.
    ///
    /// This is not the largest completed index: with steps 2 and 3 completed
    /// but step 1 open it is 0, so [`go_to_step`](Self::go_to_step) refuses
    /// step 4 even though 3 is done. A step inserted mid-list (the jobs
    /// manager) breaks the run the same way until it is completed itself.
    pub fn highest_completed_step(&self) -> usize {
        step_kinds(&self.answers)
            .iter()
            .take_while(|kind| self.completed.contains(kind))
            .count()
    }

    /// Whether [`go_to_step`](Self::go_to_step) would accept `step`.
    pub fn is_accessible(&self, step: usize) -> bool {
        if step < 1 || step > self.total_steps() {
            return false;
        }
        step == self.current_step()
            || self.is_completed(step)
            || step <= self.highest_completed_step() + 1
    }

    /// Marks the current step completed and advances by one. At the last
    /// step only the completion is recorded.
    pub fn next_step(&mut self) {
        self.completed.insert(self.current);

        let current = self.current_step();
        match self.kind_at(current + 1) {
            Some(next) => self.move_to(next),
            None => debug!(step = current, "next_step ignored at last step"),
        }
    }

    /// Moves back one step; no-op on step 1.
    pub fn prev_step(&mut self) {
        let current = self.current_step();
        if current <= 1 {
            debug!("prev_step ignored at first step");
            return;
        }
        if let Some(prev) = self.kind_at(current - 1) {
            self.move_to(prev);
        }
    }

    /// Jumps to `step` when it is accessible. Returns whether the move happened.
    pub fn go_to_step(&mut self, step: usize) -> bool {
        if !self.is_accessible(step) {
            debug!(
                step,
                current = self.current_step(),
                highest_completed = self.highest_completed_step(),
                "go_to_step rejected"
            );
            return false;
        }
        match self.kind_at(step) {
            Some(kind) => {
                self.move_to(kind);
                true
            }
            None => false,
        }
    }

    /// Idempotent; out-of-range indices are ignored.
    pub fn mark_completed(&mut self, step: usize) {
        if let Some(kind) = self.kind_at(step) {
            self.completed.insert(kind);
        }
    }

    /// Shallow-merges `update` into the answers and re-derives the step list.
    pub fn update_data(&mut self, update: AnswerUpdate) {
        self.answers.merge(update);
        self.reconcile();
    }

    pub fn add_job(&mut self, job: JobRecord) {
        self.answers.add_job(job);
    }

    pub fn replace_job(&mut self, job: JobRecord) -> bool {
        self.answers.replace_job(job)
    }

    pub fn remove_job(&mut self, id: JobId) -> bool {
        self.answers.remove_job(id)
    }

    pub fn set_results(&mut self, results: PensionResults) {
        self.results = Some(results);
    }

    /// Clears answers, completion, results and any pending submission.
    pub fn reset(&mut self) {
        debug!("wizard reset");
        *self = Self {
            last_ticket: self.last_ticket,
            ..Self::new()
        };
    }

    fn kind_at(&self, step: usize) -> Option<StepKind> {
        if step == 0 {
            return None;
        }
        step_kinds(&self.answers).get(step - 1).copied()
    }

    fn index_of(&self, kind: StepKind) -> Option<usize> {
        position_of(kind, &self.answers)
    }

    fn move_to(&mut self, kind: StepKind) {
        if self.current == StepKind::Summary && kind != StepKind::Summary {
            self.abandon_submission();
        }
        self.current = kind;
    }

    /// Drops state that refers to steps no longer in the derived list.
    fn reconcile(&mut self) {
        let kinds = step_kinds(&self.answers);
        self.completed.retain(|kind| kinds.contains(kind));
        if !kinds.contains(&self.current) {
            // Only the jobs manager can disappear; it sits right after the choice step.
            debug!(from = ?self.current, "current step removed, falling back to job history choice");
            self.current = StepKind::JobHistoryChoice;
        }
    }
}
