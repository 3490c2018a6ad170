//! Wizard controller: linear step transitions guarded by step validation

use super::draft::{DraftState, ErrorMap};
use super::steps::{validate_step, WizardStep};

/// Result of asking the wizard to move forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step
    Moved(WizardStep),
    /// The current step has errors; they are recorded on the draft
    Blocked(ErrorMap),
    /// The terminal step passed and the submitting flag is now set.
    /// The caller must submit and then report back.
    Submit,
    /// A submission is already in flight
    InFlight,
}

/// Drives one registration draft through its steps
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    draft: DraftState,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            draft: DraftState::new(),
        }
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftState {
        &mut self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.draft.current_step()
    }

    pub fn total_steps(&self) -> usize {
        WizardStep::TOTAL
    }

    /// Fraction of the wizard reached, in `(0, 1]`
    pub fn progress(&self) -> f64 {
        self.current_step().number() as f64 / self.total_steps() as f64
    }

    /// Validate the current step and move on if it passes
    pub fn advance(&mut self) -> Advance {
        if self.draft.is_submitting() {
            return Advance::InFlight;
        }

        let step = self.current_step();
        let result = validate_step(step, &self.draft);
        self.draft.merge_step_errors(step, result);

        let blocking = self.draft.step_errors(step);
        if !blocking.is_empty() {
            tracing::debug!(
                draft = %self.draft.id(),
                step = step.number(),
                errors = blocking.len(),
                "Step validation failed"
            );
            return Advance::Blocked(blocking);
        }

        match step.next() {
            Some(next) => {
                self.draft.set_current_step(next);
                tracing::debug!(draft = %self.draft.id(), step = next.number(), "Advanced");
                Advance::Moved(next)
            }
            None => {
                self.draft.begin_submission();
                Advance::Submit
            }
        }
    }

    /// Step back. Errors are kept so the user sees them on return.
    /// Returns false at the first step.
    pub fn retreat(&mut self) -> bool {
        if self.draft.is_submitting() {
            return false;
        }
        match self.current_step().prev() {
            Some(prev) => {
                self.draft.set_current_step(prev);
                true
            }
            None => false,
        }
    }

    /// The in-flight submission succeeded
    pub fn complete_submission(&mut self) {
        self.draft.clear_errors();
        self.draft.end_submission();
    }

    /// The in-flight submission failed. The draft and step are kept.
    pub fn fail_submission(&mut self, field_errors: ErrorMap, message: Option<String>) {
        self.draft.merge_server_errors(field_errors);
        if let Some(message) = message {
            self.draft.set_global_error(message);
        }
        self.draft.end_submission();
    }
}
