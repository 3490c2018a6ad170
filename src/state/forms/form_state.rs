//! Focus and input handling for the registration form

use super::field::{FieldId, FieldKind, FormField};
use super::wizard::Wizard;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Buttons shown under every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormButton {
    Back,
    #[default]
    Next,
}

/// Registration wizard plus the cursor position on screen
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub wizard: Wizard,
    pub active_field_index: usize,
    pub selected_button: FormButton,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields of the current step, in display order
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.wizard
            .current_step()
            .fields(self.wizard.draft())
    }

    /// Fields of the current step with values and errors for rendering
    pub fn fields(&self) -> Vec<FormField> {
        let draft = self.wizard.draft();
        self.field_ids()
            .into_iter()
            .map(|id| FormField::new(id, &draft.value(id), draft.error(id)))
            .collect()
    }

    /// Field under the cursor, `None` on the buttons row
    pub fn active_field_id(&self) -> Option<FieldId> {
        self.field_ids().get(self.active_field_index).copied()
    }

    /// Returns true if the buttons row is currently active
    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_id().is_none()
    }

    pub fn toggle_button(&mut self) {
        self.selected_button = match self.selected_button {
            FormButton::Back => FormButton::Next,
            FormButton::Next => FormButton::Back,
        };
    }

    /// Put the cursor back on the first field (after a step change)
    pub fn reset_focus(&mut self) {
        self.active_field_index = 0;
        self.selected_button = FormButton::Next;
    }

    /// Move the cursor onto `field` if it is on the current step
    pub fn focus(&mut self, field: FieldId) {
        if let Some(index) = self.field_ids().iter().position(|id| *id == field) {
            self.active_field_index = index;
        }
    }

    /// Handle character input on the active field
    pub fn input_char(&mut self, c: char) {
        let Some(id) = self.active_field_id() else {
            return;
        };
        match id.kind() {
            kind if kind.accepts_text() => {
                let mut value = self.wizard.draft().value(id);
                value.push(c);
                self.wizard.draft_mut().set_field(id, &value);
            }
            FieldKind::Count { .. } => {
                if let Some(d) = c.to_digit(10) {
                    self.wizard
                        .draft_mut()
                        .set_conditional_count(d as usize);
                }
            }
            FieldKind::Checkbox if c == ' ' => self.toggle_checkbox(),
            _ => {}
        }
    }

    /// Handle backspace on the active field
    pub fn backspace(&mut self) {
        let Some(id) = self.active_field_id() else {
            return;
        };
        if id.kind().accepts_text() {
            let mut value = self.wizard.draft().value(id);
            value.pop();
            self.wizard.draft_mut().set_field(id, &value);
        }
    }

    /// Left/Right on choice and count fields
    pub fn cycle(&mut self, forward: bool) {
        let Some(id) = self.active_field_id() else {
            return;
        };
        match id.kind() {
            FieldKind::Choice(options) => {
                let current = self.wizard.draft().value(id);
                let next = match options.iter().position(|o| *o == current) {
                    None if forward => 0,
                    None => options.len() - 1,
                    Some(i) if forward => (i + 1) % options.len(),
                    Some(0) => options.len() - 1,
                    Some(i) => i - 1,
                };
                self.wizard.draft_mut().set_field(id, options[next]);
            }
            FieldKind::Count { max } => {
                let count = self.wizard.draft().child_count();
                let next = if forward {
                    (count + 1).min(max)
                } else {
                    count.saturating_sub(1)
                };
                self.wizard.draft_mut().set_conditional_count(next);
            }
            FieldKind::Checkbox => self.toggle_checkbox(),
            _ => {}
        }
    }

    fn toggle_checkbox(&mut self) {
        let accepted = self.wizard.draft().terms_accepted();
        self.wizard.draft_mut().set_terms_accepted(!accepted);
    }
}

impl Form for RegistrationForm {
    fn field_count(&self) -> usize {
        // fields plus buttons row
        self.field_ids().len() + 1
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
