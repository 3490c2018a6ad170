//! Draft state: everything the wizard has collected so far
//!
//! The draft is owned by a single wizard instance and mutated only in
//! response to user input or the completion of a submission.

use super::field::{FieldId, MAX_CHILDREN};
use super::sections::is_field_visible;
use super::steps::WizardStep;
use super::validators::{ValidationContext, PHONE_DIGITS};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Field id to error message. A missing key means the field is not
/// currently known to be invalid.
pub type ErrorMap = BTreeMap<FieldId, String>;

/// One dependent child
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildRecord {
    pub name: String,
    pub birth_date: String,
}

/// Token issued by the verification provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub const TOKEN_EXPIRED_MESSAGE: &str = "Verification expired, please verify again";

#[derive(Debug, Clone)]
pub struct DraftState {
    id: Uuid,
    fields: BTreeMap<FieldId, String>,
    children: Vec<ChildRecord>,
    child_count: usize,
    current_step: WizardStep,
    errors: ErrorMap,
    /// Fields whose current error came from the server
    server_errors: BTreeSet<FieldId>,
    global_error: Option<String>,
    terms_accepted: bool,
    verification_token: Option<VerificationToken>,
    submitting: bool,
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            fields: BTreeMap::new(),
            children: Vec::new(),
            child_count: 0,
            current_step: WizardStep::Account,
            errors: ErrorMap::new(),
            server_errors: BTreeSet::new(),
            global_error: None,
            terms_accepted: false,
            verification_token: None,
            submitting: false,
        }
    }

    /// Identifier used to correlate log lines for this draft
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current value of a field, rendered as text
    pub fn value(&self, id: FieldId) -> String {
        match id {
            FieldId::ChildCount => self.child_count.to_string(),
            FieldId::ChildName(i) => self
                .children
                .get(i)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            FieldId::ChildBirthDate(i) => self
                .children
                .get(i)
                .map(|c| c.birth_date.clone())
                .unwrap_or_default(),
            FieldId::Terms => {
                if self.terms_accepted {
                    "true".to_string()
                } else {
                    String::new()
                }
            }
            _ => self.fields.get(&id).cloned().unwrap_or_default(),
        }
    }

    /// Store a field value. Designated fields are transformed first; the
    /// field's error is cleared unconditionally.
    pub fn set_field(&mut self, id: FieldId, value: &str) {
        match id {
            FieldId::Phone => {
                self.fields.insert(id, clean_phone(value));
            }
            FieldId::ChildCount => {
                let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
                let count = if digits.is_empty() {
                    0
                } else {
                    // Overflowing input saturates and is then clamped
                    digits.parse().unwrap_or(usize::MAX)
                };
                self.set_conditional_count(count);
            }
            FieldId::Terms => self.terms_accepted = value == "true",
            FieldId::ChildName(i) | FieldId::ChildBirthDate(i) => {
                if i >= MAX_CHILDREN {
                    tracing::warn!("Ignoring input for child {i}: above the child limit");
                    return;
                }
                if self.children.len() <= i {
                    self.children.resize(i + 1, ChildRecord::default());
                }
                let record = &mut self.children[i];
                if matches!(id, FieldId::ChildName(_)) {
                    record.name = value.to_string();
                } else {
                    record.birth_date = value.to_string();
                }
            }
            _ => {
                self.fields.insert(id, value.to_string());
            }
        }
        self.clear_error(id);
    }

    /// Set the number of child records, bounded to `[0, MAX_CHILDREN]`.
    /// Records above the new count are kept.
    pub fn set_conditional_count(&mut self, n: usize) {
        self.child_count = n.min(MAX_CHILDREN);
        if self.children.len() < self.child_count {
            self.children
                .resize(self.child_count, ChildRecord::default());
        }
        self.clear_error(FieldId::ChildCount);
    }

    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// All stored child records, including ones beyond the current count
    pub fn children(&self) -> &[ChildRecord] {
        &self.children
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
        self.clear_error(FieldId::Terms);
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn set_verification_token(&mut self, token: VerificationToken) {
        self.verification_token = Some(token);
        self.clear_error(FieldId::Verification);
    }

    pub fn verification_token(&self) -> Option<&VerificationToken> {
        self.verification_token.as_ref()
    }

    pub fn has_valid_token(&self, now: DateTime<Utc>) -> bool {
        self.verification_token
            .as_ref()
            .is_some_and(|t| !t.value.is_empty() && !t.is_expired(now))
    }

    /// Drop an expired token and record why. Returns true if it expired.
    pub fn expire_verification(&mut self, now: DateTime<Utc>) -> bool {
        if !self
            .verification_token
            .as_ref()
            .is_some_and(|t| t.is_expired(now))
        {
            return false;
        }
        self.verification_token = None;
        self.fields.remove(&FieldId::Verification);
        self.errors
            .insert(FieldId::Verification, TOKEN_EXPIRED_MESSAGE.to_string());
        true
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub(super) fn set_current_step(&mut self, step: WizardStep) {
        self.current_step = step;
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, id: FieldId) -> Option<&str> {
        self.errors.get(&id).map(String::as_str)
    }

    pub fn global_error(&self) -> Option<&str> {
        self.global_error.as_deref()
    }

    pub fn set_global_error(&mut self, message: impl Into<String>) {
        self.global_error = Some(message.into());
    }

    fn clear_error(&mut self, id: FieldId) {
        self.errors.remove(&id);
        self.server_errors.remove(&id);
    }

    /// Replace the locally derived errors of `step` with `result`.
    /// Server-reported errors on fields the user has not edited survive.
    pub fn merge_step_errors(&mut self, step: WizardStep, result: ErrorMap) {
        let server_errors = &self.server_errors;
        self.errors
            .retain(|id, _| WizardStep::owning(*id) != step || server_errors.contains(id));
        for (id, message) in result {
            self.server_errors.remove(&id);
            self.errors.insert(id, message);
        }
    }

    /// Errors currently recorded against the visible fields of `step`.
    /// Errors on hidden conditional fields are kept but do not count.
    pub fn step_errors(&self, step: WizardStep) -> ErrorMap {
        self.errors
            .iter()
            .filter(|(id, _)| WizardStep::owning(**id) == step && is_field_visible(self, **id))
            .map(|(id, message)| (*id, message.clone()))
            .collect()
    }

    /// Record errors reported by the server
    pub fn merge_server_errors(&mut self, errors: ErrorMap) {
        for (id, message) in errors {
            self.server_errors.insert(id);
            self.errors.insert(id, message);
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.server_errors.clear();
        self.global_error = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Mark a submission as in flight. Returns false if one already is.
    pub(super) fn begin_submission(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.global_error = None;
        true
    }

    pub(super) fn end_submission(&mut self) {
        self.submitting = false;
    }

    /// Snapshot of the sibling values validators need
    pub fn validation_context(&self, now: DateTime<Utc>) -> ValidationContext<'_> {
        ValidationContext {
            password: self
                .fields
                .get(&FieldId::Password)
                .map(String::as_str)
                .unwrap_or(""),
            marital_status: self
                .fields
                .get(&FieldId::MaritalStatus)
                .map(String::as_str)
                .unwrap_or(""),
            child_count: self.child_count,
            terms_accepted: self.terms_accepted,
            has_token: self.has_valid_token(now),
            today: now.date_naive(),
        }
    }
}

/// Keep digits only, capped at the phone length
pub fn clean_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}
