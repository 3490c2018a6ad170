//! Wizard steps and their validation rules

use super::draft::{DraftState, ErrorMap};
use super::field::FieldId;
use super::sections::visible_sections;
use super::validators::validate;
use chrono::{DateTime, Utc};

/// Ordered steps of the registration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Account,
    Identity,
    Family,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::Account,
        Self::Identity,
        Self::Family,
        Self::Confirmation,
    ];

    /// Total number of steps
    pub const TOTAL: usize = Self::ALL.len();

    /// 1-based position
    pub fn number(&self) -> usize {
        match self {
            Self::Account => 1,
            Self::Identity => 2,
            Self::Family => 3,
            Self::Confirmation => 4,
        }
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Identity => "Identity",
            Self::Family => "Family",
            Self::Confirmation => "Confirmation",
        }
    }

    /// Step that owns a field
    pub fn owning(field: FieldId) -> Self {
        match field {
            FieldId::Email | FieldId::Password | FieldId::ConfirmPassword => Self::Account,
            FieldId::LastName
            | FieldId::FirstName
            | FieldId::Phone
            | FieldId::Address
            | FieldId::City => Self::Identity,
            FieldId::MaritalStatus
            | FieldId::ChildCount
            | FieldId::ChildName(_)
            | FieldId::ChildBirthDate(_) => Self::Family,
            FieldId::Terms | FieldId::Verification => Self::Confirmation,
        }
    }

    /// Fields shown and validated on this step for the given draft
    pub fn fields(&self, draft: &DraftState) -> Vec<FieldId> {
        match self {
            Self::Account => vec![
                FieldId::Email,
                FieldId::Password,
                FieldId::ConfirmPassword,
            ],
            Self::Identity => vec![
                FieldId::LastName,
                FieldId::FirstName,
                FieldId::Phone,
                FieldId::Address,
                FieldId::City,
            ],
            Self::Family => std::iter::once(FieldId::MaritalStatus)
                .chain(
                    visible_sections(draft)
                        .into_iter()
                        .flat_map(|section| section.fields()),
                )
                .collect(),
            Self::Confirmation => vec![FieldId::Terms, FieldId::Verification],
        }
    }
}

/// Validate every field of `step`. An empty map means the step passes.
pub fn validate_step(step: WizardStep, draft: &DraftState) -> ErrorMap {
    validate_step_at(step, draft, Utc::now())
}

/// Same as [`validate_step`] with an explicit clock
pub fn validate_step_at(step: WizardStep, draft: &DraftState, now: DateTime<Utc>) -> ErrorMap {
    let ctx = draft.validation_context(now);
    step.fields(draft)
        .into_iter()
        .filter_map(|id| validate(id, &draft.value(id), &ctx).map(|message| (id, message)))
        .collect()
}
