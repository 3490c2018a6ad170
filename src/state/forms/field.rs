//! Form field identities and presentation metadata

use std::fmt;

/// Marital status labels accepted by the storefront
pub const MARITAL_STATUSES: &[&str] = &["Célibataire", "Marié(e)", "Divorcé(e)", "Veuf(ve)"];

/// The marital status that opens the children section
pub const MARRIED: &str = "Marié(e)";

/// Upper bound for the number of child records
pub const MAX_CHILDREN: usize = 10;

/// Identity of every field the registration wizard collects.
///
/// Child fields carry a 0-based index into the draft's child records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Email,
    Password,
    ConfirmPassword,
    LastName,
    FirstName,
    Phone,
    Address,
    City,
    MaritalStatus,
    ChildCount,
    ChildName(usize),
    ChildBirthDate(usize),
    Terms,
    Verification,
}

impl FieldId {
    /// Human readable label
    pub fn label(&self) -> String {
        match self {
            Self::Email => "Email".to_string(),
            Self::Password => "Password".to_string(),
            Self::ConfirmPassword => "Confirm password".to_string(),
            Self::LastName => "Last name".to_string(),
            Self::FirstName => "First name".to_string(),
            Self::Phone => "Phone (8 digits)".to_string(),
            Self::Address => "Address".to_string(),
            Self::City => "City".to_string(),
            Self::MaritalStatus => "Marital status".to_string(),
            Self::ChildCount => "Number of children".to_string(),
            Self::ChildName(i) => format!("Child {} name", i + 1),
            Self::ChildBirthDate(i) => format!("Child {} birth date (YYYY-MM-DD)", i + 1),
            Self::Terms => "I accept the terms of sale".to_string(),
            Self::Verification => "Verification code".to_string(),
        }
    }

    /// How the field is edited and displayed
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Password | Self::ConfirmPassword => FieldKind::Secret,
            Self::MaritalStatus => FieldKind::Choice(MARITAL_STATUSES),
            Self::ChildCount => FieldKind::Count { max: MAX_CHILDREN },
            Self::Terms => FieldKind::Checkbox,
            Self::ChildBirthDate(_) => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// Child record index, if this is a child field
    pub fn child_index(&self) -> Option<usize> {
        match self {
            Self::ChildName(i) | Self::ChildBirthDate(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Editing behaviour of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Date,
    Choice(&'static [&'static str]),
    Count { max: usize },
    Checkbox,
}

impl FieldKind {
    /// Whether typed characters go straight into the value
    pub fn accepts_text(&self) -> bool {
        matches!(self, Self::Text | Self::Secret | Self::Date)
    }
}

/// A field as shown on screen: identity plus the value to render
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub error: Option<String>,
}

impl FormField {
    pub fn new(id: FieldId, value: &str, error: Option<&str>) -> Self {
        Self {
            id,
            label: id.label(),
            kind: id.kind(),
            value: value.to_string(),
            error: error.map(str::to_string),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(self.value.chars().count()),
            FieldKind::Checkbox => {
                if self.value == "true" {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Choice(_) if self.value.is_empty() => "< choose >".to_string(),
            FieldKind::Choice(_) | FieldKind::Count { .. } => format!("< {} >", self.value),
            FieldKind::Text | FieldKind::Date => self.value.clone(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
