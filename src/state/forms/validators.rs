//! Field validators
//!
//! Pure functions from a field value (plus the sibling values carried by
//! [`ValidationContext`]) to an optional error message. `None` means valid.

use super::field::{FieldId, MARITAL_STATUSES, MARRIED};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

pub const PHONE_DIGITS: usize = 8;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cross-field data the validators may consult
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub password: &'a str,
    pub marital_status: &'a str,
    pub child_count: usize,
    pub terms_accepted: bool,
    pub has_token: bool,
    pub today: NaiveDate,
}

impl ValidationContext<'_> {
    /// Whether the children section is open
    pub fn is_married(&self) -> bool {
        self.marital_status == MARRIED
    }

    /// Whether child record `index` is currently required
    pub fn child_required(&self, index: usize) -> bool {
        self.is_married() && index < self.child_count
    }
}

/// Validate a single field
pub fn validate(field: FieldId, value: &str, ctx: &ValidationContext<'_>) -> Option<String> {
    match field {
        FieldId::Email => required(value).or_else(|| email(value)),
        FieldId::Password => required(value).or_else(|| password(value)),
        FieldId::ConfirmPassword => {
            required(value).or_else(|| password_confirmation(value, ctx.password))
        }
        FieldId::Phone => required(value).or_else(|| phone(value)),
        FieldId::LastName | FieldId::FirstName | FieldId::Address | FieldId::City => {
            required(value)
        }
        FieldId::MaritalStatus => required(value).or_else(|| one_of(value, MARITAL_STATUSES)),
        FieldId::ChildCount => None,
        FieldId::ChildName(i) => conditional_required(value, ctx.child_required(i)),
        FieldId::ChildBirthDate(i) => conditional_required(value, ctx.child_required(i))
            .or_else(|| {
                if ctx.child_required(i) {
                    birth_date(value, ctx.today)
                } else {
                    None
                }
            }),
        FieldId::Terms => (!ctx.terms_accepted)
            .then(|| "You must accept the terms of sale".to_string()),
        FieldId::Verification => {
            (!ctx.has_token).then(|| "Please complete the verification".to_string())
        }
    }
}

/// Required non-empty string (trimmed)
pub fn required(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("This field is required".to_string())
    } else {
        None
    }
}

/// `local@domain.tld`
pub fn email(value: &str) -> Option<String> {
    if EMAIL_RE.is_match(value.trim()) {
        None
    } else {
        Some("Invalid email address".to_string())
    }
}

/// Exactly eight digits. Values are cleaned at input time.
pub fn phone(value: &str) -> Option<String> {
    if value.len() == PHONE_DIGITS && value.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(format!("Phone number must have {PHONE_DIGITS} digits"))
    }
}

pub fn password(value: &str) -> Option<String> {
    if value.chars().count() >= MIN_PASSWORD_LEN {
        None
    } else {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ))
    }
}

pub fn password_confirmation(value: &str, password: &str) -> Option<String> {
    if value == password {
        None
    } else {
        Some("Passwords do not match".to_string())
    }
}

/// Required only while `gate` holds
pub fn conditional_required(value: &str, gate: bool) -> Option<String> {
    if gate {
        required(value)
    } else {
        None
    }
}

pub fn one_of(value: &str, allowed: &[&str]) -> Option<String> {
    if allowed.contains(&value) {
        None
    } else {
        Some("Please choose one of the listed options".to_string())
    }
}

/// Calendar date in `YYYY-MM-DD`, not after `today`
pub fn birth_date(value: &str, today: NaiveDate) -> Option<String> {
    match NaiveDate::parse_from_str(value.trim(), DATE_FORMAT) {
        Ok(date) if date > today => Some("Birth date cannot be in the future".to_string()),
        Ok(_) => None,
        Err(_) => Some("Use the YYYY-MM-DD format".to_string()),
    }
}
