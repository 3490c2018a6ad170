//! Form domain layer
//!
//! Type-safe registration wizard: field validators, per-step rules, the
//! draft being collected, conditional sections and the step controller.

mod draft;
mod field;
mod form_state;
mod sections;
mod steps;
mod validators;
mod wizard;

pub use draft::{DraftState, ErrorMap, VerificationToken};
pub use field::{FieldId, FieldKind, FormField};
pub use form_state::{Form, FormButton, RegistrationForm};
pub use sections::is_field_visible;
pub use steps::WizardStep;
pub use wizard::{Advance, Wizard};
