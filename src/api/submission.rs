//! Submission adapter
//!
//! Turns a draft into the payload the storefront expects, sends it, and
//! maps the server's answer back onto draft fields. Wire key names are
//! only known here.

use super::traits::RegistrationApi;
use super::types::{ApiError, RegisterResponse, RegistrationPayload};
use crate::state::{is_field_visible, DraftState, ErrorMap, FieldId, Wizard};
use serde_json::{json, Value};
use thiserror::Error;

/// Internal field to wire key, both directions
const WIRE_KEYS: &[(FieldId, &str)] = &[
    (FieldId::Email, "email"),
    (FieldId::Password, "password"),
    (FieldId::ConfirmPassword, "password_confirmation"),
    (FieldId::LastName, "nom"),
    (FieldId::FirstName, "prenom"),
    (FieldId::Phone, "tel"),
    (FieldId::Address, "adresse"),
    (FieldId::City, "ville"),
    (FieldId::MaritalStatus, "situation"),
    (FieldId::ChildCount, "nbr_enfants"),
    (FieldId::Terms, "terms_accepted"),
    (FieldId::Verification, "verification_token"),
];

const CHILDREN_KEY: &str = "enfants";
const CHILD_NAME_KEY: &str = "nom";
const CHILD_BIRTH_DATE_KEY: &str = "date_naissance";

pub const GENERIC_FAILURE: &str = "Registration failed, please try again later";
const UNREACHABLE: &str = "Could not reach the storefront, please try again";

/// Where the user goes after a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The account must be confirmed (e.g. by email) before use
    RequiresVerification { message: Option<String> },
    /// The account is immediately usable
    Ready { message: Option<String> },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The server rejected specific fields
    #[error("the server rejected {} field(s)", errors.len())]
    Fields {
        errors: ErrorMap,
        message: Option<String>,
    },
    /// The server (or the transport) failed without per-field detail
    #[error("{0}")]
    Message(String),
}

impl SubmissionError {
    pub fn field_errors(&self) -> ErrorMap {
        match self {
            Self::Fields { errors, .. } => errors.clone(),
            Self::Message(_) => ErrorMap::new(),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::Fields { message, .. } => message.clone(),
            Self::Message(message) => Some(message.clone()),
        }
    }
}

/// Wire key for a field
pub fn wire_key(field: FieldId) -> String {
    match field {
        FieldId::ChildName(i) => format!("{CHILDREN_KEY}.{i}.{CHILD_NAME_KEY}"),
        FieldId::ChildBirthDate(i) => format!("{CHILDREN_KEY}.{i}.{CHILD_BIRTH_DATE_KEY}"),
        other => WIRE_KEYS
            .iter()
            .find(|(id, _)| *id == other)
            .map(|(_, key)| key.to_string())
            .unwrap_or_default(),
    }
}

/// Field for a wire key, if the key is known
pub fn field_for_wire_key(key: &str) -> Option<FieldId> {
    if let Some(rest) = key.strip_prefix(CHILDREN_KEY).and_then(|r| r.strip_prefix('.')) {
        let (index, attr) = rest.split_once('.')?;
        let index: usize = index.parse().ok()?;
        return match attr {
            CHILD_NAME_KEY => Some(FieldId::ChildName(index)),
            CHILD_BIRTH_DATE_KEY => Some(FieldId::ChildBirthDate(index)),
            _ => None,
        };
    }
    WIRE_KEYS
        .iter()
        .find(|(_, wire)| *wire == key)
        .map(|(id, _)| *id)
}

/// Build the request body for a draft.
///
/// Only child records in a visible section are sent; records kept from a
/// larger earlier count, or from before the marital status changed, are not.
pub fn build_payload(draft: &DraftState) -> RegistrationPayload {
    let mut payload = RegistrationPayload::default();

    for (id, key) in WIRE_KEYS {
        match id {
            FieldId::ChildCount | FieldId::Terms | FieldId::Verification => {}
            _ => payload.insert(*key, draft.value(*id)),
        }
    }

    let children: Vec<Value> = draft
        .children()
        .iter()
        .enumerate()
        .filter(|(i, _)| is_field_visible(draft, FieldId::ChildName(*i)))
        .map(|(_, c)| {
            json!({
                CHILD_NAME_KEY: c.name.trim(),
                CHILD_BIRTH_DATE_KEY: c.birth_date.trim(),
            })
        })
        .collect();

    payload.insert(wire_key(FieldId::ChildCount), children.len());
    payload.insert(CHILDREN_KEY, children);
    payload.insert(wire_key(FieldId::Terms), draft.terms_accepted());
    payload.insert(
        wire_key(FieldId::Verification),
        draft
            .verification_token()
            .map(|t| t.value.clone())
            .unwrap_or_default(),
    );

    payload
}

/// Map a decoded response to an outcome
pub fn interpret(response: RegisterResponse) -> Result<SubmissionOutcome, SubmissionError> {
    if response.succeeded() {
        return Ok(if response.requires_verification {
            SubmissionOutcome::RequiresVerification {
                message: response.message,
            }
        } else {
            SubmissionOutcome::Ready {
                message: response.message,
            }
        });
    }

    let fallback = response
        .message
        .clone()
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    let Some((errors, unknown)) = response.errors.as_ref().and_then(parse_field_errors) else {
        return Err(SubmissionError::Message(fallback));
    };

    if errors.is_empty() {
        let message = if unknown.is_empty() {
            fallback
        } else {
            unknown.join("\n")
        };
        return Err(SubmissionError::Message(message));
    }

    let message = match (response.message, unknown.is_empty()) {
        (message, true) => message,
        (Some(message), false) => Some(format!("{message}\n{}", unknown.join("\n"))),
        (None, false) => Some(unknown.join("\n")),
    };
    Err(SubmissionError::Fields { errors, message })
}

/// Read `{wire_key: "msg" | ["msg", ...]}`. Returns `None` when the value
/// does not have that shape. Messages for unknown keys come back apart.
fn parse_field_errors(value: &Value) -> Option<(ErrorMap, Vec<String>)> {
    let object = value.as_object()?;
    let mut errors = ErrorMap::new();
    let mut unknown = Vec::new();

    for (key, entry) in object {
        let message = match entry {
            Value::String(s) => s.clone(),
            Value::Array(items) => items.iter().find_map(Value::as_str)?.to_string(),
            _ => return None,
        };
        match field_for_wire_key(key) {
            Some(field) => {
                errors.insert(field, message);
            }
            None => unknown.push(message),
        }
    }

    Some((errors, unknown))
}

/// Sends drafts through a [`RegistrationApi`]
pub struct SubmissionAdapter {
    api: Box<dyn RegistrationApi>,
}

impl SubmissionAdapter {
    pub fn new(api: Box<dyn RegistrationApi>) -> Self {
        Self { api }
    }

    /// Submit a draft. Never retries.
    pub async fn submit(&self, draft: &DraftState) -> Result<SubmissionOutcome, SubmissionError> {
        let payload = build_payload(draft);
        match self.api.register(&payload).await {
            Ok(response) => interpret(response),
            Err(e) => {
                tracing::error!(draft = %draft.id(), "Registration request failed: {e}");
                let message = match e {
                    ApiError::Transport(_) => UNREACHABLE,
                    ApiError::UnexpectedResponse { .. } => GENERIC_FAILURE,
                };
                Err(SubmissionError::Message(message.to_string()))
            }
        }
    }

    /// Submit the wizard's draft and record the result on it. The wizard
    /// must have returned [`crate::state::Advance::Submit`].
    pub async fn run(&self, wizard: &mut Wizard) -> Result<SubmissionOutcome, SubmissionError> {
        let result = self.submit(wizard.draft()).await;
        match &result {
            Ok(outcome) => {
                tracing::info!(draft = %wizard.draft().id(), ?outcome, "Registration accepted");
                wizard.complete_submission();
            }
            Err(e) => {
                tracing::info!(draft = %wizard.draft().id(), "Registration rejected: {e}");
                wizard.fail_submission(e.field_errors(), e.message());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::traits::MockRegistrationApi;
    use crate::state::fixtures::complete_draft;
    use crate::state::{Advance, WizardStep};

    fn submitting_wizard() -> Wizard {
        let mut wizard = Wizard::default();
        *wizard.draft_mut() = complete_draft();
        while wizard.advance() != Advance::Submit {}
        wizard
    }

    fn failure(errors: Value) -> RegisterResponse {
        RegisterResponse {
            success: Some(false),
            errors: Some(errors),
            ..Default::default()
        }
    }

    mod wire_table {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_round_trip_for_every_field() {
            for (id, key) in WIRE_KEYS {
                assert_eq!(wire_key(*id), *key);
                assert_eq!(field_for_wire_key(key), Some(*id));
            }
            assert_eq!(wire_key(FieldId::ChildName(1)), "enfants.1.nom");
            assert_eq!(
                field_for_wire_key("enfants.3.date_naissance"),
                Some(FieldId::ChildBirthDate(3))
            );
        }

        #[test]
        fn test_unknown_keys() {
            assert_eq!(field_for_wire_key("coupon"), None);
            assert_eq!(field_for_wire_key("enfants.x.nom"), None);
            assert_eq!(field_for_wire_key("enfants.0.age"), None);
            assert_eq!(field_for_wire_key("enfants"), None);
        }
    }

    mod payload {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_uses_wire_names() {
            let payload = build_payload(&complete_draft());
            assert_eq!(payload.get("email"), Some(&json!("amira@shop.tn")));
            assert_eq!(payload.get("tel"), Some(&json!("98765432")));
            assert_eq!(payload.get("prenom"), Some(&json!("Amira")));
            assert_eq!(payload.get("password_confirmation"), Some(&json!("secret1")));
            assert_eq!(payload.get("terms_accepted"), Some(&json!(true)));
            assert_eq!(payload.get("verification_token"), Some(&json!("token")));
            assert_eq!(
                payload.get("enfants"),
                Some(&json!([{"nom": "Youssef", "date_naissance": "2016-04-12"}]))
            );
            assert_eq!(payload.get("nbr_enfants"), Some(&json!(1)));
        }

        #[test]
        fn test_stale_children_are_not_sent() {
            let mut draft = complete_draft();
            draft.set_conditional_count(2);
            draft.set_field(FieldId::ChildName(1), "Lina");
            draft.set_conditional_count(1);
            let payload = build_payload(&draft);
            assert_eq!(payload.get("enfants").and_then(Value::as_array).map(Vec::len), Some(1));

            draft.set_field(FieldId::MaritalStatus, "Célibataire");
            let payload = build_payload(&draft);
            assert_eq!(payload.get("enfants"), Some(&json!([])));
            assert_eq!(payload.get("nbr_enfants"), Some(&json!(0)));
        }
    }

    mod interpretation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_success_branches() {
            let ready = interpret(RegisterResponse {
                success: Some(true),
                ..Default::default()
            });
            assert_eq!(ready, Ok(SubmissionOutcome::Ready { message: None }));

            let verify = interpret(RegisterResponse {
                success: Some(true),
                requires_verification: true,
                message: Some("Check your email".to_string()),
                ..Default::default()
            });
            assert_eq!(
                verify,
                Ok(SubmissionOutcome::RequiresVerification {
                    message: Some("Check your email".to_string())
                })
            );
        }

        #[test]
        fn test_structured_errors_translate_to_fields() {
            let err = interpret(failure(json!({
                "email": "already used",
                "tel": ["invalid", "too short"],
                "enfants.0.nom": ["required"],
            })))
            .unwrap_err();
            let expected: ErrorMap = [
                (FieldId::Email, "already used".to_string()),
                (FieldId::Phone, "invalid".to_string()),
                (FieldId::ChildName(0), "required".to_string()),
            ]
            .into();
            assert_eq!(err.field_errors(), expected);
            assert_eq!(err.message(), None);
        }

        #[test]
        fn test_unknown_keys_fold_into_message() {
            let err = interpret(RegisterResponse {
                success: Some(false),
                message: Some("Invalid data".to_string()),
                errors: Some(json!({"email": "taken", "coupon": "expired"})),
                ..Default::default()
            })
            .unwrap_err();
            assert_eq!(err.field_errors().len(), 1);
            assert_eq!(err.message(), Some("Invalid data\nexpired".to_string()));
        }

        #[test]
        fn test_only_unknown_keys_is_a_message() {
            let err = interpret(failure(json!({"coupon": "expired"}))).unwrap_err();
            assert_eq!(err, SubmissionError::Message("expired".to_string()));
        }

        #[test]
        fn test_unexpected_shapes_are_generic() {
            for errors in [json!("boom"), json!([1, 2]), json!({"email": 3}), json!({"email": []})] {
                let err = interpret(failure(errors)).unwrap_err();
                assert_eq!(err, SubmissionError::Message(GENERIC_FAILURE.to_string()));
            }
        }

        #[test]
        fn test_server_message_preferred_over_generic() {
            let err = interpret(RegisterResponse {
                success: Some(false),
                message: Some("Maintenance".to_string()),
                ..Default::default()
            })
            .unwrap_err();
            assert_eq!(err, SubmissionError::Message("Maintenance".to_string()));
        }
    }

    mod adapter {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_structured_failure_updates_draft() {
            let mut api = MockRegistrationApi::new();
            api.expect_register()
                .times(1)
                .returning(|_| Ok(failure(json!({"email": "already used"}))));
            let adapter = SubmissionAdapter::new(Box::new(api));

            let mut wizard = submitting_wizard();
            let result = adapter.run(&mut wizard).await;

            assert!(matches!(result, Err(SubmissionError::Fields { .. })));
            assert_eq!(wizard.draft().error(FieldId::Email), Some("already used"));
            assert_eq!(wizard.current_step(), WizardStep::Confirmation);
            assert!(!wizard.draft().is_submitting());
        }

        #[tokio::test]
        async fn test_success_clears_errors() {
            let mut api = MockRegistrationApi::new();
            api.expect_register()
                .withf(|payload| payload.get("email") == Some(&json!("amira@shop.tn")))
                .times(1)
                .returning(|_| {
                    Ok(RegisterResponse {
                        success: Some(true),
                        ..Default::default()
                    })
                });
            let adapter = SubmissionAdapter::new(Box::new(api));

            let mut wizard = submitting_wizard();
            wizard.draft_mut().set_global_error("old");
            let result = adapter.run(&mut wizard).await;

            assert_eq!(result, Ok(SubmissionOutcome::Ready { message: None }));
            assert!(wizard.draft().errors().is_empty());
            assert!(wizard.draft().global_error().is_none());
        }

        #[tokio::test]
        async fn test_transport_failure_is_generic_message() {
            let mut api = MockRegistrationApi::new();
            api.expect_register()
                .times(1)
                .returning(|_| Err(ApiError::Transport("connection refused".to_string())));
            let adapter = SubmissionAdapter::new(Box::new(api));

            let mut wizard = submitting_wizard();
            let before = wizard.draft().value(FieldId::Email);
            let result = adapter.run(&mut wizard).await;

            assert_eq!(result, Err(SubmissionError::Message(UNREACHABLE.to_string())));
            assert_eq!(wizard.draft().global_error(), Some(UNREACHABLE));
            assert_eq!(wizard.draft().value(FieldId::Email), before);
        }

        #[tokio::test]
        async fn test_garbled_response_is_generic_message() {
            let mut api = MockRegistrationApi::new();
            api.expect_register().times(1).returning(|_| {
                Err(ApiError::UnexpectedResponse {
                    status: 502,
                    body: "<html>".to_string(),
                })
            });
            let adapter = SubmissionAdapter::new(Box::new(api));

            let mut wizard = submitting_wizard();
            let result = adapter.run(&mut wizard).await;
            assert_eq!(result, Err(SubmissionError::Message(GENERIC_FAILURE.to_string())));
        }
    }
}
