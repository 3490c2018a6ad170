//! Wire types for the storefront API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// JSON body sent to the registration endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegistrationPayload(pub Map<String, Value>);

impl RegistrationPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }
}

/// Response envelope of the registration endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, alias = "requiresVerification")]
    pub requires_verification: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Either a map of wire field name to message(s), or anything else
    #[serde(default)]
    pub errors: Option<Value>,
}

impl RegisterResponse {
    /// A missing `success` flag counts as success when no errors came back
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(self.errors.is_none())
    }
}

/// Failures at the network boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Interpret a raw HTTP response. Any JSON envelope is accepted, whatever
/// the status; a non-success status always marks it as failed.
pub fn parse_response(status: u16, body: &str) -> Result<RegisterResponse, ApiError> {
    match serde_json::from_str::<RegisterResponse>(body) {
        Ok(mut response) => {
            if !(200..300).contains(&status) {
                response.success = Some(false);
            }
            Ok(response)
        }
        Err(_) => Err(ApiError::UnexpectedResponse {
            status,
            body: body.chars().take(200).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response =
            parse_response(201, r#"{"success": true, "requires_verification": true}"#).unwrap();
        assert!(response.succeeded());
        assert!(response.requires_verification);
    }

    #[test]
    fn test_camel_case_alias() {
        let response = parse_response(200, r#"{"requiresVerification": true}"#).unwrap();
        assert!(response.requires_verification);
        assert!(response.succeeded());
    }

    #[test]
    fn test_error_status_forces_failure() {
        let response = parse_response(500, r#"{"success": true}"#).unwrap();
        assert!(!response.succeeded());
    }

    #[test]
    fn test_structured_errors_are_kept_raw() {
        let response = parse_response(
            422,
            r#"{"message": "invalid", "errors": {"email": ["already used"]}}"#,
        )
        .unwrap();
        assert!(!response.succeeded());
        assert_eq!(response.errors, Some(json!({"email": ["already used"]})));
        assert_eq!(response.message.as_deref(), Some("invalid"));
    }

    #[test]
    fn test_errors_without_flag_mean_failure() {
        let response = parse_response(200, r#"{"errors": "nope"}"#).unwrap();
        assert!(!response.succeeded());
    }

    #[test]
    fn test_non_json_body() {
        let body = "<html>".repeat(100);
        match parse_response(502, &body) {
            Err(ApiError::UnexpectedResponse { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), 200);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_payload_serializes_flat() {
        let mut payload = RegistrationPayload::default();
        payload.insert("email", "a@b.tn");
        payload.insert("nbr_enfants", 2);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"email": "a@b.tn", "nbr_enfants": 2})
        );
    }
}
