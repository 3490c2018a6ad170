//! Trait abstraction for the storefront API to enable mocking in tests

use super::types::{ApiError, RegisterResponse, RegistrationPayload};
use async_trait::async_trait;

/// Trait for storefront API operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// POST a registration payload and return the decoded envelope
    async fn register(&self, payload: &RegistrationPayload) -> Result<RegisterResponse, ApiError>;
}
