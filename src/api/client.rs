//! HTTP client for the storefront API

use super::traits::RegistrationApi;
use super::types::{parse_response, ApiError, RegisterResponse, RegistrationPayload};
use crate::config::StorefrontConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};

/// Client for the storefront REST API
pub struct HttpApiClient {
    http: Client,
    register_url: String,
}

impl HttpApiClient {
    /// Create a new client from configuration
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            register_url: config.register_url(),
        })
    }
}

#[async_trait]
impl RegistrationApi for HttpApiClient {
    async fn register(&self, payload: &RegistrationPayload) -> Result<RegisterResponse, ApiError> {
        tracing::debug!(url = %self.register_url, "POST registration");

        let response = self
            .http
            .post(&self.register_url)
            .header(header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), "Registration response");
        parse_response(status.as_u16(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_endpoint() {
        let config = StorefrontConfig {
            api_base_url: Some("http://shop.local".to_string()),
            register_path: Some("/signup".to_string()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let client = HttpApiClient::new(&config).unwrap();
        assert_eq!(client.register_url, "http://shop.local/signup");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = StorefrontConfig {
            // Reserved port on loopback, nothing listens there
            api_base_url: Some("http://127.0.0.1:9".to_string()),
            request_timeout_secs: Some(2),
            ..Default::default()
        };
        let client = HttpApiClient::new(&config).unwrap();
        let result = client.register(&RegistrationPayload::default()).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
