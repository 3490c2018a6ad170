//! Human verification capability
//!
//! A provider hands out a challenge, checks the user's answer and, on
//! success, issues a time-limited token that goes into the draft.

use crate::state::VerificationToken;
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

const CODE_LEN: usize = 6;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("No verification challenge is loaded")]
    NotLoaded,
    #[error("The verification code does not match, a new one was issued")]
    Rejected,
    #[error("Verification unavailable: {0}")]
    Unavailable(String),
}

/// What the user is asked to reproduce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub code: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationProvider: Send {
    /// Issue a fresh challenge, replacing any previous one
    async fn load(&mut self) -> Result<Challenge, VerificationError>;

    /// Forget the current challenge
    fn reset(&mut self);

    /// Check an answer. A wrong answer consumes the challenge.
    async fn redeem(&mut self, answer: &str) -> Result<VerificationToken, VerificationError>;
}

/// Challenge generated in process: the user types back a short code
#[derive(Debug, Clone)]
pub struct LocalChallenge {
    ttl: chrono::Duration,
    current: Option<String>,
}

impl LocalChallenge {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self { ttl, current: None }
    }

    fn generate_code() -> String {
        Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(CODE_LEN)
            .collect::<String>()
            .to_uppercase()
    }
}

#[async_trait]
impl VerificationProvider for LocalChallenge {
    async fn load(&mut self) -> Result<Challenge, VerificationError> {
        let code = Self::generate_code();
        self.current = Some(code.clone());
        Ok(Challenge { code })
    }

    fn reset(&mut self) {
        self.current = None;
    }

    async fn redeem(&mut self, answer: &str) -> Result<VerificationToken, VerificationError> {
        let expected = self.current.take().ok_or(VerificationError::NotLoaded)?;
        if !answer.trim().eq_ignore_ascii_case(&expected) {
            tracing::debug!("Verification answer rejected");
            return Err(VerificationError::Rejected);
        }
        Ok(VerificationToken {
            value: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + self.ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn provider() -> LocalChallenge {
        LocalChallenge::new(chrono::Duration::seconds(120))
    }

    #[tokio::test]
    async fn test_load_issues_code() {
        let mut verifier = provider();
        let challenge = verifier.load().await.unwrap();
        assert_eq!(challenge.code.len(), CODE_LEN);
        assert!(challenge
            .code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_redeem_is_case_insensitive() {
        let mut verifier = provider();
        let challenge = verifier.load().await.unwrap();
        let token = verifier
            .redeem(&format!(" {} ", challenge.code.to_lowercase()))
            .await
            .unwrap();
        assert!(!token.value.is_empty());
        assert!(!token.is_expired(Utc::now()));
        assert!(token.is_expired(Utc::now() + chrono::Duration::seconds(121)));
    }

    #[tokio::test]
    async fn test_wrong_answer_consumes_challenge() {
        let mut verifier = provider();
        verifier.load().await.unwrap();
        assert_eq!(verifier.redeem("nope").await, Err(VerificationError::Rejected));
        assert_eq!(verifier.redeem("nope").await, Err(VerificationError::NotLoaded));
    }

    #[tokio::test]
    async fn test_reset_and_reload() {
        let mut verifier = provider();
        let first = verifier.load().await.unwrap();
        verifier.reset();
        assert_eq!(
            verifier.redeem(&first.code).await,
            Err(VerificationError::NotLoaded)
        );
        let second = assert_ok!(verifier.load().await);
        assert_ok!(verifier.redeem(&second.code).await);
    }

    #[tokio::test]
    async fn test_code_redeems_once() {
        let mut verifier = provider();
        let challenge = verifier.load().await.unwrap();
        assert_ok!(verifier.redeem(&challenge.code).await);
        assert_err!(verifier.redeem(&challenge.code).await);
        assert_eq!(
            verifier.redeem(&challenge.code).await,
            Err(VerificationError::NotLoaded)
        );
    }
}
