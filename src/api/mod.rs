//! Storefront API module: HTTP transport, submission and verification

mod client;
mod submission;
mod traits;
mod types;
mod verification;

pub use client::HttpApiClient;
pub use submission::{SubmissionAdapter, SubmissionError, SubmissionOutcome};
pub use traits::RegistrationApi;
pub use types::{ApiError, RegisterResponse};
pub use verification::{Challenge, LocalChallenge, VerificationError, VerificationProvider};

#[cfg(test)]
pub use traits::MockRegistrationApi;
#[cfg(test)]
pub use verification::MockVerificationProvider;
