//! Mail transport trait and error types

use crate::domain::{DeliveryReceipt, EmailMessage};
use async_trait::async_trait;
use thiserror::Error;

/// Provider-layer failures. Never shown to callers; the dispatch service
/// logs them and reports a generic internal failure.
#[derive(Error, Debug)]
pub enum EmailProviderError {
    #[error("Missing credentials: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Provider did not respond within {0} seconds")]
    Timeout(u64),
}

/// A ready-to-use outbound mail transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Hand a message to the provider
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, EmailProviderError>;

    /// Check that the provider accepts our credentials, without sending
    async fn verify(&self) -> Result<(), EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
