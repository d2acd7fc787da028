//! Verification email dispatch

use crate::config::MailConfig;
use crate::domain::{
    present, DeliveryReceipt, EmailAddress, EmailMessage, SendResult, SendVerificationRequest,
    TestEmailRequest, TestResult,
};
use crate::email::{
    EmailProviderError, EmailTemplate, MailTransport, SmtpTransportResolver, TemplateEngine,
    TransportResolver,
};
use crate::error::{AppError, Result};
use crate::telemetry::metrics::{record_dispatch, record_provider_duration};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const SEND_OPERATION: &str = "send_verification_email";
const TEST_OPERATION: &str = "test_send_email";

/// Validates requests, resolves a transport per call and maps every
/// provider outcome to a [`SendResult`]/[`TestResult`] or an [`AppError`].
///
/// Holds only read-only configuration, so one instance is shared by all
/// concurrent invocations.
pub struct DispatchService {
    config: Arc<MailConfig>,
    resolver: Arc<dyn TransportResolver>,
}

impl DispatchService {
    pub fn new(config: Arc<MailConfig>) -> Self {
        Self::with_resolver(config, Arc::new(SmtpTransportResolver))
    }

    pub fn with_resolver(config: Arc<MailConfig>, resolver: Arc<dyn TransportResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Send the one-time code to `request.email`.
    ///
    /// Exactly one provider attempt per call; retries belong to the caller.
    pub async fn send_verification_code(
        &self,
        request: &SendVerificationRequest,
    ) -> Result<SendResult> {
        let (Some(email), Some(code)) = (present(&request.email), present(&request.code)) else {
            record_dispatch(SEND_OPERATION, "invalid_argument");
            return Err(AppError::InvalidArgument(
                "Missing email or code".to_string(),
            ));
        };

        match self.deliver_code(email, code).await {
            Ok(receipt) => {
                info!(to = %email, message_id = %receipt.message_id, "Verification email sent");
                record_dispatch(SEND_OPERATION, "success");
                Ok(SendResult::delivered(receipt.message_id))
            }
            Err(e) => {
                error!(to = %email, error = %e, "Error sending verification email");
                record_dispatch(SEND_OPERATION, "internal");
                Err(AppError::Internal(
                    "Failed to send verification email".to_string(),
                ))
            }
        }
    }

    /// Check that the configured provider accepts our credentials.
    ///
    /// `request.email` must be present but is not used: this authenticates
    /// against the provider and sends nothing.
    pub async fn test_configuration(&self, request: &TestEmailRequest) -> Result<TestResult> {
        if present(&request.email).is_none() {
            record_dispatch(TEST_OPERATION, "invalid_argument");
            return Err(AppError::InvalidArgument("Missing email".to_string()));
        }

        match self.verify_transport().await {
            Ok(()) => {
                info!(strategy = %self.config.strategy, "Email service configuration verified");
                record_dispatch(TEST_OPERATION, "success");
                Ok(TestResult::configured())
            }
            Err(e) => {
                error!(strategy = %self.config.strategy, error = %e, "Email service test failed");
                record_dispatch(TEST_OPERATION, "internal");
                Err(AppError::Internal(
                    "Email service is not configured correctly".to_string(),
                ))
            }
        }
    }

    /// Render the verification message addressed from the configured sender
    pub fn build_verification_message(&self, to: &str, code: &str) -> EmailMessage {
        let rendered = TemplateEngine::for_verification_code(code)
            .render_template(EmailTemplate::VerificationCode);

        EmailMessage::new(
            EmailAddress::new(self.config.sender_address()),
            EmailAddress::new(to),
            rendered.subject,
            rendered.html_body,
        )
        .with_text_body(rendered.text_body)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    async fn deliver_code(
        &self,
        to: &str,
        code: &str,
    ) -> std::result::Result<DeliveryReceipt, EmailProviderError> {
        let transport = self.resolve_transport().await?;
        let message = self.build_verification_message(to, code);

        self.bounded(SEND_OPERATION, transport.send(&message)).await
    }

    async fn verify_transport(&self) -> std::result::Result<(), EmailProviderError> {
        let transport = self.resolve_transport().await?;

        self.bounded(TEST_OPERATION, transport.verify()).await
    }

    async fn resolve_transport(
        &self,
    ) -> std::result::Result<Box<dyn MailTransport>, EmailProviderError> {
        self.resolver
            .resolve(self.config.strategy, &self.config)
            .await
    }

    /// Run a provider call under the configured deadline
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, EmailProviderError>>,
    ) -> std::result::Result<T, EmailProviderError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.send_timeout, call).await;
        record_provider_duration(operation, self.config.strategy.as_str(), started.elapsed());

        outcome.unwrap_or_else(|_| {
            warn!(
                operation,
                timeout_secs = self.config.send_timeout.as_secs(),
                "mail provider call timed out"
            );
            Err(EmailProviderError::Timeout(self.config.send_timeout.as_secs()))
        })
    }
}
