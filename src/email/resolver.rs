//! Transport resolution: strategy + configuration -> ready transport

use super::provider::{EmailProviderError, MailTransport};
use super::smtp::SmtpMailTransport;
use crate::config::MailConfig;
use crate::domain::TransportStrategy;
use async_trait::async_trait;
use tracing::error;

/// Builds a [`MailTransport`] for the requested strategy.
///
/// Called lazily on every dispatch; nothing is cached between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportResolver: Send + Sync {
    async fn resolve(
        &self,
        strategy: TransportStrategy,
        config: &MailConfig,
    ) -> Result<Box<dyn MailTransport>, EmailProviderError>;
}

/// Production resolver backed by lettre SMTP transports.
///
/// Missing credentials are logged but do not prevent resolution; the
/// provider rejects the first real send instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpTransportResolver;

#[async_trait]
impl TransportResolver for SmtpTransportResolver {
    async fn resolve(
        &self,
        strategy: TransportStrategy,
        config: &MailConfig,
    ) -> Result<Box<dyn MailTransport>, EmailProviderError> {
        let missing = match strategy {
            TransportStrategy::DirectAccount => config.direct_account.missing_fields(),
            TransportStrategy::ApiRelay => config.api_relay.missing_fields(),
        };
        if !missing.is_empty() {
            error!(
                strategy = %strategy,
                missing = ?missing,
                "Mail credentials not set for {}: {}",
                strategy,
                missing.join(", ")
            );
        }

        let transport = match strategy {
            TransportStrategy::DirectAccount => {
                SmtpMailTransport::from_direct_account(&config.direct_account)?
            }
            TransportStrategy::ApiRelay => SmtpMailTransport::from_api_relay(&config.api_relay)?,
        };
        Ok(Box::new(transport))
    }
}
