//! SMTP mail transport implementation using lettre

use super::provider::{EmailProviderError, MailTransport};
use crate::domain::{ApiRelayConfig, DeliveryReceipt, DirectAccountConfig, EmailAddress, EmailMessage};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

/// Gmail submission host (implicit TLS)
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";
pub const GMAIL_SMTP_PORT: u16 = 465;

/// SendGrid SMTP relay (STARTTLS)
pub const SENDGRID_SMTP_HOST: &str = "smtp.sendgrid.net";
pub const SENDGRID_SMTP_PORT: u16 = 587;

/// SendGrid expects this literal username, with the API key as password
pub const SENDGRID_RELAY_USER: &str = "apikey";

/// SMTP-based transport for both provider strategies
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    provider_name: &'static str,
    /// Credential variables that were not set when the transport was built
    missing_credentials: Vec<&'static str>,
}

impl std::fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("provider_name", &self.provider_name)
            .field("missing_credentials", &self.missing_credentials)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpMailTransport {
    /// Build a transport that logs in to the Gmail account directly.
    ///
    /// Without both fields the transport is still built, but every send and
    /// verify fails with [`EmailProviderError::NotConfigured`].
    pub fn from_direct_account(config: &DirectAccountConfig) -> Result<Self, EmailProviderError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_SMTP_HOST)
            .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?
            .port(GMAIL_SMTP_PORT);

        if let (Some(email), Some(password)) = (&config.email, &config.password) {
            builder = builder.credentials(Credentials::new(email.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            provider_name: "gmail",
            missing_credentials: config.missing_fields(),
        })
    }

    /// Build a transport for the SendGrid relay
    pub fn from_api_relay(config: &ApiRelayConfig) -> Result<Self, EmailProviderError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SENDGRID_SMTP_HOST)
            .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?
            .port(SENDGRID_SMTP_PORT);

        if let Some(api_key) = &config.api_key {
            builder = builder.credentials(Credentials::new(
                SENDGRID_RELAY_USER.to_string(),
                api_key.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            provider_name: "sendgrid",
            missing_credentials: config.missing_fields(),
        })
    }

    /// Fails before any network I/O when credentials were missing at build
    /// time. lettre sends no AUTH without credentials.
    fn ensure_credentials(&self) -> Result<(), EmailProviderError> {
        if self.missing_credentials.is_empty() {
            Ok(())
        } else {
            Err(EmailProviderError::NotConfigured(
                self.missing_credentials.join(", "),
            ))
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, EmailProviderError> {
        self.ensure_credentials()?;
        let message_id = new_message_id(&message.from);
        let email = build_message(message, &message_id)?;

        debug!(
            provider = self.provider_name,
            message_id = %message_id,
            "handing message to SMTP server"
        );

        self.transport
            .send(email)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        Ok(DeliveryReceipt::new(message_id))
    }

    async fn verify(&self) -> Result<(), EmailProviderError> {
        self.ensure_credentials()?;
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(EmailProviderError::ConnectionError(
                "SMTP server rejected the connection test".to_string(),
            )),
            Err(e) => Err(classify_smtp_error(&e)),
        }
    }

    fn provider_name(&self) -> &'static str {
        self.provider_name
    }
}

/// Message-ID in the `<unique@sender-domain>` form mail clients expect
fn new_message_id(from: &EmailAddress) -> String {
    format!(
        "<{}@{}>",
        Uuid::new_v4(),
        from.domain().unwrap_or("scrapitdown.com")
    )
}

/// Build a `lettre::Message` (text + HTML alternatives when a text body exists)
fn build_message(message: &EmailMessage, message_id: &str) -> Result<Message, EmailProviderError> {
    let from: Mailbox = message.from.email.parse().map_err(|e| {
        EmailProviderError::InvalidConfiguration(format!("Invalid from address: {}", e))
    })?;

    if message.to.is_empty() {
        return Err(EmailProviderError::SendFailed(
            "No recipients specified".to_string(),
        ));
    }

    let mut builder = Message::builder()
        .from(from)
        .subject(&message.subject)
        .message_id(Some(message_id.to_string()));

    for addr in &message.to {
        let mailbox: Mailbox = addr
            .email
            .parse()
            .map_err(|e| EmailProviderError::SendFailed(format!("Invalid to address: {}", e)))?;
        builder = builder.to(mailbox);
    }

    let email = if let Some(text_body) = &message.text_body {
        builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(message.html_body.clone()),
                ),
        )
    } else {
        builder
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
    };

    email.map_err(|e| EmailProviderError::SendFailed(e.to_string()))
}

fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> EmailProviderError {
    let message = err.to_string();
    // 530/534/535 are the SMTP authentication rejections
    let auth_rejected = err
        .status()
        .map(|code| code.to_string().starts_with("53"))
        .unwrap_or(false);

    if auth_rejected || message.contains("authentication") || message.contains("AUTH") {
        EmailProviderError::AuthenticationFailed(message)
    } else if err.is_timeout() || message.contains("connection") {
        EmailProviderError::ConnectionError(message)
    } else {
        EmailProviderError::SendFailed(message)
    }
}
