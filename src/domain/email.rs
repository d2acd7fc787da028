//! Outbound email domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which provider strategy the transport resolver builds.
///
/// Chosen explicitly through configuration; never inferred from which
/// credentials happen to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStrategy {
    /// Authenticated mailbox account (Gmail SMTP)
    #[default]
    DirectAccount,
    /// API-key relay (SendGrid SMTP relay)
    ApiRelay,
}

impl TransportStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectAccount => "direct_account",
            Self::ApiRelay => "api_relay",
        }
    }
}

impl fmt::Display for TransportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gmail" | "direct_account" | "direct-account" => Ok(Self::DirectAccount),
            "sendgrid" | "api_relay" | "api-relay" => Ok(Self::ApiRelay),
            other => Err(format!(
                "unknown mail transport '{}' (expected gmail or sendgrid)",
                other
            )),
        }
    }
}

/// Credentials for the direct-account strategy
#[derive(Clone, Default, PartialEq)]
pub struct DirectAccountConfig {
    /// Mailbox address used to authenticate (also the default sender)
    pub email: Option<String>,
    /// App password for the mailbox
    pub password: Option<String>,
}

impl DirectAccountConfig {
    /// Names of the credential fields that are not set
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.is_none() {
            missing.push("GMAIL_EMAIL");
        }
        if self.password.is_none() {
            missing.push("GMAIL_PASSWORD");
        }
        missing
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for DirectAccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectAccountConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Credentials for the API-relay strategy
#[derive(Clone, Default, PartialEq)]
pub struct ApiRelayConfig {
    pub api_key: Option<String>,
}

impl ApiRelayConfig {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.api_key.is_none() {
            vec!["SENDGRID_API_KEY"]
        } else {
            Vec::new()
        }
    }
}

impl fmt::Debug for ApiRelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Bare email address, as supplied by the caller or configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAddress {
    pub email: String,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Domain part of the address, if it has one
    pub fn domain(&self) -> Option<&str> {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
    }
}

/// Email message handed to a transport
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

impl EmailMessage {
    pub fn new(
        from: EmailAddress,
        to: EmailAddress,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to: vec![to],
            subject: subject.into(),
            html_body: html_body.into(),
            text_body: None,
        }
    }

    pub fn with_text_body(mut self, text_body: impl Into<String>) -> Self {
        self.text_body = Some(text_body.into());
        self
    }
}

/// What a provider reports back for an accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Opaque provider identifier, passed through unparsed
    pub message_id: String,
}

impl DeliveryReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}
