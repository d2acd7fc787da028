//! Configuration management for the mailer service

use crate::domain::{ApiRelayConfig, DirectAccountConfig, TransportStrategy};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Sender used when no identity is configured
pub const DEFAULT_SENDER: &str = "noreply@scrapitdown.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Outbound mail configuration
    pub mail: MailConfig,
    /// Logging and metrics
    pub telemetry: TelemetryConfig,
}

/// Outbound mail configuration, read-only after startup.
///
/// Credential fields are optional: a missing credential is reported when a
/// transport is resolved, not when the process starts.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Active provider strategy
    pub strategy: TransportStrategy,
    /// Gmail account credentials
    pub direct_account: DirectAccountConfig,
    /// SendGrid relay credentials
    pub api_relay: ApiRelayConfig,
    /// Explicit sender identity (MAIL_FROM)
    pub from_email: Option<String>,
    /// Deadline for a single provider call
    pub send_timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            strategy: TransportStrategy::DirectAccount,
            direct_account: DirectAccountConfig::default(),
            api_relay: ApiRelayConfig::default(),
            from_email: None,
            send_timeout: Duration::from_secs(60),
        }
    }
}

impl MailConfig {
    /// Sender address: MAIL_FROM, then the Gmail account, then [`DEFAULT_SENDER`]
    pub fn sender_address(&self) -> &str {
        self.from_email
            .as_deref()
            .or(self.direct_account.email.as_deref())
            .unwrap_or(DEFAULT_SENDER)
    }

    /// Credential variables the active strategy needs but does not have
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        match self.strategy {
            TransportStrategy::DirectAccount => self.direct_account.missing_fields(),
            TransportStrategy::ApiRelay => self.api_relay.missing_fields(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            service_name: "scrapitdown-mailer".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            mail: MailConfig {
                strategy: env::var("MAIL_TRANSPORT")
                    .unwrap_or_else(|_| "gmail".to_string())
                    .parse::<TransportStrategy>()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid MAIL_TRANSPORT")?,
                direct_account: DirectAccountConfig {
                    email: non_empty_var("GMAIL_EMAIL"),
                    password: non_empty_var("GMAIL_PASSWORD"),
                },
                api_relay: ApiRelayConfig {
                    api_key: non_empty_var("SENDGRID_API_KEY"),
                },
                from_email: non_empty_var("MAIL_FROM"),
                send_timeout: Duration::from_secs(
                    env::var("MAIL_SEND_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "60".to_string())
                        .parse()
                        .context("Invalid MAIL_SEND_TIMEOUT_SECS")?,
                ),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                    .unwrap_or(false),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "scrapitdown-mailer".to_string()),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
