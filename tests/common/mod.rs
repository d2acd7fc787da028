//! Test infrastructure
//!
//! Stub transports and a router builder so the callable endpoints can be
//! exercised without any SMTP server.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use scrapitdown_mailer::config::{Config, MailConfig, TelemetryConfig};
use scrapitdown_mailer::domain::{DeliveryReceipt, EmailMessage, TransportStrategy};
use scrapitdown_mailer::email::{EmailProviderError, MailTransport, TransportResolver};
use scrapitdown_mailer::server::{build_router, AppState};
use scrapitdown_mailer::service::DispatchService;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_config(mail: MailConfig) -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        mail,
        telemetry: TelemetryConfig::default(),
    }
}

// ============================================================================
// Stub transport
// ============================================================================

/// What the stub provider does when called
#[derive(Clone)]
pub enum ProviderBehavior {
    Accept(&'static str),
    Reject(&'static str),
}

/// Shared record of everything the stub saw
#[derive(Default)]
pub struct ProviderCalls {
    pub resolves: AtomicUsize,
    pub verifies: AtomicUsize,
    pub strategies: Mutex<Vec<TransportStrategy>>,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl ProviderCalls {
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn verify_count(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

pub struct StubTransport {
    behavior: ProviderBehavior,
    calls: Arc<ProviderCalls>,
}

#[async_trait]
impl MailTransport for StubTransport {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, EmailProviderError> {
        self.calls.sent.lock().unwrap().push(message.clone());
        match &self.behavior {
            ProviderBehavior::Accept(id) => Ok(DeliveryReceipt::new(*id)),
            ProviderBehavior::Reject(detail) => {
                Err(EmailProviderError::SendFailed(detail.to_string()))
            }
        }
    }

    async fn verify(&self) -> Result<(), EmailProviderError> {
        self.calls.verifies.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ProviderBehavior::Accept(_) => Ok(()),
            ProviderBehavior::Reject(detail) => {
                Err(EmailProviderError::AuthenticationFailed(detail.to_string()))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

pub struct StubResolver {
    behavior: ProviderBehavior,
    calls: Arc<ProviderCalls>,
}

impl StubResolver {
    pub fn new(behavior: ProviderBehavior) -> (Self, Arc<ProviderCalls>) {
        let calls = Arc::new(ProviderCalls::default());
        (
            Self {
                behavior,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl TransportResolver for StubResolver {
    async fn resolve(
        &self,
        strategy: TransportStrategy,
        _config: &MailConfig,
    ) -> Result<Box<dyn MailTransport>, EmailProviderError> {
        self.calls.resolves.fetch_add(1, Ordering::SeqCst);
        self.calls.strategies.lock().unwrap().push(strategy);
        Ok(Box::new(StubTransport {
            behavior: self.behavior.clone(),
            calls: self.calls.clone(),
        }))
    }
}

// ============================================================================
// Router helpers
// ============================================================================

pub fn dispatch_service(mail: MailConfig, behavior: ProviderBehavior) -> (DispatchService, Arc<ProviderCalls>) {
    let (resolver, calls) = StubResolver::new(behavior);
    let service = DispatchService::with_resolver(Arc::new(mail), Arc::new(resolver));
    (service, calls)
}

pub fn test_router(mail: MailConfig, behavior: ProviderBehavior) -> (Router, Arc<ProviderCalls>) {
    let (service, calls) = dispatch_service(mail.clone(), behavior);
    let state = AppState::with_dispatch_service(test_config(mail), service);
    (build_router(state), calls)
}

/// POST a JSON body, returning the status and parsed JSON response
pub async fn post_json<T: Serialize>(
    app: &Router,
    path: &str,
    body: &T,
) -> (StatusCode, serde_json::Value) {
    post_raw(app, path, serde_json::to_string(body).unwrap()).await
}

pub async fn post_raw(app: &Router, path: &str, body: String) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn get_text(app: &Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    (status, String::from_utf8_lossy(&body_bytes).into_owned())
}
