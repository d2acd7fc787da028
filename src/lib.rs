//! Scrap It Down Mailer - verification email dispatch
//!
//! Sends one-time verification codes by email on behalf of the sign-up
//! flow, and offers a self-test of the outbound mail configuration. Both are
//! exposed as callable HTTP endpoints.

pub mod api;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod server;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
