//! Outbound email for verification codes
//!
//! Two interchangeable SMTP strategies (using lettre):
//! - Gmail account login (direct account)
//! - SendGrid relay with an API key

pub mod provider;
pub mod resolver;
pub mod smtp;
pub mod templates;

pub use provider::{EmailProviderError, MailTransport};
pub use resolver::{SmtpTransportResolver, TransportResolver};
pub use smtp::SmtpMailTransport;
pub use templates::{EmailTemplate, RenderedEmail, TemplateEngine};
