//! Email template system
//!
//! Verification email content. Placeholders look like `{{code}}`; values
//! are HTML-escaped when substituted into the HTML body.

use std::collections::HashMap;

/// Product name shown in subjects and bodies
pub const APP_NAME: &str = "Scrap It Down";
/// Footer tagline
pub const APP_TAGLINE: &str = "Trade Smart, Trade Safe";
/// How long a verification code stays valid, as stated in the email
pub const CODE_EXPIRY_MINUTES: u32 = 10;

/// Templates this service can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// One-time email verification code
    VerificationCode,
}

impl EmailTemplate {
    /// Subject line, before substitution
    pub fn subject(&self) -> &'static str {
        match self {
            Self::VerificationCode => "{{app_name}} - Email Verification Code",
        }
    }

    pub fn html_body(&self) -> &'static str {
        match self {
            Self::VerificationCode => VERIFICATION_CODE_TEMPLATE,
        }
    }

    pub fn text_body(&self) -> &'static str {
        match self {
            Self::VerificationCode => VERIFICATION_CODE_TEMPLATE_TEXT,
        }
    }
}

/// Holds the values substituted into `{{name}}` placeholders
#[derive(Debug, Default)]
pub struct TemplateEngine {
    variables: HashMap<String, String>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine preloaded with everything the verification email needs
    pub fn for_verification_code(code: &str) -> Self {
        let mut engine = Self::new();
        engine
            .set("app_name", APP_NAME)
            .set("tagline", APP_TAGLINE)
            .set("expires_in_minutes", CODE_EXPIRY_MINUTES.to_string())
            .set("code", code);
        engine
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Substitute `{{name}}` placeholders verbatim. Unknown names are kept.
    pub fn render(&self, template: &str) -> String {
        self.substitute(template, |value| value.to_string())
    }

    /// Like [`render`](Self::render), escaping values for HTML
    pub fn render_html(&self, template: &str) -> String {
        self.substitute(template, escape_html)
    }

    /// Subject and text are substituted verbatim, the HTML body escaped
    pub fn render_template(&self, template: EmailTemplate) -> RenderedEmail {
        RenderedEmail {
            subject: self.render(template.subject()),
            html_body: self.render_html(template.html_body()),
            text_body: self.render(template.text_body()),
        }
    }

    /// Single left-to-right pass. Substituted values are never rescanned.
    fn substitute(&self, template: &str, encode: impl Fn(&str) -> String) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };

            match self.variables.get(&after[..end]) {
                Some(value) => {
                    result.push_str(&encode(value));
                    rest = &after[end + 2..];
                }
                None => {
                    // Unknown name: keep the braces and resume just after them
                    result.push_str("{{");
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }
}

/// Output of [`TemplateEngine::render_template`]
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Email Templates
// ============================================================================

const VERIFICATION_CODE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Email Verification Code</title>
</head>
<body style="margin: 0; padding: 0;">
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
        <h2 style="color: #333;">Welcome to {{app_name}}!</h2>
        <p>Your email verification code is:</p>
        <div style="background-color: #f0f0f0; padding: 20px; text-align: center; margin: 20px 0; border-radius: 5px;">
            <h1 style="letter-spacing: 5px; color: #0066cc; margin: 0;">{{code}}</h1>
        </div>
        <p>This code will expire in <strong>{{expires_in_minutes}} minutes</strong>.</p>
        <p>If you didn't request this code, you can safely ignore this email.</p>
        <hr style="margin: 30px 0; border: none; border-top: 1px solid #ddd;">
        <p style="color: #666; font-size: 12px;">
            {{app_name}} - {{tagline}}
        </p>
    </div>
</body>
</html>"#;

const VERIFICATION_CODE_TEMPLATE_TEXT: &str =
    "Your {{app_name}} verification code is: {{code}}\n\nThis code will expire in {{expires_in_minutes}} minutes.";
