//! Request and result shapes for the two callable entry points

use serde::{Deserialize, Deserializer, Serialize};

/// Input to `sendVerificationEmail`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SendVerificationRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub code: Option<String>,
}

impl SendVerificationRequest {
    pub fn new(email: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            code: Some(code.into()),
        }
    }
}

/// Input to `testSendEmail`
///
/// `email` is only checked for presence; the configuration test
/// authenticates against the provider without sending to it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TestEmailRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: Option<String>,
}

impl TestEmailRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub success: bool,
    pub message_id: String,
}

impl SendResult {
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: message_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub success: bool,
    pub message: String,
}

impl TestResult {
    pub fn configured() -> Self {
        Self {
            success: true,
            message: "Email service is configured correctly".to_string(),
        }
    }
}

/// Returns the value only when it is present and non-empty.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Accepts a JSON string or number. `null` and the number zero become `None`,
/// so they fail the presence check like an empty string.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
