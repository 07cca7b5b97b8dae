//! Wire-level helpers for registry API responses.

use serde_json::Value;

/// Structured error extracted from a non-success response body.
///
/// The registry's error shapes vary between controllers, so extraction is
/// tolerant: `message`/`error` for the headline, `status`/`errorCode` for
/// the code, `error`/`debug`/`stacktrace` for the details. Whatever is
/// found is carried verbatim to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<Value>,
}

impl ApiErrorBody {
    /// Parse an error body; plain-text and empty bodies degrade gracefully.
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            return Self::from_text(trimmed);
        };

        match value {
            Value::Object(ref obj) => {
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .or_else(|| obj.get("error").and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| Self::from_text(trimmed).message);

                let code = obj
                    .get("status")
                    .or_else(|| obj.get("errorCode"))
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });

                let details = obj
                    .get("error")
                    .or_else(|| obj.get("debug"))
                    .or_else(|| obj.get("stacktrace"))
                    .cloned();

                Self {
                    message,
                    code,
                    details,
                }
            }
            Value::String(s) if !s.trim().is_empty() => Self::from_text(&s),
            _ => Self::from_text(""),
        }
    }

    fn from_text(text: &str) -> Self {
        let text = text.trim();
        Self {
            message: if text.is_empty() {
                "Request failed".to_string()
            } else {
                text.to_string()
            },
            code: None,
            details: None,
        }
    }
}
