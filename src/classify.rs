//! Classification of failed HTTP exchanges into actionable UI state.
//!
//! The backend is an out-of-scope collaborator and its error bodies are not
//! trusted to be well-formed: every lookup here probes the JSON leniently and
//! degrades to a canned per-status message instead of failing.

use serde_json::Value;
use std::collections::BTreeMap;

/// Advisory wait applied when the backend rate-limits without a `retryAfter`.
///
/// The authoritative window lives server-side and may drift from this guess.
pub const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Derived per-response classification; produced fresh, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: u16,
    pub message: String,
    pub retry_after_seconds: Option<u64>,
    pub is_rate_limited: bool,
}

/// Classification plus a human suggestion for the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyMessage {
    pub message: String,
    pub suggestion: Option<String>,
}

const fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request data. Please check your information and try again.",
        401 => "Authentication failed. Please log in again.",
        403 => "Access denied. You don't have permission to perform this action.",
        404 => "Resource not found. Please try again later.",
        409 => "This action conflicts with existing data. Please try a different email or username.",
        429 => "Too many requests. Please wait a few moments before trying again.",
        502 => "Service temporarily unavailable. Please try again in a few moments.",
        503 => "Service maintenance in progress. Please try again later.",
        504 => "Request timeout. Please try again.",
        // 500 and anything unrecognized share the generic server message.
        _ => "Server error. Our team has been notified. Please try again later.",
    }
}

/// Map a failed response to a message, an optional retry delay, and a
/// rate-limit flag.
///
/// A body-supplied `message` overrides the canned one only when it is short
/// and carries no markup, so a misbehaving backend cannot echo raw HTML into
/// the UI.
#[must_use]
pub fn classify(status: u16, body: Option<&Value>) -> Classification {
    let retry_after_seconds = body
        .and_then(|b| b.get("retryAfter"))
        .and_then(Value::as_u64)
        .filter(|seconds| *seconds > 0)
        .or((status == 429).then_some(DEFAULT_RETRY_AFTER_SECONDS));

    let code = body.and_then(|b| b.get("code")).and_then(Value::as_str);
    let is_rate_limited =
        status == 429 || matches!(code, Some("RATE_LIMITED" | "TOO_MANY_REQUESTS"));

    let message = body
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|message| message.chars().count() < 200 && !message.contains('<'))
        .unwrap_or_else(|| status_message(status))
        .to_string();

    Classification {
        status,
        message,
        retry_after_seconds,
        is_rate_limited,
    }
}

/// Classify and attach a retry suggestion where one helps.
#[must_use]
pub fn friendly_message(status: u16, body: Option<&Value>) -> FriendlyMessage {
    let classified = classify(status, body);

    let suggestion = if classified.is_rate_limited {
        let seconds = classified
            .retry_after_seconds
            .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
        Some(format!(
            "Please wait {} minute(s) before trying again.",
            seconds.div_ceil(60)
        ))
    } else if status == 400 {
        Some("Please review the highlighted fields and ensure all information is correct.".to_string())
    } else if status >= 500 {
        Some("Our team has been notified. Please try again in a few moments.".to_string())
    } else {
        None
    };

    FriendlyMessage {
        message: classified.message,
        suggestion,
    }
}

/// Extract per-field validation messages from `body.errors`.
///
/// Array values keep only their first message; anything that is neither a
/// string nor an array is skipped. Never fails on malformed input.
#[must_use]
pub fn field_errors(body: &Value) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    let Some(errors) = body.get("errors").and_then(Value::as_object) else {
        return fields;
    };

    for (field, value) in errors {
        match value {
            Value::Array(items) => {
                let first = items
                    .first()
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid value");
                fields.insert(field.clone(), first.to_string());
            }
            Value::String(message) => {
                fields.insert(field.clone(), message.clone());
            }
            _ => {}
        }
    }

    fields
}
