// src/compile/classify.rs

//! Outcome classification.
//!
//! Rules, in order:
//! 1. A 2xx response whose content type is the artifact type is a success.
//! 2. Anything else that came back is a diagnostic, decoded from the body:
//!    UTF-8 first, then JSON (looking for a message field), then raw text.
//!    A body nothing can be made of becomes [`CompileError::Unparseable`].
//! 3. A transport failure keeps the transport's description, unless its
//!    partial payload yields a better message through rule 2.

use serde_json::Value;
use tracing::debug;

use super::error::CompileError;
use super::{Artifact, CompileOutcome, CompileResponse, CompileResult, TransportError};

/// MIME type of the artifact the compile service produces.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/pdf";

/// Used when a structured diagnostic carries no message field.
pub const MISSING_DETAIL_MESSAGE: &str = "Compilation failed.";

/// Used when a transport failure has no description at all.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred.";

/// Fields checked, in order, for a human-readable message.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// Convert the raw result of a compile call into its outcome.
pub fn classify(result: CompileResult) -> CompileOutcome {
    match result {
        Ok(response) => classify_response(response),
        Err(err) => CompileOutcome::Failure(classify_transport_error(err)),
    }
}

fn classify_response(response: CompileResponse) -> CompileOutcome {
    if response.is_success_status() && is_artifact_type(response.content_type.as_deref()) {
        debug!(bytes = response.body.len(), "response classified as artifact");
        return CompileOutcome::Success(Artifact {
            bytes: response.body,
            content_type: ARTIFACT_CONTENT_TYPE.to_string(),
        });
    }

    debug!(
        status = response.status,
        content_type = ?response.content_type,
        "response classified as diagnostic"
    );
    CompileOutcome::Failure(diagnostic_from_body(&response.body))
}

fn classify_transport_error(err: TransportError) -> CompileError {
    let recovered = err
        .payload
        .as_deref()
        .map(diagnostic_from_body)
        .and_then(|diag| match diag {
            CompileError::Diagnostic { message } => Some(message),
            _ => None,
        });

    match recovered {
        Some(message) => CompileError::transport(message),
        None if err.message.trim().is_empty() => CompileError::transport(NETWORK_ERROR_MESSAGE),
        None => CompileError::transport(err.message),
    }
}

/// Content types may carry parameters (`application/pdf; qs=0.9`); only the
/// MIME essence is compared.
fn is_artifact_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(ARTIFACT_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Decode a diagnostic body: UTF-8, then JSON, then raw text.
pub fn diagnostic_from_body(body: &[u8]) -> CompileError {
    let Ok(text) = std::str::from_utf8(body) else {
        return CompileError::Unparseable;
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) => match message_from_json(&value) {
            Some(message) => CompileError::diagnostic(message),
            None => CompileError::diagnostic(MISSING_DETAIL_MESSAGE),
        },
        Err(_) if text.trim().is_empty() => CompileError::Unparseable,
        Err(_) => CompileError::diagnostic(text),
    }
}

/// Find a human-readable message in a JSON diagnostic.
///
/// Handles `{"detail": "..."}`, `{"message": "..."}`, a bare JSON string,
/// and validation error lists such as `{"detail": [{"msg": "..."}, ...]}`.
fn message_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => MESSAGE_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(message_from_json)),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .or_else(|| message_from_json(item))
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        }
        _ => None,
    }
}
