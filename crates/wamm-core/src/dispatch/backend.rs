use crate::dispatch::outcome::{FailureKind, SendOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BODY_SNIPPET_LEN: usize = 200;

/// Payload for one outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub message: &'a str,
}

/// Raw status and body returned by the messaging service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a usable response (connect failure, timeout,
/// truncated body).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

pub trait MessageBackend {
    fn send(&self, request: &SendRequest<'_>) -> Result<BackendResponse, TransportError>;
}

impl<T: MessageBackend + ?Sized> MessageBackend for &T {
    fn send(&self, request: &SendRequest<'_>) -> Result<BackendResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: MessageBackend + ?Sized> MessageBackend for Box<T> {
    fn send(&self, request: &SendRequest<'_>) -> Result<BackendResponse, TransportError> {
        (**self).send(request)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPayload {
    success: Option<bool>,
    message_id: Option<String>,
    error: Option<String>,
    detail: Option<serde_json::Value>,
}

impl ReplyPayload {
    fn error_text(&self) -> Option<String> {
        if let Some(error) = non_empty(self.error.as_deref()) {
            return Some(error.to_string());
        }
        match &self.detail {
            Some(serde_json::Value::String(detail)) => {
                non_empty(Some(detail.as_str())).map(str::to_string)
            }
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Turns a service response into an outcome for `phone`.
pub fn classify_response(name: &str, phone: &str, response: &BackendResponse) -> SendOutcome {
    let parsed = serde_json::from_str::<ReplyPayload>(&response.body);

    if response.is_success_status() {
        let payload = match parsed {
            Ok(payload) => payload,
            Err(err) => {
                return SendOutcome::failed(
                    name,
                    phone,
                    FailureKind::Transport,
                    format!("unparseable response from backend: {err}"),
                );
            }
        };
        if payload.success.unwrap_or(true) {
            let message_id = non_empty(payload.message_id.as_deref()).map(str::to_string);
            return SendOutcome::sent(name, phone, message_id);
        }
        let error = payload
            .error_text()
            .unwrap_or_else(|| "backend reported failure".to_string());
        return SendOutcome::failed(name, phone, FailureKind::Backend, error);
    }

    let error = parsed
        .ok()
        .and_then(|payload| payload.error_text())
        .unwrap_or_else(|| status_fallback(response));
    SendOutcome::failed(name, phone, FailureKind::Backend, error)
}

fn status_fallback(response: &BackendResponse) -> String {
    let body = response.body.trim();
    if body.is_empty() {
        return format!("HTTP {}", response.status);
    }
    let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
    format!("HTTP {}: {}", response.status, snippet)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
