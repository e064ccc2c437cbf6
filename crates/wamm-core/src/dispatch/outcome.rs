use crate::domain::Contact;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected locally before any network call.
    Validation,
    Transport,
    Backend,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Transport => "transport",
            FailureKind::Backend => "backend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub name: String,
    pub sent_to: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
}

impl SendOutcome {
    pub fn sent(
        name: impl Into<String>,
        sent_to: impl Into<String>,
        message_id: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sent_to: sent_to.into(),
            success: true,
            message_id: message_id.filter(|id| !id.is_empty()),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        sent_to: impl Into<String>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = format!("{} failure", kind.as_str());
        }
        Self {
            name: name.into(),
            sent_to: sent_to.into(),
            success: false,
            message_id: None,
            error: Some(error),
            error_kind: Some(kind),
        }
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSendRequest {
    pub contacts: Vec<Contact>,
    pub message: String,
    #[serde(default = "default_delay_ms", alias = "delay")]
    pub delay_ms: u64,
}

impl BulkSendRequest {
    pub fn new(contacts: Vec<Contact>, message: impl Into<String>) -> Self {
        Self {
            contacts,
            message: message.into(),
            delay_ms: DEFAULT_DELAY_MS,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSendReport {
    pub total_contacts: usize,
    pub successful_sends: usize,
    pub failed_sends: usize,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub skipped_contacts: usize,
    pub results: Vec<SendOutcome>,
}

impl BulkSendReport {
    /// Counts are always derived from `results`.
    pub fn from_results(results: Vec<SendOutcome>, skipped_contacts: usize) -> Self {
        let successful_sends = results.iter().filter(|outcome| outcome.success).count();
        Self {
            total_contacts: results.len(),
            successful_sends,
            failed_sends: results.len() - successful_sends,
            cancelled: skipped_contacts > 0,
            skipped_contacts,
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_sends == 0 && !self.cancelled
    }
}
