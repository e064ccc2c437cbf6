use crate::dispatch::backend::{classify_response, MessageBackend, SendRequest};
use crate::dispatch::outcome::{BulkSendReport, BulkSendRequest, FailureKind, SendOutcome};
use crate::dispatch::pacer::{Pace, Pacer, SleepPacer};
use crate::domain::{normalize_phone, Contact, CountryCode};
use crate::error::CoreError;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Sends messages one contact at a time through a [`MessageBackend`],
/// pausing between consecutive contacts.
#[derive(Debug)]
pub struct Dispatcher<B, P = SleepPacer> {
    backend: B,
    pacer: P,
    country_code: CountryCode,
}

impl<B: MessageBackend> Dispatcher<B, SleepPacer> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pacer: SleepPacer,
            country_code: CountryCode::default(),
        }
    }
}

impl<B: MessageBackend, P: Pacer> Dispatcher<B, P> {
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> Dispatcher<B, Q> {
        Dispatcher {
            backend: self.backend,
            pacer,
            country_code: self.country_code,
        }
    }

    pub fn with_country_code(mut self, country_code: CountryCode) -> Self {
        self.country_code = country_code;
        self
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn send_one(&self, contact: &Contact, message: &str) -> SendOutcome {
        let name = contact.name.trim();
        let sent_to = normalize_phone(&contact.phone, &self.country_code);

        if message.trim().is_empty() {
            return SendOutcome::failed(
                name,
                sent_to,
                FailureKind::Validation,
                "missing required field: message",
            );
        }
        let phone = match contact.validate(&self.country_code) {
            Ok(phone) => phone,
            Err(err) => {
                return SendOutcome::failed(name, sent_to, FailureKind::Validation, err.to_string())
            }
        };

        let request = SendRequest {
            name,
            phone: &phone,
            message,
        };
        debug!(phone = %phone, "sending message");
        match self.backend.send(&request) {
            Ok(response) => {
                debug!(phone = %phone, status = response.status, "backend responded");
                classify_response(name, &phone, &response)
            }
            Err(err) => SendOutcome::failed(name, phone, FailureKind::Transport, err.to_string()),
        }
    }

    /// Sends `request.message` to every contact in order. Only a request
    /// without a message or without contacts fails as a whole; every other
    /// problem is recorded in that contact's outcome.
    pub fn send_bulk(&mut self, request: &BulkSendRequest) -> Result<BulkSendReport, CoreError> {
        if request.message.trim().is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        if request.contacts.is_empty() {
            return Err(CoreError::NoContacts);
        }

        let total = request.contacts.len();
        let delay = request.delay();
        info!(contacts = total, delay_ms = request.delay_ms, "starting bulk send");

        let mut results = Vec::with_capacity(total);
        let mut attempted = HashSet::new();
        for (index, contact) in request.contacts.iter().enumerate() {
            if self.pacer.is_cancelled() {
                break;
            }

            let outcome = self.dispatch_contact(contact, &request.message, &mut attempted);
            if outcome.success {
                debug!(index, phone = %outcome.sent_to, "message sent");
            } else {
                warn!(
                    index,
                    phone = %outcome.sent_to,
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "message not sent"
                );
            }
            results.push(outcome);

            if index + 1 < total && self.pacer.pause(delay) == Pace::Cancelled {
                break;
            }
        }

        let skipped = total - results.len();
        let report = BulkSendReport::from_results(results, skipped);
        if report.cancelled {
            warn!(skipped, "bulk send cancelled");
        }
        info!(
            successful = report.successful_sends,
            failed = report.failed_sends,
            "bulk send finished"
        );
        Ok(report)
    }

    fn dispatch_contact(
        &self,
        contact: &Contact,
        message: &str,
        attempted: &mut HashSet<String>,
    ) -> SendOutcome {
        let name = contact.name.trim();
        let phone = match contact.validate(&self.country_code) {
            Ok(phone) => phone,
            Err(err) => {
                let sent_to = normalize_phone(&contact.phone, &self.country_code);
                return SendOutcome::failed(name, sent_to, FailureKind::Validation, err.to_string());
            }
        };
        if !attempted.insert(phone.clone()) {
            let error = CoreError::DuplicatePhone(phone.clone()).to_string();
            return SendOutcome::failed(name, phone, FailureKind::Validation, error);
        }
        self.send_one(&Contact::new(name, phone), message)
    }
}

#[cfg(test)]
mod tests {
    use super::Dispatcher;
    use crate::dispatch::backend::{BackendResponse, MessageBackend, SendRequest, TransportError};
    use crate::dispatch::outcome::FailureKind;
    use crate::domain::{Contact, CountryCode};
    use std::cell::Cell;

    struct CountingBackend {
        calls: Cell<usize>,
    }

    impl MessageBackend for CountingBackend {
        fn send(&self, _request: &SendRequest<'_>) -> Result<BackendResponse, TransportError> {
            self.calls.set(self.calls.get() + 1);
            Ok(BackendResponse::new(200, r#"{"success":true}"#))
        }
    }

    fn dispatcher() -> Dispatcher<CountingBackend> {
        Dispatcher::new(CountingBackend {
            calls: Cell::new(0),
        })
    }

    #[test]
    fn send_one_rejects_blank_message_before_network() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.send_one(&Contact::new("Ada", "11999999999"), "   ");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(FailureKind::Validation));
        assert_eq!(dispatcher.backend().calls.get(), 0);
    }

    #[test]
    fn send_one_rejects_invalid_phone_before_network() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.send_one(&Contact::new("Ada", "123"), "hi");
        assert_eq!(outcome.sent_to, "+55123");
        assert!(outcome
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("invalid phone number"));
        assert_eq!(dispatcher.backend().calls.get(), 0);
    }

    #[test]
    fn send_one_normalizes_with_configured_country_code() {
        let dispatcher =
            dispatcher().with_country_code(CountryCode::new("+1").expect("country code"));
        let outcome = dispatcher.send_one(&Contact::new("Ada", "(415) 555-1212"), "hi");
        assert!(outcome.success);
        assert_eq!(outcome.sent_to, "+14155551212");
        assert_eq!(dispatcher.backend().calls.get(), 1);
    }
}
