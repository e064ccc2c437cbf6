use crate::error::{ClientError, Result};
use crate::status::{
    ConnectionTest, Diagnosis, HealthStatus, InstanceList, InstanceStatus, WhatsAppConnection,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;
use wamm_core::{BackendResponse, MessageBackend, SendRequest, TransportError};

const SEND_MESSAGE_PATH: &str = "api/send-message";
const HEALTH_PATH: &str = "api/health";
const TEST_CONNECTION_PATH: &str = "api/test-connection";
const INSTANCE_STATUS_PATH: &str = "api/instance-status";
const WHATSAPP_CONNECTION_PATH: &str = "api/whatsapp-connection";
const LIST_INSTANCES_PATH: &str = "api/list-instances";
const FULL_DIAGNOSIS_PATH: &str = "api/full-diagnosis";
const API_KEY_HEADER: &str = "apikey";
const ERROR_SNIPPET_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ClientSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: "wamm".to_string(),
        }
    }
}

/// Talks to the WhatsApp Message Manager HTTP service.
#[derive(Debug, Clone)]
pub struct ManagerClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ManagerClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let ClientSettings {
            base_url,
            api_key,
            timeout,
            connect_timeout,
            user_agent,
        } = settings;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` below the base URL, keeping any path prefix the
    /// service is mounted under.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    pub fn health(&self) -> Result<HealthStatus> {
        self.get_json(HEALTH_PATH)
    }

    pub fn test_connection(&self) -> Result<ConnectionTest> {
        self.get_json(TEST_CONNECTION_PATH)
    }

    pub fn instance_status(&self) -> Result<InstanceStatus> {
        self.get_json(INSTANCE_STATUS_PATH)
    }

    pub fn whatsapp_connection(&self) -> Result<WhatsAppConnection> {
        self.get_json(WHATSAPP_CONNECTION_PATH)
    }

    pub fn list_instances(&self) -> Result<InstanceList> {
        self.get_json(LIST_INSTANCES_PATH)
    }

    pub fn full_diagnosis(&self) -> Result<Diagnosis> {
        self.get_json(FULL_DIAGNOSIS_PATH)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");
        let response = self.request(Method::GET, url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(|err| ClientError::Parse(err.to_string()))
    }
}

impl MessageBackend for ManagerClient {
    fn send(&self, request: &SendRequest<'_>) -> std::result::Result<BackendResponse, TransportError> {
        let url = self
            .endpoint(SEND_MESSAGE_PATH)
            .map_err(|err| TransportError::new(err.to_string()))?;
        debug!(url = %url, phone = request.phone, "POST");
        let response = self
            .request(Method::POST, url)
            .json(request)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        Ok(BackendResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::new(format!("request timed out: {err}"))
    } else if err.is_connect() {
        TransportError::new(format!("connection error: {err}"))
    } else {
        TransportError::new(err.to_string())
    }
}

/// Pulls `detail` or `error` out of an error body, falling back to the raw
/// text.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
                    return text.trim().to_string();
                }
                Some(serde_json::Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response".to_string();
    }
    trimmed.chars().take(ERROR_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::{error_message, ClientSettings, ManagerClient};
    use url::Url;

    fn client(base: &str) -> ManagerClient {
        ManagerClient::new(ClientSettings::new(Url::parse(base).expect("url"))).expect("client")
    }

    #[test]
    fn endpoint_appends_to_root() {
        let client = client("http://localhost:8000");
        let url = client.endpoint("api/send-message").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:8000/api/send-message");
    }

    #[test]
    fn endpoint_keeps_mount_prefix() {
        let client = client("https://example.com/whatsapp?x=1");
        let url = client.endpoint("api/health").expect("endpoint");
        assert_eq!(url.as_str(), "https://example.com/whatsapp/api/health");

        let client = self::client("https://example.com/whatsapp/");
        let url = client.endpoint("api/health").expect("endpoint");
        assert_eq!(url.as_str(), "https://example.com/whatsapp/api/health");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let settings = ClientSettings::new(Url::parse("ftp://example.com").expect("url"));
        assert!(ManagerClient::new(settings).is_err());
    }

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(error_message(r#"{"detail":"Erro interno: x"}"#), "Erro interno: x");
        assert_eq!(error_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
