use serde::{Deserialize, Serialize};

pub const HEALTHY: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case(HEALTHY)
    }
}

/// Result of the service probing the Evolution API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionTest {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceStatus {
    pub success: bool,
    pub instance_name: Option<String>,
    pub connection_status: Option<String>,
    pub is_connected: Option<bool>,
    pub profile_name: Option<String>,
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_instances: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConnection {
    pub success: bool,
    pub is_whatsapp_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WhatsAppConnection {
    pub fn is_connected(&self) -> bool {
        self.success && self.is_whatsapp_connected.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSummary {
    pub instance_name: Option<String>,
    pub connection_status: Option<String>,
    pub is_connected: bool,
    pub profile_name: Option<String>,
    pub phone_number: Option<String>,
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceList {
    pub success: bool,
    pub total_instances: usize,
    pub current_instance: Option<String>,
    pub instances: Vec<InstanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisSummary {
    pub api_reachable: bool,
    pub instance_found: bool,
    pub whatsapp_connected: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnosis {
    pub timestamp: Option<String>,
    pub evolution_api_connection: Option<ConnectionTest>,
    pub instance_status: Option<InstanceStatus>,
    pub whatsapp_connection: Option<WhatsAppConnection>,
    pub summary: Option<DiagnosisSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Diagnosis {
    pub fn is_ready(&self) -> bool {
        self.summary
            .as_ref()
            .map(|summary| {
                summary.api_reachable && summary.instance_found && summary.whatsapp_connected
            })
            .unwrap_or(false)
    }

    pub fn issues(&self) -> Vec<String> {
        match (&self.summary, &self.error) {
            (Some(summary), _) => summary.issues.clone(),
            (None, Some(error)) => vec![error.clone()],
            (None, None) => Vec::new(),
        }
    }
}
