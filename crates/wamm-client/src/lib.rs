pub mod client;
pub mod error;
pub mod status;

pub use client::{ClientSettings, ManagerClient};
pub use error::{ClientError, Result};
pub use status::{
    ConnectionTest, Diagnosis, DiagnosisSummary, HealthStatus, InstanceList, InstanceStatus,
    InstanceSummary, WhatsAppConnection,
};
