//! Response payloads. Credential material never appears here.

use dataforge_commons::{InstanceId, SandboxInstance};
use serde::Serialize;

/// Instance listing entry — connection coordinates without the credential.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceSummary {
    pub id: InstanceId,
    pub db_name: String,
    pub user: String,
    pub host: String,
    pub port: u16,
}

impl From<&SandboxInstance> for InstanceSummary {
    fn from(instance: &SandboxInstance) -> Self {
        Self {
            id: instance.id,
            db_name: instance.db_name.clone(),
            user: instance.db_user.clone(),
            host: instance.host.clone(),
            port: instance.port,
        }
    }
}

/// Provisioning response: the summary plus the container handle.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceCreated {
    pub id: InstanceId,
    pub container_id: String,
    pub db_name: String,
    pub user: String,
    pub host: String,
    pub port: u16,
}

impl From<&SandboxInstance> for InstanceCreated {
    fn from(instance: &SandboxInstance) -> Self {
        Self {
            id: instance.id,
            container_id: instance.container_id.clone(),
            db_name: instance.db_name.clone(),
            user: instance.db_user.clone(),
            host: instance.host.clone(),
            port: instance.port,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AffectedResponse {
    pub rows_affected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_omits_credential() {
        let instance = SandboxInstance {
            id: InstanceId::new(1),
            container_id: "abc".into(),
            db_name: "shop".into(),
            db_user: "admin".into(),
            db_password: "ZW5jcnlwdGVk".into(),
            host: "localhost".into(),
            port: 5432,
        };
        let encoded = serde_json::to_string(&InstanceSummary::from(&instance)).unwrap();
        assert!(!encoded.contains("ZW5jcnlwdGVk"));
        assert!(!encoded.contains("password"));
    }
}
