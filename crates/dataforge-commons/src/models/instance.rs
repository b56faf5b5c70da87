//! Provisioned sandbox-instance record.

use super::InstanceId;
use serde::{Deserialize, Serialize};

/// Connection coordinates for one provisioned database sandbox.
///
/// `db_password` holds the **encrypted** administrative password (base64
/// text); plaintext never leaves the provisioning call. Immutable once
/// created except for deletion — the host/port pair is stable for the life
/// of the backing container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxInstance {
    pub id: InstanceId,
    pub container_id: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub host: String,
    pub port: u16,
}

impl SandboxInstance {
    /// Engine connection string (password injected separately after
    /// decryption, never formatted into the URL).
    pub fn connection_url(&self) -> String {
        format!("postgres://{}:{}/{}", self.host, self.port, self.db_name)
    }
}
