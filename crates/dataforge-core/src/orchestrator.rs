//! Sandbox orchestrator: container lifecycle via the Docker control socket.
//!
//! Owns the lifetime of every sandbox process. Provisioning pulls the engine
//! image if absent, starts a container with an ephemeral published port, and
//! records the discovered host port; teardown is idempotent. The backend
//! reachability flag is a snapshot taken once at startup — it is never
//! refreshed, and calls proceed optimistically against the last-known state.

use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use bollard::container::{Config, RemoveContainerOptions, StopContainerOptions};
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, PortBinding};
use bollard::Docker;
use dataforge_commons::{DataForgeError, InstanceId, Result, SandboxInstance};
use futures_util::StreamExt;
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashMap;

/// The engine image every sandbox runs.
const ENGINE_IMAGE: &str = "postgres:17";
/// The engine's in-container port, published to an ephemeral host port.
const ENGINE_PORT: &str = "5432/tcp";

/// Reachability of the container backend, decided once at process start.
///
/// This is a snapshot, not a live probe: a backend that dies later still
/// reads `Connected` here, and the failure surfaces at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Unavailable { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

pub struct SandboxOrchestrator {
    docker: Option<Docker>,
    status: ConnectionStatus,
}

impl SandboxOrchestrator {
    /// Connect to the local container backend and ping it once. The outcome
    /// is cached for the process lifetime.
    pub async fn connect() -> Self {
        match Docker::connect_with_local_defaults() {
            Ok(docker) => match docker.ping().await {
                Ok(_) => {
                    info!("Connected to container backend");
                    Self {
                        docker: Some(docker),
                        status: ConnectionStatus::Connected,
                    }
                }
                Err(e) => {
                    error!("Container backend did not answer ping: {}", e);
                    Self {
                        docker: None,
                        status: ConnectionStatus::Unavailable {
                            reason: e.to_string(),
                        },
                    }
                }
            },
            Err(e) => {
                error!("Failed to reach container backend: {}", e);
                Self {
                    docker: None,
                    status: ConnectionStatus::Unavailable {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// The startup reachability snapshot.
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// An orchestrator with no backend, for tests that never touch it.
    #[cfg(test)]
    pub(crate) fn detached_for_tests() -> Self {
        Self {
            docker: None,
            status: ConnectionStatus::Unavailable {
                reason: "detached".into(),
            },
        }
    }

    fn docker(&self) -> Result<&Docker> {
        self.docker.as_ref().ok_or_else(|| {
            DataForgeError::unavailable("no connection to the container backend")
        })
    }

    /// Provision a new sandbox: ensure the engine image locally, start a
    /// container bound to an ephemeral host port, discover that port, and
    /// persist the instance with its password encrypted. The plaintext
    /// password never outlives this call.
    pub async fn provision(
        &self,
        registry: &InstanceRegistry,
        vault: &CredentialVault,
        db_name: &str,
        admin_user: &str,
        admin_password: &str,
    ) -> Result<SandboxInstance> {
        let docker = self.docker()?;

        info!("Ensuring {} image exists locally", ENGINE_IMAGE);
        let mut pull = docker.create_image(
            Some(CreateImageOptions {
                from_image: ENGINE_IMAGE,
                ..Default::default()
            }),
            None,
            None,
        );
        while let Some(progress) = pull.next().await {
            progress.map_err(|e| DataForgeError::provisioning(format!("image pull: {}", e)))?;
        }

        let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();
        exposed_ports.insert(ENGINE_PORT.to_string(), HashMap::new());
        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            ENGINE_PORT.to_string(),
            // An empty host port requests an ephemeral binding.
            Some(vec![PortBinding {
                host_ip: None,
                host_port: Some(String::new()),
            }]),
        );

        let config = Config {
            image: Some(ENGINE_IMAGE.to_string()),
            env: Some(vec![
                format!("POSTGRES_DB={}", db_name),
                format!("POSTGRES_USER={}", admin_user),
                format!("POSTGRES_PASSWORD={}", admin_password),
            ]),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                ..Default::default()
            }),
            ..Default::default()
        };

        let created = docker
            .create_container::<String, String>(None, config)
            .await
            .map_err(|e| DataForgeError::provisioning(format!("container create: {}", e)))?;
        let container_id = created.id;

        docker
            .start_container::<String>(&container_id, None)
            .await
            .map_err(|e| DataForgeError::provisioning(format!("container start: {}", e)))?;

        let port = self.discover_host_port(&container_id).await?;
        info!(
            "Sandbox {} started for database '{}' on host port {}",
            &container_id[..12.min(container_id.len())],
            db_name,
            port
        );

        let instance = SandboxInstance {
            id: InstanceId::new(0),
            container_id,
            db_name: db_name.to_string(),
            db_user: admin_user.to_string(),
            db_password: vault.encrypt(admin_password)?,
            // The API runs on the host, so localhost reaches the published port.
            host: "localhost".to_string(),
            port,
        };
        registry.save(instance)
    }

    async fn discover_host_port(&self, container_id: &str) -> Result<u16> {
        let docker = self.docker()?;
        let inspection = docker
            .inspect_container(container_id, None)
            .await
            .map_err(|e| DataForgeError::provisioning(format!("container inspect: {}", e)))?;

        inspection
            .network_settings
            .and_then(|settings| settings.ports)
            .and_then(|ports| ports.get(ENGINE_PORT).cloned().flatten())
            .and_then(|bindings| bindings.into_iter().find_map(|b| b.host_port))
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(|| {
                DataForgeError::provisioning(format!(
                    "no host port binding found for container {}",
                    container_id
                ))
            })
    }

    /// Stop and remove a sandbox. A backend 404 on either step means the
    /// work is already done and is logged, not raised.
    pub async fn decommission(&self, container_id: &str) -> Result<()> {
        let docker = self.docker()?;

        match docker
            .stop_container(container_id, None::<StopContainerOptions>)
            .await
        {
            Ok(_) => {}
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                warn!(
                    "Container {} not found, maybe already stopped or removed",
                    container_id
                );
            }
            Err(e) => return Err(DataForgeError::runtime(format!("container stop: {}", e))),
        }

        match docker
            .remove_container(container_id, None::<RemoveContainerOptions>)
            .await
        {
            Ok(_) => {
                info!("Container {} removed", container_id);
                Ok(())
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                warn!("Container {} not found, maybe already removed", container_id);
                Ok(())
            }
            Err(e) => Err(DataForgeError::runtime(format!("container remove: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let connected = serde_json::to_value(ConnectionStatus::Connected).unwrap();
        assert_eq!(connected["state"], "connected");

        let down = serde_json::to_value(ConnectionStatus::Unavailable {
            reason: "socket missing".into(),
        })
        .unwrap();
        assert_eq!(down["state"], "unavailable");
        assert_eq!(down["reason"], "socket missing");
    }

    #[tokio::test]
    async fn test_operations_fail_cleanly_without_backend() {
        let orchestrator = SandboxOrchestrator {
            docker: None,
            status: ConnectionStatus::Unavailable {
                reason: "test".into(),
            },
        };
        assert!(!orchestrator.status().is_connected());

        let err = orchestrator.decommission("deadbeef").await.unwrap_err();
        assert!(matches!(err, DataForgeError::OrchestratorUnavailable(_)));
    }
}
