//! Instance lifecycle service: provisioning front door, listing, teardown,
//! and a connectivity probe.
//!
//! The orchestrator owns the sandbox process; this service coordinates it
//! with the registry so a deleted instance always loses both its container
//! and its record.

use crate::executor::{ConnectionTarget, SqlExecutor};
use crate::orchestrator::SandboxOrchestrator;
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use dataforge_commons::{InstanceId, Result, SandboxInstance};
use log::warn;
use std::sync::Arc;

pub struct InstanceService {
    registry: Arc<InstanceRegistry>,
    vault: Arc<CredentialVault>,
    orchestrator: Arc<SandboxOrchestrator>,
    executor: Arc<dyn SqlExecutor>,
}

impl InstanceService {
    pub fn new(
        registry: Arc<InstanceRegistry>,
        vault: Arc<CredentialVault>,
        orchestrator: Arc<SandboxOrchestrator>,
        executor: Arc<dyn SqlExecutor>,
    ) -> Self {
        Self {
            registry,
            vault,
            orchestrator,
            executor,
        }
    }

    pub async fn provision(
        &self,
        db_name: &str,
        admin_user: &str,
        admin_password: &str,
    ) -> Result<SandboxInstance> {
        self.orchestrator
            .provision(&self.registry, &self.vault, db_name, admin_user, admin_password)
            .await
    }

    pub fn list(&self) -> Vec<SandboxInstance> {
        self.registry.list()
    }

    pub fn find(&self, instance_id: InstanceId) -> Result<SandboxInstance> {
        self.registry.find(instance_id)
    }

    /// Tear down the sandbox and delete its registry record.
    pub async fn delete(&self, instance_id: InstanceId) -> Result<()> {
        let instance = self.registry.find(instance_id)?;
        self.orchestrator.decommission(&instance.container_id).await?;
        self.registry.delete(instance_id)
    }

    /// One connection, one `SELECT 1`. False on any failure.
    pub async fn test_connection(&self, instance_id: InstanceId) -> Result<bool> {
        let instance = self.registry.find(instance_id)?;
        let target = ConnectionTarget::for_instance(&instance, &self.vault)?;
        match self.executor.query(&target, "SELECT 1", &[]).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("connection test failed for instance {}: {}", instance_id, e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{registry_with_instance, FakeExecutor};
    use dataforge_commons::DataForgeError;

    #[tokio::test]
    async fn test_connection_probe_false_on_failure() {
        let (registry, vault, instance) = registry_with_instance();
        let executor = Arc::new(FakeExecutor::new());
        executor.push_query_error("connection refused");

        let service = InstanceService::new(
            Arc::new(registry),
            Arc::new(vault),
            Arc::new(SandboxOrchestrator::detached_for_tests()),
            executor,
        );
        assert!(!service.test_connection(instance.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_instance_is_not_found() {
        let (registry, vault, _instance) = registry_with_instance();
        let service = InstanceService::new(
            Arc::new(registry),
            Arc::new(vault),
            Arc::new(SandboxOrchestrator::detached_for_tests()),
            Arc::new(FakeExecutor::new()),
        );
        let err = service.test_connection(InstanceId::new(404)).await.unwrap_err();
        assert!(matches!(err, DataForgeError::InstanceNotFound(_)));
    }
}
