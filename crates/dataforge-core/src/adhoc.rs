//! Ad-hoc statement executor.
//!
//! The one operation that never raises on execution problems: the caller is
//! an interactive console and wants SQL failures rendered back as data, not
//! as transport errors. Only an unknown instance id (or an unreadable stored
//! credential) still propagates as an error.

use crate::executor::{ConnectionTarget, SqlExecutor};
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use dataforge_commons::{InstanceId, QueryOutcome, Result};
use log::debug;
use std::sync::Arc;

pub struct AdhocQueryService {
    registry: Arc<InstanceRegistry>,
    vault: Arc<CredentialVault>,
    executor: Arc<dyn SqlExecutor>,
}

impl AdhocQueryService {
    pub fn new(
        registry: Arc<InstanceRegistry>,
        vault: Arc<CredentialVault>,
        executor: Arc<dyn SqlExecutor>,
    ) -> Self {
        Self {
            registry,
            vault,
            executor,
        }
    }

    /// Execute literal SQL text against an instance and normalize the result:
    /// a result set becomes `Rows`, a command becomes `Affected`, and any
    /// connection or execution failure becomes `Error`.
    pub async fn execute(&self, instance_id: InstanceId, sql: &str) -> Result<QueryOutcome> {
        let instance = self.registry.find(instance_id)?;
        let target = ConnectionTarget::for_instance(&instance, &self.vault)?;

        debug!("instance {}: ad-hoc statement: {}", instance_id, sql);
        match self.executor.run_script(&target, sql).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => Ok(QueryOutcome::error(e.to_string())),
        }
    }
}
