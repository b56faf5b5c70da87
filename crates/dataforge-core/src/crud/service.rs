//! Dynamic CRUD service.
//!
//! Failure policy mirrors the rest of the system: statement-build and
//! execution errors on writes surface as `InvalidInput` (the client can
//! correct the payload and retry); read errors surface as `RuntimeFailure`.

use super::builder::{build_delete, build_insert, build_select, build_update, parse_id, ReadOptions};
use crate::executor::{ConnectionTarget, ExecutorError, SqlExecutor, SqlValue};
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use dataforge_commons::{DataForgeError, InstanceId, RecordFields, Result};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

pub struct CrudService {
    registry: Arc<InstanceRegistry>,
    vault: Arc<CredentialVault>,
    executor: Arc<dyn SqlExecutor>,
}

impl CrudService {
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

    fn target(&self, instance_id: InstanceId) -> Result<ConnectionTarget> {
        let instance = self.registry.find(instance_id)?;
        ConnectionTarget::for_instance(&instance, &self.vault)
    }

    fn write_err(e: ExecutorError) -> DataForgeError {
        DataForgeError::invalid_input(e.to_string())
    }

    pub async fn create_record(
        &self,
        instance_id: InstanceId,
        table: &str,
        record: &RecordFields,
    ) -> Result<()> {
        let sql = build_insert(table, record)?;
        let params: Vec<SqlValue> = record.values().map(SqlValue::from_json).collect();
        let target = self.target(instance_id)?;
        debug!("instance {}: {}", instance_id, sql);
        self.executor
            .execute(&target, &sql, &params)
            .await
            .map_err(Self::write_err)?;
        Ok(())
    }

    pub async fn read_records(
        &self,
        instance_id: InstanceId,
        table: &str,
        filters: &RecordFields,
        options: &ReadOptions,
    ) -> Result<Vec<RecordFields>> {
        let sql = build_select(table, filters, options)?;
        let params: Vec<SqlValue> = filters.values().map(SqlValue::from_json).collect();
        let target = self.target(instance_id)?;
        debug!("instance {}: {}", instance_id, sql);
        self.executor
            .query(&target, &sql, &params)
            .await
            .map_err(|e| DataForgeError::runtime(e.to_string()))
    }

    /// Returns the affected-row count; 0 means no row matched, which is a
    /// success, not an error.
    pub async fn update_record(
        &self,
        instance_id: InstanceId,
        table: &str,
        record_id: &Value,
        patch: &RecordFields,
    ) -> Result<u64> {
        let sql = build_update(table, patch)?;
        let mut params: Vec<SqlValue> = patch.values().map(SqlValue::from_json).collect();
        params.push(SqlValue::from_json(&parse_id(record_id)));
        let target = self.target(instance_id)?;
        debug!("instance {}: {}", instance_id, sql);
        self.executor
            .execute(&target, &sql, &params)
            .await
            .map_err(Self::write_err)
    }

    pub async fn delete_record(
        &self,
        instance_id: InstanceId,
        table: &str,
        record_id: &Value,
    ) -> Result<u64> {
        let sql = build_delete(table)?;
        let params = [SqlValue::from_json(&parse_id(record_id))];
        let target = self.target(instance_id)?;
        debug!("instance {}: {}", instance_id, sql);
        self.executor
            .execute(&target, &sql, &params)
            .await
            .map_err(Self::write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{registry_with_instance, FakeExecutor};
    use serde_json::json;

    fn service_with_fake() -> (CrudService, Arc<FakeExecutor>, InstanceId) {
        let (registry, vault, instance) = registry_with_instance();
        let executor = Arc::new(FakeExecutor::new());
        let service = CrudService::new(Arc::new(registry), Arc::new(vault), executor.clone());
        (service, executor, instance.id)
    }

    fn fields(pairs: &[(&str, serde_json::Value)]) -> RecordFields {
        let mut map = RecordFields::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        map
    }

    #[tokio::test]
    async fn test_create_record_binds_values_in_order() {
        let (service, executor, id) = service_with_fake();
        service
            .create_record(
                id,
                "orders",
                &fields(&[("customer_id", json!(7)), ("status", json!("open"))]),
            )
            .await
            .unwrap();

        assert_eq!(
            executor.statements(),
            vec!["INSERT INTO orders (customer_id, status) VALUES ($1, $2)"]
        );
        assert_eq!(
            executor.params()[0],
            vec![SqlValue::Int(7), SqlValue::Text("open".into())]
        );
    }

    #[tokio::test]
    async fn test_create_record_rejects_empty_map_before_executing() {
        let (service, executor, id) = service_with_fake();
        let err = service
            .create_record(id, "orders", &RecordFields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
        assert!(executor.statements().is_empty(), "no statement may reach the engine");
    }

    #[tokio::test]
    async fn test_read_records_page_two_offset() {
        let (service, executor, id) = service_with_fake();
        let options = ReadOptions {
            page: 2,
            limit: 10,
            ..Default::default()
        };
        service
            .read_records(id, "orders", &RecordFields::new(), &options)
            .await
            .unwrap();
        assert_eq!(
            executor.statements(),
            vec!["SELECT * FROM orders LIMIT 10 OFFSET 10"]
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_runtime_failure() {
        let (service, executor, id) = service_with_fake();
        executor.push_query_error("relation \"ghost\" does not exist");
        let err = service
            .read_records(id, "ghost", &RecordFields::new(), &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataForgeError::RuntimeFailure(_)));
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_zero() {
        let (service, executor, id) = service_with_fake();
        executor.push_execute_result(0);
        let affected = service
            .update_record(id, "orders", &json!("999"), &fields(&[("status", json!("x"))]))
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_update_parses_textual_id() {
        let (service, executor, id) = service_with_fake();
        service
            .update_record(id, "orders", &json!("42"), &fields(&[("status", json!("x"))]))
            .await
            .unwrap();
        // id appended as the final bound parameter, as an integer
        let params = executor.params();
        assert_eq!(params[0].last().unwrap(), &SqlValue::Int(42));
    }

    #[tokio::test]
    async fn test_delete_keeps_uuid_id_textual() {
        let (service, executor, id) = service_with_fake();
        executor.push_execute_result(1);
        let affected = service
            .delete_record(id, "orders", &json!("a1b2-c3d4"))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            executor.params()[0],
            vec![SqlValue::Text("a1b2-c3d4".into())]
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_invalid_input() {
        let (service, executor, id) = service_with_fake();
        executor.push_execute_error("null value in column \"total\"");
        let err = service
            .create_record(id, "orders", &fields(&[("total", json!(null))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }
}
