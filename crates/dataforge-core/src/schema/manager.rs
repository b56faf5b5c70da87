//! Schema manager: DDL execution, catalog introspection, cache coherence.
//!
//! Every operation opens a short-lived administrative connection to the
//! target instance through the executor primitive. Cache eviction is
//! co-located with every DDL call site — including foreign-key drops — so a
//! mutated table can never serve a pre-mutation snapshot: the next
//! `get_schema` always re-derives from the engine.

use super::cache::SchemaCache;
use super::{
    build_add_column, build_create_table, build_drop_column, build_drop_constraint,
    build_drop_table, build_modify_column, relationship_from_row, table_spec_from_catalog,
    COLUMNS_SQL, LIST_TABLES_SQL, PRIMARY_KEYS_SQL, RELATIONSHIPS_SQL,
};
use crate::executor::{ConnectionTarget, ExecutorError, SqlExecutor, SqlValue};
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use dataforge_commons::{
    ColumnChange, ColumnSpec, DataForgeError, InstanceId, Result, TableKey, TableName,
    TableRelationship, TableSpec,
};
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

pub struct SchemaManager {
    registry: Arc<InstanceRegistry>,
    vault: Arc<CredentialVault>,
    executor: Arc<dyn SqlExecutor>,
    cache: Arc<SchemaCache>,
}

fn write_err(e: ExecutorError) -> DataForgeError {
    DataForgeError::invalid_input(e.to_string())
}

fn read_err(e: ExecutorError) -> DataForgeError {
    DataForgeError::runtime(e.to_string())
}

impl SchemaManager {
    pub fn new(
        registry: Arc<InstanceRegistry>,
        vault: Arc<CredentialVault>,
        executor: Arc<dyn SqlExecutor>,
        cache: Arc<SchemaCache>,
    ) -> Self {
        Self {
            registry,
            vault,
            executor,
            cache,
        }
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    fn target(&self, instance_id: InstanceId) -> Result<ConnectionTarget> {
        let instance = self.registry.find(instance_id)?;
        ConnectionTarget::for_instance(&instance, &self.vault)
    }

    fn key(&self, instance_id: InstanceId, table: &str) -> TableKey {
        TableKey::new(instance_id, TableName::new(table))
    }

    /// Run mutating DDL and evict the cache entry on every exit path, so
    /// eviction cannot be forgotten for any statement kind.
    async fn run_ddl(
        &self,
        instance_id: InstanceId,
        table: &str,
        statements: Vec<String>,
    ) -> Result<()> {
        let key = self.key(instance_id, table);
        let target = self.target(instance_id)?;
        for statement in &statements {
            debug!("instance {}: executing DDL: {}", instance_id, statement);
        }
        let result = self.executor.execute_all(&target, &statements).await;
        self.cache.evict(&key);
        result.map_err(write_err)
    }

    /// Create a table from its structural description.
    ///
    /// The cache entry is evicted *before* execution so a failed create
    /// cannot leave a stale hit behind.
    pub async fn create_table(&self, instance_id: InstanceId, spec: &TableSpec) -> Result<()> {
        let sql = build_create_table(spec)?;
        let key = self.key(instance_id, &spec.table_name);
        self.cache.evict(&key);

        let target = self.target(instance_id)?;
        info!("instance {}: creating table {}", instance_id, spec.table_name);
        debug!("instance {}: executing DDL: {}", instance_id, sql);
        self.executor
            .execute_all(&target, &[sql])
            .await
            .map_err(|e| DataForgeError::invalid_schema(e.to_string()))
    }

    /// Base tables in the default schema. Uncached.
    pub async fn list_tables(&self, instance_id: InstanceId) -> Result<Vec<String>> {
        let target = self.target(instance_id)?;
        let rows = self
            .executor
            .query(&target, LIST_TABLES_SQL, &[])
            .await
            .map_err(read_err)?;
        Ok(rows
            .iter()
            .map(|row| super::get_string(row, "table_name"))
            .collect())
    }

    /// Introspected schema for one table, cache-first.
    ///
    /// On a miss the primary-key columns are read first, then all columns;
    /// zero columns means the table does not exist. A successful miss
    /// populates the cache unless an eviction raced the introspection.
    pub async fn get_schema(&self, instance_id: InstanceId, table: &str) -> Result<TableSpec> {
        let key = self.key(instance_id, table);
        if let Some(cached) = self.cache.get(&key) {
            return Ok((*cached).clone());
        }

        let observed_version = self.cache.version(&key);
        let target = self.target(instance_id)?;
        let table_param = [SqlValue::text(key.table_name().as_str())];

        let pk_rows = self
            .executor
            .query(&target, PRIMARY_KEYS_SQL, &table_param)
            .await
            .map_err(read_err)?;
        let pk_columns: HashSet<String> = pk_rows
            .iter()
            .map(|row| super::get_string(row, "column_name"))
            .collect();

        let column_rows = self
            .executor
            .query(&target, COLUMNS_SQL, &table_param)
            .await
            .map_err(read_err)?;
        if column_rows.is_empty() {
            return Err(DataForgeError::table_not_found(format!(
                "{} in database instance {}",
                table, instance_id
            )));
        }

        let spec = table_spec_from_catalog(key.table_name().as_str(), &pk_columns, &column_rows);
        self.cache
            .put_if_current(key, Arc::new(spec.clone()), observed_version);
        Ok(spec)
    }

    pub async fn delete_table(&self, instance_id: InstanceId, table: &str) -> Result<()> {
        let sql = build_drop_table(table)?;
        info!("instance {}: dropping table {}", instance_id, table);
        self.run_ddl(instance_id, table, vec![sql]).await
    }

    pub async fn add_column(
        &self,
        instance_id: InstanceId,
        table: &str,
        column: &ColumnSpec,
    ) -> Result<()> {
        let sql = build_add_column(table, column)?;
        self.run_ddl(instance_id, table, vec![sql]).await
    }

    /// Apply a column modification: rename, then retype, then nullability —
    /// several statements on one connection.
    pub async fn modify_column(
        &self,
        instance_id: InstanceId,
        table: &str,
        column: &str,
        change: &ColumnChange,
    ) -> Result<()> {
        let statements = build_modify_column(table, column, change)?;
        self.run_ddl(instance_id, table, statements).await
    }

    pub async fn delete_column(
        &self,
        instance_id: InstanceId,
        table: &str,
        column: &str,
    ) -> Result<()> {
        let sql = build_drop_column(table, column)?;
        self.run_ddl(instance_id, table, vec![sql]).await
    }

    /// Drop a named foreign-key constraint. Evicts the cache entry like every
    /// other structural mutation.
    pub async fn drop_foreign_key(
        &self,
        instance_id: InstanceId,
        table: &str,
        constraint: &str,
    ) -> Result<()> {
        let sql = build_drop_constraint(table, constraint)?;
        self.run_ddl(instance_id, table, vec![sql]).await
    }

    /// Imported foreign keys for one table. Uncached.
    pub async fn get_relationships(
        &self,
        instance_id: InstanceId,
        table: &str,
    ) -> Result<Vec<TableRelationship>> {
        let key = self.key(instance_id, table);
        let target = self.target(instance_id)?;
        let rows = self
            .executor
            .query(
                &target,
                RELATIONSHIPS_SQL,
                &[SqlValue::text(key.table_name().as_str())],
            )
            .await
            .map_err(read_err)?;
        Ok(rows.iter().filter_map(relationship_from_row).collect())
    }
}
