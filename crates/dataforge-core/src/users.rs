//! Engine-user management: roles and table grants inside one instance.
//!
//! CREATE USER / GRANT / REVOKE cannot take bound parameters, so usernames
//! and table names pass the identifier check, privileges are matched against
//! the engine's privilege keywords, and the password literal is
//! quote-escaped. Catalog reads bind parameters normally.

use crate::executor::{ConnectionTarget, ExecutorError, SqlExecutor, SqlValue};
use crate::ident::safe_ident;
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use dataforge_commons::{
    DataForgeError, DbUserInfo, InstanceId, Result, UserPermissionInfo,
};
use indexmap::IndexMap;
use log::info;
use std::sync::Arc;

const ALLOWED_PRIVILEGES: &[&str] = &[
    "SELECT",
    "INSERT",
    "UPDATE",
    "DELETE",
    "TRUNCATE",
    "REFERENCES",
    "TRIGGER",
    "ALL",
];

const LIST_USERS_SQL: &str =
    "SELECT usename, usecreatedb, usesuper FROM pg_catalog.pg_user ORDER BY usename";

const LIST_GRANTS_SQL: &str = "SELECT table_name, privilege_type \
     FROM information_schema.role_table_grants \
     WHERE grantee = $1 AND table_schema = 'public' \
     ORDER BY table_name, privilege_type";

pub struct DbUserService {
    registry: Arc<InstanceRegistry>,
    vault: Arc<CredentialVault>,
    executor: Arc<dyn SqlExecutor>,
}

impl DbUserService {
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

    fn validated_privileges(privileges: &[String]) -> Result<String> {
        if privileges.is_empty() {
            return Err(DataForgeError::invalid_input(
                "at least one privilege must be specified",
            ));
        }
        let mut normalized = Vec::with_capacity(privileges.len());
        for privilege in privileges {
            let upper = privilege.trim().to_ascii_uppercase();
            if !ALLOWED_PRIVILEGES.contains(&upper.as_str()) {
                return Err(DataForgeError::invalid_input(format!(
                    "unknown privilege: '{}'",
                    privilege
                )));
            }
            normalized.push(upper);
        }
        Ok(normalized.join(", "))
    }

    pub async fn create_user(
        &self,
        instance_id: InstanceId,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let sql = format!(
            "CREATE USER {} WITH PASSWORD '{}'",
            safe_ident(username)?,
            password.replace('\'', "''")
        );
        let target = self.target(instance_id)?;
        info!("instance {}: creating engine user {}", instance_id, username);
        self.executor
            .execute_all(&target, &[sql])
            .await
            .map_err(Self::write_err)
    }

    pub async fn delete_user(&self, instance_id: InstanceId, username: &str) -> Result<()> {
        let sql = format!("DROP USER IF EXISTS {}", safe_ident(username)?);
        let target = self.target(instance_id)?;
        info!("instance {}: dropping engine user {}", instance_id, username);
        self.executor
            .execute_all(&target, &[sql])
            .await
            .map_err(Self::write_err)
    }

    pub async fn grant(
        &self,
        instance_id: InstanceId,
        username: &str,
        table: &str,
        privileges: &[String],
    ) -> Result<()> {
        let sql = format!(
            "GRANT {} ON TABLE {} TO {}",
            Self::validated_privileges(privileges)?,
            safe_ident(table)?,
            safe_ident(username)?
        );
        let target = self.target(instance_id)?;
        self.executor
            .execute_all(&target, &[sql])
            .await
            .map_err(Self::write_err)
    }

    pub async fn revoke(
        &self,
        instance_id: InstanceId,
        username: &str,
        table: &str,
        privileges: &[String],
    ) -> Result<()> {
        let sql = format!(
            "REVOKE {} ON TABLE {} FROM {}",
            Self::validated_privileges(privileges)?,
            safe_ident(table)?,
            safe_ident(username)?
        );
        let target = self.target(instance_id)?;
        self.executor
            .execute_all(&target, &[sql])
            .await
            .map_err(Self::write_err)
    }

    pub async fn list_users(&self, instance_id: InstanceId) -> Result<Vec<DbUserInfo>> {
        let target = self.target(instance_id)?;
        let rows = self
            .executor
            .query(&target, LIST_USERS_SQL, &[])
            .await
            .map_err(|e| DataForgeError::runtime(e.to_string()))?;
        Ok(rows
            .iter()
            .map(|row| DbUserInfo {
                username: row
                    .get("usename")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                can_create_db: row
                    .get("usecreatedb")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                superuser: row
                    .get("usesuper")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            })
            .collect())
    }

    /// Table privileges granted directly to one user, grouped by table.
    pub async fn list_permissions(
        &self,
        instance_id: InstanceId,
        username: &str,
    ) -> Result<Vec<UserPermissionInfo>> {
        let target = self.target(instance_id)?;
        let rows = self
            .executor
            .query(&target, LIST_GRANTS_SQL, &[SqlValue::text(username)])
            .await
            .map_err(|e| DataForgeError::runtime(e.to_string()))?;

        let mut by_table: IndexMap<String, Vec<String>> = IndexMap::new();
        for row in &rows {
            let table = row
                .get("table_name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let privilege = row
                .get("privilege_type")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            by_table.entry(table).or_default().push(privilege);
        }

        Ok(by_table
            .into_iter()
            .map(|(table_name, privileges)| UserPermissionInfo {
                table_name,
                privileges,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{registry_with_instance, FakeExecutor};
    use dataforge_commons::RecordFields;
    use serde_json::json;

    fn service_with_fake() -> (DbUserService, Arc<FakeExecutor>, InstanceId) {
        let (registry, vault, instance) = registry_with_instance();
        let executor = Arc::new(FakeExecutor::new());
        let service = DbUserService::new(Arc::new(registry), Arc::new(vault), executor.clone());
        (service, executor, instance.id)
    }

    #[tokio::test]
    async fn test_create_user_escapes_password_quotes() {
        let (service, executor, id) = service_with_fake();
        service.create_user(id, "reporter", "o'brien").await.unwrap();
        assert_eq!(
            executor.statements(),
            vec!["CREATE USER reporter WITH PASSWORD 'o''brien'"]
        );
    }

    #[tokio::test]
    async fn test_create_user_rejects_hostile_username() {
        let (service, _executor, id) = service_with_fake();
        let err = service
            .create_user(id, "bob; DROP TABLE t", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_grant_builds_validated_statement() {
        let (service, executor, id) = service_with_fake();
        service
            .grant(
                id,
                "reporter",
                "orders",
                &["select".to_string(), "Insert".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(
            executor.statements(),
            vec!["GRANT SELECT, INSERT ON TABLE orders TO reporter"]
        );
    }

    #[tokio::test]
    async fn test_grant_rejects_unknown_privilege() {
        let (service, _executor, id) = service_with_fake();
        let err = service
            .grant(id, "reporter", "orders", &["PWN".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_revoke_statement_shape() {
        let (service, executor, id) = service_with_fake();
        service
            .revoke(id, "reporter", "orders", &["ALL".to_string()])
            .await
            .unwrap();
        assert_eq!(
            executor.statements(),
            vec!["REVOKE ALL ON TABLE orders FROM reporter"]
        );
    }

    #[tokio::test]
    async fn test_list_permissions_groups_by_table() {
        let (service, executor, id) = service_with_fake();
        let mut rows = Vec::new();
        for (table, privilege) in [
            ("orders", "SELECT"),
            ("orders", "INSERT"),
            ("customers", "SELECT"),
        ] {
            let mut row = RecordFields::new();
            row.insert("table_name".into(), json!(table));
            row.insert("privilege_type".into(), json!(privilege));
            rows.push(row);
        }
        executor.push_query_rows(rows);

        let permissions = service.list_permissions(id, "reporter").await.unwrap();
        assert_eq!(permissions.len(), 2);
        assert_eq!(permissions[0].table_name, "orders");
        assert_eq!(permissions[0].privileges, vec!["SELECT", "INSERT"]);
        assert_eq!(permissions[1].table_name, "customers");
    }
}
