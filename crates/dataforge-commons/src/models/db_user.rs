//! Database-engine user and permission descriptions.

use serde::{Deserialize, Serialize};

/// One engine-level user (role), from the engine's user catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbUserInfo {
    pub username: String,
    pub can_create_db: bool,
    pub superuser: bool,
}

/// Privileges one user holds on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissionInfo {
    pub table_name: String,
    pub privileges: Vec<String>,
}
