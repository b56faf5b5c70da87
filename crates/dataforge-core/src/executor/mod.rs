//! SQL executor primitive.
//!
//! One trait seam between the domain services and the database engine. The
//! production implementation ([`PgExecutor`]) opens a short-lived connection
//! per call and releases it on every exit path; tests substitute a scripted
//! fake. Errors are reported neutrally as [`ExecutorError`] — each service
//! maps them onto its own policy (writes → invalid input, reads → runtime
//! failure).

mod pg;
mod rows;
mod values;

pub use pg::PgExecutor;
pub use rows::row_to_fields;
pub use values::SqlValue;

use async_trait::async_trait;
use dataforge_commons::{QueryOutcome, RecordFields, Result, SandboxInstance};
use thiserror::Error;

use crate::vault::CredentialVault;

/// Errors from the executor primitive, prior to policy mapping.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("failed to connect to database engine: {0}")]
    Connect(String),

    #[error("{0}")]
    Execute(String),
}

/// Everything needed to open one connection to a provisioned engine.
///
/// Holds the **decrypted** administrative password; instances of this type
/// are built per request and dropped when the operation completes.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub user: String,
    pub password: String,
}

impl ConnectionTarget {
    /// Resolve an instance record into a connectable target, decrypting its
    /// stored credential.
    pub fn for_instance(instance: &SandboxInstance, vault: &CredentialVault) -> Result<Self> {
        let password = vault.decrypt(&instance.db_password)?;
        Ok(Self {
            host: instance.host.clone(),
            port: instance.port,
            db_name: instance.db_name.clone(),
            user: instance.db_user.clone(),
            password,
        })
    }
}

/// The engine-access seam shared by the schema manager, the CRUD service,
/// the user manager, and the ad-hoc executor.
///
/// Each method opens a connection, performs exactly one logical operation,
/// and releases the connection before returning — including on error paths.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run one statement with positional dynamic parameters; returns the
    /// affected-row count.
    async fn execute(
        &self,
        target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> std::result::Result<u64, ExecutorError>;

    /// Run several statements sequentially on a single connection (used by
    /// column modification, whose rename/retype/nullability steps must see
    /// each other's effects).
    async fn execute_all(
        &self,
        target: &ConnectionTarget,
        statements: &[String],
    ) -> std::result::Result<(), ExecutorError>;

    /// Run one query with positional dynamic parameters; returns decoded
    /// rows as ordered column→value maps.
    async fn query(
        &self,
        target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> std::result::Result<Vec<RecordFields>, ExecutorError>;

    /// Run literal SQL text through the simple-query protocol and normalize
    /// the result shape: a result set becomes `Rows`, anything else becomes
    /// `Affected`. Used only by the ad-hoc executor.
    async fn run_script(
        &self,
        target: &ConnectionTarget,
        sql: &str,
    ) -> std::result::Result<QueryOutcome, ExecutorError>;
}
