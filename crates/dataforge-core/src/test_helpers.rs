//! Shared test fixtures: a scripted executor and canned instances.

use crate::executor::{ConnectionTarget, ExecutorError, SqlExecutor, SqlValue};
use crate::registry::InstanceRegistry;
use crate::vault::CredentialVault;
use async_trait::async_trait;
use dataforge_commons::{QueryOutcome, RecordFields, SandboxInstance};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A `SqlExecutor` that records every statement it is handed and replays
/// queued responses. Empty queues fall back to empty/zero results so tests
/// only script what they assert on.
#[derive(Default)]
pub struct FakeExecutor {
    statements: Mutex<Vec<String>>,
    params: Mutex<Vec<Vec<SqlValue>>>,
    query_results: Mutex<VecDeque<Result<Vec<RecordFields>, ExecutorError>>>,
    execute_results: Mutex<VecDeque<Result<u64, ExecutorError>>>,
    batch_results: Mutex<VecDeque<Result<(), ExecutorError>>>,
    script_results: Mutex<VecDeque<Result<QueryOutcome, ExecutorError>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement seen, in execution order (batch statements flattened).
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    /// Parameters bound for the n-th parameterized call.
    pub fn params(&self) -> Vec<Vec<SqlValue>> {
        self.params.lock().unwrap().clone()
    }

    pub fn push_query_rows(&self, rows: Vec<RecordFields>) {
        self.query_results.lock().unwrap().push_back(Ok(rows));
    }

    pub fn push_query_error(&self, message: &str) {
        self.query_results
            .lock()
            .unwrap()
            .push_back(Err(ExecutorError::Execute(message.to_string())));
    }

    pub fn push_execute_result(&self, affected: u64) {
        self.execute_results.lock().unwrap().push_back(Ok(affected));
    }

    pub fn push_execute_error(&self, message: &str) {
        self.execute_results
            .lock()
            .unwrap()
            .push_back(Err(ExecutorError::Execute(message.to_string())));
    }

    pub fn push_batch_error(&self, message: &str) {
        self.batch_results
            .lock()
            .unwrap()
            .push_back(Err(ExecutorError::Execute(message.to_string())));
    }

    pub fn push_script_outcome(&self, outcome: QueryOutcome) {
        self.script_results.lock().unwrap().push_back(Ok(outcome));
    }

    pub fn push_script_error(&self, message: &str) {
        self.script_results
            .lock()
            .unwrap()
            .push_back(Err(ExecutorError::Execute(message.to_string())));
    }

    fn record(&self, sql: &str, params: &[SqlValue]) {
        self.statements.lock().unwrap().push(sql.to_string());
        self.params.lock().unwrap().push(params.to_vec());
    }
}

#[async_trait]
impl SqlExecutor for FakeExecutor {
    async fn execute(
        &self,
        _target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, ExecutorError> {
        self.record(sql, params);
        self.execute_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(0))
    }

    async fn execute_all(
        &self,
        _target: &ConnectionTarget,
        statements: &[String],
    ) -> Result<(), ExecutorError> {
        for statement in statements {
            self.statements.lock().unwrap().push(statement.clone());
        }
        self.batch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn query(
        &self,
        _target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<RecordFields>, ExecutorError> {
        self.record(sql, params);
        self.query_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn run_script(
        &self,
        _target: &ConnectionTarget,
        sql: &str,
    ) -> Result<QueryOutcome, ExecutorError> {
        self.statements.lock().unwrap().push(sql.to_string());
        self.script_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(QueryOutcome::affected(0)))
    }
}

/// Registry pre-loaded with one instance whose password was encrypted by the
/// returned vault. Most service tests start here.
pub fn registry_with_instance() -> (InstanceRegistry, CredentialVault, SandboxInstance) {
    let vault = CredentialVault::new("test-secret");
    let registry = InstanceRegistry::in_memory();
    let saved = registry
        .save(SandboxInstance {
            id: dataforge_commons::InstanceId::new(0),
            container_id: "test-container".into(),
            db_name: "testdb".into(),
            db_user: "admin".into(),
            db_password: vault.encrypt("password").unwrap(),
            host: "localhost".into(),
            port: 5432,
        })
        .unwrap();
    (registry, vault, saved)
}
