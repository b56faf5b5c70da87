//! Production executor: one short-lived tokio-postgres connection per call.

use super::{row_to_fields, ConnectionTarget, ExecutorError, SqlExecutor, SqlValue};
use async_trait::async_trait;
use dataforge_commons::{QueryOutcome, RecordFields};
use log::debug;
use serde_json::Value;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// Opens a fresh engine connection for every logical operation and drops it
/// on return. There is deliberately no pooling here: instances are ephemeral
/// and operations are request-scoped (see the crate docs).
#[derive(Debug, Default)]
pub struct PgExecutor;

impl PgExecutor {
    pub fn new() -> Self {
        Self
    }

    async fn connect(&self, target: &ConnectionTarget) -> Result<Client, ExecutorError> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&target.host)
            .port(target.port)
            .dbname(&target.db_name)
            .user(&target.user)
            .password(&target.password)
            .application_name("dataforge");

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| ExecutorError::Connect(e.to_string()))?;

        // The driver task finishes when the client is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("engine connection closed with error: {}", e);
            }
        });

        Ok(client)
    }
}

fn param_refs(params: &[SqlValue]) -> Vec<&(dyn postgres_types::ToSql + Sync)> {
    params
        .iter()
        .map(|p| p as &(dyn postgres_types::ToSql + Sync))
        .collect()
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn execute(
        &self,
        target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, ExecutorError> {
        let client = self.connect(target).await?;
        client
            .execute(sql, &param_refs(params))
            .await
            .map_err(|e| ExecutorError::Execute(e.to_string()))
    }

    async fn execute_all(
        &self,
        target: &ConnectionTarget,
        statements: &[String],
    ) -> Result<(), ExecutorError> {
        let client = self.connect(target).await?;
        for statement in statements {
            client
                .batch_execute(statement)
                .await
                .map_err(|e| ExecutorError::Execute(e.to_string()))?;
        }
        Ok(())
    }

    async fn query(
        &self,
        target: &ConnectionTarget,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<RecordFields>, ExecutorError> {
        let client = self.connect(target).await?;
        let rows = client
            .query(sql, &param_refs(params))
            .await
            .map_err(|e| ExecutorError::Execute(e.to_string()))?;
        Ok(rows.iter().map(row_to_fields).collect())
    }

    async fn run_script(
        &self,
        target: &ConnectionTarget,
        sql: &str,
    ) -> Result<QueryOutcome, ExecutorError> {
        let client = self.connect(target).await?;
        let messages = client
            .simple_query(sql)
            .await
            .map_err(|e| ExecutorError::Execute(e.to_string()))?;
        Ok(shape_script_result(messages))
    }
}

/// Normalize simple-query output: the first result set becomes `Rows` (column
/// order from the row description), otherwise the first command tag becomes
/// `Affected` — mirroring a driver's execute()/getUpdateCount() contract.
/// Values travel as text on this protocol, so cells are strings or null.
fn shape_script_result(messages: Vec<SimpleQueryMessage>) -> QueryOutcome {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<RecordFields> = Vec::new();
    let mut saw_rows = false;

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(description) => {
                if saw_rows {
                    break;
                }
                saw_rows = true;
                columns = description.iter().map(|c| c.name().to_string()).collect();
            }
            SimpleQueryMessage::Row(row) => {
                if !saw_rows {
                    saw_rows = true;
                    columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                let mut fields = RecordFields::with_capacity(columns.len());
                for (idx, name) in columns.iter().enumerate() {
                    let value = row
                        .get(idx)
                        .map(|s| Value::String(s.to_string()))
                        .unwrap_or(Value::Null);
                    fields.insert(name.clone(), value);
                }
                rows.push(fields);
            }
            SimpleQueryMessage::CommandComplete(count) => {
                if saw_rows {
                    break;
                }
                return QueryOutcome::affected(count);
            }
            _ => {}
        }
    }

    if saw_rows {
        QueryOutcome::rows(columns, rows)
    } else {
        QueryOutcome::affected(0)
    }
}
