//! Value types and type-safe identifier wrappers for DataForge.
//!
//! Newtype wrappers prevent accidental mixing of instance ids, table names,
//! and cache keys at compile time. The structural types (`ColumnSpec`,
//! `TableSpec`, `ForeignKeySpec`) describe schemas without any compile-time
//! knowledge of table shapes — they are the input language of the schema
//! manager.

pub mod ids;

mod column_change;
mod column_spec;
mod db_user;
mod foreign_key_spec;
mod instance;
mod outcome;
mod relationship;
mod table_spec;

pub use column_change::ColumnChange;
pub use column_spec::ColumnSpec;
pub use db_user::{DbUserInfo, UserPermissionInfo};
pub use foreign_key_spec::ForeignKeySpec;
pub use ids::{InstanceId, TableKey, TableName};
pub use instance::SandboxInstance;
pub use outcome::QueryOutcome;
pub use relationship::TableRelationship;
pub use table_spec::TableSpec;

/// Ordered column→value map used for dynamic record payloads and filters.
///
/// Insertion order is preserved so the generated statement text is
/// reproducible; the order has no semantic effect on results.
pub type RecordFields = indexmap::IndexMap<String, serde_json::Value>;
