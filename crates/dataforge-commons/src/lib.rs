//! # dataforge-commons
//!
//! Shared types and errors for DataForge.
//!
//! This crate provides the foundational types used across all DataForge crates
//! (dataforge-core, dataforge-api, dataforge-server). It carries no runtime
//! dependencies beyond serde, so every other crate can depend on it without
//! pulling in the container or database stacks.
//!
//! ## Type-Safe Wrappers
//!
//! - `InstanceId`: registry-assigned identifier for a provisioned sandbox
//! - `TableName`: table name wrapper, normalized to lowercase (the engine
//!   folds unquoted identifiers the same way)
//! - `TableKey`: composite (instance, table) key used by the schema cache
//!
//! ## Value Types
//!
//! - `SandboxInstance`: connection coordinates for a provisioned database
//! - `ColumnSpec` / `TableSpec` / `ForeignKeySpec`: structural descriptions
//!   turned into DDL by the schema manager
//! - `QueryOutcome`: tagged result of an ad-hoc statement (rows, affected
//!   count, or error — exactly one)

pub mod errors;
pub mod models;

pub use errors::{DataForgeError, Result};
pub use models::{
    ColumnChange, ColumnSpec, DbUserInfo, ForeignKeySpec, InstanceId, QueryOutcome, RecordFields,
    SandboxInstance, TableKey, TableName, TableRelationship, TableSpec, UserPermissionInfo,
};
