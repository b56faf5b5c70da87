//! # dataforge-api
//!
//! HTTP surface for DataForge: request/response models, actix-web handlers,
//! and route configuration. This layer validates payload shape, translates
//! [`dataforge_commons::DataForgeError`] kinds into status codes, and keeps
//! all domain behavior in dataforge-core.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
