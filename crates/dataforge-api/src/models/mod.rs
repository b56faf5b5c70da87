//! Request and response models for the HTTP surface.

mod requests;
mod responses;

pub use requests::{
    CreateDatabaseRequest, CreateDbUserRequest, PermissionsRequest, RecordQuery, SqlQueryRequest,
};
pub use responses::{AffectedResponse, InstanceCreated, InstanceSummary, MessageResponse};
