// Error types shared across DataForge crates
use crate::models::InstanceId;
use thiserror::Error;

/// Main error type for DataForge.
///
/// Every operation exposed by dataforge-core returns one of these kinds; the
/// API layer maps them onto HTTP status codes. The ad-hoc query executor is
/// the one exception to "errors propagate" — it folds execution failures into
/// its result value instead.
#[derive(Error, Debug)]
pub enum DataForgeError {
    /// The container runtime control socket was never reached at startup.
    #[error("Sandbox backend unavailable: {0}")]
    OrchestratorUnavailable(String),

    /// Image pull, container create/start, or port discovery failed.
    #[error("Provisioning failed: {0}")]
    ProvisioningFailed(String),

    #[error("Database instance not found with id: {0}")]
    InstanceNotFound(InstanceId),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A structural request that the engine rejected (duplicate table, bad
    /// type syntax, ...).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A malformed request or a statement-build/execution failure on a write.
    /// Recoverable: the caller may correct the input and retry.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure on a read or introspection path. No local recovery
    /// is defined for these.
    #[error("Runtime failure: {0}")]
    RuntimeFailure(String),
}

impl DataForgeError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        DataForgeError::InvalidInput(msg.into())
    }

    pub fn invalid_schema<S: Into<String>>(msg: S) -> Self {
        DataForgeError::InvalidSchema(msg.into())
    }

    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        DataForgeError::RuntimeFailure(msg.into())
    }

    pub fn table_not_found<S: Into<String>>(table: S) -> Self {
        DataForgeError::TableNotFound(table.into())
    }

    pub fn provisioning<S: Into<String>>(msg: S) -> Self {
        DataForgeError::ProvisioningFailed(msg.into())
    }

    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        DataForgeError::OrchestratorUnavailable(msg.into())
    }
}

impl From<std::io::Error> for DataForgeError {
    fn from(err: std::io::Error) -> Self {
        DataForgeError::RuntimeFailure(err.to_string())
    }
}

impl From<serde_json::Error> for DataForgeError {
    fn from(err: serde_json::Error) -> Self {
        DataForgeError::RuntimeFailure(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DataForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_not_found_display() {
        let err = DataForgeError::InstanceNotFound(InstanceId::new(42));
        assert_eq!(err.to_string(), "Database instance not found with id: 42");
    }

    #[test]
    fn test_table_not_found_display() {
        let err = DataForgeError::table_not_found("orders");
        assert_eq!(err.to_string(), "Table not found: orders");
    }

    #[test]
    fn test_invalid_input_helper() {
        let err = DataForgeError::invalid_input("field map must not be empty");
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_io_error_maps_to_runtime_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: DataForgeError = io.into();
        assert!(matches!(err, DataForgeError::RuntimeFailure(_)));
    }
}
