//! Column-modification request.

use serde::{Deserialize, Serialize};

/// Requested changes to an existing column. Every field is optional; when
/// several are set they are applied as rename, then retype, then nullability,
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub new_data_type: Option<String>,
    #[serde(default)]
    pub nullable: Option<bool>,
}

impl ColumnChange {
    /// At least one change must be requested.
    pub fn is_empty(&self) -> bool {
        self.new_name.as_deref().map_or(true, |s| s.trim().is_empty())
            && self
                .new_data_type
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
            && self.nullable.is_none()
    }
}
