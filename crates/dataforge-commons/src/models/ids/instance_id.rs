//! Type-safe wrapper for sandbox-instance identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry-assigned surrogate key for a provisioned sandbox instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(i64);

impl InstanceId {
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for InstanceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_display() {
        assert_eq!(format!("{}", InstanceId::new(7)), "7");
    }

    #[test]
    fn test_instance_id_serde_transparent() {
        let id = InstanceId::new(12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let back: InstanceId = serde_json::from_str("12").unwrap();
        assert_eq!(back, id);
    }
}
