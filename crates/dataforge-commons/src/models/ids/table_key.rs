//! Composite (instance, table) key.

use super::{InstanceId, TableName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key addressing one table inside one sandbox instance.
///
/// Used as the schema-cache key: all cache population and eviction is scoped
/// to a single `TableKey`, never a whole instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableKey {
    instance_id: InstanceId,
    table_name: TableName,
}

impl TableKey {
    pub fn new(instance_id: InstanceId, table_name: TableName) -> Self {
        Self {
            instance_id,
            table_name,
        }
    }

    #[inline]
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    #[inline]
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instance_id, self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_key_equality() {
        let a = TableKey::new(InstanceId::new(1), TableName::new("Orders"));
        let b = TableKey::new(InstanceId::new(1), TableName::new("orders"));
        let c = TableKey::new(InstanceId::new(2), TableName::new("orders"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_table_key_display() {
        let key = TableKey::new(InstanceId::new(3), TableName::new("events"));
        assert_eq!(format!("{}", key), "3:events");
    }
}
