//! Instance registry: durable instance-id → connection-coordinates store.
//!
//! A flat JSON file loaded into a concurrent map at startup and rewritten on
//! every mutation. Identifiers are assigned from a monotonic counter seeded
//! past the highest persisted id.

use dashmap::DashMap;
use dataforge_commons::{DataForgeError, InstanceId, Result, SandboxInstance};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InstanceRegistry {
    instances: DashMap<InstanceId, SandboxInstance>,
    next_id: AtomicI64,
    persist_path: Option<PathBuf>,
}

impl InstanceRegistry {
    /// In-memory registry with no persistence. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            instances: DashMap::new(),
            next_id: AtomicI64::new(1),
            persist_path: None,
        }
    }

    /// Open a registry backed by a JSON file, loading any existing records.
    pub fn open(path: PathBuf) -> Result<Self> {
        let instances = DashMap::new();
        let mut max_id = 0i64;

        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let records: Vec<SandboxInstance> = serde_json::from_str(&raw)?;
            for record in records {
                max_id = max_id.max(record.id.value());
                instances.insert(record.id, record);
            }
            info!(
                "Instance registry loaded: {} record(s) from {}",
                instances.len(),
                path.display()
            );
        }

        Ok(Self {
            instances,
            next_id: AtomicI64::new(max_id + 1),
            persist_path: Some(path),
        })
    }

    /// Persist the current record set. No-op for in-memory registries.
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let mut records: Vec<SandboxInstance> =
            self.instances.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&records)?)?;
        debug!("Instance registry persisted ({} records)", records.len());
        Ok(())
    }

    /// Store a new instance, assigning its id. The caller passes `id = 0`;
    /// the stored record with the real id is returned.
    pub fn save(&self, mut instance: SandboxInstance) -> Result<SandboxInstance> {
        let id = InstanceId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        instance.id = id;
        self.instances.insert(id, instance.clone());
        self.persist()?;
        Ok(instance)
    }

    pub fn find(&self, id: InstanceId) -> Result<SandboxInstance> {
        self.instances
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(DataForgeError::InstanceNotFound(id))
    }

    pub fn delete(&self, id: InstanceId) -> Result<()> {
        if self.instances.remove(&id).is_none() {
            return Err(DataForgeError::InstanceNotFound(id));
        }
        self.persist()
    }

    /// All registered instances, ordered by id.
    pub fn list(&self) -> Vec<SandboxInstance> {
        let mut records: Vec<SandboxInstance> =
            self.instances.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(db_name: &str) -> SandboxInstance {
        SandboxInstance {
            id: InstanceId::new(0),
            container_id: format!("container-{}", db_name),
            db_name: db_name.to_string(),
            db_user: "admin".to_string(),
            db_password: "ZW5jcnlwdGVk".to_string(),
            host: "localhost".to_string(),
            port: 54321,
        }
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let registry = InstanceRegistry::in_memory();
        let a = registry.save(sample("a")).unwrap();
        let b = registry.save(sample("b")).unwrap();
        assert_eq!(a.id, InstanceId::new(1));
        assert_eq!(b.id, InstanceId::new(2));
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let registry = InstanceRegistry::in_memory();
        let err = registry.find(InstanceId::new(99)).unwrap_err();
        assert!(matches!(err, DataForgeError::InstanceNotFound(_)));
    }

    #[test]
    fn test_delete_removes_record() {
        let registry = InstanceRegistry::in_memory();
        let saved = registry.save(sample("a")).unwrap();
        registry.delete(saved.id).unwrap();
        assert!(registry.find(saved.id).is_err());
        assert!(registry.delete(saved.id).is_err());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.json");

        let saved = {
            let registry = InstanceRegistry::open(path.clone()).unwrap();
            registry.save(sample("shop")).unwrap()
        };

        let reopened = InstanceRegistry::open(path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.find(saved.id).unwrap().db_name, "shop");

        // id counter resumes past the highest persisted id
        let next = reopened.save(sample("blog")).unwrap();
        assert_eq!(next.id, InstanceId::new(saved.id.value() + 1));
    }
}
