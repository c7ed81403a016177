use crate::domain::model::{BoundaryInfo, BoundaryRecord};
use crate::domain::ports::{BoundaryStore, ReferenceListStore};
use crate::utils::error::{CatalogError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 依寫入順序保存記錄；覆蓋時保留原本位置
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoundaryStore {
    records: Arc<RwLock<Vec<BoundaryRecord>>>,
}

impl InMemoryBoundaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoundaryStore for InMemoryBoundaryStore {
    async fn put(&self, record: BoundaryRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<BoundaryRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<BoundaryRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn get_all_infos(&self) -> Result<Vec<BoundaryInfo>> {
        let records = self.records.read().await;
        Ok(records.iter().map(BoundaryRecord::info).collect())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let records = self.records.read().await;
        Ok(records.iter().any(|r| r.id == id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
        records.remove(position);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceListStore {
    lists: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryReferenceListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReferenceListStore for InMemoryReferenceListStore {
    async fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        let mut lists = self.lists.write().await;
        lists.insert(key.to_string(), payload.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let lists = self.lists.read().await;
        Ok(lists.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, filename: &str) -> BoundaryRecord {
        BoundaryRecord {
            id: id.to_string(),
            filename: filename.to_string(),
            content: filename.as_bytes().to_vec(),
            scenario_time: None,
        }
    }

    #[tokio::test]
    async fn test_put_keeps_position_on_overwrite() {
        let store = InMemoryBoundaryStore::new();
        store.put(record("a", "a1.xml")).await.unwrap();
        store.put(record("b", "b.xml")).await.unwrap();
        store.put(record("a", "a2.xml")).await.unwrap();

        let all = store.get_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a2.xml", "b.xml"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryBoundaryStore::new();
        store.put(record("a", "a.xml")).await.unwrap();

        store.delete("a").await.unwrap();
        assert!(!store.exists("a").await.unwrap());
        assert!(store.delete("a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryReferenceListStore::new();
        let other = store.clone();

        store.put("tsos", b"[]").await.unwrap();
        assert_eq!(other.get("tsos").await.unwrap(), Some(b"[]".to_vec()));
        assert_eq!(other.get("businessProcesses").await.unwrap(), None);
    }
}
